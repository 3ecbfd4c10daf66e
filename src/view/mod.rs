//! Rendering results.
//!
//! > View is the only module that knows anything about HTML, or JSON, or other "renderings" of the
//! > response. I'm happy to call this "view" in common with traditional stateless MVC, because
//! > it's role is largely the same.

use crate::logic::export::Export;
use failure::Fallible;
use serde::Serialize;
use warp::http::{
    header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION},
    Response, StatusCode,
};

/// Renders a value as JSON to a response.
pub fn render_json<T: Serialize>(data: &T) -> Fallible<Response<String>> {
    let body = serde_json::to_string(data)?;
    let resp = Response::builder()
        .header(CONTENT_TYPE, "application/json")
        .body(body)?;
    Ok(resp)
}

/// Renders an export as a downloadable file.
pub fn render_export(export: Export) -> Fallible<Response<Vec<u8>>> {
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    let resp = Response::builder()
        .header(CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(CONTENT_DISPOSITION, disposition)
        .body(export.bytes)?;
    Ok(resp)
}

/// Renders a redirect to another page, as sent after a form is submitted.
pub fn render_redirect(to: &str) -> Fallible<Response<String>> {
    let resp = Response::builder()
        .header(LOCATION, to)
        .status(StatusCode::FOUND)
        .body(String::new())?;
    Ok(resp)
}

//! The HTTP server.
//!
//! > **Router** is the the only module that knows anything about HTTP. Every other part of the
//! > system has no knowledge of how the request is really being made. The router's responsibility
//! > is to call into the domain logic, and then render that response data with an appropriate view.

mod errors;
mod util;

use crate::{
    dal::Store,
    logic,
    router::util::{to_rejection, with_db, FutureExt},
    util::blocking,
    view::{render_export, render_json, render_redirect},
};
use log::{info, warn};
use serde_derive::Deserialize;
use std::{collections::HashMap, net::SocketAddr};
use warp::Filter;

/// The largest roster form accepted, in bytes.
const FORM_LIMIT: u64 = 64 * 1024;

/// Starts an HTTP server at the given address. If the server ever exits, it's restarted, so this
/// never returns.
pub async fn serve_on<S: Store>(addr: SocketAddr, db: S) {
    loop {
        info!("Starting to serve on {}...", addr);
        let server = routes(db.clone()).with(warp::log("guildsignup::router"));
        warp::serve(server).run(addr).await;
        warn!("HTTP server exited; restarting...");
    }
}

/// All the routes, with errors turned into responses.
pub fn routes<S: Store>(db: S) -> Resp!() {
    let routes = route_any! {
        GET () => roster(db.clone()),
        POST () => assign_teams(db.clone()),
        GET ("signups.csv") => export(db),
    };
    routes.recover(errors::recover).boxed()
}

/// The roster: every signup, grouped by team.
fn roster<S: Store>(db: S) -> Resp!() {
    with_db(db)
        .and_then(|db: S| async move {
            let roster = blocking(move || logic::roster::load(&db))
                .err_to_rejection()
                .await?;
            render_json(&roster).map_err(to_rejection)
        })
        .boxed()
}

/// Applies a submitted roster form, then sends the organizer back to the roster. If any fields
/// were skipped, the redirect says how many.
fn assign_teams<S: Store>(db: S) -> Resp!() {
    warp::body::content_length_limit(FORM_LIMIT)
        .and(warp::body::form())
        .and(with_db(db))
        .and_then(|form: HashMap<String, String>, db: S| async move {
            let update = blocking(move || logic::team::apply_form(&db, &form))
                .err_to_rejection()
                .await?;
            info!(
                "Roster form applied {} team changes, skipped {}",
                update.applied,
                update.skipped.len()
            );
            let to = match update.skipped.len() {
                0 => "/".to_string(),
                n => format!("/?skipped={}", n),
            };
            render_redirect(&to).map_err(to_rejection)
        })
        .boxed()
}

/// The CSV export, for one community or all of them.
fn export<S: Store>(db: S) -> Resp!() {
    #[derive(Debug, Deserialize)]
    struct Query {
        community: Option<i64>,
    }

    warp::query()
        .and(with_db(db))
        .and_then(|query: Query, db: S| async move {
            let export = blocking(move || logic::export::export(&db, query.community))
                .err_to_rejection()
                .await?;
            render_export(export).map_err(to_rejection)
        })
        .boxed()
}

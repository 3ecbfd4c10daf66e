use crate::{router::util::Problem, schema::SignupError};
use log::{error, warn};
use warp::{
    http::{Response, StatusCode},
    Rejection,
};

/// Picks the status code for an error that stopped a request.
fn status_for(err: &failure::Error) -> StatusCode {
    match err.downcast_ref::<SignupError>() {
        Some(SignupError::NotFound { .. }) => StatusCode::NOT_FOUND,
        Some(SignupError::InvalidTeam(_)) => StatusCode::BAD_REQUEST,
        Some(SignupError::StorageUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The message for an error, followed by each of its causes on its own line.
fn describe(err: &failure::Error) -> String {
    let mut msg = err.to_string();
    for cause in err.iter_causes() {
        msg.push_str("\ncaused by: ");
        msg += &cause.to_string();
    }
    msg
}

/// A handler for errors raised by the routes. Rejections that aren't errors (such as a route
/// simply not matching) are passed along for warp to deal with.
pub async fn recover(rejection: Rejection) -> Result<Response<String>, Rejection> {
    let err = match rejection.find::<Problem>() {
        Some(Problem(err)) => err,
        None => return Err(rejection),
    };

    let status = status_for(err);
    let msg = describe(err);
    if status.is_server_error() {
        error!("{}", msg.replace('\n', "; "));
    } else {
        warn!("{}", msg.replace('\n', "; "));
    }

    Response::builder()
        .status(status)
        .body(msg)
        .map_err(|err| crate::router::util::to_rejection(err.into()))
}

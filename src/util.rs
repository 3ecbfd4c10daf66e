//! Various utilities.

use failure::Error;
use log::error;

/// Logs an error, including its causes and backtrace (if possible).
pub fn log_err(err: &Error) {
    let mut first = true;
    let num_errs = err.iter_chain().count();
    if num_errs <= 1 {
        error!("{}", err);
    } else {
        for cause in err.iter_chain() {
            if first {
                first = false;
                error!("           {}", cause);
            } else {
                error!("caused by: {}", cause);
            }
        }
    }
    let bt = err.backtrace().to_string();
    if !bt.is_empty() {
        error!("{}", bt);
    }
}

/// Runs a blocking function (such as a database query) on tokio's blocking thread pool, so it
/// doesn't stall the threads that serve requests.
pub async fn blocking<F, T, E>(func: F) -> Result<T, Error>
where
    F: 'static + FnOnce() -> Result<T, E> + Send,
    T: 'static + Send,
    E: 'static + Into<Error> + Send,
{
    tokio::task::spawn_blocking(func).await?.map_err(Into::into)
}

/// The type of a responder. Since `impl Trait` can't be used in `type` items, this magics one up.
macro_rules! Resp {
    () => { warp::filters::BoxedFilter<(impl warp::Reply,)> };
}

/// Inserts `.or(...)` between the given filters. The path is matched before the method, so a
/// request for a path nothing serves is a 404 rather than a 405.
macro_rules! route_any {
    ($hm:ident $hp:tt => $h:expr $(, $tm:ident $tp:tt => $t:expr)* $(,)*) => {
        route_any!(@internal @path $hm $hp).and($h)
            $(.or(route_any!(@internal @path $tm $tp).and($t)))*
    };

    (@internal @method GET) => {{ warp::get() }};
    (@internal @method POST) => {{ warp::post() }};
    (@internal @path $m:ident ()) => {{
        warp::path::end().and(route_any!(@internal @method $m))
    }};
    (@internal @path $m:ident $p:tt) => {{
        use warp::path;
        (path! $p).and(route_any!(@internal @method $m))
    }};
}

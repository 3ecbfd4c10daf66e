use crate::dal::Store;
use failure::Error;
use futures::{future::MapErr, TryFuture, TryFutureExt};
use std::convert::Infallible;
use warp::{reject::Reject, Filter, Rejection};

/// An error that stopped a request, carried through warp as a rejection.
#[derive(Debug)]
pub struct Problem(pub Error);

impl Reject for Problem {}

/// Converts an error to a `warp::Rejection`.
pub fn to_rejection(err: Error) -> Rejection {
    warp::reject::custom(Problem(err))
}

/// An extension trait for Futures.
pub trait FutureExt: Sized {
    /// Converts an error to a `warp::Rejection`.
    fn err_to_rejection(self) -> MapErr<Self, fn(Error) -> Rejection>;
}

impl<F: TryFuture<Error = Error>> FutureExt for F {
    fn err_to_rejection(self) -> MapErr<Self, fn(Error) -> Rejection> {
        let to_rejection: fn(Error) -> Rejection = to_rejection;
        self.map_err(to_rejection)
    }
}

/// Hands a clone of the store to each request.
pub fn with_db<S: Store>(db: S) -> impl Clone + Filter<Extract = (S,), Error = Infallible> {
    warp::any().map(move || db.clone())
}

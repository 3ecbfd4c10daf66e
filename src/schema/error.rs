use failure::{Compat, Error, Fail};

/// The ways a signup operation can fail.
#[derive(Debug, Fail)]
pub enum SignupError {
    /// The database couldn't be reached, or rejected a write.
    #[fail(display = "Storage is unavailable")]
    StorageUnavailable(#[cause] Compat<Error>),

    /// There's no signup for the member in the community.
    #[fail(
        display = "No signup exists for member {} in community {}",
        member_id, community_id
    )]
    NotFound {
        /// The community that was looked in.
        community_id: i64,

        /// The member that wasn't found.
        member_id: i64,
    },

    /// A team assignment named something that isn't a team.
    #[fail(display = "{:?} is not a team", _0)]
    InvalidTeam(String),
}

impl SignupError {
    /// Wraps a connection or query failure.
    pub fn storage<E: Into<Error>>(err: E) -> SignupError {
        SignupError::StorageUnavailable(err.into().compat())
    }
}

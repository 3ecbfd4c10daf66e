//! Types used throughout.
//!
//! > Schema defines the plain old data types that views operate on. Notably, the schema module has
//! > no knowledge of the database, nor any dependencies on any of the rest of the system.

mod error;

pub use crate::schema::error::SignupError;
use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The team a member is assigned to for an event.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// The first offense group.
    Offense1,

    /// The second offense group.
    Offense2,

    /// The defense group.
    Defense,

    /// Substitutes.
    Substitute,

    /// Members on leave for the event.
    Leave,

    /// Members not yet placed anywhere.
    Unassigned,
}

impl Team {
    /// Every team, in display order.
    pub const ALL: [Team; 6] = [
        Team::Offense1,
        Team::Offense2,
        Team::Defense,
        Team::Substitute,
        Team::Leave,
        Team::Unassigned,
    ];

    /// The value stored in the database and used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Team::Offense1 => "offense1",
            Team::Offense2 => "offense2",
            Team::Defense => "defense",
            Team::Substitute => "substitute",
            Team::Leave => "leave",
            Team::Unassigned => "unassigned",
        }
    }
}

impl Default for Team {
    fn default() -> Team {
        Team::Unassigned
    }
}

impl fmt::Display for Team {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = SignupError;

    fn from_str(s: &str) -> Result<Team, SignupError> {
        Team::ALL
            .iter()
            .cloned()
            .find(|team| team.as_str() == s)
            .ok_or_else(|| SignupError::InvalidTeam(s.to_string()))
    }
}

/// Classifies a stored value, treating anything unrecognized as unassigned.
impl From<String> for Team {
    fn from(s: String) -> Team {
        s.parse().unwrap_or_default()
    }
}

/// A member's signup for their community's event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Signup {
    /// The community (guild) the signup belongs to.
    pub community_id: i64,

    /// The member who signed up.
    pub member_id: i64,

    /// The member's account name at submission time.
    pub account_name: String,

    /// The member's display name at submission time.
    pub display_name: String,

    /// The member's class and build, e.g. "job/build".
    pub role_class: String,

    /// The member's gear level.
    pub gear_level: String,

    /// When the member can usually attend.
    pub availability: String,

    /// Whether the member can talk, only listen, or neither on voice chat.
    pub voice_capability: String,

    /// A free-form note, possibly empty.
    pub note: String,

    /// The team the member is assigned to.
    pub team: Team,

    /// When the member last registered, as ISO 8601 UTC with second precision.
    pub submitted_at: String,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

/// A signup as it's written by a registration; the store assigns `updated_at`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewSignup {
    /// The community (guild) the signup belongs to.
    pub community_id: i64,

    /// The member who signed up.
    pub member_id: i64,

    /// The member's account name.
    pub account_name: String,

    /// The member's display name.
    pub display_name: String,

    /// The member's class and build.
    pub role_class: String,

    /// The member's gear level.
    pub gear_level: String,

    /// When the member can usually attend.
    pub availability: String,

    /// The member's voice chat capability.
    pub voice_capability: String,

    /// A free-form note, possibly empty.
    pub note: String,

    /// The team to store; carried over from the previous signup if there was one.
    pub team: Team,

    /// The submission timestamp.
    pub submitted_at: String,
}

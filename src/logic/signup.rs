//! Registering for an event, and looking up one's own registration.

use crate::{
    dal::Store,
    schema::{NewSignup, Signup, SignupError},
};
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use serde_derive::Deserialize;

/// What a member submits when they sign up.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Registration {
    /// The community they're signing up in.
    pub community_id: i64,

    /// The member signing up.
    pub member_id: i64,

    /// Their account name.
    pub account_name: String,

    /// Their current display name.
    pub display_name: String,

    /// Their class and build.
    pub role_class: String,

    /// Their gear level.
    pub gear_level: String,

    /// When they can usually attend.
    pub availability: String,

    /// Their voice chat capability.
    pub voice_capability: String,

    /// Anything else they want organizers to know.
    #[serde(default)]
    pub note: String,
}

/// Formats a submission timestamp: ISO 8601, UTC, whole seconds, with a `Z` suffix.
pub fn submission_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Combines a registration with the member's previous signup, if any. Registration never
/// changes the team: it's carried over from the previous signup, or starts out unassigned.
pub fn merge(
    existing: Option<&Signup>,
    registration: Registration,
    submitted_at: String,
) -> NewSignup {
    let team = existing.map(|signup| signup.team).unwrap_or_default();
    NewSignup {
        community_id: registration.community_id,
        member_id: registration.member_id,
        account_name: registration.account_name,
        display_name: registration.display_name,
        role_class: registration.role_class,
        gear_level: registration.gear_level,
        availability: registration.availability,
        voice_capability: registration.voice_capability,
        note: registration.note,
        team,
        submitted_at,
    }
}

/// Registers a member, or updates their existing registration, returning what was stored.
///
/// The read and the write are separate requests, so a team change that lands between them is
/// overwritten with the team that was read.
pub fn register<S: Store>(db: &S, registration: Registration) -> Result<Signup, SignupError> {
    let existing = db.get_signup(registration.community_id, registration.member_id)?;
    let new = merge(
        existing.as_ref(),
        registration,
        submission_timestamp(Utc::now()),
    );
    let signup = db.upsert_signup(&new)?;
    info!(
        "{} {} signed up in community {} (team {})",
        if existing.is_some() { "Updated" } else { "New" },
        signup.member_id,
        signup.community_id,
        signup.team
    );
    Ok(signup)
}

/// Looks up a member's own signup. `None` means they haven't registered.
pub fn lookup<S: Store>(
    db: &S,
    community_id: i64,
    member_id: i64,
) -> Result<Option<Signup>, SignupError> {
    db.get_signup(community_id, member_id)
}

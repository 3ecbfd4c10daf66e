//! Business logic.
//!
//! > **Logic** is the "business (or domain) logic" of the application. The router will pull the
//! > necessary information out of the HTTP request, and call into this module as quickly as
//! > possible to do all the actual work.
//!
//! Everything here is synchronous and generic over `crate::dal::Store`. The chat front end calls
//! `signup::register`, `signup::lookup` and `export::export` directly; the web front end goes
//! through the router.

pub mod export;
pub mod roster;
pub mod signup;
pub mod team;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::logic::signup::Registration;

    /// A registration with plausible values for every field.
    pub fn registration(community_id: i64, member_id: i64, display_name: &str) -> Registration {
        Registration {
            community_id,
            member_id,
            account_name: format!("{}#{:04}", display_name, member_id % 10_000),
            display_name: display_name.to_string(),
            role_class: "iron-robe/tank".to_string(),
            gear_level: "250k".to_string(),
            availability: "Wed, Sun after 20:30".to_string(),
            voice_capability: "talks".to_string(),
            note: String::new(),
        }
    }
}

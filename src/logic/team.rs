//! Assigning members to teams.

use crate::{
    dal::Store,
    schema::{SignupError, Team},
};
use log::{info, warn};
use std::collections::HashMap;

/// The prefix of the form fields the roster page submits, one per signup.
pub const FORM_KEY_PREFIX: &str = "team_";

/// Moves a member to a team. The team is checked before storage is touched, and only the team
/// (and the time of the change) is written.
pub fn set_team<S: Store>(
    db: &S,
    community_id: i64,
    member_id: i64,
    team: &str,
) -> Result<Team, SignupError> {
    let team = team.parse::<Team>()?;
    db.update_team(community_id, member_id, team)?;
    info!(
        "Moved {} in community {} to {}",
        member_id, community_id, team
    );
    Ok(team)
}

/// Parses a form field name of the form `team_<community>_<member>`. Returns `None` for fields
/// that aren't team assignments or whose IDs don't parse.
pub fn parse_form_key(key: &str) -> Option<(i64, i64)> {
    let rest = key.strip_prefix(FORM_KEY_PREFIX)?;
    let mut ids = rest.splitn(2, '_');
    let community_id = ids.next()?.parse().ok()?;
    let member_id = ids.next()?.parse().ok()?;
    Some((community_id, member_id))
}

/// What happened to a submitted roster form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BulkUpdate {
    /// The number of assignments that were written.
    pub applied: usize,

    /// The fields that were skipped, and why.
    pub skipped: Vec<(String, String)>,
}

/// Applies every `team_<community>_<member>` field of a submitted roster form. Fields without the
/// prefix are ignored. Malformed keys, unknown teams and signups that no longer exist are skipped
/// (and logged) so one stale row doesn't lose the rest of the form; a storage failure stops the
/// whole update.
pub fn apply_form<S: Store>(
    db: &S,
    form: &HashMap<String, String>,
) -> Result<BulkUpdate, SignupError> {
    let mut entries = form
        .iter()
        .filter(|(key, _)| key.starts_with(FORM_KEY_PREFIX))
        .collect::<Vec<_>>();
    entries.sort();

    let mut update = BulkUpdate::default();
    for (key, value) in entries {
        let (community_id, member_id) = match parse_form_key(key) {
            Some(ids) => ids,
            None => {
                warn!("Ignoring malformed team field {:?}", key);
                update.skipped.push((key.clone(), "malformed field name".to_string()));
                continue;
            }
        };
        match set_team(db, community_id, member_id, value) {
            Ok(_) => update.applied += 1,
            Err(err @ SignupError::StorageUnavailable(_)) => return Err(err),
            Err(err) => {
                warn!("Skipping {:?}: {}", key, err);
                update.skipped.push((key.clone(), err.to_string()));
            }
        }
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dal::memory::MemoryDB,
        logic::{fixtures::registration, signup::register},
    };
    use chrono::Utc;
    use maplit::hashmap;

    #[test]
    fn set_team_then_get_sees_the_change() {
        let db = MemoryDB::default();
        let _ = register(&db, registration(1, 7, "ada")).unwrap();
        let before = Utc::now();

        assert_eq!(set_team(&db, 1, 7, "offense2").unwrap(), Team::Offense2);

        let stored = db.get_signup(1, 7).unwrap().unwrap();
        assert_eq!(stored.team, Team::Offense2);
        assert!(stored.updated_at >= before);
    }

    #[test]
    fn set_team_only_touches_the_team() {
        let db = MemoryDB::default();
        let registered = register(&db, registration(1, 7, "ada")).unwrap();
        let _ = set_team(&db, 1, 7, "leave").unwrap();

        let stored = db.get_signup(1, 7).unwrap().unwrap();
        assert_eq!(stored.team, Team::Leave);
        assert_eq!(stored.role_class, registered.role_class);
        assert_eq!(stored.submitted_at, registered.submitted_at);
        assert_eq!(stored.display_name, registered.display_name);
    }

    #[test]
    fn invalid_team_never_touches_storage() {
        let db = MemoryDB::default();
        let _ = register(&db, registration(1, 7, "ada")).unwrap();
        let writes = db.writes();

        for bad in &["", "attack", "Defense", "防守", "unassigned "] {
            match set_team(&db, 1, 7, bad) {
                Err(SignupError::InvalidTeam(value)) => assert_eq!(&value, bad),
                r => panic!("unexpected result {:?}", r),
            }
        }
        assert_eq!(db.writes(), writes);
        assert_eq!(db.get_signup(1, 7).unwrap().unwrap().team, Team::Unassigned);
    }

    #[test]
    fn invalid_team_is_rejected_even_when_storage_is_down() {
        let db = MemoryDB::default();
        db.set_unavailable(true);
        assert!(matches!(
            set_team(&db, 1, 7, "nope"),
            Err(SignupError::InvalidTeam(_))
        ));
    }

    #[test]
    fn set_team_on_missing_signup_is_not_found() {
        let db = MemoryDB::default();
        assert!(matches!(
            set_team(&db, 1, 7, "defense"),
            Err(SignupError::NotFound {
                community_id: 1,
                member_id: 7
            })
        ));
        assert!(db.list_all_signups().unwrap().is_empty());
    }

    #[test]
    fn parses_form_keys() {
        assert_eq!(parse_form_key("team_10_99"), Some((10, 99)));
        assert_eq!(
            parse_form_key("team_1081234567890123456_300000000000000001"),
            Some((1_081_234_567_890_123_456, 300_000_000_000_000_001))
        );
        assert_eq!(parse_form_key("team_10"), None);
        assert_eq!(parse_form_key("team_x_1"), None);
        assert_eq!(parse_form_key("team_1_2_3"), None);
        assert_eq!(parse_form_key("submit"), None);
    }

    #[test]
    fn applies_a_roster_form() {
        let db = MemoryDB::default();
        for member in 1..=3 {
            let _ = register(&db, registration(5, member, "m")).unwrap();
        }

        let form = hashmap! {
            "team_5_1".to_string() => "offense1".to_string(),
            "team_5_2".to_string() => "defense".to_string(),
            "team_5_3".to_string() => "bogus".to_string(),
            "team_5_4".to_string() => "leave".to_string(),
            "team_oops".to_string() => "leave".to_string(),
            "csrf".to_string() => "whatever".to_string(),
        };
        let update = apply_form(&db, &form).unwrap();

        assert_eq!(update.applied, 2);
        let skipped = update
            .skipped
            .iter()
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>();
        assert_eq!(skipped, vec!["team_5_3", "team_5_4", "team_oops"]);

        let team = |member| db.get_signup(5, member).unwrap().unwrap().team;
        assert_eq!(team(1), Team::Offense1);
        assert_eq!(team(2), Team::Defense);
        assert_eq!(team(3), Team::Unassigned);
        assert_eq!(db.get_signup(5, 4).unwrap(), None);
    }

    #[test]
    fn storage_failure_stops_a_roster_form() {
        let db = MemoryDB::default();
        db.set_unavailable(true);
        let form = hashmap! {
            "team_5_1".to_string() => "offense1".to_string(),
        };
        assert!(matches!(
            apply_form(&db, &form),
            Err(SignupError::StorageUnavailable(_))
        ));
    }
}

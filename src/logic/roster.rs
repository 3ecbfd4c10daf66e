//! The organizers' view of every signup, grouped by team.

use crate::{
    dal::Store,
    schema::{Signup, SignupError, Team},
};
use serde_derive::Serialize;
use std::collections::BTreeMap;

/// Every signup, grouped by team.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Roster {
    /// The number of signups across every team.
    pub total: usize,

    /// One section per team, in `Team::ALL` order, including empty ones.
    pub sections: Vec<TeamSection>,
}

/// The members of one team.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamSection {
    /// The team.
    pub team: Team,

    /// The number of members in it.
    pub count: usize,

    /// Its members, ordered by community and then display name.
    pub signups: Vec<Signup>,
}

/// Groups signups by team. Every signup lands in exactly one section.
pub fn group_by_team(signups: Vec<Signup>) -> Roster {
    let mut groups = Team::ALL
        .iter()
        .map(|&team| (team, Vec::new()))
        .collect::<BTreeMap<_, _>>();
    let total = signups.len();
    for signup in signups {
        groups.entry(signup.team).or_insert_with(Vec::new).push(signup);
    }

    let sections = Team::ALL
        .iter()
        .map(|team| {
            let mut signups = groups.remove(team).unwrap_or_default();
            signups.sort_by(|l, r| {
                (l.community_id, &l.display_name).cmp(&(r.community_id, &r.display_name))
            });
            TeamSection {
                team: *team,
                count: signups.len(),
                signups,
            }
        })
        .collect();
    Roster { total, sections }
}

/// Loads every signup and groups it by team.
pub fn load<S: Store>(db: &S) -> Result<Roster, SignupError> {
    db.list_all_signups().map(group_by_team)
}

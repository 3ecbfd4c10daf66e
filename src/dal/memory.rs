//! An in-process store with the same semantics as the database, for tests.

use crate::{
    dal::Store,
    schema::{NewSignup, Signup, SignupError, Team},
};
use antidote::Mutex;
use chrono::Utc;
use failure::err_msg;
use std::{
    collections::BTreeMap,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// A store that keeps signups in memory.
#[derive(Clone)]
pub struct MemoryDB {
    inner: Arc<MemoryDBInner>,
}

struct MemoryDBInner {
    signups: Mutex<BTreeMap<(i64, i64), Signup>>,
    unavailable: AtomicBool,
    writes: Mutex<usize>,
}

impl Default for MemoryDB {
    fn default() -> MemoryDB {
        MemoryDB {
            inner: Arc::new(MemoryDBInner {
                signups: Mutex::new(BTreeMap::new()),
                unavailable: AtomicBool::new(false),
                writes: Mutex::new(0),
            }),
        }
    }
}

impl fmt::Debug for MemoryDB {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("MemoryDB")
            .field("signups", &self.inner.signups.lock().len())
            .field("writes", &self.writes())
            .finish()
    }
}

impl MemoryDB {
    /// Makes every subsequent operation fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// The number of successful writes so far.
    pub fn writes(&self) -> usize {
        *self.inner.writes.lock()
    }

    fn check(&self) -> Result<(), SignupError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            Err(SignupError::storage(err_msg("connection refused")))
        } else {
            Ok(())
        }
    }

    fn sorted<F>(&self, keep: F) -> Vec<Signup>
    where
        F: Fn(&Signup) -> bool,
    {
        let mut signups = self
            .inner
            .signups
            .lock()
            .values()
            .filter(|signup| keep(signup))
            .cloned()
            .collect::<Vec<_>>();
        signups.sort_by(|l, r| {
            (l.community_id, &l.display_name).cmp(&(r.community_id, &r.display_name))
        });
        signups
    }
}

impl Store for MemoryDB {
    fn get_signup(&self, community_id: i64, member_id: i64) -> Result<Option<Signup>, SignupError> {
        self.check()?;
        Ok(self
            .inner
            .signups
            .lock()
            .get(&(community_id, member_id))
            .cloned())
    }

    fn list_signups_by_community(&self, community_id: i64) -> Result<Vec<Signup>, SignupError> {
        self.check()?;
        Ok(self.sorted(|signup| signup.community_id == community_id))
    }

    fn list_all_signups(&self) -> Result<Vec<Signup>, SignupError> {
        self.check()?;
        Ok(self.sorted(|_| true))
    }

    fn upsert_signup(&self, new: &NewSignup) -> Result<Signup, SignupError> {
        self.check()?;
        let signup = Signup {
            community_id: new.community_id,
            member_id: new.member_id,
            account_name: new.account_name.clone(),
            display_name: new.display_name.clone(),
            role_class: new.role_class.clone(),
            gear_level: new.gear_level.clone(),
            availability: new.availability.clone(),
            voice_capability: new.voice_capability.clone(),
            note: new.note.clone(),
            team: new.team,
            submitted_at: new.submitted_at.clone(),
            updated_at: Utc::now(),
        };
        let _ = self
            .inner
            .signups
            .lock()
            .insert((new.community_id, new.member_id), signup.clone());
        *self.inner.writes.lock() += 1;
        Ok(signup)
    }

    fn update_team(
        &self,
        community_id: i64,
        member_id: i64,
        team: Team,
    ) -> Result<(), SignupError> {
        self.check()?;
        match self.inner.signups.lock().get_mut(&(community_id, member_id)) {
            Some(signup) => {
                signup.team = team;
                signup.updated_at = Utc::now();
            }
            None => {
                return Err(SignupError::NotFound {
                    community_id,
                    member_id,
                })
            }
        }
        *self.inner.writes.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_signup(community_id: i64, member_id: i64, display_name: &str) -> NewSignup {
        NewSignup {
            community_id,
            member_id,
            account_name: format!("{}#0001", display_name),
            display_name: display_name.to_string(),
            role_class: String::new(),
            gear_level: String::new(),
            availability: String::new(),
            voice_capability: String::new(),
            note: String::new(),
            team: Team::Unassigned,
            submitted_at: "2026-10-19T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn lists_in_display_name_order() {
        let db = MemoryDB::default();
        for (community, member, name) in &[(2, 1, "zed"), (1, 2, "mia"), (1, 3, "ada"), (2, 4, "bo")]
        {
            let _ = db.upsert_signup(&new_signup(*community, *member, name)).unwrap();
        }

        let names = |signups: Vec<Signup>| {
            signups
                .into_iter()
                .map(|s| s.display_name)
                .collect::<Vec<_>>()
        };
        assert_eq!(
            names(db.list_signups_by_community(1).unwrap()),
            vec!["ada", "mia"]
        );
        assert_eq!(
            names(db.list_all_signups().unwrap()),
            vec!["ada", "mia", "bo", "zed"]
        );
    }

    #[test]
    fn upsert_overwrites_instead_of_duplicating() {
        let db = MemoryDB::default();
        let _ = db.upsert_signup(&new_signup(1, 1, "ada")).unwrap();
        let _ = db.upsert_signup(&new_signup(1, 1, "ada lovelace")).unwrap();
        let all = db.list_all_signups().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].display_name, "ada lovelace");
    }

    #[test]
    fn update_team_on_missing_signup_is_not_found() {
        let db = MemoryDB::default();
        match db.update_team(1, 1, Team::Defense) {
            Err(SignupError::NotFound {
                community_id: 1,
                member_id: 1,
            }) => {}
            r => panic!("unexpected result {:?}", r),
        }
        assert_eq!(db.writes(), 0);
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let db = MemoryDB::default();
        db.set_unavailable(true);
        assert!(matches!(
            db.get_signup(1, 1),
            Err(SignupError::StorageUnavailable(_))
        ));
        assert!(matches!(
            db.upsert_signup(&new_signup(1, 1, "ada")),
            Err(SignupError::StorageUnavailable(_))
        ));
    }
}

//! Bindings to the database.
//!
//! > **DAL**, for lack of a better term (borrowing this one from "data access layer" since I don't
//! > want to use "model"), is the only module that does any talking to the database, or any other
//! > IO or interaction with other kinds of externalized state for that matter.

#[cfg(test)]
pub mod memory;
#[allow(unused_import_braces)]
mod schema;

use crate::{
    dal::schema::signups,
    schema::{NewSignup, Signup, SignupError, Team},
};
use chrono::{DateTime, Utc};
use diesel::{
    dsl::{insert_into, now, update},
    prelude::*,
    r2d2::{ConnectionManager, Pool},
    upsert::excluded,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use failure::{format_err, Error};
use std::sync::Arc;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// The storage operations signups need. Every call is a single short-lived request against the
/// backing store; nothing is cached in between.
pub trait Store: Clone + Send + Sync + 'static {
    /// Gets the signup for a member of a community, if they've registered.
    fn get_signup(&self, community_id: i64, member_id: i64) -> Result<Option<Signup>, SignupError>;

    /// Lists a community's signups, ordered by display name.
    fn list_signups_by_community(&self, community_id: i64) -> Result<Vec<Signup>, SignupError>;

    /// Lists every signup, ordered by community and then display name.
    fn list_all_signups(&self) -> Result<Vec<Signup>, SignupError>;

    /// Inserts a signup, or overwrites every non-key field of the existing one. Either way,
    /// `updated_at` is set to the current time.
    fn upsert_signup(&self, signup: &NewSignup) -> Result<Signup, SignupError>;

    /// Changes only the team (and `updated_at`) of an existing signup. Fails with
    /// `SignupError::NotFound` if there's no such signup.
    fn update_team(&self, community_id: i64, member_id: i64, team: Team)
        -> Result<(), SignupError>;
}

/// A pool of connections to the database.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct DB {
    pool: Arc<Pool<ConnectionManager<PgConnection>>>,
}

impl DB {
    /// Connects to the database with at the given URL, creating the tables if they don't exist.
    pub fn connect(database_url: &str) -> Result<DB, Error> {
        let pool = Arc::new(Pool::new(ConnectionManager::<PgConnection>::new(
            database_url,
        ))?);
        let mut pooled = pool.get()?;
        let conn: &mut PgConnection = &mut pooled;
        let _ = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| format_err!("Couldn't create the tables: {}", err))?;
        Ok(DB { pool })
    }

    /// Runs a query on a pooled connection. Diesel is synchronous, so this blocks; the router
    /// runs store calls through `crate::util::blocking`.
    fn query<F, T>(&self, func: F) -> Result<T, SignupError>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T>,
    {
        let mut conn = self.pool.get().map_err(SignupError::storage)?;
        func(&mut conn).map_err(SignupError::storage)
    }
}

impl Store for DB {
    fn get_signup(&self, community_id: i64, member_id: i64) -> Result<Option<Signup>, SignupError> {
        self.query(move |conn| {
            signups::table
                .find((community_id, member_id))
                .first::<SignupRow>(conn)
                .optional()
        })
        .map(|row| row.map(Signup::from))
    }

    fn list_signups_by_community(&self, community_id: i64) -> Result<Vec<Signup>, SignupError> {
        self.query(move |conn| {
            signups::table
                .filter(signups::community_id.eq(community_id))
                .order(signups::display_name.asc())
                .load::<SignupRow>(conn)
        })
        .map(|rows| rows.into_iter().map(Signup::from).collect())
    }

    fn list_all_signups(&self) -> Result<Vec<Signup>, SignupError> {
        self.query(|conn| {
            signups::table
                .order((signups::community_id.asc(), signups::display_name.asc()))
                .load::<SignupRow>(conn)
        })
        .map(|rows| rows.into_iter().map(Signup::from).collect())
    }

    fn upsert_signup(&self, signup: &NewSignup) -> Result<Signup, SignupError> {
        let values = SignupInsert::from(signup);
        self.query(move |conn| {
            insert_into(signups::table)
                .values(&values)
                .on_conflict((signups::community_id, signups::member_id))
                .do_update()
                .set((
                    signups::account_name.eq(excluded(signups::account_name)),
                    signups::display_name.eq(excluded(signups::display_name)),
                    signups::role_class.eq(excluded(signups::role_class)),
                    signups::gear_level.eq(excluded(signups::gear_level)),
                    signups::availability.eq(excluded(signups::availability)),
                    signups::voice_capability.eq(excluded(signups::voice_capability)),
                    signups::note.eq(excluded(signups::note)),
                    signups::team.eq(excluded(signups::team)),
                    signups::submitted_at.eq(excluded(signups::submitted_at)),
                    signups::updated_at.eq(now),
                ))
                .get_result::<SignupRow>(conn)
        })
        .map(Signup::from)
    }

    fn update_team(
        &self,
        community_id: i64,
        member_id: i64,
        team: Team,
    ) -> Result<(), SignupError> {
        let updated = self.query(move |conn| {
            update(signups::table.find((community_id, member_id)))
                .set((signups::team.eq(team.as_str()), signups::updated_at.eq(now)))
                .execute(conn)
        })?;
        if updated == 0 {
            Err(SignupError::NotFound {
                community_id,
                member_id,
            })
        } else {
            Ok(())
        }
    }
}

/// Adds `sslmode=require` to a connection string that doesn't say what to do about TLS. Handles
/// both URLs and `key=value` connection strings.
pub fn require_tls(database_url: &str) -> String {
    if database_url.contains("sslmode=") {
        database_url.to_string()
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
    {
        let sep = if database_url.contains('?') { '&' } else { '?' };
        format!("{}{}sslmode=require", database_url, sep)
    } else if database_url.trim().is_empty() {
        "sslmode=require".to_string()
    } else {
        format!("{} sslmode=require", database_url.trim_end())
    }
}

#[derive(Queryable)]
struct SignupRow {
    community_id: i64,
    member_id: i64,
    account_name: String,
    display_name: String,
    role_class: String,
    gear_level: String,
    availability: String,
    voice_capability: String,
    note: String,
    team: String,
    submitted_at: String,
    updated_at: DateTime<Utc>,
}

impl From<SignupRow> for Signup {
    fn from(row: SignupRow) -> Signup {
        Signup {
            community_id: row.community_id,
            member_id: row.member_id,
            account_name: row.account_name,
            display_name: row.display_name,
            role_class: row.role_class,
            gear_level: row.gear_level,
            availability: row.availability,
            voice_capability: row.voice_capability,
            note: row.note,
            team: Team::from(row.team),
            submitted_at: row.submitted_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = signups)]
struct SignupInsert<'a> {
    community_id: i64,
    member_id: i64,
    account_name: &'a str,
    display_name: &'a str,
    role_class: &'a str,
    gear_level: &'a str,
    availability: &'a str,
    voice_capability: &'a str,
    note: &'a str,
    team: &'static str,
    submitted_at: &'a str,
}

impl<'a> From<&'a NewSignup> for SignupInsert<'a> {
    fn from(signup: &'a NewSignup) -> SignupInsert<'a> {
        SignupInsert {
            community_id: signup.community_id,
            member_id: signup.member_id,
            account_name: &signup.account_name,
            display_name: &signup.display_name,
            role_class: &signup.role_class,
            gear_level: &signup.gear_level,
            availability: &signup.availability,
            voice_capability: &signup.voice_capability,
            note: &signup.note,
            team: signup.team.as_str(),
            submitted_at: &signup.submitted_at,
        }
    }
}

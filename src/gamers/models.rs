use diesel::prelude::*;
use tracing::instrument;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::{gamers, users};

/// A Gamer is a registered user's profile,
/// every user has exactly one.
#[derive(Debug, Clone, Serialize, Queryable, Identifiable)]
pub struct Gamer {
    pub id: i64,
    pub user_id: i64,
    pub bio: String,
}

#[derive(Debug, Insertable)]
#[table_name = "gamers"]
pub struct NewGamer {
    pub user_id: i64,
    pub bio: String,
}

/// the account fields that are shown on a profile
#[derive(Debug, Serialize, Queryable, PartialEq)]
pub struct ProfileUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

#[derive(Debug, Serialize, Queryable, PartialEq)]
pub struct GamerResponse {
    pub user: ProfileUser,
    pub bio: String,
}

#[derive(Debug, Clone, Serialize, Queryable, PartialEq)]
pub struct OrganizerName {
    pub first_name: String,
    pub last_name: String,
}

/// Organizer is how a gamer is shown on the events they organize
#[derive(Debug, Clone, Serialize, Queryable, PartialEq)]
pub struct Organizer {
    pub id: i64,
    pub user: OrganizerName,
}

impl Gamer {
    /// resolve the authenticated user to their gamer profile
    ///
    /// A user without a profile can't act as a gamer, so this returns
    /// Unauthorized instead of NotFound.
    #[instrument(skip(conn))]
    pub fn find_by_user(user_id: i64, conn: &db::Conn) -> Result<Gamer, ServiceError> {
        let gamer = gamers::table
            .filter(gamers::user_id.eq(user_id))
            .first::<Gamer>(conn)
            .map_err(|error| match ServiceError::from(error) {
                ServiceError::NotFound => {
                    error!("user {} has no gamer profile", user_id);
                    ServiceError::Unauthorized
                }
                error => error,
            })?;

        Ok(gamer)
    }

    /// load the gamer together with their account details
    pub fn profile(&self, conn: &db::Conn) -> Result<GamerResponse, ServiceError> {
        let profile = gamers::table
            .inner_join(users::table)
            .filter(gamers::id.eq(self.id))
            .select((
                (users::first_name, users::last_name, users::username),
                gamers::bio,
            ))
            .first::<GamerResponse>(conn)?;

        Ok(profile)
    }
}

impl NewGamer {
    pub fn save(&self, conn: &db::Conn) -> Result<Gamer, diesel::result::Error> {
        diesel::insert_into(gamers::table)
            .values(self)
            .get_result::<Gamer>(conn)
    }
}

impl Organizer {
    pub fn find(gamer_id: i64, conn: &db::Conn) -> Result<Organizer, ServiceError> {
        let organizer = gamers::table
            .inner_join(users::table)
            .filter(gamers::id.eq(gamer_id))
            .select((gamers::id, (users::first_name, users::last_name)))
            .first::<Organizer>(conn)?;

        Ok(organizer)
    }

    pub fn find_all(gamer_ids: &[i64], conn: &db::Conn) -> Result<Vec<Organizer>, ServiceError> {
        let organizers = gamers::table
            .inner_join(users::table)
            .filter(gamers::id.eq_any(gamer_ids))
            .select((gamers::id, (users::first_name, users::last_name)))
            .load::<Organizer>(conn)?;

        Ok(organizers)
    }
}

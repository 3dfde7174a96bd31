use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use tracing::instrument;

use crate::db;
use crate::errors::ServiceError;
use crate::gamers::{Gamer, GamerResponse};
use crate::schema::{event_attendees, events, games};

#[derive(Debug, Serialize, Queryable, PartialEq)]
pub struct ProfileGame {
    pub title: String,
}

/// The reduced event shown on a profile, whether the gamer attends
/// or hosts it follows from the list it's in.
#[derive(Debug, Serialize, Queryable, PartialEq)]
pub struct ProfileEvent {
    pub id: i64,
    pub game: ProfileGame,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// **GET /profile**
#[derive(Debug, Serialize)]
pub struct Profile {
    pub gamer: GamerResponse,
    pub attending: Vec<ProfileEvent>,
    pub hosting: Vec<ProfileEvent>,
}

impl Profile {
    #[instrument(skip(conn))]
    pub fn load(gamer: &Gamer, conn: &db::Conn) -> Result<Profile, ServiceError> {
        Ok(Profile {
            gamer: gamer.profile(conn)?,
            attending: ProfileEvent::attending(gamer.id, conn)?,
            hosting: ProfileEvent::hosting(gamer.id, conn)?,
        })
    }
}

impl ProfileEvent {
    /// the events this gamer signed up for
    pub fn attending(gamer_id: i64, conn: &db::Conn) -> Result<Vec<ProfileEvent>, ServiceError> {
        let signups = event_attendees::table
            .filter(event_attendees::gamer_id.eq(gamer_id))
            .select(event_attendees::event_id);

        let events = events::table
            .inner_join(games::table)
            .filter(events::id.eq_any(signups))
            .select((
                events::id,
                (games::title,),
                events::description,
                events::date,
                events::time,
            ))
            .order((events::date, events::time, events::id))
            .load::<ProfileEvent>(conn)?;

        Ok(events)
    }

    /// the events this gamer organizes
    pub fn hosting(gamer_id: i64, conn: &db::Conn) -> Result<Vec<ProfileEvent>, ServiceError> {
        let events = events::table
            .inner_join(games::table)
            .filter(events::organizer_id.eq(gamer_id))
            .select((
                events::id,
                (games::title,),
                events::description,
                events::date,
                events::time,
            ))
            .order((events::date, events::time, events::id))
            .load::<ProfileEvent>(conn)?;

        Ok(events)
    }
}

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use tracing::instrument;

use crate::db;
use crate::errors::ServiceError;
use crate::events::{Attendance, EventGame, EventResponse};
use crate::gamers::{Gamer, Organizer};
use crate::games::Game;
use crate::schema::{events, games};
use crate::validator::{text_length, Validate};

#[derive(Debug, Clone, Serialize, Queryable, Identifiable)]
pub struct Event {
    pub id: i64,
    pub game_id: i64,
    pub organizer_id: i64,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

///
/// **POST /events** and **PUT /events/{id}**
///
/// There is no organizer field, the organizer is always the
/// authenticated gamer. Unknown fields are ignored.
///
/// ``` shell
/// curl --location --request POST 'localhost:8080/events' \
///     --header 'Content-Type: application/json' \
///     --data-raw '{
///         "gameId": 1,
///         "description": "Game Day",
///         "date": "2021-12-23",
///         "time": "12:30:00"
///     }'
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "gameId")]
    pub game_id: i64,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Insertable, AsChangeset)]
#[table_name = "events"]
struct EventRecord {
    game_id: i64,
    organizer_id: i64,
    description: String,
    date: NaiveDate,
    time: NaiveTime,
}

/// EventFilter can be used by the client to query for events
#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    /// only list the events that play this game
    #[serde(rename = "gameId")]
    pub game_id: Option<i64>,
}

impl EventMessage {
    fn into_record(self, organizer_id: i64) -> EventRecord {
        EventRecord {
            game_id: self.game_id,
            organizer_id,
            description: self.description.trim().to_string(),
            date: self.date,
            time: self.time,
        }
    }
}

impl Event {
    /// Schedules a new event organized by `organizer`.
    ///
    /// Fails with NotFound when the game doesn't exist, in which case nothing is stored.
    #[instrument(skip(conn))]
    pub fn create(
        message: EventMessage,
        organizer: &Gamer,
        conn: &db::Conn,
    ) -> Result<EventResponse, ServiceError> {
        let game = EventGame::find(message.game_id, conn)?;

        let event = diesel::insert_into(events::table)
            .values(&message.into_record(organizer.id))
            .get_result::<Event>(conn)?;

        let organizer = Organizer::find(organizer.id, conn)?;

        Ok(EventResponse::new(event, game, organizer, Vec::new()))
    }

    pub fn find_by_id(event_id: i64, conn: &db::Conn) -> Result<Event, ServiceError> {
        let event = events::table.find(event_id).first(conn)?;

        Ok(event)
    }

    /// Signing up for, or leaving, an event that doesn't exist is a bad request
    pub fn find_for_signup(event_id: i64, conn: &db::Conn) -> Result<Event, ServiceError> {
        let event = Event::find_by_id(event_id, conn);

        if let Err(ServiceError::NotFound) = event {
            bad_request!("Event does not exist.");
        }

        event
    }

    /// a single event as seen by `viewer`
    #[instrument(skip(conn))]
    pub fn find(
        event_id: i64,
        viewer: &Gamer,
        conn: &db::Conn,
    ) -> Result<EventResponse, ServiceError> {
        let event = Event::find_by_id(event_id, conn)?;

        let game = EventGame::find(event.game_id, conn)?;
        let organizer = Organizer::find(event.organizer_id, conn)?;
        let attendees = Attendance::find_by_event(event.id, conn)?
            .into_iter()
            .map(|attendance| attendance.gamer_id)
            .collect();

        Ok(EventResponse::new(event, game, organizer, attendees).viewed_by(viewer.id))
    }

    /// all events as seen by `viewer`, ordered by when they take place
    #[instrument(skip(conn))]
    pub fn find_all(
        filter: &EventFilter,
        viewer: &Gamer,
        conn: &db::Conn,
    ) -> Result<Vec<EventResponse>, ServiceError> {
        let mut query = events::table
            .order((events::date, events::time, events::id))
            .into_boxed();

        if let Some(game_id) = filter.game_id {
            query = query.filter(events::game_id.eq(game_id));
        }

        let events = query.load::<Event>(conn)?;

        let game_ids = unique(events.iter().map(|event| event.game_id));
        let organizer_ids = unique(events.iter().map(|event| event.organizer_id));
        let event_ids: Vec<i64> = events.iter().map(|event| event.id).collect();

        let games = EventGame::find_all(&game_ids, conn)?;
        let organizers = Organizer::find_all(&organizer_ids, conn)?;
        let attendances = Attendance::find_by_events(&event_ids, conn)?;

        let events = EventResponse::assemble(events, games, organizers, attendances)?
            .into_iter()
            .map(|event| event.viewed_by(viewer.id))
            .collect();

        Ok(events)
    }

    /// Overwrites the event, the organizer becomes the gamer who updated it.
    #[instrument(skip(conn))]
    pub fn update(
        event_id: i64,
        message: EventMessage,
        organizer: &Gamer,
        conn: &db::Conn,
    ) -> Result<(), ServiceError> {
        let event = Event::find_by_id(event_id, conn)?;
        Game::find_by_id(message.game_id, conn)?;

        diesel::update(&event)
            .set(&message.into_record(organizer.id))
            .execute(conn)?;

        Ok(())
    }

    /// Deletes the event and its attendance
    pub fn delete_by_id(event_id: i64, conn: &db::Conn) -> Result<(), ServiceError> {
        let deleted = diesel::delete(events::table.find(event_id)).execute(conn)?;

        if deleted == 0 {
            return Err(ServiceError::NotFound);
        }

        Ok(())
    }
}

impl EventGame {
    pub fn find(game_id: i64, conn: &db::Conn) -> Result<EventGame, ServiceError> {
        let game = games::table
            .find(game_id)
            .select(EVENT_GAME_COLUMNS)
            .first::<EventGame>(conn)?;

        Ok(game)
    }

    pub fn find_all(game_ids: &[i64], conn: &db::Conn) -> Result<Vec<EventGame>, ServiceError> {
        let games = games::table
            .filter(games::id.eq_any(game_ids))
            .select(EVENT_GAME_COLUMNS)
            .load::<EventGame>(conn)?;

        Ok(games)
    }
}

const EVENT_GAME_COLUMNS: (
    games::id,
    games::title,
    games::maker,
    games::number_of_players,
    games::skill_level,
    games::game_type_id,
) = (
    games::id,
    games::title,
    games::maker,
    games::number_of_players,
    games::skill_level,
    games::game_type_id,
);

fn unique(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    ids.collect::<HashSet<i64>>().into_iter().collect()
}

impl Validate for EventMessage {
    fn validate(&self) -> Result<(), ServiceError> {
        text_length("description", &self.description, 150)
    }
}

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};

use crate::errors::ServiceError;
use crate::events::{Attendance, Event};
use crate::gamers::Organizer;

/// the game an event is played with
#[derive(Debug, Clone, Serialize, Queryable, PartialEq)]
pub struct EventGame {
    pub id: i64,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
    #[serde(rename = "game_type")]
    pub game_type_id: i64,
}

/// EventResponse is how events are shown to the client
///
/// ``` json
/// {
///     "id": 1,
///     "game": {
///         "id": 1,
///         "title": "Monopoly",
///         "maker": "Hasbro",
///         "number_of_players": 5,
///         "skill_level": 2,
///         "game_type": 1
///     },
///     "description": "Game Day",
///     "date": "2021-12-23",
///     "time": "12:30:00",
///     "organizer": {
///         "id": 1,
///         "user": { "first_name": "Steve", "last_name": "Brownlee" }
///     },
///     "attendees": [2, 3],
///     "joined": false
/// }
/// ```
///
/// `joined` is only present when the event is shown to a specific gamer.
#[derive(Debug, Serialize, PartialEq)]
pub struct EventResponse {
    pub id: i64,
    pub game: EventGame,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub organizer: Organizer,
    /// gamer ids, ascending
    pub attendees: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined: Option<bool>,
}

impl EventResponse {
    pub fn new(
        event: Event,
        game: EventGame,
        organizer: Organizer,
        mut attendees: Vec<i64>,
    ) -> EventResponse {
        attendees.sort_unstable();
        attendees.dedup();

        EventResponse {
            id: event.id,
            game,
            description: event.description,
            date: event.date,
            time: event.time,
            organizer,
            attendees,
            joined: None,
        }
    }

    /// sets `joined` to whether this gamer attends the event
    pub fn viewed_by(mut self, gamer_id: i64) -> EventResponse {
        self.joined = Some(self.attendees.binary_search(&gamer_id).is_ok());
        self
    }

    /// Combine events with their games, organizers and attendance,
    /// keeping the order of `events`.
    ///
    /// Every game and organizer an event refers to has to be present.
    pub fn assemble(
        events: Vec<Event>,
        games: Vec<EventGame>,
        organizers: Vec<Organizer>,
        attendances: Vec<Attendance>,
    ) -> Result<Vec<EventResponse>, ServiceError> {
        let games: HashMap<i64, EventGame> =
            games.into_iter().map(|game| (game.id, game)).collect();
        let organizers: HashMap<i64, Organizer> = organizers
            .into_iter()
            .map(|organizer| (organizer.id, organizer))
            .collect();

        let mut attendees: HashMap<i64, Vec<i64>> = HashMap::new();
        for attendance in attendances {
            attendees
                .entry(attendance.event_id)
                .or_default()
                .push(attendance.gamer_id);
        }

        events
            .into_iter()
            .map(|event| {
                let game = match games.get(&event.game_id) {
                    Some(game) => game.clone(),
                    None => {
                        error!("event {} refers to missing game {}", event.id, event.game_id);
                        return Err(ServiceError::InternalServerError);
                    }
                };

                let organizer = match organizers.get(&event.organizer_id) {
                    Some(organizer) => organizer.clone(),
                    None => {
                        error!(
                            "event {} refers to missing organizer {}",
                            event.id, event.organizer_id
                        );
                        return Err(ServiceError::InternalServerError);
                    }
                };

                let attendees = attendees.remove(&event.id).unwrap_or_default();

                Ok(EventResponse::new(event, game, organizer, attendees))
            })
            .collect()
    }
}

use diesel::prelude::*;
use tracing::instrument;

use crate::db;
use crate::errors::ServiceError;
use crate::game_types::GameType;
use crate::schema::games;
use crate::validator::{text_length, Validate};

#[derive(Debug, Clone, Serialize, Queryable, Identifiable)]
pub struct Game {
    pub id: i64,
    #[serde(rename = "game_type")]
    pub game_type_id: i64,
    pub title: String,
    pub maker: String,
    /// the gamer who created this game
    #[serde(rename = "gamer")]
    pub gamer_id: i64,
    pub number_of_players: i32,
    pub skill_level: i32,
}

///
/// **POST /games** and **PUT /games/{id}**
///
/// This struct is used to create and update games.
///
/// The creator is never read from the body, it's the authenticated gamer.
///
/// ``` shell
/// curl --location --request POST 'localhost:8080/games' \
///     --header 'Content-Type: application/json' \
///     --data-raw '{
///         "gameTypeId": 1,
///         "title": "Monopoly",
///         "maker": "Hasbro",
///         "numberOfPlayers": 5,
///         "skillLevel": 2
///     }'
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMessage {
    pub game_type_id: i64,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
}

#[derive(Debug, Insertable, AsChangeset)]
#[table_name = "games"]
struct GameRecord {
    game_type_id: i64,
    title: String,
    maker: String,
    gamer_id: i64,
    number_of_players: i32,
    skill_level: i32,
}

/// GameFilter can be used by the client to query for games
#[derive(Debug, Deserialize)]
pub struct GameFilter {
    /// only list games of this type
    #[serde(rename = "gameTypeId")]
    pub game_type_id: Option<i64>,
}

impl GameMessage {
    fn into_record(self, gamer_id: i64) -> GameRecord {
        GameRecord {
            game_type_id: self.game_type_id,
            title: self.title.trim().to_string(),
            maker: self.maker.trim().to_string(),
            gamer_id,
            number_of_players: self.number_of_players,
            skill_level: self.skill_level,
        }
    }
}

impl Game {
    /// Creates a new game owned by `gamer_id`,
    /// fails with NotFound when the game type doesn't exist.
    #[instrument(skip(conn))]
    pub fn create(
        message: GameMessage,
        gamer_id: i64,
        conn: &db::Conn,
    ) -> Result<Game, ServiceError> {
        GameType::find_by_id(message.game_type_id, conn)?;

        let game = diesel::insert_into(games::table)
            .values(&message.into_record(gamer_id))
            .get_result::<Game>(conn)?;

        Ok(game)
    }

    pub fn find_by_id(game_id: i64, conn: &db::Conn) -> Result<Game, ServiceError> {
        let game = games::table.find(game_id).first(conn)?;

        Ok(game)
    }

    pub fn find_all(filter: GameFilter, conn: &db::Conn) -> Result<Vec<Game>, ServiceError> {
        let mut query = games::table.order(games::title).into_boxed();

        if let Some(id) = filter.game_type_id {
            query = query.filter(games::game_type_id.eq(id));
        }

        let games = query.load::<Game>(conn)?;

        Ok(games)
    }

    /// returns true if this gamer created the game
    pub fn is_owner(&self, gamer_id: i64) -> bool {
        self.gamer_id == gamer_id
    }

    #[instrument(skip(conn))]
    pub fn update(&self, message: GameMessage, conn: &db::Conn) -> Result<(), ServiceError> {
        GameType::find_by_id(message.game_type_id, conn)?;

        diesel::update(self)
            .set(&message.into_record(self.gamer_id))
            .execute(conn)?;

        Ok(())
    }

    /// Deleting a game also deletes the events that are played with it.
    pub fn delete(&self, conn: &db::Conn) -> Result<(), ServiceError> {
        diesel::delete(self).execute(conn)?;

        Ok(())
    }
}

impl Validate for GameMessage {
    fn validate(&self) -> Result<(), ServiceError> {
        text_length("title", &self.title, 60)?;
        text_length("maker", &self.maker, 60)?;

        if self.number_of_players < 1 {
            invalid!("a game needs at least one player");
        }

        if self.skill_level < 1 {
            invalid!("the skill level should be at least 1");
        }

        Ok(())
    }
}

use diesel::prelude::*;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::game_types;
use crate::validator::{text_length, Validate};

/// GameType classifies a game, e.g. "Board game"
#[derive(Debug, Clone, Serialize, Queryable, Identifiable)]
pub struct GameType {
    pub id: i64,
    pub label: String,
}

///
/// **POST /gametypes**
///
/// ``` shell
/// curl --location --request POST 'localhost:8080/gametypes' \
///     --header 'Content-Type: application/json' \
///     --data-raw '{ "label": "Board game" }'
/// ```
#[derive(Debug, Deserialize, Insertable)]
#[table_name = "game_types"]
pub struct CreateGameType {
    pub label: String,
}

impl GameType {
    pub fn find_all(conn: &db::Conn) -> Result<Vec<GameType>, ServiceError> {
        let game_types = game_types::table
            .order(game_types::label)
            .load::<GameType>(conn)?;

        Ok(game_types)
    }

    pub fn find_by_id(id: i64, conn: &db::Conn) -> Result<GameType, ServiceError> {
        let game_type = game_types::table.find(id).first(conn)?;

        Ok(game_type)
    }
}

impl CreateGameType {
    fn trimmed(&self) -> CreateGameType {
        CreateGameType {
            label: self.label.trim().to_string(),
        }
    }

    pub fn save(&self, conn: &db::Conn) -> Result<GameType, ServiceError> {
        let game_type = diesel::insert_into(game_types::table)
            .values(&self.trimmed())
            .get_result::<GameType>(conn)?;

        Ok(game_type)
    }
}

impl Validate for CreateGameType {
    fn validate(&self) -> Result<(), ServiceError> {
        text_length("label", &self.label, 55)
    }
}

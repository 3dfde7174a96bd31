use actix_identity::Identity;
use actix_web::web;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, put};

use crate::auth;
use crate::db;
use crate::gamers::Gamer;
use crate::games::{Game, GameFilter, GameMessage};
use crate::server::Response;
use crate::validator::Validator;

#[get("/games")]
async fn find_all(filter: Query<GameFilter>, pool: Data<db::Pool>, id: Identity) -> Response {
    auth::get_user_id(&id)?;
    let filter = filter.into_inner();

    let games = web::block(move || Game::find_all(filter, &pool.get()?)).await?;

    http_ok_json!(games);
}

#[get("/games/{id}")]
async fn find(game_id: Path<i64>, pool: Data<db::Pool>, id: Identity) -> Response {
    auth::get_user_id(&id)?;
    let game_id = game_id.into_inner();

    let game = web::block(move || Game::find_by_id(game_id, &pool.get()?)).await?;

    http_ok_json!(game);
}

#[post("/games")]
async fn create(
    game: Json<Validator<GameMessage>>,
    pool: Data<db::Pool>,
    id: Identity,
) -> Response {
    let user_id = auth::get_user_id(&id)?;
    let game = game.into_inner().validate()?;

    let game = web::block(move || {
        let conn = pool.get()?;
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        Game::create(game, gamer.id, &conn)
    })
    .await?;

    http_created_json!(game);
}

#[put("/games/{id}")]
async fn update(
    game_id: Path<i64>,
    game: Json<Validator<GameMessage>>,
    pool: Data<db::Pool>,
    id: Identity,
) -> Response {
    let user_id = auth::get_user_id(&id)?;
    let game_id = game_id.into_inner();
    let message = game.into_inner().validate()?;

    web::block(move || {
        let conn = pool.get()?;
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        let game = Game::find_by_id(game_id, &conn)?;
        if !game.is_owner(gamer.id) {
            forbidden!("Only the creator of a game can update it");
        }
        game.update(message, &conn)
    })
    .await?;

    http_no_content!();
}

#[delete("/games/{id}")]
async fn delete(game_id: Path<i64>, pool: Data<db::Pool>, id: Identity) -> Response {
    let user_id = auth::get_user_id(&id)?;
    let game_id = game_id.into_inner();

    web::block(move || {
        let conn = pool.get()?;
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        let game = Game::find_by_id(game_id, &conn)?;
        if !game.is_owner(gamer.id) {
            forbidden!("Only the creator of a game can delete it");
        }
        game.delete(&conn)
    })
    .await?;

    http_no_content!();
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all);
    cfg.service(find);
    cfg.service(create);
    cfg.service(update);
    cfg.service(delete);
}

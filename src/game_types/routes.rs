use actix_identity::Identity;
use actix_web::web;
use actix_web::web::{Data, Json, Path};
use actix_web::{get, post};

use crate::auth;
use crate::db;
use crate::game_types::{CreateGameType, GameType};
use crate::server::Response;
use crate::validator::Validator;

#[get("/gametypes")]
async fn find_all(pool: Data<db::Pool>, id: Identity) -> Response {
    auth::get_user_id(&id)?;

    let game_types = web::block(move || GameType::find_all(&pool.get()?)).await?;

    http_ok_json!(game_types);
}

#[get("/gametypes/{id}")]
async fn find(game_type_id: Path<i64>, pool: Data<db::Pool>, id: Identity) -> Response {
    auth::get_user_id(&id)?;
    let game_type_id = game_type_id.into_inner();

    let game_type = web::block(move || GameType::find_by_id(game_type_id, &pool.get()?)).await?;

    http_ok_json!(game_type);
}

#[post("/gametypes")]
async fn create(
    game_type: Json<Validator<CreateGameType>>,
    pool: Data<db::Pool>,
    id: Identity,
) -> Response {
    auth::get_user_id(&id)?;
    let game_type = game_type.into_inner().validate()?;

    let game_type = web::block(move || game_type.save(&pool.get()?)).await?;

    http_created_json!(game_type);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all);
    cfg.service(find);
    cfg.service(create);
}

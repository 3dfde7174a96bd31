use actix_identity::Identity;
use actix_web::get;
use actix_web::web;
use actix_web::web::Data;

use crate::auth;
use crate::db;
use crate::gamers::Gamer;
use crate::profile::Profile;
use crate::server::Response;

#[get("/profile")]
async fn find_mine(pool: Data<db::Pool>, id: Identity) -> Response {
    let user_id = auth::get_user_id(&id)?;

    let profile = web::block(move || {
        let conn = pool.get()?;
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        Profile::load(&gamer, &conn)
    })
    .await?;

    http_ok_json!(profile);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_mine);
}

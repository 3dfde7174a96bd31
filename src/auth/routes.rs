use actix_identity::Identity;
use actix_web::web::{Data, Json};
use actix_web::{post, web, HttpResponse};
use serde_json::json;

use crate::auth;
use crate::auth::{Credentials, Registration};
use crate::db;
use crate::errors::ServiceError;
use crate::server::Response;
use crate::users::User;
use crate::validator::Validator;

#[post("/register")]
async fn register(
    registration: Json<Validator<Registration>>,
    id: Identity,
    pool: Data<db::Pool>,
) -> Response {
    let registration = registration.into_inner().validate()?;

    let (gamer, profile) = web::block(move || {
        let conn = pool.get()?;
        let gamer = registration.save(&conn)?;
        let profile = gamer.profile(&conn)?;
        Ok::<_, ServiceError>((gamer, profile))
    })
    .await?;

    info!("registered gamer {}", gamer.id);
    auth::remember(&id, gamer.user_id);

    http_created_json!(profile);
}

#[post("/login")]
async fn login(credentials: Json<Credentials>, id: Identity, pool: Data<db::Pool>) -> Response {
    let credentials = credentials.into_inner();

    let user = web::block(move || {
        let conn = pool.get()?;
        let user = User::find_by_username(&credentials.username, &conn).map_err(
            |error| match error {
                ServiceError::NotFound => ServiceError::Unauthorized,
                _ => error,
            },
        )?;

        user.verify_password(credentials.password.as_bytes())?;

        Ok::<_, ServiceError>(user)
    })
    .await?;

    auth::remember(&id, user.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully signed in" })))
}

#[post("/logout")]
async fn logout(id: Identity) -> Response {
    auth::get_user_id(&id)?;

    id.forget();

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully signed out" })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register);
    cfg.service(login);
    cfg.service(logout);
}

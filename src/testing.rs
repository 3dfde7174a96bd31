//! Helpers for the tests that need a PostgreSQL database in `DATABASE_URL`,
//! run them with `cargo test -- --ignored`.
use std::sync::Once;

use diesel::prelude::*;

use crate::db;
use crate::schema::{game_types, gamers, games, users};

pub const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

static MIGRATE: Once = Once::new();

pub fn pool() -> db::Pool {
    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL is not set");
    MIGRATE.call_once(|| {
        db::migrate(&database_url).expect("unable to migrate the test database");
    });
    db::build_connection_pool(&database_url).expect("unable to connect to the test database")
}

/// a unique username, so the tests can share a database
pub fn username(prefix: &str) -> String {
    let suffix: u32 = rand::random();
    format!("{}-{}", prefix, suffix % 1_000_000)
}

pub fn gamer_id(username: &str, pool: &db::Pool) -> i64 {
    gamers::table
        .inner_join(users::table)
        .filter(users::username.eq(username))
        .select(gamers::id)
        .first(&pool.get().unwrap())
        .unwrap()
}

/// seeds "Board game" and "Monopoly", owned by the given gamer
pub fn seed_game(gamer_id: i64, pool: &db::Pool) -> i64 {
    let conn = pool.get().unwrap();

    let game_type_id: i64 = diesel::insert_into(game_types::table)
        .values(game_types::label.eq("Board game"))
        .returning(game_types::id)
        .get_result(&conn)
        .unwrap();

    diesel::insert_into(games::table)
        .values((
            games::game_type_id.eq(game_type_id),
            games::title.eq("Monopoly"),
            games::maker.eq("Hasbro"),
            games::gamer_id.eq(gamer_id),
            games::number_of_players.eq(5),
            games::skill_level.eq(2),
        ))
        .returning(games::id)
        .get_result(&conn)
        .unwrap()
}

pub fn event_body(game_id: i64) -> serde_json::Value {
    serde_json::json!({
        "date": "2021-12-23",
        "time": "12:30:00",
        "description": "Game Day",
        "gameId": game_id
    })
}

/// an app with the account routes and the given route configurations
macro_rules! test_app {
    ($pool:expr, $($configure:expr),+) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .data($pool.clone())
                .wrap(crate::auth::identity_service(crate::testing::KEY))
                .app_data(crate::server::json_config())
                .app_data(crate::server::query_config())
                .app_data(crate::server::path_config())
                .configure(crate::auth::routes::init_routes)
                $(.configure($configure))+,
        )
        .await
    };
}

/// registers a gamer, returns their identity cookie and gamer id
macro_rules! register_gamer {
    ($app:expr, $pool:expr, $name:expr) => {{
        let username = crate::testing::username($name);
        let request = actix_web::test::TestRequest::post()
            .uri("/register")
            .set_json(&serde_json::json!({
                "username": username,
                "password": "Admin8*!",
                "email": "steve@stevebrownlee.com",
                "first_name": "Steve",
                "last_name": "Brownlee",
                "bio": "Love those gamez!!"
            }))
            .to_request();

        let response = actix_web::test::call_service(&mut $app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);

        let cookie = response
            .response()
            .cookies()
            .next()
            .expect("registering should log the gamer in")
            .into_owned();

        (cookie, crate::testing::gamer_id(&username, &$pool))
    }};
}

/// creates an event for the game as the gamer behind the cookie, returns its id
macro_rules! create_event {
    ($app:expr, $cookie:expr, $game_id:expr) => {{
        let request = actix_web::test::TestRequest::post()
            .uri("/events")
            .cookie($cookie)
            .set_json(&crate::testing::event_body($game_id))
            .to_request();
        let response = actix_web::test::call_service(&mut $app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);

        let event: serde_json::Value = actix_web::test::read_body_json(response).await;
        event["id"].as_i64().expect("events have an id")
    }};
}

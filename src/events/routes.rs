use actix_identity::Identity;
use actix_web::web;
use actix_web::web::{Data, HttpResponse, Json, Path, Query};
use actix_web::{delete, get, post, put};

use crate::auth;
use crate::db;
use crate::events::{Attendance, Event, EventFilter, EventMessage};
use crate::gamers::Gamer;
use crate::server::Response;
use crate::validator::Validator;

#[get("/events")]
async fn find_all(filter: Query<EventFilter>, pool: Data<db::Pool>, id: Identity) -> Response {
    let user_id = auth::get_user_id(&id)?;
    let filter = filter.into_inner();

    let events = web::block(move || {
        let conn = pool.get()?;
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        Event::find_all(&filter, &gamer, &conn)
    })
    .await?;

    http_ok_json!(events);
}

#[get("/events/{id}")]
async fn find(event_id: Path<i64>, pool: Data<db::Pool>, id: Identity) -> Response {
    let user_id = auth::get_user_id(&id)?;
    let event_id = event_id.into_inner();

    let event = web::block(move || {
        let conn = pool.get()?;
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        Event::find(event_id, &gamer, &conn)
    })
    .await?;

    http_ok_json!(event);
}

#[post("/events")]
async fn create(
    event: Json<Validator<EventMessage>>,
    pool: Data<db::Pool>,
    id: Identity,
) -> Response {
    let user_id = auth::get_user_id(&id)?;
    let message = event.into_inner().validate()?;

    let event = web::block(move || {
        let conn = pool.get()?;
        let organizer = Gamer::find_by_user(user_id, &conn)?;
        Event::create(message, &organizer, &conn)
    })
    .await?;

    http_created_json!(event);
}

#[put("/events/{id}")]
async fn update(
    event_id: Path<i64>,
    event: Json<Validator<EventMessage>>,
    pool: Data<db::Pool>,
    id: Identity,
) -> Response {
    let user_id = auth::get_user_id(&id)?;
    let event_id = event_id.into_inner();
    let message = event.into_inner().validate()?;

    web::block(move || {
        let conn = pool.get()?;
        let organizer = Gamer::find_by_user(user_id, &conn)?;
        Event::update(event_id, message, &organizer, &conn)
    })
    .await?;

    http_no_content!();
}

#[delete("/events/{id}")]
async fn delete(event_id: Path<i64>, pool: Data<db::Pool>, id: Identity) -> Response {
    auth::get_user_id(&id)?;
    let event_id = event_id.into_inner();

    web::block(move || Event::delete_by_id(event_id, &pool.get()?)).await?;

    http_no_content!();
}

#[post("/events/{id}/signup")]
async fn signup(event_id: Path<i64>, pool: Data<db::Pool>, id: Identity) -> Response {
    let user_id = auth::get_user_id(&id)?;
    let event_id = event_id.into_inner();

    web::block(move || {
        let conn = pool.get()?;
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        let event = Event::find_for_signup(event_id, &conn)?;
        Attendance::new(event.id, gamer.id).save(&conn)
    })
    .await?;

    Ok(HttpResponse::Created().finish())
}

#[delete("/events/{id}/signup")]
async fn leave(event_id: Path<i64>, pool: Data<db::Pool>, id: Identity) -> Response {
    let user_id = auth::get_user_id(&id)?;
    let event_id = event_id.into_inner();

    web::block(move || {
        let conn = pool.get()?;
        let gamer = Gamer::find_by_user(user_id, &conn)?;
        let event = Event::find_for_signup(event_id, &conn)?;
        Attendance::new(event.id, gamer.id).delete(&conn)
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
    cfg.service(signup);
    cfg.service(leave);
}

/// These tests need a PostgreSQL database in `DATABASE_URL`,
/// run them with `cargo test -- --ignored`.
#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use diesel::prelude::*;
    use serde_json::{json, Value};

    use crate::db;
    use crate::schema::{gamers, games};
    use crate::testing::{event_body, pool, seed_game};

    #[actix_rt::test]
    #[ignore]
    async fn create_event() {
        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (cookie, steve) = register_gamer!(app, pool, "steve");
        let monopoly = seed_game(steve, &pool);

        let mut body = event_body(monopoly);
        body["organizer"] = json!(steve + 1000);

        let request = test::TestRequest::post()
            .uri("/events")
            .cookie(cookie)
            .set_json(&body)
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let event: Value = test::read_body_json(response).await;
        assert!(event["id"].is_i64());
        assert_eq!(event["date"], json!("2021-12-23"));
        assert_eq!(event["time"], json!("12:30:00"));
        assert_eq!(event["description"], json!("Game Day"));
        assert_eq!(event["game"]["id"], json!(monopoly));
        assert_eq!(event["organizer"]["id"], json!(steve));
    }

    #[actix_rt::test]
    #[ignore]
    async fn create_event_for_a_missing_game() {
        use crate::schema::events;

        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (cookie, steve) = register_gamer!(app, pool, "steve");

        let request = test::TestRequest::post()
            .uri("/events")
            .cookie(cookie)
            .set_json(&event_body(-1))
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let conn = pool.get().unwrap();
        let count: i64 = events::table
            .filter(events::organizer_id.eq(steve))
            .count()
            .get_result(&conn)
            .unwrap();
        assert_eq!(count, 0);
    }

    #[actix_rt::test]
    #[ignore]
    async fn create_event_with_a_malformed_body() {
        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (cookie, _) = register_gamer!(app, pool, "steve");

        let request = test::TestRequest::post()
            .uri("/events")
            .cookie(cookie)
            .set_json(&json!({ "description": "Game Day", "date": "2021-12-23" }))
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert!(body["reason"].is_string());
    }

    #[actix_rt::test]
    #[ignore]
    async fn get_event() {
        use crate::schema::events;

        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (cookie, steve) = register_gamer!(app, pool, "steve");
        let game = seed_game(steve, &pool);

        let event_id: i64 = diesel::insert_into(events::table)
            .values((
                events::organizer_id.eq(steve),
                events::game_id.eq(game),
                events::description.eq("Playing Azul"),
                events::date.eq(chrono::NaiveDate::from_ymd(2021, 12, 20)),
                events::time.eq(chrono::NaiveTime::from_hms(11, 0, 0)),
            ))
            .returning(events::id)
            .get_result(&pool.get().unwrap())
            .unwrap();

        let request = test::TestRequest::get()
            .uri(&format!("/events/{}", event_id))
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let event: Value = test::read_body_json(response).await;
        assert_eq!(event["date"], json!("2021-12-20"));
        assert_eq!(event["time"], json!("11:00:00"));
        assert_eq!(event["description"], json!("Playing Azul"));
        assert_eq!(event["organizer"]["id"], json!(steve));
        assert_eq!(event["game"]["id"], json!(game));
        assert_eq!(event["joined"], json!(false));
    }

    #[actix_rt::test]
    #[ignore]
    async fn get_missing_event() {
        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (cookie, _) = register_gamer!(app, pool, "steve");

        let request = test::TestRequest::get()
            .uri("/events/-1")
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    #[ignore]
    async fn malformed_game_filter() {
        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (cookie, _) = register_gamer!(app, pool, "steve");

        let request = test::TestRequest::get()
            .uri("/events?gameId=abc")
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert!(body["reason"].is_string());
    }

    #[actix_rt::test]
    #[ignore]
    async fn signup_for_a_missing_event() {
        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (cookie, _) = register_gamer!(app, pool, "steve");

        let request = test::TestRequest::post()
            .uri("/events/-1/signup")
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body, json!({ "message": "Event does not exist." }));
    }

    #[actix_rt::test]
    #[ignore]
    async fn signup_and_leave() {
        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (steve_cookie, steve) = register_gamer!(app, pool, "steve");
        let game = seed_game(steve, &pool);

        let event_id = create_event!(app, steve_cookie, game);
        let uri = format!("/events/{}", event_id);
        let signup_uri = format!("{}/signup", uri);

        let (cookie, joe) = register_gamer!(app, pool, "joe");

        // signing up twice is the same as signing up once
        for _ in 0..2 {
            let request = test::TestRequest::post()
                .uri(&signup_uri)
                .cookie(cookie.clone())
                .to_request();
            let response = test::call_service(&mut app, request).await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let request = test::TestRequest::get()
            .uri(&uri)
            .cookie(cookie.clone())
            .to_request();
        let event: Value = test::read_body_json(test::call_service(&mut app, request).await).await;
        assert_eq!(event["attendees"], json!([joe]));
        assert_eq!(event["joined"], json!(true));

        // leaving twice is the same as leaving once
        for _ in 0..2 {
            let request = test::TestRequest::delete()
                .uri(&signup_uri)
                .cookie(cookie.clone())
                .to_request();
            let response = test::call_service(&mut app, request).await;
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
        }

        let request = test::TestRequest::get()
            .uri(&uri)
            .cookie(cookie)
            .to_request();
        let event: Value = test::read_body_json(test::call_service(&mut app, request).await).await;
        assert_eq!(event["attendees"], json!([]));
        assert_eq!(event["joined"], json!(false));
    }

    #[actix_rt::test]
    #[ignore]
    async fn list_events_by_game() {
        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (cookie, steve) = register_gamer!(app, pool, "steve");
        let monopoly = seed_game(steve, &pool);
        let other = seed_game(steve, &pool);

        for game in &[monopoly, other, monopoly] {
            create_event!(app, cookie.clone(), *game);
        }

        let request = test::TestRequest::get()
            .uri(&format!("/events?gameId={}", monopoly))
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let events: Vec<Value> = test::read_body_json(response).await;
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|event| event["game"]["id"] == json!(monopoly) && event["joined"] == json!(false)));
    }

    #[actix_rt::test]
    #[ignore]
    async fn list_shows_the_events_a_gamer_joined() {
        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (steve_cookie, steve) = register_gamer!(app, pool, "steve");
        let game = seed_game(steve, &pool);

        let joined = create_event!(app, steve_cookie.clone(), game);
        let skipped = create_event!(app, steve_cookie, game);

        let (cookie, joe) = register_gamer!(app, pool, "joe");

        let request = test::TestRequest::post()
            .uri(&format!("/events/{}/signup", joined))
            .cookie(cookie.clone())
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let request = test::TestRequest::get()
            .uri(&format!("/events?gameId={}", game))
            .cookie(cookie)
            .to_request();
        let events: Vec<Value> =
            test::read_body_json(test::call_service(&mut app, request).await).await;
        assert_eq!(events.len(), 2);

        for event in &events {
            if event["id"] == json!(joined) {
                assert_eq!(event["joined"], json!(true));
                assert_eq!(event["attendees"], json!([joe]));
            } else {
                assert_eq!(event["id"], json!(skipped));
                assert_eq!(event["joined"], json!(false));
                assert_eq!(event["attendees"], json!([]));
            }
        }
    }

    #[actix_rt::test]
    #[ignore]
    async fn update_and_delete_event() {
        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (steve_cookie, steve) = register_gamer!(app, pool, "steve");
        let game = seed_game(steve, &pool);

        let event_id = create_event!(app, steve_cookie, game);
        let uri = format!("/events/{}", event_id);

        let (cookie, joe) = register_gamer!(app, pool, "joe");

        let request = test::TestRequest::put()
            .uri(&uri)
            .cookie(cookie.clone())
            .set_json(&json!({
                "date": "2022-01-02",
                "time": "18:00:00",
                "description": "Rematch",
                "gameId": game
            }))
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = test::TestRequest::get()
            .uri(&uri)
            .cookie(cookie.clone())
            .to_request();
        let event: Value = test::read_body_json(test::call_service(&mut app, request).await).await;
        assert_eq!(event["description"], json!("Rematch"));
        assert_eq!(event["date"], json!("2022-01-02"));
        assert_eq!(event["organizer"]["id"], json!(joe));

        let request = test::TestRequest::delete()
            .uri(&uri)
            .cookie(cookie.clone())
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = test::TestRequest::delete()
            .uri(&uri)
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&mut app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    #[ignore]
    async fn deleting_a_game_or_gamer_deletes_their_events() {
        use crate::schema::events;

        let pool = pool();
        let mut app = test_app!(pool, super::register);

        let (cookie, steve) = register_gamer!(app, pool, "steve");
        let monopoly = seed_game(steve, &pool);
        let other = seed_game(steve, &pool);

        for game in &[monopoly, other] {
            create_event!(app, cookie.clone(), *game);
        }

        let conn = pool.get().unwrap();
        let count = |conn: &db::Conn| -> i64 {
            events::table
                .filter(events::organizer_id.eq(steve))
                .count()
                .get_result(conn)
                .unwrap()
        };
        assert_eq!(count(&conn), 2);

        diesel::delete(games::table.find(monopoly))
            .execute(&conn)
            .unwrap();
        assert_eq!(count(&conn), 1);

        diesel::delete(gamers::table.find(steve))
            .execute(&conn)
            .unwrap();
        assert_eq!(count(&conn), 0);
    }
}

table! {
    event_attendees (event_id, gamer_id) {
        event_id -> Int8,
        gamer_id -> Int8,
    }
}

table! {
    events (id) {
        id -> Int8,
        game_id -> Int8,
        organizer_id -> Int8,
        description -> Varchar,
        date -> Date,
        time -> Time,
    }
}

table! {
    game_types (id) {
        id -> Int8,
        label -> Varchar,
    }
}

table! {
    gamers (id) {
        id -> Int8,
        user_id -> Int8,
        bio -> Varchar,
    }
}

table! {
    games (id) {
        id -> Int8,
        game_type_id -> Int8,
        title -> Varchar,
        maker -> Varchar,
        gamer_id -> Int8,
        number_of_players -> Int4,
        skill_level -> Int4,
    }
}

table! {
    users (id) {
        id -> Int8,
        username -> Varchar,
        password -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

joinable!(event_attendees -> events (event_id));
joinable!(event_attendees -> gamers (gamer_id));
joinable!(events -> games (game_id));
joinable!(games -> game_types (game_type_id));
joinable!(gamers -> users (user_id));

allow_tables_to_appear_in_same_query!(
    event_attendees,
    events,
    game_types,
    gamers,
    games,
    users,
);

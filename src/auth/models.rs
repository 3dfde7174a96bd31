use diesel::prelude::*;
use regex::Regex;

use crate::db;
use crate::errors::ServiceError;
use crate::gamers::{Gamer, NewGamer};
use crate::users::NewUser;

///
/// **POST /register**
///
/// Creates a user and their gamer profile, and logs them in.
///
/// ``` shell
/// curl --location --request POST 'localhost:8080/register' \
///     --header 'Content-Type: application/json' \
///     --data-raw '{
///         "username": "steve",
///         "password": "Admin8*!",
///         "email": "steve@stevebrownlee.com",
///         "first_name": "Steve",
///         "last_name": "Brownlee",
///         "bio": "Love those gamez!!"
///     }'
/// ```
#[derive(Debug, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
}

/// **POST /login**
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Registration {
    /// Stores the user and their gamer profile in a transaction.
    ///
    /// When something fails, the transaction rolls-back, returns an error
    /// and nothing will have happened.
    pub fn save(self, conn: &db::Conn) -> Result<Gamer, ServiceError> {
        let mut user = NewUser {
            username: self.username,
            password: self.password,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
        };
        user.hash_password()?;

        let bio = self.bio.trim().to_string();

        let gamer = conn.transaction::<Gamer, diesel::result::Error, _>(|| {
            let user = user.save(conn)?;

            NewGamer {
                user_id: user.id,
                bio,
            }
            .save(conn)
        })?;

        Ok(gamer)
    }
}

impl crate::validator::Validate for Registration {
    fn validate(&self) -> Result<(), ServiceError> {
        lazy_static! {
            static ref USERNAME_PATTERN: Regex =
                Regex::new(r"^[0-9A-Za-z-_]+$").expect("invalid username regex");
        }

        if self.username.trim().is_empty() {
            invalid!("username is too short");
        }

        if self.username.trim().len() > 20 {
            invalid!("username is too long, max 20 characters");
        }

        if !USERNAME_PATTERN.is_match(&self.username) {
            invalid!("username can only contain letters, numbers, '-' and '_'");
        }

        if self.password.len() < 8 {
            invalid!("your password should at least be 8 characters long");
        }

        if self.first_name.chars().count() > 150 || self.last_name.chars().count() > 150 {
            invalid!("names are limited to 150 characters");
        }

        if self.bio.chars().count() > 50 {
            invalid!("your bio is too long, max 50 characters");
        }

        Ok(())
    }
}

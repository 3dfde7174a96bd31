use argon2::Config;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rand::Rng;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::users;

#[derive(Serialize, Queryable, Identifiable, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// NewUser is the account half of a registration,
/// the password is hashed before it's stored.
#[derive(Debug, Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    pub fn find_by_username(username: &str, conn: &db::Conn) -> Result<Self, ServiceError> {
        let user = users::table
            .filter(users::username.eq(username))
            .first(conn)?;

        Ok(user)
    }

    pub fn verify_password(&self, password: &[u8]) -> Result<(), ServiceError> {
        let is_match = argon2::verify_encoded(&self.password, password)?;

        if !is_match {
            return Err(ServiceError::Unauthorized);
        }

        Ok(())
    }
}

impl NewUser {
    /// Store the user, this has to return the actual database error
    /// because it's used in the registration transaction.
    pub fn save(&self, conn: &db::Conn) -> Result<User, diesel::result::Error> {
        diesel::insert_into(users::table)
            .values(self)
            .get_result::<User>(conn)
    }

    pub fn hash_password(&mut self) -> Result<(), ServiceError> {
        self.password = hash(&self.password)?;
        Ok(())
    }
}

fn hash(password: &str) -> Result<String, ServiceError> {
    let salt: [u8; 32] = rand::thread_rng().gen();
    let config = Config::default();

    let hash = argon2::hash_encoded(password.as_bytes(), &salt, &config)?;

    Ok(hash)
}

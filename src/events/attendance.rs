use diesel::prelude::*;
use tracing::instrument;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::event_attendees;

/// Attendance links a gamer to an event they signed up for.
///
/// The (event, gamer) pair is the primary key, so a gamer is never listed twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Insertable)]
#[table_name = "event_attendees"]
pub struct Attendance {
    pub event_id: i64,
    pub gamer_id: i64,
}

impl Attendance {
    pub fn new(event_id: i64, gamer_id: i64) -> Attendance {
        Attendance { event_id, gamer_id }
    }

    /// Sign the gamer up, signing up twice has the same effect as signing up once.
    #[instrument(skip(conn))]
    pub fn save(&self, conn: &db::Conn) -> Result<(), ServiceError> {
        let inserted = diesel::insert_into(event_attendees::table)
            .values(self)
            .on_conflict_do_nothing()
            .execute(conn)?;

        if inserted == 0 {
            debug!(
                "gamer {} already attends event {}",
                self.gamer_id, self.event_id
            );
        }

        Ok(())
    }

    /// Remove the gamer from the event, a no-op when they weren't attending.
    #[instrument(skip(conn))]
    pub fn delete(&self, conn: &db::Conn) -> Result<(), ServiceError> {
        diesel::delete(
            event_attendees::table
                .filter(event_attendees::event_id.eq(self.event_id))
                .filter(event_attendees::gamer_id.eq(self.gamer_id)),
        )
        .execute(conn)?;

        Ok(())
    }

    pub fn find_by_event(event_id: i64, conn: &db::Conn) -> Result<Vec<Attendance>, ServiceError> {
        let attendances = event_attendees::table
            .filter(event_attendees::event_id.eq(event_id))
            .order(event_attendees::gamer_id)
            .load::<Attendance>(conn)?;

        Ok(attendances)
    }

    pub fn find_by_events(
        event_ids: &[i64],
        conn: &db::Conn,
    ) -> Result<Vec<Attendance>, ServiceError> {
        let attendances = event_attendees::table
            .filter(event_attendees::event_id.eq_any(event_ids))
            .load::<Attendance>(conn)?;

        Ok(attendances)
    }
}

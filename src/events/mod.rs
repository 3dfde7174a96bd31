mod attendance;
mod models;
mod response;
pub mod routes;

pub use attendance::Attendance;
pub use models::*;
pub use response::{EventGame, EventResponse};

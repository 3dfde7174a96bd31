mod helpers;
mod models;
pub mod routes;

pub use helpers::*;
pub use models::*;

embed_migrations!("migrations/");

use anyhow::anyhow;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use diesel::PgConnection;

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type Conn = PooledConnection<ConnectionManager<PgConnection>>;

fn connect(database_url: &str) -> diesel::ConnectionResult<PgConnection> {
    PgConnection::establish(database_url)
}

pub fn migrate(database_url: &str) -> anyhow::Result<()> {
    let connection = connect(database_url)?;
    embedded_migrations::run_with_output(&connection, &mut std::io::stdout())
        .map_err(|e| anyhow!("unable to run the database migrations: {}", e))?;

    Ok(())
}

pub fn build_connection_pool(database_url: &str) -> anyhow::Result<Pool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool: Pool = r2d2::Pool::builder()
        .build(manager)
        .map_err(|e| anyhow!("unable to build the connection pool: {}", e))?;

    Ok(pool)
}

use std::time::Duration;

use mongodb::{Client, Database, bson::doc};
use tracing::{debug, info};

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
};

/// Pings attempted before giving up; the storage supervisor retries on top of this.
const PING_ATTEMPTS: u32 = 5;
const FIRST_PING_DELAY: Duration = Duration::from_millis(250);
const MAX_PING_DELAY: Duration = Duration::from_secs(2);

/// Delays slept between consecutive failed pings.
fn ping_delays() -> impl Iterator<Item = Duration> {
    std::iter::successors(Some(FIRST_PING_DELAY), |delay| {
        Some((*delay * 2).min(MAX_PING_DELAY))
    })
    .take(PING_ATTEMPTS as usize - 1)
}

/// Open a client on the configured database and wait until it answers a ping.
pub async fn establish_connection(config: &MongoConfig) -> MongoResult<Database> {
    let client = Client::with_options(config.options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(&config.database_name);

    let mut delays = ping_delays();
    let mut attempts = 0;
    loop {
        attempts += 1;
        let Err(source) = database.run_command(doc! { "ping": 1 }).await else {
            info!(database = %config.database_name, attempts, "connected to MongoDB");
            return Ok(database);
        };
        let Some(delay) = delays.next() else {
            return Err(MongoDaoError::InitialPing { attempts, source });
        };
        debug!(attempts, ?delay, error = %source, "MongoDB ping failed; retrying");
        tokio::time::sleep(delay).await;
    }
}

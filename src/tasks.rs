use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info};

use crate::auth::sessions::SessionStore;

/// Periodically delete expired and revoked sessions. Expiry is still checked
/// on every resolve, so a stopped sweeper only leaves dead rows behind.
pub fn spawn_session_sweeper(sessions: SessionStore, every: Duration) -> JoinHandle<()> {
    info!(every_secs = every.as_secs(), "session sweeper started");
    tokio::spawn(async move {
        let mut ticker = interval(every);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweep_sessions(&sessions).await;
        }
    })
}

pub async fn sweep_sessions(sessions: &SessionStore) -> u64 {
    match sessions.purge_expired().await {
        Ok(0) => {
            debug!("no expired sessions");
            0
        }
        Ok(n) => {
            info!(removed = n, "expired sessions removed");
            n
        }
        Err(e) => {
            error!(error = %e, "session sweep failed");
            0
        }
    }
}

use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::warn;

/// Returns the time at which the app was first installed.
///
/// Uses the creation time of `marker` (modification time where the filesystem
/// does not record creation). Any lookup failure is logged and reported as the
/// Unix epoch.
pub async fn first_install_time(marker: &Path) -> DateTime<Utc> {
    let metadata = match fs::metadata(marker).await {
        Ok(metadata) => metadata,
        Err(err) => {
            warn!(path = %marker.display(), error = ?err, "Install metadata not found");
            return DateTime::<Utc>::UNIX_EPOCH;
        }
    };

    match metadata.created().or_else(|_| metadata.modified()) {
        Ok(time) => DateTime::<Utc>::from(time),
        Err(err) => {
            warn!(path = %marker.display(), error = ?err, "Install time unavailable");
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

use log::{error, info, warn};

use crate::influx::TimeSeriesStore;

use super::extract::FlatWeatherRecord;
use super::point::encode;

/// What happened to one record on its way to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Collection is switched off; nothing was attempted
    Disabled,
    /// The store did not answer its health probe; nothing was written
    Unavailable,
    /// The write itself failed
    Failed,
    /// The write succeeded; `verified` reports the advisory read-back
    Stored { verified: bool },
}

/// Encodes and writes one record when `collect` is set.
///
/// Verification never changes a successful write into a failure: the write
/// status is authoritative and the read-back only annotates it.
pub async fn persist(
    store: &dyn TimeSeriesStore,
    record: &FlatWeatherRecord,
    collect: bool,
) -> PersistOutcome {
    let location = record.formatted_location.as_str();

    if !collect {
        info!("data collection disabled, not saving weather for {}", location);
        return PersistOutcome::Disabled;
    }

    if !store.is_connected().await {
        warn!("store is unreachable, not saving weather for {}", location);
        return PersistOutcome::Unavailable;
    }

    let point = encode(record);
    let field_count = point.fields.len();

    if let Err(e) = store.write_point(&point).await {
        error!(
            "error writing weather point for {} ({} fields): {}",
            location, field_count, e
        );
        return PersistOutcome::Failed;
    }
    info!("wrote weather point for {} ({} fields)", location, field_count);

    let verified = match store.verify_write(location).await {
        Ok(found) => {
            if !found {
                warn!("read-back found no recent points for {}", location);
            }
            found
        }
        Err(e) => {
            warn!("read-back failed for {}: {}", location, e);
            false
        }
    };

    PersistOutcome::Stored { verified }
}

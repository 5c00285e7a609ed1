//! Time-ordered identifiers for jobs, version records, and decisions.
//!
//! Every id minted by scout is a UUIDv7 (RFC 9562), so ids sort in creation
//! order and the creation instant can be recovered from the id alone.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Mint a new UUIDv7 identifier.
///
/// ```
/// use scout_core::ids::{new_id, is_v7};
///
/// let id = new_id();
/// assert!(is_v7(&id));
/// ```
#[inline]
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// Check if a UUID is version 7.
#[inline]
pub fn is_v7(uuid: &Uuid) -> bool {
    uuid.get_version_num() == 7
}

/// Recover the creation instant embedded in a UUIDv7.
///
/// Returns `None` if the UUID is not version 7.
pub fn minted_at(uuid: &Uuid) -> Option<DateTime<Utc>> {
    if !is_v7(uuid) {
        return None;
    }

    let bytes = uuid.as_bytes();
    let millis = bytes[..6]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

    Utc.timestamp_millis_opt(millis as i64).single()
}

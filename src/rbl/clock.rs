use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch, the unit every stored timestamp uses
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

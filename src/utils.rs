//! Small helpers shared by the local stores and the mock answers.

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

/// Synthetic id for records created in a local store.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

pub fn unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}

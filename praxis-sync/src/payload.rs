//! Outgoing push payload.

use chrono::{DateTime, Utc};
use praxis_core::ProgressRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One serialized push of the full progress record.
///
/// The learner id is the idempotency key: every channel upserts by it,
/// so replaying the same payload over a fallback channel or a reconnect
/// retry is safe. The push id only identifies the attempt in logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushPayload {
    pub push_id: Uuid,
    pub learner_id: String,
    pub revision: u64,
    pub sent_at: DateTime<Utc>,
    pub record: ProgressRecord,
}

impl PushPayload {
    pub fn new(learner_id: &str, revision: u64, record: ProgressRecord) -> Self {
        Self {
            push_id: Uuid::now_v7(),
            learner_id: learner_id.to_string(),
            revision,
            sent_at: Utc::now(),
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_round_trip() {
        let mut record = ProgressRecord::default();
        record.total_score = 55;
        let payload = PushPayload::new("learner-1", 3, record);

        let json = serde_json::to_string(&payload).unwrap();
        let parsed: PushPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_push_ids_are_unique_per_attempt() {
        let a = PushPayload::new("learner-1", 1, ProgressRecord::default());
        let b = PushPayload::new("learner-1", 1, ProgressRecord::default());
        assert_ne!(a.push_id, b.push_id);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire-format message envelope for worker/caller communication.
///
/// Serialized as JSON — the payload is exposed to non-Rust callers, so
/// the whole envelope stays JSON end to end. `correlation_id` ties the
/// acknowledge reply back to the result it confirms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Routing topic (e.g. "split.result", "split.ack").
    pub topic: String,

    /// JSON payload.
    pub payload: serde_json::Value,

    /// When this message was created.
    pub timestamp: DateTime<Utc>,

    /// Correlation ID matching acks to results.
    pub correlation_id: Uuid,

    /// Schema version for forward-compatible evolution.
    #[serde(default = "default_version")]
    pub version: u16,
}

fn default_version() -> u16 {
    1
}

impl Message {
    /// Create a new message, serializing the payload to JSON.
    pub fn new<T: Serialize>(
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            topic: topic.into(),
            payload: serde_json::to_value(payload)?,
            timestamp: Utc::now(),
            correlation_id: Uuid::new_v4(),
            version: 1,
        })
    }

    /// Create a message with an explicit correlation ID (for acks).
    pub fn with_correlation<T: Serialize>(
        topic: impl Into<String>,
        payload: &T,
        correlation_id: Uuid,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            topic: topic.into(),
            payload: serde_json::to_value(payload)?,
            timestamp: Utc::now(),
            correlation_id,
            version: 1,
        })
    }

    /// Deserialize the payload into the expected type.
    pub fn decode<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }

    /// Serialize this entire envelope to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize an envelope from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_message() {
        let payload = "hello world".to_string();
        let msg = Message::new("split.result", &payload).unwrap();

        assert_eq!(msg.topic, "split.result");
        assert_eq!(msg.decode::<String>().unwrap(), "hello world");
    }

    #[test]
    fn roundtrip_envelope_bytes() {
        let msg = Message::new("split.result", &vec![1u64, 2, 3]).unwrap();
        let bytes = msg.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.topic, "split.result");
        assert_eq!(decoded.correlation_id, msg.correlation_id);
        assert_eq!(decoded.decode::<Vec<u64>>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn with_correlation_preserves_id() {
        let id = Uuid::new_v4();
        let msg = Message::with_correlation("split.ack", &true, id).unwrap();
        assert_eq!(msg.correlation_id, id);
    }
}

//! Caller invocation payload
//!
//! Caller front-ends receive `{"message": "<unix-epoch-millis>"}`. The value
//! is the time the request was sent and is only used to measure end-to-end
//! latency, never for routing.

use crate::error::{ClientError, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Inbound body accepted by caller front-ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationPayload {
    pub message: String,
}

impl InvocationPayload {
    /// Payload stamped with the given send time
    pub fn at(sent_at: DateTime<Utc>) -> Self {
        Self {
            message: sent_at.timestamp_millis().to_string(),
        }
    }

    /// Payload stamped with the current time
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn sent_at(&self) -> Result<DateTime<Utc>> {
        let millis: i64 = self
            .message
            .trim()
            .parse()
            .map_err(|_| ClientError::Payload(format!("invalid timestamp: {:?}", self.message)))?;

        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| ClientError::Payload(format!("timestamp out of range: {}", millis)))
    }

    /// Milliseconds between the send time and `now`
    pub fn latency_ms(&self, now: DateTime<Utc>) -> Result<i64> {
        Ok((now - self.sent_at()?).num_milliseconds())
    }
}

//! Catalog lifecycle events carried on the bus.
//!
//! The bus is a hint, not a contract: delivery is at-most-once and consumers
//! reconcile via their own TTL rebuilds. Payloads are raw bytes so any broker
//! can carry them.

/// A catalog lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// An ingest run finished and the store grew.
    Updated,
    /// The store was truncated.
    Dropped,
}

impl Event {
    /// Wire payload for this event.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Updated => b"update",
            Self::Dropped => b"drop",
        }
    }

    /// Parse a wire payload. Unknown payloads yield `None`; consumers log
    /// and ignore them.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        match payload {
            b"update" => Some(Self::Updated),
            b"drop" => Some(Self::Dropped),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trip() {
        for event in [Event::Updated, Event::Dropped] {
            assert_eq!(Event::from_payload(event.as_bytes()), Some(event));
        }
    }

    #[test]
    fn unknown_payload_is_none() {
        assert_eq!(Event::from_payload(b"reindex"), None);
        assert_eq!(Event::from_payload(b""), None);
    }
}

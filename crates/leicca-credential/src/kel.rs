//! KEL (Key Event Log) event type and state derivation (§3 KEL Event / KEL State).

use serde::{Deserialize, Serialize};

/// A single KERI key event, as carried inline in a CESR stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KelEvent {
    pub v: String,
    /// Event type: `icp`, `ixn`, `rot`, etc. Only `icp`/`ixn` are
    /// state-forming for the purposes of KEL-state capture.
    pub t: String,
    /// Event SAID.
    pub d: String,
    /// Controller AID.
    pub i: String,
    /// Sequence number, rendered as a lowercase hex string.
    pub s: String,
}

impl KelEvent {
    /// Whether this event type advances KEL state (`icp` or `ixn`).
    pub fn is_state_forming(&self) -> bool {
        matches!(self.t.as_str(), "icp" | "ixn")
    }

    /// Parse `s` (lowercase hex) into a sequence number.
    pub fn sequence_number(&self) -> Option<u64> {
        u64::from_str_radix(self.s.trim_start_matches("0x"), 16).ok()
    }
}

//! User identifier generation.
//!
//! Identifiers are unique and strictly increasing for the lifetime of a
//! generator. Cross-process uniqueness is backed by the store: an insert
//! with an assigned id fails with `InsertUserError::DuplicateId` and the
//! caller draws a fresh one.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of fresh user identifiers.
pub trait UserIdGenerator: Send + Sync {
    fn next_id(&self) -> i64;
}

/// Atomic counter, seeded past the highest id already stored.
pub struct SequenceIdGenerator {
    last: AtomicI64,
}

impl SequenceIdGenerator {
    /// First id handed out is `last + 1`.
    pub fn starting_after(last: i64) -> Self {
        Self {
            last: AtomicI64::new(last),
        }
    }
}

impl UserIdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> i64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// 2024-01-01T00:00:00Z in Unix milliseconds.
const SNOWFLAKE_EPOCH_MS: i64 = 1_704_067_200_000;
const NODE_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
pub const MAX_NODE_ID: i64 = (1 << NODE_BITS) - 1;
const MAX_SEQUENCE: i64 = (1 << SEQUENCE_BITS) - 1;

/// Millisecond timestamp, node id and per-millisecond sequence packed into
/// one `i64`, so several processes can mint ids without coordination.
pub struct SnowflakeIdGenerator {
    node_id: i64,
    state: Mutex<SnowflakeState>,
}

struct SnowflakeState {
    last_ms: i64,
    sequence: i64,
}

impl SnowflakeIdGenerator {
    /// `node_id` must be in `0..=MAX_NODE_ID`; it is masked otherwise.
    pub fn new(node_id: i64) -> Self {
        Self {
            node_id: node_id & MAX_NODE_ID,
            state: Mutex::new(SnowflakeState {
                last_ms: 0,
                sequence: 0,
            }),
        }
    }

    fn next_at(&self, now_ms: i64) -> i64 {
        let mut state = self.state.lock();

        // A clock step backwards keeps using the last timestamp.
        let mut ms = now_ms.max(state.last_ms);
        if ms == state.last_ms {
            state.sequence += 1;
            if state.sequence > MAX_SEQUENCE {
                // Sequence exhausted: borrow the next millisecond.
                ms += 1;
                state.sequence = 0;
            }
        } else {
            state.sequence = 0;
        }
        state.last_ms = ms;

        ((ms - SNOWFLAKE_EPOCH_MS) << (NODE_BITS + SEQUENCE_BITS))
            | (self.node_id << SEQUENCE_BITS)
            | state.sequence
    }
}

impl UserIdGenerator for SnowflakeIdGenerator {
    fn next_id(&self) -> i64 {
        self.next_at(Utc::now().timestamp_millis())
    }
}

use std::sync::Mutex;

use chrono::Utc;

/// Milliseconds of 2024-01-01T00:00:00Z, the epoch snowflake timestamps count from.
pub const EPOCH_MS: i64 = 1_704_067_200_000;

const MACHINE_BITS: u8 = 10;
const SEQUENCE_BITS: u8 = 12;
const MACHINE_MASK: u16 = (1 << MACHINE_BITS) - 1;
const SEQUENCE_MASK: u16 = (1 << SEQUENCE_BITS) - 1;

struct State {
    last_ms: i64,
    sequence: u16,
}

/// Generates 64-bit time-ordered ids: 41 bits of milliseconds since [`EPOCH_MS`],
/// 10 bits of machine id, 12 bits of per-millisecond sequence. Ids from one
/// generator are strictly increasing, which is what makes `snowflake_id` usable
/// as a duplicate-free pagination cursor.
pub struct SnowflakeGenerator {
    machine_id: u16,
    state: Mutex<State>,
}

impl SnowflakeGenerator {
    pub fn new(machine_id: u16) -> Self {
        Self {
            machine_id: machine_id & MACHINE_MASK,
            state: Mutex::new(State {
                last_ms: 0,
                sequence: 0,
            }),
        }
    }

    pub fn next_id(&self) -> i64 {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut now = current_ms();
        // Clock went backwards; keep issuing against the last seen instant.
        if now < state.last_ms {
            now = state.last_ms;
        }

        if now == state.last_ms {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // Sequence exhausted for this millisecond, wait for the next one.
                while now <= state.last_ms {
                    now = current_ms();
                }
            }
        } else {
            state.sequence = 0;
        }

        state.last_ms = now;

        ((now - EPOCH_MS) << (MACHINE_BITS + SEQUENCE_BITS))
            | ((self.machine_id as i64) << SEQUENCE_BITS)
            | (state.sequence as i64)
    }
}

fn current_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Millisecond timestamp embedded in a snowflake id.
pub fn embedded_timestamp_ms(id: i64) -> i64 {
    (id >> (MACHINE_BITS + SEQUENCE_BITS)) + EPOCH_MS
}

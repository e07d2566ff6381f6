//! Error types for placement tables.

/// Errors produced when building or querying a placement table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AhrwError {
    /// The table was requested with zero slots.
    #[error("number of slots can't be zero")]
    ZeroSlots,

    /// The slot count does not fit in addressable memory.
    #[error("slot count {0} exceeds addressable memory")]
    TooManySlots(u64),

    /// The table was requested with an empty node set.
    #[error("number of nodes can't be zero")]
    ZeroNodes,

    /// A slot index beyond the table's range was requested.
    #[error("slot {slot} out of range (table has {nslots} slots)")]
    SlotOutOfRange {
        /// The requested slot.
        slot: u64,
        /// Number of slots in the table.
        nslots: u64,
    },

    /// Two tables over different slot spaces were compared.
    #[error("slot count mismatch: {old} vs {new}")]
    SlotCountMismatch {
        /// Slot count of the previous table.
        old: u64,
        /// Slot count of the new table.
        new: u64,
    },

    /// Table configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

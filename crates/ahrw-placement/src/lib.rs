//! Aggregated rendezvous hashing for deterministic node placement.
//!
//! Objects are first hashed into a fixed number of slots with
//! [`slot_for_bytes`], which avoids modulo bias. Each slot is then assigned
//! to a node by highest random weight: the node maximizing
//! `xxh3(slot_be ++ node_id)` wins. Slot owners are computed at most once
//! per [`Ahrw`] instance and memoized in lock-free atomic bindings, so
//! placement costs O(1) amortized regardless of the node count.
//!
//! Changing the node set only moves the slots whose winner was removed or
//! whose new winner was added, as long as the slot count stays the same.

mod config;
mod error;
mod registry;
mod slot;
mod table;

pub use ahrw_types::{Node, Server};
pub use config::TableConfig;
pub use error::AhrwError;
pub use slot::slot_for_bytes;
pub use table::{Ahrw, DEFAULT_SLOTS, SlotMove};

//! Memoized slot-to-node table.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use ahrw_types::Node;
use tracing::{debug, trace};
use xxhash_rust::xxh3::Xxh3;

use crate::error::AhrwError;
use crate::registry::unique_nodes;
use crate::slot::slot_for_bytes;

/// Slot count suited to node sets of up to roughly a hundred nodes.
pub const DEFAULT_SLOTS: u64 = 16_384;

/// Binding value of a slot whose owner has not been computed yet.
///
/// Resolved bindings hold the owner's registry index plus one.
const UNRESOLVED: usize = 0;

/// A slot whose owner differs between two tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMove {
    /// The slot that changes owner.
    pub slot: u64,
    /// Identifier of the owner in the old table.
    pub from: Vec<u8>,
    /// Identifier of the owner in the new table.
    pub to: Vec<u8>,
}

/// Aggregated Highest Random Weight placement table.
///
/// Maps objects to nodes with minimal remapping when the node set
/// changes. Objects are pre-aggregated into a fixed number of slots and
/// only slots are distributed across nodes, which lets the owner of each
/// slot be computed once and memoized. That keeps rendezvous hashing
/// practical for large node counts and high request rates.
///
/// An `Ahrw` is safe to share between threads and should be built once and
/// reused. Build a new one to change the set of nodes.
pub struct Ahrw<N> {
    /// Sorted, deduplicated nodes.
    nodes: Vec<N>,
    /// Per-slot owner bindings, see [`UNRESOLVED`].
    bindings: Box<[AtomicUsize]>,
}

impl<N: Node> Ahrw<N> {
    /// Create a table with `nslots` slots distributed over `nodes`.
    ///
    /// A reasonable `nslots` is two orders of magnitude above the largest
    /// expected node count, e.g. [`DEFAULT_SLOTS`] for up to 100 nodes.
    /// Powers of two are slightly faster to hash into.
    ///
    /// `nslots` must be the same for every table serving one object space,
    /// otherwise remapping between node sets is no longer minimal.
    pub fn new(nslots: u64, nodes: impl IntoIterator<Item = N>) -> Result<Self, AhrwError> {
        if nslots == 0 {
            return Err(AhrwError::ZeroSlots);
        }
        let bindings = unresolved_bindings(nslots)?;
        let nodes = unique_nodes(nodes)?;

        debug!(
            nslots,
            nodes = nodes.len(),
            pow2 = nslots.is_power_of_two(),
            "created placement table"
        );
        Ok(Self { nodes, bindings })
    }

    /// Return the number of slots in this table.
    pub fn nslots(&self) -> u64 {
        self.bindings.len() as u64
    }

    /// Return the normalized nodes, sorted by identifier.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Return how many slots have their owner memoized so far.
    pub fn resolved_slots(&self) -> usize {
        self.bindings
            .iter()
            .filter(|b| b.load(Ordering::Relaxed) != UNRESOLVED)
            .count()
    }

    /// Return the node owning `slot`.
    ///
    /// Useful when objects are hashed into slots by the caller.
    pub fn node_for_slot(&self, slot: u64) -> Result<&N, AhrwError> {
        if slot >= self.nslots() {
            return Err(AhrwError::SlotOutOfRange {
                slot,
                nslots: self.nslots(),
            });
        }
        Ok(self.lookup_slot(slot as usize))
    }

    /// Map bytes identifying an object to one of the nodes.
    pub fn node_for_bytes(&self, bytes: &[u8]) -> &N {
        let slot = slot_for_bytes(self.nslots(), bytes);
        self.lookup_slot(slot as usize)
    }

    /// Map a string identifying an object to one of the nodes.
    pub fn node_for_str(&self, s: &str) -> &N {
        self.node_for_bytes(s.as_bytes())
    }

    /// Compute which slots change owner between two tables.
    ///
    /// Both tables must cover the same slot space. Every slot of both tables
    /// gets resolved in the process.
    pub fn diff(old: &Self, new: &Self) -> Result<Vec<SlotMove>, AhrwError> {
        if old.nslots() != new.nslots() {
            return Err(AhrwError::SlotCountMismatch {
                old: old.nslots(),
                new: new.nslots(),
            });
        }

        let mut moves = Vec::new();
        for slot in 0..old.bindings.len() {
            let from = old.lookup_slot(slot).node_id();
            let to = new.lookup_slot(slot).node_id();
            if from != to {
                moves.push(SlotMove {
                    slot: slot as u64,
                    from: from.to_vec(),
                    to: to.to_vec(),
                });
            }
        }

        debug!(
            nslots = old.nslots(),
            moved = moves.len(),
            "computed slot moves"
        );
        Ok(moves)
    }

    /// Return the memoized owner of `slot`, resolving it on first use.
    ///
    /// Racing first lookups may each compute the owner; the first
    /// compare-and-set wins and every caller returns the stored node. All
    /// computations agree, so which one is stored does not matter.
    fn lookup_slot(&self, slot: usize) -> &N {
        let binding = &self.bindings[slot];
        let stored = binding.load(Ordering::Acquire);
        if stored != UNRESOLVED {
            return &self.nodes[stored - 1];
        }

        let computed = self.calculate_node(slot as u64) + 1;
        let stored = match binding.compare_exchange(
            UNRESOLVED,
            computed,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                trace!(slot, index = computed - 1, "resolved slot");
                computed
            }
            Err(current) => {
                trace!(slot, index = current - 1, "slot resolved concurrently");
                current
            }
        };
        &self.nodes[stored - 1]
    }

    /// Pick the node with the highest `xxh3(slot_be ++ node_id)` weight.
    ///
    /// Ties keep the earlier node in registry order.
    fn calculate_node(&self, slot: u64) -> usize {
        let key = slot.to_be_bytes();
        let mut hasher = Xxh3::new();

        highest_weight(self.nodes.iter().map(|node| {
            hasher.reset();
            hasher.update(&key);
            hasher.update(node.node_id());
            hasher.digest()
        }))
    }
}

/// Allocate `nslots` unresolved bindings, failing instead of aborting when
/// the table cannot be allocated.
fn unresolved_bindings(nslots: u64) -> Result<Box<[AtomicUsize]>, AhrwError> {
    let len = usize::try_from(nslots).map_err(|_| AhrwError::TooManySlots(nslots))?;
    let mut bindings = Vec::new();
    bindings
        .try_reserve_exact(len)
        .map_err(|_| AhrwError::TooManySlots(nslots))?;
    bindings.extend((0..len).map(|_| AtomicUsize::new(UNRESOLVED)));
    Ok(bindings.into_boxed_slice())
}

/// Index of the strictly greatest weight, starting from weight 0 at index 0.
///
/// A later weight equal to the best so far never replaces it.
fn highest_weight(weights: impl IntoIterator<Item = u64>) -> usize {
    let mut best_weight = 0u64;
    let mut best = 0usize;
    for (i, weight) in weights.into_iter().enumerate() {
        if weight > best_weight {
            best_weight = weight;
            best = i;
        }
    }
    best
}

impl<N: fmt::Debug> fmt::Debug for Ahrw<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ahrw")
            .field("nslots", &self.bindings.len())
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

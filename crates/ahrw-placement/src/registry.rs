//! Node set normalization.

use ahrw_types::Node;
use tracing::debug;

use crate::error::AhrwError;

/// Sort `nodes` by identifier and drop duplicate identifiers.
///
/// The sort is stable, and of each run of equal identifiers only the first
/// element is kept, so among duplicates the earliest in input order wins.
pub(crate) fn unique_nodes<N: Node>(nodes: impl IntoIterator<Item = N>) -> Result<Vec<N>, AhrwError> {
    let mut nodes: Vec<N> = nodes.into_iter().collect();
    if nodes.is_empty() {
        return Err(AhrwError::ZeroNodes);
    }

    let total = nodes.len();
    nodes.sort_by(|a, b| a.node_id().cmp(b.node_id()));
    // dedup_by passes (later, earlier) and removes the later one.
    nodes.dedup_by(|a, b| a.node_id() == b.node_id());

    debug!(
        total,
        unique = nodes.len(),
        collapsed = total - nodes.len(),
        "normalized node set"
    );
    Ok(nodes)
}

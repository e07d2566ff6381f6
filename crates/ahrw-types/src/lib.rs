//! Shared node types for AHRW placement.
//!
//! This crate defines the capability every placement target must expose
//! ([`Node`]: a stable, unique byte identifier) and one convenience
//! implementation ([`Server`]) pairing a name with a caller-owned handle.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Node capability
// ---------------------------------------------------------------------------

/// A placement target (server, shard, partition) of rendezvous hashing.
pub trait Node {
    /// Identifier unique within the set of nodes given to one table.
    ///
    /// Must return the same bytes for as long as the node is in use.
    fn node_id(&self) -> &[u8];
}

impl<T: Node + ?Sized> Node for &T {
    fn node_id(&self) -> &[u8] {
        (**self).node_id()
    }
}

impl<T: Node + ?Sized> Node for Box<T> {
    fn node_id(&self) -> &[u8] {
        (**self).node_id()
    }
}

impl<T: Node + ?Sized> Node for Arc<T> {
    fn node_id(&self) -> &[u8] {
        (**self).node_id()
    }
}

impl<T: Node + ?Sized> Node for Rc<T> {
    fn node_id(&self) -> &[u8] {
        (**self).node_id()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Convenience [`Node`] identified by a unique name.
///
/// The handle references the actual server object, so a `Server` can wrap
/// any type while its identity comes from the name alone.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Server<H = ()> {
    name: String,
    handle: H,
}

impl<H> Server<H> {
    /// Create a server identified by `name` and holding `handle`.
    pub fn new(name: impl Into<String>, handle: H) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }

    /// Return the unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the handle passed to [`Server::new`].
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Consume the server, returning its handle.
    pub fn into_handle(self) -> H {
        self.handle
    }
}

impl Server<()> {
    /// Create a server with no handle attached.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, ())
    }
}

impl<H> Node for Server<H> {
    fn node_id(&self) -> &[u8] {
        self.name.as_bytes()
    }
}

impl<H: fmt::Debug> fmt::Debug for Server<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Server({}, {:?})", self.name, self.handle)
    }
}

impl<H> fmt::Display for Server<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

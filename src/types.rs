use core::sync::atomic::{AtomicU64, Ordering};
use derive_more::Display;
use indexmap::IndexMap as _IndexMap;
use rustc_hash::FxBuildHasher;

/// Index of a node inside the graph that created it.
///
/// A `NodeId` is a non-owning handle: it names a node, it never keeps one
/// alive. Nodes are never removed from a graph, so an id stays valid for the
/// graph's whole lifetime.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("#{_0}")]
#[repr(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in insertion order.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a device group owned by a graph.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("group#{_0}")]
#[repr(transparent)]
pub struct GroupId(pub(crate) u32);

impl GroupId {
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Physical device ordinal.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("gpu{_0}")]
pub struct DeviceId(pub u16);

/// Process-unique identity of a graph, recorded in every node it owns.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
#[display("graph{_0}")]
#[repr(transparent)]
pub struct GraphId(u64);

impl GraphId {
    pub(crate) fn next() -> Self {
        // Identity only; never part of a run-time synchronization protocol.
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// `IndexMap` type with fast hasher.
pub type IndexMap<K, V> = _IndexMap<K, V, FxBuildHasher>;

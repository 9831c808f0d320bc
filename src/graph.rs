mod affinity;
mod dump;
mod edges;
mod setup;

/// Error returned by graph construction and typed payload access.
///
/// Every variant signals a programming error in the caller (a builder or an
/// executor), never a transient condition worth retrying.
pub use crate::graph::setup::GraphError;
use crate::{
    config::Config,
    group::DeviceGroup,
    node::Node,
    types::{GraphId, GroupId, NodeId},
};
use derive_more::Debug;
use tracing::debug;

/// Arena owning every node and device group of one run.
///
/// Nodes and groups refer to each other through [`NodeId`] and [`GroupId`]
/// handles; the graph alone determines their lifetime. Nothing is ever
/// removed, so handles stay valid until the graph is dropped.
///
/// Construction (`insert`, `precede`, `union`, group assignment) takes
/// `&mut self` and is therefore single-writer. A finished graph is `Sync`:
/// executor threads share it by reference and touch only the atomic pending
/// counters and device groups.
#[must_use]
#[derive(Debug)]
pub struct Graph<C: Config> {
    #[debug(skip)]
    id: GraphId,
    nodes: Vec<Node<C>>,
    groups: Vec<DeviceGroup>,
}

impl<C: Config> Default for Graph<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Config> Graph<C> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let id = GraphId::next();
        debug!(graph = %id, "graph created");
        Self {
            id,
            nodes: Vec::with_capacity(capacity),
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> GraphId {
        self.id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// # Panics
    /// If `id` wasn't issued by this graph.
    pub fn node(&self, id: NodeId) -> &Node<C> {
        &self.nodes[id.index()]
    }

    /// # Panics
    /// If `id` wasn't issued by this graph.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<C> {
        &mut self.nodes[id.index()]
    }

    /// All nodes with their ids, in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = (NodeId, &Node<C>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node_id(idx), node))
    }

    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// # Panics
    /// If `id` wasn't issued by this graph.
    pub fn group(&self, id: GroupId) -> &DeviceGroup {
        &self.groups[id.index()]
    }

    /// Shared device group of `node`, or `None` if it isn't grouped.
    #[must_use]
    pub fn group_of(&self, node: NodeId) -> Option<&DeviceGroup> {
        self.node(node).group().map(|id| self.group(id))
    }
}

fn node_id(idx: usize) -> NodeId {
    NodeId(idx.try_into().expect("Graph::node_id: [1]"))
}

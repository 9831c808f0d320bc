use crate::{
    config::Config,
    graph::Graph,
    sync::{Ordering, fence},
    types::NodeId,
};
use tracing::trace;

impl<C: Config> Graph<C> {
    /// Record that `from` must complete before `to` may start.
    ///
    /// `to` is appended to `from`'s successors, `from` to `to`'s dependents,
    /// and `to`'s pending counter grows by one. The two adjacency lists are
    /// always updated together. Repeating an existing edge changes nothing
    /// and returns `false`.
    ///
    /// The caller is responsible for keeping the graph acyclic.
    ///
    /// # Panics
    /// If `from == to`, or either node isn't in this graph.
    pub fn precede(&mut self, from: NodeId, to: NodeId) -> bool {
        assert_ne!(from, to, "Node {from} cannot precede itself");
        assert!(self.contains(to), "Graph::precede: [1]");
        if self.node(from).successors.contains(&to) {
            return false;
        }
        self.node_mut(from).successors.push(to);
        let target = self.node_mut(to);
        target.dependents.push(from);
        target.add_pending();
        trace!(graph = %self.id, %from, %to, "edge recorded");
        true
    }

    /// Nodes without predecessors, i.e. the ones a run starts from.
    pub fn sources(&self) -> impl Iterator<Item = NodeId> {
        self.nodes()
            .filter(|(_, node)| node.num_dependents() == 0)
            .map(|(id, _)| id)
    }

    /// Propagate the completion of `id` to its successors.
    ///
    /// Each successor's counter is decremented once; the successors whose
    /// counter reached zero in this call are returned, in successor order.
    /// Across all threads completing predecessors of a node, exactly one call
    /// returns it.
    pub fn complete(&self, id: NodeId) -> Vec<NodeId> {
        let successors = self.node(id).successors();
        if !successors.is_empty() {
            fence(Ordering::Release);
        }
        let mut ready = Vec::new();
        for &successor in successors {
            if self.node(successor).release_relaxed() {
                ready.push(successor);
            }
        }
        if !ready.is_empty() {
            fence(Ordering::Acquire);
        }
        ready
    }

    /// Restore every pending counter so the graph can be run again.
    pub fn reset_pending(&self) {
        for node in &self.nodes {
            node.reset_pending();
        }
    }
}

use crate::{
    config::Config,
    graph::{Graph, node_id},
    node::Node,
    task::{Task, TaskKind},
    types::NodeId,
};
use thiserror::Error;
use tracing::debug;

/// Error kind for graph construction and payload access.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    /// A payload was requested as, or required to be, a different kind.
    #[error("expected a {expected} task, found a {found} task")]
    TypeMismatch { expected: TaskKind, found: TaskKind },
    /// A task refers to a node that doesn't exist in this graph.
    #[error("node {0} doesn't exist in this graph")]
    UnknownNode(NodeId),
}

impl<C: Config> Graph<C> {
    /// Add an unnamed node carrying `task`.
    ///
    /// # Errors
    /// - `GraphError::UnknownNode` if the task refers to a node that isn't in
    ///   this graph.
    /// - `GraphError::TypeMismatch` if a referenced node isn't a pull: push
    ///   sources, transfer endpoints and kernel inputs all name device buffers
    ///   produced by pulls.
    pub fn insert(&mut self, task: impl Into<Task<C>>) -> Result<NodeId, GraphError> {
        let task = task.into();
        for &reference in task.references() {
            if !self.contains(reference) {
                return Err(GraphError::UnknownNode(reference));
            }
            let found = self.node(reference).kind();
            if found != TaskKind::Pull {
                return Err(GraphError::TypeMismatch {
                    expected: TaskKind::Pull,
                    found,
                });
            }
        }
        let id = node_id(self.nodes.len());
        debug!(graph = %self.id, node = %id, kind = %task.kind(), "node inserted");
        self.nodes.push(Node::new(self.id, id, task));
        Ok(id)
    }

    /// Add a node carrying `task` with a human-readable name.
    ///
    /// # Errors
    /// Same as [`Graph::insert`].
    pub fn insert_named(
        &mut self,
        name: impl Into<String>,
        task: impl Into<Task<C>>,
    ) -> Result<NodeId, GraphError> {
        let id = self.insert(task)?;
        self.node_mut(id).set_name(name);
        Ok(id)
    }
}

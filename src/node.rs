use crate::{
    config::Config,
    graph::GraphError,
    sync::{AtomicU32, Ordering, fence},
    task::{Payload, Task, TaskKind},
    types::{GraphId, GroupId, NodeId},
};
use derive_more::Debug;

/// A graph vertex: one task plus its dependency edges and device-grouping
/// state.
///
/// Graph shape (name, task, successors, dependents, union-find links, group)
/// is written only while the graph is being built. Once a run starts, the
/// pending-dependency counter is the only field mutated, and only through
/// atomic operations.
#[must_use]
#[derive(Debug)]
pub struct Node<C: Config> {
    name: Option<String>,
    task: Task<C>,
    /// Nodes that depend on this one, in edge insertion order.
    pub(crate) successors: Vec<NodeId>,
    /// Nodes this one depends on, in edge insertion order.
    pub(crate) dependents: Vec<NodeId>,
    /// Number of predecessors that haven't completed yet.
    pending: AtomicU32,
    /// Union-find parent. A node that is its own parent is a set representative.
    pub(crate) parent: NodeId,
    /// Size of the union-find subtree rooted here. Meaningful on roots only.
    pub(crate) tree_size: u32,
    pub(crate) group: Option<GroupId>,
    #[debug(skip)]
    graph: GraphId,
}

impl<C: Config> Node<C> {
    pub(crate) fn new(graph: GraphId, id: NodeId, task: Task<C>) -> Self {
        Self {
            name: None,
            task,
            successors: Vec::new(),
            dependents: Vec::new(),
            pending: AtomicU32::new(0),
            parent: id,
            tree_size: 1,
            group: None,
            graph,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    #[must_use]
    pub const fn task(&self) -> &Task<C> {
        &self.task
    }

    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.task.kind()
    }

    #[must_use]
    pub const fn is_host(&self) -> bool {
        matches!(self.kind(), TaskKind::Host)
    }

    #[must_use]
    pub const fn is_pull(&self) -> bool {
        matches!(self.kind(), TaskKind::Pull)
    }

    #[must_use]
    pub const fn is_push(&self) -> bool {
        matches!(self.kind(), TaskKind::Push)
    }

    #[must_use]
    pub const fn is_transfer(&self) -> bool {
        matches!(self.kind(), TaskKind::Transfer)
    }

    #[must_use]
    pub const fn is_kernel(&self) -> bool {
        matches!(self.kind(), TaskKind::Kernel)
    }

    /// Whether the task runs on a GPU device (anything but a host task).
    #[must_use]
    pub const fn is_device(&self) -> bool {
        self.kind().is_device()
    }

    /// Typed view of the task.
    ///
    /// # Errors
    /// `GraphError::TypeMismatch` if the node doesn't carry a `T`.
    pub fn payload<T: Payload<C>>(&self) -> Result<&T, GraphError> {
        self.task.payload()
    }

    /// Mutable typed view of the task.
    ///
    /// # Errors
    /// `GraphError::TypeMismatch` if the node doesn't carry a `T`.
    pub fn payload_mut<T: Payload<C>>(&mut self) -> Result<&mut T, GraphError> {
        self.task.payload_mut()
    }

    #[must_use]
    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }

    #[must_use]
    pub fn dependents(&self) -> &[NodeId] {
        &self.dependents
    }

    #[must_use]
    pub fn num_successors(&self) -> usize {
        self.successors.len()
    }

    #[must_use]
    pub fn num_dependents(&self) -> usize {
        self.dependents.len()
    }

    /// Number of predecessors that haven't been released yet.
    #[must_use]
    pub fn pending(&self) -> u32 {
        self.pending.load(Ordering::Acquire)
    }

    /// Mark one predecessor as completed.
    ///
    /// Returns `true` for exactly one caller: the one whose decrement brings
    /// the counter to zero. That caller is responsible for dispatching the
    /// node, and observes everything its predecessors published before
    /// releasing it.
    ///
    /// # Panics
    /// If the counter is already zero, which means some predecessor was
    /// released twice.
    pub fn release(&self) -> bool {
        let left = self.pending.fetch_sub(1, Ordering::Release);
        assert_ne!(left, 0, "Node::release: [1]");
        if left == 1 {
            fence(Ordering::Acquire);
            return true;
        }
        false
    }

    /// `release` without ordering; the caller brackets a batch of these with
    /// a Release fence before and an Acquire fence after a zero-crossing.
    pub(crate) fn release_relaxed(&self) -> bool {
        let left = self.pending.fetch_sub(1, Ordering::Relaxed);
        assert_ne!(left, 0, "Node::release_relaxed: [1]");
        left == 1
    }

    /// Restore the counter to the number of predecessors for another run.
    pub fn reset_pending(&self) {
        let total = self
            .dependents
            .len()
            .try_into()
            .expect("Node::reset_pending: [1]");
        self.pending.store(total, Ordering::Relaxed);
    }

    pub(crate) fn add_pending(&self) {
        self.pending.fetch_add(1, Ordering::Relaxed);
    }

    /// Device group this node belongs to, if grouped.
    #[must_use]
    pub const fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Graph (and therefore run) that owns this node.
    pub const fn graph(&self) -> GraphId {
        self.graph
    }
}

use crate::{
    config::Config,
    graph::Graph,
    group::DeviceGroup,
    task::Task,
    types::{GroupId, IndexMap, NodeId},
};
use rustc_hash::FxBuildHasher;
use tracing::debug;

impl<C: Config> Graph<C> {
    /// Representative of `id`'s affinity set, without modifying the forest.
    #[must_use]
    pub fn root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            let parent = self.node(current).parent;
            if parent == current {
                return current;
            }
            current = parent;
        }
    }

    /// Representative of `id`'s affinity set.
    ///
    /// Walks parent links all the way to the root, then points every node on
    /// the walked path directly at it.
    pub fn find(&mut self, id: NodeId) -> NodeId {
        let root = self.root(id);
        let mut current = id;
        while current != root {
            let node = self.node_mut(current);
            let next = node.parent;
            node.parent = root;
            current = next;
        }
        root
    }

    /// Number of nodes in `id`'s affinity set.
    #[must_use]
    pub fn set_size(&self, id: NodeId) -> u32 {
        self.node(self.root(id)).tree_size
    }

    /// Merge the affinity sets of `a` and `b`: their nodes must end up on
    /// the same device.
    ///
    /// The root of the smaller set is attached under the root of the larger
    /// one; on a tie, `b`'s root goes under `a`'s.
    pub fn union(&mut self, a: NodeId, b: NodeId) {
        let (a_root, b_root) = (self.find(a), self.find(b));
        if a_root == b_root {
            return;
        }
        let a_size = self.node(a_root).tree_size;
        let b_size = self.node(b_root).tree_size;
        let (child, parent) = if a_size < b_size {
            (a_root, b_root)
        } else {
            (b_root, a_root)
        };
        assert_eq!(self.node(parent).parent, parent, "Graph::union: [1]");
        self.node_mut(child).parent = parent;
        let merged = a_size.checked_add(b_size).expect("Graph::union: [2]");
        self.node_mut(parent).tree_size = merged;
        debug!(graph = %self.id, %child, %parent, size = merged, "affinity sets merged");
    }

    /// Unite every device task with the pulls whose buffers it reads in
    /// place: a kernel with each of its sources, a push with its source.
    ///
    /// Transfers are left alone since their endpoints live on different
    /// devices.
    pub fn unite_affinities(&mut self) {
        let pairs: Vec<(NodeId, NodeId)> = self
            .nodes()
            .flat_map(|(id, node)| {
                let sources: &[NodeId] = match node.task() {
                    Task::Kernel(_) | Task::Push(_) => node.task().references(),
                    Task::Host(_) | Task::Pull(_) | Task::Transfer(_) => &[],
                };
                sources.iter().map(move |&source| (id, source))
            })
            .collect();
        for (id, source) in pairs {
            self.union(id, source);
        }
    }

    /// Create a new, unassigned device group.
    pub fn add_group(&mut self) -> GroupId {
        let id = GroupId(
            self.groups
                .len()
                .try_into()
                .expect("Graph::add_group: [1]"),
        );
        self.groups.push(DeviceGroup::new());
        id
    }

    /// Attach `node` to `group`.
    ///
    /// # Panics
    /// If `node` is a host task, or `group` wasn't issued by this graph.
    pub fn assign_group(&mut self, node: NodeId, group: GroupId) {
        assert!(
            group.index() < self.groups.len(),
            "Graph::assign_group: [1]"
        );
        let target = self.node_mut(node);
        assert!(
            target.is_device(),
            "Node {node} is a host task and cannot join a device group"
        );
        target.group = Some(group);
    }

    /// Give every affinity set that contains device tasks exactly one device
    /// group, and attach it to each device task of the set.
    ///
    /// A set adopts the group already attached to its first grouped member in
    /// insertion order; otherwise a fresh group is created. Host tasks are
    /// never grouped. Returns the number of groups in use.
    pub fn resolve_device_groups(&mut self) -> usize {
        let device_nodes: Vec<NodeId> = self
            .nodes()
            .filter(|(_, node)| node.is_device())
            .map(|(id, _)| id)
            .collect();
        let mut set_groups: IndexMap<NodeId, GroupId> =
            IndexMap::with_capacity_and_hasher(device_nodes.len(), FxBuildHasher);
        for &id in &device_nodes {
            if let Some(group) = self.node(id).group {
                let root = self.find(id);
                set_groups.entry(root).or_insert(group);
            }
        }
        for &id in &device_nodes {
            let root = self.find(id);
            let group = match set_groups.get(&root) {
                Some(&group) => group,
                None => {
                    let group = self.add_group();
                    set_groups.insert(root, group);
                    group
                }
            };
            self.node_mut(id).group = Some(group);
        }
        debug!(
            graph = %self.id,
            groups = set_groups.len(),
            nodes = device_nodes.len(),
            "device groups resolved"
        );
        set_groups.len()
    }
}

use crate::{config::Config, graph::Graph, node::Node, task::TaskKind, types::NodeId};
use core::fmt::{self, Write};

impl<C: Config> Graph<C> {
    /// Write the whole graph as a GraphViz `digraph`.
    ///
    /// # Errors
    /// Whatever `w` reports.
    pub fn dump(&self, w: &mut impl Write) -> fmt::Result {
        w.write_str("digraph Heteroflow {\n")?;
        for (id, _) in self.nodes() {
            self.dump_node(id, &mut *w)?;
        }
        w.write_str("}\n")
    }

    #[must_use]
    pub fn dump_to_string(&self) -> String {
        let mut out = String::new();
        self.dump(&mut out).expect("Graph::dump_to_string: [1]");
        out
    }

    /// Write one node declaration, filled by task kind, followed by one edge
    /// statement per successor.
    ///
    /// Nodes are identified by their address, so the output is stable for
    /// the lifetime of the graph only.
    ///
    /// # Errors
    /// Whatever `w` reports.
    pub fn dump_node(&self, id: NodeId, w: &mut impl Write) -> fmt::Result {
        let node = self.node(id);
        let addr = Addr(node);
        match node.name() {
            Some(name) if !name.is_empty() => write!(w, "{addr}[label=\"{name}\"")?,
            _ => write!(w, "{addr}[label=\"{addr}\"")?,
        }
        match node.kind() {
            TaskKind::Pull => w.write_str(" style=filled fillcolor=\"cyan\"")?,
            TaskKind::Push => w.write_str(" style=filled fillcolor=\"springgreen\"")?,
            TaskKind::Kernel => {
                w.write_str(" style=filled fillcolor=\"black\" fontcolor=\"white\"")?;
            }
            TaskKind::Transfer => w.write_str(" style=filled fillcolor=\"coral\"")?,
            TaskKind::Host => {}
        }
        w.write_str("];\n")?;
        for &successor in node.successors() {
            writeln!(w, "{addr} -> {};", Addr(self.node(successor)))?;
        }
        Ok(())
    }
}

/// `p` followed by the node's address.
struct Addr<'a, C: Config>(&'a Node<C>);

impl<C: Config> fmt::Display for Addr<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{:p}", self.0)
    }
}

use crate::node::Node;
use commentq_shared::node::NodeId;
use std::collections::HashMap;

/// The node arena is the single source for nodes in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeArena {
    /// Current nodes stored as <id, node>
    nodes: HashMap<NodeId, Node>,
    /// Next node ID to use
    next_id: NodeId,
}

impl NodeArena {
    /// Creates a new NodeArena
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: NodeId::default(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Gets the node with the given id
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Registers an unregistered node into the arena and returns its new id. A node that is
    /// already registered is copied as a fresh, detached node.
    pub fn register_node(&mut self, mut node: Node) -> NodeId {
        let id = self.next_id;
        self.next_id = id.next();

        if node.is_registered() {
            node.parent = None;
            node.children.clear();
        }

        node.set_id(id);
        node.set_registered(true);

        self.nodes.insert(id, node);
        id
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

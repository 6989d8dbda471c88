use crate::document::markup::{MarkupLoader, MarkupOptions};
use crate::node::arena::NodeArena;
use crate::node::{Node, NodeData};
use commentq_shared::errors::Error;
use commentq_shared::node::NodeId;
use commentq_shared::types::Result;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// A document: a tree of nodes stored in an arena, rooted in a document node with id 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) arena: NodeArena,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document that only holds the root document node
    #[must_use]
    pub fn new() -> Self {
        let mut arena = NodeArena::new();
        arena.register_node(Node::new_document());

        Self { arena }
    }

    /// Loads a document from markup with the options found in the config store
    pub fn from_markup(markup: &str) -> Result<Self> {
        Self::from_markup_with(markup, MarkupOptions::from_config())
    }

    pub fn from_markup_with(markup: &str, options: MarkupOptions) -> Result<Self> {
        MarkupLoader::new(markup, options).load()
    }

    /// Id of the document node
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        NodeId::root()
    }

    #[must_use]
    pub fn node_by_id(&self, node_id: NodeId) -> Option<&Node> {
        self.arena.node(node_id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.node_count()
    }

    /// Children of the given node, empty for unknown nodes
    #[must_use]
    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.arena
            .node(node_id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.arena.node(node_id).and_then(|node| node.parent)
    }

    /// Creates a detached element node
    pub fn create_element(&mut self, name: &str, attributes: HashMap<String, String>) -> NodeId {
        self.arena.register_node(Node::new_element(name, attributes))
    }

    /// Creates a detached comment node
    pub fn create_comment(&mut self, value: &str) -> NodeId {
        self.arena.register_node(Node::new_comment(value))
    }

    /// Creates a detached text node
    pub fn create_text(&mut self, value: &str) -> NodeId {
        self.arena.register_node(Node::new_text(value))
    }

    /// Appends a detached node as the last child of the given parent
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        let Some(parent) = self.arena.node(parent_id) else {
            return Err(Error::Generic(format!("parent node {parent_id} not found")).into());
        };
        if !parent.is_container() {
            return Err(Error::Generic(format!("node {parent_id} cannot have children")).into());
        }

        let Some(child) = self.arena.node(child_id) else {
            return Err(Error::Generic(format!("child node {child_id} not found")).into());
        };
        if child.parent.is_some() || child_id.is_root() {
            return Err(Error::Generic(format!("node {child_id} is already attached")).into());
        }
        if self.is_inclusive_ancestor(child_id, parent_id) {
            return Err(Error::Generic(format!("node {child_id} is an ancestor of {parent_id}")).into());
        }

        if let Some(parent) = self.arena.node_mut(parent_id) {
            parent.children.push(child_id);
        }
        if let Some(child) = self.arena.node_mut(child_id) {
            child.parent = Some(parent_id);
        }

        Ok(())
    }

    /// Creates a comment and appends it to the given parent in one go
    pub fn append_comment(&mut self, parent_id: NodeId, value: &str) -> Result<NodeId> {
        let node_id = self.create_comment(value);
        self.append_child(parent_id, node_id)?;
        Ok(node_id)
    }

    /// Creates an element and appends it to the given parent in one go
    pub fn append_element(
        &mut self,
        parent_id: NodeId,
        name: &str,
        attributes: HashMap<String, String>,
    ) -> Result<NodeId> {
        let node_id = self.create_element(name, attributes);
        self.append_child(parent_id, node_id)?;
        Ok(node_id)
    }

    /// Creates a text node and appends it to the given parent in one go
    pub fn append_text(&mut self, parent_id: NodeId, value: &str) -> Result<NodeId> {
        let node_id = self.create_text(value);
        self.append_child(parent_id, node_id)?;
        Ok(node_id)
    }

    fn is_inclusive_ancestor(&self, ancestor_id: NodeId, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            current = self.parent(id);
        }

        false
    }

    /// All elements with the given tag name, in tree order
    #[must_use]
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<NodeId> {
        TreeIterator::new(self)
            .filter(|node_id| {
                self.node_by_id(*node_id)
                    .and_then(Node::name)
                    .is_some_and(|node_name| node_name.eq_ignore_ascii_case(name))
            })
            .collect()
    }

    /// Position of every attached node in tree order (preorder depth-first)
    #[must_use]
    pub fn tree_order(&self) -> HashMap<NodeId, usize> {
        TreeIterator::new(self)
            .enumerate()
            .map(|(position, node_id)| (node_id, position))
            .collect()
    }

    fn write_node(&self, f: &mut Formatter<'_>, node: &Node, depth: usize) -> std::fmt::Result {
        let indent = "  ".repeat(depth);
        match &node.data {
            NodeData::Document => writeln!(f, "{indent}#document"),
            NodeData::Element { name, attributes } => {
                let mut keys: Vec<_> = attributes.keys().collect();
                keys.sort();

                write!(f, "{indent}<{name}")?;
                for key in keys {
                    write!(f, " {key}=\"{}\"", attributes[key])?;
                }
                writeln!(f, ">")
            }
            NodeData::Comment { value } => writeln!(f, "{indent}<!--{value}-->"),
            NodeData::Text { value } => writeln!(f, "{indent}\"{value}\""),
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut node_stack = vec![(self.root_id(), 0)];

        while let Some((node_id, depth)) = node_stack.pop() {
            let Some(node) = self.node_by_id(node_id) else {
                continue;
            };

            self.write_node(f, node, depth)?;
            node_stack.extend(node.children.iter().rev().map(|child_id| (*child_id, depth + 1)));
        }

        Ok(())
    }
}

/// Walks the node ids of a (sub)tree in tree order (preorder depth-first)
pub struct TreeIterator<'a> {
    node_stack: Vec<NodeId>,
    document: &'a Document,
}

impl<'a> TreeIterator<'a> {
    /// Walks the whole document, starting at the document node
    #[must_use]
    pub fn new(document: &'a Document) -> Self {
        Self::from_node(document, document.root_id())
    }

    /// Walks the subtree of the given node, the node itself included
    #[must_use]
    pub fn from_node(document: &'a Document, node_id: NodeId) -> Self {
        let node_stack = if document.node_by_id(node_id).is_some() {
            vec![node_id]
        } else {
            vec![]
        };

        Self {
            node_stack,
            document,
        }
    }
}

impl Iterator for TreeIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current_node_id = self.node_stack.pop()?;

        self.node_stack
            .extend(self.document.children(current_node_id).iter().rev());

        Some(current_node_id)
    }
}

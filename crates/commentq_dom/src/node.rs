use commentq_shared::node::NodeId;
use std::collections::HashMap;

pub mod arena;

pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text. Markup inside them, comments included, is not parsed.
pub const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Different types of nodes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Comment,
    Text,
}

/// Different type of node data
#[derive(Debug, PartialEq, Clone)]
pub enum NodeData {
    Document,
    Element {
        name: String,
        attributes: HashMap<String, String>,
    },
    Comment {
        value: String,
    },
    Text {
        value: String,
    },
}

/// Node that resembles a DOM node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// ID of the node, 0 is always the root / document node
    pub id: NodeId,
    /// parent of the node, if any
    pub parent: Option<NodeId>,
    /// children of the node, in document order
    pub children: Vec<NodeId>,
    /// actual data of the node
    pub data: NodeData,
    registered: bool,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Node {
            id: NodeId::default(),
            parent: None,
            children: vec![],
            data,
            registered: false,
        }
    }

    /// Create a new document node
    #[must_use]
    pub fn new_document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Create a new element node with the given name and attributes
    #[must_use]
    pub fn new_element(name: &str, attributes: HashMap<String, String>) -> Self {
        Self::with_data(NodeData::Element {
            name: name.to_string(),
            attributes,
        })
    }

    /// Create a new comment node
    #[must_use]
    pub fn new_comment(value: &str) -> Self {
        Self::with_data(NodeData::Comment {
            value: value.to_string(),
        })
    }

    /// Create a new text node
    #[must_use]
    pub fn new_text(value: &str) -> Self {
        Self::with_data(NodeData::Text {
            value: value.to_string(),
        })
    }

    #[must_use]
    pub fn type_of(&self) -> NodeType {
        match self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element { .. } => NodeType::Element,
            NodeData::Comment { .. } => NodeType::Comment,
            NodeData::Text { .. } => NodeType::Text,
        }
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.type_of() == NodeType::Comment
    }

    #[must_use]
    pub fn is_element(&self) -> bool {
        self.type_of() == NodeType::Element
    }

    /// Returns true when the node may hold children
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::Element { .. })
    }

    /// Text content of comment and text nodes. Other nodes have no value and return an empty string.
    #[must_use]
    pub fn value(&self) -> &str {
        match &self.data {
            NodeData::Comment { value } | NodeData::Text { value } => value,
            _ => "",
        }
    }

    /// Tag name of an element, None for other nodes
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Get an attribute of an element. Always None for other nodes.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        match &self.data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub(crate) fn set_registered(&mut self, registered: bool) {
        self.registered = registered;
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }
}

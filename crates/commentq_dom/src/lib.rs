//! Document model
//!
//! Documents are stored in an arena. Nodes refer to their parent and children by `NodeId`, so
//! the tree can be walked without any shared ownership. The markup loader builds documents from
//! a forgiving subset of HTML.

pub mod document;
pub mod node;

pub use document::document_impl::{Document, TreeIterator};
pub use document::markup::MarkupOptions;
pub use node::{Node, NodeData, NodeType};

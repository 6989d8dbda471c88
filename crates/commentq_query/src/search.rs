use crate::arguments::Argument;
use crate::collector::CommentIterator;
use crate::matcher::{has_attribute, has_text, MatchOptions};
use crate::query::{CommentQuery, Filter};
use commentq_config::config;
use commentq_config::config_store;
use commentq_dom::{Document, Node};
use commentq_shared::node::NodeId;
use commentq_shared::types::Result;
use log::debug;
use std::collections::HashSet;

fn node_value(document: &Document, node_id: NodeId) -> &str {
    document.node_by_id(node_id).map_or("", Node::value)
}

/// Finds the comments below a single root node that match the query, in document order
#[must_use]
pub fn find_comments(
    document: &Document,
    root_id: NodeId,
    query: &CommentQuery,
    options: MatchOptions,
) -> Vec<NodeId> {
    let comments = CommentIterator::new(document, root_id, query.deep());

    match query.filter() {
        Filter::All => comments.collect(),
        Filter::Text(value) => match value.as_str() {
            Some(value) => comments
                .filter(|node_id| has_text(node_value(document, *node_id), value))
                .collect(),
            // comment text is always a string, so only string values can match
            None => Vec::new(),
        },
        Filter::Attribute { name, value } => comments
            .filter(|node_id| has_attribute(node_value(document, *node_id), name, value, options))
            .collect(),
    }
}

/// Runs the query against every root and concatenates the results in root order. Comments that
/// are found through more than one root appear more than once.
#[must_use]
pub fn search_all(
    document: &Document,
    root_ids: &[NodeId],
    query: &CommentQuery,
    options: MatchOptions,
) -> Vec<NodeId> {
    root_ids
        .iter()
        .flat_map(|root_id| find_comments(document, *root_id, query, options))
        .collect()
}

/// The result of a comment search, together with the query and roots that produced it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommentSet {
    nodes: Vec<NodeId>,
    query: Option<CommentQuery>,
    prev_roots: Vec<NodeId>,
}

impl CommentSet {
    /// Creates a set of unique nodes in document order. Nodes that are not attached to the
    /// document keep their relative order after all attached nodes.
    #[must_use]
    pub fn new(document: &Document, nodes: Vec<NodeId>) -> Self {
        if nodes.len() <= 1 {
            return Self::from_nodes(nodes);
        }

        let mut seen = HashSet::new();
        let mut nodes: Vec<NodeId> = nodes.into_iter().filter(|node_id| seen.insert(*node_id)).collect();

        let tree_order = document.tree_order();
        nodes.sort_by_key(|node_id| tree_order.get(node_id).copied().unwrap_or(usize::MAX));

        Self::from_nodes(nodes)
    }

    /// Creates a set with the nodes as given, duplicates included
    #[must_use]
    pub fn from_nodes(nodes: Vec<NodeId>) -> Self {
        Self {
            nodes,
            query: None,
            prev_roots: Vec::new(),
        }
    }

    /// Records the query and the roots this set was produced from
    #[must_use]
    pub fn with_origin(mut self, query: CommentQuery, prev_roots: Vec<NodeId>) -> Self {
        self.query = Some(query);
        self.prev_roots = prev_roots;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<NodeId> {
        self.nodes
    }

    /// The query that produced this set, if any
    #[must_use]
    pub fn query(&self) -> Option<&CommentQuery> {
        self.query.as_ref()
    }

    /// The roots the query ran against
    #[must_use]
    pub fn prev_roots(&self) -> &[NodeId] {
        &self.prev_roots
    }

    /// Text of every comment in the set
    #[must_use]
    pub fn values<'a>(&self, document: &'a Document) -> Vec<&'a str> {
        self.nodes
            .iter()
            .map(|node_id| node_value(document, *node_id))
            .collect()
    }
}

impl<'a> IntoIterator for &'a CommentSet {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Entry point for comment searches over one or more roots
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommentEngine {
    options: MatchOptions,
    unique_results: bool,
}

impl Default for CommentEngine {
    fn default() -> Self {
        Self::new(MatchOptions::default(), true)
    }
}

impl CommentEngine {
    #[must_use]
    pub fn new(options: MatchOptions, unique_results: bool) -> Self {
        Self {
            options,
            unique_results,
        }
    }

    /// Creates an engine with the settings from the config store
    #[must_use]
    pub fn from_config() -> Self {
        Self::new(MatchOptions::from_config(), config!(bool "query.unique_results"))
    }

    #[must_use]
    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Searches with up to three loosely typed arguments: `()`, `(deep)`, `(value)`,
    /// `(value, deep)`, `(name, value)` or `(name, value, deep)`. More than three arguments is
    /// an `Error::ArgumentCount`.
    pub fn comments(
        &self,
        document: &Document,
        root_ids: &[NodeId],
        arguments: &[Argument],
    ) -> Result<CommentSet> {
        let query = CommentQuery::from_arguments(arguments)?;
        Ok(self.query(document, root_ids, &query))
    }

    /// Runs the query against every root
    #[must_use]
    pub fn query(&self, document: &Document, root_ids: &[NodeId], query: &CommentQuery) -> CommentSet {
        let found = search_all(document, root_ids, query, self.options);
        debug!(
            "query {query} over {} root(s) found {} comment(s)",
            root_ids.len(),
            found.len()
        );

        let set = if self.unique_results {
            CommentSet::new(document, found)
        } else {
            CommentSet::from_nodes(found)
        };

        set.with_origin(query.clone(), root_ids.to_vec())
    }
}

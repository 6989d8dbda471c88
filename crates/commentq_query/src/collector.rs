use commentq_dom::{Document, NodeType};
use commentq_shared::node::NodeId;

/// Iterates the comment nodes below a root node in document order.
///
/// Only the children of the root are visited, unless `deep` is set: then element children are
/// descended into as well. Text and other nodes are skipped. The walk keeps its own stack of
/// pending node ids and never looks at sibling links.
pub struct CommentIterator<'a> {
    document: &'a Document,
    deep: bool,
    node_stack: Vec<NodeId>,
}

impl<'a> CommentIterator<'a> {
    #[must_use]
    pub fn new(document: &'a Document, root_id: NodeId, deep: bool) -> Self {
        let node_stack = document.children(root_id).iter().rev().copied().collect();

        Self {
            document,
            deep,
            node_stack,
        }
    }
}

impl Iterator for CommentIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(node_id) = self.node_stack.pop() {
            let Some(node) = self.document.node_by_id(node_id) else {
                continue;
            };

            match node.type_of() {
                NodeType::Comment => return Some(node_id),
                NodeType::Element if self.deep => {
                    self.node_stack.extend(node.children.iter().rev());
                }
                _ => {}
            }
        }

        None
    }
}

/// Collects the comments below the root node, see `CommentIterator`
#[must_use]
pub fn collect_comments(document: &Document, root_id: NodeId, deep: bool) -> Vec<NodeId> {
    CommentIterator::new(document, root_id, deep).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixture {
        doc: Document,
        div: NodeId,
        c1: NodeId,
        c2: NodeId,
        c3: NodeId,
        c4: NodeId,
        c5: NodeId,
    }

    //  div
    //    <!--c1-->
    //    span
    //      <!--c2-->
    //      b
    //        <!--c3-->
    //    "text"
    //    <!--c4-->
    //  <!--c5-->
    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let root = doc.root_id();
        let div = doc.append_element(root, "div", HashMap::new()).unwrap();
        let c1 = doc.append_comment(div, "c1").unwrap();
        let span = doc.append_element(div, "span", HashMap::new()).unwrap();
        let c2 = doc.append_comment(span, "c2").unwrap();
        let b = doc.append_element(span, "b", HashMap::new()).unwrap();
        let c3 = doc.append_comment(b, "c3").unwrap();
        doc.append_text(div, "text").unwrap();
        let c4 = doc.append_comment(div, "c4").unwrap();
        let c5 = doc.append_comment(root, "c5").unwrap();

        Fixture {
            doc,
            div,
            c1,
            c2,
            c3,
            c4,
            c5,
        }
    }

    #[test]
    fn shallow_returns_direct_children_only() {
        let f = fixture();
        assert_eq!(collect_comments(&f.doc, f.div, false), vec![f.c1, f.c4]);
        assert_eq!(collect_comments(&f.doc, f.doc.root_id(), false), vec![f.c5]);
    }

    #[test]
    fn deep_returns_document_order() {
        let f = fixture();
        assert_eq!(
            collect_comments(&f.doc, f.div, true),
            vec![f.c1, f.c2, f.c3, f.c4]
        );
        assert_eq!(
            collect_comments(&f.doc, f.doc.root_id(), true),
            vec![f.c1, f.c2, f.c3, f.c4, f.c5]
        );
    }

    #[test]
    fn deep_is_superset_of_shallow() {
        let f = fixture();
        let shallow = collect_comments(&f.doc, f.div, false);
        let deep = collect_comments(&f.doc, f.div, true);
        assert!(shallow.iter().all(|id| deep.contains(id)));

        let mut unique = deep.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), deep.len());
    }

    #[test]
    fn leaf_and_unknown_roots() {
        let f = fixture();
        assert!(collect_comments(&f.doc, f.c1, true).is_empty());
        assert!(collect_comments(&f.doc, NodeId::from(999usize), true).is_empty());
    }

    #[test]
    fn iterator_is_lazy_and_restartable() {
        let f = fixture();
        let mut iter = CommentIterator::new(&f.doc, f.div, true);
        assert_eq!(iter.next(), Some(f.c1));
        assert_eq!(iter.next(), Some(f.c2));

        let again: Vec<_> = CommentIterator::new(&f.doc, f.div, true).collect();
        assert_eq!(again, collect_comments(&f.doc, f.div, true));
    }
}

//! Visitor for fragment tree traversal.
//!
//! ```
//! use tsql_syntax::{parse, walk_tree, FragmentVisitor, Node, NodeKind};
//!
//! struct TableCounter(usize);
//!
//! impl FragmentVisitor for TableCounter {
//!     fn enter(&mut self, node: Node<'_>) {
//!         if node.kind() == NodeKind::NamedTableReference {
//!             self.0 += 1;
//!         }
//!     }
//! }
//!
//! let tree = parse("SELECT * FROM a JOIN b ON a.id = b.id").unwrap();
//! let mut counter = TableCounter(0);
//! walk_tree(&mut counter, &tree);
//! assert_eq!(counter.0, 2);
//! ```

use crate::tree::{FragmentTree, Node};

/// Callbacks invoked while walking a fragment tree.
///
/// `enter` runs before a node's children are visited, `exit` after.
#[allow(unused_variables)]
pub trait FragmentVisitor {
    fn enter(&mut self, node: Node<'_>) {}

    fn exit(&mut self, node: Node<'_>) {}
}

/// Walk `node` and everything below it, pre-order.
pub fn walk<V: FragmentVisitor + ?Sized>(visitor: &mut V, node: Node<'_>) {
    visitor.enter(node);
    walk_children(visitor, node);
    visitor.exit(node);
}

/// Walk the children of `node` without visiting `node` itself.
pub fn walk_children<V: FragmentVisitor + ?Sized>(visitor: &mut V, node: Node<'_>) {
    for child in node.children() {
        walk(visitor, child);
    }
}

/// Walk a whole tree from its root.
pub fn walk_tree<V: FragmentVisitor + ?Sized>(visitor: &mut V, tree: &FragmentTree) {
    walk(visitor, tree.root());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::tree::NodeKind;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl FragmentVisitor for Recorder {
        fn enter(&mut self, node: Node<'_>) {
            if node.kind() == NodeKind::NamedTableReference {
                self.events
                    .push(format!("enter {}", node.base_identifier().unwrap_or("?")));
            }
        }

        fn exit(&mut self, node: Node<'_>) {
            if node.kind() == NodeKind::QualifiedJoin {
                self.events.push("exit join".to_string());
            }
        }
    }

    #[test]
    fn test_enter_and_exit_order() {
        let tree = parse("SELECT * FROM a JOIN b ON a.id = b.id JOIN c ON c.id = b.id").unwrap();
        let mut recorder = Recorder::default();
        walk_tree(&mut recorder, &tree);
        assert_eq!(
            recorder.events,
            vec!["enter a", "enter b", "exit join", "enter c", "exit join"]
        );
    }

    #[test]
    fn test_walk_children_skips_the_node_itself() {
        let tree = parse("SELECT * FROM a").unwrap();
        let table = tree
            .root()
            .descendants()
            .find(|n| n.kind() == NodeKind::NamedTableReference)
            .unwrap();
        let mut recorder = Recorder::default();
        walk_children(&mut recorder, table);
        assert!(recorder.events.is_empty());
        walk(&mut recorder, table);
        assert_eq!(recorder.events, vec!["enter a"]);
    }
}

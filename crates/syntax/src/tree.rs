//! Fragment tree: an arena of syntax nodes over a shared token stream.

use crate::token::Token;

/// Syntax node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Script,

    // Statements
    SelectStatement,
    InsertStatement,
    UpdateStatement,
    DeleteStatement,
    MergeStatement,
    ExecuteStatement,
    /// Any statement the parser does not model; subqueries inside it are still parsed
    UnparsedStatement,

    // Common table expressions
    WithCommonTableExpressions,
    CommonTableExpression,

    // Query expressions
    QuerySpecification,
    BinaryQueryExpression,
    ScalarSubquery,

    // Clauses
    FromClause,
    WhereClause,

    // Table references
    NamedTableReference,
    QueryDerivedTable,
    VariableTableReference,
    FunctionTableReference,
    QualifiedJoin,
    UnqualifiedJoin,

    // Leaves
    SchemaObjectName,
    Identifier,
    Alias,
    TableHint,
    StringLiteral,
}

impl NodeKind {
    pub const ALL: &'static [Self] = &[
        Self::Script,
        Self::SelectStatement,
        Self::InsertStatement,
        Self::UpdateStatement,
        Self::DeleteStatement,
        Self::MergeStatement,
        Self::ExecuteStatement,
        Self::UnparsedStatement,
        Self::WithCommonTableExpressions,
        Self::CommonTableExpression,
        Self::QuerySpecification,
        Self::BinaryQueryExpression,
        Self::ScalarSubquery,
        Self::FromClause,
        Self::WhereClause,
        Self::NamedTableReference,
        Self::QueryDerivedTable,
        Self::VariableTableReference,
        Self::FunctionTableReference,
        Self::QualifiedJoin,
        Self::UnqualifiedJoin,
        Self::SchemaObjectName,
        Self::Identifier,
        Self::Alias,
        Self::TableHint,
        Self::StringLiteral,
    ];

    /// Returns true if nodes of this kind belong to `class`.
    #[must_use]
    pub const fn is_a(self, class: NodeClass) -> bool {
        match class {
            NodeClass::Statement => matches!(
                self,
                Self::SelectStatement
                    | Self::InsertStatement
                    | Self::UpdateStatement
                    | Self::DeleteStatement
                    | Self::MergeStatement
                    | Self::ExecuteStatement
                    | Self::UnparsedStatement
            ),
            NodeClass::QueryExpression => matches!(
                self,
                Self::QuerySpecification | Self::BinaryQueryExpression
            ),
            NodeClass::TableReference => matches!(
                self,
                Self::NamedTableReference
                    | Self::QueryDerivedTable
                    | Self::VariableTableReference
                    | Self::FunctionTableReference
                    | Self::QualifiedJoin
                    | Self::UnqualifiedJoin
            ),
            NodeClass::JoinTableReference => {
                matches!(self, Self::QualifiedJoin | Self::UnqualifiedJoin)
            }
        }
    }
}

/// Groups of node kinds that rules can subscribe to as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Statement,
    QueryExpression,
    /// Anything that can appear in a FROM clause, joins included
    TableReference,
    JoinTableReference,
}

/// Index of a fragment inside its [`FragmentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(u32);

impl FragmentId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One syntax node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: NodeKind,
    /// Children in source order
    pub children: Vec<FragmentId>,
    /// Index of the first significant token covered by this node
    pub first_token: usize,
    /// Index of the last significant token covered by this node
    pub last_token: usize,
    pub start_line: u32,
    pub start_column: u32,
    /// Identifier text, hint name, CTE name or string content
    pub value: Option<String>,
}

/// A parsed script: the token stream plus the fragments built over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentTree {
    tokens: Vec<Token>,
    fragments: Vec<Fragment>,
    root: FragmentId,
}

impl FragmentTree {
    /// Assembles a tree from parts; `root` must index into `fragments`.
    #[must_use]
    pub fn from_parts(tokens: Vec<Token>, fragments: Vec<Fragment>, root: FragmentId) -> Self {
        debug_assert!(root.index() < fragments.len());
        Self {
            tokens,
            fragments,
            root,
        }
    }

    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    #[must_use]
    pub fn node(&self, id: FragmentId) -> Node<'_> {
        Node { tree: self, id }
    }

    #[must_use]
    pub fn fragment(&self, id: FragmentId) -> &Fragment {
        &self.fragments[id.index()]
    }

    /// The shared token stream, trivia included.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Move every token and fragment position through `relocate`.
    pub(crate) fn relocate(&mut self, mut relocate: impl FnMut(u32, u32) -> (u32, u32)) {
        for token in &mut self.tokens {
            (token.line, token.column) = relocate(token.line, token.column);
        }
        for fragment in &mut self.fragments {
            (fragment.start_line, fragment.start_column) =
                relocate(fragment.start_line, fragment.start_column);
        }
    }

    /// Indented outline of the tree, one node per line, for tests and debugging.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(self.root(), 0, &mut out);
        out
    }

    fn write_outline(&self, node: Node<'_>, depth: usize, out: &mut String) {
        use std::fmt::Write;

        let _ = write!(
            out,
            "{}{:?}@{}:{}",
            "  ".repeat(depth),
            node.kind(),
            node.start_line(),
            node.start_column()
        );
        if let Some(value) = node.value() {
            let _ = write!(out, " {value:?}");
        }
        out.push('\n');
        for child in node.children() {
            self.write_outline(child, depth + 1, out);
        }
    }
}

/// A borrowed handle to one fragment of a tree.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    tree: &'a FragmentTree,
    id: FragmentId,
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("line", &self.start_line())
            .field("column", &self.start_column())
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl<'a> Node<'a> {
    #[must_use]
    pub const fn id(self) -> FragmentId {
        self.id
    }

    #[must_use]
    pub fn fragment(self) -> &'a Fragment {
        self.tree.fragment(self.id)
    }

    #[must_use]
    pub fn kind(self) -> NodeKind {
        self.fragment().kind
    }

    #[must_use]
    pub fn is_a(self, class: NodeClass) -> bool {
        self.kind().is_a(class)
    }

    #[must_use]
    pub fn start_line(self) -> u32 {
        self.fragment().start_line
    }

    #[must_use]
    pub fn start_column(self) -> u32 {
        self.fragment().start_column
    }

    #[must_use]
    pub fn first_token(self) -> usize {
        self.fragment().first_token
    }

    #[must_use]
    pub fn value(self) -> Option<&'a str> {
        self.fragment().value.as_deref()
    }

    /// The tree's whole token stream.
    #[must_use]
    pub fn tokens(self) -> &'a [Token] {
        self.tree.tokens()
    }

    pub fn children(self) -> impl Iterator<Item = Node<'a>> + 'a {
        let tree = self.tree;
        self.fragment()
            .children
            .iter()
            .map(move |&id| tree.node(id))
    }

    /// All nodes below this one, in pre-order. The node itself is not included.
    #[must_use]
    pub fn descendants(self) -> Descendants<'a> {
        let mut stack: Vec<FragmentId> = self.fragment().children.clone();
        stack.reverse();
        Descendants {
            tree: self.tree,
            stack,
        }
    }

    #[must_use]
    pub fn child_of_kind(self, kind: NodeKind) -> Option<Node<'a>> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Last part of a table reference's name (`Orders` in `db.dbo.Orders`).
    #[must_use]
    pub fn base_identifier(self) -> Option<&'a str> {
        let name = if self.kind() == NodeKind::SchemaObjectName {
            self
        } else {
            self.child_of_kind(NodeKind::SchemaObjectName)?
        };
        name.children()
            .filter(|part| part.kind() == NodeKind::Identifier)
            .last()
            .and_then(Node::value)
    }

    #[must_use]
    pub fn alias(self) -> Option<&'a str> {
        self.child_of_kind(NodeKind::Alias).and_then(Node::value)
    }

    /// Hint names attached to a table reference, upper-cased.
    pub fn table_hints(self) -> impl Iterator<Item = &'a str> + 'a {
        self.children()
            .filter(|child| child.kind() == NodeKind::TableHint)
            .filter_map(Node::value)
    }

    #[must_use]
    pub fn has_table_hint(self, hint: &str) -> bool {
        self.table_hints().any(|h| h.eq_ignore_ascii_case(hint))
    }
}

/// Pre-order iterator over the nodes below a fragment.
pub struct Descendants<'a> {
    tree: &'a FragmentTree,
    stack: Vec<FragmentId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let fragment = self.tree.fragment(id);
        self.stack.extend(fragment.children.iter().rev());
        Some(self.tree.node(id))
    }
}

//! Lenient T-SQL parser.
//!
//! Builds fragments only for the constructs lint rules inspect: statements,
//! common table expressions, FROM clauses, joins, table references with
//! aliases and hints, subqueries, and `EXEC` of string literals. Everything
//! else is skipped token by token, so any token stream yields a tree.

use crate::error::Result;
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};
use crate::tree::{Fragment, FragmentId, FragmentTree, NodeKind};

/// Keywords that begin a new statement when seen outside parentheses.
const STATEMENT_KEYWORDS: &[&str] = &[
    "select", "insert", "update", "delete", "merge", "exec", "execute", "declare", "set", "if",
    "else", "while", "begin", "end", "return", "print", "create", "alter", "drop", "truncate",
    "use", "go", "raiserror", "throw", "commit", "rollback", "break", "continue", "waitfor",
    "grant", "revoke",
];

const QUERY_CLAUSE_KEYWORDS: &[&str] = &[
    "from", "into", "where", "group", "having", "order", "union", "except", "intersect", "option",
    "for",
];

const JOIN_CONDITION_STOPS: &[&str] = &[
    ",", "join", "inner", "left", "right", "full", "cross", "outer", "where", "group", "having",
    "order", "union", "except", "intersect", "option", "for",
];

/// Words that can follow a table reference and therefore never name an alias.
const NON_ALIAS_KEYWORDS: &[&str] = &[
    "as", "on", "where", "join", "inner", "left", "right", "full", "cross", "outer", "group",
    "having", "order", "union", "except", "intersect", "option", "for", "with", "from", "using",
    "when", "then", "pivot", "unpivot", "tablesample", "values", "default", "output", "into",
];

const TABLE_HINTS: &[&str] = &[
    "nolock",
    "readuncommitted",
    "readcommitted",
    "readcommittedlock",
    "repeatableread",
    "serializable",
    "holdlock",
    "updlock",
    "xlock",
    "rowlock",
    "paglock",
    "tablock",
    "tablockx",
    "nowait",
    "readpast",
    "snapshot",
    "index",
    "forceseek",
    "forcescan",
    "noexpand",
];

/// Parse script text into a fragment tree.
#[tracing::instrument(skip(source), fields(size = source.len()))]
pub fn parse(source: &str) -> Result<FragmentTree> {
    let tokens = tokenize(source)?;
    let (fragments, root) = {
        let mut parser = Parser::new(&tokens);
        let root = parser.parse_script();
        (parser.fragments, root)
    };
    tracing::debug!(
        tokens = tokens.len(),
        fragments = fragments.len(),
        "Parsed script"
    );
    Ok(FragmentTree::from_parts(tokens, fragments, root))
}

struct Parser<'t> {
    tokens: &'t [Token],
    /// Index of the current significant token (or `tokens.len()` at the end)
    pos: usize,
    /// Index of the last significant token consumed
    last: usize,
    fragments: Vec<Fragment>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        let mut parser = Self {
            tokens,
            pos: 0,
            last: 0,
            fragments: Vec::new(),
        };
        parser.skip_trivia();
        parser
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    fn skip_trivia(&mut self) {
        while self.tokens.get(self.pos).is_some_and(Token::is_trivia) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    /// The `n`-th significant token from the cursor (`0` is the current one).
    fn peek_nth(&self, n: usize) -> Option<&'t Token> {
        self.tokens
            .get(self.pos..)?
            .iter()
            .filter(|t| !t.is_trivia())
            .nth(n)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(keyword))
    }

    fn at_any_keyword(&self, keywords: &[&str]) -> bool {
        self.peek().is_some_and(|t| t.is_any_keyword(keywords))
    }

    fn nth_is_kind(&self, n: usize, kind: TokenKind) -> bool {
        self.peek_nth(n).is_some_and(|t| t.kind == kind)
    }

    fn nth_is_keyword(&self, n: usize, keyword: &str) -> bool {
        self.peek_nth(n).is_some_and(|t| t.is_keyword(keyword))
    }

    /// Consumes the current token and returns its index.
    fn bump(&mut self) -> usize {
        let index = self.pos;
        if index < self.tokens.len() {
            self.last = index;
            self.pos += 1;
            self.skip_trivia();
        }
        index
    }

    fn eat_kind(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn is_reserved(token: &Token) -> bool {
        token.is_any_keyword(NON_ALIAS_KEYWORDS) || token.is_any_keyword(STATEMENT_KEYWORDS)
    }

    fn at_cte_start(&self) -> bool {
        self.at_keyword("with")
            && self.peek_nth(1).is_some_and(|t| {
                matches!(t.kind, TokenKind::Identifier | TokenKind::QuotedIdentifier)
            })
            && (self.nth_is_kind(2, TokenKind::LeftParen)
                || (self.nth_is_keyword(2, "as") && self.nth_is_kind(3, TokenKind::LeftParen)))
    }

    fn at_statement_start(&self) -> bool {
        self.at_any_keyword(STATEMENT_KEYWORDS) || self.at_cte_start()
    }

    /// Whether an expression being skipped ends at the current token.
    fn at_stop(&self, stops: &[&str]) -> bool {
        let Some(token) = self.peek() else {
            return true;
        };
        match token.kind {
            TokenKind::Semicolon | TokenKind::RightParen => true,
            TokenKind::Comma => stops.contains(&","),
            TokenKind::Identifier => {
                // LEFT(x, 2) and RIGHT(x, 2) are function calls, not joins
                if token.is_any_keyword(&["left", "right"])
                    && self.nth_is_kind(1, TokenKind::LeftParen)
                {
                    return false;
                }
                token.is_any_keyword(stops) || self.at_statement_start()
            }
            _ => false,
        }
    }

    // =========================================================================
    // Fragment construction
    // =========================================================================

    fn push(
        &mut self,
        kind: NodeKind,
        children: Vec<FragmentId>,
        first: usize,
        value: Option<String>,
    ) -> FragmentId {
        let (start_line, start_column) = self
            .tokens
            .get(first)
            .or_else(|| self.tokens.last())
            .map_or((1, 1), |t| (t.line, t.column));
        let id = FragmentId::new(self.fragments.len());
        self.fragments.push(Fragment {
            kind,
            children,
            first_token: first,
            last_token: self.last.max(first),
            start_line,
            start_column,
            value,
        });
        id
    }

    fn first_token_of(&self, id: FragmentId) -> usize {
        self.fragments[id.index()].first_token
    }

    // =========================================================================
    // Skipping
    // =========================================================================

    /// Skips a balanced `( ... )` group starting at the cursor.
    fn skip_parenthesized(&mut self) {
        if !self.eat_kind(TokenKind::LeftParen) {
            return;
        }
        let mut depth = 1usize;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                _ => {}
            }
            self.bump();
            if depth == 0 {
                break;
            }
        }
    }

    /// Skips an expression up to a stop keyword, `;`, an unbalanced `)` or the
    /// start of the next statement. Parenthesized subqueries are parsed and
    /// appended to `children`.
    fn skip_expression(&mut self, stops: &[&str], children: &mut Vec<FragmentId>) {
        let mut depth = 0usize;
        let mut case_depth = 0usize;
        while let Some(token) = self.peek() {
            if depth == 0 {
                if matches!(token.kind, TokenKind::Semicolon | TokenKind::RightParen) {
                    break;
                }
                if case_depth == 0 && self.at_stop(stops) {
                    break;
                }
            }
            match token.kind {
                TokenKind::LeftParen if self.nth_is_keyword(1, "select") => {
                    children.push(self.parse_scalar_subquery());
                }
                TokenKind::LeftParen => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RightParen => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                TokenKind::Identifier if token.is_keyword("case") => {
                    case_depth += 1;
                    self.bump();
                }
                TokenKind::Identifier if case_depth > 0 && token.is_keyword("end") => {
                    case_depth -= 1;
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn skip_top(&mut self) {
        if self.eat_keyword("top") {
            if self.at_kind(TokenKind::LeftParen) {
                self.skip_parenthesized();
            } else {
                self.bump();
            }
            self.eat_keyword("percent");
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_script(&mut self) -> FragmentId {
        let mut statements = Vec::new();
        while !self.at_end() {
            if self.eat_kind(TokenKind::Semicolon) {
                continue;
            }
            let before = self.pos;
            statements.push(self.parse_statement());
            if self.pos == before {
                self.bump();
            }
        }
        self.push(NodeKind::Script, statements, 0, None)
    }

    fn parse_statement(&mut self) -> FragmentId {
        let first = self.pos;
        let ctes = if self.at_cte_start() {
            Some(self.parse_with_ctes())
        } else {
            None
        };
        let children: Vec<FragmentId> = ctes.into_iter().collect();

        let Some(token) = self.peek() else {
            return self.push(NodeKind::UnparsedStatement, children, first, None);
        };

        if token.is_keyword("select")
            || (token.kind == TokenKind::LeftParen && self.nth_is_keyword(1, "select"))
        {
            self.parse_select_statement(first, children)
        } else if token.is_keyword("insert") {
            self.parse_insert(first, children)
        } else if token.is_keyword("update") {
            self.parse_update(first, children)
        } else if token.is_keyword("delete") {
            self.parse_delete(first, children)
        } else if token.is_keyword("merge") {
            self.parse_merge(first, children)
        } else if ctes.is_some() {
            self.push(NodeKind::UnparsedStatement, children, first, None)
        } else if token.is_any_keyword(&["exec", "execute"]) {
            self.parse_execute()
        } else {
            self.parse_unparsed(first)
        }
    }

    fn parse_unparsed(&mut self, first: usize) -> FragmentId {
        self.bump();
        let mut children = Vec::new();
        self.skip_expression(&[], &mut children);
        self.push(NodeKind::UnparsedStatement, children, first, None)
    }

    fn parse_select_statement(&mut self, first: usize, mut children: Vec<FragmentId>) -> FragmentId {
        children.push(self.parse_query_expression());
        while self.at_any_keyword(&["order", "option", "for"]) {
            self.bump();
            self.skip_expression(QUERY_CLAUSE_KEYWORDS, &mut children);
        }
        self.push(NodeKind::SelectStatement, children, first, None)
    }

    fn parse_insert(&mut self, first: usize, mut children: Vec<FragmentId>) -> FragmentId {
        self.bump(); // INSERT
        self.skip_top();
        self.eat_keyword("into");
        children.extend(self.parse_dml_target(false));
        if self.at_kind(TokenKind::LeftParen) && !self.nth_is_keyword(1, "select") {
            self.skip_parenthesized(); // column list
        }
        if self.eat_keyword("output") {
            self.skip_expression(&["values", "default"], &mut children);
        }

        if self.eat_keyword("values") {
            self.skip_expression(&[], &mut children);
        } else if self.eat_keyword("default") {
            self.eat_keyword("values");
        } else if self.at_any_keyword(&["exec", "execute"]) {
            children.push(self.parse_execute());
        } else if self.at_keyword("select") || self.at_kind(TokenKind::LeftParen) {
            children.push(self.parse_query_expression());
        }
        self.push(NodeKind::InsertStatement, children, first, None)
    }

    fn parse_update(&mut self, first: usize, mut children: Vec<FragmentId>) -> FragmentId {
        self.bump(); // UPDATE
        self.skip_top();
        children.extend(self.parse_dml_target(false));
        if self.eat_keyword("set") {
            self.skip_expression(&["from", "where", "option", "output"], &mut children);
        }
        if self.eat_keyword("output") {
            self.skip_expression(&["from", "where", "option"], &mut children);
        }
        self.parse_trailing_from_where(&mut children);
        self.push(NodeKind::UpdateStatement, children, first, None)
    }

    fn parse_delete(&mut self, first: usize, mut children: Vec<FragmentId>) -> FragmentId {
        self.bump(); // DELETE
        self.skip_top();
        self.eat_keyword("from");
        children.extend(self.parse_dml_target(false));
        if self.eat_keyword("output") {
            self.skip_expression(&["from", "where", "option"], &mut children);
        }
        self.parse_trailing_from_where(&mut children);
        self.push(NodeKind::DeleteStatement, children, first, None)
    }

    fn parse_trailing_from_where(&mut self, children: &mut Vec<FragmentId>) {
        if self.at_keyword("from") {
            children.push(self.parse_from_clause());
        }
        if self.at_keyword("where") {
            children.push(self.parse_where_clause());
        }
        if self.eat_keyword("option") {
            self.skip_expression(&[], children);
        }
    }

    fn parse_merge(&mut self, first: usize, mut children: Vec<FragmentId>) -> FragmentId {
        self.bump(); // MERGE
        self.skip_top();
        self.eat_keyword("into");
        children.extend(self.parse_dml_target(true));
        if self.eat_keyword("using") {
            children.extend(self.parse_table_source());
        }
        // WHEN clauses contain INSERT/UPDATE/DELETE; MERGE always ends with `;`
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Semicolon => break,
                TokenKind::LeftParen if self.nth_is_keyword(1, "select") => {
                    children.push(self.parse_scalar_subquery());
                }
                _ => {
                    self.bump();
                }
            }
        }
        self.push(NodeKind::MergeStatement, children, first, None)
    }

    fn parse_execute(&mut self) -> FragmentId {
        let first = self.bump(); // EXEC
        let mut children = Vec::new();

        if self.eat_kind(TokenKind::LeftParen) {
            // EXEC ('...' + '...')
            let mut depth = 0usize;
            while let Some(token) = self.peek() {
                match token.kind {
                    TokenKind::RightParen if depth == 0 => {
                        self.bump();
                        break;
                    }
                    TokenKind::StringLiteral if depth == 0 => {
                        children.push(self.parse_string_literal());
                        continue;
                    }
                    TokenKind::LeftParen => depth += 1,
                    TokenKind::RightParen => depth -= 1,
                    _ => {}
                }
                self.bump();
            }
        } else {
            // EXEC @rc = proc ...
            if self.at_kind(TokenKind::Variable) && self.nth_is_kind(1, TokenKind::Operator) {
                self.bump();
                self.bump();
            }
            let name = self.parse_schema_object_name();
            let is_executesql = self.fragments[name.index()]
                .children
                .last()
                .and_then(|id| self.fragments[id.index()].value.as_deref())
                .is_some_and(|n| n.eq_ignore_ascii_case("sp_executesql"));
            children.push(name);
            if is_executesql && self.at_kind(TokenKind::StringLiteral) {
                children.push(self.parse_string_literal());
            }
            self.skip_expression(&[], &mut children);
        }

        self.push(NodeKind::ExecuteStatement, children, first, None)
    }

    fn parse_string_literal(&mut self) -> FragmentId {
        let first = self.bump();
        let value = self.tokens.get(first).and_then(Token::string_value);
        self.push(NodeKind::StringLiteral, Vec::new(), first, value)
    }

    // =========================================================================
    // Common table expressions and queries
    // =========================================================================

    fn parse_with_ctes(&mut self) -> FragmentId {
        let first = self.bump(); // WITH
        let mut ctes = Vec::new();
        while let Some(name_token) = self.peek() {
            if !matches!(
                name_token.kind,
                TokenKind::Identifier | TokenKind::QuotedIdentifier
            ) {
                break;
            }
            let cte_first = self.bump();
            let mut children = Vec::new();
            if self.at_kind(TokenKind::LeftParen) {
                self.skip_parenthesized(); // column list
            }
            self.eat_keyword("as");
            if self.eat_kind(TokenKind::LeftParen) {
                children.push(self.parse_query_expression());
                self.eat_kind(TokenKind::RightParen);
            }
            ctes.push(self.push(
                NodeKind::CommonTableExpression,
                children,
                cte_first,
                Some(name_token.identifier_value()),
            ));
            if !self.eat_kind(TokenKind::Comma) {
                break;
            }
        }
        self.push(NodeKind::WithCommonTableExpressions, ctes, first, None)
    }

    fn parse_query_expression(&mut self) -> FragmentId {
        let first = self.pos;
        let mut left = self.parse_query_primary();
        while self.at_any_keyword(&["union", "except", "intersect"]) {
            self.bump();
            self.eat_keyword("all");
            let right = self.parse_query_primary();
            left = self.push(NodeKind::BinaryQueryExpression, vec![left, right], first, None);
        }
        left
    }

    fn parse_query_primary(&mut self) -> FragmentId {
        if self.eat_kind(TokenKind::LeftParen) {
            let inner = self.parse_query_expression();
            self.eat_kind(TokenKind::RightParen);
            return inner;
        }
        if self.at_keyword("select") {
            return self.parse_query_specification();
        }
        let first = self.pos;
        let mut children = Vec::new();
        self.skip_expression(QUERY_CLAUSE_KEYWORDS, &mut children);
        self.push(NodeKind::QuerySpecification, children, first, None)
    }

    fn parse_query_specification(&mut self) -> FragmentId {
        let first = self.bump(); // SELECT
        let mut children = Vec::new();
        self.skip_expression(QUERY_CLAUSE_KEYWORDS, &mut children);
        if self.eat_keyword("into") {
            children.push(self.parse_schema_object_name());
        }
        if self.at_keyword("from") {
            children.push(self.parse_from_clause());
        }
        if self.at_keyword("where") {
            children.push(self.parse_where_clause());
        }
        while self.at_any_keyword(&["group", "having", "order", "option", "for"]) {
            self.bump();
            self.skip_expression(QUERY_CLAUSE_KEYWORDS, &mut children);
        }
        self.push(NodeKind::QuerySpecification, children, first, None)
    }

    fn parse_scalar_subquery(&mut self) -> FragmentId {
        let first = self.bump(); // (
        let query = self.parse_query_expression();
        self.eat_kind(TokenKind::RightParen);
        self.push(NodeKind::ScalarSubquery, vec![query], first, None)
    }

    fn parse_where_clause(&mut self) -> FragmentId {
        let first = self.bump(); // WHERE
        let mut children = Vec::new();
        self.skip_expression(QUERY_CLAUSE_KEYWORDS, &mut children);
        self.push(NodeKind::WhereClause, children, first, None)
    }

    // =========================================================================
    // FROM clause and table references
    // =========================================================================

    fn parse_from_clause(&mut self) -> FragmentId {
        let first = self.bump(); // FROM
        let mut sources = Vec::new();
        loop {
            sources.extend(self.parse_table_source());
            if !self.eat_kind(TokenKind::Comma) {
                break;
            }
        }
        self.push(NodeKind::FromClause, sources, first, None)
    }

    fn at_qualified_join(&self) -> bool {
        self.at_any_keyword(&["join", "inner"])
            || (self.at_any_keyword(&["left", "right", "full"])
                && !self.nth_is_kind(1, TokenKind::LeftParen))
    }

    fn at_unqualified_join(&self) -> bool {
        (self.at_keyword("cross")
            && self
                .peek_nth(1)
                .is_some_and(|t| t.is_any_keyword(&["join", "apply"])))
            || (self.at_keyword("outer") && self.nth_is_keyword(1, "apply"))
    }

    /// A table reference followed by any number of joins, left-associative.
    fn parse_table_source(&mut self) -> Option<FragmentId> {
        let mut left = self.parse_table_primary()?;
        loop {
            let first = self.first_token_of(left);
            if self.at_qualified_join() {
                // INNER / LEFT OUTER / join hints, then JOIN
                for _ in 0..4 {
                    if self.eat_keyword("join") {
                        break;
                    }
                    self.bump();
                }
                let mut children = vec![left];
                children.extend(self.parse_table_primary());
                if self.eat_keyword("on") {
                    self.skip_expression(JOIN_CONDITION_STOPS, &mut children);
                }
                left = self.push(NodeKind::QualifiedJoin, children, first, None);
            } else if self.at_unqualified_join() {
                self.bump(); // CROSS / OUTER
                self.bump(); // JOIN / APPLY
                let mut children = vec![left];
                children.extend(self.parse_table_primary());
                left = self.push(NodeKind::UnqualifiedJoin, children, first, None);
            } else {
                break;
            }
        }
        Some(left)
    }

    fn parse_table_primary(&mut self) -> Option<FragmentId> {
        let token = self.peek()?;
        let first = self.pos;
        match token.kind {
            TokenKind::LeftParen => {
                if self.nth_is_keyword(1, "select") || self.nth_is_keyword(1, "values") {
                    self.bump(); // (
                    let mut children = Vec::new();
                    if self.at_keyword("values") {
                        self.skip_expression(&[], &mut children);
                    } else {
                        children.push(self.parse_query_expression());
                    }
                    self.eat_kind(TokenKind::RightParen);
                    children.extend(self.parse_alias());
                    if self.at_kind(TokenKind::LeftParen) {
                        self.skip_parenthesized(); // column aliases
                    }
                    Some(self.push(NodeKind::QueryDerivedTable, children, first, None))
                } else {
                    self.bump(); // (
                    let inner = self.parse_table_source();
                    self.eat_kind(TokenKind::RightParen);
                    inner
                }
            }
            TokenKind::Variable => {
                self.bump();
                let children = self.parse_alias().into_iter().collect();
                Some(self.push(
                    NodeKind::VariableTableReference,
                    children,
                    first,
                    Some(token.text.clone()),
                ))
            }
            TokenKind::Identifier | TokenKind::QuotedIdentifier => {
                if token.kind == TokenKind::Identifier && Self::is_reserved(token) {
                    return None;
                }
                let mut children = vec![self.parse_schema_object_name()];
                if self.at_kind(TokenKind::LeftParen) && !self.at_legacy_hint_list() {
                    // OPENJSON(...), dbo.fn(...)
                    self.skip_parenthesized();
                    children.extend(self.parse_alias());
                    return Some(self.push(
                        NodeKind::FunctionTableReference,
                        children,
                        first,
                        None,
                    ));
                }
                children.extend(self.parse_alias());
                children.extend(self.parse_table_hints());
                Some(self.push(NodeKind::NamedTableReference, children, first, None))
            }
            _ => None,
        }
    }

    /// Target of INSERT/UPDATE/DELETE/MERGE: a name or table variable, optional hints.
    fn parse_dml_target(&mut self, allow_alias: bool) -> Option<FragmentId> {
        let token = self.peek()?;
        let first = self.pos;
        match token.kind {
            TokenKind::Variable => {
                self.bump();
                let children = if allow_alias {
                    self.parse_alias().into_iter().collect()
                } else {
                    Vec::new()
                };
                Some(self.push(
                    NodeKind::VariableTableReference,
                    children,
                    first,
                    Some(token.text.clone()),
                ))
            }
            TokenKind::Identifier | TokenKind::QuotedIdentifier
                if token.kind == TokenKind::QuotedIdentifier || !Self::is_reserved(token) =>
            {
                let mut children = vec![self.parse_schema_object_name()];
                if allow_alias {
                    children.extend(self.parse_alias());
                }
                if self.at_keyword("with") && self.nth_is_kind(1, TokenKind::LeftParen) {
                    self.bump();
                    children.extend(self.parse_hint_list());
                }
                Some(self.push(NodeKind::NamedTableReference, children, first, None))
            }
            _ => None,
        }
    }

    fn parse_schema_object_name(&mut self) -> FragmentId {
        let first = self.pos;
        let mut parts = Vec::new();
        parts.extend(self.parse_identifier());
        while self.eat_kind(TokenKind::Dot) {
            parts.extend(self.parse_identifier());
        }
        self.push(NodeKind::SchemaObjectName, parts, first, None)
    }

    fn parse_identifier(&mut self) -> Option<FragmentId> {
        let token = self.peek()?;
        if !matches!(
            token.kind,
            TokenKind::Identifier | TokenKind::QuotedIdentifier
        ) {
            return None;
        }
        let first = self.bump();
        Some(self.push(
            NodeKind::Identifier,
            Vec::new(),
            first,
            Some(token.identifier_value()),
        ))
    }

    fn parse_alias(&mut self) -> Option<FragmentId> {
        let first = self.pos;
        if self.eat_keyword("as") {
            let token = self.peek()?;
            let value = match token.kind {
                TokenKind::Identifier | TokenKind::QuotedIdentifier => token.identifier_value(),
                TokenKind::StringLiteral => token.string_value()?,
                _ => return None,
            };
            self.bump();
            return Some(self.push(NodeKind::Alias, Vec::new(), first, Some(value)));
        }

        let token = self.peek()?;
        let is_alias = match token.kind {
            TokenKind::QuotedIdentifier => true,
            TokenKind::Identifier => !Self::is_reserved(token),
            _ => false,
        };
        if !is_alias {
            return None;
        }
        self.bump();
        Some(self.push(
            NodeKind::Alias,
            Vec::new(),
            first,
            Some(token.identifier_value()),
        ))
    }

    fn at_legacy_hint_list(&self) -> bool {
        self.at_kind(TokenKind::LeftParen)
            && self
                .peek_nth(1)
                .is_some_and(|t| t.is_any_keyword(TABLE_HINTS))
    }

    /// `WITH (NOLOCK, INDEX(ix))` or the legacy `(NOLOCK)` form.
    fn parse_table_hints(&mut self) -> Vec<FragmentId> {
        if self.at_keyword("with") && self.nth_is_kind(1, TokenKind::LeftParen) {
            self.bump();
            return self.parse_hint_list();
        }
        if self.at_legacy_hint_list() {
            return self.parse_hint_list();
        }
        Vec::new()
    }

    fn parse_hint_list(&mut self) -> Vec<FragmentId> {
        let mut hints = Vec::new();
        if !self.eat_kind(TokenKind::LeftParen) {
            return hints;
        }
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::RightParen => {
                    self.bump();
                    break;
                }
                TokenKind::Identifier => {
                    let first = self.bump();
                    if self.at_kind(TokenKind::LeftParen) {
                        self.skip_parenthesized(); // INDEX(ix)
                    } else if self.eat_kind(TokenKind::Operator)
                        && !self.at_kind(TokenKind::RightParen)
                        && !self.at_kind(TokenKind::Comma)
                    {
                        self.bump(); // INDEX = ix
                    }
                    hints.push(self.push(
                        NodeKind::TableHint,
                        Vec::new(),
                        first,
                        Some(token.text.to_ascii_uppercase()),
                    ));
                }
                _ => {
                    self.bump();
                }
            }
        }
        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, NodeClass};

    fn kinds(source: &str) -> Vec<NodeKind> {
        let tree = parse(source).unwrap();
        tree.root().descendants().map(Node::kind).collect()
    }

    fn named_tables(source: &str) -> Vec<(String, Option<String>, Vec<String>)> {
        let tree = parse(source).unwrap();
        tree.root()
            .descendants()
            .filter(|n| n.kind() == NodeKind::NamedTableReference)
            .map(|n| {
                (
                    n.base_identifier().unwrap_or_default().to_string(),
                    n.alias().map(str::to_string),
                    n.table_hints().map(str::to_string).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_outline_of_cte_and_join() {
        let tree = parse(
            "WITH recent AS (SELECT Id FROM Orders)\n\
             SELECT * FROM recent r JOIN dbo.Items WITH (NOLOCK) ON r.Id = Items.OrderId",
        )
        .unwrap();
        insta::assert_snapshot!(tree.outline().trim_end(), @r#"
        Script@1:1
          SelectStatement@1:1
            WithCommonTableExpressions@1:1
              CommonTableExpression@1:6 "recent"
                QuerySpecification@1:17
                  FromClause@1:27
                    NamedTableReference@1:32
                      SchemaObjectName@1:32
                        Identifier@1:32 "Orders"
            QuerySpecification@2:1
              FromClause@2:10
                QualifiedJoin@2:15
                  NamedTableReference@2:15
                    SchemaObjectName@2:15
                      Identifier@2:15 "recent"
                    Alias@2:22 "r"
                  NamedTableReference@2:29
                    SchemaObjectName@2:29
                      Identifier@2:29 "dbo"
                      Identifier@2:33 "Items"
                    TableHint@2:45 "NOLOCK"
        "#);
    }

    #[test]
    fn test_simple_select() {
        assert_eq!(
            kinds("SELECT * FROM Orders"),
            vec![
                NodeKind::SelectStatement,
                NodeKind::QuerySpecification,
                NodeKind::FromClause,
                NodeKind::NamedTableReference,
                NodeKind::SchemaObjectName,
                NodeKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_aliases_and_hints() {
        assert_eq!(
            named_tables(
                "SELECT * FROM Orders AS o WITH (NOLOCK, INDEX(ix_orders)) \
                 JOIN [Sales].[Customers] c (READUNCOMMITTED) ON o.CustomerId = c.Id"
            ),
            vec![
                (
                    "Orders".to_string(),
                    Some("o".to_string()),
                    vec!["NOLOCK".to_string(), "INDEX".to_string()]
                ),
                (
                    "Customers".to_string(),
                    Some("c".to_string()),
                    vec!["READUNCOMMITTED".to_string()]
                ),
            ]
        );
    }

    #[test]
    fn test_keywords_are_not_aliases() {
        assert_eq!(
            named_tables("SELECT * FROM Orders WHERE Id = 1\nSELECT * FROM Items"),
            vec![
                ("Orders".to_string(), None, vec![]),
                ("Items".to_string(), None, vec![]),
            ]
        );
    }

    #[test]
    fn test_join_chain_is_left_associative() {
        let tree = parse("SELECT * FROM A JOIN B ON A.id = B.id LEFT OUTER JOIN C ON C.id = B.id").unwrap();
        let joins: Vec<Node<'_>> = tree
            .root()
            .descendants()
            .filter(|n| n.is_a(NodeClass::JoinTableReference))
            .collect();
        assert_eq!(joins.len(), 2);
        let outer = joins[0];
        let first_child = outer.children().next().unwrap();
        assert_eq!(first_child.kind(), NodeKind::QualifiedJoin);
        assert_eq!(first_child, joins[1]);
    }

    #[test]
    fn test_subqueries_are_parsed() {
        let tables = named_tables(
            "SELECT (SELECT MAX(x) FROM Inner1) AS m FROM Outer1 \
             WHERE Id IN (SELECT Id FROM Inner2) AND EXISTS (SELECT 1 FROM Inner3)",
        );
        let names: Vec<&str> = tables.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Inner1", "Outer1", "Inner2", "Inner3"]);
    }

    #[test]
    fn test_case_expression_does_not_end_statement() {
        let tables = named_tables(
            "SELECT CASE WHEN a = 1 THEN 'x' ELSE 'y' END AS c FROM Orders",
        );
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].0, "Orders");
    }

    #[test]
    fn test_dml_statements() {
        let tree = parse(
            "INSERT INTO Orders (Id) SELECT Id FROM Staging;\n\
             UPDATE Orders SET Total = 0 FROM Orders o JOIN Items i ON i.OrderId = o.Id;\n\
             DELETE FROM Orders WHERE Id IN (SELECT Id FROM Cancelled);",
        )
        .unwrap();
        let statements: Vec<NodeKind> = tree.root().children().map(Node::kind).collect();
        assert_eq!(
            statements,
            vec![
                NodeKind::InsertStatement,
                NodeKind::UpdateStatement,
                NodeKind::DeleteStatement,
            ]
        );
        let names: Vec<&str> = tree
            .root()
            .descendants()
            .filter(|n| n.kind() == NodeKind::NamedTableReference)
            .filter_map(Node::base_identifier)
            .collect();
        assert_eq!(
            names,
            vec!["Orders", "Staging", "Orders", "Orders", "Items", "Orders", "Cancelled"]
        );
    }

    #[test]
    fn test_execute_string_literals() {
        let tree = parse("EXEC ('SELECT * FROM Orders');\nEXEC sp_executesql N'SELECT 1';").unwrap();
        let literals: Vec<&str> = tree
            .root()
            .descendants()
            .filter(|n| n.kind() == NodeKind::StringLiteral)
            .filter_map(Node::value)
            .collect();
        assert_eq!(literals, vec!["SELECT * FROM Orders", "SELECT 1"]);
    }

    #[test]
    fn test_unmodelled_statements_are_skipped() {
        let tree = parse(
            "SET NOCOUNT ON;\n\
             IF EXISTS (SELECT 1 FROM Flags) BEGIN PRINT 'x' END\n\
             DECLARE @t TABLE (Id INT)",
        )
        .unwrap();
        let names: Vec<&str> = tree
            .root()
            .descendants()
            .filter(|n| n.kind() == NodeKind::NamedTableReference)
            .filter_map(Node::base_identifier)
            .collect();
        assert_eq!(names, vec!["Flags"]);
        assert!(tree
            .root()
            .children()
            .all(|n| n.kind() == NodeKind::UnparsedStatement));
    }

    #[test]
    fn test_every_token_stream_parses() {
        for source in ["", "   ", ")", "((", "SELECT FROM", "FROM WHERE", "WITH", "EXEC (", "MERGE"] {
            assert!(parse(source).is_ok(), "failed on {source:?}");
        }
    }
}

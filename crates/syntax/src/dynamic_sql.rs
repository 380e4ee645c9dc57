//! Dynamic SQL embedded in `EXEC ('...')` and `sp_executesql N'...'`.

use crate::parser::parse;
use crate::tree::{FragmentTree, Node, NodeKind};

/// Where an embedded script starts in the outer script.
///
/// `column` is the outer column just before the first content character, so
/// an embedded node on `line` at column `c` sits at outer column `c + column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynamicSqlOrigin {
    pub line: u32,
    pub column: u32,
}

/// A parsed embedded script.
///
/// Lines are outer-script lines. Columns are those of the raw literal text,
/// escaped quotes included, so only nodes on `origin.line` need shifting.
#[derive(Debug, Clone)]
pub struct DynamicSql {
    pub tree: FragmentTree,
    pub origin: DynamicSqlOrigin,
}

/// Parse every string literal executed as dynamic SQL in `tree`.
///
/// Literals that fail to tokenize are skipped.
#[must_use]
pub fn extract_dynamic_sql(tree: &FragmentTree) -> Vec<DynamicSql> {
    tree.root()
        .descendants()
        .filter(|node| node.kind() == NodeKind::ExecuteStatement)
        .flat_map(|exec| exec.children().filter(|c| c.kind() == NodeKind::StringLiteral))
        .filter_map(parse_literal)
        .collect()
}

fn parse_literal(literal: Node<'_>) -> Option<DynamicSql> {
    let token = literal.tokens().get(literal.first_token())?;
    let prefix = token.string_prefix_len();
    let raw = token.text.get(prefix..token.text.len().saturating_sub(1))?;
    let origin = DynamicSqlOrigin {
        line: token.line,
        column: token.column + prefix as u32 - 1,
    };

    let content = Unescaped::new(raw);
    let mut tree = match parse(&content.text) {
        Ok(tree) => tree,
        Err(error) => {
            tracing::debug!(
                line = origin.line,
                column = origin.column,
                %error,
                "Skipping dynamic SQL that failed to parse"
            );
            return None;
        }
    };

    let line_offset = origin.line.saturating_sub(1);
    tree.relocate(|line, column| (line + line_offset, content.raw_column(line, column)));
    Some(DynamicSql { tree, origin })
}

/// Literal content with `''` unescaped, remembering where each character
/// sat in the raw text.
struct Unescaped {
    text: String,
    /// Per line, the raw column of every unescaped character
    raw_columns: Vec<Vec<u32>>,
}

impl Unescaped {
    fn new(raw: &str) -> Self {
        let mut text = String::with_capacity(raw.len());
        let mut raw_columns = vec![Vec::new()];
        let mut column = 1;
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            if let Some(line) = raw_columns.last_mut() {
                line.push(column);
            }
            text.push(c);
            if c == '\n' {
                raw_columns.push(Vec::new());
                column = 1;
                continue;
            }
            column += 1;
            if c == '\'' && chars.peek() == Some(&'\'') {
                chars.next();
                column += 1;
            }
        }

        Self { text, raw_columns }
    }

    fn raw_column(&self, line: u32, column: u32) -> u32 {
        let Some(columns) = self.raw_columns.get((line as usize).saturating_sub(1)) else {
            return column;
        };
        match columns.get((column as usize).saturating_sub(1)) {
            Some(&raw) => raw,
            // end of input sits one past the last character
            None => columns.last().copied().unwrap_or(0) + column - columns.len() as u32,
        }
    }
}

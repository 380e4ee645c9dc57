//! # T-SQL Syntax
//!
//! Tokenizer, fragment tree and lenient parser used by the linter.
//!
//! The lexer is lossless: every character of a script belongs to exactly one
//! [`Token`], trivia included. The parser builds a [`FragmentTree`] over that
//! token stream, modelling statements, common table expressions, FROM clauses,
//! joins and table references. Constructs it does not model are skipped, so
//! parsing only fails on unterminated strings, comments or quoted identifiers.
//!
//! ```
//! use tsql_syntax::{parse, NodeKind};
//!
//! let tree = parse("SELECT * FROM dbo.Orders o WITH (NOLOCK)").unwrap();
//! let table = tree
//!     .root()
//!     .descendants()
//!     .find(|n| n.kind() == NodeKind::NamedTableReference)
//!     .unwrap();
//! assert_eq!(table.base_identifier(), Some("Orders"));
//! assert_eq!(table.alias(), Some("o"));
//! assert!(table.has_table_hint("nolock"));
//! ```

mod dynamic_sql;
mod error;
mod lexer;
mod parser;
mod token;
mod tree;
mod visitor;

pub use dynamic_sql::{extract_dynamic_sql, DynamicSql, DynamicSqlOrigin};
pub use error::{ParseError, Result};
pub use lexer::{tokenize, Lexer};
pub use parser::parse;
pub use token::{Token, TokenKind};
pub use tree::{Descendants, Fragment, FragmentId, FragmentTree, Node, NodeClass, NodeKind};
pub use visitor::{walk, walk_children, walk_tree, FragmentVisitor};

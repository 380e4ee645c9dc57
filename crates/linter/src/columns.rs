//! Column arithmetic for lines indented with tabs.
//!
//! Token columns count a tab as one character; editors usually render it
//! wider. Rules that report editor columns widen each leading tab.

use tsql_syntax::Token;

pub const TAB_WIDTH: u32 = 4;

/// Tabs on the line of `tokens[index]` before that token.
#[must_use]
pub fn count_tabs_before(tokens: &[Token], index: usize) -> u32 {
    let mut tabs = 0;
    for token in tokens[..index.min(tokens.len())].iter().rev() {
        if let Some(newline) = token.text.rfind('\n') {
            return tabs + count_tabs(&token.text[newline + 1..]);
        }
        tabs += count_tabs(&token.text);
    }
    tabs
}

/// Column of `tokens[index]` with every preceding tab on its line widened to
/// [`TAB_WIDTH`].
#[must_use]
pub fn tab_adjusted_column(tokens: &[Token], index: usize) -> u32 {
    let Some(token) = tokens.get(index) else {
        return 1;
    };
    token.column + count_tabs_before(tokens, index) * (TAB_WIDTH - 1)
}

fn count_tabs(text: &str) -> u32 {
    text.chars().filter(|&c| c == '\t').count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(tokens: &[Token], text: &str) -> usize {
        tokens.iter().position(|t| t.text == text).unwrap()
    }

    #[test]
    fn test_no_tabs() {
        let tokens = tsql_syntax::tokenize("SELECT * FROM Orders").unwrap();
        let orders = index_of(&tokens, "Orders");
        assert_eq!(count_tabs_before(&tokens, orders), 0);
        assert_eq!(tab_adjusted_column(&tokens, orders), 15);
    }

    #[test]
    fn test_tabs_on_the_same_line_only() {
        let tokens = tsql_syntax::tokenize("SELECT\t*\nFROM\t\tOrders").unwrap();
        let orders = index_of(&tokens, "Orders");
        assert_eq!(count_tabs_before(&tokens, orders), 2);
        // "FROM" 1-4, tabs 5-6, "Orders" at 7, widened by 2 * 3
        assert_eq!(tab_adjusted_column(&tokens, orders), 13);
    }

    #[test]
    fn test_leading_indentation_in_whitespace_token() {
        let tokens = tsql_syntax::tokenize("SELECT *\n\tFROM Orders").unwrap();
        let orders = index_of(&tokens, "Orders");
        assert_eq!(count_tabs_before(&tokens, orders), 1);
        assert_eq!(tab_adjusted_column(&tokens, orders), 10);
    }

    #[test]
    fn test_out_of_range_index() {
        assert_eq!(tab_adjusted_column(&[], 3), 1);
        assert_eq!(count_tabs_before(&[], 3), 0);
    }
}

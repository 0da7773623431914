//! Read-only guard for free-form SQL.
//!
//! A textual check, not a parser: the trimmed query must start with an
//! allowed keyword and must not contain any write/DDL keyword as a whole
//! word anywhere (which also catches `SELECT 1; DROP TABLE x`). Keywords
//! hidden inside comments or string literals still trip it, and cleverly
//! obfuscated payloads can still slip past it. [`is_single_statement`]
//! separately limits a query to one statement. The connection used for
//! `sql_query` is opened read-only as well.

/// Message returned for every query that is not read-only.
pub const REJECTION_MESSAGE: &str = "only SELECT queries are allowed";

/// Keywords a query may start with.
const ALLOWED_LEADING: &[&str] = &["SELECT", "WITH"];

/// Keywords that may not appear anywhere as a whole word.
const DISALLOWED: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE", "EXEC", "EXECUTE", "MERGE",
    "CREATE", "ATTACH", "DETACH", "PRAGMA", "VACUUM", "REINDEX", "GRANT", "REVOKE",
];

/// Returns true if `query` passes the read-only guard.
pub fn is_read_only(query: &str) -> bool {
    let mut words = sql_words(query);

    let Some(first) = words.next() else {
        return false;
    };
    if !ALLOWED_LEADING.iter().any(|k| first.eq_ignore_ascii_case(k)) {
        return false;
    }

    !sql_words(query).any(|word| DISALLOWED.iter().any(|k| word.eq_ignore_ascii_case(k)))
}

/// Message returned when a query holds more than one statement.
pub const MULTIPLE_STATEMENTS_MESSAGE: &str = "only one SQL statement is allowed per query";

/// Returns true if `query` holds at most one statement.
///
/// A `;` inside a quoted literal, a quoted identifier or a comment does not
/// count. A trailing `;` followed only by whitespace or comments is allowed.
pub fn is_single_statement(query: &str) -> bool {
    let mut chars = query.chars().peekable();
    let mut ended = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' | '[' => {
                if ended {
                    return false;
                }
                let close = if c == '[' { ']' } else { c };
                for inner in chars.by_ref() {
                    if inner == close {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            ';' => ended = true,
            c if c.is_whitespace() => {}
            _ if ended => return false,
            _ => {}
        }
    }
    true
}

/// Split on anything that cannot be part of an identifier.
fn sql_words(query: &str) -> impl Iterator<Item = &str> {
    query
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
}

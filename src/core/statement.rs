//! Statement text glue
//!
//! Callers write statements with the generic `?` placeholder; this module
//! rewrites them to a driver's native positional marker and builds INSERT
//! statements from ordered column lists. No parsing beyond quote tracking
//! happens here: statements are otherwise passed to the driver untouched.

use super::driver::ParamStyle;

/// Rewrite generic `?` placeholders to the driver's native marker
///
/// Placeholders inside single- or double-quoted runs are left alone, so a
/// literal `'why?'` survives rewriting. `ParamStyle::Question` statements
/// are returned as-is.
pub fn rewrite_placeholders(statement: &str, style: ParamStyle) -> String {
    if style == ParamStyle::Question || !statement.contains('?') {
        return statement.to_string();
    }

    let mut out = String::with_capacity(statement.len() + 8);
    let mut quote: Option<char> = None;
    let mut index = 0usize;

    for ch in statement.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                out.push(ch);
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    out.push(ch);
                }
                '?' => {
                    index += 1;
                    match style {
                        ParamStyle::Numbered => {
                            out.push('$');
                            out.push_str(&index.to_string());
                        }
                        ParamStyle::Format => out.push_str("%s"),
                        ParamStyle::Question => out.push('?'),
                    }
                }
                _ => out.push(ch),
            },
        }
    }

    out
}

/// Build an INSERT statement with generic placeholders
///
/// Columns appear in the given order, one `?` per column:
/// `INSERT INTO users (id, name) VALUES (?, ?)`.
pub fn build_insert(table: &str, columns: &[&str]) -> String {
    let placeholders = vec!["?"; columns.len()];
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    )
}

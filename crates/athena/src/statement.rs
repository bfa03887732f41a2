//! Leading-keyword inspection for read-only mode.

/// Statement verbs that modify data or catalog state.
const WRITE_VERBS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "MERGE", "CREATE", "DROP", "ALTER", "MSCK", "UNLOAD", "VACUUM",
    "OPTIMIZE",
];

/// Returns the upper-cased leading keyword of `sql`, skipping whitespace,
/// `--` line comments, `/* */` block comments and opening parentheses.
pub fn leading_keyword(sql: &str) -> Option<String> {
    let mut rest = sql;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map(|(_, tail)| tail).unwrap_or("");
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map(|(_, tail)| tail).unwrap_or("");
        } else {
            break;
        }
    }

    let word: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    (!word.is_empty()).then(|| word.to_ascii_uppercase())
}

/// The write verb `sql` starts with, if any.
pub fn write_verb(sql: &str) -> Option<String> {
    leading_keyword(sql).filter(|kw| WRITE_VERBS.contains(&kw.as_str()))
}

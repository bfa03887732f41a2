//! Grouping of `information_schema.tables` rows into the browse tree.

use indexmap::IndexMap;
use quarry_core::{Error, ResultStream, Structure, StructureType};

/// Metadata query whose rows feed [`build_structure`].
pub const STRUCTURE_QUERY: &str =
    "SELECT table_schema, table_name, table_type FROM information_schema.tables;";

/// Fold `(schema, table, table_type)` rows into one node per schema with
/// its tables and views as children.
///
/// Schemas appear in order of first appearance. Fails with
/// [`Error::InsufficientInfo`] on a row with fewer than three values; no
/// partial tree is returned.
pub async fn build_structure(rows: &mut dyn ResultStream) -> Result<Vec<Structure>, Error> {
    let mut children: IndexMap<String, Vec<Structure>> = IndexMap::new();

    while let Some(row) = rows.next_row().await? {
        let [schema, table, table_type, ..] = row.as_slice() else {
            return Err(Error::InsufficientInfo("structure"));
        };

        let schema = schema_label(&schema.to_text());
        let leaf = Structure::leaf(
            schema.clone(),
            table.to_text(),
            structure_type(&table_type.to_text()),
        );
        children.entry(schema).or_default().push(leaf);
    }

    Ok(children
        .into_iter()
        .map(|(schema, tables)| Structure::schema(schema, tables))
        .collect())
}

/// Map a database-reported table type onto the browse tree type.
pub fn structure_type(table_type: &str) -> StructureType {
    match table_type {
        "BASE TABLE" => StructureType::Table,
        "VIEW" => StructureType::View,
        _ => StructureType::None,
    }
}

/// Schema names that start with an integer are shown quoted.
fn schema_label(schema: &str) -> String {
    if leads_with_integer(schema) {
        format!("\"{schema}\"")
    } else {
        schema.to_string()
    }
}

/// True when `s` begins (after optional whitespace) with an optionally signed
/// decimal integer that fits in an `i64`. Trailing text is ignored.
fn leads_with_integer(s: &str) -> bool {
    let trimmed = s.trim_start();
    let unsigned = trimmed.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(trimmed);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    let sign_len = trimmed.len() - unsigned.len();
    trimmed[..sign_len + digits].parse::<i64>().is_ok()
}

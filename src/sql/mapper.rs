//! Builds INSERT / UPDATE fragments from records.
//!
//! Literal mode writes values inline (see [`SqlValue`]'s `Display`); bound mode renders `$n` placeholders and
//! hands the values to sqlx. Only literal mode is subject to injection through text values, and only the dollar
//! quoting and array escaping in [`SqlValue`] stand in its way: use it for internally generated data.

use super::record::Record;
use super::value::SqlValue;
use crate::error::MappingError;

/// Columns the database maintains itself. Never written by the mapper.
pub const SERVER_MANAGED_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Index-aligned column names and values for one record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnValues {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl ColumnValues {
    fn push(&mut self, column: String, value: SqlValue) {
        self.columns.push(column);
        self.values.push(value);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `id, name`
    pub fn column_list(&self) -> String {
        self.columns.join(", ")
    }

    /// `100, $$John$$`
    pub fn literal_list(&self) -> String {
        self.values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `id = 100, name = $$John$$`
    pub fn literal_assignments(&self) -> String {
        self.columns
            .iter()
            .zip(&self.values)
            .map(|(c, v)| format!("{} = {}", c, v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `$start, $start+1, ...`
    pub fn placeholders(&self, start: usize) -> String {
        (0..self.columns.len())
            .map(|i| format!("${}", start + i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `id = $start, name = $start+1, ...`
    pub fn assignments(&self, start: usize) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ${}", c, start + i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Values in placeholder order, for binding.
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

/// Walks the record's fields in declaration order and keeps the ones that should be written:
/// not server-managed, not ignored, and holding a value (non-zero plain field or `Some` optional field).
pub fn parse_fields<R: Record + ?Sized>(record: &R, ignore: &[&str]) -> ColumnValues {
    let mut out = ColumnValues::default();
    for field in record.fields() {
        let column = field.column();
        if SERVER_MANAGED_COLUMNS.contains(&column.as_str()) || ignore.contains(&column.as_str()) {
            continue;
        }
        if let Some(value) = field.into_value() {
            out.push(column, value);
        }
    }
    out
}

/// Column list and literal value list for `INSERT INTO t (<columns>) VALUES (<values>)`.
pub fn parse_fields_to_insert_query<R: Record + ?Sized>(record: &R, ignore: &[&str]) -> (String, String) {
    let cv = parse_fields(record, ignore);
    (cv.column_list(), cv.literal_list())
}

/// `column = literal` list for `UPDATE t SET <assignments>`.
pub fn parse_fields_to_update_query<R: Record + ?Sized>(record: &R, ignore: &[&str]) -> String {
    parse_fields(record, ignore).literal_assignments()
}

/// Column list from the first record and `(v1, v2), (v3, v4)` value rows for a multi-row INSERT.
/// Every record must produce the same columns as the first one; otherwise the row index is reported.
pub fn parse_array_fields_to_insert_query<R: Record>(
    records: &[R],
    ignore: &[&str],
) -> Result<(String, String), MappingError> {
    let Some((first, rest)) = records.split_first() else {
        return Ok((String::new(), String::new()));
    };
    let head = parse_fields(first, ignore);
    let mut rows = Vec::with_capacity(records.len());
    rows.push(format!("({})", head.literal_list()));
    for (i, record) in rest.iter().enumerate() {
        let row = parse_fields(record, ignore);
        if row.columns != head.columns {
            return Err(MappingError::RowShapeMismatch {
                row: i + 1,
                expected: head.column_list(),
                found: row.column_list(),
            });
        }
        rows.push(format!("({})", row.literal_list()));
    }
    Ok((head.column_list(), rows.join(", ")))
}

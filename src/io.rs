//! Delimited edge files.
//!
//! ```text
//! labeled:    source,target,label      unlabeled:  source,target
//!             1999,2313,1                          1999,2313
//! ```
//!
//! Columns are located by header name, so extra columns and column order
//! don't matter. Cells may be double-quoted; they are trimmed and blank lines
//! skipped. Output rows keep input order.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::model::{Edge, EdgeKey, Label, NodeId};
use crate::{Error, Result};

pub const SOURCE_COLUMN: &str = "source";
pub const TARGET_COLUMN: &str = "target";
pub const LABEL_COLUMN: &str = "label";

// ============================================================================
// Generic header + rows table
// ============================================================================

/// One data row and the 1-based file line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl TableRow {
    /// Cell at `index`, or `""` for a short row.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A comma-delimited file with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Index of the column named `name`.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a header + rows table. An empty input yields an empty table.
pub fn parse_table<R: BufRead>(reader: R) -> Result<Table> {
    let mut table = Table::default();
    let mut saw_header = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_start_matches('\u{feff}');
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_record(line);
        if saw_header {
            table.rows.push(TableRow { line: idx + 1, cells });
        } else {
            table.headers = cells;
            saw_header = true;
        }
    }

    Ok(table)
}

/// Split one line into trimmed cells. A cell may be wrapped in double quotes,
/// in which case commas inside it are literal and `""` stands for `"`.
/// Quoted cells cannot span lines.
fn split_record(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if cell.trim().is_empty() => {
                cell.clear();
                quoted = true;
            }
            ',' if !quoted => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

pub fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    parse_table(BufReader::new(file))
}

// ============================================================================
// Edge readers
// ============================================================================

pub fn parse_labeled_edges<R: BufRead>(reader: R) -> Result<Vec<Edge>> {
    let table = parse_table(reader)?;
    let (src, tgt) = key_columns(&table)?;
    let lbl = table.column(LABEL_COLUMN)?;

    table
        .rows
        .iter()
        .map(|row| {
            let key = parse_key(row, src, tgt)?;
            let raw: i64 = parse_cell(row, lbl, LABEL_COLUMN)?;
            let label = Label::try_from(raw).map_err(|_| Error::Parse {
                line: row.line,
                message: format!("label must be 0 or 1, got {raw}"),
            })?;
            Ok(Edge { source: key.source, target: key.target, label: Some(label) })
        })
        .collect()
}

pub fn parse_unlabeled_edges<R: BufRead>(reader: R) -> Result<Vec<Edge>> {
    let table = parse_table(reader)?;
    let (src, tgt) = key_columns(&table)?;

    table
        .rows
        .iter()
        .map(|row| parse_key(row, src, tgt).map(Edge::from))
        .collect()
}

/// Read a `source,target,label` file.
pub fn read_labeled_edges(path: &Path) -> Result<Vec<Edge>> {
    let file = File::open(path)?;
    let edges = parse_labeled_edges(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), edges = edges.len(), "read labeled edges");
    Ok(edges)
}

/// Read a `source,target` file. A `label` column, if present, is ignored.
pub fn read_unlabeled_edges(path: &Path) -> Result<Vec<Edge>> {
    let file = File::open(path)?;
    let edges = parse_unlabeled_edges(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), edges = edges.len(), "read unlabeled edges");
    Ok(edges)
}

fn key_columns(table: &Table) -> Result<(usize, usize)> {
    Ok((table.column(SOURCE_COLUMN)?, table.column(TARGET_COLUMN)?))
}

fn parse_key(row: &TableRow, src: usize, tgt: usize) -> Result<EdgeKey> {
    let source: u64 = parse_cell(row, src, SOURCE_COLUMN)?;
    let target: u64 = parse_cell(row, tgt, TARGET_COLUMN)?;
    Ok(EdgeKey { source: NodeId(source), target: NodeId(target) })
}

fn parse_cell<T: std::str::FromStr>(row: &TableRow, index: usize, column: &str) -> Result<T> {
    let cell = row.cell(index);
    cell.parse().map_err(|_| Error::Parse {
        line: row.line,
        message: format!("column '{column}': expected an integer, got '{cell}'"),
    })
}

// ============================================================================
// Prediction writer
// ============================================================================

/// Write `source,target,label` rows, header first, in the given order.
pub fn write_predictions<I>(writer: &mut dyn Write, rows: I) -> Result<()>
where
    I: IntoIterator<Item = (EdgeKey, Label)>,
{
    writeln!(writer, "{SOURCE_COLUMN},{TARGET_COLUMN},{LABEL_COLUMN}")?;
    for (key, label) in rows {
        writeln!(writer, "{},{},{}", key.source, key.target, label)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a prediction file, creating parent directories as needed.
pub fn write_predictions_file<I>(path: &Path, rows: I) -> Result<()>
where
    I: IntoIterator<Item = (EdgeKey, Label)>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_predictions(&mut writer, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_labeled_edges_by_header_name() {
        let input = "label,target,source\n1,2,1\n0, 3 ,2\n\n1,3,1\n";
        let edges = parse_labeled_edges(input.as_bytes()).unwrap();
        assert_eq!(
            edges,
            vec![
                Edge::labeled(1, 2, Label::Positive),
                Edge::labeled(2, 3, Label::Negative),
                Edge::labeled(1, 3, Label::Positive),
            ]
        );
    }

    #[test]
    fn parses_unlabeled_edges() {
        let edges = parse_unlabeled_edges("source,target\n2,3\n".as_bytes()).unwrap();
        assert_eq!(edges, vec![Edge::unlabeled(2, 3)]);
    }

    #[test]
    fn strips_byte_order_mark() {
        let edges = parse_unlabeled_edges("\u{feff}source,target\n4,5\n".as_bytes()).unwrap();
        assert_eq!(edges, vec![Edge::unlabeled(4, 5)]);
    }

    #[test]
    fn quoted_header_and_cells() {
        let input = "\"source\",\"target\",\"label\"\n\"1\",\"2\",\"1\"\n 3 ,\"4\", \"0\" \n";
        let edges = parse_labeled_edges(input.as_bytes()).unwrap();
        assert_eq!(
            edges,
            vec![Edge::labeled(1, 2, Label::Positive), Edge::labeled(3, 4, Label::Negative)]
        );
    }

    #[test]
    fn quoted_cells_keep_commas_and_escaped_quotes() {
        let table = parse_table("a,b,c\n\"x, y\",\"say \"\"hi\"\"\",\"\"\n".as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.rows[0].cells, vec!["x, y", "say \"hi\"", ""]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = parse_labeled_edges("source,target\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(c) if c == "label"));
    }

    #[test]
    fn bad_cells_report_their_line() {
        let err = parse_labeled_edges("source,target,label\n1,2,1\n1,x,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));

        let err = parse_labeled_edges("source,target,label\n1,2,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));

        let err = parse_unlabeled_edges("source,target\n-1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_table("".as_bytes()).unwrap().is_empty());
        let err = parse_unlabeled_edges("".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(_)));
    }

    #[test]
    fn writes_header_and_rows_in_order() {
        let mut out = Vec::new();
        write_predictions(
            &mut out,
            vec![
                (EdgeKey::new(4252, 1273), Label::Negative),
                (EdgeKey::new(1999, 2313), Label::Positive),
            ],
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "source,target,label\n4252,1273,0\n1999,2313,1\n");
    }
}

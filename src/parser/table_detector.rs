//! Table detection from text positions.
//!
//! Finds tables by looking for rows of spans whose left edges line up on
//! shared column boundaries, without relying on ruling lines.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::model::Table;

use super::layout::TextSpan;

/// Width of the buckets used to cluster left edges, in points.
const EDGE_BUCKET: f32 = 5.0;

/// Distance within which a span counts as aligned to a column edge.
const ALIGN_TOLERANCE: f32 = 5.0;

/// How far left of a column edge a cell's span may start.
const CELL_SLACK: f32 = 10.0;

/// Fewest rows and columns that make a table.
const MIN_ROWS: usize = 2;
const MIN_COLUMNS: usize = 2;

/// Regions with more column edges than this are word-level splits.
const MAX_COLUMNS: usize = 6;

/// Row grouping tolerance as a fraction of the font size.
const ROW_TOLERANCE: f32 = 0.4;

/// Share of a row's spans that must sit on column edges.
const MIN_ALIGNMENT: f32 = 0.3;

/// Edges closer than this, in points, are one column.
const MIN_COLUMN_GAP: f32 = 15.0;

/// A detected table region: column edges and the rows that follow them.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Left X coordinate of each column
    pub columns: Vec<f32>,
    /// Rows top to bottom, spans sorted by X
    pub rows: Vec<Vec<TextSpan>>,
}

/// Detects tables in a page's text spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableDetector;

impl TableDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect tables and convert them to [`Table`]s, top to bottom.
    pub fn find_tables(&self, spans: &[TextSpan]) -> Result<Vec<Table>> {
        Ok(self
            .detect(spans)?
            .iter()
            .map(|detected| self.to_table(detected))
            .collect())
    }

    /// Detect table regions in the given spans.
    ///
    /// Fails when span geometry is unusable (non-finite coordinates).
    pub fn detect(&self, spans: &[TextSpan]) -> Result<Vec<DetectedTable>> {
        if let Some(bad) = spans
            .iter()
            .find(|s| !(s.x.is_finite() && s.y.is_finite() && s.font_size.is_finite()))
        {
            return Err(Error::TableDetection(format!(
                "non-finite span geometry for {:?}",
                bad.text
            )));
        }

        if spans.len() < MIN_ROWS * MIN_COLUMNS {
            return Ok(vec![]);
        }

        let rows = group_into_rows(spans);
        if rows.len() < MIN_ROWS {
            return Ok(vec![]);
        }

        let columns = detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, column edges at {:?}",
            rows.len(),
            columns
        );
        if columns.len() < MIN_COLUMNS {
            return Ok(vec![]);
        }

        let mut detected = Vec::new();
        for (start, end) in table_regions(&rows, &columns) {
            let region = rows[start..=end].to_vec();

            // Edges of the whole page can be off for a single region
            let region_columns = detect_columns(&region);
            if region_columns.len() < MIN_COLUMNS {
                continue;
            }
            if region_columns.len() > MAX_COLUMNS {
                log::debug!(
                    "TableDetector: skipping region with {} column edges",
                    region_columns.len()
                );
                continue;
            }
            if is_list_region(&region, &region_columns) {
                log::debug!("TableDetector: skipping region, looks like a list");
                continue;
            }

            detected.push(DetectedTable {
                columns: region_columns,
                rows: region,
            });
        }

        Ok(detected)
    }

    /// Convert a detected region into a [`Table`], one cell per column.
    pub fn to_table(&self, detected: &DetectedTable) -> Table {
        let columns = &detected.columns;

        Table::from_cells(detected.rows.iter().map(|row| {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for span in row {
                if let Some(cell) = cells.get_mut(column_of(span.x, columns)) {
                    cell.push(span.text.trim());
                }
            }
            cells
                .into_iter()
                .map(|parts| Some(parts.join(" ")))
                .collect::<Vec<Option<String>>>()
        }))
    }
}

/// Group spans into rows by Y position, top to bottom, each sorted by X.
fn group_into_rows(spans: &[TextSpan]) -> Vec<Vec<TextSpan>> {
    let mut sorted = spans.to_vec();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<Vec<TextSpan>> = Vec::new();
    for span in sorted {
        let tolerance = span.font_size * ROW_TOLERANCE;
        match rows.last_mut() {
            Some(row) if (span.y - row[0].y).abs() <= tolerance => row.push(span),
            _ => rows.push(vec![span]),
        }
    }

    for row in &mut rows {
        row.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    rows
}

/// Column edges: left edges that recur across rows.
///
/// Rows with two or more spans are the evidence; when too few rows have
/// several spans, every row counts.
fn detect_columns(rows: &[Vec<TextSpan>]) -> Vec<f32> {
    let multi: Vec<&Vec<TextSpan>> = rows.iter().filter(|r| r.len() >= 2).collect();
    let evidence: Vec<&Vec<TextSpan>> = if multi.len() >= MIN_ROWS {
        multi
    } else {
        rows.iter().collect()
    };
    if evidence.is_empty() {
        return vec![];
    }

    // Each bucket counts once per row
    let mut edge_counts: HashMap<i32, usize> = HashMap::new();
    for row in &evidence {
        let buckets: HashSet<i32> = row
            .iter()
            .map(|s| (s.x / EDGE_BUCKET).round() as i32)
            .collect();
        for bucket in buckets {
            *edge_counts.entry(bucket).or_default() += 1;
        }
    }

    let needed = ((evidence.len() as f32 * MIN_ALIGNMENT) as usize).max(2);
    let mut buckets: Vec<i32> = edge_counts
        .into_iter()
        .filter(|&(_, count)| count >= needed)
        .map(|(bucket, _)| bucket)
        .collect();
    buckets.sort_unstable();

    let mut edges: Vec<f32> = Vec::new();
    for edge in buckets.into_iter().map(|b| b as f32 * EDGE_BUCKET) {
        if edges.last().map_or(true, |&last| edge - last >= MIN_COLUMN_GAP) {
            edges.push(edge);
        }
    }
    edges
}

/// Contiguous runs of at least `MIN_ROWS` well-aligned rows, as inclusive
/// index ranges.
fn table_regions(rows: &[Vec<TextSpan>], columns: &[f32]) -> Vec<(usize, usize)> {
    let mut regions = Vec::new();
    let mut start: Option<usize> = None;

    for (i, row) in rows.iter().enumerate() {
        if alignment(row, columns) >= MIN_ALIGNMENT {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            if i - s >= MIN_ROWS {
                regions.push((s, i - 1));
            }
        }
    }
    if let Some(s) = start {
        if rows.len() - s >= MIN_ROWS {
            regions.push((s, rows.len() - 1));
        }
    }

    regions
}

/// Whether a region is really a bulleted or numbered list.
///
/// List markers and item text often land in separate spans at two X
/// positions, which looks like a two-column table. Numbered first columns
/// only disqualify two-column regions.
fn is_list_region(rows: &[Vec<TextSpan>], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let (mut bullets, mut numbers) = (0, 0);
    for first in rows.iter().filter_map(|row| row.first()) {
        let text = first.text.trim();
        if is_bullet_marker(text) {
            bullets += 1;
        } else if is_number_marker(text) {
            numbers += 1;
        }
    }

    let total = rows.len() as f32;
    bullets as f32 / total >= 0.5 || (columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5)
}

/// Fraction of a row's spans that start on a column edge.
fn alignment(row: &[TextSpan], columns: &[f32]) -> f32 {
    if row.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .iter()
        .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.len() as f32
}

/// Index of the column a span starting at `x` falls into.
///
/// Spans may start up to `CELL_SLACK` points left of their column edge.
fn column_of(x: f32, columns: &[f32]) -> usize {
    columns
        .iter()
        .rposition(|&edge| x >= edge - CELL_SLACK)
        .unwrap_or(0)
}

/// Check if text is a bullet marker.
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "■" | "●" | "▶"
    )
}

/// Check if text is a number-style list marker ("1.", "2)", "a.", "3").
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (digits, suffix) = cleaned.split_at(pos);
        if !digits.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.' | ')'), None) if letter.is_alphabetic()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            x,
            y,
            width: text.len() as f32 * 6.0,
            font_size: 12.0,
        }
    }

    #[test]
    fn test_group_into_rows() {
        let spans = vec![
            make_span("B1", 60.0, 100.0),
            make_span("A1", 10.0, 100.0),
            make_span("A2", 10.0, 85.0),
            make_span("B2", 60.0, 85.0),
            make_span("A3", 10.0, 70.0),
        ];

        let rows = group_into_rows(&spans);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0].text, "A1");
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[2][0].text, "A3");
    }

    #[test]
    fn test_detect_columns() {
        let rows: Vec<Vec<TextSpan>> = [100.0, 85.0, 70.0]
            .iter()
            .map(|&y| vec![make_span("A", 10.0, y), make_span("B", 60.0, y)])
            .collect();

        assert_eq!(detect_columns(&rows), vec![10.0, 60.0]);
    }

    #[test]
    fn test_detect_simple_table() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("Name", 10.0, 100.0),
            make_span("Age", 60.0, 100.0),
            make_span("Alice", 10.0, 85.0),
            make_span("30", 60.0, 85.0),
            make_span("Bob", 10.0, 70.0),
            make_span("25", 60.0, 70.0),
        ];

        let tables = detector.find_tables(&spans).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0],
            Table::from_strings(vec![
                vec!["Name", "Age"],
                vec!["Alice", "30"],
                vec!["Bob", "25"],
            ])
        );
    }

    #[test]
    fn test_no_table_single_column() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("Line 1", 10.0, 100.0),
            make_span("Line 2", 10.0, 85.0),
            make_span("Line 3", 10.0, 70.0),
        ];

        assert!(detector.detect(&spans).unwrap().is_empty());
    }

    #[test]
    fn test_to_table_merges_spans_in_cell() {
        let detector = TableDetector::new();
        let detected = DetectedTable {
            columns: vec![10.0, 60.0],
            rows: vec![
                vec![make_span("Full", 10.0, 100.0), make_span("name", 35.0, 100.0), make_span("Age", 60.0, 100.0)],
                vec![make_span("Alice", 10.0, 85.0)],
            ],
        };

        let table = detector.to_table(&detected);
        assert_eq!(table.rows[0], vec!["Full name", "Age"]);
        assert_eq!(table.rows[1], vec!["Alice", ""]);
    }

    #[test]
    fn test_numbered_list_not_detected_as_table() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("1.", 50.0, 400.0),
            make_span("Device settings", 80.0, 400.0),
            make_span("2.", 50.0, 370.0),
            make_span("Object management", 80.0, 370.0),
            make_span("3.", 50.0, 340.0),
            make_span("Routing policy", 80.0, 340.0),
        ];

        assert!(detector.detect(&spans).unwrap().is_empty());
    }

    #[test]
    fn test_bullet_list_not_detected_as_table() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("-", 50.0, 400.0),
            make_span("Management", 80.0, 400.0),
            make_span("-", 50.0, 370.0),
            make_span("Interface options", 80.0, 370.0),
            make_span("-", 50.0, 340.0),
            make_span("Firmware", 80.0, 340.0),
        ];

        assert!(detector.detect(&spans).unwrap().is_empty());
    }

    #[test]
    fn test_non_finite_geometry_is_an_error() {
        let detector = TableDetector::new();
        let spans = vec![make_span("bad", f32::NAN, 10.0)];
        assert!(matches!(
            detector.detect(&spans),
            Err(Error::TableDetection(_))
        ));
    }

    #[test]
    fn test_column_of() {
        let columns = [10.0, 60.0, 120.0];
        assert_eq!(column_of(2.0, &columns), 0);
        assert_eq!(column_of(52.0, &columns), 1);
        assert_eq!(column_of(115.0, &columns), 2);
        assert_eq!(column_of(400.0, &columns), 2);
    }

    #[test]
    fn test_list_markers() {
        for marker in ["1.", "12.", "1)", "1 .", "3", "a.", "B)"] {
            assert!(is_number_marker(marker), "{} should be a number marker", marker);
        }
        for marker in ["-", "•", "*", "–"] {
            assert!(is_bullet_marker(marker), "{} should be a bullet", marker);
        }
        for text in ["Name", "Hello World", "Alice", ""] {
            assert!(!is_number_marker(text) && !is_bullet_marker(text));
        }
    }
}

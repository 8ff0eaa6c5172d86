//! Markdown rendering for extracted blocks and tables.

use crate::model::{Block, Table};

/// Separator placed between rendered blocks and between PDF pages.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Render a table as a pipe-delimited markdown table.
///
/// The first row becomes the header, followed by a `---` separator row with
/// one cell per column, followed by the remaining rows. A table without rows
/// renders to an empty string.
///
/// # Example
/// ```
/// use santa_extract::model::Table;
/// use santa_extract::render::table_to_markdown;
///
/// let table = Table::from_strings(vec![vec!["Name", "Age"], vec!["Alice", "30"]]);
/// assert_eq!(
///     table_to_markdown(&table),
///     "| Name | Age |\n| --- | --- |\n| Alice | 30 |"
/// );
/// ```
pub fn table_to_markdown(table: &Table) -> String {
    let Some(header) = table.header() else {
        return String::new();
    };

    let col_count = table.column_count();
    let mut lines = Vec::with_capacity(table.row_count() + 1);

    lines.push(pipe_row(header));
    lines.push(pipe_row(&vec!["---"; col_count]));
    for row in table.body() {
        lines.push(pipe_row(row));
    }

    lines.join("\n")
}

/// Render rows of optional cells straight to markdown.
///
/// Convenience for callers holding raw detector output; see [`Table::from_cells`].
pub fn rows_to_markdown<R, C>(rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = Option<String>>,
{
    table_to_markdown(&Table::from_cells(rows))
}

fn pipe_row<S: AsRef<str>>(cells: &[S]) -> String {
    let cells: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
    format!("| {} |", cells.join(" | "))
}

/// Render a single block to its markdown-like text.
pub fn render_block(block: &Block) -> String {
    match block {
        Block::Heading { level, text } => {
            format!("{} {}", "#".repeat(*level as usize), text)
        }
        Block::ListItem(text) => format!("- {}", text),
        Block::Paragraph(text) => text.clone(),
        Block::Table(table) => table_to_markdown(table),
        Block::HeaderFooter(lines) => lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render blocks in order and join the non-empty ones with a blank line.
pub fn render_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> String {
    join_non_empty(
        blocks
            .into_iter()
            .filter(|b| !b.is_empty())
            .map(render_block),
    )
}

/// Join text parts with [`BLOCK_SEPARATOR`], dropping empty parts.
pub fn join_non_empty<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<S> = parts
        .into_iter()
        .filter(|p| !p.as_ref().is_empty())
        .collect();
    let refs: Vec<&str> = parts.iter().map(AsRef::as_ref).collect();
    refs.join(BLOCK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_renders_nothing() {
        assert_eq!(table_to_markdown(&Table::new()), "");
        assert_eq!(rows_to_markdown(Vec::<Vec<Option<String>>>::new()), "");
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let md = rows_to_markdown(vec![
            vec![Some("A".to_string()), Some("B".to_string()), Some("C".to_string())],
            vec![Some("1".to_string())],
        ]);
        assert_eq!(md, "| A | B | C |\n| --- | --- | --- |\n| 1 |  |  |");
    }

    #[test]
    fn test_rectangular_rendering_matches_padded_rendering() {
        let rectangular = vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]];
        let padded = Table::from_strings(rectangular.clone());
        let direct = Table {
            rows: rectangular
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        };
        assert_eq!(table_to_markdown(&direct), table_to_markdown(&padded));
    }

    #[test]
    fn test_header_only_table() {
        let table = Table::from_strings(vec![vec!["only", "header"]]);
        assert_eq!(table_to_markdown(&table), "| only | header |\n| --- | --- |");
    }

    #[test]
    fn test_render_block_variants() {
        assert_eq!(render_block(&Block::heading(2, "Scope")), "## Scope");
        assert_eq!(render_block(&Block::ListItem("milk".into())), "- milk");
        assert_eq!(render_block(&Block::Paragraph("plain".into())), "plain");
        assert_eq!(
            render_block(&Block::HeaderFooter(vec![
                "ACME Corp".into(),
                "".into(),
                " Confidential ".into()
            ])),
            "ACME Corp\nConfidential"
        );
    }

    #[test]
    fn test_render_blocks_skips_empty() {
        let blocks = vec![
            Block::HeaderFooter(vec![]),
            Block::heading(1, "Title"),
            Block::Paragraph("   ".into()),
            Block::Table(Table::new()),
            Block::Paragraph("Body".into()),
        ];
        assert_eq!(render_blocks(&blocks), "# Title\n\nBody");
    }

    #[test]
    fn test_join_non_empty() {
        assert_eq!(join_non_empty(["a", "", "b"]), "a\n\nb");
        assert_eq!(join_non_empty(Vec::<String>::new()), "");
    }
}

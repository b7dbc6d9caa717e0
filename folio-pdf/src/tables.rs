//! Table detection over extracted page text.
//!
//! Tables are found by an ordered list of [`TableExtractor`] strategies. The
//! first strategy that succeeds with at least one table wins; a strategy that
//! fails or finds nothing hands over to the next one.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::text::PageText;

/// A table found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// 1-based page number the table was found on.
    pub page: u32,
    /// Cell text, row by row. Every row has the same number of cells.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Render as CSV, one line per row.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|cell| csv_field(cell)).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }
}

fn csv_field(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// A table detection strategy.
pub trait TableExtractor: Send + Sync {
    /// Name used in logs and results.
    fn name(&self) -> &str;

    /// Find tables on `pages`.
    fn extract(&self, pages: &[PageText]) -> Result<Vec<Table>>;
}

/// The outcome of [`extract_tables`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableExtraction {
    /// The strategy that produced the tables, or `None` if none did.
    pub strategy: Option<String>,
    /// Tables in page order.
    pub tables: Vec<Table>,
}

/// Run `strategies` in order and keep the first non-empty result.
///
/// Failures and empty results are logged and fall through to the next
/// strategy. When every strategy comes up empty the extraction is empty.
pub fn extract_tables(
    strategies: &[Box<dyn TableExtractor>],
    pages: &[PageText],
) -> TableExtraction {
    for strategy in strategies {
        match strategy.extract(pages) {
            Ok(tables) if !tables.is_empty() => {
                info!(strategy = strategy.name(), table_count = tables.len(), "extracted tables");
                return TableExtraction { strategy: Some(strategy.name().to_string()), tables };
            }
            Ok(_) => debug!(strategy = strategy.name(), "no tables found"),
            Err(e) => warn!(strategy = strategy.name(), error = %e, "table strategy failed"),
        }
    }
    TableExtraction::default()
}

/// The default strategy order: [`StructuredDetector`] then [`HeuristicDetector`].
pub fn default_strategies() -> Vec<Box<dyn TableExtractor>> {
    vec![Box::new(StructuredDetector), Box::new(HeuristicDetector)]
}

/// Detects tables whose cells are delimited by `|` or tab characters.
///
/// Markdown separator rows (`|---|:---:|`) are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDetector;

impl TableExtractor for StructuredDetector {
    fn name(&self) -> &str {
        "structured"
    }

    fn extract(&self, pages: &[PageText]) -> Result<Vec<Table>> {
        Ok(detect(pages, structured_cells))
    }
}

/// Detects tables laid out with runs of two or more spaces between cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDetector;

impl TableExtractor for HeuristicDetector {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn extract(&self, pages: &[PageText]) -> Result<Vec<Table>> {
        Ok(detect(pages, spaced_cells))
    }
}

/// How a line is classified by a detector.
enum Line {
    Row(Vec<String>),
    Separator,
    Text,
}

/// Group consecutive rows with the same column count into tables.
fn detect(pages: &[PageText], classify: fn(&str) -> Line) -> Vec<Table> {
    let mut tables = Vec::new();
    for page in pages {
        let mut run: Vec<Vec<String>> = Vec::new();
        for line in page.text.lines() {
            match classify(line) {
                Line::Separator => {}
                Line::Row(cells) => {
                    if run.first().is_some_and(|first| first.len() != cells.len()) {
                        flush(&mut run, page.number, &mut tables);
                    }
                    run.push(cells);
                }
                Line::Text => flush(&mut run, page.number, &mut tables),
            }
        }
        flush(&mut run, page.number, &mut tables);
    }
    tables
}

fn flush(run: &mut Vec<Vec<String>>, page: u32, tables: &mut Vec<Table>) {
    let rows = std::mem::take(run);
    if rows.len() >= 2 {
        tables.push(Table { page, rows });
    }
}

fn structured_cells(line: &str) -> Line {
    let trimmed = line.trim();
    let cells: Vec<String> = if trimmed.contains('|') {
        let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        inner.split('|').map(|c| c.trim().to_string()).collect()
    } else if trimmed.contains('\t') {
        trimmed.split('\t').map(|c| c.trim().to_string()).collect()
    } else {
        return Line::Text;
    };

    if cells.len() < 2 {
        return Line::Text;
    }
    let is_separator = cells
        .iter()
        .all(|c| !c.is_empty() && c.contains('-') && c.chars().all(|ch| matches!(ch, '-' | ':')));
    if is_separator { Line::Separator } else { Line::Row(cells) }
}

fn spaced_cells(line: &str) -> Line {
    let cells: Vec<String> = line
        .trim()
        .split("  ")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if cells.len() < 2 { Line::Text } else { Line::Row(cells) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str) -> PageText {
        PageText { number: 1, text: text.to_string() }
    }

    #[test]
    fn markdown_table_skips_separator_row() {
        let pages =
            [page("Intro\n| Name | Age |\n|------|:---:|\n| Ann | 31 |\n| Bob | 27 |\nOutro")];
        let tables = StructuredDetector.extract(&pages).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows, [["Name", "Age"], ["Ann", "31"], ["Bob", "27"]]);
    }

    #[test]
    fn tab_separated_rows_form_a_table() {
        let pages = [page("a\tb\tc\n1\t2\t3\n")];
        let tables = StructuredDetector.extract(&pages).unwrap();
        assert_eq!(tables[0].columns(), 3);
    }

    #[test]
    fn single_row_is_not_a_table() {
        assert!(StructuredDetector.extract(&[page("| only | one |\ntext")]).unwrap().is_empty());
        assert!(HeuristicDetector.extract(&[page("Name    Age\nplain text")]).unwrap().is_empty());
    }

    #[test]
    fn column_count_change_splits_tables() {
        let pages = [page("a  b\nc  d\ne  f  g\nh  i  j")];
        let tables = HeuristicDetector.extract(&pages).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].rows[0], ["e", "f", "g"]);
    }

    #[test]
    fn single_spaces_do_not_split_cells() {
        let pages = [page("Item name     Unit price\nBlue widget   4.50")];
        let tables = HeuristicDetector.extract(&pages).unwrap();
        assert_eq!(tables[0].rows, [["Item name", "Unit price"], ["Blue widget", "4.50"]]);
    }

    #[test]
    fn csv_quotes_special_cells() {
        let table = Table { page: 1, rows: vec![vec!["a,b".into(), "say \"hi\"".into()]] };
        assert_eq!(table.to_csv(), "\"a,b\",\"say \"\"hi\"\"\"\n");
    }
}

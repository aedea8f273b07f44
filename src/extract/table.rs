use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// One HTML table lifted into a plain grid of trimmed cell strings.
///
/// The first `<tr>` becomes [`headers`](RawTable::headers); every later row
/// lands in [`rows`](RawTable::rows). `heading` carries the text of the
/// nearest section heading (`h2`/`h3`/`h4`/`strong`/`b`) preceding the table
/// in document order, or an empty string when there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub heading: String,
}

impl RawTable {
    /// Number of data rows (the header row is not counted).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

static SCAN_SELECTOR: OnceLock<Selector> = OnceLock::new();
static ROW_SELECTOR: OnceLock<Selector> = OnceLock::new();
static CELL_SELECTOR: OnceLock<Selector> = OnceLock::new();

fn scan_selector() -> &'static Selector {
    SCAN_SELECTOR.get_or_init(|| {
        Selector::parse("h2, h3, h4, strong, b, table").expect("static selector is valid")
    })
}

fn row_selector() -> &'static Selector {
    ROW_SELECTOR.get_or_init(|| Selector::parse("tr").expect("static selector is valid"))
}

fn cell_selector() -> &'static Selector {
    CELL_SELECTOR.get_or_init(|| Selector::parse("td, th").expect("static selector is valid"))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").trim().to_owned()
}

/// Lifts every `<table>` in `html` into a [`RawTable`], in document order.
///
/// Tables with fewer than 2 rows or fewer than 2 header columns are dropped;
/// they cannot carry a time series. Malformed HTML never fails the scan: the
/// html5ever parser recovers what it can and the rest is simply absent from
/// the result.
pub fn scan_tables(html: &str) -> Vec<RawTable> {
    let document = Html::parse_document(html);

    let mut tables = Vec::new();
    let mut heading = String::new();
    // Headings and tables come back interleaved in document order, so the
    // last heading seen before a table is its section context.
    for element in document.select(scan_selector()) {
        if element.value().name() != "table" {
            heading = element_text(element);
            continue;
        }

        let mut all_rows: Vec<Vec<String>> = Vec::new();
        for row in element.select(row_selector()) {
            let cells: Vec<String> = row.select(cell_selector()).map(element_text).collect();
            if !cells.is_empty() {
                all_rows.push(cells);
            }
        }

        if all_rows.len() < 2 {
            continue;
        }
        let headers = all_rows.remove(0);
        if headers.len() < 2 {
            continue;
        }
        tables.push(RawTable {
            headers,
            rows: all_rows,
            heading: heading.clone(),
        });
    }
    tables
}

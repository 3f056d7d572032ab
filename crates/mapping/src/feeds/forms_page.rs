//! Filing-type extraction from the sec.gov forms listing.
//!
//! The listing is a single table whose first cell in each body row reads
//! `Form Number: 10-K`. Only the value after the label is returned; trimming
//! and sentinel filtering belong to
//! [`FilingTypeRegistry::refresh`](crate::stores::FilingTypeRegistry::refresh).

use scraper::{ElementRef, Html, Selector};

use crate::errors::{MappingError, Result};

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| MappingError::InvalidPage(format!("{:?}", e)))
}

/// Returns the raw form-number values of the first table on the page.
///
/// Rows without a `td`, or whose first cell has no `label:` prefix, are
/// skipped. A page without a table is an error so a broken download never
/// wipes the registry.
pub fn extract_filing_type_cells(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tbody > tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| MappingError::InvalidPage("no table found on forms page".to_string()))?;

    let mut values = Vec::new();
    for row in table.select(&row_sel) {
        let Some(cell) = row.select(&cell_sel).next() else {
            continue;
        };
        if let Some(value) = labelled_value(cell) {
            values.push(value);
        }
    }

    log::debug!("Extracted {} filing-type cells", values.len());
    Ok(values)
}

fn labelled_value(cell: ElementRef<'_>) -> Option<String> {
    let text: String = cell.text().collect();
    text.split(':').nth(1).map(str::to_string)
}

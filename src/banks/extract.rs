//! Bank table extraction
//!
//! Fetches the ranked-bank-list page and parses the first data table into a
//! record batch. Malformed rows (wrong cell count, or a name cell with no
//! link) are skipped silently; an unparsable market-cap number aborts the
//! run.

use crate::batch::{RecordBatch, Value};
use crate::etl::TableReader;

use eyre::{Context, Result, eyre};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Column layout of the extracted bank table.
pub const BANK_COLUMNS: [&str; 3] = ["Rank", "Bank name", "MC_USD_Billion"];

/// Fetches the configured page and extracts rank, bank name, and USD
/// market cap from its first table body.
pub struct BankTableReader {
    url: Url,
    client: reqwest::Client,
}

impl BankTableReader {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

impl TableReader for BankTableReader {
    async fn read(&self) -> Result<RecordBatch> {
        log::info!("Fetching {}", self.url);
        let page = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", self.url))?
            .error_for_status()
            .with_context(|| format!("Bad response from {}", self.url))?
            .text()
            .await
            .with_context(|| format!("Failed to read body from {}", self.url))?;
        parse_bank_table(&page)
    }
}

fn selector(source: &str) -> Result<Selector> {
    Selector::parse(source).map_err(|e| eyre!("invalid selector '{}': {}", source, e))
}

fn cell_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse the first `<tbody>` of `page` into a bank record batch.
///
/// Per row: rank is the first cell's text, the bank name is the text of the
/// last link in the second cell, and the market cap is the third cell
/// parsed as a float. Rows with fewer than three cells or no name link are
/// skipped.
pub fn parse_bank_table(page: &str) -> Result<RecordBatch> {
    let document = Html::parse_document(page);
    let tbody = selector("tbody")?;
    let tr = selector("tr")?;
    let td = selector("td")?;
    let link = selector("a")?;

    let body = document
        .select(&tbody)
        .next()
        .ok_or_else(|| eyre!("no data table found in page"))?;

    let mut batch = RecordBatch::new(BANK_COLUMNS.iter().map(|c| c.to_string()).collect());
    for row in body.select(&tr) {
        let cells: Vec<ElementRef> = row.select(&td).collect();
        if cells.len() < 3 {
            log::debug!("Skipping row with {} cell(s)", cells.len());
            continue;
        }
        let Some(name_link) = cells[1].select(&link).last() else {
            log::debug!("Skipping row with no bank link");
            continue;
        };

        let market_cap_text = cell_text(cells[2]);
        let market_cap: f64 = market_cap_text
            .parse()
            .with_context(|| format!("Invalid market cap value '{}'", market_cap_text))?;

        batch.push_row(vec![
            Value::text(cell_text(cells[0])),
            Value::text(cell_text(name_link)),
            Value::Number(market_cap),
        ])?;
    }
    log::info!("Extracted {} bank(s)", batch.len());
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body><table><tbody>
            <tr><th>Rank</th><th>Bank name</th><th>Market cap</th></tr>
            <tr>
                <td>1</td>
                <td><span class="flagicon"><a href="/us">US</a></span> <a href="/jpm">JPMorgan Chase</a></td>
                <td>432.92</td>
            </tr>
            <tr>
                <td>2</td>
                <td><a href="/boa">Bank of America</a></td>
                <td>231.52</td>
            </tr>
            <tr><td>broken</td><td>row</td></tr>
            <tr>
                <td>3</td>
                <td><a href="/icbc">ICBC</a></td>
                <td>194.56</td>
            </tr>
        </tbody></table></body></html>
    "#;

    #[test]
    fn extracts_well_formed_rows_only() {
        let batch = parse_bank_table(FIXTURE).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.columns(), BANK_COLUMNS);
    }

    #[test]
    fn takes_the_last_link_in_the_name_cell() {
        let batch = parse_bank_table(FIXTURE).unwrap();
        assert_eq!(batch.rows()[0][1], Value::text("JPMorgan Chase"));
    }

    #[test]
    fn parses_market_cap_as_number() {
        let batch = parse_bank_table(FIXTURE).unwrap();
        assert_eq!(
            batch.number_column("MC_USD_Billion").unwrap(),
            vec![432.92, 231.52, 194.56]
        );
    }

    #[test]
    fn unparsable_market_cap_aborts() {
        let page = r#"<table><tbody>
            <tr><td>1</td><td><a href="/x">X</a></td><td>not-a-number</td></tr>
        </tbody></table>"#;
        assert!(parse_bank_table(page).is_err());
    }

    #[test]
    fn page_without_table_is_an_error() {
        assert!(parse_bank_table("<html><body><p>nothing</p></body></html>").is_err());
    }
}

use crate::config::AppConfig;
use crate::domain::model::DrawRecord;
use crate::domain::ports::{ConfigProvider, DrawSource};
use crate::utils::error::{FetchFailure, Result, SsqError};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

/// Zero-based index of the results table among all tables on the page.
const RESULT_TABLE_INDEX: usize = 2;
const HEADER_ROWS: usize = 2;
/// Rows with fewer cells are layout filler and get skipped.
const MIN_CELLS: usize = 16;
const DATE_CELL: usize = 15;
const BLUE_CELL: usize = 7;

/// Downloads the draw history page and turns its result table into records.
pub struct HistoryFetcher {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HistoryFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SsqError::ConfigValidationError {
                field: "source".to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.into(),
            timeout,
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.source_url(),
            config.request_timeout(),
            &config.source.user_agent,
        )
    }

    /// `<base>?start=NNNNN[&end=NNNNN]`, periods zero-padded to five digits.
    pub fn request_url(&self, start: u32, end: Option<u32>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| SsqError::InvalidConfigValueError {
            field: "source.endpoint".to_string(),
            value: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("start", &format!("{:05}", start));
            if let Some(end) = end {
                query.append_pair("end", &format!("{:05}", end));
            }
        }

        Ok(url)
    }

    fn transport_error(&self, url: &Url, err: reqwest::Error) -> SsqError {
        let reason = if err.is_timeout() {
            FetchFailure::Timeout(self.timeout)
        } else {
            FetchFailure::Connection(err.to_string())
        };
        tracing::error!("Request to {} failed: {}", url, reason);
        SsqError::FetchError {
            url: url.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl DrawSource for HistoryFetcher {
    async fn fetch(&self, start: u32, end: Option<u32>) -> Result<Vec<DrawRecord>> {
        let url = self.request_url(start, end)?;
        tracing::info!("Fetching draw history: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        tracing::debug!("History response status: {}", status);
        if !status.is_success() {
            tracing::error!("History request to {} returned {}", url, status);
            return Err(SsqError::FetchError {
                url: url.to_string(),
                reason: FetchFailure::Status(status.as_u16()),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let records = parse_draws(&html)?;
        tracing::info!("Fetched {} draws", records.len());
        Ok(records)
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector")
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Extracts draws from the history page.
///
/// The third `<table>` in document order holds the results. Its first two
/// rows are headers; every later row with at least 16 cells is one draw:
/// cell 0 period, cells 1-6 red balls, cell 7 blue ball, cell 15 date.
/// Values are trimmed but otherwise taken as-is.
pub fn parse_draws(html: &str) -> Result<Vec<DrawRecord>> {
    let document = Html::parse_document(html);
    let table_selector = selector("table");
    let row_selector = selector("tr");
    let cell_selector = selector("td");

    let tables: Vec<ElementRef<'_>> = document.select(&table_selector).collect();
    if tables.len() <= RESULT_TABLE_INDEX {
        tracing::error!("History page has {} tables, expected at least 3", tables.len());
        return Err(SsqError::ParseError {
            message: format!(
                "expected at least {} tables, found {}; the page structure has changed",
                RESULT_TABLE_INDEX + 1,
                tables.len()
            ),
        });
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in tables[RESULT_TABLE_INDEX]
        .select(&row_selector)
        .skip(HEADER_ROWS)
    {
        let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();
        if cells.len() < MIN_CELLS {
            skipped += 1;
            continue;
        }

        let red_balls: [String; 6] = std::array::from_fn(|i| cells[i + 1].clone());
        records.push(DrawRecord::new(
            cells[0].clone(),
            cells[DATE_CELL].clone(),
            red_balls,
            cells[BLUE_CELL].clone(),
        ));
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} short rows in result table", skipped);
    }
    Ok(records)
}

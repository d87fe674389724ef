//! Batch page scraping for the ingestion pipeline.
//!
//! One fetch per URL, in input order. A failing URL (network error, bad
//! status, page without a `<body>`) is logged and skipped; it never
//! aborts the batch. There is no retry policy beyond that.

use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::types::PipelineError;

/// One successfully scraped page: the source URL and its body markup.
#[derive(Clone, Debug)]
pub struct ScrapedPage {
    pub url: Url,
    pub body_html: String,
}

/// Fetches a single page and extracts the inner HTML of its `<body>`.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<ScrapedPage, PipelineError> {
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let html = response.text().await?;
    let body_html = extract_body(&html)?;
    Ok(ScrapedPage {
        url: url.clone(),
        body_html,
    })
}

/// Scrapes every URL in order, skipping failures.
///
/// Returns the successful pages in input order; failed URLs are logged at
/// warn level and counted by the caller via the shorter output.
pub async fn scrape_pages(client: &Client, urls: &[Url]) -> Vec<ScrapedPage> {
    let mut pages = Vec::with_capacity(urls.len());
    for url in urls {
        match fetch_page(client, url).await {
            Ok(page) => {
                tracing::info!(url = %url, bytes = page.body_html.len(), "scraped page");
                pages.push(page);
            }
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "skipping page after scrape failure");
            }
        }
    }
    pages
}

fn extract_body(html: &str) -> Result<String, PipelineError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("body")
        .map_err(|err| PipelineError::InvalidDocument(err.to_string()))?;
    document
        .select(&selector)
        .next()
        .map(|body| body.inner_html())
        .ok_or_else(|| PipelineError::InvalidDocument("page has no <body> element".to_string()))
}

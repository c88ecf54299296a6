use crate::error::FetchError;
use scraper::{Html, Selector};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves a page and reduces it to the visible text of its paragraph and
/// list-item elements.
pub struct WebFetcher {
    client: reqwest::Client,
}

impl WebFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Single GET with a 10 second timeout. The body is parsed whatever the
    /// HTTP status; non-2xx responses are not distinguished.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let body = self.client.get(url).send().await?.text().await?;
        extract_visible_text(&body)
    }
}

impl Default for WebFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Space-joined text of all `p` and `li` elements, trimmed.
pub fn extract_visible_text(html: &str) -> Result<String, FetchError> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("p, li").map_err(|e| FetchError::Selector(e.to_string()))?;

    let text = document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(text.trim().to_string())
}

//! Fetch a page and save the URLs it links to

use once_cell::sync::OnceCell;
use regex::bytes::Regex;
use std::path::{Path, PathBuf};
use std::time::Duration;
use taskbridge_core::{TaskError, TaskResult};
use taskbridge_runtime::PendingTask;

/// Failure kind raised by every scrape step
pub const TASK_EXCEPTION: &str = "TaskException";

const URL_PATTERN: &str = r"https?://[a-zA-Z0-9\./\?=_-]+";

static URL_RE: OnceCell<Regex> = OnceCell::new();

/// HTTP client settings for [`complex_work`]
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Extra attempts after a failed request
    pub retries: u32,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_redirects: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            retries: 2,
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(2),
            max_redirects: 4,
        }
    }
}

impl ScrapeConfig {
    fn client(&self) -> TaskResult<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects))
            .build()
            .map_err(|e| task_exception(format!("failed to build HTTP client: {e}")))
    }
}

/// Fetch `url`, extract the URLs in the page, and write them to `filepath`
///
/// URLs are sorted, deduplicated and written one per line, replacing any
/// existing file. Every failure is a `TaskException`.
pub fn complex_work(url: impl Into<String>, filepath: impl Into<PathBuf>) -> PendingTask {
    let url = url.into();
    let filepath = filepath.into();
    PendingTask::new(async move {
        scrape(&url, &filepath, &ScrapeConfig::default()).await?;
        Ok(())
    })
}

/// Run the scrape, returning the number of URLs written
pub async fn scrape(url: &str, filepath: &Path, config: &ScrapeConfig) -> TaskResult<usize> {
    let client = config.client()?;
    let html = fetch_html(&client, url, config.retries).await?;

    let urls = tokio::task::spawn_blocking(move || extract_urls(&html))
        .await
        .map_err(|e| task_exception(format!("URL extraction did not complete: {e}")))??;

    write_urls(filepath, &urls).await?;
    tracing::debug!(url, count = urls.len(), path = %filepath.display(), "urls written");
    Ok(urls.len())
}

/// GET `url`, retrying failed requests up to `retries` times
///
/// Any HTTP status counts as a response; only transport failures retry.
pub async fn fetch_html(client: &reqwest::Client, url: &str, retries: u32) -> TaskResult<Vec<u8>> {
    let mut attempt = 0;
    loop {
        let result = match client.get(url).send().await {
            Ok(response) => response.bytes().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(body) => return Ok(body.to_vec()),
            Err(e) if attempt < retries => {
                attempt += 1;
                tracing::debug!(url, attempt, error = %e, "request failed, retrying");
            }
            Err(e) => {
                return Err(task_exception(format!(
                    "Http request failed after {} attempts: {e}",
                    attempt + 1
                )));
            }
        }
    }
}

/// URLs in `html`, sorted and deduplicated
pub fn extract_urls(html: &[u8]) -> TaskResult<Vec<String>> {
    let re = URL_RE
        .get_or_try_init(|| Regex::new(URL_PATTERN))
        .map_err(|e| TaskError::Other(format!("invalid URL pattern: {e}")))?;

    let mut urls: Vec<String> = re
        .find_iter(html)
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .collect();
    urls.sort();
    urls.dedup();
    Ok(urls)
}

/// Write `urls` to `filepath`, one per line
pub async fn write_urls(filepath: &Path, urls: &[String]) -> TaskResult<()> {
    let mut data = String::with_capacity(urls.iter().map(|u| u.len() + 1).sum());
    for url in urls {
        data.push_str(url);
        data.push('\n');
    }

    tokio::fs::write(filepath, data)
        .await
        .map_err(|e| task_exception(format!("Write {} error: {e}", filepath.display())))
}

fn task_exception(message: String) -> TaskError {
    TaskError::custom(TASK_EXCEPTION, message)
}

#[cfg(test)]
#[path = "scrape/scrape_tests.rs"]
mod scrape_tests;

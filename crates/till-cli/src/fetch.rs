//! Feed download over HTTP.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use till_feed::FeedFormat;

/// HTTP fetcher for feed payloads.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct Fetcher {
  client: Client,
}

impl Fetcher {
  pub fn new(timeout_secs: u64) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client })
  }

  /// Download one feed with a single GET; any non-2xx status is an
  /// error. Returns the body plus a format hint taken from the
  /// `Content-Type` header, for the codec to use over sniffing.
  pub async fn fetch(&self, url: &str) -> Result<(String, Option<FeedFormat>)> {
    let resp = self
      .client
      .get(url)
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?
      .error_for_status()
      .with_context(|| format!("GET {url} returned an error status"))?;

    let format = resp
      .headers()
      .get(reqwest::header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .and_then(format_hint);

    let body = resp
      .text()
      .await
      .with_context(|| format!("reading body of {url}"))?;
    Ok((body, format))
  }
}

/// Map a `Content-Type` value to a feed format hint.
fn format_hint(content_type: &str) -> Option<FeedFormat> {
  let ct = content_type.to_ascii_lowercase();
  if ct.contains("json") {
    Some(FeedFormat::Json)
  } else if ct.contains("csv") {
    Some(FeedFormat::Csv)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn content_type_hints() {
    assert_eq!(format_hint("application/json"), Some(FeedFormat::Json));
    assert_eq!(
      format_hint("text/csv; charset=utf-8"),
      Some(FeedFormat::Csv)
    );
    assert_eq!(format_hint("Text/CSV"), Some(FeedFormat::Csv));
    assert_eq!(format_hint("text/plain"), None);
  }
}

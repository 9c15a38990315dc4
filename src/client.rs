use std::time::Duration;

use clap::Args;
use tracing::warn;
use url::Url;

use crate::util::{Error, Result};

/// Where and how to reach the feed conversion service (RSSHub).
#[derive(Args, Clone, Debug)]
pub struct UpstreamConfig {
  /// Base URL of the upstream feed service
  #[clap(
    long = "rsshub-url",
    env = "RSSHUB_URL",
    global = true,
    default_value = "http://localhost:1200"
  )]
  pub base_url: Url,
  /// Access key passed to the upstream as the `key` query parameter
  #[clap(
    long,
    env = "ACCESS_KEY",
    global = true,
    default_value = "todayx2026",
    hide_env_values = true
  )]
  pub access_key: String,
  /// Timeout for a single feed request (e.g. "30s", "1m")
  #[clap(
    long,
    env = "FETCH_TIMEOUT",
    global = true,
    default_value = "30s",
    value_parser = parse_duration
  )]
  pub timeout: Duration,
  /// User-Agent header sent upstream
  #[clap(long, global = true)]
  pub user_agent: Option<String>,
}

fn parse_duration(s: &str) -> Result<Duration, String> {
  duration_str::parse(s).map_err(|e| e.to_string())
}

impl UpstreamConfig {
  fn to_builder(&self) -> reqwest::ClientBuilder {
    let user_agent = self
      .user_agent
      .as_deref()
      .unwrap_or(crate::util::USER_AGENT);

    reqwest::Client::builder()
      .user_agent(user_agent)
      .timeout(self.timeout)
  }

  pub fn build(&self) -> Result<UpstreamClient> {
    let client = self.to_builder().build()?;
    Ok(UpstreamClient {
      base_url: self.base_url.clone(),
      access_key: self.access_key.clone(),
      client,
    })
  }
}

/// Provides the raw feed document of one account.
///
/// Implementations swallow their own failures: `None` means nothing could be
/// fetched for this account, and the reason has already been logged.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
  async fn fetch(&self, account_id: &str) -> Option<String>;
}

pub struct UpstreamClient {
  base_url: Url,
  access_key: String,
  client: reqwest::Client,
}

impl UpstreamClient {
  /// `{base}/twitter/user/{account_id}?key={access_key}`
  pub fn feed_url(&self, account_id: &str) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| Error::UnsupportedBaseUrl(self.base_url.clone()))?
      .pop_if_empty()
      .extend(["twitter", "user", account_id]);
    url.query_pairs_mut().append_pair("key", &self.access_key);
    Ok(url)
  }

  async fn fetch_feed(&self, account_id: &str) -> Result<String> {
    let url = self.feed_url(account_id)?;
    // the URL carries the access key, keep it out of error messages
    let resp = self
      .client
      .get(url)
      .header("Accept", "application/rss+xml,application/xml,text/xml")
      .send()
      .await
      .and_then(|resp| resp.error_for_status())
      .map_err(reqwest::Error::without_url)?;

    let content = resp.text().await.map_err(reqwest::Error::without_url)?;
    Ok(content)
  }
}

#[async_trait::async_trait]
impl FeedSource for UpstreamClient {
  async fn fetch(&self, account_id: &str) -> Option<String> {
    match self.fetch_feed(account_id).await {
      Ok(content) => Some(content),
      Err(e) => {
        warn!("error fetching feed for {account_id}: {e}");
        None
      }
    }
  }
}

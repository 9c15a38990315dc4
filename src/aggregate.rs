use std::sync::Arc;

use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::account::AccountDirectory;
use crate::client::FeedSource;
use crate::fallback::{FALLBACK_MESSAGE, fallback_entries};
use crate::feed::{FeedEntry, FeedNormalizer};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
  /// Entries fetched from the upstream service.
  Rsshub,
  /// Demonstration entries, nothing could be fetched.
  Mock,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AggregatedResult {
  pub success: bool,
  pub tweets: Vec<FeedEntry>,
  pub source: ResultSource,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl AggregatedResult {
  fn live(tweets: Vec<FeedEntry>) -> Self {
    Self {
      success: true,
      tweets,
      source: ResultSource::Rsshub,
      message: None,
    }
  }

  fn fallback() -> Self {
    Self {
      success: true,
      tweets: fallback_entries(),
      source: ResultSource::Mock,
      message: Some(FALLBACK_MESSAGE.into()),
    }
  }
}

#[derive(Clone)]
pub struct Aggregator {
  directory: AccountDirectory,
  normalizer: FeedNormalizer,
  source: Arc<dyn FeedSource>,
  parallelism: usize,
}

impl Aggregator {
  pub fn new(directory: AccountDirectory, source: Arc<dyn FeedSource>) -> Self {
    Self {
      normalizer: FeedNormalizer::new(directory.clone()),
      parallelism: directory.len(),
      directory,
      source,
    }
  }

  /// Limit how many accounts are fetched at the same time.
  pub fn with_parallelism(mut self, parallelism: usize) -> Self {
    self.parallelism = parallelism;
    self
  }

  pub fn directory(&self) -> &AccountDirectory {
    &self.directory
  }

  /// Fetch and normalize every account's feed, newest entries first.
  ///
  /// Accounts are fetched concurrently. A failing account only loses its
  /// own entries. When no account produced anything the demonstration
  /// entries are returned instead.
  pub async fn aggregate(&self) -> AggregatedResult {
    let results: Vec<Option<Vec<FeedEntry>>> =
      stream::iter(self.directory.iter().cloned())
        .map(|account| async move {
          let payload = self.source.fetch(&account.id).await?;
          Some(self.normalizer.normalize(&payload, Some(&account)))
        })
        .buffered(self.parallelism.max(1))
        .collect()
        .await;

    let mut entries = Vec::new();
    for (account, result) in self.directory.iter().zip(results) {
      let account_entries = result.unwrap_or_default();
      debug!("{} entries from {}", account_entries.len(), account.id);
      entries.extend(account_entries);
    }

    if entries.is_empty() {
      info!("no entries fetched, serving fallback data");
      return AggregatedResult::fallback();
    }

    sort_by_time_desc(&mut entries);
    info!("aggregated {} entries", entries.len());
    AggregatedResult::live(entries)
  }
}

/// Plain string comparison on `time`; timestamps in the upstream's own
/// format are not parsed, so mixed formats don't order chronologically.
/// Stable, entries with equal times keep account order.
pub fn sort_by_time_desc(entries: &mut [FeedEntry]) {
  entries.sort_by(|a, b| b.time.cmp(&a.time));
}

#[cfg(test)]
mod test {
  use std::collections::{HashMap, HashSet};
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;

  const VITALIK_FEED: &str = include_str!("../fixtures/vitalik.xml");

  /// Serves canned payloads; accounts without one fail.
  #[derive(Default)]
  struct StaticSource {
    payloads: HashMap<String, String>,
    calls: AtomicUsize,
  }

  impl StaticSource {
    fn with(mut self, account_id: &str, payload: impl Into<String>) -> Self {
      self.payloads.insert(account_id.into(), payload.into());
      self
    }
  }

  #[async_trait::async_trait]
  impl FeedSource for StaticSource {
    async fn fetch(&self, account_id: &str) -> Option<String> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.payloads.get(account_id).cloned()
    }
  }

  fn feed_with_times(account_id: &str, times: &[&str]) -> String {
    let items: String = times
      .iter()
      .enumerate()
      .map(|(i, time)| {
        format!(
          "<item><description>post {i}</description><pubDate>{time}</pubDate>\
           <link>https://x.com/{account_id}/status/{i}</link></item>"
        )
      })
      .collect();
    format!(
      "<rss version=\"2.0\"><channel><title>{account_id}</title>\
       <link>https://x.com/{account_id}</link><description></description>\
       {items}</channel></rss>"
    )
  }

  fn build_aggregator(
    source: StaticSource,
  ) -> (Aggregator, Arc<StaticSource>) {
    let source = Arc::new(source);
    let aggregator =
      Aggregator::new(AccountDirectory::default(), source.clone());
    (aggregator, source)
  }

  fn assert_sorted(result: &AggregatedResult) {
    for pair in result.tweets.windows(2) {
      assert!(pair[0].time >= pair[1].time, "{pair:?}");
    }
  }

  #[tokio::test]
  async fn test_all_fetches_fail() {
    let (aggregator, source) = build_aggregator(StaticSource::default());
    let result = aggregator.aggregate().await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 10);
    assert!(result.success);
    assert_eq!(result.source, ResultSource::Mock);
    assert!(!result.message.as_deref().unwrap_or_default().is_empty());
    assert_eq!(result.tweets.len(), 5);
    let accounts: HashSet<_> =
      result.tweets.iter().map(|t| &t.account_id).collect();
    assert_eq!(accounts.len(), 5);
  }

  #[tokio::test]
  async fn test_empty_feeds_fall_back() {
    let source = StaticSource::default()
      .with("jack", feed_with_times("jack", &[]))
      .with("aantonop", "garbage");
    let (aggregator, _) = build_aggregator(source);
    let result = aggregator.aggregate().await;
    assert_eq!(result.source, ResultSource::Mock);

    // fallback entries are stamped at assembly, compare everything else
    let time = result.tweets[0].time.clone();
    let expected: Vec<_> = fallback_entries()
      .into_iter()
      .map(|entry| FeedEntry {
        time: time.clone(),
        ..entry
      })
      .collect();
    assert_eq!(result.tweets, expected);
  }

  #[tokio::test]
  async fn test_live_entries_sorted() {
    let source = StaticSource::default()
      .with(
        "jack",
        feed_with_times("jack", &["2026-10-01T10:00:00", "2026-10-03T08:00:00"]),
      )
      .with(
        "WatcherGuru",
        feed_with_times("WatcherGuru", &["2026-10-02T12:00:00"]),
      );
    let (aggregator, _) = build_aggregator(source);
    let result = aggregator.aggregate().await;

    assert!(result.success);
    assert_eq!(result.source, ResultSource::Rsshub);
    assert_eq!(result.message, None);
    let order: Vec<_> = result
      .tweets
      .iter()
      .map(|t| (t.account_id.as_str(), t.time.as_str()))
      .collect();
    assert_eq!(
      order,
      [
        ("jack", "2026-10-03T08:00:00"),
        ("WatcherGuru", "2026-10-02T12:00:00"),
        ("jack", "2026-10-01T10:00:00"),
      ]
    );
    assert_sorted(&result);
  }

  #[tokio::test]
  async fn test_failure_is_isolated() {
    let healthy = StaticSource::default()
      .with("VitalikButerin", VITALIK_FEED)
      .with("jack", feed_with_times("jack", &["2026-10-05T00:00:00"]));
    let (aggregator, _) = build_aggregator(healthy);
    let all = aggregator.aggregate().await;

    let partial = StaticSource::default()
      .with("VitalikButerin", VITALIK_FEED)
      .with("jack", "<rss><channel>broken");
    let (aggregator, _) = build_aggregator(partial);
    let some = aggregator.aggregate().await;

    assert_eq!(all.tweets.len(), 4);
    assert_eq!(some.tweets.len(), 3);
    assert!(some.success);
    assert_eq!(some.source, ResultSource::Rsshub);
    assert!(some.tweets.iter().all(|t| t.account_id == "VitalikButerin"));
  }

  #[tokio::test]
  async fn test_sequential_fetch_same_result() {
    let source = StaticSource::default()
      .with("VitalikButerin", VITALIK_FEED)
      .with("jack", feed_with_times("jack", &["2026-10-05T00:00:00"]));
    let source = Arc::new(source);
    let aggregator =
      Aggregator::new(AccountDirectory::default(), source.clone())
        .with_parallelism(1);
    let sequential = aggregator.aggregate().await;

    let concurrent =
      Aggregator::new(AccountDirectory::default(), source.clone())
        .aggregate()
        .await;
    assert_eq!(sequential, concurrent);
    assert_eq!(source.calls.load(Ordering::SeqCst), 20);
  }

  fn assert_send<T: Send>(_: &T) {}

  #[test]
  fn test_aggregate_future_is_send() {
    // handlers need a Send future
    let (aggregator, _) = build_aggregator(StaticSource::default());
    assert_send(&aggregator.aggregate());
  }

  #[tokio::test]
  async fn test_sort_is_lexicographic() {
    // RFC 2822 dates sort by weekday name, not by time
    let source = StaticSource::default().with("VitalikButerin", VITALIK_FEED);
    let (aggregator, _) = build_aggregator(source);
    let result = aggregator.aggregate().await;

    let times: Vec<_> = result.tweets.iter().map(|t| t.time.as_str()).collect();
    assert_eq!(
      times,
      [
        "Sun, 11 Oct 2026 17:05:12 GMT",
        "Sat, 10 Oct 2026 12:00:00 GMT",
        "Mon, 12 Oct 2026 08:30:00 GMT",
      ]
    );
    assert_sorted(&result);
  }

  #[test]
  fn test_sort_is_stable() {
    let entry = |id: &str, time: &str| FeedEntry {
      id: id.into(),
      account_id: "jack".into(),
      account_name: "Jack Dorsey".into(),
      account_handle: "@jack".into(),
      content: String::new(),
      url: "#".into(),
      time: time.into(),
    };
    let mut entries = vec![entry("a", "1"), entry("b", "2"), entry("c", "1")];
    sort_by_time_desc(&mut entries);
    let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["b", "a", "c"]);
  }

  #[test]
  fn test_serialize_result() {
    let live = serde_json::to_value(AggregatedResult::live(vec![])).unwrap();
    assert_eq!(
      live,
      serde_json::json!({"success": true, "tweets": [], "source": "rsshub"})
    );

    let mock = serde_json::to_value(AggregatedResult::fallback()).unwrap();
    assert_eq!(mock["source"], "mock");
    assert_eq!(mock["message"], FALLBACK_MESSAGE);
    assert_eq!(mock["tweets"].as_array().unwrap().len(), 5);
  }
}

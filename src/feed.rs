pub mod content;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::account::{Account, AccountDirectory};
use crate::util::{Error, Result, date::sortable_now};

use content::{clean_content, clean_title};

pub const UNKNOWN_ACCOUNT_ID: &str = "unknown";
pub const UNKNOWN_ACCOUNT_NAME: &str = "Unknown";
pub const UNKNOWN_ACCOUNT_HANDLE: &str = "@unknown";
pub const MISSING_URL: &str = "#";

/// One normalized post, the unit served by the tweets API.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
  pub id: String,
  pub account_id: String,
  pub account_name: String,
  pub account_handle: String,
  pub content: String,
  pub url: String,
  pub time: String,
}

impl FeedEntry {
  fn with_owner(mut self, owner: Option<&Account>) -> Self {
    match owner {
      Some(account) => {
        self.account_id = account.id.clone();
        self.account_name = account.name.clone();
        self.account_handle = account.handle.clone();
      }
      None => {
        self.account_id = UNKNOWN_ACCOUNT_ID.into();
        self.account_name = UNKNOWN_ACCOUNT_NAME.into();
        self.account_handle = UNKNOWN_ACCOUNT_HANDLE.into();
      }
    }
    self
  }
}

/// Converts raw RSS payloads into `FeedEntry` values. Never fails: anything
/// it can't make sense of is logged and produces fewer entries or default
/// field values.
#[derive(Clone)]
pub struct FeedNormalizer {
  directory: AccountDirectory,
}

impl FeedNormalizer {
  pub fn new(directory: AccountDirectory) -> Self {
    Self { directory }
  }

  /// Normalize every item in `payload`. When `account` is given it owns all
  /// items; otherwise the owner is looked up from each item's link.
  pub fn normalize(
    &self,
    payload: &str,
    account: Option<&Account>,
  ) -> Vec<FeedEntry> {
    let channel = match parse_channel(payload) {
      Ok(channel) => channel,
      Err(Error::Rss(rss::Error::Eof)) => {
        debug!("feed document has no channel");
        return vec![];
      }
      Err(e) => {
        warn!("error parsing feed document: {e:?}");
        return vec![];
      }
    };

    let mut entries = Vec::with_capacity(channel.items().len());
    for item in channel.items() {
      let owner = account.or_else(|| self.owner_from_link(item.link()));
      let entry = normalize_item(item, entries.len()).with_owner(owner);
      entries.push(entry);
    }
    entries
  }

  fn owner_from_link(&self, link: Option<&str>) -> Option<&Account> {
    let account_id = link.and_then(account_id_from_link)?;
    self.directory.find(account_id)
  }
}

fn parse_channel(payload: &str) -> Result<rss::Channel> {
  let channel = rss::Channel::read_from(payload.as_bytes())?;
  Ok(channel)
}

// "https://x.com/jack/status/1" -> "jack"
fn account_id_from_link(link: &str) -> Option<&str> {
  link.split('/').nth(3).filter(|id| !id.is_empty())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}

// `position` is the number of entries produced so far in this payload and
// only serves as an id for items without a link.
fn normalize_item(item: &rss::Item, position: usize) -> FeedEntry {
  let link = non_empty(item.link());
  let content = match non_empty(item.description()) {
    Some(description) => clean_content(description),
    None => non_empty(item.title()).map(clean_title).unwrap_or_default(),
  };
  let time = match non_empty(item.pub_date()) {
    Some(date) => date.to_owned(),
    None => sortable_now(),
  };

  FeedEntry {
    id: link.map_or_else(|| position.to_string(), str::to_owned),
    account_id: String::new(),
    account_name: String::new(),
    account_handle: String::new(),
    content,
    url: link.unwrap_or(MISSING_URL).to_owned(),
    time,
  }
}

use crate::{feed::FeedEntry, util::date::sortable_now};

pub const FALLBACK_MESSAGE: &str = "RSSHub not available, showing mock data";

const SAMPLES: [(&str, &str, &str, &str); 5] = [
  (
    "VitalikButerin",
    "Vitalik Buterin",
    "@VitalikButerin",
    "The future of Ethereum is about more than just scaling. Layer 2 solutions are just the beginning of a much larger vision for decentralized systems.",
  ),
  (
    "CryptoHayes",
    "Arthur Hayes",
    "@CryptoHayes",
    "Markets are pricing in the macro narrative shift. The liquidity cycle is turning. Watch the DXY closely this week.",
  ),
  (
    "WatcherGuru",
    "Watcher.Guru",
    "@WatcherGuru",
    "JUST IN: Bitcoin ETF daily inflows hit new highs, marking significant institutional adoption.",
  ),
  (
    "jack",
    "Jack Dorsey",
    "@jack",
    "Bitcoin is the only technology that can truly separate money from state.",
  ),
  (
    "MessariCrypto",
    "Messari",
    "@MessariCrypto",
    "New research: DeFi TVL continues to recover, driven by restaking protocols and real-world asset tokenization.",
  ),
];

/// Demonstration entries served when no live entries could be fetched. All
/// of them carry the time of assembly.
pub fn fallback_entries() -> Vec<FeedEntry> {
  let now = sortable_now();

  SAMPLES
    .iter()
    .enumerate()
    .map(|(i, (account_id, name, handle, content))| {
      let id = (i + 1).to_string();
      FeedEntry {
        url: format!("https://x.com/{account_id}/status/{id}"),
        id,
        account_id: (*account_id).into(),
        account_name: (*name).into(),
        account_handle: (*handle).into(),
        content: (*content).into(),
        time: now.clone(),
      }
    })
    .collect()
}

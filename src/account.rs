use std::{path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::util::{ConfigError, Result};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Account {
  /// Upstream source key, e.g. the account's screen name.
  pub id: String,
  pub name: String,
  /// Display handle, "@"-prefixed.
  pub handle: String,
  pub bio: String,
}

impl Account {
  fn new(id: &str, name: &str, handle: &str, bio: &str) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      handle: handle.into(),
      bio: bio.into(),
    }
  }
}

/// Ordered, read-only list of the accounts whose feeds are aggregated.
/// Cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountDirectory {
  accounts: Arc<[Account]>,
}

impl Default for AccountDirectory {
  fn default() -> Self {
    Self::new(vec![
      Account::new(
        "VitalikButerin",
        "Vitalik Buterin",
        "@VitalikButerin",
        "Ethereum co-founder",
      ),
      Account::new(
        "CryptoHayes",
        "Arthur Hayes",
        "@CryptoHayes",
        "BitMEX co-founder",
      ),
      Account::new(
        "justinsuntron",
        "Justin Sun",
        "@justinsuntron",
        "TRON founder",
      ),
      Account::new(
        "jack",
        "Jack Dorsey",
        "@jack",
        "Block CEO, Bitcoin advocate",
      ),
      Account::new(
        "aantonop",
        "Andreas Antonopoulos",
        "@aantonop",
        "Bitcoin educator",
      ),
      Account::new("MMCrypto", "MMCrypto", "@MMCrypto", "Crypto trader"),
      Account::new(
        "cabornetwho",
        "CZ Binance",
        "@cabornetwho",
        "Former Binance CEO",
      ),
      Account::new(
        "MessariCrypto",
        "Messari",
        "@MessariCrypto",
        "Crypto research",
      ),
      Account::new("TheBlock__", "The Block", "@TheBlock__", "Crypto news"),
      Account::new(
        "WatcherGuru",
        "Watcher.Guru",
        "@WatcherGuru",
        "Breaking crypto news",
      ),
    ])
  }
}

impl AccountDirectory {
  pub fn new(accounts: Vec<Account>) -> Self {
    Self {
      accounts: accounts.into(),
    }
  }

  pub fn load_from_file(path: &Path) -> Result<Self> {
    let f = std::fs::File::open(path)?;
    let accounts: Vec<Account> =
      serde_yaml::from_reader(f).map_err(ConfigError::from)?;
    Self::from_accounts(accounts)
  }

  fn from_accounts(accounts: Vec<Account>) -> Result<Self> {
    if accounts.is_empty() {
      let message = "account list must not be empty".to_string();
      return Err(ConfigError::Message(message).into());
    }

    for (i, account) in accounts.iter().enumerate() {
      let duplicated = accounts[..i]
        .iter()
        .any(|other| other.id.to_lowercase() == account.id.to_lowercase());
      if duplicated {
        let message = format!("duplicate account id: {}", account.id);
        return Err(ConfigError::Message(message).into());
      }
    }

    Ok(Self::new(accounts))
  }

  pub fn accounts(&self) -> &[Account] {
    &self.accounts
  }

  pub fn iter(&self) -> impl Iterator<Item = &Account> {
    self.accounts.iter()
  }

  pub fn len(&self) -> usize {
    self.accounts.len()
  }

  /// Case-insensitive lookup by account id.
  pub fn find(&self, id: &str) -> Option<&Account> {
    self
      .accounts
      .iter()
      .find(|account| account.id.to_lowercase() == id.to_lowercase())
  }
}

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tracing::info;

use crate::{
  account::AccountDirectory,
  aggregate::Aggregator,
  client::UpstreamConfig,
  server::{self, ServerConfig},
  util::Result,
};

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
  #[clap(subcommand)]
  subcmd: SubCommand,

  /// YAML file listing the accounts to aggregate (built-in list if unset)
  #[clap(long, short, env = "ACCOUNTS_FILE", global = true)]
  accounts: Option<PathBuf>,

  /// Maximum number of feeds fetched at once (defaults to all accounts)
  #[clap(long, env = "FETCH_PARALLELISM", global = true)]
  parallelism: Option<usize>,

  #[clap(flatten)]
  upstream: UpstreamConfig,
}

#[derive(Parser)]
enum SubCommand {
  /// Serve the aggregated feed and the front-end over HTTP
  Server(ServerConfig),
  /// Aggregate once and print the result as JSON
  Fetch(FetchConfig),
}

#[derive(Parser)]
struct FetchConfig {
  /// Print JSON on a single line
  #[clap(long, short)]
  compact: bool,
}

impl Cli {
  pub async fn run(self) -> Result<()> {
    let directory = match &self.accounts {
      Some(path) => AccountDirectory::load_from_file(path)?,
      None => AccountDirectory::default(),
    };
    let client = self.upstream.build()?;
    info!(
      "aggregating {} accounts from {}",
      directory.len(),
      self.upstream.base_url
    );
    let mut aggregator = Aggregator::new(directory, Arc::new(client));
    if let Some(parallelism) = self.parallelism {
      aggregator = aggregator.with_parallelism(parallelism);
    }

    match self.subcmd {
      SubCommand::Server(server_config) => {
        server::serve(server_config, aggregator).await
      }
      SubCommand::Fetch(fetch_config) => {
        let result = aggregator.aggregate().await;
        let output = if fetch_config.compact {
          serde_json::to_string(&result)?
        } else {
          serde_json::to_string_pretty(&result)?
        };
        println!("{output}");
        Ok(())
      }
    }
  }
}

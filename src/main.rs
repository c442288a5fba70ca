use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

use hearth::api::ApiClient;
use hearth::app::App;
use hearth::cache::{NoopStorage, SlotStorage, SqliteStorage};
use hearth::config::{ApiConfig, Config};
use hearth::logging;
use hearth::store::DataStore;
use hearth::sync::Syncer;

#[derive(Parser, Debug)]
#[command(name = "hearth")]
#[command(about = "A terminal client for a family recipe archive")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/hearth/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base url (overrides config file and environment)
  #[arg(short, long)]
  api_url: Option<String>,

  /// Run without the local cache: nothing preloaded, nothing persisted
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = logging::init()?;

  let config = Config::load(args.config.as_deref())?;

  // Override API url if specified on command line
  let config = if let Some(api_url) = args.api_url {
    Config {
      api: ApiConfig { base_url: api_url },
    }
  } else {
    config
  };

  let api = ApiClient::new(&config)?;

  if args.no_cache {
    run(config, Syncer::new(api, NoopStorage)).await
  } else {
    run(config, Syncer::new(api, SqliteStorage::open()?)).await
  }
}

async fn run<S: SlotStorage + 'static>(config: Config, syncer: Syncer<S>) -> Result<()> {
  // Cached data first, then a full refresh; the UI starts once every
  // fetch has settled either way.
  let mut store = DataStore::default();
  syncer.bootstrap(&mut store).await;

  let mut app = App::new(config, store, syncer);
  app.run().await
}

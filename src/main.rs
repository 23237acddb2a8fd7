use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod aggregate;
mod cache;
mod cli;
mod error;
mod ext;
mod filter;
mod model;
mod params;
mod render;
mod repo_processor;
mod source;
mod util;

use crate::cli::{normalize, Cli};
use crate::error::DigestError;

fn init_tracing(debug: bool) {
  let filter = if debug {
    EnvFilter::new("warn,repo_activity_digest=debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.debug);

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  if cli.list_event_types {
    for kind in model::EVENT_TYPES {
      println!("{}", kind);
    }
    return Ok(());
  }

  // Phase 1: normalize CLI into an explicit configuration record
  let cfg = match normalize(cli) {
    Ok(cfg) => cfg,
    // configuration errors read like clap's own usage errors (exit 2)
    Err(err) => match err.downcast_ref::<DigestError>() {
      Some(DigestError::Config(msg)) => Cli::command().error(ErrorKind::ValueValidation, msg).exit(),
      _ => return Err(err),
    },
  };

  // Phase 2: filter → aggregate → sort → render, one repository at a time
  repo_processor::process_repos(&cfg)
}

use anyhow::Result;
use clap::Parser;

mod api;
mod args;
mod auth;
mod cli;
mod coerce;
mod ext;
mod input;
mod model;
mod render;
mod runner;
mod schema;
mod util;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: execute the selected command against the remote service
  crate::runner::execute(&cfg)
}

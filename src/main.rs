use anyhow::Result;
use clap::Parser;
use quire::build::{build_site, Options};
use quire::config::Config;

/// Builds the website from its Markdown sources.
#[derive(Parser, Debug)]
#[command(name = "quire", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log what would be written without touching the filesystem
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Skip rendering posts and copying assets
    #[arg(long)]
    skip_render: bool,

    /// Skip writing the index pages
    #[arg(long)]
    skip_paginate: bool,

    /// Skip writing the tag pages
    #[arg(long)]
    skip_tag: bool,

    /// Skip writing the feeds
    #[arg(long)]
    skip_feed: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            dry_run: self.dry_run,
            render: !self.skip_render,
            paginate: !self.skip_paginate,
            tag: !self.skip_tag,
            feed: !self.skip_feed,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    quire::init_tracing(cli.verbose);

    let config = Config::default();
    tracing::info!(
        source = %config.source_directory.display(),
        destination = %config.destination_directory.display(),
        dry_run = cli.dry_run,
        "building site"
    );
    build_site(&config, &cli.options())?;
    Ok(())
}

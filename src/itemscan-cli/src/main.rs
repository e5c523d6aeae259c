mod cli;
mod commands;
mod config;
mod deadline;
mod process;
mod session;

use anyhow::Result;
use clap::Parser;
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;
use commands::configure::ConfigureArgs;
use session::{Settings, Target};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itemscan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let global = cli.global;
    let config = Config::load(global.config.as_deref())?;
    let timeout = global
        .timeout
        .or(config.timeout_secs)
        .map(Duration::from_secs);

    match cli.command {
        Commands::Configure {
            process,
            gobjects,
            gnames,
            show,
        } => {
            commands::configure::handle(
                global.config.as_deref(),
                ConfigureArgs {
                    process,
                    gobjects,
                    gnames,
                    show,
                },
            )?;
        }

        Commands::Categories => {
            commands::catalog::handle(&config.catalog()?, global.json)?;
        }

        Commands::Resolve { category } => {
            let target = open_target(&config, &global)?;
            commands::resolve::handle(target, category, timeout, global.json)?;
        }

        Commands::Find { fragment, limit } => {
            let target = open_target(&config, &global)?;
            commands::objects::find(target, fragment, limit, timeout, global.json)?;
        }

        Commands::List { limit, stats } => {
            let target = open_target(&config, &global)?;
            commands::objects::list(target, limit, stats, timeout, global.json)?;
        }

        Commands::IsA {
            address,
            class,
            exact,
        } => {
            let target = open_target(&config, &global)?;
            commands::objects::is_a(target, address, class, exact, timeout, global.json)?;
        }
    }

    Ok(())
}

fn open_target(config: &Config, global: &GlobalArgs) -> Result<Target> {
    Target::open(Settings::merge(config, global), config.catalog()?)
}

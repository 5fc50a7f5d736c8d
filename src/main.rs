#[macro_export]
macro_rules! if_tracing {
    {$($body:tt)*} => {
        ::cfg_if::cfg_if! {
            if #[cfg(feature = "tracing")] {
                $($body)*
            }
        }
    };
}

if_tracing! {
    use tracing_subscriber::{EnvFilter, fmt};
}

use std::process;

use crate::cli::{Cli, Command};
use crate::config::HuffpackConfig;
use clap::Parser;

mod algorithms;
mod bits;
mod cli;
mod compressor;
mod config;
mod lines;

#[cfg(test)]
mod tests;

fn main() {
    if_tracing! {
        let subscriber = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        if_tracing! {{
            tracing::error!(target: "cli", error = %e, "command failed");
        }}
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> cli::Result<()> {
    let config = HuffpackConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Encode(args) => cli::encode::encode(args, &config),
        Command::Decode(args) => cli::decode::decode(args, &config),
        Command::Codes(args) => cli::codes::codes(args),
        Command::Test(args) => cli::test::test(args, &config),
    }
}

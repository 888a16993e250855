//! rainforest - Rainforest test-automation CLI
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use std::process::ExitCode;

use clap::{ArgMatches, CommandFactory};

use rainforest::cli::update::auto_check;
use rainforest::cli::{Cli, FlagRegistry, GlobalOptions, Services, dispatch, normalize_args};
use rainforest::core::logging;
use rainforest::render::render_error;
use rainforest::storage::ResolvedConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let argv = normalize_args(
        std::env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect(),
        &FlagRegistry::builtin(),
    );

    let matches = match Cli::command().try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(e) => e.exit(),
    };

    let globals = GlobalOptions::from_context(&matches);
    logging::init_from_env(globals.debug);
    colored::control::set_override(rainforest::util::env::should_use_color());

    let Some((name, sub_matches)) = matches.subcommand() else {
        return rainforest::ExitCode::Usage.into();
    };

    match run(name, sub_matches, &globals).await {
        Ok(services) => {
            if name != "update"
                && let Some(notice) = auto_check(&services.config).await
            {
                eprint!("{notice}");
            }
            rainforest::ExitCode::Success.into()
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e);
            eprintln!("{}", render_error(&e));
            e.exit_code().into()
        }
    }
}

async fn run(
    name: &str,
    matches: &ArgMatches,
    globals: &GlobalOptions,
) -> rainforest::Result<Services> {
    let config = ResolvedConfig::resolve(globals)?;
    tracing::debug!(
        base_url = %config.base_url,
        token_source = %config.sources.token,
        "resolved configuration"
    );

    let services = Services::new(config)?;
    let output = dispatch(name, matches, &services).await?;
    print!("{output}");
    Ok(services)
}

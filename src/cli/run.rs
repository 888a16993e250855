//! `run` command: start a run and optionally wait for its result.

use std::path::Path;
use std::time::Duration;

use crate::cli::context::CommandContext;
use crate::cli::dispatch::{Services, split_commas};
use crate::core::ApiClient;
use crate::core::models::{Run, RunParams, TestSelection};
use crate::core::rfml;
use crate::error::{RainforestError, Result};
use crate::render::{render_run_progress, render_run_started, render_run_summary};

/// Accepted values for `--crowd`.
pub const CROWDS: &[&str] = &[
    "default",
    "on_premise_crowd",
    "automation",
    "automation_and_crowd",
];

/// Accepted values for `--conflict`.
pub const CONFLICT_MODES: &[&str] = &["abort", "abort-all"];

/// Consecutive retryable polling failures tolerated before giving up.
const MAX_POLL_FAILURES: u32 = 3;

/// Execute the run command.
///
/// # Errors
///
/// Returns `InvalidArgument` for unusable options, API errors, and
/// `RunFailed` when a waited-for run does not pass.
pub async fn execute(ctx: &dyn CommandContext, services: &Services) -> Result<String> {
    let params = build_params(ctx)?;
    let api = services.api()?;

    let run = api.create_run(&params).await?;
    tracing::info!(run_id = run.id, "run created");
    let mut out = render_run_started(&run);

    if ctx.bool_option("bg") {
        return Ok(out);
    }

    let finished = wait_for_run(api, run.id, services.config.poll_interval).await?;
    let tests = api.run_tests(finished.id).await?;
    out.push_str(&render_run_summary(&finished, &tests));

    if finished.passed() {
        Ok(out)
    } else {
        eprint!("{out}");
        Err(RainforestError::RunFailed {
            run_id: finished.id,
            result: finished.outcome().to_string(),
        })
    }
}

/// Build the `POST runs` body from command options.
///
/// # Errors
///
/// Returns `InvalidArgument` when nothing selects tests, a test id is not a
/// number, or `--crowd`/`--conflict` has an unknown value. RFML files passed
/// with `-f` must parse.
pub fn build_params(ctx: &dyn CommandContext) -> Result<RunParams> {
    let tests = test_selection(&ctx.positional_args())?;

    let rfml_ids = ctx
        .string_list_option("files")
        .iter()
        .map(|file| rfml::read_file(Path::new(file)).map(|parsed| parsed.test.rfml_id))
        .collect::<Result<Vec<_>>>()?;

    let crowd = ctx.string_option("crowd");
    check_choice("--crowd", crowd.as_deref(), CROWDS)?;
    let conflict = ctx.string_option("conflict");
    check_choice("--conflict", conflict.as_deref(), CONFLICT_MODES)?;

    let params = RunParams {
        tests,
        rfml_ids,
        tags: split_commas(ctx.string_option("tags")),
        smart_folder_id: ctx.int_option("folder"),
        site_id: ctx.int_option("site"),
        run_group_id: ctx.int_option("run_group_id"),
        environment_id: ctx.int_option("environment_id"),
        browsers: ctx.string_list_option("browser"),
        crowd,
        conflict,
        description: ctx.string_option("description"),
        release: ctx.string_option("release"),
    };

    if params.tests.is_none()
        && params.rfml_ids.is_empty()
        && params.tags.is_empty()
        && params.smart_folder_id.is_none()
        && params.run_group_id.is_none()
    {
        return Err(RainforestError::InvalidArgument(
            "nothing to run: pass test ids, `all`, --tags, --folder, --run-group-id or -f files"
                .to_string(),
        ));
    }

    tracing::debug!(?params, "run parameters");
    Ok(params)
}

fn test_selection(args: &[String]) -> Result<Option<TestSelection>> {
    if args.is_empty() {
        return Ok(None);
    }
    if args.iter().any(|arg| arg.eq_ignore_ascii_case("all")) {
        if args.len() > 1 {
            return Err(RainforestError::InvalidArgument(
                "`all` cannot be combined with test ids".to_string(),
            ));
        }
        return Ok(Some(TestSelection::Keyword("all".to_string())));
    }

    args.iter()
        .map(|arg| {
            arg.trim().parse::<i64>().map_err(|_| {
                RainforestError::InvalidArgument(format!("test id \"{arg}\" is not a number"))
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(|ids| Some(TestSelection::Ids(ids)))
}

fn check_choice(flag: &str, value: Option<&str>, allowed: &[&str]) -> Result<()> {
    match value {
        Some(value) if !allowed.contains(&value) => Err(RainforestError::InvalidArgument(format!(
            "{flag} must be one of {}, got \"{value}\"",
            allowed.join(", ")
        ))),
        _ => Ok(()),
    }
}

/// Poll a run until it reaches a terminal state.
///
/// # Errors
///
/// Returns the last error after [`MAX_POLL_FAILURES`] consecutive retryable
/// failures, or the first non-retryable one.
pub async fn wait_for_run(api: &ApiClient, run_id: i64, interval: Duration) -> Result<Run> {
    let mut failures = 0;
    loop {
        match api.get_run(run_id).await {
            Ok(run) if run.is_terminal() => return Ok(run),
            Ok(run) => {
                failures = 0;
                eprintln!("{}", render_run_progress(&run));
            }
            Err(err) if err.is_retryable() && failures + 1 < MAX_POLL_FAILURES => {
                failures += 1;
                tracing::warn!(run_id, error = %err, attempt = failures, "polling run failed, retrying");
            }
            Err(err) => return Err(err),
        }
        tokio::time::sleep(interval).await;
    }
}

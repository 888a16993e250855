//! Integration tests for argument normalization feeding the clap parser.
//!
//! Every case runs the raw argument vector through `normalize_args` and then
//! parses it with the real command tree, reading values back through the
//! same `CommandContext` the handlers use.

mod common;

use clap::CommandFactory;

use rainforest::cli::{Cli, CommandContext, FlagRegistry, GlobalOptions, normalize_args};

use common::logger::TestLogger;

fn normalize(tokens: &[&str]) -> Vec<String> {
    normalize_args(
        tokens.iter().map(ToString::to_string).collect(),
        &FlagRegistry::builtin(),
    )
}

fn parse(tokens: &[&str]) -> clap::ArgMatches {
    Cli::command()
        .try_get_matches_from(normalize(tokens))
        .expect("normalized arguments should parse")
}

#[test]
fn global_after_subcommand_is_hoisted() {
    let log = TestLogger::new("global_after_subcommand_is_hoisted");
    log.phase("execute");

    let argv = normalize(&["rainforest", "sites", "--token", "abc"]);
    assert_eq!(argv, vec!["rainforest", "--token", "abc", "sites"]);

    let matches = parse(&["rainforest", "sites", "--token", "abc"]);
    let globals = GlobalOptions::from_context(&matches);
    assert_eq!(globals.token.as_deref(), Some("abc"));
    assert_eq!(matches.subcommand_name(), Some("sites"));

    log.finish_ok();
}

#[test]
fn run_with_mixed_flags_keeps_local_values() {
    let log = TestLogger::new("run_with_mixed_flags_keeps_local_values");
    log.phase("execute");

    let matches = parse(&[
        "rainforest",
        "run",
        "--tags",
        "smoke",
        "--debug",
        "12",
        "--token",
        "secret",
        "34",
        "--bg",
    ]);

    log.phase("verify");
    let globals = GlobalOptions::from_context(&matches);
    assert!(globals.debug);
    assert_eq!(globals.token.as_deref(), Some("secret"));

    let (name, run) = matches.subcommand().expect("subcommand");
    assert_eq!(name, "run");
    let ctx: &dyn CommandContext = run;
    assert_eq!(ctx.string_option("tags").as_deref(), Some("smoke"));
    assert_eq!(ctx.positional_args(), vec!["12", "34"]);
    assert!(ctx.bool_option("bg"));

    log.finish_ok();
}

#[test]
fn token_value_that_looks_like_a_subcommand_is_consumed() {
    let log = TestLogger::new("token_value_that_looks_like_a_subcommand_is_consumed");

    let matches = parse(&["rainforest", "--token", "sites", "folders"]);
    let globals = GlobalOptions::from_context(&matches);
    assert_eq!(globals.token.as_deref(), Some("sites"));
    assert_eq!(matches.subcommand_name(), Some("folders"));

    log.finish_ok();
}

#[test]
fn variadic_files_stop_at_next_flag() {
    let log = TestLogger::new("variadic_files_stop_at_next_flag");

    let matches = parse(&[
        "rainforest",
        "run",
        "-f",
        "a.rfml",
        "b.rfml",
        "--skip-update",
        "--crowd",
        "automation",
    ]);

    assert!(GlobalOptions::from_context(&matches).skip_update);
    let (_, run) = matches.subcommand().expect("subcommand");
    let ctx: &dyn CommandContext = run;
    assert_eq!(ctx.string_list_option("files"), vec!["a.rfml", "b.rfml"]);
    assert_eq!(ctx.string_option("crowd").as_deref(), Some("automation"));
    assert!(ctx.positional_args().is_empty());

    log.finish_ok();
}

#[test]
fn local_values_named_like_globals_stay_local() {
    let log = TestLogger::new("local_values_named_like_globals_stay_local");

    // `--description` takes one value, so `--debug` is its value, not a flag.
    let argv = normalize(&["rainforest", "run", "all", "--description", "--debug"]);
    assert_eq!(
        argv,
        vec!["rainforest", "run", "all", "--description", "--debug"]
    );

    log.finish_ok();
}

#[test]
fn globals_after_double_dash_are_still_hoisted() {
    let log = TestLogger::new("globals_after_double_dash_are_still_hoisted");

    let argv = normalize(&["rainforest", "validate", "--", "--token", "x"]);
    assert_eq!(argv, vec!["rainforest", "--token", "x", "validate", "--"]);

    let matches = parse(&["rainforest", "validate", "--", "--token", "x"]);
    assert_eq!(GlobalOptions::from_context(&matches).token.as_deref(), Some("x"));
    let (_, validate) = matches.subcommand().expect("subcommand");
    let ctx: &dyn CommandContext = validate;
    assert!(ctx.positional_args().is_empty());

    log.finish_ok();
}

#[test]
fn attached_global_value_is_not_hoisted() {
    let log = TestLogger::new("attached_global_value_is_not_hoisted");

    let argv = normalize(&["rainforest", "sites", "--token=abc"]);
    assert_eq!(argv, vec!["rainforest", "sites", "--token=abc"]);

    let err = Cli::command()
        .try_get_matches_from(argv)
        .expect_err("top-level flag after the subcommand should be rejected");
    assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);

    log.finish_ok();
}

#[test]
fn unknown_flag_is_left_for_clap_to_reject() {
    let log = TestLogger::new("unknown_flag_is_left_for_clap_to_reject");

    let argv = normalize(&["rainforest", "sites", "--not-real-flag", "--debug"]);
    assert_eq!(
        argv,
        vec!["rainforest", "--debug", "sites", "--not-real-flag"]
    );

    let err = Cli::command()
        .try_get_matches_from(argv)
        .expect_err("unknown flag should be rejected");
    assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);

    log.finish_ok();
}

#[test]
fn normalization_is_idempotent_on_already_ordered_input() {
    let log = TestLogger::new("normalization_is_idempotent_on_already_ordered_input");

    let ordered = [
        "rainforest",
        "--token",
        "abc",
        "--debug",
        "report",
        "42",
        "--junit-file",
        "out.xml",
    ];
    let once = normalize(&ordered);
    assert_eq!(once, ordered);

    let refs: Vec<&str> = once.iter().map(String::as_str).collect();
    assert_eq!(normalize(&refs), once);

    log.finish_ok();
}

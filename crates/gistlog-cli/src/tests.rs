use std::time::Duration;

use clap::Parser;

use crate::cli_args::Cli;

fn required_args() -> Vec<&'static str> {
    vec![
        "gistlog",
        "--bot-token",
        "xoxb-test",
        "--verification-token",
        "verify",
        "--bot-id",
        "UBOT",
        "--channel-id",
        "C1",
        "--gist-access-token",
        "ghp-test",
    ]
}

#[test]
fn unit_cli_parses_required_values_with_defaults() {
    let cli = Cli::try_parse_from(required_args()).expect("parse cli");
    assert_eq!(cli.bot_token, "xoxb-test");
    assert_eq!(cli.verification_token, "verify");
    assert_eq!(cli.bot_id, "UBOT");
    assert_eq!(cli.channel_id, "C1");
    assert_eq!(cli.port, 3000);
    assert_eq!(cli.slack_api_base, "https://slack.com/api");
    assert_eq!(cli.github_api_base, "https://api.github.com");
    assert_eq!(cli.request_timeout_ms, 10_000);
    assert_eq!(cli.session_ttl(), Duration::from_secs(3600));
    assert_eq!(cli.interaction_bind(), "0.0.0.0:3000");
}

#[test]
fn regression_cli_rejects_missing_or_blank_required_values() {
    let mut missing = required_args();
    missing.truncate(9);
    assert!(Cli::try_parse_from(missing).is_err());

    let mut blank = required_args();
    blank[2] = "   ";
    assert!(Cli::try_parse_from(blank).is_err());

    let mut zero_timeout = required_args();
    zero_timeout.extend(["--request-timeout-ms", "0"]);
    assert!(Cli::try_parse_from(zero_timeout).is_err());
}

#[test]
fn unit_interaction_bind_brackets_ipv6_hosts() {
    let mut args = required_args();
    args.extend(["--bind-host", "::1", "--port", "8080"]);
    let cli = Cli::try_parse_from(args).expect("parse cli");
    assert_eq!(cli.interaction_bind(), "[::1]:8080");
}

#[test]
fn regression_session_ttl_flag_overrides_default_and_rejects_zero() {
    let mut args = required_args();
    args.extend(["--session-ttl-secs", "90"]);
    let cli = Cli::try_parse_from(args).expect("parse cli");
    assert_eq!(cli.session_ttl(), Duration::from_secs(90));

    let mut zero_ttl = required_args();
    zero_ttl.extend(["--session-ttl-secs", "0"]);
    assert!(Cli::try_parse_from(zero_ttl).is_err());
}

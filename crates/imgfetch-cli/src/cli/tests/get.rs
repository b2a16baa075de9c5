//! Tests for the get subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use imgfetch_core::FetchPolicy;

#[test]
fn cli_parse_get_defaults() {
    match parse(&["imgfetch", "get", "https://example.com/a.png"]) {
        CliCommand::Get(args) => {
            assert_eq!(args.urls, vec!["https://example.com/a.png".to_string()]);
            assert!(args.policy.is_none());
            assert_eq!(args.repeat, 1);
            assert!(args.cool_time.is_none());
            assert!(args.timeout.is_none());
            assert!(!args.no_disk_cache);
        }
        _ => panic!("expected Get"),
    }
}

#[test]
fn cli_parse_get_all_flags() {
    match parse(&[
        "imgfetch",
        "get",
        "https://example.com/a.png",
        "https://example.com/b.png",
        "--policy",
        "cool-time",
        "--repeat",
        "3",
        "--cool-time",
        "10",
        "--timeout",
        "20",
        "--no-disk-cache",
    ]) {
        CliCommand::Get(args) => {
            assert_eq!(args.urls.len(), 2);
            assert_eq!(args.policy, Some(FetchPolicy::CoolTime));
            assert_eq!(args.repeat, 3);
            assert_eq!(args.cool_time, Some(10));
            assert_eq!(args.timeout, Some(20));
            assert!(args.no_disk_cache);
        }
        _ => panic!("expected Get with flags"),
    }
}

#[test]
fn cli_parse_get_forced_reflush() {
    match parse(&["imgfetch", "get", "x", "--policy", "forced-reflush"]) {
        CliCommand::Get(args) => assert_eq!(args.policy, Some(FetchPolicy::ForcedReflush)),
        _ => panic!("expected Get"),
    }
}

#[test]
fn cli_parse_get_requires_url() {
    assert!(Cli::try_parse_from(["imgfetch", "get"]).is_err());
}

#[test]
fn cli_parse_get_rejects_unknown_policy() {
    assert!(Cli::try_parse_from(["imgfetch", "get", "x", "--policy", "sometimes"]).is_err());
}

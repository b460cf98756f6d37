//! Tests for fetch-list, workshop, completions and helpers.

use super::parse;
use crate::cli::commands::default_dest;
use crate::cli::CliCommand;
use clap_complete::Shell;
use std::path::Path;

#[test]
fn cli_parse_fetch_list() {
    match parse(&["ttsdl", "fetch-list", "urls.txt", "--dest", "assets"]) {
        CliCommand::FetchList { list, dest } => {
            assert_eq!(list, Path::new("urls.txt"));
            assert_eq!(dest.as_deref(), Some(Path::new("assets")));
        }
        _ => panic!("expected FetchList"),
    }
}

#[test]
fn cli_parse_workshop() {
    match parse(&["ttsdl", "workshop", "2785412233"]) {
        CliCommand::Workshop {
            id,
            dest,
            keep_blob,
        } => {
            assert_eq!(id, "2785412233");
            assert!(dest.is_none());
            assert!(!keep_blob);
        }
        _ => panic!("expected Workshop"),
    }
}

#[test]
fn cli_parse_workshop_keep_blob() {
    match parse(&["ttsdl", "workshop", "1", "--keep-blob"]) {
        CliCommand::Workshop { keep_blob, .. } => assert!(keep_blob),
        _ => panic!("expected Workshop with --keep-blob"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["ttsdl", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    assert!(matches!(parse(&["ttsdl", "man"]), CliCommand::Man));
}

#[test]
fn default_dest_strips_extension() {
    assert_eq!(default_dest(Path::new("Chess.bin")), Path::new("Chess"));
    assert_eq!(default_dest(Path::new("saves/My Deck.bin")), Path::new("saves/My Deck"));
    assert_eq!(default_dest(Path::new("urls")), Path::new("urls"));
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    crate::cli::Cli::command().debug_assert();
}

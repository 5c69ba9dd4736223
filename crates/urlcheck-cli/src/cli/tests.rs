use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_run() {
    match parse(&["urlcheck", "run"]).command {
        CliCommand::Run { mock } => assert!(!mock),
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_mock() {
    match parse(&["urlcheck", "run", "--mock"]).command {
        CliCommand::Run { mock } => assert!(mock),
        _ => panic!("expected Run with mock"),
    }
}

#[test]
fn cli_parse_check() {
    match parse(&["urlcheck", "check", "https://example.com/file.iso"]).command {
        CliCommand::Check { url, mock } => {
            assert_eq!(url, "https://example.com/file.iso");
            assert!(!mock);
        }
        _ => panic!("expected Check"),
    }
}

#[test]
fn cli_parse_status() {
    match parse(&["urlcheck", "status"]).command {
        CliCommand::Status => {}
        _ => panic!("expected Status"),
    }
}

#[test]
fn cli_parse_global_paths() {
    let cli = parse(&[
        "urlcheck",
        "status",
        "--config",
        "/tmp/urlcheck.toml",
        "--state-file",
        "/tmp/state.json",
    ]);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/urlcheck.toml")));
    assert_eq!(cli.state_file.as_deref(), Some(std::path::Path::new("/tmp/state.json")));
}

#[test]
fn cli_check_requires_url() {
    assert!(Cli::try_parse_from(["urlcheck", "check"]).is_err());
}

//! Loading a universe file from disk

use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;
use test_log::test;

use stock_ranker::universe::{default_universe, load_universe, DEFAULT_UNIVERSE};

#[test]
fn test_load_universe_from_csv_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "symbol,name").unwrap();
    writeln!(file, "# tech").unwrap();
    writeln!(file, "aapl,Apple Inc.").unwrap();
    writeln!(file, " msft , Microsoft").unwrap();
    writeln!(file, "shop").unwrap();
    writeln!(file, "SHOP").unwrap();

    let universe = load_universe(file.path()).unwrap();
    assert_eq!(universe, vec!["AAPL", "MSFT", "SHOP", "SHOP"]);
}

#[test]
fn test_empty_universe_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ticker").unwrap();
    writeln!(file, "# nothing here").unwrap();

    let err = load_universe(file.path()).unwrap_err();
    assert!(err.to_string().contains("no symbols"), "unexpected error: {}", err);
}

#[test]
fn test_missing_universe_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_universe(dir.path().join("absent.csv")).is_err());
}

#[test]
fn test_default_universe_matches_builtin_list() {
    let universe = default_universe();
    assert_eq!(universe.len(), DEFAULT_UNIVERSE.len());
    assert_eq!(universe.iter().filter(|s| s.as_str() == "SHOP").count(), 3);
}

use super::*;

#[test]
fn parse_splits_weights_from_activation_column() {
    let m = NetworkMatrix::parse("0,0.5,0,1\n0,0,-2,5\n0,0,0,6\n").unwrap();
    assert_eq!(m.rows(), 3);
    assert_eq!(m.cols(), 4);
    assert_eq!(m.weight_cols(), 3);
    assert_eq!(m.weight(1, 2), Some(-2.0));
    assert_eq!(m.weight(0, 3), None);
    assert_eq!(m.activations().collect::<Vec<_>>(), vec![1.0, 5.0, 6.0]);
}

#[test]
fn stats_ignore_activation_column() {
    let m = NetworkMatrix::parse("0,0.5,0,1\n0,0,-2,5\n0,0,0,6\n").unwrap();
    assert_eq!(m.node_count(), 3);
    assert_eq!(m.connection_count(), 2);
}

#[test]
fn nan_weights_count_as_connections() {
    let m = NetworkMatrix::parse("nan,0,1\n0,0,1\n").unwrap();
    assert_eq!(m.connection_count(), 1);
}

#[test]
fn blank_lines_and_whitespace_are_tolerated() {
    let m = NetworkMatrix::parse("\n 1 , 2 ,3\n\n4,5,6\n\n").unwrap();
    assert_eq!(m.rows(), 2);
    assert_eq!(m.get(1, 0), Some(4.0));
    assert_eq!(m.get(2, 0), None);
}

#[test]
fn scientific_notation_parses() {
    let m = NetworkMatrix::parse("1.000000000000000000e+00,0.000000000000000000e+00,1\n").unwrap();
    assert_eq!(m.get(0, 0), Some(1.0));
    assert_eq!(m.connection_count(), 1);
}

#[test]
fn malformed_input_is_rejected() {
    assert!(matches!(
        NetworkMatrix::parse("1,2\n3\n"),
        Err(NetevoError::Parse(_))
    ));
    assert!(matches!(
        NetworkMatrix::parse("1,x\n"),
        Err(NetevoError::Parse(_))
    ));
    assert!(matches!(NetworkMatrix::parse("\n\n"), Err(NetevoError::Parse(_))));
    assert!(matches!(NetworkMatrix::parse("1\n2\n"), Err(NetevoError::Parse(_))));
}

#[test]
fn load_reports_path_on_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.out");
    std::fs::write(&path, "1,oops\n").unwrap();

    let err = NetworkMatrix::load(&path).unwrap_err();
    assert!(err.to_string().contains("bad.out"));
}

#[test]
fn load_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(NetworkMatrix::load(&dir.path().join("missing.out")).is_err());
}

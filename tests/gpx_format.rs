use std::io::{self, BufRead, Read, Write};

use gpx::gpx_format::{GpxReader, ReadSummary};
use gpx::model::{Column, ColumnType, Element, Model, ObjectiveCoef, Row, Sense};
use gpx::problem::Problem;
use gpx::{GpxError, SolverError};

const TEST1: &str = "PROBLEM_NAME: Test1
OBJECTIVE_START
0 1.0
ROWS_START
c1 L 10.0 0.0
COLUMNS_START
x1 C 0.0 100.0
ELEMENTS_START
0 0 1.0
END_DATA
";

fn read(text: &str) -> Result<Model, GpxError> {
    Model::from_gpx_reader(text.as_bytes())
}

#[test]
fn end_to_end_scenario() {
    let model = read(TEST1).unwrap();
    assert_eq!(model.name, "Test1");
    assert_eq!(model.objective, vec![ObjectiveCoef { col: 0, value: 1.0 }]);
    assert_eq!(
        model.rows,
        vec![Row {
            name: "c1".to_string(),
            sense: Sense::Less,
            rhs: 10.0,
            range_value: 0.0,
        }]
    );
    assert_eq!(
        model.columns,
        vec![Column {
            name: "x1".to_string(),
            column_type: ColumnType::Continuous,
            lower_bound: 0.0,
            upper_bound: 100.0,
        }]
    );
    assert_eq!(
        model.elements,
        vec![Element {
            row: 0,
            col: 0,
            value: 1.0
        }]
    );
    assert!(!model.is_mip());
}

#[test]
fn summary_counts_lines() {
    let mut model = Model::default();
    let summary = GpxReader::new().read(TEST1.as_bytes(), &mut model).unwrap();
    assert_eq!(
        summary,
        ReadSummary {
            lines_read: 10,
            terminated: true
        }
    );
}

#[test]
fn problem_name() {
    let model = read("PROBLEM_NAME: Foo\nEND_DATA\n").unwrap();
    assert_eq!(model.name, "Foo");

    let model = read("ROWS_START\nr L 1 0\nEND_DATA\n").unwrap();
    assert_eq!(model.name, "NoName");

    let model = read("PROBLEM_NAME:\nEND_DATA\n").unwrap();
    assert_eq!(model.name, "NoName");
}

#[test]
fn keywords_are_case_insensitive() {
    let model = read("problem_name: lower\nRows_Start\nr1 g 2 0\nend_data\nr2 L 1 0\n").unwrap();
    assert_eq!(model.name, "lower");
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.rows[0].sense, Sense::Greater);
}

#[test]
fn row_with_wrong_field_count() {
    let text = "PROBLEM_NAME: bad\n# a comment\nROWS_START\nc1 L 10.0 0.0\nc2 L 10.0\n";
    match read(text) {
        Err(GpxError::InvalidRowLine { line, found }) => {
            assert_eq!(line, 5);
            assert_eq!(found, 3);
        }
        other => panic!("unexpected result {:?}", other),
    }

    let err = read("ROWS_START\n\nc1 L 1 0 extra\n").unwrap_err();
    assert_eq!(err.line(), Some(3));
    assert_eq!(
        err.to_string(),
        "invalid ROW items on line 3: expected 4 fields, found 5"
    );
}

#[test]
fn other_blocks_check_field_counts() {
    assert!(matches!(
        read("OBJECTIVE_START\n0 1 2\n"),
        Err(GpxError::InvalidObjectiveLine { line: 2, found: 3 })
    ));
    assert!(matches!(
        read("COLUMNS_START\nx C 0\n"),
        Err(GpxError::InvalidColumnLine { line: 2, found: 3 })
    ));
    assert!(matches!(
        read("ELEMENTS_START\n0 0\n"),
        Err(GpxError::InvalidElementLine { line: 2, found: 2 })
    ));
}

#[test]
fn data_before_any_keyword() {
    match read("\n0 1.0\n") {
        Err(GpxError::UnexpectedFormat { line }) => assert_eq!(line, 2),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn unknown_letters() {
    assert!(matches!(
        read("ROWS_START\nc1 X 1 0\n"),
        Err(GpxError::UnknownSense { line: 2, .. })
    ));
    assert!(matches!(
        read("COLUMNS_START\nx1 Z 0 1\n"),
        Err(GpxError::UnknownColumnType { line: 2, .. })
    ));
    // the letter is checked even though the field count is right
    let err = read("ROWS_START\nc1 Q 1 0\n").unwrap_err();
    assert_eq!(err.to_string(), "unknown row sense 'Q' on line 2");
    let model = read("COLUMNS_START\nx1 n 0 1\n").unwrap();
    assert_eq!(model.columns[0].column_type, ColumnType::SemiInteger);
}

#[test]
fn idempotent() {
    let first = read(TEST1).unwrap();
    let second = read(TEST1).unwrap();
    assert_eq!(first, second);
}

#[test]
fn second_read_replaces_the_first() {
    let mut model = Model::default();
    let reader = GpxReader::new();
    reader.read(TEST1.as_bytes(), &mut model).unwrap();
    reader
        .read(
            "ROWS_START\nonly L 1 0\nEND_DATA\n".as_bytes(),
            &mut model,
        )
        .unwrap();
    assert_eq!(model.name, "NoName");
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.rows[0].name, "only");
    assert!(model.columns.is_empty());
    assert!(model.elements.is_empty());
    assert!(model.objective.is_empty());
}

#[test]
fn comments_and_blanks_only() {
    let mut model = Model::default();
    let summary = GpxReader::new()
        .read("# nothing here\n\n   \n  # indented comment\n".as_bytes(), &mut model)
        .unwrap();
    assert!(model.is_empty());
    assert_eq!(summary.lines_read, 4);
    assert!(!summary.terminated);
}

#[test]
fn nothing_after_end_data() {
    let text = "ROWS_START\nr1 L 1 0\nEND_DATA\nr2 L 2 0\nthis is not even valid\n";
    let model = read(text).unwrap();
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.rows[0].name, "r1");
}

#[test]
fn lines_after_the_name_are_ignored() {
    let model = read("PROBLEM_NAME: p\nsome free text\nEND_DATA\n").unwrap();
    assert!(model.is_empty());
}

#[test]
fn blocks_in_any_order() {
    let text = "ELEMENTS_START\n0 0 2\nCOLUMNS_START\ny I 0 10\nROWS_START\nr E 3 0\nEND_DATA\n";
    let model = read(text).unwrap();
    assert_eq!(model.elements.len(), 1);
    assert_eq!(model.columns[0].column_type, ColumnType::Integer);
    assert!(model.is_mip());
}

#[test]
fn last_line_without_newline() {
    let model = read("ROWS_START\nr1 R 1 5").unwrap();
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.rows[0].sense, Sense::Range);
    assert_eq!(model.rows[0].range_value, 5.);
}

#[test]
fn lenient_numbers() {
    let model = read("ROWS_START\nr1 L abc 0\nELEMENTS_START\n-1 x 3\n").unwrap();
    assert_eq!(model.rows[0].rhs, 0.);
    // negative indices are numbers, kept for the solver session to reject
    assert_eq!(model.elements[0].row, -1);
    assert_eq!(model.elements[0].col, 0);
    assert_eq!(model.elements[0].value, 3.);

    let model = read("OBJECTIVE_START\n99999999999999999999 1\n-2 4\n").unwrap();
    assert_eq!(model.objective[0].col, 0);
    assert_eq!(model.objective[1].col, -2);
}

#[test]
fn negative_index_is_rejected_when_loaded() {
    let model = read(
        "ROWS_START\nr0 L 1 0\nr1 L 2 0\nCOLUMNS_START\nx C 0 1\nELEMENTS_START\n-1 0 5\nEND_DATA\n",
    )
    .unwrap();
    assert_eq!(
        model.elements,
        vec![Element {
            row: -1,
            col: 0,
            value: 5.
        }]
    );

    let mut pb = Problem::new(&model.name);
    pb.new_rows(&model.rows).unwrap();
    pb.new_cols(&model.objective, &model.columns).unwrap();
    match pb.change_coefficients(&model.elements) {
        Err(SolverError::IndexOutOfRange { kind, index, len }) => {
            assert_eq!(kind, "row");
            assert_eq!(index, -1);
            assert_eq!(len, 2);
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(pb.coefficient(0, 0), 0.);
}

#[test]
fn strict_numbers() {
    let mut model = Model::default();
    let err = GpxReader::new()
        .strict(true)
        .read("ROWS_START\nr1 L abc 0\n".as_bytes(), &mut model)
        .unwrap_err();
    match err {
        GpxError::InvalidNumber { line, value } => {
            assert_eq!(line, 2);
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected error {:?}", other),
    }

    let reader = GpxReader::new().strict(true).strict(false);
    let mut model = Model::default();
    reader
        .read("ROWS_START\nr1 L abc 0\n".as_bytes(), &mut model)
        .unwrap();
    assert_eq!(model.rows[0].rhs, 0.);
}

#[test]
fn invalid_utf8_is_a_read_error() {
    let bytes: &[u8] = b"ROWS_START\nr1 L 1 0\n\xff\xfe\n";
    let mut model = Model::default();
    match GpxReader::new().read(bytes, &mut model) {
        Err(GpxError::LineRead { line, source }) => {
            assert_eq!(line, 3);
            assert_eq!(source.kind(), io::ErrorKind::InvalidData);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
    }
}

#[test]
fn io_failure_on_first_line() {
    let reader: Box<dyn BufRead> = Box::new(io::BufReader::new(FailingReader));
    let err = Model::from_gpx_reader(reader).unwrap_err();
    assert_eq!(err.line(), Some(1));
    assert_eq!(err.to_string(), "problem reading line 1");
}

#[test]
fn read_from_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(TEST1.as_bytes()).unwrap();
    f.flush().unwrap();
    let model = Model::from_gpx_file(f.path()).unwrap();
    assert_eq!(model, read(TEST1).unwrap());
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    match Model::from_gpx_file(&path) {
        Err(GpxError::Open { path: p, .. }) => assert_eq!(p, path),
        other => panic!("unexpected result {:?}", other),
    }
}

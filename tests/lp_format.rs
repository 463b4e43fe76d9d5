use gpx::lp_format::{LpObjective, WriteToLpFileFormat};
use gpx::model::{Column, ColumnType, Element, ObjectiveCoef, Row, Sense};
use gpx::problem::Problem;
use gpx::SolverError;

fn row(name: &str, sense: Sense, rhs: f64, range_value: f64) -> Row {
    Row {
        name: name.to_string(),
        sense,
        rhs,
        range_value,
    }
}

fn col(name: &str, column_type: ColumnType, lower_bound: f64, upper_bound: f64) -> Column {
    Column {
        name: name.to_string(),
        column_type,
        lower_bound,
        upper_bound,
    }
}

fn elem(row: i64, col: i64, value: f64) -> Element {
    Element { row, col, value }
}

#[test]
fn simple_problem() {
    let mut pb = Problem::new("my_problem");
    pb.new_rows(&[row("c0", Sense::Greater, 5., 0.)]).unwrap();
    pb.new_cols(
        &[
            ObjectiveCoef { col: 0, value: 2. },
            ObjectiveCoef { col: 1, value: 1. },
        ],
        &[
            col("x", ColumnType::Continuous, -1e20, 1e20),
            col("y", ColumnType::Continuous, 0., 1e30),
            col("z", ColumnType::Continuous, 1., 10.),
        ],
    )
    .unwrap();
    pb.change_coefficients(&[elem(0, 0, 1.), elem(0, 1, 1.), elem(0, 2, 1.)])
        .unwrap();
    let expected_str = "\\ my_problem

Minimize
  obj: 2 x + 1 y

Subject To
  c0: 1 x + 1 y + 1 z >= 5

Bounds
  x free
  0 <= y
  1 <= z <= 10

End
";
    assert_eq!(pb.display_lp().to_string(), expected_str);
}

#[test]
fn with_integers() {
    let mut pb = Problem::new("int_problem");
    pb.sense = LpObjective::Maximize;
    pb.new_rows(&[row("c0", Sense::Less, -5., 0.)]).unwrap();
    pb.new_cols(
        &[
            ObjectiveCoef { col: 0, value: 1. },
            ObjectiveCoef { col: 1, value: -1. },
        ],
        &[
            col("x", ColumnType::Integer, -10., 10.),
            col("y", ColumnType::Integer, -1e20, 16.5),
            col("b", ColumnType::Binary, 0., 1.),
        ],
    )
    .unwrap();
    pb.change_coefficients(&[elem(0, 1, -1.), elem(0, 0, 1.)])
        .unwrap();
    let expected_str = "\\ int_problem

Maximize
  obj: 1 x - 1 y

Subject To
  c0: 1 x - 1 y <= -5

Bounds
  -10 <= x <= 10
  -inf <= y <= 16.5
  0 <= b <= 1

Generals
  x
  y

Binaries
  b

End
";
    assert_eq!(pb.display_lp().to_string(), expected_str);
}

#[test]
fn ranges_and_semi_continuous() {
    let mut pb = Problem::new("ranged");
    pb.new_rows(&[
        row("up", Sense::Range, 2., 3.),
        row("down", Sense::Range, 2., -3.),
        row("eq", Sense::Equal, 4., 0.),
        row("empty", Sense::Less, 1., 0.),
    ])
    .unwrap();
    pb.new_cols(
        &[ObjectiveCoef { col: 1, value: -3.5 }],
        &[
            col("s", ColumnType::SemiContinuous, 2., 8.),
            col("n", ColumnType::SemiInteger, 1., 5.),
        ],
    )
    .unwrap();
    pb.change_coefficients(&[
        elem(0, 0, 1.),
        elem(1, 1, -2.),
        elem(2, 0, 1.),
        elem(2, 1, 1.),
        // a zero coefficient is not written
        elem(3, 0, 0.),
    ])
    .unwrap();
    let expected_str = "\\ ranged

Minimize
  obj: - 3.5 n

Subject To
  up: 2 <= 1 s <= 5
  down: -1 <= - 2 n <= 2
  eq: 1 s + 1 n = 4
  empty: 0 s <= 1

Bounds
  2 <= s <= 8
  1 <= n <= 5

Generals
  n

Semi-continuous
  s
  n

End
";
    assert_eq!(pb.display_lp().to_string(), expected_str);
}

#[test]
fn invalid_names_are_rejected() {
    let mut pb = Problem::new("names");
    pb.new_cols(&[], &[col("2x", ColumnType::Continuous, 0., 1.)])
        .unwrap();
    match pb.to_tmp_file() {
        Err(SolverError::InvalidName(name)) => assert_eq!(name, "2x"),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn temporary_file_content() {
    let mut pb = Problem::new("tmp");
    pb.new_cols(
        &[ObjectiveCoef { col: 0, value: 1. }],
        &[col("x", ColumnType::Continuous, 0., 1.)],
    )
    .unwrap();
    let f = pb.to_tmp_file().unwrap();
    assert!(f.path().to_string_lossy().ends_with(".lp"));
    let content = std::fs::read_to_string(f.path()).unwrap();
    assert_eq!(content, pb.display_lp().to_string());
}

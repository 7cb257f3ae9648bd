use super::*;

fn ints(g: &Grid) -> Vec<Vec<i64>> {
    g.to_rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|c| match c {
                    CellValue::Int(v) => v,
                    other => panic!("expected int, got {other:?}"),
                })
                .collect()
        })
        .collect()
}

#[test]
fn transpose_3x3() {
    let g = Grid::from_rows([[1, 2, 3], [4, 5, 6], [7, 8, 9]]).unwrap();
    let t = g.transpose();
    assert_eq!(ints(&t), vec![vec![1, 4, 7], vec![2, 5, 8], vec![3, 6, 9]]);
}

#[test]
fn transpose_swaps_dims_and_indices() {
    let g = Grid::sequential(2, 5, 0).unwrap();
    let t = g.transpose();
    assert_eq!(t.dims(), (5, 2));
    for i in 0..t.rows() {
        for j in 0..t.cols() {
            assert_eq!(t.get(i, j), g.get(j, i));
        }
    }
    assert_eq!(t.transpose(), g);
}

#[test]
fn flatten_then_regrid_is_identity() {
    for (r, c) in [(1, 1), (1, 16), (2, 8), (3, 3), (6, 6), (4, 1)] {
        let g = Grid::sequential(r, c, 10).unwrap();
        let again = Grid::from_flat(g.rows(), g.cols(), g.flatten()).unwrap();
        assert_eq!(again, g);
    }
}

#[test]
fn rejects_ragged_and_empty_input() {
    assert!(Grid::from_rows(vec![vec![1, 2], vec![3]]).is_err());
    assert!(Grid::from_rows(Vec::<Vec<i64>>::new()).is_err());
    assert!(Grid::from_rows(vec![Vec::<i64>::new()]).is_err());
    assert!(Grid::from_flat(2, 2, vec![CellValue::Int(1)]).is_err());
}

#[test]
fn rows_columns_and_positions() {
    let g = Grid::sequential(6, 6, 0).unwrap();
    assert_eq!(g.row(1).unwrap()[0], CellValue::Int(6));
    let col = g.column(2).unwrap();
    assert_eq!(col.len(), 6);
    assert_eq!(*col[5], CellValue::Int(32));
    assert_eq!(g.flat_index(2, 3), Some(15));
    assert_eq!(g.position(15), Some((2, 3)));
    assert_eq!(g.flat_index(6, 0), None);
    assert!(g.row(6).is_none());
}

#[test]
fn mixed_values_roundtrip_through_json() {
    let g = Grid::from_rows(vec![
        vec![CellValue::Int(255), CellValue::Float(0.5)],
        vec![CellValue::from("x"), CellValue::Int(-3)],
    ])
    .unwrap();
    let s = serde_json::to_string(&g).unwrap();
    assert_eq!(s, r#"[[255,0.5],["x",-3]]"#);
    let de: Grid = serde_json::from_str(&s).unwrap();
    assert_eq!(de, g);
}

#[test]
fn ragged_json_is_rejected() {
    assert!(serde_json::from_str::<Grid>("[[1,2],[3]]").is_err());
}

#[test]
fn labels_format_values() {
    assert_eq!(CellValue::Int(15).label(), "15");
    assert_eq!(CellValue::Float(0.25).label(), "0.25");
    assert_eq!(CellValue::from("a").label(), "a");
}

#[test]
fn sequential_near_i64_max_is_rejected() {
    let g = Grid::sequential(1, 2, i64::MAX - 1).unwrap();
    assert_eq!(g.flatten().last(), Some(&CellValue::Int(i64::MAX)));

    let err = Grid::sequential(1, 3, i64::MAX - 1).unwrap_err().to_string();
    assert!(err.contains("overflows"), "{err}");
}

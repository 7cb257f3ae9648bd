use super::*;

fn painted(colors: &[Color], c: Color) -> Vec<usize> {
    colors
        .iter()
        .enumerate()
        .filter(|(_, x)| **x == c)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn six_by_six_ranges_paint_exactly_their_cells() {
    let g = Grid::sequential(6, 6, 0).unwrap();
    let ranges = [
        HighlightRange::new(3, 6, Color::RED),
        HighlightRange::new(9, 12, Color::RED),
        HighlightRange::new(15, 18, Color::RED),
    ];
    let colors = apply_highlights(&g, &ranges, Color::WHITE).unwrap();
    assert_eq!(colors.len(), 36);
    assert_eq!(
        painted(&colors, Color::RED),
        vec![3, 4, 5, 9, 10, 11, 15, 16, 17]
    );
    assert_eq!(painted(&colors, Color::WHITE).len(), 36 - 9);
}

#[test]
fn every_in_bounds_range_paints_only_itself() {
    let g = Grid::sequential(3, 4, 0).unwrap();
    let n = g.len();
    for s in 0..=n {
        for e in s..=n {
            let colors =
                apply_highlights(&g, &[HighlightRange::new(s, e, Color::BLUE)], Color::WHITE)
                    .unwrap();
            for (i, c) in colors.iter().enumerate() {
                if (s..e).contains(&i) {
                    assert_eq!(*c, Color::BLUE);
                } else {
                    assert_eq!(*c, Color::WHITE);
                }
            }
        }
    }
}

#[test]
fn out_of_range_and_inverted_spans_are_rejected() {
    let g = Grid::sequential(2, 2, 0).unwrap();
    assert!(apply_highlights(&g, &[HighlightRange::new(3, 5, Color::RED)], Color::WHITE).is_err());
    assert!(apply_highlights(&g, &[HighlightRange::new(3, 2, Color::RED)], Color::WHITE).is_err());
    assert!(apply_highlights(&g, &[HighlightRange::new(4, 4, Color::RED)], Color::WHITE).is_ok());
}

#[test]
fn overlapping_ranges_last_applied_wins() {
    let coloring = CellColoring {
        ranges: vec![
            HighlightRange::new(0, 4, Color::RED),
            HighlightRange::new(2, 6, Color::YELLOW),
        ],
        ..CellColoring::default()
    };
    let colors = coloring.resolve(8, Color::WHITE);
    assert_eq!(painted(&colors, Color::RED), vec![0, 1]);
    assert_eq!(painted(&colors, Color::YELLOW), vec![2, 3, 4, 5]);
}

#[test]
fn cycle_applies_modulo_and_ranges_override_it() {
    let coloring = CellColoring {
        tint: None,
        cycle: vec![Color::WHITE, Color::RED, Color::GREEN, Color::BLUE],
        ranges: vec![HighlightRange::new(5, 6, Color::YELLOW)],
    };
    let colors = coloring.resolve(16, Color::GREY);
    assert_eq!(colors[0], Color::WHITE);
    assert_eq!(colors[1], Color::RED);
    assert_eq!(colors[6], Color::GREEN);
    assert_eq!(colors[11], Color::BLUE);
    assert_eq!(colors[5], Color::YELLOW);
}

#[test]
fn tint_replaces_default() {
    let coloring = CellColoring {
        tint: Some(Color::GREEN),
        ..CellColoring::default()
    };
    assert!(
        coloring
            .resolve(4, Color::WHITE)
            .iter()
            .all(|c| *c == Color::GREEN)
    );
}

#[test]
fn selections_map_to_flat_indices() {
    let g = Grid::sequential(3, 3, 1).unwrap();
    assert_eq!(Selection::Column(0).flat_indices(&g).unwrap(), vec![0, 3, 6]);
    assert_eq!(Selection::Row(0).flat_indices(&g).unwrap(), vec![0, 1, 2]);
    assert!(Selection::Row(3).flat_indices(&g).is_err());
}

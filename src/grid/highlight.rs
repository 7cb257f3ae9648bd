use crate::{
    foundation::color::Color,
    foundation::error::{ScenegridError, ScenegridResult},
    grid::model::Grid,
};

/// Half-open span `[start, stop)` of a grid's row-major cells, painted with `color`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HighlightRange {
    /// First flat index (inclusive).
    pub start: usize,
    /// Last flat index (exclusive).
    pub stop: usize,
    /// Color tag applied to every cell in the span.
    pub color: Color,
}

impl HighlightRange {
    /// Create a range; bounds are checked against a grid in [`HighlightRange::validate_for`].
    pub fn new(start: usize, stop: usize, color: Color) -> Self {
        Self { start, stop, color }
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    /// `true` when the span covers no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` when flat index `i` is covered.
    pub fn contains(&self, i: usize) -> bool {
        self.start <= i && i < self.stop
    }

    /// Reject inverted spans and spans past the end of the flattened grid.
    pub fn validate_for(&self, cell_count: usize) -> ScenegridResult<()> {
        if self.start > self.stop {
            return Err(ScenegridError::validation(format!(
                "highlight range [{}, {}) has start > stop",
                self.start, self.stop
            )));
        }
        if self.stop > cell_count {
            return Err(ScenegridError::validation(format!(
                "highlight range [{}, {}) exceeds {} cells",
                self.start, self.stop, cell_count
            )));
        }
        Ok(())
    }
}

/// Whole row or column of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Row `i`.
    Row(usize),
    /// Column `j`.
    Column(usize),
}

impl Selection {
    /// Row-major indices covered by this selection.
    pub fn flat_indices(self, grid: &Grid) -> ScenegridResult<Vec<usize>> {
        let (rows, cols) = grid.dims();
        match self {
            Self::Row(i) if i < rows => Ok((0..cols).map(|j| i * cols + j).collect()),
            Self::Column(j) if j < cols => Ok((0..rows).map(|i| i * cols + j).collect()),
            other => Err(ScenegridError::validation(format!(
                "{other:?} is outside a {rows}x{cols} grid"
            ))),
        }
    }
}

/// Rectangle drawn around a selected row or column.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Outline {
    /// Which cells the rectangle surrounds.
    pub selection: Selection,
    /// Stroke color.
    pub color: Color,
}

/// Every coloring rule attached to one grid.
///
/// Resolution order: the base tint, then the cyclic palette, then ranges in the order they were
/// added. Overlapping ranges resolve last-applied-wins.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CellColoring {
    /// Color for every cell not otherwise painted. `None` means the scene default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<Color>,
    /// Palette applied by `flat_index % cycle.len()`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cycle: Vec<Color>,
    /// Explicit spans.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<HighlightRange>,
}

impl CellColoring {
    /// Validate all ranges against a grid with `cell_count` cells.
    pub fn validate_for(&self, cell_count: usize) -> ScenegridResult<()> {
        for r in &self.ranges {
            r.validate_for(cell_count)?;
        }
        Ok(())
    }

    /// Resolve one color per flat cell.
    pub fn resolve(&self, cell_count: usize, default: Color) -> Vec<Color> {
        let base = self.tint.unwrap_or(default);
        let mut out: Vec<Color> = (0..cell_count)
            .map(|i| {
                if self.cycle.is_empty() {
                    base
                } else {
                    self.cycle[i % self.cycle.len()]
                }
            })
            .collect();
        for r in &self.ranges {
            let stop = r.stop.min(cell_count);
            for c in out.iter_mut().take(stop).skip(r.start) {
                *c = r.color;
            }
        }
        out
    }
}

/// Resolve cell colors for `grid` from a plain list of ranges.
pub fn apply_highlights(
    grid: &Grid,
    ranges: &[HighlightRange],
    default: Color,
) -> ScenegridResult<Vec<Color>> {
    let coloring = CellColoring {
        ranges: ranges.to_vec(),
        ..CellColoring::default()
    };
    coloring.validate_for(grid.len())?;
    Ok(coloring.resolve(grid.len(), default))
}

#[cfg(test)]
#[path = "../../tests/unit/grid/highlight.rs"]
mod tests;

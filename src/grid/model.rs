use std::fmt;

use crate::foundation::error::{ScenegridError, ScenegridResult};

/// One display value of a [`Grid`] cell.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Integer entry (matrix elements, byte values, shuffle indices).
    Int(i64),
    /// Floating-point entry.
    Float(f64),
    /// Preformatted entry, e.g. a symbolic label.
    Text(String),
}

impl CellValue {
    /// Text drawn for this cell.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u8> for CellValue {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Immutable rectangular array of display values, stored row-major.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "GridRepr", into = "GridRepr")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellValue>,
}

impl Grid {
    /// Build a grid from nested rows. Rejects empty and ragged input.
    pub fn from_rows<R, V>(rows: R) -> ScenegridResult<Self>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut cells = Vec::new();
        let mut n_rows = 0usize;
        let mut n_cols: Option<usize> = None;
        for row in rows {
            let before = cells.len();
            cells.extend(row.into_iter().map(Into::into));
            let width = cells.len() - before;
            match n_cols {
                None => n_cols = Some(width),
                Some(c) if c != width => {
                    return Err(ScenegridError::validation(format!(
                        "grid row {n_rows} has {width} cells, expected {c}"
                    )));
                }
                Some(_) => {}
            }
            n_rows += 1;
        }
        let cols = n_cols.unwrap_or(0);
        Self::from_flat(n_rows, cols, cells)
    }

    /// Re-grid a flat row-major sequence into `rows x cols`.
    pub fn from_flat(rows: usize, cols: usize, cells: Vec<CellValue>) -> ScenegridResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(ScenegridError::validation(format!(
                "grid must have at least one row and one column (got {rows}x{cols})"
            )));
        }
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            ScenegridError::validation(format!("grid dimensions {rows}x{cols} overflow"))
        })?;
        if cells.len() != expected {
            return Err(ScenegridError::validation(format!(
                "grid {rows}x{cols} needs {expected} cells, got {}",
                cells.len()
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    /// `rows x cols` grid holding `start, start+1, ...` in row-major order.
    pub fn sequential(rows: usize, cols: usize, start: i64) -> ScenegridResult<Self> {
        let n = rows.saturating_mul(cols);
        let cells = (0..n)
            .map(|i| {
                i64::try_from(i)
                    .ok()
                    .and_then(|i| start.checked_add(i))
                    .map(CellValue::Int)
                    .ok_or_else(|| {
                        ScenegridError::validation(format!(
                            "sequential grid starting at {start} overflows i64"
                        ))
                    })
            })
            .collect::<ScenegridResult<Vec<_>>>()?;
        Self::from_flat(rows, cols, cells)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false` for a constructed grid; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major view of all cells.
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// Owned row-major copy of all cells.
    pub fn flatten(&self) -> Vec<CellValue> {
        self.cells.clone()
    }

    /// Row-major index of `(row, col)`, if inside the grid.
    pub fn flat_index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// `(row, col)` of a row-major index, if inside the grid.
    pub fn position(&self, flat: usize) -> Option<(usize, usize)> {
        (flat < self.cells.len()).then(|| (flat / self.cols, flat % self.cols))
    }

    /// Cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.flat_index(row, col).map(|i| &self.cells[i])
    }

    /// Cells of row `i`.
    pub fn row(&self, i: usize) -> Option<&[CellValue]> {
        (i < self.rows).then(|| &self.cells[i * self.cols..(i + 1) * self.cols])
    }

    /// Cells of column `j`, top to bottom.
    pub fn column(&self, j: usize) -> Option<Vec<&CellValue>> {
        (j < self.cols).then(|| (0..self.rows).map(|r| &self.cells[r * self.cols + j]).collect())
    }

    /// Nested-rows copy of the grid.
    pub fn to_rows(&self) -> Vec<Vec<CellValue>> {
        self.cells.chunks(self.cols).map(<[_]>::to_vec).collect()
    }

    /// Transposed grid: an `R x C` grid becomes `C x R` with `out(i, j) == self(j, i)`.
    pub fn transpose(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                cells.push(self.cells[i * self.cols + j].clone());
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
struct GridRepr(Vec<Vec<CellValue>>);

impl TryFrom<GridRepr> for Grid {
    type Error = ScenegridError;

    fn try_from(value: GridRepr) -> Result<Self, Self::Error> {
        Grid::from_rows(value.0)
    }
}

impl From<Grid> for GridRepr {
    fn from(value: Grid) -> Self {
        GridRepr(value.to_rows())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/model.rs"]
mod tests;

use crate::data::filter::CleanedRows;
use crate::data::model::Column;

// ---------------------------------------------------------------------------
// Pearson correlation
// ---------------------------------------------------------------------------

/// Pearson correlation of two equally long series.
///
/// NaN when fewer than two points are given or either series has zero
/// variance. The result is clamped to `[-1, 1]`.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Square, symmetric matrix of pairwise correlations.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<Column>,
    /// Row-major values, `columns.len()` squared.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Correlate every pair of `columns` over the given series.
    ///
    /// `series[i]` holds the values of `columns[i]`.
    pub fn from_series(columns: Vec<Column>, series: &[Vec<f64>]) -> Self {
        let n = columns.len();
        let mut values = vec![f64::NAN; n * n];
        for i in 0..n {
            for j in i..n {
                let r = if i == j {
                    // Self-correlation is 1 unless the column is constant.
                    if pearson(&series[i], &series[i]).is_nan() {
                        f64::NAN
                    } else {
                        1.0
                    }
                } else {
                    pearson(&series[i], &series[j])
                };
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }
        Self { columns, values }
    }

    /// Correlation matrix over every column of the cleaned rows.
    pub fn from_rows(rows: &CleanedRows<'_>) -> Self {
        let columns = Column::ALL.to_vec();
        let series: Vec<Vec<f64>> = columns.iter().map(|&c| rows.column(c)).collect();
        let matrix = Self::from_series(columns, &series);

        let undefined = matrix.undefined_columns();
        if !undefined.is_empty() {
            log::warn!("Constant columns give undefined correlations: {undefined:?}");
        }
        matrix
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size() + j]
    }

    /// Value for a pair of columns, `None` if either is not in the matrix.
    pub fn between(&self, a: Column, b: Column) -> Option<f64> {
        let i = self.columns.iter().position(|&c| c == a)?;
        let j = self.columns.iter().position(|&c| c == b)?;
        Some(self.get(i, j))
    }

    /// Columns whose self-correlation is undefined (zero variance).
    pub fn undefined_columns(&self) -> Vec<Column> {
        (0..self.size())
            .filter(|&i| self.get(i, i).is_nan())
            .map(|i| self.columns[i])
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Triangular mask
// ---------------------------------------------------------------------------

/// Hides the upper triangle and the diagonal: `hides(i, j)` is true iff `j >= i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriangularMask {
    cells: Vec<Vec<bool>>,
}

impl TriangularMask {
    pub fn upper(size: usize) -> Self {
        let cells = (0..size)
            .map(|i| (0..size).map(|j| j >= i).collect())
            .collect();
        Self { cells }
    }

    pub fn for_matrix(matrix: &CorrelationMatrix) -> Self {
        Self::upper(matrix.size())
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn hides(&self, i: usize, j: usize) -> bool {
        self.cells[i][j]
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.cells
    }
}

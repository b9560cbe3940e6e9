//! Count matrices driving territory filling and synapse spreading.

use tissue_core::{KindOfCell, TissueShape};

use crate::error::ConnectError;

/// How many synapses of each target kind source from each kind, per column.
///
/// `K` rows (tissue kinds) by `K + S` columns (all kinds), row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillMatrix {
    num_targets: usize,
    num_sources: usize,
    counts: Vec<u32>,
}

impl FillMatrix {
    /// Wrap row-major `counts` for `shape`.
    pub fn new(shape: &TissueShape, counts: Vec<u32>) -> Result<Self, ConnectError> {
        let num_targets = shape.num_tissue_kinds() as usize;
        let num_sources = shape.num_kinds() as usize;
        if counts.len() != num_targets * num_sources {
            return Err(ConnectError::MatrixShape {
                expected: num_targets * num_sources,
                actual: counts.len(),
            });
        }
        Ok(Self {
            num_targets,
            num_sources,
            counts,
        })
    }

    /// All-zero matrix for `shape`.
    pub fn zeros(shape: &TissueShape) -> Self {
        let num_targets = shape.num_tissue_kinds() as usize;
        let num_sources = shape.num_kinds() as usize;
        Self {
            num_targets,
            num_sources,
            counts: vec![0; num_targets * num_sources],
        }
    }

    /// Synapses of `target` sourcing from `source` in one column.
    pub fn get(&self, target: KindOfCell, source: KindOfCell) -> u32 {
        self.counts[self.index(target, source)]
    }

    /// Set the count of `target` sourcing from `source`.
    pub fn set(&mut self, target: KindOfCell, source: KindOfCell, count: u32) {
        let i = self.index(target, source);
        self.counts[i] = count;
    }

    /// Sum of the row of `target`.
    pub fn row_sum(&self, target: KindOfCell) -> u64 {
        let start = target.index() * self.num_sources;
        self.counts[start..start + self.num_sources]
            .iter()
            .map(|&c| c as u64)
            .sum()
    }

    /// Number of rows (tissue kinds).
    pub fn num_targets(&self) -> usize {
        self.num_targets
    }

    /// Number of columns (all kinds).
    pub fn num_sources(&self) -> usize {
        self.num_sources
    }

    fn index(&self, target: KindOfCell, source: KindOfCell) -> usize {
        assert!(
            target.index() < self.num_targets && source.index() < self.num_sources,
            "entry ({target}, {source}) outside {}x{} fill matrix",
            self.num_targets,
            self.num_sources
        );
        target.index() * self.num_sources + source.index()
    }
}

/// Counts of synapses to spread per relative column offset.
///
/// `diameter_y` rows by `diameter_x` columns, row-major. Row `r`, column `c`
/// stands for the offset `(c - diameter_x / 2, r - diameter_y / 2)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistributionMatrix {
    diameter_x: u32,
    diameter_y: u32,
    counts: Vec<u32>,
}

impl DistributionMatrix {
    /// Wrap row-major `counts` of a `diameter_x × diameter_y` neighbourhood.
    ///
    /// Diameters must be odd and nonzero.
    pub fn new(diameter_x: u32, diameter_y: u32, counts: Vec<u32>) -> Result<Self, ConnectError> {
        for (axis, diameter) in [("x", diameter_x), ("y", diameter_y)] {
            if diameter == 0 || diameter % 2 == 0 {
                return Err(ConnectError::InvalidDiameter {
                    axis,
                    diameter,
                    extent: 0,
                });
            }
        }
        let expected = diameter_x as usize * diameter_y as usize;
        if counts.len() != expected {
            return Err(ConnectError::MatrixShape {
                expected,
                actual: counts.len(),
            });
        }
        Ok(Self {
            diameter_x,
            diameter_y,
            counts,
        })
    }

    /// All-zero matrix.
    pub fn zeros(diameter_x: u32, diameter_y: u32) -> Result<Self, ConnectError> {
        Self::new(
            diameter_x,
            diameter_y,
            vec![0; diameter_x as usize * diameter_y as usize],
        )
    }

    /// Width of the neighbourhood.
    pub fn diameter_x(&self) -> u32 {
        self.diameter_x
    }

    /// Height of the neighbourhood.
    pub fn diameter_y(&self) -> u32 {
        self.diameter_y
    }

    /// Count at `(row, col)`.
    pub fn get(&self, row: u32, col: u32) -> u32 {
        self.counts[self.index(row, col)]
    }

    /// Set the count at `(row, col)`.
    pub fn set(&mut self, row: u32, col: u32, count: u32) {
        let i = self.index(row, col);
        self.counts[i] = count;
    }

    /// Total of all counts.
    pub fn sum(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Relative column offset `(dx, dy)` of `(row, col)`.
    pub fn offset_of(&self, row: u32, col: u32) -> (i32, i32) {
        (
            col as i32 - (self.diameter_x / 2) as i32,
            row as i32 - (self.diameter_y / 2) as i32,
        )
    }

    /// `(row, col)` of offset `(dx, dy)`, if inside the neighbourhood.
    pub fn cell_of_offset(&self, dx: i32, dy: i32) -> Option<(u32, u32)> {
        let col = dx + (self.diameter_x / 2) as i32;
        let row = dy + (self.diameter_y / 2) as i32;
        let inside = (0..self.diameter_x as i32).contains(&col)
            && (0..self.diameter_y as i32).contains(&row);
        inside.then_some((row as u32, col as u32))
    }

    /// Nonzero cells in row-major order as `(row, col, count)`.
    pub fn nonzero(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(i, &count)| {
                let i = i as u32;
                (i / self.diameter_x, i % self.diameter_x, count)
            })
    }

    /// Row-major counts.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    fn index(&self, row: u32, col: u32) -> usize {
        assert!(
            row < self.diameter_y && col < self.diameter_x,
            "cell ({row}, {col}) outside {}x{} matrix",
            self.diameter_y,
            self.diameter_x
        );
        (row * self.diameter_x + col) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tissue_test_utils::two_kind_shape;

    #[test]
    fn fill_matrix_rows_and_sums() {
        let shape = two_kind_shape();
        let mut m = FillMatrix::zeros(&shape);
        assert_eq!((m.num_targets(), m.num_sources()), (2, 4));
        m.set(KindOfCell(1), KindOfCell(3), 4);
        m.set(KindOfCell(1), KindOfCell(0), 2);
        assert_eq!(m.get(KindOfCell(1), KindOfCell(3)), 4);
        assert_eq!(m.row_sum(KindOfCell(1)), 6);
        assert_eq!(m.row_sum(KindOfCell(0)), 0);
        assert!(matches!(
            FillMatrix::new(&shape, vec![1, 2, 3]),
            Err(ConnectError::MatrixShape { expected: 8, actual: 3 })
        ));
    }

    #[test]
    fn distribution_offsets_are_centred() {
        let m = DistributionMatrix::new(3, 5, (0..15).collect()).unwrap();
        assert_eq!(m.offset_of(0, 0), (-1, -2));
        assert_eq!(m.offset_of(2, 1), (0, 0));
        assert_eq!(m.cell_of_offset(1, 2), Some((4, 2)));
        assert_eq!(m.cell_of_offset(2, 0), None);
        assert_eq!(m.get(4, 2), 14);
        assert_eq!(m.sum(), (0..15).sum::<u32>() as u64);
        let first: Vec<_> = m.nonzero().take(2).collect();
        assert_eq!(first, vec![(0, 1, 1), (0, 2, 2)]);
    }

    #[test]
    fn even_diameters_are_rejected() {
        assert!(matches!(
            DistributionMatrix::zeros(2, 3),
            Err(ConnectError::InvalidDiameter { axis: "x", .. })
        ));
        assert!(matches!(
            DistributionMatrix::new(3, 3, vec![0; 8]),
            Err(ConnectError::MatrixShape { .. })
        ));
    }
}

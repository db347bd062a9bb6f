use anyhow::{bail, Result};

/// The two system sizes the solver accepts. A matrix can only be built
/// from one of these, so `cols == rows + 1` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemShape {
    TwoByThree,
    ThreeByFour,
}

impl SystemShape {
    pub fn from_dimensions(rows: usize, cols: usize) -> Option<Self> {
        match (rows, cols) {
            (2, 3) => Some(Self::TwoByThree),
            (3, 4) => Some(Self::ThreeByFour),
            _ => None,
        }
    }

    pub fn rows(self) -> usize {
        match self {
            Self::TwoByThree => 2,
            Self::ThreeByFour => 3,
        }
    }

    pub fn cols(self) -> usize {
        self.rows() + 1
    }
}

/// `[A | b]` for a 2x2 or 3x3 system, stored row by row. The last column is `b`.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedMatrix {
    shape: SystemShape,
    rows: Vec<Vec<f64>>,
}

impl AugmentedMatrix {
    pub fn zeroes(shape: SystemShape) -> Self {
        Self {
            shape,
            rows: (0..shape.rows()).map(|_| vec![0.0; shape.cols()]).collect(),
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let number_of_rows = rows.len();
        let Some(shape) = SystemShape::from_dimensions(number_of_rows, number_of_rows + 1) else {
            bail!("only 2x3 or 3x4 augmented matrices are supported, got {number_of_rows} rows");
        };
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != shape.cols()) {
            bail!(
                "row {} has {} entries, expected {}",
                idx + 1,
                row.len(),
                shape.cols()
            );
        }
        Ok(Self { shape, rows })
    }

    pub fn shape(&self) -> SystemShape {
        self.shape
    }

    pub fn number_of_rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn number_of_columns(&self) -> usize {
        self.shape.cols()
    }

    pub fn last_col_idx(&self) -> usize {
        self.shape.cols() - 1
    }

    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.rows[r][c]
    }

    pub fn set(&mut self, r: usize, c: usize, v: f64) {
        self.rows[r][c] = v;
    }

    pub fn row(&self, r: usize) -> &[f64] {
        &self.rows[r]
    }

    /// Rows in order, each exactly `number_of_columns()` long.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    // length stays fixed: a slice can be written through but not resized
    pub(crate) fn row_mut(&mut self, r: usize) -> &mut [f64] {
        &mut self.rows[r]
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.rows.swap(a, b);
    }

    /// The `b` column, which holds `x` once the left block is the identity.
    pub fn rhs(&self) -> Vec<f64> {
        let last = self.last_col_idx();
        self.rows.iter().map(|row| row[last]).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_supported_shapes_exist() {
        assert_eq!(SystemShape::from_dimensions(2, 3), Some(SystemShape::TwoByThree));
        assert_eq!(SystemShape::from_dimensions(3, 4), Some(SystemShape::ThreeByFour));
        assert_eq!(SystemShape::from_dimensions(3, 3), None);
        assert_eq!(SystemShape::from_dimensions(4, 5), None);
        assert_eq!(SystemShape::ThreeByFour.cols(), 4);
    }

    #[test]
    fn from_rows_checks_every_row() {
        assert!(AugmentedMatrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).is_err());
        assert!(AugmentedMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]]).is_err());
        let m = AugmentedMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.rhs(), vec![3.0, 6.0]);
        assert_eq!(m.last_col_idx(), 2);
    }

    #[test]
    fn zeroes_has_the_shape_of_the_system() {
        let mut m = AugmentedMatrix::zeroes(SystemShape::ThreeByFour);
        assert_eq!(m.rows().count(), 3);
        assert!(m.rows().all(|r| r.len() == 4));
        m.set(2, 3, 7.0);
        m.swap_rows(0, 2);
        assert_eq!(m.get(0, 3), 7.0);
        assert_eq!(m.row(0), &[0.0, 0.0, 0.0, 7.0]);
    }

    #[test]
    fn rows_can_be_written_but_not_resized() {
        let mut m = AugmentedMatrix::from_rows(vec![vec![2.0, 1.0, 5.0], vec![1.0, -1.0, 1.0]])
            .unwrap();
        m.row_mut(1)[2] = 4.0;
        assert_eq!(m.row(1), &[1.0, -1.0, 4.0]);
        assert!(m.rows().all(|r| r.len() == m.number_of_columns()));
    }
}

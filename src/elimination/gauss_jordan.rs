use crate::number_format::format_cell;
use crate::step_recorder::StepRecorder;

use super::matrix::AugmentedMatrix;

/// Pivots and elimination factors smaller than this are treated as zero.
pub const EPS: f64 = 1e-10;

/// How a reduction ended. Columns are 0-based here and 1-based in the trace.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    /// The left block is the identity and `b` now holds `x`.
    Solved(Vec<f64>),
    /// No row at or below the diagonal had a usable pivot in `column`.
    Singular { column: usize },
    /// The chosen pivot was ~0 by the time the row was scaled.
    PivotVanished { column: usize },
}

impl Reduction {
    pub fn solution(&self) -> Option<&[f64]> {
        match self {
            Self::Solved(x) => Some(x.as_slice()),
            _ => None,
        }
    }
}

/// Runs a verbose Gauss-Jordan reduction on `matrix` in place, writing every
/// row operation to `recorder`. The recorder is appended to, not reset.
pub fn reduce(matrix: &mut AugmentedMatrix, recorder: &mut StepRecorder) -> Reduction {
    GaussJordan::new(matrix, recorder).go_to_reduced_form()
}

// Partial pivoting over the left n x n block. Each swap, scale and
// elimination is logged as its own iteration followed by the matrix.
pub struct GaussJordan<'a> {
    matrix: &'a mut AugmentedMatrix,
    recorder: &'a mut StepRecorder,
    active_column: usize,
    iteration: usize,
}

impl<'a> GaussJordan<'a> {
    pub fn new(matrix: &'a mut AugmentedMatrix, recorder: &'a mut StepRecorder) -> Self {
        Self {
            matrix,
            recorder,
            active_column: 0,
            iteration: 1,
        }
    }

    pub fn go_to_reduced_form(mut self) -> Reduction {
        self.recorder.append("Initial matrix:");
        self.record_matrix();
        while self.is_not_in_reduced_form() {
            if let Err(stopped) = self.pivot_active_column() {
                return stopped;
            }
            self.go_to_next_column();
        }
        self.record_solution()
    }

    fn is_not_in_reduced_form(&self) -> bool {
        self.active_column < self.matrix.number_of_rows()
    }

    fn pivot_active_column(&mut self) -> Result<(), Reduction> {
        let column = self.active_column;
        let (pivot, best) = self.find_pivot();
        if best < EPS {
            log::debug!("column {}: max |pivot| = {best:e}, singular", column + 1);
            self.note(&format!(
                "~0 pivot in column {}. Singular/underdetermined.",
                column + 1
            ));
            self.record_matrix();
            return Err(Reduction::Singular { column });
        }
        if pivot != column {
            self.swap_into_place(pivot);
        }
        self.scale_pivot_row()?;
        self.eliminate_other_rows();
        Ok(())
    }

    // first row wins ties so an already largest diagonal is never swapped
    fn find_pivot(&self) -> (usize, f64) {
        let column = self.active_column;
        let mut pivot = column;
        let mut best = self.matrix.get(column, column).abs();
        for r in (column + 1)..self.matrix.number_of_rows() {
            let v = self.matrix.get(r, column).abs();
            if v > best {
                best = v;
                pivot = r;
            }
        }
        (pivot, best)
    }

    fn swap_into_place(&mut self, pivot: usize) {
        let column = self.active_column;
        log::debug!("swapping R{} and R{}", column + 1, pivot + 1);
        self.note(&format!("Swap R{} <-> R{}", column + 1, pivot + 1));
        self.matrix.swap_rows(column, pivot);
        self.record_matrix();
    }

    fn scale_pivot_row(&mut self) -> Result<(), Reduction> {
        let column = self.active_column;
        let p = self.matrix.get(column, column);
        if p.abs() < EPS {
            self.note("pivot vanished; abort.");
            return Err(Reduction::PivotVanished { column });
        }
        let inv = 1.0 / p;
        for v in self.matrix.row_mut(column)[column..].iter_mut() {
            *v *= inv;
        }
        log::debug!("scaled R{} by {inv}", column + 1);
        self.note(&format!(
            "Scale R{} by {} (pivot->1)",
            column + 1,
            format_cell(inv)
        ));
        self.record_matrix();
        Ok(())
    }

    fn eliminate_other_rows(&mut self) {
        let column = self.active_column;
        let pivot_row = self.matrix.row(column).to_vec();
        for r in 0..self.matrix.number_of_rows() {
            if r == column {
                continue;
            }
            let factor = self.matrix.get(r, column);
            if factor.abs() < EPS {
                continue;
            }
            for (v, p) in self.matrix.row_mut(r)[column..]
                .iter_mut()
                .zip(&pivot_row[column..])
            {
                *v -= factor * p;
            }
            log::debug!("R{} -= {factor} * R{}", r + 1, column + 1);
            self.note(&format!(
                "R{} <- R{} - ({}) * R{}",
                r + 1,
                r + 1,
                format_cell(factor),
                column + 1
            ));
            self.record_matrix();
        }
    }

    fn go_to_next_column(&mut self) {
        self.active_column += 1;
    }

    fn record_solution(self) -> Reduction {
        self.recorder.append("Finished Gauss-Jordan. Expect [I | x].");
        self.recorder.render_matrix(self.matrix);
        self.recorder.append("Solution x:");
        let x = self.matrix.rhs();
        for (i, v) in x.iter().enumerate() {
            self.recorder.append(&format!("  x[{i}] = {}", format_cell(*v)));
        }
        Reduction::Solved(x)
    }

    fn note(&mut self, text: &str) {
        self.recorder.append(&format!("Iter {}: {text}", self.iteration));
        self.iteration += 1;
    }

    fn record_matrix(&mut self) {
        self.recorder.render_matrix(self.matrix);
    }
}

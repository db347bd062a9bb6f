use std::fmt;
use std::ops::Index;

use itertools::Itertools;

use crate::elimination::matrix::AugmentedMatrix;
use crate::number_format::{format_cell, truncate_chars};

/// Longest text a single trace line may hold.
pub const LINE_CHARS: usize = 55;
/// Number of lines a recorder keeps before it starts dropping new ones.
pub const DEFAULT_CAPACITY: usize = 280;
/// Largest capacity a recorder may be configured with.
pub const MAX_CAPACITY: usize = 100_000;

/// One line of the elimination trace. Cut to [`LINE_CHARS`] when built and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine(String);

impl LogLine {
    pub fn new(text: &str) -> Self {
        Self(truncate_chars(text, LINE_CHARS))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only, fixed capacity trace of an elimination run.
///
/// Once `capacity` lines are stored every further [`StepRecorder::append`]
/// is dropped: earlier lines are never overwritten and the count stays at
/// capacity. Call [`StepRecorder::reset`] before reusing a recorder for a
/// new system.
pub struct StepRecorder {
    lines: Vec<LogLine>,
    capacity: usize,
    dropped: usize,
}

impl Default for StepRecorder {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl StepRecorder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Capacities above [`MAX_CAPACITY`] are clamped to it. Storage grows
    /// on demand past the default size.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_CAPACITY);
        Self {
            lines: Vec::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            dropped: 0,
        }
    }

    pub fn append(&mut self, text: &str) {
        if self.is_full() {
            if self.dropped == 0 {
                log::debug!("step trace is full ({} lines), dropping the rest", self.capacity);
            }
            self.dropped += 1;
            return;
        }
        self.lines.push(LogLine::new(text));
    }

    // keeps the allocation around for the next run
    pub fn reset(&mut self) {
        self.lines.clear();
        self.dropped = 0;
    }

    pub fn count(&self) -> usize {
        self.lines.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lines rejected since the last reset because the trace was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.capacity
    }

    pub fn line(&self, index: usize) -> Option<&LogLine> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Appends a `Matrix [A | b]:` header, one `  [ a b | c ]` line per row
    /// and a blank separator.
    pub fn render_matrix(&mut self, matrix: &AugmentedMatrix) {
        self.append("Matrix [A | b]:");
        let last_col_idx = matrix.last_col_idx();
        for row in matrix.rows() {
            let line = format!(
                "  [ {} | {} ]",
                row[..last_col_idx].iter().map(|v| format_cell(*v)).join(" "),
                format_cell(row[last_col_idx])
            );
            self.append(&line);
        }
        self.append("");
    }
}

impl Index<usize> for StepRecorder {
    type Output = LogLine;

    fn index(&self, index: usize) -> &LogLine {
        &self.lines[index]
    }
}

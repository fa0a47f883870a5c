//! Winning-line enumeration.

use tracing::instrument;

/// The winning lines of an N×N board, computed once and reused.
///
/// Covers every row, every column, and both full diagonals exactly once:
/// `2N + 2` lines, each holding exactly N board indices. Partial-length
/// runs never count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSet {
    size: usize,
    lines: Vec<Vec<usize>>,
}

impl LineSet {
    /// Enumerates the winning lines for a board with `size` squares per side.
    #[instrument]
    pub fn new(size: usize) -> Self {
        let mut lines = Vec::with_capacity(2 * size + 2);
        for row in 0..size {
            lines.push((0..size).map(|col| row * size + col).collect());
        }
        for col in 0..size {
            lines.push((0..size).map(|row| row * size + col).collect());
        }
        lines.push((0..size).map(|i| i * size + i).collect());
        lines.push((0..size).map(|i| i * size + (size - 1 - i)).collect());
        Self { size, lines }
    }

    /// Side length this set was computed for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All winning lines in row/column/diagonal order.
    pub fn lines(&self) -> &[Vec<usize>] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        for size in 1..=8 {
            let set = LineSet::new(size);
            assert_eq!(set.lines().len(), 2 * size + 2);
        }
    }

    #[test]
    fn test_line_lengths() {
        let set = LineSet::new(5);
        assert!(set.lines().iter().all(|line| line.len() == 5));
    }

    #[test]
    fn test_four_by_four_lines() {
        // the exact table the 4×4 verifier plays against
        let set = LineSet::new(4);
        let expected: Vec<Vec<usize>> = vec![
            vec![0, 1, 2, 3],
            vec![4, 5, 6, 7],
            vec![8, 9, 10, 11],
            vec![12, 13, 14, 15],
            vec![0, 4, 8, 12],
            vec![1, 5, 9, 13],
            vec![2, 6, 10, 14],
            vec![3, 7, 11, 15],
            vec![0, 5, 10, 15],
            vec![3, 6, 9, 12],
        ];
        assert_eq!(set.lines(), expected.as_slice());
    }
}

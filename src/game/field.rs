use super::types::{Cell, Outcome};

pub const BOARD_SIZE: usize = 3;
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Rows, columns and diagonals, scanned in this order.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The 3×3 board, cells indexed 0..9 in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Returns `None` for an out-of-range index.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    #[cfg(test)]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

/// Mark occupying the first completed line, if any.
pub fn check_winner(board: &Board) -> Option<Cell> {
    winning_line(board).map(|[a, _, _]| board.cells[a])
}

/// First completed line in declaration order.
pub fn winning_line(board: &Board) -> Option<[usize; 3]> {
    WIN_LINES.iter().copied().find(|&[a, b, c]| {
        let first = board.cells[a];
        !first.is_empty() && first == board.cells[b] && first == board.cells[c]
    })
}

/// Derive the outcome from board contents. A win takes precedence over a full board.
pub fn outcome_of(board: &Board) -> Outcome {
    match check_winner(board) {
        Some(Cell::X) => Outcome::PlayerWin,
        Some(Cell::O) => Outcome::BotWin,
        _ if board.is_full() => Outcome::Draw,
        _ => Outcome::InProgress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Cell::{Empty as E, O, X};

    #[test]
    fn empty_board_has_no_winner() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
        assert_eq!(outcome_of(&board), Outcome::InProgress);
    }

    #[test]
    fn top_row_of_x_wins() {
        let board = Board::from_cells([X, X, X, O, O, E, E, E, E]);
        assert_eq!(check_winner(&board), Some(X));
        assert_eq!(winning_line(&board), Some([0, 1, 2]));
        assert_eq!(outcome_of(&board), Outcome::PlayerWin);
    }

    #[test]
    fn columns_and_diagonals_are_detected() {
        let column = Board::from_cells([E, O, X, E, O, X, E, O, E]);
        assert_eq!(winning_line(&column), Some([1, 4, 7]));
        assert_eq!(outcome_of(&column), Outcome::BotWin);

        let anti_diagonal = Board::from_cells([E, E, X, E, X, O, X, O, E]);
        assert_eq!(winning_line(&anti_diagonal), Some([2, 4, 6]));
    }

    #[test]
    fn incomplete_line_is_not_a_win() {
        let board = Board::from_cells([X, X, O, E, O, E, E, E, X]);
        assert_eq!(check_winner(&board), None);
        assert_eq!(outcome_of(&board), Outcome::InProgress);
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let board = Board::from_cells([X, O, X, X, O, O, O, X, X]);
        assert!(board.is_full());
        assert_eq!(check_winner(&board), None);
        assert_eq!(outcome_of(&board), Outcome::Draw);
    }

    #[test]
    fn win_on_full_board_beats_draw() {
        let board = Board::from_cells([X, O, X, O, X, O, O, X, X]);
        assert!(board.is_full());
        assert_eq!(outcome_of(&board), Outcome::PlayerWin);
    }

    #[test]
    fn empty_indices_and_counts() {
        let board = Board::from_cells([X, E, O, E, E, E, E, E, X]);
        assert_eq!(board.empty_indices(), vec![1, 3, 4, 5, 6, 7]);
        assert_eq!(board.count(X), 2);
        assert_eq!(board.count(O), 1);
        assert_eq!(board.get(9), None);
    }
}

use tracing::{debug, info, warn};

use super::field::{self, Board};
use super::types::{BotTicket, Cell, Cue, MoveResult, Outcome, Phase, Snapshot};
use crate::ai::MovePicker;

/// Receiver of move/win/loss cues. Implementations must not block.
pub trait Feedback {
    fn cue(&self, cue: Cue);
}

/// Feedback sink that drops every cue.
#[allow(dead_code)]
pub struct Silent;

impl Feedback for Silent {
    fn cue(&self, _cue: Cue) {}
}

/// Owns the board and drives the turn machine for one human against the bot.
pub struct GameController {
    board: Board,
    phase: Phase,
    generation: u64,
    picker: Box<dyn MovePicker>,
    feedback: Box<dyn Feedback>,
}

impl GameController {
    pub fn new(picker: Box<dyn MovePicker>, feedback: Box<dyn Feedback>) -> Self {
        Self {
            board: Board::new(),
            phase: Phase::PlayerTurn,
            generation: 0,
            picker,
            feedback,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome derived from the current board.
    pub fn status(&self) -> Outcome {
        field::outcome_of(&self.board)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            turn: self.phase.turn(),
            outcome: self.status(),
        }
    }

    /// Player places an X. Anything other than an empty in-range cell during
    /// the player's turn is ignored.
    pub fn select_cell(&mut self, index: usize) -> MoveResult {
        if self.phase != Phase::PlayerTurn {
            debug!(index, phase = ?self.phase, "cell selected outside player turn");
            return MoveResult::Ignored;
        }
        match self.board.get(index) {
            Some(Cell::Empty) => {}
            Some(_) => {
                debug!(index, "cell already taken");
                return MoveResult::Ignored;
            }
            None => {
                debug!(index, "cell index out of range");
                return MoveResult::Ignored;
            }
        }

        self.board.set(index, Cell::X);
        self.feedback.cue(Cue::Move);
        debug!(index, "player placed X");

        match self.status() {
            Outcome::InProgress => {
                self.phase = Phase::BotTurn;
                MoveResult::BotPending(BotTicket {
                    generation: self.generation,
                })
            }
            outcome => self.finish(outcome),
        }
    }

    /// Bot places an O on a random empty cell. Stale or out-of-turn tickets are ignored.
    pub fn bot_move(&mut self, ticket: BotTicket) -> MoveResult {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "stale bot move dropped"
            );
            return MoveResult::Ignored;
        }
        if self.phase != Phase::BotTurn {
            debug!(phase = ?self.phase, "bot move outside bot turn");
            return MoveResult::Ignored;
        }

        let candidates = self.board.empty_indices();
        let index = match self.picker.pick(&candidates) {
            Some(i) if candidates.contains(&i) => i,
            other => {
                warn!(choice = ?other, free = candidates.len(), "bot has no usable move");
                return MoveResult::Ignored;
            }
        };

        self.board.set(index, Cell::O);
        debug!(index, "bot placed O");

        match self.status() {
            Outcome::InProgress => {
                self.phase = Phase::PlayerTurn;
                MoveResult::Continue
            }
            outcome => self.finish(outcome),
        }
    }

    /// Start a new game from any state. Pending bot tickets become stale.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.phase = Phase::PlayerTurn;
        self.generation = self.generation.wrapping_add(1);
        info!(generation = self.generation, "new game");
    }

    fn finish(&mut self, outcome: Outcome) -> MoveResult {
        self.phase = Phase::Ended(outcome);
        match outcome {
            Outcome::PlayerWin => self.feedback.cue(Cue::PlayerWin),
            Outcome::BotWin => self.feedback.cue(Cue::BotWin),
            Outcome::Draw | Outcome::InProgress => {}
        }
        info!(?outcome, generation = self.generation, "game over");
        MoveResult::GameOver(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;
    use crate::ai::RandomPicker;
    use crate::game::types::Turn;

    /// Plays the queued indices in order, then falls back to the first candidate.
    struct Scripted(VecDeque<usize>);

    impl MovePicker for Scripted {
        fn pick(&mut self, candidates: &[usize]) -> Option<usize> {
            match self.0.pop_front() {
                Some(i) => Some(i),
                None => candidates.first().copied(),
            }
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Cue>>>);

    impl Feedback for Recorder {
        fn cue(&self, cue: Cue) {
            self.0.borrow_mut().push(cue);
        }
    }

    fn scripted(bot: &[usize]) -> (GameController, Recorder) {
        let recorder = Recorder::default();
        let game = GameController::new(
            Box::new(Scripted(bot.iter().copied().collect())),
            Box::new(recorder.clone()),
        );
        (game, recorder)
    }

    fn ticket(result: MoveResult) -> BotTicket {
        match result {
            MoveResult::BotPending(t) => t,
            other => panic!("expected pending bot move, got {other:?}"),
        }
    }

    #[test]
    fn only_player_moves_cue_a_sound() {
        let (mut game, cues) = scripted(&[4]);
        let t = ticket(game.select_cell(0));
        assert_eq!(*cues.0.borrow(), vec![Cue::Move]);
        assert_eq!(game.bot_move(t), MoveResult::Continue);
        assert_eq!(*cues.0.borrow(), vec![Cue::Move]);
    }

    #[test]
    fn scenario_without_premature_win() {
        let (mut game, _) = scripted(&[4, 2]);

        let t = ticket(game.select_cell(0));
        assert_eq!(game.board().get(0), Some(Cell::X));
        assert_eq!(game.snapshot().turn, Some(Turn::Bot));

        assert_eq!(game.bot_move(t), MoveResult::Continue);
        assert_eq!(game.board().get(4), Some(Cell::O));
        assert_eq!(game.snapshot().turn, Some(Turn::Player));

        let t = ticket(game.select_cell(1));
        assert_eq!(game.bot_move(t), MoveResult::Continue);
        use crate::game::types::Cell::{Empty as E, O, X};
        assert_eq!(game.board().cells(), &[X, X, O, E, O, E, E, E, E]);
        assert_eq!(game.status(), Outcome::InProgress);
        assert_eq!(game.phase(), Phase::PlayerTurn);

        // [2, 4, 6] is still open at 6
        assert!(matches!(game.select_cell(8), MoveResult::BotPending(_)));
        assert_eq!(game.status(), Outcome::InProgress);
    }

    #[test]
    fn player_win_ends_game_and_freezes_board() {
        let (mut game, cues) = scripted(&[3, 4]);
        let t = ticket(game.select_cell(0));
        game.bot_move(t);
        let t = ticket(game.select_cell(1));
        game.bot_move(t);

        assert_eq!(game.select_cell(2), MoveResult::GameOver(Outcome::PlayerWin));
        assert_eq!(game.phase(), Phase::Ended(Outcome::PlayerWin));
        assert_eq!(game.snapshot().turn, None);

        let frozen = *game.board();
        for i in 0..9 {
            assert_eq!(game.select_cell(i), MoveResult::Ignored);
        }
        assert_eq!(*game.board(), frozen);

        assert_eq!(
            *cues.0.borrow(),
            vec![Cue::Move, Cue::Move, Cue::Move, Cue::PlayerWin]
        );
    }

    #[test]
    fn bot_win_emits_loss_cue() {
        let (mut game, cues) = scripted(&[0, 1, 2]);
        for player in [3, 4] {
            let t = ticket(game.select_cell(player));
            assert_eq!(game.bot_move(t), MoveResult::Continue);
        }
        let t = ticket(game.select_cell(8));
        assert_eq!(game.bot_move(t), MoveResult::GameOver(Outcome::BotWin));
        assert_eq!(game.status(), Outcome::BotWin);
        assert_eq!(
            *cues.0.borrow(),
            vec![Cue::Move, Cue::Move, Cue::Move, Cue::BotWin]
        );
        assert_eq!(game.select_cell(5), MoveResult::Ignored);
    }

    #[test]
    fn full_board_without_line_is_draw_without_cue() {
        // X: 0 2 3 7 8, O: 1 4 5 6
        let (mut game, cues) = scripted(&[1, 4, 5, 6]);
        for player in [0, 2, 3, 7] {
            let t = ticket(game.select_cell(player));
            assert_eq!(game.bot_move(t), MoveResult::Continue);
        }
        assert_eq!(game.select_cell(8), MoveResult::GameOver(Outcome::Draw));
        assert_eq!(game.phase(), Phase::Ended(Outcome::Draw));
        assert!(cues.0.borrow().iter().all(|c| *c == Cue::Move));
        assert_eq!(cues.0.borrow().len(), 5);
    }

    #[test]
    fn last_move_completing_a_line_is_a_win() {
        // X O X / O X O / O X _ with the ninth mark completing 0-4-8
        let (mut game, _) = scripted(&[1, 3, 5, 6]);
        for player in [0, 2, 4, 7] {
            let t = ticket(game.select_cell(player));
            assert_eq!(game.bot_move(t), MoveResult::Continue);
        }
        assert_eq!(game.board().count(Cell::Empty), 1);
        assert_eq!(game.select_cell(8), MoveResult::GameOver(Outcome::PlayerWin));
    }

    #[test]
    fn invalid_selections_are_ignored() {
        let (mut game, cues) = scripted(&[4]);
        assert_eq!(game.select_cell(9), MoveResult::Ignored);
        assert_eq!(game.select_cell(usize::MAX), MoveResult::Ignored);

        let t = ticket(game.select_cell(0));
        // Bot's turn: player input is ignored.
        assert_eq!(game.select_cell(1), MoveResult::Ignored);
        game.bot_move(t);
        // Occupied cells.
        assert_eq!(game.select_cell(0), MoveResult::Ignored);
        assert_eq!(game.select_cell(4), MoveResult::Ignored);

        assert_eq!(cues.0.borrow().len(), 1);
        assert_eq!(game.board().count(Cell::Empty), 7);
    }

    fn assert_fresh_game(game: &mut GameController) {
        let snap = game.snapshot();
        assert_eq!(snap.board, Board::new());
        assert_eq!(snap.turn, Some(Turn::Player));
        assert_eq!(snap.outcome, Outcome::InProgress);
        assert_eq!(game.phase(), Phase::PlayerTurn);
        assert!(matches!(game.select_cell(4), MoveResult::BotPending(_)));
    }

    #[test]
    fn reset_restores_initial_state_from_anywhere() {
        let (mut game, _) = scripted(&[]);
        game.reset();
        assert_fresh_game(&mut game);

        // From the bot's turn (the previous call left a pending bot move).
        assert_eq!(game.phase(), Phase::BotTurn);
        game.reset();
        assert_fresh_game(&mut game);
    }

    /// Plays `player` moves against `bot` moves until the game ends.
    fn play_out(bot: &[usize], player: &[usize]) -> GameController {
        let (mut game, _) = scripted(bot);
        for &index in player {
            if let MoveResult::BotPending(t) = game.select_cell(index) {
                game.bot_move(t);
            }
        }
        game
    }

    #[test]
    fn reset_after_each_ending_starts_a_new_game() {
        let endings = [
            (play_out(&[3, 4], &[0, 1, 2]), Outcome::PlayerWin),
            (play_out(&[0, 1, 2], &[3, 4, 8]), Outcome::BotWin),
            (play_out(&[1, 4, 5, 6], &[0, 2, 3, 7, 8]), Outcome::Draw),
        ];
        for (mut game, expected) in endings {
            assert_eq!(game.phase(), Phase::Ended(expected));
            assert_eq!(game.status(), expected);
            game.reset();
            assert_fresh_game(&mut game);
        }
    }

    #[test]
    fn stale_bot_ticket_is_dropped_after_reset() {
        let (mut game, _) = scripted(&[4, 4]);
        let stale = ticket(game.select_cell(0));
        game.reset();

        assert_eq!(game.bot_move(stale), MoveResult::Ignored);
        assert_eq!(game.board(), &Board::new());

        let fresh = ticket(game.select_cell(0));
        assert_ne!(fresh, stale);
        assert_eq!(game.bot_move(stale), MoveResult::Ignored);
        assert_eq!(game.bot_move(fresh), MoveResult::Continue);
        assert_eq!(game.board().get(4), Some(Cell::O));
    }

    #[test]
    fn duplicate_bot_ticket_moves_only_once() {
        let (mut game, _) = scripted(&[4, 5]);
        let t = ticket(game.select_cell(0));
        assert_eq!(game.bot_move(t), MoveResult::Continue);
        assert_eq!(game.bot_move(t), MoveResult::Ignored);
        assert_eq!(game.board().count(Cell::O), 1);
    }

    #[test]
    fn picker_returning_occupied_cell_is_a_no_op() {
        let (mut game, _) = scripted(&[0]);
        let t = ticket(game.select_cell(0));
        assert_eq!(game.bot_move(t), MoveResult::Ignored);
        assert_eq!(game.board().count(Cell::O), 0);
        assert_eq!(game.phase(), Phase::BotTurn);
    }

    #[test]
    fn random_games_respect_mark_counts() {
        for seed in 0..200u64 {
            let mut game =
                GameController::new(Box::new(RandomPicker::seeded(seed)), Box::new(Silent));
            let mut player = RandomPicker::seeded(seed.wrapping_mul(31).wrapping_add(17));
            loop {
                let free = game.board().empty_indices();
                let Some(choice) = player.pick(&free) else { break };
                let result = game.select_cell(choice);
                if let MoveResult::BotPending(t) = result {
                    game.bot_move(t);
                }
                let board = game.board();
                let (x, o) = (board.count(Cell::X), board.count(Cell::O));
                assert!(x <= 5 && o <= 4, "seed {seed}: {x} X, {o} O");
                assert!(x == o || x == o + 1, "seed {seed}: {x} X, {o} O");
                assert_eq!(game.status(), field::outcome_of(board));
                if let Phase::Ended(outcome) = game.phase() {
                    assert_eq!(outcome, game.status());
                    assert_ne!(outcome, Outcome::InProgress);
                    break;
                }
            }
            assert!(matches!(game.phase(), Phase::Ended(_)));
        }
    }
}

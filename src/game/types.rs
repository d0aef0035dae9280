use super::field::Board;

/// Content of a single square on the 3×3 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// The human player's mark.
    X,
    /// The bot's mark.
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Who may move next while the game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Player,
    Bot,
}

/// Result of the game from the human player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    PlayerWin,
    BotWin,
    Draw,
}

/// States of the controller's turn machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlayerTurn,
    BotTurn,
    /// Terminal until the next reset.
    Ended(Outcome),
}

impl Phase {
    pub fn turn(self) -> Option<Turn> {
        match self {
            Phase::PlayerTurn => Some(Turn::Player),
            Phase::BotTurn => Some(Turn::Bot),
            Phase::Ended(_) => None,
        }
    }
}

/// Fire-and-forget feedback events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// The player placed a mark.
    Move,
    PlayerWin,
    BotWin,
}

/// Permission to perform one bot move within a specific game.
///
/// Tickets from an earlier game are rejected after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotTicket {
    pub generation: u64,
}

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// Request was not applicable in the current state; nothing changed.
    Ignored,
    /// Move applied, the player is next.
    Continue,
    /// Player move applied; the caller should run the bot with this ticket after a delay.
    BotPending(BotTicket),
    /// Move applied and the game is over.
    GameOver(Outcome),
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    /// `None` once the game has ended.
    pub turn: Option<Turn>,
    pub outcome: Outcome,
}

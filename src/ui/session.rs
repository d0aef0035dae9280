use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{DrawingArea, Label};

use crate::game::logic::GameController;
use crate::game::types::{BotTicket, MoveResult, Outcome, Snapshot, Turn};
use crate::i18n::I18n;

/// Connects the controller to the widgets that show it and to the main-loop timer.
pub struct Session {
    game: RefCell<GameController>,
    bot_delay: Duration,
    i18n: Rc<I18n>,
    banner: Label,
    board_view: DrawingArea,
}

impl Session {
    pub fn new(
        game: GameController,
        bot_delay: Duration,
        i18n: Rc<I18n>,
        banner: Label,
        board_view: DrawingArea,
    ) -> Rc<Self> {
        let session = Rc::new(Self {
            game: RefCell::new(game),
            bot_delay,
            i18n,
            banner,
            board_view,
        });
        session.refresh();
        session
    }

    pub fn snapshot(&self) -> Snapshot {
        self.game.borrow().snapshot()
    }

    /// Input surface: a cell was clicked.
    pub fn activate_cell(self: &Rc<Self>, index: usize) {
        let result = self.game.borrow_mut().select_cell(index);
        match result {
            MoveResult::Ignored => return,
            MoveResult::BotPending(ticket) => self.schedule_bot(ticket),
            MoveResult::Continue | MoveResult::GameOver(_) => {}
        }
        self.refresh();
    }

    /// Input surface: restart button or menu.
    pub fn restart(&self) {
        self.game.borrow_mut().reset();
        self.refresh();
    }

    /// The timer is not cancelled on restart; the controller drops stale tickets.
    fn schedule_bot(self: &Rc<Self>, ticket: BotTicket) {
        let session = Rc::downgrade(self);
        glib::timeout_add_local_once(self.bot_delay, move || {
            let Some(session) = session.upgrade() else { return };
            let result = session.game.borrow_mut().bot_move(ticket);
            if result != MoveResult::Ignored {
                session.refresh();
            }
        });
    }

    /// Redraw the board and update the turn/result banner.
    pub fn refresh(&self) {
        let snapshot = self.snapshot();
        let key = match (snapshot.outcome, snapshot.turn) {
            (Outcome::PlayerWin, _) => "result-win",
            (Outcome::BotWin, _) => "result-lose",
            (Outcome::Draw, _) => "result-draw",
            (Outcome::InProgress, Some(Turn::Bot)) => "turn-bot",
            (Outcome::InProgress, _) => "turn-player",
        };
        self.banner.set_text(&self.i18n.t(key));
        self.board_view.queue_draw();
    }
}

use std::cell::Cell as Slot;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{DrawingArea, EventControllerMotion, GestureClick};

use super::rendering::{self, REF_SIZE};
use super::resources::GameResources;
use super::session::Session;

/// Create the empty board widget. Handlers are attached by [`connect_board`]
/// once the session exists.
pub fn create_board() -> DrawingArea {
    let drawing_area = DrawingArea::new();
    drawing_area.set_content_width(REF_SIZE as i32);
    drawing_area.set_content_height(REF_SIZE as i32);
    drawing_area.set_hexpand(true);
    drawing_area.set_vexpand(true);
    drawing_area
}

/// Attach drawing, click and hover handling to the board widget.
pub fn connect_board(
    drawing_area: &DrawingArea,
    session: Rc<Session>,
    resources: Rc<GameResources>,
) {
    let hover: Rc<Slot<Option<usize>>> = Rc::new(Slot::new(None));

    // --- Draw handler ---
    {
        let session = session.clone();
        let hover = hover.clone();
        drawing_area.set_draw_func(move |_area, cr, w, h| {
            rendering::render(cr, &session.snapshot(), &resources, w, h, hover.get());
        });
    }

    // --- Click handler ---
    {
        let da = drawing_area.clone();
        let click = GestureClick::new();
        click.connect_released(move |_gesture, _n, x, y| {
            if let Some(index) = rendering::mouse_to_cell(x, y, da.width(), da.height()) {
                session.activate_cell(index);
            }
        });
        drawing_area.add_controller(click);
    }

    // --- Hover ---
    {
        let da = drawing_area.clone();
        let hover_in = hover.clone();
        let motion = EventControllerMotion::new();
        motion.connect_motion(move |_ctrl, x, y| {
            let cell = rendering::mouse_to_cell(x, y, da.width(), da.height());
            if hover_in.replace(cell) != cell {
                da.queue_draw();
            }
        });
        let da = drawing_area.clone();
        motion.connect_leave(move |_ctrl| {
            if hover.replace(None).is_some() {
                da.queue_draw();
            }
        });
        drawing_area.add_controller(motion);
    }
}

use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::PI;

use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gtk4::prelude::*;

use super::resources::{GameImage, GameResources};
use crate::game::field::{self, BOARD_SIZE};
use crate::game::types::{Cell, Outcome, Snapshot, Turn};

// Layout in reference coordinates; the scene is scaled uniformly to the widget.
pub const REF_SIZE: f64 = 360.0;
const GRID_OFFSET: f64 = 30.0;
const CELL_SIZE: f64 = 100.0;
const MARK_INSET: f64 = 12.0;
const GRID_LINE_WIDTH: f64 = 6.0;

// Latest rasterisation of each SVG tree, keyed by tree address.
thread_local! {
    static SVG_CACHE: RefCell<SizedCache<Pixbuf>> = RefCell::new(SizedCache::default());
}

/// Keeps one rendered value per key, replaced whenever the pixel size changes.
struct SizedCache<V> {
    entries: HashMap<usize, ((u32, u32), V)>,
}

impl<V> Default for SizedCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> SizedCache<V> {
    fn get_or_render(
        &mut self,
        key: usize,
        size: (u32, u32),
        render: impl FnOnce() -> Option<V>,
    ) -> Option<V> {
        if let Some((cached_size, value)) = self.entries.get(&key) {
            if *cached_size == size {
                return Some(value.clone());
            }
        }
        let value = render()?;
        self.entries.insert(key, (size, value.clone()));
        Some(value)
    }
}

/// Uniform scale and centering offset for a widget of the given size.
fn layout(widget_w: i32, widget_h: i32) -> (f64, f64, f64) {
    let w = widget_w as f64;
    let h = widget_h as f64;
    let scale = (w / REF_SIZE).min(h / REF_SIZE);
    let offset_x = (w - REF_SIZE * scale) / 2.0;
    let offset_y = (h - REF_SIZE * scale) / 2.0;
    (scale, offset_x, offset_y)
}

fn cell_origin(index: usize) -> (f64, f64) {
    let col = index % BOARD_SIZE;
    let row = index / BOARD_SIZE;
    (
        GRID_OFFSET + col as f64 * CELL_SIZE,
        GRID_OFFSET + row as f64 * CELL_SIZE,
    )
}

fn cell_center(index: usize) -> (f64, f64) {
    let (x, y) = cell_origin(index);
    (x + CELL_SIZE / 2.0, y + CELL_SIZE / 2.0)
}

/// Render the board scaled to fit (widget_w, widget_h).
/// `hover` is the cell under the pointer, highlighted only if it is a legal player move.
pub fn render(
    cr: &Context,
    snapshot: &Snapshot,
    res: &GameResources,
    widget_w: i32,
    widget_h: i32,
    hover: Option<usize>,
) {
    let (scale, offset_x, offset_y) = layout(widget_w, widget_h);
    if scale <= 0.0 {
        return;
    }

    let _ = cr.save();
    cr.translate(offset_x, offset_y);
    cr.scale(scale, scale);

    match res.background() {
        Some(bg) => draw_image_scaled(cr, bg, 0.0, 0.0, REF_SIZE, REF_SIZE, scale),
        None => {
            cr.set_source_rgb(0.29, 0.0, 0.88);
            cr.rectangle(0.0, 0.0, REF_SIZE, REF_SIZE);
            let _ = cr.fill();
        }
    }

    draw_grid(cr);

    if let Some(index) = hover {
        let legal = snapshot.turn == Some(Turn::Player)
            && snapshot.board.get(index) == Some(Cell::Empty);
        if legal {
            let (x, y) = cell_origin(index);
            cr.set_source_rgba(1.0, 1.0, 1.0, 0.15);
            rounded_rect(cr, x + 6.0, y + 6.0, CELL_SIZE - 12.0, CELL_SIZE - 12.0, 14.0);
            let _ = cr.fill();
        }
    }

    for (index, &cell) in snapshot.board.cells().iter().enumerate() {
        if cell.is_empty() {
            continue;
        }
        let (x, y) = cell_origin(index);
        let (mx, my, size) = (x + MARK_INSET, y + MARK_INSET, CELL_SIZE - 2.0 * MARK_INSET);
        match res.mark(cell) {
            Some(img) => draw_image_scaled(cr, img, mx, my, size, size, scale),
            None => draw_mark_fallback(cr, cell, mx, my, size),
        }
    }

    if let Some([a, _, c]) = field::winning_line(&snapshot.board) {
        draw_win_line(cr, a, c, snapshot.outcome == Outcome::BotWin);
    }

    let _ = cr.restore();
}

fn draw_grid(cr: &Context) {
    cr.set_source_rgba(1.0, 1.0, 1.0, 0.7);
    cr.set_line_width(GRID_LINE_WIDTH);
    cr.set_line_cap(cairo::LineCap::Round);
    let end = GRID_OFFSET + BOARD_SIZE as f64 * CELL_SIZE;
    for i in 1..BOARD_SIZE {
        let p = GRID_OFFSET + i as f64 * CELL_SIZE;
        cr.move_to(p, GRID_OFFSET + 8.0);
        cr.line_to(p, end - 8.0);
        cr.move_to(GRID_OFFSET + 8.0, p);
        cr.line_to(end - 8.0, p);
    }
    let _ = cr.stroke();
}

fn draw_mark_fallback(cr: &Context, cell: Cell, x: f64, y: f64, size: f64) {
    cr.set_line_width(size * 0.14);
    cr.set_line_cap(cairo::LineCap::Round);
    let pad = size * 0.15;
    match cell {
        Cell::X => {
            cr.set_source_rgb(1.0, 1.0, 1.0);
            cr.move_to(x + pad, y + pad);
            cr.line_to(x + size - pad, y + size - pad);
            cr.move_to(x + size - pad, y + pad);
            cr.line_to(x + pad, y + size - pad);
        }
        Cell::O => {
            cr.set_source_rgb(1.0, 0.84, 0.31);
            cr.new_sub_path();
            cr.arc(x + size / 2.0, y + size / 2.0, size / 2.0 - pad, 0.0, 2.0 * PI);
        }
        Cell::Empty => return,
    }
    let _ = cr.stroke();
}

fn draw_win_line(cr: &Context, from: usize, to: usize, bot_won: bool) {
    let (x1, y1) = cell_center(from);
    let (x2, y2) = cell_center(to);
    if bot_won {
        cr.set_source_rgba(1.0, 0.25, 0.25, 0.85);
    } else {
        cr.set_source_rgba(0.3, 1.0, 0.45, 0.85);
    }
    cr.set_line_width(10.0);
    cr.set_line_cap(cairo::LineCap::Round);
    cr.move_to(x1, y1);
    cr.line_to(x2, y2);
    let _ = cr.stroke();
}

fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 1.5 * PI);
    cr.close_path();
}

/// Convert widget-space pointer coordinates to a board index.
pub fn mouse_to_cell(x: f64, y: f64, widget_w: i32, widget_h: i32) -> Option<usize> {
    let (scale, offset_x, offset_y) = layout(widget_w, widget_h);
    if scale <= 0.0 {
        return None;
    }
    let rx = (x - offset_x) / scale;
    let ry = (y - offset_y) / scale;

    let col = ((rx - GRID_OFFSET) / CELL_SIZE).floor();
    let row = ((ry - GRID_OFFSET) / CELL_SIZE).floor();
    let max = BOARD_SIZE as f64;
    if (0.0..max).contains(&col) && (0.0..max).contains(&row) {
        Some(row as usize * BOARD_SIZE + col as usize)
    } else {
        None
    }
}

// ── Image drawing helpers ────────────────────────────────────────────────────

/// Draw an image scaled to (target_w × target_h) in reference coordinates.
fn draw_image_scaled(
    cr: &Context,
    img: &GameImage,
    x: f64,
    y: f64,
    target_w: f64,
    target_h: f64,
    scale: f64,
) {
    match img {
        GameImage::Raster(pb) => {
            let pw = pb.width() as f64;
            let ph = pb.height() as f64;
            if pw <= 0.0 || ph <= 0.0 {
                return;
            }
            let _ = cr.save();
            cr.translate(x, y);
            cr.scale(target_w / pw, target_h / ph);
            cr.set_source_pixbuf(pb, 0.0, 0.0);
            let _ = cr.paint();
            let _ = cr.restore();
        }
        GameImage::Svg { tree } => render_svg(cr, tree, x, y, target_w, target_h, scale),
    }
}

/// Rasterise an SVG at device resolution and paint it 1:1, so it stays crisp
/// at any window size. Only the most recent pixel size is kept per image.
fn render_svg(
    cr: &Context,
    tree: &resvg::usvg::Tree,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    scale: f64,
) {
    let size = tree.size();
    if size.width() <= 0.0 || size.height() <= 0.0 || w <= 0.0 || h <= 0.0 {
        return;
    }

    let render_w = (w * scale).round().max(1.0) as u32;
    let render_h = (h * scale).round().max(1.0) as u32;
    let key = tree as *const _ as usize;

    let pixbuf = SVG_CACHE.with(|cache| {
        cache.borrow_mut().get_or_render(key, (render_w, render_h), || {
            let mut pixmap = tiny_skia::Pixmap::new(render_w, render_h)?;
            let transform = tiny_skia::Transform::from_scale(
                render_w as f32 / size.width(),
                render_h as f32 / size.height(),
            );
            resvg::render(tree, transform, &mut pixmap.as_mut());

            Some(Pixbuf::from_mut_slice(
                unpremultiply(pixmap.data()),
                gdk_pixbuf::Colorspace::Rgb,
                true,
                8,
                render_w as i32,
                render_h as i32,
                render_w as i32 * 4,
            ))
        })
    });
    let Some(pixbuf) = pixbuf else { return };

    let _ = cr.save();
    cr.translate(x, y);
    cr.scale(1.0 / scale, 1.0 / scale);
    cr.set_source_pixbuf(&pixbuf, 0.0, 0.0);
    let _ = cr.paint();
    let _ = cr.restore();
}

/// tiny-skia stores premultiplied RGBA; Pixbuf expects straight alpha.
fn unpremultiply(src: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(src.len());
    for px in src.chunks_exact(4) {
        let a = px[3] as u32;
        match a {
            0 => rgba.extend_from_slice(&[0, 0, 0, 0]),
            255 => rgba.extend_from_slice(px),
            _ => {
                for &c in &px[..3] {
                    rgba.push(((c as u32 * 255) / a).min(255) as u8);
                }
                rgba.push(px[3]);
            }
        }
    }
    rgba
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gdk_pixbuf::Pixbuf;

use crate::game::types::Cell;

/// Images the board knows how to draw. All are optional.
const IMAGE_NAMES: [&str; 3] = ["background", "x", "o"];

/// A loaded image, either a raster Pixbuf or an SVG tree.
pub enum GameImage {
    Raster(Pixbuf),
    Svg { tree: resvg::usvg::Tree },
}

/// Board images loaded from the resources directory.
pub struct GameResources {
    images: HashMap<&'static str, GameImage>,
    res_dir: PathBuf,
}

impl GameResources {
    /// Load every known image, preferring `<name>.svg` over `<name>.png`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let mut images = HashMap::new();

        for name in IMAGE_NAMES {
            if let Some(img) = Self::load_one(&dir, name) {
                images.insert(name, img);
            } else {
                tracing::warn!(name, dir = %dir.display(), "image not found, using fallback drawing");
            }
        }

        Self {
            images,
            res_dir: dir,
        }
    }

    fn load_one(dir: &Path, name: &str) -> Option<GameImage> {
        let svg_path = dir.join(format!("{name}.svg"));
        if svg_path.exists() {
            match Self::load_svg(&svg_path) {
                Some(img) => return Some(img),
                None => tracing::warn!(path = %svg_path.display(), "could not parse SVG"),
            }
        }

        let png_path = dir.join(format!("{name}.png"));
        if !png_path.exists() {
            return None;
        }
        match Pixbuf::from_file(&png_path) {
            Ok(pb) => Some(GameImage::Raster(pb)),
            Err(e) => {
                tracing::warn!(path = %png_path.display(), error = %e, "could not load image");
                None
            }
        }
    }

    fn load_svg(path: &Path) -> Option<GameImage> {
        let data = std::fs::read(path).ok()?;
        let opt = resvg::usvg::Options::default();
        let tree = resvg::usvg::Tree::from_data(&data, &opt).ok()?;
        Some(GameImage::Svg { tree })
    }

    pub fn background(&self) -> Option<&GameImage> {
        self.images.get("background")
    }

    /// Image for a placed mark; `None` for empty cells or missing files.
    pub fn mark(&self, cell: Cell) -> Option<&GameImage> {
        match cell {
            Cell::X => self.images.get("x"),
            Cell::O => self.images.get("o"),
            Cell::Empty => None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.res_dir
    }
}

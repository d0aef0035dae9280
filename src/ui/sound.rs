use std::cell::Cell as Flag;
use std::path::Path;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::MediaFile;

use crate::game::logic::Feedback;
use crate::game::types::Cue;

/// Plays a short sound per cue through GTK's media stream.
pub struct SoundCues {
    click: Option<MediaFile>,
    win: Option<MediaFile>,
    lose: Option<MediaFile>,
    enabled: Rc<Flag<bool>>,
}

impl SoundCues {
    /// Look for `click`, `win` and `lose` as `.ogg` or `.wav` in `dir`.
    pub fn load(dir: &Path, enabled: Rc<Flag<bool>>) -> Self {
        Self {
            click: Self::load_one(dir, "click"),
            win: Self::load_one(dir, "win"),
            lose: Self::load_one(dir, "lose"),
            enabled,
        }
    }

    fn load_one(dir: &Path, name: &str) -> Option<MediaFile> {
        let found = ["ogg", "wav"]
            .iter()
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .find(|p| p.is_file());
        match found {
            Some(path) => Some(MediaFile::for_filename(path)),
            None => {
                tracing::warn!(name, dir = %dir.display(), "sound not found, cue is silent");
                None
            }
        }
    }
}

impl Feedback for SoundCues {
    fn cue(&self, cue: Cue) {
        if !self.enabled.get() {
            return;
        }
        let media = match cue {
            Cue::Move => &self.click,
            Cue::PlayerWin => &self.win,
            Cue::BotWin => &self.lose,
        };
        if let Some(media) = media {
            if media.is_seekable() {
                media.seek(0);
            }
            media.play();
        }
    }
}

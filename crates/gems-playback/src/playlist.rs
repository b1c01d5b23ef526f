//! Motion playlist - the motion dropdown and its hotkey cycling
//!
//! Option 0 is always "no motion"; options 1..=n are the motion files found
//! next to the one the user dropped. Listing the directory is the host's
//! job; this module only decides what is shown and selected.

use std::path::{Path, PathBuf};

use tracing::debug;

/// File suffix of motion files
pub const MOTION_SUFFIX: &str = ".motion3.json";

/// Label of the "no motion" option
pub const NONE_OPTION: &str = "--- None ---";

/// Caption shown while no motion has been dropped for the current model
pub const EMPTY_CAPTION: &str = "Load one motion first";

/// Whether a path names a motion file
pub fn is_motion_file(path: &Path) -> bool {
    path.to_str().is_some_and(|s| s.ends_with(MOTION_SUFFIX))
}

/// Display name of a motion file: file name without the motion suffix
pub fn motion_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.strip_suffix(MOTION_SUFFIX) {
        Some(stem) => stem.to_string(),
        None => file_name,
    }
}

/// Motions available for the current model and the selected option
#[derive(Clone, Debug, PartialEq)]
pub struct MotionPlaylist {
    files: Vec<PathBuf>,
    options: Vec<String>,
    selected: usize,
}

impl MotionPlaylist {
    /// Build from a dropped file and the files listed next to it.
    ///
    /// Returns `None` if the dropped file is not a motion. Non-motion
    /// siblings are skipped. The dropped file is selected if it is among
    /// the siblings, otherwise "no motion" is.
    pub fn from_drop<I>(dropped: &Path, siblings: I) -> Option<Self>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        if !is_motion_file(dropped) {
            return None;
        }

        let files: Vec<PathBuf> = siblings.into_iter().filter(|p| is_motion_file(p)).collect();
        let mut options = Vec::with_capacity(files.len() + 1);
        options.push(NONE_OPTION.to_string());
        options.extend(files.iter().map(|p| motion_name(p)));

        let selected = files
            .iter()
            .position(|p| p == dropped)
            .map_or(0, |i| i + 1);

        Some(MotionPlaylist {
            files,
            options,
            selected,
        })
    }

    /// Dropdown labels, "no motion" first
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn motion_count(&self) -> usize {
        self.files.len()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> &str {
        &self.options[self.selected]
    }

    /// Selected motion file, `None` when "no motion" is selected
    pub fn selected_motion(&self) -> Option<&Path> {
        self.selected
            .checked_sub(1)
            .and_then(|i| self.files.get(i))
            .map(PathBuf::as_path)
    }

    /// Select an option; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Next option, wrapping from the last motion to "no motion"
    pub fn next(&mut self) -> usize {
        let last = self.files.len();
        self.selected = if self.selected == last { 0 } else { self.selected + 1 };
        self.selected
    }

    /// Previous option, wrapping from "no motion" to the last motion
    pub fn previous(&mut self) -> usize {
        let last = self.files.len();
        self.selected = if self.selected == 0 { last } else { self.selected - 1 };
        self.selected
    }
}

/// The motion dropdown: disabled until a motion is dropped, cleared on
/// every model load
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionSelector {
    playlist: Option<MotionPlaylist>,
}

impl MotionSelector {
    pub fn new() -> Self {
        MotionSelector::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.playlist.is_some()
    }

    pub fn playlist(&self) -> Option<&MotionPlaylist> {
        self.playlist.as_ref()
    }

    /// Caption text of the dropdown
    pub fn caption(&self) -> &str {
        self.playlist
            .as_ref()
            .map_or(EMPTY_CAPTION, |p| p.selected_label())
    }

    /// Handle a file drop. Returns `true` if the playlist was rebuilt.
    pub fn handle_file_drop<I>(&mut self, dropped: &Path, siblings: I) -> bool
    where
        I: IntoIterator<Item = PathBuf>,
    {
        match MotionPlaylist::from_drop(dropped, siblings) {
            Some(playlist) => {
                debug!(
                    motions = playlist.motion_count(),
                    selected = playlist.selected_index(),
                    "Motion playlist loaded"
                );
                self.playlist = Some(playlist);
                true
            }
            None => false,
        }
    }

    /// A new model invalidates the motions of the previous one
    pub fn on_new_model(&mut self) {
        self.playlist = None;
    }

    pub fn selected_motion(&self) -> Option<&Path> {
        self.playlist.as_ref().and_then(|p| p.selected_motion())
    }

    /// Hotkey: next motion. No-op while disabled.
    pub fn next(&mut self) -> Option<usize> {
        self.playlist.as_mut().map(|p| p.next())
    }

    /// Hotkey: previous motion. No-op while disabled.
    pub fn previous(&mut self) -> Option<usize> {
        self.playlist.as_mut().map(|p| p.previous())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motions() -> Vec<PathBuf> {
        vec![
            PathBuf::from("/m/idle.motion3.json"),
            PathBuf::from("/m/wave.motion3.json"),
            PathBuf::from("/m/readme.txt"),
            PathBuf::from("/m/nod.motion3.json"),
        ]
    }

    #[test]
    fn test_motion_name() {
        assert_eq!(motion_name(Path::new("/m/idle.motion3.json")), "idle");
        assert_eq!(motion_name(Path::new("/m/other.json")), "other.json");
        assert!(is_motion_file(Path::new("a.motion3.json")));
        assert!(!is_motion_file(Path::new("a.model3.json")));
    }

    #[test]
    fn test_playlist_from_drop() {
        let p = MotionPlaylist::from_drop(Path::new("/m/wave.motion3.json"), motions()).unwrap();
        assert_eq!(p.options(), &[NONE_OPTION, "idle", "wave", "nod"]);
        assert_eq!(p.selected_index(), 2);
        assert_eq!(p.selected_motion(), Some(Path::new("/m/wave.motion3.json")));
        assert_eq!(p.motion_count(), 3);
    }

    #[test]
    fn test_playlist_ignores_non_motion_drop() {
        assert!(MotionPlaylist::from_drop(Path::new("/m/model.model3.json"), motions()).is_none());
    }

    #[test]
    fn test_playlist_unlisted_drop_selects_none() {
        let p = MotionPlaylist::from_drop(Path::new("/x/far.motion3.json"), motions()).unwrap();
        assert_eq!(p.selected_index(), 0);
        assert_eq!(p.selected_motion(), None);
    }

    #[test]
    fn test_playlist_wraps() {
        let mut p = MotionPlaylist::from_drop(Path::new("/m/nod.motion3.json"), motions()).unwrap();
        assert_eq!(p.selected_index(), 3);

        assert_eq!(p.next(), 0);
        assert_eq!(p.selected_label(), NONE_OPTION);
        assert_eq!(p.next(), 1);

        assert_eq!(p.previous(), 0);
        assert_eq!(p.previous(), 3);
        assert_eq!(p.selected_label(), "nod");
    }

    #[test]
    fn test_playlist_select() {
        let mut p = MotionPlaylist::from_drop(Path::new("/m/idle.motion3.json"), motions()).unwrap();
        assert!(p.select(0));
        assert_eq!(p.selected_motion(), None);
        assert!(!p.select(4));
        assert_eq!(p.selected_index(), 0);
    }

    #[test]
    fn test_selector_lifecycle() {
        let mut s = MotionSelector::new();
        assert!(!s.is_enabled());
        assert_eq!(s.caption(), EMPTY_CAPTION);
        assert_eq!(s.next(), None);

        assert!(!s.handle_file_drop(Path::new("/m/model.moc3"), motions()));
        assert!(s.handle_file_drop(Path::new("/m/idle.motion3.json"), motions()));
        assert_eq!(s.caption(), "idle");
        assert_eq!(s.next(), Some(2));
        assert_eq!(s.selected_motion(), Some(Path::new("/m/wave.motion3.json")));

        s.on_new_model();
        assert!(!s.is_enabled());
        assert_eq!(s.caption(), EMPTY_CAPTION);
        assert_eq!(s.selected_motion(), None);
    }
}

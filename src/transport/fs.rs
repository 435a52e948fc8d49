use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::SamplerError;
use crate::source::DirectoryLister;
use crate::types::{ItemId, StratumKey};

/// Frame file extensions recognized by the default filter.
const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

#[derive(Clone, Debug)]
enum Layout {
    /// Each immediate subdirectory of the root is one stratum.
    Nested,
    /// The root itself is a single stratum with the given key.
    Flat(StratumKey),
}

/// Filesystem corpus rooted at a directory.
///
/// Dashcam recordings land on disk in two shapes: one folder of frames per
/// recorded video (`nested`, the 1080p layout), or a single flat folder of
/// frames (`flat`, the downscaled 720p layout). Listing is a snapshot of the
/// directory tree at index-build time.
pub struct FsCorpus {
    root: PathBuf,
    layout: Layout,
    follow_links: bool,
    frame_files_only: bool,
}

impl FsCorpus {
    /// Corpus whose immediate subdirectories are strata.
    pub fn nested(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: Layout::Nested,
            follow_links: false,
            frame_files_only: true,
        }
    }

    /// Corpus whose root is one flat stratum named `key`.
    pub fn flat(root: impl Into<PathBuf>, key: impl Into<StratumKey>) -> Self {
        Self {
            root: root.into(),
            layout: Layout::Flat(key.into()),
            follow_links: false,
            frame_files_only: true,
        }
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Filter listings to recognized frame extensions.
    pub fn with_frame_files_only(mut self, frame_files_only: bool) -> Self {
        self.frame_files_only = frame_files_only;
        self
    }

    /// Absolute path of one candidate item, used by the copy sink.
    pub fn item_path(&self, stratum: &str, item: &str) -> PathBuf {
        match &self.layout {
            Layout::Flat(_) => self.root.join(item),
            Layout::Nested => self.root.join(stratum).join(item),
        }
    }

    /// True when this corpus owns `stratum`.
    pub fn owns_stratum(&self, stratum: &str) -> bool {
        match &self.layout {
            Layout::Flat(key) => key == stratum,
            Layout::Nested => self.root.join(stratum).is_dir(),
        }
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<ItemId>, SamplerError> {
        let mut items = Vec::new();
        let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
        if self.follow_links {
            walker = walker.follow_links(true);
        }
        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if self.frame_files_only && !is_frame_file(path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                items.push(name.to_string());
            }
        }
        items.sort();
        Ok(items)
    }
}

impl DirectoryLister for FsCorpus {
    fn list_strata(&self) -> Result<Vec<StratumKey>, SamplerError> {
        match &self.layout {
            Layout::Flat(key) => Ok(vec![key.clone()]),
            Layout::Nested => {
                let mut keys = Vec::new();
                for entry in fs::read_dir(&self.root)? {
                    let entry = entry?;
                    if entry.file_type()?.is_dir()
                        && let Some(name) = entry.file_name().to_str()
                    {
                        keys.push(name.to_string());
                    }
                }
                keys.sort();
                Ok(keys)
            }
        }
    }

    fn list_items(&self, stratum: &str) -> Result<Vec<ItemId>, SamplerError> {
        match &self.layout {
            Layout::Flat(key) if key == stratum => self.list_files(&self.root),
            Layout::Flat(_) => Ok(Vec::new()),
            Layout::Nested => self.list_files(&self.root.join(stratum)),
        }
    }
}

/// True if the path carries a recognized frame extension (case-insensitive).
pub fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn nested_corpus_lists_subdirectories_as_strata() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        for (dir, files) in [("drive_a", 3usize), ("drive_b", 2usize)] {
            let path = root.join(dir);
            fs::create_dir_all(&path).unwrap();
            for idx in 0..files {
                fs::write(path.join(format!("frame_{idx:03}.jpg")), "stub").unwrap();
            }
        }
        fs::write(root.join("stray.txt"), "not a stratum").unwrap();

        let corpus = FsCorpus::nested(root);
        let strata = corpus.list_strata().unwrap();
        assert_eq!(strata, vec!["drive_a", "drive_b"]);
        assert_eq!(corpus.list_items("drive_a").unwrap().len(), 3);
        assert_eq!(
            corpus.item_path("drive_b", "frame_000.jpg"),
            root.join("drive_b").join("frame_000.jpg")
        );
        assert!(corpus.owns_stratum("drive_a"));
        assert!(!corpus.owns_stratum("drive_z"));
    }

    #[test]
    fn flat_corpus_is_one_stratum() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.jpg"), "stub").unwrap();
        fs::write(root.join("b.png"), "stub").unwrap();

        let corpus = FsCorpus::flat(root, "720");
        assert_eq!(corpus.list_strata().unwrap(), vec!["720"]);
        assert_eq!(
            corpus.list_items("720").unwrap(),
            vec!["a.jpg".to_string(), "b.png".to_string()]
        );
        assert!(corpus.list_items("other").unwrap().is_empty());
        assert_eq!(corpus.item_path("720", "a.jpg"), root.join("a.jpg"));
        assert!(corpus.owns_stratum("720"));
    }

    #[test]
    fn frame_filter_drops_non_frame_files() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("frame.JPG"), "stub").unwrap();
        fs::write(root.join("notes.txt"), "stub").unwrap();

        let filtered = FsCorpus::flat(root, "720");
        assert_eq!(
            filtered.list_items("720").unwrap(),
            vec!["frame.JPG".to_string()]
        );

        let unfiltered = FsCorpus::flat(root, "720").with_frame_files_only(false);
        assert_eq!(unfiltered.list_items("720").unwrap().len(), 2);
    }

    #[test]
    #[cfg(unix)]
    fn symlinked_frames_require_the_follow_toggle() {
        let outside = tempdir().unwrap();
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("real.jpg"), "stub").unwrap();
        fs::write(outside.path().join("target.jpg"), "stub").unwrap();
        std::os::unix::fs::symlink(outside.path().join("target.jpg"), root.join("linked.jpg"))
            .unwrap();

        let corpus = FsCorpus::flat(root, "720");
        assert_eq!(
            corpus.list_items("720").unwrap(),
            vec!["real.jpg".to_string()]
        );

        let following = FsCorpus::flat(root, "720").with_follow_symlinks(true);
        assert_eq!(
            following.list_items("720").unwrap(),
            vec!["linked.jpg".to_string(), "real.jpg".to_string()]
        );
    }

    #[test]
    fn nested_listing_ignores_files_in_subdirectory_subtrees() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let deep = root.join("drive_a").join("nested_deeper");
        fs::create_dir_all(&deep).unwrap();
        fs::write(root.join("drive_a").join("frame.jpg"), "stub").unwrap();
        fs::write(deep.join("hidden.jpg"), "stub").unwrap();

        let corpus = FsCorpus::nested(root);
        assert_eq!(
            corpus.list_items("drive_a").unwrap(),
            vec!["frame.jpg".to_string()]
        );
    }
}

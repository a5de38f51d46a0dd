//! Dataset capture sink
//!
//! Persists the most recently received frame as a sequentially numbered
//! JPEG (`1.jpg`, `2.jpg`, ...) for later AI training use. The counter is
//! process-wide, monotonically increasing, and never persisted: it restarts
//! at 1 every run, so a new run overwrites the captures of the previous one
//! in place. That matches the robot's established dataset workflow; the
//! sink warns at startup when prior captures are present instead of
//! silently clobbering them.

use crate::error::{Error, Result};
use crate::protocol::FrameMessage;
use std::path::{Path, PathBuf};

/// Writes numbered JPEG captures into a fixed output directory
pub struct CaptureSink {
    dir: PathBuf,
    counter: u32,
}

impl CaptureSink {
    /// Create the sink, making the output directory if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        if dir.join("1.jpg").exists() {
            log::warn!(
                "Capture directory {} holds captures from a previous run; this run will overwrite them",
                dir.display()
            );
        }
        Ok(Self { dir, counter: 1 })
    }

    /// Index the next successful capture will use
    pub fn next_index(&self) -> u32 {
        self.counter
    }

    /// Persist one frame as `<counter>.jpg`.
    ///
    /// The counter advances only on success, so a failed write leaves no
    /// gap in the numbering.
    pub fn save(&mut self, frame: &FrameMessage) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.jpg", self.counter));
        frame
            .to_rgb_image()
            .save(&path)
            .map_err(|e| Error::Capture(format!("{}: {}", path.display(), e)))?;
        self.counter += 1;
        log::info!("{} saved", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_frame() -> FrameMessage {
        FrameMessage {
            source: "picar".to_string(),
            width: 4,
            height: 4,
            pixels: vec![128u8; 4 * 4 * 3],
        }
    }

    #[test]
    fn test_sequential_filenames_without_gaps() {
        let dir = tempdir().unwrap();
        let mut sink = CaptureSink::new(dir.path()).unwrap();
        assert_eq!(sink.next_index(), 1);

        let frame = test_frame();
        for expected in 1..=3u32 {
            let path = sink.save(&frame).unwrap();
            assert_eq!(path, dir.path().join(format!("{}.jpg", expected)));
            assert!(path.exists());
        }
        assert_eq!(sink.next_index(), 4);
    }

    #[test]
    fn test_written_files_are_nonempty_jpegs() {
        let dir = tempdir().unwrap();
        let mut sink = CaptureSink::new(dir.path()).unwrap();
        let path = sink.save(&test_frame()).unwrap();

        let bytes = std::fs::read(path).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_failed_write_does_not_advance_counter() {
        let dir = tempdir().unwrap();
        let mut sink = CaptureSink::new(dir.path()).unwrap();

        // A directory squatting on the target path makes the write fail
        std::fs::create_dir(dir.path().join("1.jpg")).unwrap();
        let err = sink.save(&test_frame()).unwrap_err();
        assert!(matches!(err, crate::error::Error::Capture(_)));
        assert_eq!(sink.next_index(), 1);
    }

    #[test]
    fn test_creates_missing_output_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("dataset").join("run");
        let sink = CaptureSink::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(sink.next_index(), 1);
    }
}

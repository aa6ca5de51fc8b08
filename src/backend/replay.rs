// Capture provider that replays recorded frames from disk or memory
use super::types::CaptureProvider;
use crate::error::CaptureError;
use crate::game_automation::match_image::DetectionRegion;
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Serves one recorded frame per `capture` call, cropped to the requested region.
pub struct ReplayCapture {
    frames: Vec<Arc<RgbImage>>,
    index: usize,
    /// Wrap around at the end instead of repeating the last frame
    looping: bool,
    source: String,
}

impl ReplayCapture {
    /// Build from in-memory frames; all frames should share one size.
    pub fn from_frames(frames: Vec<RgbImage>) -> Result<Self, CaptureError> {
        if frames.is_empty() {
            return Err(CaptureError::NoFrames {
                path: PathBuf::from("<memory>"),
            });
        }
        Ok(Self {
            frames: frames.into_iter().map(Arc::new).collect(),
            index: 0,
            looping: true,
            source: "memory".to_string(),
        })
    }

    /// Load every PNG/JPEG in `dir`, in file name order
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| CaptureError::Unavailable {
            reason: format!("cannot read frame directory {}: {}", dir.display(), e),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(CaptureError::NoFrames {
                path: dir.to_path_buf(),
            });
        }

        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            let frame = image::open(&path)
                .map_err(|source| CaptureError::Decode {
                    path: path.clone(),
                    source,
                })?
                .to_rgb8();
            frames.push(Arc::new(frame));
        }
        log::info!("Loaded {} replay frames from {}", frames.len(), dir.display());

        Ok(Self {
            frames,
            index: 0,
            looping: true,
            source: dir.display().to_string(),
        })
    }

    /// Stay on the last frame once the recording is exhausted
    pub fn hold_last(mut self) -> Self {
        self.looping = false;
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the frame the next capture will use
    pub fn position(&self) -> usize {
        self.index
    }

    fn next_frame(&mut self) -> Arc<RgbImage> {
        let frame = Arc::clone(&self.frames[self.index]);
        if self.index + 1 < self.frames.len() {
            self.index += 1;
        } else if self.looping {
            self.index = 0;
        }
        frame
    }
}

impl CaptureProvider for ReplayCapture {
    async fn capture(&mut self, region: &DetectionRegion) -> Result<RgbImage, CaptureError> {
        let frame = self.next_frame();
        region.crop(&frame)
    }

    fn screen_size(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }

    fn name(&self) -> &str {
        &self.source
    }
}

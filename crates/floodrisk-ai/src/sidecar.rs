//! Detector backed by precomputed detection files.
//!
//! For an image named `shore.jpg` the detector reads
//! `<dir>/shore.jpg.detections.json`, falling back to `<dir>/shore.json`.
//! Each file holds a JSON array of `{label, confidence}` (or COCO-style
//! `{class, score}`) objects, as written by an offline detection run.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use floodrisk_core::{Detection, ImageInput};
use tracing::debug;

use crate::{DetectError, Detector};

#[derive(Debug, Clone)]
pub struct SidecarDetector {
    dir: PathBuf,
}

impl SidecarDetector {
    /// Open a directory of detection files.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(dir.is_dir(), "detections directory not found: {dir:?}");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let mut paths = vec![self.dir.join(format!("{name}.detections.json"))];
        if let Some(stem) = Path::new(name).file_stem().and_then(|s| s.to_str()) {
            paths.push(self.dir.join(format!("{stem}.json")));
        }
        paths
    }
}

#[async_trait]
impl Detector for SidecarDetector {
    async fn detect(&self, image: &ImageInput) -> Result<Vec<Detection>, DetectError> {
        let name = image
            .name()
            .ok_or_else(|| DetectError::Failed("image has no file name".into()))?;

        for path in self.candidates(name) {
            let raw = match tokio::fs::read_to_string(&path).await {
                Ok(raw) => raw,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(DetectError::Failed(format!("{}: {e}", path.display()))),
            };
            let detections: Vec<Detection> = serde_json::from_str(&raw)
                .map_err(|e| DetectError::Failed(format!("{}: {e}", path.display())))?;
            debug!(path = %path.display(), count = detections.len(), "read sidecar detections");
            return Ok(detections);
        }

        Err(DetectError::Failed(format!("no detections recorded for {name}")))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use floodrisk_core::ImageInput;

    use super::*;

    fn image(name: &str) -> ImageInput {
        ImageInput::from_path(Path::new(name), vec![0xff, 0xd8]).unwrap()
    }

    #[test]
    fn load_requires_directory() {
        assert!(SidecarDetector::load(Path::new("/definitely/not/here")).is_err());
    }

    #[tokio::test]
    async fn reads_full_name_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("shore.jpg.detections.json"),
            r#"[{"label": "sea", "confidence": 0.91}, {"class": "house", "score": 0.6}]"#,
        )
        .unwrap();

        let detector = SidecarDetector::load(dir.path()).unwrap();
        let found = detector.detect(&image("shore.jpg")).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].label, "house");
    }

    #[tokio::test]
    async fn falls_back_to_stem_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("field.json"), r#"[{"label": "tree"}]"#).unwrap();

        let detector = SidecarDetector::load(dir.path()).unwrap();
        let found = detector.detect(&image("field.png")).await.unwrap();
        assert_eq!(found, vec![Detection::new("tree", 0.0)]);
    }

    #[tokio::test]
    async fn missing_or_corrupt_sidecar_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "not json").unwrap();
        let detector = SidecarDetector::load(dir.path()).unwrap();

        assert!(matches!(
            detector.detect(&image("absent.jpg")).await,
            Err(DetectError::Failed(_))
        ));
        assert!(matches!(
            detector.detect(&image("bad.jpg")).await,
            Err(DetectError::Failed(_))
        ));
    }
}

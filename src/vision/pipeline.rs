use super::detector::{FaceDetector, FaceRegion};
use crate::error::PipelineError;
use crate::fetch::FileFetch;
use crate::storage::{MediaKind, StorageLocator};
use crate::transport::RemoteFiles;
use crate::update::PhotoSize;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const ANNOTATION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const ANNOTATION_THICKNESS: i32 = 4;

/// Result of a photo pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoOutcome {
    /// At least one face region was found; the downloaded JPEG stays on disk.
    Saved { faces: usize, path: PathBuf },
    /// No face regions; the download was removed.
    NoFaces,
}

/// Filters incoming photos by face presence.
pub struct FacePipeline {
    locator: StorageLocator,
    files: Arc<dyn RemoteFiles>,
    fetcher: Arc<dyn FileFetch>,
    detector: Arc<dyn FaceDetector>,
}

impl FacePipeline {
    pub fn new(
        locator: StorageLocator,
        files: Arc<dyn RemoteFiles>,
        fetcher: Arc<dyn FileFetch>,
        detector: Arc<dyn FaceDetector>,
    ) -> Self {
        Self {
            locator,
            files,
            fetcher,
            detector,
        }
    }

    /// Process one photo end-to-end.
    ///
    /// Fetches the bytes, persists them as `<fileId>.jpg`, and keeps the file
    /// only when the detector reports at least one face region. The artifact
    /// on disk is always the untouched download; the annotated copy stays in
    /// memory.
    pub async fn process(
        &self,
        user_id: i64,
        photo: &PhotoSize,
    ) -> Result<PhotoOutcome, PipelineError> {
        let remote_path = self.files.file_path(&photo.file_id).await?;
        let bytes = self.fetcher.fetch(&remote_path).await?;

        let dir = self.locator.resolve(user_id, MediaKind::Photo)?;
        let photo_path = dir.join(format!("{}.jpg", photo.file_id));
        fs::write(&photo_path, &bytes)?;

        // From here on the download is on disk; any failure must not let
        // the transient file outlive the invocation.
        let decoded = match image::load_from_memory(&bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                remove_transient(&photo_path);
                return Err(e.into());
            }
        };
        let gray = decoded.to_luma8();

        let regions = match self.detector.detect(&gray) {
            Ok(regions) => regions,
            Err(e) => {
                remove_transient(&photo_path);
                return Err(e);
            }
        };

        if regions.is_empty() {
            fs::remove_file(&photo_path)?;
            info!("No faces for user {}; removed {:?}", user_id, photo_path);
            return Ok(PhotoOutcome::NoFaces);
        }

        let mut annotated = decoded.to_rgb8();
        annotate_regions(&mut annotated, &regions);
        // Annotation is not written back; the stored file keeps the
        // original bytes.

        info!(
            "Kept photo for user {}: {:?} ({} face region(s))",
            user_id,
            photo_path,
            regions.len()
        );

        Ok(PhotoOutcome::Saved {
            faces: regions.len(),
            path: photo_path,
        })
    }
}

fn remove_transient(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Failed to remove transient photo {:?}: {}", path, e);
    }
}

/// Draw a 4-pixel-wide hollow rectangle for every region, in detector
/// enumeration order.
pub fn annotate_regions(image: &mut RgbImage, regions: &[FaceRegion]) {
    for region in regions {
        for i in 0..ANNOTATION_THICKNESS {
            let rect = Rect::at(region.x - i, region.y - i)
                .of_size(region.width + 2 * i as u32, region.height + 2 * i as u32);
            draw_hollow_rect_mut(image, rect, ANNOTATION_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_draws_green_outline() {
        let mut image = RgbImage::new(100, 100);
        let region = FaceRegion {
            x: 20,
            y: 20,
            width: 40,
            height: 40,
        };

        annotate_regions(&mut image, &[region]);

        // Corner of the innermost ring is green.
        assert_eq!(*image.get_pixel(20, 20), ANNOTATION_COLOR);
        // Outermost ring (3px outward) is green too.
        assert_eq!(*image.get_pixel(17, 17), ANNOTATION_COLOR);
        // Interior stays untouched.
        assert_eq!(*image.get_pixel(40, 40), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_annotate_clips_at_image_border() {
        let mut image = RgbImage::new(50, 50);
        let region = FaceRegion {
            x: 0,
            y: 0,
            width: 20,
            height: 20,
        };

        // Rings extend past the top-left corner; drawing must clip, not
        // panic.
        annotate_regions(&mut image, &[region]);
        assert_eq!(*image.get_pixel(0, 0), ANNOTATION_COLOR);
    }

    #[test]
    fn test_annotate_multiple_regions() {
        let mut image = RgbImage::new(100, 100);
        let regions = [
            FaceRegion {
                x: 10,
                y: 10,
                width: 20,
                height: 20,
            },
            FaceRegion {
                x: 60,
                y: 60,
                width: 20,
                height: 20,
            },
        ];

        annotate_regions(&mut image, &regions);

        assert_eq!(*image.get_pixel(10, 10), ANNOTATION_COLOR);
        assert_eq!(*image.get_pixel(60, 60), ANNOTATION_COLOR);
    }
}

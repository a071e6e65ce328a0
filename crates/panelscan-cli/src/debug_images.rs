//! Debug image dumps for classification runs.
//!
//! Implements the core observer seam by writing annotated PNGs next to the
//! extraction: per-page band overlays, the symbol-column crop of each row
//! and the raw detections drawn onto that crop. Write failures are logged
//! and never interrupt the run.

use std::path::PathBuf;

use image::{GrayImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use panelscan_core::{Detection, PageObserver, RowBand};

const BAND_COLOR: Rgba<u8> = Rgba([66, 135, 245, 255]);
const DETECTION_COLOR: Rgba<u8> = Rgba([244, 67, 54, 255]);

pub struct DebugImageWriter {
    dir: PathBuf,
}

impl DebugImageWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn save(&self, name: String, image: &RgbaImage) {
        let path = self.dir.join(name);
        if let Err(e) = image.save(&path) {
            log::warn!("failed to write debug image {}: {e}", path.display());
        }
    }
}

impl PageObserver for DebugImageWriter {
    fn on_row_bands(&self, page_number: usize, page: &GrayImage, bands: &[RowBand]) {
        let mut overlay = to_rgba(page);
        let right = overlay.width().saturating_sub(1) as f32;
        for band in bands {
            for y in [band.y_top, band.y_bottom] {
                draw_line_segment_mut(&mut overlay, (0.0, y as f32), (right, y as f32), BAND_COLOR);
            }
        }
        self.save(format!("page{page_number:03}_bands.png"), &overlay);
    }

    fn on_symbol_region(&self, page_number: usize, row_index: usize, region: &GrayImage) {
        self.save(
            format!("page{page_number:03}_row{row_index:02}_symbols.png"),
            &to_rgba(region),
        );
    }

    fn on_detections(
        &self,
        page_number: usize,
        row_index: usize,
        region: &GrayImage,
        detections: &[Detection],
    ) {
        if detections.is_empty() {
            return;
        }
        let mut overlay = to_rgba(region);
        for detection in detections {
            let rect = Rect::at(detection.x as i32, detection.y as i32)
                .of_size(detection.width.max(1), detection.height.max(1));
            draw_hollow_rect_mut(&mut overlay, rect, DETECTION_COLOR);
        }
        self.save(
            format!("page{page_number:03}_row{row_index:02}_detections.png"),
            &overlay,
        );
    }
}

fn to_rgba(gray: &GrayImage) -> RgbaImage {
    image::DynamicImage::ImageLuma8(gray.clone()).to_rgba8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use tempfile::TempDir;

    fn gray(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255u8]))
    }

    #[test]
    fn test_band_overlay_is_written() {
        let dir = TempDir::new().unwrap();
        let writer = DebugImageWriter::new(dir.path().to_path_buf());
        let bands = [RowBand {
            index: 1,
            y_top: 10,
            y_bottom: 40,
        }];

        writer.on_row_bands(1, &gray(100, 60), &bands);

        assert!(dir.path().join("page001_bands.png").exists());
    }

    #[test]
    fn test_region_and_detection_images_are_written() {
        let dir = TempDir::new().unwrap();
        let writer = DebugImageWriter::new(dir.path().to_path_buf());
        let region = gray(80, 40);
        let detections = [Detection {
            name: "ring".to_string(),
            score: 0.9,
            x: 5,
            y: 5,
            width: 20,
            height: 20,
        }];

        writer.on_symbol_region(2, 3, &region);
        writer.on_detections(2, 3, &region, &detections);

        assert!(dir.path().join("page002_row03_symbols.png").exists());
        assert!(dir.path().join("page002_row03_detections.png").exists());
    }

    #[test]
    fn test_no_detection_image_for_empty_detections() {
        let dir = TempDir::new().unwrap();
        let writer = DebugImageWriter::new(dir.path().to_path_buf());

        writer.on_detections(1, 1, &gray(80, 40), &[]);

        assert!(!dir.path().join("page001_row01_detections.png").exists());
    }

    #[test]
    fn test_unwritable_directory_is_tolerated() {
        let writer = DebugImageWriter::new(PathBuf::from("/definitely/missing/dir"));
        writer.on_symbol_region(1, 1, &gray(10, 10));
    }
}

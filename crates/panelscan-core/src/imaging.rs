//! Shared image preprocessing: Otsu binarization, speckle removal, crops.
//!
//! Every component binarizes through these helpers so templates and page
//! regions get identical treatment. Ink is foreground (255) in inverted
//! masks; OCR crops stay non-inverted (dark text on light background).

use image::{GrayImage, Luma};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::region_labelling::{connected_components, Connectivity};

/// Binarize with an automatic Otsu threshold, ink as foreground (255).
#[must_use]
pub fn binarize_inverted(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    threshold(gray, level, ThresholdType::BinaryInverted)
}

/// Binarize with an automatic Otsu threshold, keeping dark ink dark.
/// This is the preparation used for OCR crops.
#[must_use]
pub fn binarize(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    threshold(gray, level, ThresholdType::Binary)
}

/// Number of foreground (non-zero) pixels in a mask.
#[must_use]
pub fn ink_area(mask: &GrayImage) -> u32 {
    mask.pixels().filter(|p| p[0] > 0).count() as u32
}

/// Remove connected foreground components smaller than `min_area` pixels.
///
/// Eight-connectivity, matching the scanner speckle this cleans up (isolated
/// dots and short diagonal fragments around symbol strokes).
#[must_use]
pub fn remove_small_components(mask: &GrayImage, min_area: u32) -> GrayImage {
    if mask.width() == 0 || mask.height() == 0 {
        return mask.clone();
    }

    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut areas: Vec<u32> = Vec::new();
    for pixel in labels.pixels() {
        let label = pixel[0] as usize;
        if label == 0 {
            continue;
        }
        if label >= areas.len() {
            areas.resize(label + 1, 0);
        }
        areas[label] += 1;
    }

    let mut cleaned = mask.clone();
    for (x, y, pixel) in labels.enumerate_pixels() {
        let label = pixel[0] as usize;
        if label != 0 && areas[label] < min_area {
            cleaned.put_pixel(x, y, Luma([0u8]));
        }
    }
    cleaned
}

/// Crop a mask tightly to the bounding box of its foreground pixels.
///
/// A mask with no foreground yields a 1x1 all-background image, which
/// matches nothing downstream.
#[must_use]
pub fn crop_to_ink(mask: &GrayImage) -> GrayImage {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut any = false;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] > 0 {
            any = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if !any {
        return GrayImage::new(1, 1);
    }

    image::imageops::crop_imm(mask, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1).to_image()
}

/// Crop the window `[x1, x2) x [y1, y2)`, clamped to the image bounds.
///
/// Returns `None` when the clamped window is empty, so degenerate geometry
/// turns into "no region" instead of a panic.
#[must_use]
pub fn crop_region(image: &GrayImage, x1: u32, y1: u32, x2: u32, y2: u32) -> Option<GrayImage> {
    let x2 = x2.min(image.width());
    let y2 = y2.min(image.height());
    if x1 >= x2 || y1 >= y2 {
        return None;
    }
    Some(image::imageops::crop_imm(image, x1, y1, x2 - x1, y2 - y1).to_image())
}

//! 2D template matching over a row's symbol column.
//!
//! Every template is slid over the binarized region with normalized
//! cross-correlation; peaks are harvested greedily with rectangular
//! suppression so one symbol can appear several times in a row without
//! duplicate hits for the same instance.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::template_matching::{match_template, MatchTemplateMethod};

use crate::imaging;
use crate::template::{SymbolTemplate, TemplateLibrary};

type ResponseSurface = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Matching thresholds and suppression geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    /// Minimum correlation score for a detection.
    pub match_threshold: f32,
    /// Extra pixels suppressed around an accepted peak's footprint.
    pub suppression_margin: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.5,
            suppression_margin: 3,
        }
    }
}

impl MatcherConfig {
    #[must_use]
    pub const fn with_match_threshold(mut self, threshold: f32) -> Self {
        self.match_threshold = threshold;
        self
    }

    #[must_use]
    pub const fn with_suppression_margin(mut self, margin: u32) -> Self {
        self.suppression_margin = margin;
        self
    }
}

/// One matched template instance inside a row region.
///
/// `x`/`y` are the top-left corner of the match in region coordinates;
/// scores are normalized correlation in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub name: String,
    pub score: f32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Detection {
    /// Horizontal center, the left-to-right ordering key.
    #[must_use]
    pub fn x_center(&self) -> f32 {
        self.x as f32 + self.width as f32 / 2.0
    }
}

/// Matches a template library against row regions.
#[derive(Debug, Clone, Default)]
pub struct SymbolMatcher {
    config: MatcherConfig,
}

impl SymbolMatcher {
    #[must_use]
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Match every fitting template against a raw (unbinarized) region crop.
    ///
    /// Detections from all templates are merged and sorted by ascending
    /// `x_center`. Ties at equal score within one template resolve toward
    /// the earlier peak found; cross-template tie order follows library
    /// order.
    #[must_use]
    pub fn match_region(&self, region: &GrayImage, library: &TemplateLibrary) -> Vec<Detection> {
        if region.width() == 0 || region.height() == 0 || library.is_empty() {
            return Vec::new();
        }

        let ink = imaging::binarize_inverted(region);
        let mut detections = Vec::new();
        for template in library.iter() {
            self.match_one(&ink, template, &mut detections);
        }
        detections.sort_by(|a, b| a.x_center().total_cmp(&b.x_center()));
        detections
    }

    fn match_one(&self, ink: &GrayImage, template: &SymbolTemplate, out: &mut Vec<Detection>) {
        if template.is_blank() {
            return;
        }
        let (tw, th) = template.dimensions();
        if tw > ink.width() || th > ink.height() {
            return;
        }

        let mut response = match_template(
            ink,
            template.mask(),
            MatchTemplateMethod::CrossCorrelationNormalized,
        );

        // Greedy peak harvest: accept the global maximum, black out its
        // footprint plus margin, repeat until the surface drops below the
        // threshold.
        while let Some((x, y, score)) = peak(&response) {
            if score < self.config.match_threshold {
                break;
            }
            out.push(Detection {
                name: template.name().to_string(),
                score,
                x,
                y,
                width: tw,
                height: th,
            });
            suppress(&mut response, x, y, tw, th, self.config.suppression_margin);
        }
    }
}

/// Global maximum of the response surface, skipping non-finite cells
/// (all-background windows divide by zero under normalized correlation).
fn peak(response: &ResponseSurface) -> Option<(u32, u32, f32)> {
    let mut best = f32::NEG_INFINITY;
    let mut at = (0u32, 0u32);
    let mut found = false;
    for (x, y, pixel) in response.enumerate_pixels() {
        let value = pixel[0];
        if value.is_finite() && value > best {
            best = value;
            at = (x, y);
            found = true;
        }
    }
    found.then_some((at.0, at.1, best))
}

/// Black out `[x - margin, x + width + margin)` by
/// `[y - margin, y + height + margin)` on the response surface.
fn suppress(response: &mut ResponseSurface, x: u32, y: u32, width: u32, height: u32, margin: u32) {
    let x0 = x.saturating_sub(margin);
    let y0 = y.saturating_sub(margin);
    let x1 = (x + width + margin).min(response.width());
    let y1 = (y + height + margin).min(response.height());
    for yy in y0..y1 {
        for xx in x0..x1 {
            response.put_pixel(xx, yy, Luma([f32::NEG_INFINITY]));
        }
    }
}

//! Symbol template loading and preprocessing.
//!
//! A template directory maps file base names to symbol identities. Each
//! image is reduced to a cleaned, tightly cropped binary ink mask at native
//! scale; the library is loaded once and shared read-only for the process
//! lifetime.

use std::path::Path;

use image::{DynamicImage, GrayImage};

use crate::imaging;

/// Connected components smaller than this are scanner speckle, removed
/// before cropping.
pub const MIN_COMPONENT_AREA: u32 = 30;

const TEMPLATE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// One named symbol mask, ink as foreground, tightly cropped, native scale.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTemplate {
    name: String,
    mask: GrayImage,
}

impl SymbolTemplate {
    /// Preprocess a reference image into a matchable mask.
    ///
    /// Grayscale, Otsu inverse binarization, speckle removal, tight crop.
    /// An image that is empty after cleaning becomes a 1x1 blank mask that
    /// matches nothing.
    #[must_use]
    pub fn from_image(name: impl Into<String>, image: &DynamicImage) -> Self {
        let gray = image.to_luma8();
        let mask = if gray.width() == 0 || gray.height() == 0 {
            GrayImage::new(1, 1)
        } else {
            let ink = imaging::binarize_inverted(&gray);
            let cleaned = imaging::remove_small_components(&ink, MIN_COMPONENT_AREA);
            imaging::crop_to_ink(&cleaned)
        };
        Self {
            name: name.into(),
            mask,
        }
    }

    /// Build a template from an already prepared mask. Test seam; production
    /// templates go through [`SymbolTemplate::from_image`].
    #[must_use]
    pub fn from_mask(name: impl Into<String>, mask: GrayImage) -> Self {
        Self {
            name: name.into(),
            mask,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    /// Mask dimensions `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    /// True when the cleaned mask has no ink left. Blank templates are kept
    /// in the library for reporting but never match.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        imaging::ink_area(&self.mask) == 0
    }
}

/// The process-lifetime set of symbol templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: Vec<SymbolTemplate>,
}

impl TemplateLibrary {
    /// Load every readable template image from a directory, in file-name
    /// order.
    ///
    /// A missing directory or one without usable images yields an empty
    /// library, not an error; every row then simply reports no symbols.
    /// Unreadable entries are skipped with a warning.
    #[must_use]
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "template directory {} unavailable ({e}); symbol matching disabled",
                    dir.display()
                );
                return Self::default();
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| {
                        TEMPLATE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                    })
            })
            .collect();
        paths.sort();

        let mut templates = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                log::warn!("skipping template with unusable name: {}", path.display());
                continue;
            };
            match image::open(&path) {
                Ok(img) => {
                    let template = SymbolTemplate::from_image(name, &img);
                    if template.is_blank() {
                        log::warn!("template {name} is blank after cleaning");
                    }
                    templates.push(template);
                }
                Err(e) => {
                    log::warn!("skipping unreadable template {}: {e}", path.display());
                }
            }
        }

        if templates.is_empty() {
            log::warn!(
                "no usable templates in {}; all rows will report no symbols",
                dir.display()
            );
        } else {
            log::debug!("loaded {} templates from {}", templates.len(), dir.display());
        }

        Self { templates }
    }

    /// Build a library from preconstructed templates.
    #[must_use]
    pub fn from_templates(templates: Vec<SymbolTemplate>) -> Self {
        Self { templates }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolTemplate> {
        self.templates.iter()
    }

    /// Template names in load order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(SymbolTemplate::name).collect()
    }
}

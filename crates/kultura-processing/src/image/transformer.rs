//! Transform engine - procedure-keyed recipes over decoded images
//!
//! Each procedure maps to a `Recipe`: a tone adjustment followed by a spatial
//! filter, both scaled by the enhancement factor. New procedures are added with
//! `TransformEngine::register` without touching callers.

use std::collections::HashMap;

use image::DynamicImage;
use kultura_core::constants::DEFAULT_JPEG_QUALITY;
use kultura_core::ProcedurePolicy;

use super::codec::{decode_image_with_limits, encode_jpeg, DecodeLimits};
use super::filters::{SpatialFilter, ToneAdjustment};
use super::procedure::{EnhancementLevel, ProcedureType};
use crate::error::ProcessingError;

/// Tone first, then the spatial filter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Recipe {
    pub tone: ToneAdjustment,
    pub spatial: SpatialFilter,
}

impl Recipe {
    pub fn new(tone: ToneAdjustment, spatial: SpatialFilter) -> Self {
        Self { tone, spatial }
    }

    /// Fallback for procedures without a recipe of their own
    pub fn sharpen_only() -> Self {
        Self::new(ToneAdjustment::NONE, SpatialFilter::Sharpen)
    }

    /// Tone always runs before the spatial filter. For skin smoothing the
    /// brightness gain is a per-channel scale and the blur is linear, so the
    /// two commute up to rounding and clipping at 255.
    pub fn apply(&self, img: &DynamicImage, level: EnhancementLevel) -> DynamicImage {
        let factor = level.factor();
        let mut rgba = img.to_rgba8();
        self.tone.apply(&mut rgba, factor);
        DynamicImage::ImageRgba8(self.spatial.apply(rgba, factor))
    }
}

fn builtin_recipes() -> HashMap<ProcedureType, Recipe> {
    HashMap::from([
        (
            ProcedureType::LipFillers,
            Recipe::new(ToneAdjustment::new(0.3, 0.1), SpatialFilter::Sharpen),
        ),
        (
            ProcedureType::EyeBrightening,
            Recipe::new(ToneAdjustment::new(0.1, 0.2), SpatialFilter::Sharpen),
        ),
        (
            ProcedureType::SkinSmoothing,
            Recipe::new(
                ToneAdjustment::new(0.0, 0.05),
                SpatialFilter::GaussianBlur {
                    sigma_per_factor: 0.5,
                },
            ),
        ),
    ])
}

/// Immutable after construction; share behind `Arc`.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    recipes: HashMap<ProcedureType, Recipe>,
    default_recipe: Recipe,
    policy: ProcedurePolicy,
    jpeg_quality: u8,
    decode_limits: DecodeLimits,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new(ProcedurePolicy::default())
    }
}

impl TransformEngine {
    pub fn new(policy: ProcedurePolicy) -> Self {
        Self {
            recipes: builtin_recipes(),
            default_recipe: Recipe::sharpen_only(),
            policy,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            decode_limits: DecodeLimits::default(),
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_decode_limits(mut self, limits: DecodeLimits) -> Self {
        self.decode_limits = limits;
        self
    }

    /// Add or replace the recipe for `procedure`
    pub fn register(&mut self, procedure: ProcedureType, recipe: Recipe) {
        self.recipes.insert(procedure, recipe);
    }

    pub fn policy(&self) -> ProcedurePolicy {
        self.policy
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn decode_limits(&self) -> DecodeLimits {
        self.decode_limits
    }

    pub fn is_registered(&self, procedure: &ProcedureType) -> bool {
        self.recipes.contains_key(procedure)
    }

    /// Resolve the recipe, applying the unknown-procedure policy.
    pub fn recipe_for(&self, procedure: &ProcedureType) -> Result<&Recipe, ProcessingError> {
        match self.recipes.get(procedure) {
            Some(recipe) => Ok(recipe),
            None => match self.policy {
                ProcedurePolicy::Lenient => {
                    tracing::debug!(procedure = %procedure, "No recipe registered, using default");
                    Ok(&self.default_recipe)
                }
                ProcedurePolicy::Strict => Err(ProcessingError::InvalidParameter(format!(
                    "Unknown procedure type: {}",
                    procedure
                ))),
            },
        }
    }

    /// Pure pixel step on an already decoded image
    pub fn transform_image(
        &self,
        img: &DynamicImage,
        procedure: &ProcedureType,
        level: EnhancementLevel,
    ) -> Result<DynamicImage, ProcessingError> {
        let recipe = self.recipe_for(procedure)?;
        Ok(recipe.apply(img, level))
    }

    /// Decode, transform and re-encode as JPEG
    pub fn transform(
        &self,
        data: &[u8],
        procedure: &ProcedureType,
        level: i32,
    ) -> Result<Vec<u8>, ProcessingError> {
        let level = EnhancementLevel::new(level)?;
        let recipe = self.recipe_for(procedure)?;
        let img = decode_image_with_limits(data, &self.decode_limits)?;
        encode_jpeg(&recipe.apply(&img, level), self.jpeg_quality)
    }
}

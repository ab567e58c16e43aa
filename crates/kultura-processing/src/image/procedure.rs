//! Procedure types and enhancement levels

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use kultura_core::constants::{MAX_ENHANCEMENT_LEVEL, MIN_ENHANCEMENT_LEVEL};

use crate::error::ProcessingError;

const MAX_SLUG_LEN: usize = 64;

/// Cosmetic procedure a preview simulates.
///
/// `Custom` covers procedures registered at runtime; the engine's policy
/// decides what happens to a custom slug with no registered recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProcedureType {
    LipFillers,
    EyeBrightening,
    SkinSmoothing,
    Custom(String),
}

impl ProcedureType {
    /// Canonical slug, as stored on provenance records
    pub fn as_str(&self) -> &str {
        match self {
            ProcedureType::LipFillers => "lip_fillers",
            ProcedureType::EyeBrightening => "eye_brightening",
            ProcedureType::SkinSmoothing => "skin_smoothing",
            ProcedureType::Custom(slug) => slug,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, ProcedureType::Custom(_))
    }
}

impl FromStr for ProcedureType {
    type Err = ProcessingError;

    /// Accepts `lip_fillers`, `Lip-Fillers` and `lip fillers` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        if slug.is_empty()
            || slug.len() > MAX_SLUG_LEN
            || !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ProcessingError::InvalidParameter(format!(
                "Invalid procedure type: {:?}",
                s
            )));
        }

        Ok(match slug.as_str() {
            "lip_fillers" => ProcedureType::LipFillers,
            "eye_brightening" => ProcedureType::EyeBrightening,
            "skin_smoothing" => ProcedureType::SkinSmoothing,
            _ => ProcedureType::Custom(slug),
        })
    }
}

impl Display for ProcedureType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Treatment intensity in `[10, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnhancementLevel(i32);

impl EnhancementLevel {
    /// Out-of-range values are rejected, never clamped.
    pub fn new(level: i32) -> Result<Self, ProcessingError> {
        if !(MIN_ENHANCEMENT_LEVEL..=MAX_ENHANCEMENT_LEVEL).contains(&level) {
            return Err(ProcessingError::InvalidParameter(format!(
                "Enhancement level must be between {} and {}, got {}",
                MIN_ENHANCEMENT_LEVEL, MAX_ENHANCEMENT_LEVEL, level
            )));
        }
        Ok(EnhancementLevel(level))
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    /// `level / 100`, in `[0.10, 1.00]`
    pub fn factor(&self) -> f32 {
        self.0 as f32 / 100.0
    }
}

impl TryFrom<i32> for EnhancementLevel {
    type Error = ProcessingError;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        EnhancementLevel::new(level)
    }
}

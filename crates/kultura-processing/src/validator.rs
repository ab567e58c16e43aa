use kultura_core::constants::DEFAULT_ENHANCEMENT_LEVEL;
use uuid::Uuid;

/// Upload validation errors. None of these leave anything behind.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No image file provided")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (only image files are allowed)")]
    InvalidContentType { content_type: String },

    #[error("Procedure type is required")]
    MissingProcedureType,

    #[error("Authenticated user is required")]
    MissingUser,

    #[error("Enhancement level must be an integer, got {0:?}")]
    InvalidEnhancementLevel(String),
}

/// Intake checks for preview uploads
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Declared content type must be `image/*` when present; the decoder has the final say.
    pub fn validate_content_type(&self, content_type: Option<&str>) -> Result<(), ValidationError> {
        match content_type {
            Some(ct) if !ct.trim().to_lowercase().starts_with("image/") => {
                Err(ValidationError::InvalidContentType {
                    content_type: ct.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn validate_procedure_type<'a>(
        &self,
        procedure_type: Option<&'a str>,
    ) -> Result<&'a str, ValidationError> {
        procedure_type
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingProcedureType)
    }

    pub fn validate_user(&self, user_id: Uuid) -> Result<(), ValidationError> {
        if user_id.is_nil() {
            return Err(ValidationError::MissingUser);
        }
        Ok(())
    }

    /// Parse the raw form field. Absent or blank means the default level;
    /// range checking belongs to `EnhancementLevel`.
    pub fn parse_enhancement_level(&self, raw: Option<&str>) -> Result<i32, ValidationError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(DEFAULT_ENHANCEMENT_LEVEL),
            Some(s) => s
                .parse::<i32>()
                .map_err(|_| ValidationError::InvalidEnhancementLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> UploadValidator {
        UploadValidator::new(1024 * 1024)
    }

    #[test]
    fn test_validate_file_size_ok() {
        let validator = test_validator();
        assert!(validator.validate_file_size(512 * 1024).is_ok());
        assert!(validator.validate_file_size(1024 * 1024).is_ok());
    }

    #[test]
    fn test_validate_file_size_too_large() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_file_size(1024 * 1024 + 1),
            Err(ValidationError::FileTooLarge { max: 1048576, .. })
        ));
    }

    #[test]
    fn test_validate_file_size_empty() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_content_type() {
        let validator = test_validator();
        assert!(validator.validate_content_type(Some("image/jpeg")).is_ok());
        assert!(validator.validate_content_type(Some("IMAGE/PNG")).is_ok());
        assert!(validator.validate_content_type(None).is_ok());
        assert!(validator
            .validate_content_type(Some("application/pdf"))
            .is_err());
    }

    #[test]
    fn test_validate_procedure_type() {
        let validator = test_validator();
        assert_eq!(
            validator.validate_procedure_type(Some(" lip_fillers ")).unwrap(),
            "lip_fillers"
        );
        assert!(matches!(
            validator.validate_procedure_type(Some("  ")),
            Err(ValidationError::MissingProcedureType)
        ));
        assert!(matches!(
            validator.validate_procedure_type(None),
            Err(ValidationError::MissingProcedureType)
        ));
    }

    #[test]
    fn test_validate_user() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_user(Uuid::nil()),
            Err(ValidationError::MissingUser)
        ));
        assert!(validator.validate_user(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_parse_enhancement_level() {
        let validator = test_validator();
        assert_eq!(validator.parse_enhancement_level(None).unwrap(), 50);
        assert_eq!(validator.parse_enhancement_level(Some("")).unwrap(), 50);
        assert_eq!(validator.parse_enhancement_level(Some(" 75 ")).unwrap(), 75);
        // Out of range still parses; the engine rejects it.
        assert_eq!(validator.parse_enhancement_level(Some("500")).unwrap(), 500);
        assert!(matches!(
            validator.parse_enhancement_level(Some("high")),
            Err(ValidationError::InvalidEnhancementLevel(_))
        ));
        assert!(validator.parse_enhancement_level(Some("50.5")).is_err());
    }
}

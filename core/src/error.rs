use thiserror::Error;

/// Errors raised while configuring a grid or an effect.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TerrainError {
    #[error("grid size {size} is not of the form 2^n + 1 (n >= 1)")]
    InvalidSize { size: usize },

    #[error("grid level {level} is outside 1..={max}", max = crate::landmap::MAX_LEVEL)]
    InvalidLevel { level: u32 },

    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("grid size mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: usize, found: usize },
}

impl TerrainError {
    pub(crate) fn parameter(name: &'static str, value: impl Into<f64>, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;

// Shared validation helpers for effect configurations.
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TerrainError::parameter(name, value, "must be finite"))
    }
}

pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<()> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(TerrainError::parameter(name, value, "must be greater than zero"))
    }
}

pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<()> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TerrainError::parameter(name, value, "must not be negative"))
    }
}

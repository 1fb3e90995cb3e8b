//! Error types for the ballistics core.

use bevy::prelude::Entity;
use thiserror::Error;

/// Errors produced by the drag model, the shot factory and profile setup.
///
/// Every variant is reported synchronously to the caller. Nothing in this
/// crate clamps a bad value into range or emits a bullet built from one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BallisticsError {
    /// A scalar input is outside the range the formula is defined for.
    #[error("invalid argument `{name}` = {value}: {reason}")]
    InvalidArgument {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
        /// Which constraint was violated
        reason: &'static str,
    },

    /// A vector input has NaN/infinite components or is degenerate.
    ///
    /// This is the vector form of [`BallisticsError::InvalidArgument`]; use
    /// [`BallisticsError::is_invalid_input`] to match both.
    #[error("invalid vector `{name}`: {reason}")]
    InvalidVector {
        /// Parameter name
        name: &'static str,
        /// Which constraint was violated
        reason: &'static str,
    },

    /// A weapon profile or the settings it depends on cannot be used.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A fire command named an entity that carries no weapon profile.
    #[error("entity {0} has no weapon profile")]
    UnknownWeapon(Entity),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, BallisticsError>;

impl BallisticsError {
    /// True for bad call arguments, scalar or vector.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::InvalidVector { .. })
    }

    pub(crate) fn invalid(name: &'static str, value: f32, reason: &'static str) -> Self {
        Self::InvalidArgument {
            name,
            value,
            reason,
        }
    }
}

/// Fails unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<f32> {
    if !value.is_finite() {
        return Err(BallisticsError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(BallisticsError::invalid(name, value, "must be greater than zero"));
    }
    Ok(value)
}

/// Fails unless `value` is finite and not negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<f32> {
    if !value.is_finite() {
        return Err(BallisticsError::invalid(name, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(BallisticsError::invalid(name, value, "must not be negative"));
    }
    Ok(value)
}

/// Fails unless `value` is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BallisticsError::invalid(name, value, "must be finite"))
    }
}

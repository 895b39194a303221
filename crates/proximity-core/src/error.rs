use thiserror::Error;

/// Invalid construction-time parameters. An effect that fails validation is
/// mounted inert instead of failing the page.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("particle count must be positive")]
    NonPositiveCount,
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("ring radius must be non-negative, got {0}")]
    NegativeRingRadius(f32),
    #[error("variation settings {0:?} name no axes")]
    NoAxes(String),
    #[error("unknown falloff {0:?} (expected linear, exponential or gaussian)")]
    UnknownFalloff(String),
    #[error("scramble character set is empty")]
    EmptyCharset,
}

/// Failure of a single frame callback. The scheduler logs these and keeps
/// ticking the remaining callbacks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    #[error("drawing surface call failed: {0}")]
    Surface(String),
    #[error("effect state is already borrowed (re-entrant tick)")]
    Reentrant,
}

#[inline]
pub(crate) fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

use thiserror::Error;

/// Raised when a caller-supplied value falls outside its documented domain.
///
/// The step loop itself is pure arithmetic over already-validated reals, so
/// this is the only error the model can produce, and it is produced
/// synchronously at initialization.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid parameter `{name}`: {reason}")]
pub struct InvalidParameterError {
    pub name: &'static str,
    pub reason: String,
}

impl InvalidParameterError {
    pub fn new(name: &'static str, reason: impl Into<String>) -> Self {
        InvalidParameterError {
            name,
            reason: reason.into(),
        }
    }
}

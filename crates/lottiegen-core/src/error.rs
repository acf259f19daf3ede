/// Core error types for the LottieGen pipeline.

/// A specialized Result type for LottieGen operations.
pub type LottieGenResult<T> = Result<T, LottieGenError>;

/// Top-level error type encompassing every stage of a compilation unit.
///
/// None of these are retried internally. A unit that fails produces no output.
#[derive(Debug, thiserror::Error)]
pub enum LottieGenError {
    /// Malformed IR or composition graph found while lowering.
    #[error("structural violation at {node}: {message}")]
    StructuralViolation { node: String, message: String },

    /// The statement-tree builder was driven outside its contract. This is an
    /// internal defect, never a user input problem.
    #[error("builder misuse: {0}")]
    BuilderMisuse(String),

    /// The requested target needs a feature its stringifier cannot express.
    #[error("unsupported target {target}: {message}")]
    UnsupportedTarget { target: String, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LottieGenError {
    /// Create a structural violation naming the offending node.
    pub fn structural(node: impl Into<String>, message: impl Into<String>) -> Self {
        LottieGenError::StructuralViolation {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Create a builder misuse error.
    pub fn misuse(message: impl Into<String>) -> Self {
        LottieGenError::BuilderMisuse(message.into())
    }

    /// Create an unsupported-target error.
    pub fn unsupported(target: impl Into<String>, message: impl Into<String>) -> Self {
        LottieGenError::UnsupportedTarget {
            target: target.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_display() {
        let err = LottieGenError::structural("EffectBrush_0", "source count mismatch");
        assert_eq!(
            err.to_string(),
            "structural violation at EffectBrush_0: source count mismatch"
        );
    }

    #[test]
    fn test_unsupported_error_display() {
        let err = LottieGenError::unsupported("cx", "modern runtime");
        assert!(err.to_string().contains("unsupported target cx"));
    }

    #[test]
    fn test_misuse_error_display() {
        let err = LottieGenError::misuse("closed the root scope");
        assert_eq!(err.to_string(), "builder misuse: closed the root scope");
    }
}

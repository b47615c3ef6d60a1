//! Error types for route generation.

use thiserror::Error;

use crate::registry::RegistryError;

/// Errors that abort route table construction.
///
/// None of these are recoverable at request time; they surface at boot so
/// the server never starts with a half-built table.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A glob pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Two exposed routes share a route name.
    #[error("route name collision on '{route_name}' between {first} and {second}")]
    Collision {
        /// The duplicated route name.
        route_name: String,
        /// Route that claimed the name first.
        first: String,
        /// Route that tried to claim it again.
        second: String,
    },

    /// Two exposed routes produce the same URI template.
    #[error("URI collision on '{uri}' between {first} and {second}")]
    UriCollision {
        /// The duplicated URI template.
        uri: String,
        /// Route that claimed the URI first.
        first: String,
        /// Route that tried to claim it again.
        second: String,
    },

    /// An HTTP method name is not supported.
    #[error("unsupported HTTP method: {0}")]
    InvalidMethod(String),

    /// The command registry could not be read.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl RouteError {
    /// Create an InvalidPattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_display() {
        let err = RouteError::Collision {
            route_name: "artisan.api.make.model".to_string(),
            first: "make:model".to_string(),
            second: "make.model".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("artisan.api.make.model"));
        assert!(text.contains("make:model"));
        assert!(text.contains("make.model"));
    }

    #[test]
    fn test_registry_error_is_wrapped() {
        let err: RouteError = RegistryError::NotFound("about".to_string()).into();
        assert!(matches!(err, RouteError::Registry(_)));
        assert!(err.to_string().contains("about"));
    }
}

//! Error taxonomy
//!
//! Only `GenerationUnavailable` ever crosses the statement boundary. The other
//! variants are produced and recovered internally, but carry enough detail to
//! be logged meaningfully.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CharadesError {
    /// No generation capability is configured or reachable.
    #[error("phrase generator is not available")]
    GenerationUnavailable,

    /// The generator answered with the wrong shape or count.
    #[error("generator returned a malformed result: {0}")]
    MalformedCandidate(String),

    /// A durable backend could not be opened.
    #[error("storage backend `{backend}` is unavailable: {source}")]
    StorageUnavailable {
        backend: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl CharadesError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCandidate(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = CharadesError::GenerationUnavailable.into();
        assert!(matches!(
            err.downcast_ref::<CharadesError>(),
            Some(CharadesError::GenerationUnavailable)
        ));
    }

    #[test]
    fn test_storage_unavailable_message() {
        let err = CharadesError::StorageUnavailable {
            backend: "sqlite",
            source: anyhow::anyhow!("disk full"),
        };
        assert_eq!(err.to_string(), "storage backend `sqlite` is unavailable: disk full");
    }
}

use thiserror::Error;

use super::trait_def::ServiceError;

/// Why a draft (plan or suggestions) could not be produced.
///
/// Every variant is a definitive failure: transient errors only surface
/// here once the retry budget is spent.
#[derive(Debug, Error)]
pub enum DraftError {
    /// The service failed with a non-retryable error.
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: ServiceError,
    },

    /// The service answered, but not with something matching the schema.
    #[error("malformed response from {service}: {reason}")]
    Malformed { service: String, reason: String },
}

use thiserror::Error;

/// Boxed cause carried by collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal errors of the cost retrieval flow.
///
/// Partial data (a group missing its metric) is not an error; it is dropped
/// and reported as a `warn` event by the report builder.
#[derive(Error, Debug)]
pub enum CostError {
    #[error("days must be a positive integer, got {0}")]
    InvalidArgument(i64),
    #[error("unable to load AWS SDK config: {0}")]
    Configuration(String),
    #[error("failed to get cost data from AWS Cost Explorer: {0}")]
    Collaborator(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_names_the_value() {
        let err = CostError::InvalidArgument(-3);
        assert_eq!(err.to_string(), "days must be a positive integer, got -3");
    }

    #[test]
    fn collaborator_error_wraps_cause() {
        let err = CostError::Collaborator("ThrottlingException: Rate exceeded".into());
        assert_eq!(
            err.to_string(),
            "failed to get cost data from AWS Cost Explorer: ThrottlingException: Rate exceeded"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}

use crate::{error::Error, model::window::DateWindow};

#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    /// An alert query failed permanently or exhausted its retry budget.
    ///
    /// Carries the full query context so a give-up can be logged and attributed to one
    /// (dataset, geostore, date window) tuple.
    #[error("Failed to get alerts for dataset: {dataset}, geostore_id: {geostore_id}, daterange: {window}: {source}")]
    Failed {
        dataset: String,
        geostore_id: String,
        window: DateWindow,
        #[source]
        source: Box<Error>,
    },
}

impl QueryError {
    pub fn failed(dataset: &str, geostore_id: &str, window: DateWindow, source: Error) -> Self {
        Self::Failed {
            dataset: dataset.to_string(),
            geostore_id: geostore_id.to_string(),
            window,
            source: Box::new(source),
        }
    }

    /// Whether the batch paths may substitute an empty result for this failure.
    ///
    /// Credential failures are never partial: without a key no geostore can be queried.
    pub fn is_partial_failure(&self) -> bool {
        match self {
            Self::Failed { source, .. } => !matches!(source.as_ref(), Error::Auth(_)),
        }
    }
}

//! Pipeline error types.

use crate::provider::{FieldId, ProviderError};

/// Errors raised while assembling or running a [`FieldPipeline`](crate::FieldPipeline).
///
/// Assembly errors (cycles, missing or duplicate producers) are detected
/// by [`FieldPipelineBuilder::build`](crate::FieldPipelineBuilder::build)
/// and prevent any region from being processed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The produces/requires graph contains a cycle.
    #[error("dependency cycle among providers: {}", providers.join(" -> "))]
    Cycle { providers: Vec<String> },

    /// A provider requires or updates a facet nobody produces.
    #[error("provider `{provider}` needs facet `{field}`, which no provider produces")]
    MissingProducer { provider: String, field: FieldId },

    /// Two providers declare the same produced facet.
    #[error("facet `{field}` is produced by both `{first}` and `{second}`")]
    DuplicateProducer {
        field: FieldId,
        first: String,
        second: String,
    },

    /// A provider failed while processing a region.
    #[error("provider `{provider}` failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: ProviderError,
    },

    /// A provider returned without writing a facet it declared.
    #[error("provider `{provider}` did not produce facet `{field}`")]
    MissingOutput { provider: String, field: FieldId },

    /// A consumer asked for a facet the completed region does not hold.
    #[error("facet `{field}` is not available")]
    MissingFacet { field: FieldId },

    /// A consumer asked for a facet with the wrong type.
    #[error("facet `{field}` holds an unexpected type")]
    FacetTypeMismatch { field: FieldId },
}

use thiserror::Error;

/// Failure talking to an upstream provider.
///
/// Only failures of the current-conditions call leave the aggregator;
/// everything else is wrapped in [`DegradedForecast`] or
/// [`ImageUnavailable`] and recovered locally.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to reach the {endpoint} endpoint: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to parse {endpoint} JSON: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response is missing required field `{field}`")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },

    #[error("{endpoint} response has out-of-range timestamp in `{field}`")]
    InvalidTimestamp {
        endpoint: &'static str,
        field: &'static str,
    },
}

/// Why hourly or daily samples could not be produced.
#[derive(Debug, Error)]
pub enum DegradedForecast {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{endpoint} payload has no `{field}` sequence")]
    MissingSequence {
        endpoint: &'static str,
        field: &'static str,
    },
}

/// Why a background image could not be resolved.
#[derive(Debug, Error)]
pub enum ImageUnavailable {
    #[error("no image provider access key configured")]
    MissingCredential,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("no search query returned a usable photo")]
    NoResults,

    #[error("photo URL is not valid: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

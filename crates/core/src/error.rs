use thiserror::Error;

/// Boxed error type used to carry backend failures through the host contract.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced to the host by adapters and drivers.
///
/// Nothing here is retried or logged by the adapter; the host decides what
/// to do with it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed url: {0}")]
    MalformedUrl(#[from] url::ParseError),

    #[error("unexpected scheme: {0:?}")]
    UnexpectedScheme(String),

    #[error("missing region in url: {0}")]
    MissingRegion(String),

    #[error("one of work_group or s3_staging_dir must be set in: {0}")]
    MissingParameter(String),

    #[error("unable to connect to {backend}: {source}")]
    Connect {
        backend: &'static str,
        #[source]
        source: BoxError,
    },

    /// A failure reported by the underlying connection, passed through as is.
    #[error(transparent)]
    Driver(BoxError),

    #[error("could not retrieve {0}: insufficient info")]
    InsufficientInfo(&'static str),
}

impl Error {
    /// Wrap a backend error without altering its message.
    pub fn driver(err: impl Into<BoxError>) -> Self {
        Error::Driver(err.into())
    }
}

use crate::core::line::DataLine;

/// Normalized failure of a logical fetch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum FetchError {
    #[error("the type is not implemented by the provider")]
    TypeNotImplementedByProvider,

    #[error("the location is not supported by the provider")]
    LocationNotSupportedByProvider,

    #[error("time span is too large")]
    TooLargeTimeSpan,

    #[error("the server is at maintenance")]
    ServerMaintenance,

    #[error("connection failed")]
    ConnectionFailed,

    #[error("the provider returned a malformed response")]
    MalformedResponse,
}

pub type FetchResult = Result<DataLine, FetchError>;

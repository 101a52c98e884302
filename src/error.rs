use thiserror::Error;

/// Everything that can go wrong while pushing images to a host.
///
/// Node handlers never return these to the engine directly; they are folded
/// into the failure-shaped output record by the orchestrators.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid repository URL format: {input:?}. Supported formats: owner/repo, https://gitee.com/owner/repo, git@gitee.com:owner/repo")]
    InvalidLocatorFormat { input: String },

    #[error("At least one image path must be provided")]
    NoImagesProvided,

    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("API request failed with status {status}: {body}")]
    ApiRequest { status: u16, body: String },

    #[error("Invalid API response format: {0}")]
    MalformedApiResponse(String),

    #[error("Expected {expected} URLs but found {found}")]
    UrlCountMismatch { expected: usize, found: usize },

    #[error("timed out after {secs}s waiting for {what}")]
    TimeoutExceeded { what: String, secs: u64 },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("failed to start browser: {0}")]
    BrowserLaunch(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Unexpected(anyhow::Error::new(err).context("HTTP transport error"))
    }
}

impl From<chromiumoxide::error::CdpError> for UploadError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        UploadError::Browser(err.to_string())
    }
}

pub type Result<T, E = UploadError> = std::result::Result<T, E>;

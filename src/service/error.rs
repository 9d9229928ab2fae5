use thisslime::TracingError;

#[derive(Debug, thiserror::Error, TracingError)]
#[span]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    EmptyResponse(#[from] EmptyResponseError),

    #[error("response did not match the requested schema: {0}")]
    #[event(level = ERROR)]
    Malformed(#[from] serde_json::Error),

    #[error("invalid service url: {0}")]
    #[event(level = ERROR)]
    Url(#[from] url::ParseError),

    #[error("service unavailable: {0}")]
    #[event(level = WARN)]
    Unavailable(String),
}

impl Error {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

#[derive(Debug, thiserror::Error, TracingError)]
#[error("generative api returned an error: {source}")]
#[event(level = ERROR)]
pub struct ApiError {
    #[field(print = Debug)]
    #[from]
    pub(crate) source: reqwest::Error,
}

#[derive(Debug, thiserror::Error, TracingError)]
#[error("error from reqwest client")]
#[event(level = ERROR)]
pub struct ClientError {
    #[field(print = Debug)]
    #[from]
    pub(crate) source: reqwest::Error,
}

impl ClientError {
    /// Status errors are the api's fault, everything else is ours.
    pub(crate) fn or_server(err: reqwest::Error) -> Error {
        if err.is_status() {
            Error::from(ApiError::from(err))
        } else {
            Error::Client(Self::from(err))
        }
    }
}

#[derive(Debug, thiserror::Error, TracingError)]
#[error("model {model} returned no usable {expected} part")]
#[event(level = WARN)]
pub struct EmptyResponseError {
    #[field(print = Display)]
    pub(crate) model: String,

    #[field(print = Display)]
    pub(crate) expected: &'static str,
}

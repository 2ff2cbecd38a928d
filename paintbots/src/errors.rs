use thiserror::Error;

/// A request could not be completed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failure, timeout, or an unreadable response body.
    #[error("request to the paintbots server failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered with status {status}: {body}")]
    Status { status: u16, body: String },
}

/// The response body does not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("response is missing the '{0}' field")]
    MissingField(&'static str),
    #[error("response field '{field}' is not an integer: '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },
    #[error("response color '{0}' is not a palette symbol")]
    InvalidColor(String),
    #[error("registration response did not contain a bot id")]
    EmptyIdentity,
    #[error("bots listing is not valid JSON: {0}")]
    InvalidBotsListing(String),
}

/// The registration cache could not be read or written.
///
/// Never fatal for a session: a failed read is treated as an empty cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cannot access registration cache: {0}")]
    Io(#[from] std::io::Error),
    #[error("registration cache is corrupt: {0}")]
    Corrupt(String),
}

/// The error type for the operations of a [`BotSession`](crate::BotSession).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("the bot must be registered before sending commands")]
    NotRegistered,
    #[error("already registered as '{name}'")]
    AlreadyRegistered { name: String },
}

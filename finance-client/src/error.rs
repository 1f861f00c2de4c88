use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Login required")]
    Unauthorized,
    /// A non-success response. `message` is the server's `error` field when present.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unable to access stored credentials: {0}")]
    Storage(#[from] std::io::Error),
}

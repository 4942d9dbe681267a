use crownshield_core_store::Error as StoreError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        match error {
            Error::Http(error) => StoreError::Transport(Box::new(error)),
            other => StoreError::Config {
                message: other.to_string(),
            },
        }
    }
}

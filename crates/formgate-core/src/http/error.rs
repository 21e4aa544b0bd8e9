use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid value for header {0}")]
    InvalidHeader(&'static str),
}

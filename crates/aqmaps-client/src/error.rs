use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP client setup failed: {0}")]
    Setup(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("location code '{0}' is not a three-word code")]
    InvalidLocationCode(String),

    #[error("sensor {code} has a non-numeric battery level '{value}'")]
    InvalidBattery { code: String, value: String },

    #[error("no-fly zone feature {index} has no outer ring")]
    MissingRing { index: usize },
}

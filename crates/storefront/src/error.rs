use shopcart_cart::CartError;

/// Failure reaching or using a cart backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response, with the API's `error` code and `message`.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Cart(#[from] CartError),
}

impl ClientError {
    /// Text a storefront shows for this failure.
    pub fn notice(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Cart(e) => e.to_string(),
            Self::Network(_) | Self::Parse(_) => "Something went wrong, please try again".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Parse(value.to_string())
        } else {
            Self::Network(value.to_string())
        }
    }
}

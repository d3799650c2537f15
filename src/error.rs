//! Failure taxonomy shared by the store client, the weather client and the
//! flows built on top of them.
//!
//! Every variant carries a detail string for the log. The notification shown
//! to the user comes from [`Error::user_message`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A required field was missing (or unusable) before any call was made.
    #[error("incomplete input: {0}")]
    IncompleteInput(String),

    #[error("local store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("local store write failed: {0}")]
    StoreWriteError(String),

    #[error("weather service unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("malformed weather service response: {0}")]
    MalformedResponse(String),

    #[error("no local record named {0:?}")]
    RecordNotFound(String),

    /// The local collection could not be loaded; resolution does not fall
    /// back to the weather service in this case.
    #[error("city data unavailable: {0}")]
    DataUnavailable(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn user_message(&self) -> String {
        match self {
            Error::IncompleteInput(detail) => format!("Please fill in the required fields ({detail})."),
            Error::StoreUnavailable(_) => {
                "Unable to reach the local city store. Please try again later.".to_string()
            }
            Error::StoreWriteError(_) => "Saving the city failed. Please try again.".to_string(),
            Error::RemoteUnavailable(_) | Error::MalformedResponse(_) | Error::DataUnavailable(_) => {
                "An error occurred while fetching the weather data. Please try again later."
                    .to_string()
            }
            Error::RecordNotFound(_) => "City not found".to_string(),
            Error::Config(detail) => format!("Invalid configuration: {detail}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = [
            Error::IncompleteInput("name".into()),
            Error::StoreUnavailable("x".into()),
            Error::StoreWriteError("x".into()),
            Error::RemoteUnavailable("x".into()),
            Error::MalformedResponse("x".into()),
            Error::RecordNotFound("x".into()),
            Error::DataUnavailable("x".into()),
            Error::Config("x".into()),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty(), "{err:?}");
        }
    }

    #[test]
    fn test_display_keeps_detail() {
        let err = Error::RecordNotFound("paris".into());
        assert_eq!(err.to_string(), "no local record named \"paris\"");
    }
}

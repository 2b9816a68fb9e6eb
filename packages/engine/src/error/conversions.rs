use crate::config::validation::ConfigurationError;

use super::types::{Error, Kind};

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        Error::new(Kind::Config).with(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Error::new(Kind::InvalidResponse).with(err)
    }
}

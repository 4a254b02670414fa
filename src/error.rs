use crate::config::ConfigError;
use crate::snake;
use std::fmt::{Debug, Display, Formatter};
use std::{fmt, io, result};

#[derive(Debug)]
pub enum ErrorType {
    IoError(io::Error),
    JsonError(serde_json::Error),
    ConfigError(ConfigError),
    SnakeBuilderError(snake::BuilderError),
}

/// The second member contains a trace in reverse order
#[must_use]
pub struct Error(ErrorType, Vec<String>);

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self(ErrorType::IoError(e), vec![])
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self(ErrorType::JsonError(e), vec![])
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self(ErrorType::ConfigError(e), vec![])
    }
}

impl From<snake::BuilderError> for Error {
    fn from(e: snake::BuilderError) -> Self {
        Self(ErrorType::SnakeBuilderError(e), vec![])
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorType {
        &self.0
    }

    pub fn with_trace_step<S: ToString>(mut self, s: S) -> Self {
        self.1.push(s.to_string());
        self
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error:\n{:?}\nTrace:", self.0)?;
        for t in (self.1).iter().rev() {
            writeln!(f, " in {}", t)?;
        }
        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl std::error::Error for Error {}

pub type Result<T = ()> = result::Result<T, Error>;

pub trait ErrorConversion {
    fn with_trace_step<S: ToString>(self, s: S) -> Self;
}

impl<T> ErrorConversion for Result<T> {
    fn with_trace_step<S: ToString>(self, s: S) -> Self {
        self.map_err(|e| e.with_trace_step(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(json: &str) -> Result<crate::config::Tuning> {
        let tuning = serde_json::from_str::<crate::config::Tuning>(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    #[test]
    fn trace_is_printed_outermost_last() {
        let err = load("{ not json")
            .with_trace_step("parse tuning")
            .with_trace_step("load tuning")
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorType::JsonError(_)));

        let printed = err.to_string();
        let inner = printed.find("in parse tuning").unwrap();
        let outer = printed.find("in load tuning").unwrap();
        assert!(outer < inner);
    }

    #[test]
    fn config_errors_convert() {
        let err = load(r#"{ "growth_rate": 0.0 }"#).unwrap_err();
        assert!(matches!(err.kind(), ErrorType::ConfigError(ConfigError { field: "growth_rate", .. })));
    }
}

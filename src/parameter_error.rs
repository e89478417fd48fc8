//! Error handling for room geometry configuration

use std::io;

use crate::error::KinematicsError;

/// Unified error to report failures while reading or applying room geometry.
#[derive(Debug)]
pub enum ParameterError {
    IoError(io::Error),
    ParseError(String),
    InvalidLength { expected: usize, found: usize },
    UnknownFrame(String),
    InvalidAxis(String),
    ChainConfigurationError(String),
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ParameterError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            ParameterError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            ParameterError::InvalidLength { expected, found } =>
                write!(f, "Invalid Length: expected {}, found {}", expected, found),
            ParameterError::UnknownFrame(ref name) =>
                write!(f, "Unknown frame: {}", name),
            ParameterError::InvalidAxis(ref joint) =>
                write!(f, "Joint {} has a zero length axis", joint),
            ParameterError::ChainConfigurationError(ref err) =>
                write!(f, "Chain Configuration Error: {}", err),
        }
    }
}

impl std::error::Error for ParameterError {}

impl From<io::Error> for ParameterError {
    fn from(err: io::Error) -> Self {
        ParameterError::IoError(err)
    }
}

impl From<KinematicsError> for ParameterError {
    fn from(err: KinematicsError) -> Self {
        ParameterError::ChainConfigurationError(err.to_string())
    }
}

//! Structured error types for the converter.
//!
//! [`PathError`] covers everything that can go wrong while interpreting one
//! path's token stream; it is fatal for that shape only. [`ConvertError`] is
//! the unified error returned by the public pipeline functions.

use thiserror::Error;

/// A shape's path data could not be interpreted.
///
/// `position` is the index of the offending token in the shape's token list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("token {position}: expected a number, found `{token}`")]
    MalformedNumericToken { position: usize, token: String },

    #[error(
        "token {position}: `{command}` needs {expected} parameters but only {found} follow"
    )]
    TruncatedCommand {
        position: usize,
        command: char,
        expected: usize,
        found: usize,
    },

    #[error("token {position}: unknown path command `{letter}`")]
    UnknownCommandLetter { position: usize, letter: char },

    #[error("token {position}: parameter `{token}` appears before any path command")]
    MissingCommand { position: usize, token: String },

    #[error("token {position}: `{command}` curve is too long to flatten (length {length:.0})")]
    CurveTooLong {
        position: usize,
        command: char,
        length: f64,
    },
}

/// The unified error type returned by the conversion pipeline.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The SVG markup itself could not be read.
    #[error("Malformed SVG markup: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute needed to position the drawing was not understood.
    #[error("<{element}> has an unreadable {attribute}=\"{value}\"")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    /// A shape failed and the conversion runs in strict mode.
    #[error("Path #{index}: {source}")]
    Shape {
        index: usize,
        #[source]
        source: PathError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file did not match the expected schema.
    #[error("Invalid options: {0}")]
    Config(#[from] serde_json::Error),

    /// An option is out of the range the converter can work with.
    #[error("Invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

impl ConvertError {
    pub(crate) fn invalid_attribute(element: &str, attribute: &str, value: &str) -> Self {
        ConvertError::InvalidAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

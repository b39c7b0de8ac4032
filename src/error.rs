//! The Errors that may occur within the crate.

use thiserror::Error;

pub type Result<T, E = crate::Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    // Input shape errors
    #[error("Failed to parse definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Definition must be an object")]
    NotAnObject,
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),
    #[error("Field `{field}` must be {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
    #[error("Symbol {symbol:?} in `{field}` is not a single character")]
    InvalidSymbol { field: String, symbol: String },
    #[error("Alphabet must not be empty")]
    EmptyAlphabet,
    #[error("Epsilon transitions are not supported (found {key:?} in `{field}`)")]
    EpsilonTransition { field: String, key: String },
    // Language errors
    #[error("Word {word:?} uses symbol {symbol:?} outside the alphabet")]
    AlphabetViolation { word: String, symbol: char },
    // Referential integrity
    #[error("State {state:?} referenced by `{field}` is not declared")]
    UnknownState { field: String, state: String },
    #[error("Transition symbol {symbol:?} of state {state:?} is not in the alphabet")]
    UnknownSymbol { state: String, symbol: char },
    // Algorithm preconditions
    #[error("State {state:?} has more than one transition on {symbol:?}")]
    NotDeterministic { state: String, symbol: char },
    #[error("Automaton is not acyclic: state {0:?} lies on a cycle")]
    CyclicAutomaton(String),
    #[error("No automaton is loaded")]
    NoAutomatonLoaded,
    // Binary persistence
    #[error("Failed to encode automaton: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Failed to decode automaton: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

/// Coarse classification of an [`Error`], used by front ends to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedInput,
    TypeMismatch,
    UnsupportedFeature,
    AlphabetViolation,
    ReferentialIntegrityViolation,
    InvalidAutomaton,
    NoAutomatonLoaded,
    Serialization,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Json(_) | Self::NotAnObject | Self::MissingField(_) | Self::EmptyAlphabet => {
                ErrorKind::MalformedInput
            }
            Self::TypeMismatch { .. } | Self::InvalidSymbol { .. } => ErrorKind::TypeMismatch,
            Self::EpsilonTransition { .. } => ErrorKind::UnsupportedFeature,
            Self::AlphabetViolation { .. } => ErrorKind::AlphabetViolation,
            Self::UnknownState { .. } | Self::UnknownSymbol { .. } => {
                ErrorKind::ReferentialIntegrityViolation
            }
            Self::NotDeterministic { .. } | Self::CyclicAutomaton(_) => {
                ErrorKind::InvalidAutomaton
            }
            Self::NoAutomatonLoaded => ErrorKind::NoAutomatonLoaded,
            Self::Encode(_) | Self::Decode(_) => ErrorKind::Serialization,
        }
    }

    pub fn is_unsupported_feature(&self) -> bool {
        matches!(self, Self::EpsilonTransition { .. })
    }
}

#[cfg(feature = "python-bindings")]
impl From<Error> for pyo3::PyErr {
    fn from(e: Error) -> Self {
        use pyo3::exceptions::PyValueError;
        use pyo3::PyErr;
        PyErr::new::<PyValueError, _>(e.to_string())
    }
}

use std::{error, fmt};

pub use serde_with;
pub use utility::geo::{BoundingBox, LatLng};

pub mod endpoint;
pub mod overlay;
pub mod provider;
pub mod query;
pub mod route;
pub mod selection;
pub mod tower;

/// A radio value that is not part of its closed set of choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSelectionError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseSelectionError {
    pub fn new<S: Into<String>>(kind: &'static str, value: S) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl error::Error for ParseSelectionError {}

impl fmt::Display for ParseSelectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown {}: \"{}\"", self.kind, self.value)
    }
}

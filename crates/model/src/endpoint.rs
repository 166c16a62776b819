use std::fmt;

use serde::{Deserialize, Serialize};
use utility::geo::LatLng;

/// The semantic role of a picked point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Start,
    End,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }

    /// Text of the popup shown where the user clicked.
    pub fn popup_content(&self, latlng: LatLng) -> String {
        match self {
            Self::Start => format!("Start at {latlng}"),
            Self::End => format!("End at {latlng}"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Resolution {
    Pending,
    Resolved,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub role: Role,
    pub latlng: LatLng,
    /// Server side node identity. Empty until the first successful lookup,
    /// afterwards it keeps the last successfully resolved value.
    pub node_label: String,
    pub resolution: Resolution,
}

impl Endpoint {
    pub fn new(role: Role, latlng: LatLng) -> Self {
        Self {
            role,
            latlng,
            node_label: String::new(),
            resolution: Resolution::Pending,
        }
    }

    /// A new click of the same role moves the point. The previous label stays
    /// until the new lookup succeeds.
    pub fn relocate(&mut self, latlng: LatLng) {
        self.latlng = latlng;
        self.resolution = Resolution::Pending;
    }

    pub fn resolve<S: Into<String>>(&mut self, label: S) {
        self.node_label = label.into();
        self.resolution = Resolution::Resolved;
    }

    pub fn fail<S: Into<String>>(&mut self, reason: S) {
        self.resolution = Resolution::Failed {
            reason: reason.into(),
        };
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{provider::ProviderSelection, ParseSelectionError};

/// What the routing server optimizes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    #[default]
    Length,
    Speed,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Speed => "speed",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "length" => Ok(Self::Length),
            "speed" => Ok(Self::Speed),
            other => Err(ParseSelectionError::new("goal", other)),
        }
    }
}

/// How the user moves along the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    #[default]
    Car,
    Foot,
}

impl Movement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Foot => "foot",
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Movement {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(Self::Car),
            "foot" => Ok(Self::Foot),
            other => Err(ParseSelectionError::new("move", other)),
        }
    }
}

/// The three radio groups. Always fully defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub goal: Goal,
    #[serde(rename = "move")]
    pub movement: Movement,
    pub provider: ProviderSelection,
}

impl Selection {
    /// Reads the raw values of the three radio groups.
    pub fn from_form(
        goal: &str,
        movement: &str,
        provider: &str,
    ) -> Result<Self, ParseSelectionError> {
        Ok(Self {
            goal: goal.parse()?,
            movement: movement.parse()?,
            provider: provider.parse()?,
        })
    }

    pub fn apply(&mut self, change: SelectionChange) {
        match change {
            SelectionChange::Goal(goal) => self.goal = goal,
            SelectionChange::Movement(movement) => self.movement = movement,
            SelectionChange::Provider(provider) => self.provider = provider,
        }
    }
}

/// A single radio button being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Goal(Goal),
    Movement(Movement),
    Provider(ProviderSelection),
}

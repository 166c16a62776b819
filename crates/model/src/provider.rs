use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::ParseSelectionError;

/// Color of everything that does not belong to a named provider.
pub const DEFAULT_COLOR: &str = "#000000";

const TELEKOM_COLOR: &str = "#E20074";
const VODAFONE_COLOR: &str = "#E60000";
const O2_COLOR: &str = "#0090D0";

/// A cellular network operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Telekom,
    Vodafone,
    O2,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Telekom, Provider::Vodafone, Provider::O2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telekom => "telekom",
            Self::Vodafone => "vodafone",
            Self::O2 => "o2",
        }
    }

    pub fn color(&self) -> &'static str {
        color_for(self.as_str())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telekom" => Ok(Self::Telekom),
            "vodafone" => Ok(Self::Vodafone),
            "o2" => Ok(Self::O2),
            other => Err(ParseSelectionError::new("provider", other)),
        }
    }
}

/// Display color of a provider identifier. Total: anything that is not a
/// named provider gets [`DEFAULT_COLOR`].
pub fn color_for(identifier: &str) -> &'static str {
    match identifier {
        "telekom" => TELEKOM_COLOR,
        "vodafone" => VODAFONE_COLOR,
        "o2" => O2_COLOR,
        _ => DEFAULT_COLOR,
    }
}

/// Color of a route computed with the given provider filter.
pub fn route_color(filter: Option<Provider>) -> &'static str {
    filter.map(|provider| provider.color()).unwrap_or(DEFAULT_COLOR)
}

/// The value of the provider radio group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr,
)]
pub enum ProviderSelection {
    Named(Provider),
    /// `none`: route without any coverage constraint.
    #[default]
    Unconstrained,
    /// `all`: one route per named provider plus the unconstrained one.
    All,
}

impl ProviderSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Named(provider) => provider.as_str(),
            Self::Unconstrained => "none",
            Self::All => "all",
        }
    }

    /// The provider filter of every route query this selection asks for.
    /// `None` stands for a query without provider parameter.
    pub fn route_filters(&self) -> Vec<Option<Provider>> {
        match self {
            Self::Named(provider) => vec![Some(*provider)],
            Self::Unconstrained => vec![None],
            Self::All => Provider::ALL
                .into_iter()
                .map(Some)
                .chain(std::iter::once(None))
                .collect(),
        }
    }

    /// The single provider whose towers and coverage gaps can be shown.
    pub fn overlay_provider(&self) -> Option<Provider> {
        match self {
            Self::Named(provider) => Some(*provider),
            Self::Unconstrained | Self::All => None,
        }
    }
}

impl From<Provider> for ProviderSelection {
    fn from(provider: Provider) -> Self {
        Self::Named(provider)
    }
}

impl fmt::Display for ProviderSelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderSelection {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::Unconstrained),
            "all" => Ok(Self::All),
            other => other.parse().map(Self::Named),
        }
    }
}

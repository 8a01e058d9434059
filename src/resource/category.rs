//! Resource categories
//!
//! A [`Category`] names one kind of remote resource and doubles as the path
//! segment of its listing endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of remote resource
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Compute instances
    #[default]
    Ecs,
    /// Relational database instances
    Rds,
    /// Load balancers
    Slb,
    /// Tair / Redis instances
    Redis,
    /// PolarDB clusters
    Polardb,
}

impl Category {
    /// Every known category, in display order
    pub const ALL: [Category; 5] = [
        Category::Ecs,
        Category::Rds,
        Category::Slb,
        Category::Redis,
        Category::Polardb,
    ];

    /// Lower-case wire name, used as the listing path segment and search `type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ecs => "ecs",
            Self::Rds => "rds",
            Self::Slb => "slb",
            Self::Redis => "redis",
            Self::Polardb => "polardb",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a name that is not a known category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource category '{0}' (expected one of: ecs, rds, slb, redis, polardb)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive: `"ECS"` and `"ecs"` name the same category
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Which categories a search covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Search every category (wire value `all`)
    #[default]
    All,
    Only(Category),
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
        }
    }
}

impl From<Category> for SearchScope {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

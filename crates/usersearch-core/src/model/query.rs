//! Query vocabulary: filterable fields, sort keys and response modes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Index fields that accept exact-match predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Mail,
    UserId,
    Name,
    Field1,
    Field2,
}

impl FilterField {
    pub const ALL: [Self; 5] = [
        Self::Mail,
        Self::UserId,
        Self::Name,
        Self::Field1,
        Self::Field2,
    ];

    /// Query-string parameter carrying this filter on `GET /search`.
    #[must_use]
    pub const fn param_name(self) -> &'static str {
        match self {
            Self::Mail => "mail",
            Self::UserId => "userid",
            Self::Name => "name",
            Self::Field1 => "field1",
            Self::Field2 => "field2",
        }
    }

    /// Field name as written in textual filter expressions.
    #[must_use]
    pub const fn index_name(self) -> &'static str {
        match self {
            Self::Mail => "Mail",
            Self::UserId => "UserID",
            Self::Name => "Name",
            Self::Field1 => "Field1",
            Self::Field2 => "Field2",
        }
    }

    /// Case-insensitive lookup by index name or parameter name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| {
            field.index_name().eq_ignore_ascii_case(name)
                || field.param_name().eq_ignore_ascii_case(name)
        })
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.index_name())
    }
}

/// Sortable index fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Birthday,
    LastVisit,
    Visits,
}

impl SortField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::LastVisit => "last_visit",
            Self::Visits => "visits",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "birthday" => Ok(Self::Birthday),
            "last_visit" | "lastvisit" => Ok(Self::LastVisit),
            "visits" => Ok(Self::Visits),
            other => Err(CoreError::ParseError(format!("unknown sort field: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// What `GET /search` returns in `Users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Full records resolved from the record store.
    #[default]
    Records,
    /// Stored index projections, skipping the record-store round trip.
    Index,
}

impl ResponseMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Records => "records",
            Self::Index => "index",
        }
    }
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

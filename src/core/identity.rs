//! Entity identity - prefixed ULID identifiers
//!
//! Every entity carries an opaque identifier of the form `PREFIX-ULID`,
//! e.g. `EXG-01J8ZQ2V9K3W5Y7XB4N6MDFGHT`. The prefix makes IDs
//! self-describing when they show up in files or terminal output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

/// Entity type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityPrefix {
    /// Exigence (quality requirement)
    Exg,
    /// Production order
    Ord,
    /// Checklist item
    Itm,
    /// Sample scan
    Smp,
    /// Operation record
    Op,
}

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Exg => "EXG",
            EntityPrefix::Ord => "ORD",
            EntityPrefix::Itm => "ITM",
            EntityPrefix::Smp => "SMP",
            EntityPrefix::Op => "OP",
        }
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EXG" => Ok(EntityPrefix::Exg),
            "ORD" => Ok(EntityPrefix::Ord),
            "ITM" => Ok(EntityPrefix::Itm),
            "SMP" => Ok(EntityPrefix::Smp),
            "OP" => Ok(EntityPrefix::Op),
            other => Err(IdParseError::UnknownPrefix(other.to_string())),
        }
    }
}

/// Errors from parsing an entity ID string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("unknown entity prefix: {0}")]
    UnknownPrefix(String),

    #[error("malformed entity id: {0}")]
    Malformed(String),
}

/// A unique entity identifier (`PREFIX-ULID`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh unique ID with the given prefix
    pub fn new(prefix: EntityPrefix) -> Self {
        Self(format!("{}-{}", prefix.as_str(), Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The entity prefix, if the stored string carries a known one
    pub fn prefix(&self) -> Option<EntityPrefix> {
        self.0.split('-').next()?.parse().ok()
    }

    /// Parse an ID from user input, validating shape and prefix
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let (prefix, ulid) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::Malformed(s.to_string()))?;
        prefix.parse::<EntityPrefix>()?;
        if Ulid::from_string(ulid).is_err() {
            return Err(IdParseError::Malformed(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

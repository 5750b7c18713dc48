//! Material items and kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three kinds of design material the registry accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Block,
    Scaffold,
    Component,
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Scaffold => write!(f, "scaffold"),
            Self::Component => write!(f, "component"),
        }
    }
}

/// One material reference to sync: an npm package at a pinned version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialItem {
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    #[serde(rename = "npm")]
    pub package: String,
    pub version: String,
}

impl MaterialItem {
    /// Wire form: `"{package}@{version}"`.
    pub fn spec(&self) -> String {
        format!("{}@{}", self.package, self.version)
    }
}

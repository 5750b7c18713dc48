//! Registry environments and host resolution.

use std::fmt;

/// Deployment tier of the material registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Environment {
    Daily,
    Staging,
    Production,
}

impl Environment {
    /// Parse an environment name, falling back to [`Environment::Production`]
    /// for anything unrecognized.
    pub fn from_arg(value: &str) -> Self {
        match value {
            "daily" => Self::Daily,
            "staging" => Self::Staging,
            "production" => Self::Production,
            _ => Self::Production,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Which half of the host table applies: the corp network or the public
/// internet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkScope {
    Internal,
    External,
}

/// Immutable mapping from (scope, environment) to a registry base URL.
///
/// Entries may omit an environment; resolution falls back to the scope's
/// production host.
pub struct HostTable {
    internal: &'static [(Environment, &'static str)],
    external: &'static [(Environment, &'static str)],
    internal_production: &'static str,
    external_production: &'static str,
}

impl HostTable {
    /// The registry hosts this client ships with.
    pub const DEFAULT: HostTable = HostTable {
        internal: &[
            (Environment::Daily, "https://materials-daily.atelier-inc.com"),
            (
                Environment::Staging,
                "https://materials-staging.atelier-inc.com",
            ),
            (Environment::Production, "https://materials.atelier-inc.com"),
        ],
        external: &[
            (Environment::Daily, "https://daily.atelier.design"),
            (Environment::Staging, "https://staging.atelier.design"),
            (Environment::Production, "https://atelier.design"),
        ],
        internal_production: "https://materials.atelier-inc.com",
        external_production: "https://atelier.design",
    };

    /// Look up the base URL for a scope and environment.
    ///
    /// Unknown environments resolve to the production host of the requested
    /// scope.
    pub fn resolve(&self, scope: NetworkScope, environment: Environment) -> &'static str {
        let (entries, production) = match scope {
            NetworkScope::Internal => (self.internal, self.internal_production),
            NetworkScope::External => (self.external, self.external_production),
        };
        entries
            .iter()
            .find(|(env, _)| *env == environment)
            .map(|(_, host)| *host)
            .unwrap_or(production)
    }
}

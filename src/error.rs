//! Crate error taxonomy.
//!
//! A named listener whose backing definition vanished between admission and
//! resolution is never surfaced here; the registry excludes it silently at
//! the point of resolution. Everything else fails the lookup.

use crate::resolution::ResolveError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Named listener references are registered but no resolver collaborator
    /// was configured. Fatal; nothing is retried.
    #[error("named listener references are registered but no listener resolver is configured")]
    ResolverNotConfigured,

    /// The resolver failed for a reason other than the definition vanishing.
    #[error("failed to resolve listener '{name}'")]
    Resolution {
        name: String,
        #[source]
        source: ResolveError,
    },
}

pub type Result<T> = std::result::Result<T, RegistryError>;

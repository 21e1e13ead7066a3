//! Curated publisher catalog: trust tiers, the exclusion list, and
//! host-to-publisher resolution.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::news::SourceTier;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    pub name: String,
    #[serde(default)]
    pub domains: Vec<String>,
}

impl Outlet {
    /// True when `host` is one of the outlet's domains or a subdomain of one.
    fn serves_host(&self, host: &str) -> bool {
        self.domains.iter().any(|domain| {
            let domain = domain.trim().to_lowercase();
            !domain.is_empty()
                && (host == domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.')))
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesFile {
    #[serde(default)]
    pub tier1: Vec<Outlet>,
    #[serde(default)]
    pub tier2: Vec<Outlet>,
    #[serde(default)]
    pub tier3: Vec<Outlet>,
    #[serde(default)]
    pub excluded: Vec<Outlet>,
}

/// Validated, queryable view over a [`SourcesFile`].
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    file: SourcesFile,
}

impl SourceCatalog {
    /// Build a catalog from an already-parsed file after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when an outlet name is empty, repeated
    /// within one list, or listed both in a tier and as excluded.
    pub fn new(file: SourcesFile) -> Result<Self, ConfigError> {
        validate_sources(&file)?;
        Ok(Self { file })
    }

    /// Tier of a publisher name. Exclusion wins over any tier listing, and a
    /// name listed in several tiers resolves to the lowest-numbered one.
    #[must_use]
    pub fn tier_of(&self, source: &str) -> SourceTier {
        let named = |outlets: &[Outlet]| outlets.iter().any(|o| o.name == source);

        if named(&self.file.excluded) {
            SourceTier::Excluded
        } else if named(&self.file.tier1) {
            SourceTier::Tier1
        } else if named(&self.file.tier2) {
            SourceTier::Tier2
        } else if named(&self.file.tier3) {
            SourceTier::Tier3
        } else {
            SourceTier::Unknown
        }
    }

    #[must_use]
    pub fn is_excluded(&self, source: &str) -> bool {
        self.tier_of(source) == SourceTier::Excluded
    }

    /// Publisher name for an article host such as `www.hankyung.com`.
    #[must_use]
    pub fn resolve_host(&self, host: &str) -> Option<&str> {
        let host = host.trim().trim_end_matches('.').to_lowercase();
        if host.is_empty() {
            return None;
        }
        self.all_outlets()
            .find(|outlet| outlet.serves_host(&host))
            .map(|outlet| outlet.name.as_str())
    }

    fn all_outlets(&self) -> impl Iterator<Item = &Outlet> {
        self.file
            .tier1
            .iter()
            .chain(&self.file.tier2)
            .chain(&self.file.tier3)
            .chain(&self.file.excluded)
    }
}

/// Load and validate the source catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourceCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: SourcesFile = serde_yaml::from_str(&content)?;
    SourceCatalog::new(file)
}

fn validate_sources(file: &SourcesFile) -> Result<(), ConfigError> {
    let lists = [
        ("tier1", &file.tier1),
        ("tier2", &file.tier2),
        ("tier3", &file.tier3),
        ("excluded", &file.excluded),
    ];

    for (list_name, outlets) in lists {
        let mut seen = HashSet::new();
        for outlet in outlets {
            if outlet.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "outlet name in '{list_name}' must be non-empty"
                )));
            }
            if !seen.insert(outlet.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate outlet '{}' in '{list_name}'",
                    outlet.name
                )));
            }
        }
    }

    let excluded: HashSet<&str> = file.excluded.iter().map(|o| o.name.as_str()).collect();
    if let Some(conflict) = file
        .tier1
        .iter()
        .chain(&file.tier2)
        .chain(&file.tier3)
        .find(|o| excluded.contains(o.name.as_str()))
    {
        return Err(ConfigError::Validation(format!(
            "outlet '{}' is both tiered and excluded",
            conflict.name
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;

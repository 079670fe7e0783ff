//! Asset Lookup: portfolio blurbs and reference links per (technology, person).
//!
//! The catalog is read once at startup and shared read-only behind `Arc`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::info;

use crate::proposal::technology::TechnologyCategory;

/// Returned for either field when the catalog has no entry.
pub const NO_PORTFOLIO: &str = "No portfolio available for this technology.";

/// Returned by `extract_link` when the text holds no URL at all.
pub const PLACEHOLDER_LINK: &str = "https://www.upwork.com/freelancers/";

const EMBEDDED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Hosts that mark a URL as a source repository rather than a portfolio page.
const REPOSITORY_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

type PersonMap = HashMap<String, String>;

/// technology label → person name → text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetCatalog {
    #[serde(default)]
    portfolios: HashMap<String, PersonMap>,
    #[serde(default)]
    git_links: HashMap<String, PersonMap>,
}

/// The (portfolio blurb, reference link) pair used by the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBundle {
    pub portfolio_text: String,
    pub reference_link: String,
}

impl AssetCatalog {
    /// Loads the catalog from `path`, or the copy embedded in the binary.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read catalog at {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("Invalid catalog at {}", path.display()))?
            }
            None => Self::from_json(EMBEDDED_CATALOG).context("Invalid embedded catalog")?,
        };

        info!(
            "Asset catalog loaded: {} portfolio technologies, {} reference-link technologies",
            catalog.portfolios.len(),
            catalog.git_links.len()
        );
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Looks both fields up independently; each falls back to `NO_PORTFOLIO`.
    pub fn lookup(&self, technology: TechnologyCategory, person: &str) -> AssetBundle {
        AssetBundle {
            portfolio_text: find(&self.portfolios, technology, person),
            reference_link: find(&self.git_links, technology, person),
        }
    }
}

fn find(table: &HashMap<String, PersonMap>, technology: TechnologyCategory, person: &str) -> String {
    table
        .get(technology.as_str())
        .and_then(|people| people.get(person))
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_PORTFOLIO)
        .to_string()
}

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>()\[\]"']+"#).expect("url pattern is valid")
});

/// Pulls a bare link out of a portfolio blurb.
///
/// The last non-repository URL wins; failing that the last URL of any kind; failing
/// that `PLACEHOLDER_LINK`.
pub fn extract_link(text: &str) -> String {
    let urls: Vec<&str> = URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']))
        .filter(|url| !url.is_empty())
        .collect();

    urls.iter()
        .rev()
        .find(|url| !is_repository_link(url))
        .or_else(|| urls.last())
        .map(|url| url.to_string())
        .unwrap_or_else(|| PLACEHOLDER_LINK.to_string())
}

fn is_repository_link(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    REPOSITORY_HOSTS.iter().any(|host| lower.contains(host))
}

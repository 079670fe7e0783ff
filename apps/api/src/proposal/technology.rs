//! Technology categories and the three-tier resolution chain
//! (user supplied → analyzer detected → `Fullstack`).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::proposal::normalize::normalize_technology;

/// The closed set of technology labels used for framing and asset lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechnologyCategory {
    #[serde(rename = "AI")]
    Ai,
    Python,
    Frontend,
    Backend,
    Fullstack,
    React,
    Vue,
    Shopify,
    Devops,
}

impl TechnologyCategory {
    pub const ALL: [TechnologyCategory; 9] = [
        TechnologyCategory::Ai,
        TechnologyCategory::Python,
        TechnologyCategory::Frontend,
        TechnologyCategory::Backend,
        TechnologyCategory::Fullstack,
        TechnologyCategory::React,
        TechnologyCategory::Vue,
        TechnologyCategory::Shopify,
        TechnologyCategory::Devops,
    ];

    /// Canonical label, also the catalog key.
    pub fn as_str(self) -> &'static str {
        match self {
            TechnologyCategory::Ai => "AI",
            TechnologyCategory::Python => "Python",
            TechnologyCategory::Frontend => "Frontend",
            TechnologyCategory::Backend => "Backend",
            TechnologyCategory::Fullstack => "Fullstack",
            TechnologyCategory::React => "React",
            TechnologyCategory::Vue => "Vue",
            TechnologyCategory::Shopify => "Shopify",
            TechnologyCategory::Devops => "Devops",
        }
    }

    /// Normalizes free text and checks membership. The literal `"null"` and blank
    /// input are treated as absent.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_technology(Some(raw))?;
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }
}

impl fmt::Display for TechnologyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier of the resolution chain produced the technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnologySource {
    User,
    Detected,
    Fallback,
}

/// Picks the effective technology: a valid user value wins, then the analyzer's
/// detection, then `Fullstack`.
pub fn resolve(
    user_provided: Option<&str>,
    detected: Option<TechnologyCategory>,
) -> (TechnologyCategory, TechnologySource) {
    let (technology, source) = match (user_provided.and_then(TechnologyCategory::parse), detected) {
        (Some(user), _) => (user, TechnologySource::User),
        (None, Some(detected)) => (detected, TechnologySource::Detected),
        (None, None) => (TechnologyCategory::Fullstack, TechnologySource::Fallback),
    };
    debug!(%technology, tier = ?source, "technology resolved");
    (technology, source)
}

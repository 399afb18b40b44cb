//! # Site profile: `site.toml`
//!
//! Content of the static pages (About, Education, Projects) is kept in a TOML
//! file bundled into the binary (filename: [`SiteProfile::filename`] =
//! `"site.toml"`), so updating the portfolio never touches markup.
//!
//! ## Structure
//!
//! ```toml
//! [owner]
//! name = "Portfolio Owner"
//! headline = "..."
//!
//! [about]
//! paragraphs = ["..."]
//! interests = ["..."]
//!
//! [[education]]
//! degree = "..."
//! institution = "..."
//! location = "..."
//! period = "2023-2027"
//! description = "..."
//! achievements = ["..."]
//!
//! [[projects]]
//! name = "..."
//! description = "..."
//! tags = ["rust"]
//! url = "https://..."   # optional
//! ```
//!
//! Everything except `[owner]` may be omitted and defaults to empty.

use serde::{Deserialize, Serialize};

const BUNDLED: &str = include_str!("../site.toml");

/// Top-level content stored in `site.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub owner: Owner,
    #[serde(default)]
    pub about: About,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub headline: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct About {
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub period: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SiteProfile {
    /// The well-known filename for the profile.
    pub fn filename() -> &'static str {
        "site.toml"
    }

    /// The profile compiled into this build.
    pub fn bundled() -> Result<Self, toml::de::Error> {
        Self::from_toml(BUNDLED)
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_profile_parses() {
        let profile = SiteProfile::bundled().unwrap();
        assert!(!profile.owner.name.is_empty());
        assert!(!profile.about.paragraphs.is_empty());
        assert_eq!(profile.education.len(), 2);
        assert!(profile.education[0].achievements.is_empty());
        assert_eq!(profile.education[1].achievements.len(), 2);
        assert!(profile.projects.iter().all(|p| p.url.is_none()));
    }

    #[test]
    fn test_sections_default_to_empty() {
        let profile = SiteProfile::from_toml(
            "[owner]\nname = \"A\"\nheadline = \"B\"\n",
        )
        .unwrap();
        assert_eq!(profile.about, About::default());
        assert!(profile.education.is_empty());
        assert!(profile.projects.is_empty());
    }

    #[test]
    fn test_missing_owner_is_an_error() {
        assert!(SiteProfile::from_toml("[about]\nparagraphs = []\n").is_err());
    }
}

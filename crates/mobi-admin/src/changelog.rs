//! Release history shown in the back-office.

use crate::error::AdminError;
use chrono::NaiveDate;
use mobi_auth::{require, AuthUser, PermAction, Permission, Resource};
use serde::{Deserialize, Serialize};

const BUNDLED: &str = include_str!("../changelog.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Changed,
    Fixed,
    Removed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Changed => "changed",
            ChangeKind::Fixed => "fixed",
            ChangeKind::Removed => "removed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub changes: Vec<Change>,
}

impl Release {
    /// Numeric version parts; anything unparsable counts as zero.
    fn version_key(&self) -> Vec<u64> {
        self.version
            .trim_start_matches('v')
            .split('.')
            .map(|part| part.parse().unwrap_or(0))
            .collect()
    }
}

#[derive(Deserialize)]
struct ChangelogFile {
    #[serde(default)]
    release: Vec<Release>,
}

/// Releases, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    releases: Vec<Release>,
}

impl Changelog {
    /// The history compiled into this crate.
    pub fn bundled() -> Result<Self, AdminError> {
        Self::parse(BUNDLED)
    }

    /// The bundled history, for staff allowed to read it.
    pub fn view(actor: &AuthUser) -> Result<Self, AdminError> {
        require(Some(actor), Permission::new(Resource::Changelog, PermAction::Read))?;
        Self::bundled()
    }

    pub fn parse(source: &str) -> Result<Self, AdminError> {
        let file: ChangelogFile =
            toml::from_str(source).map_err(|e| AdminError::Changelog(e.to_string()))?;
        let mut releases = file.release;
        releases.sort_by(|a, b| {
            b.version_key()
                .cmp(&a.version_key())
                .then_with(|| b.date.cmp(&a.date))
        });
        Ok(Self { releases })
    }

    pub fn latest(&self) -> Option<&Release> {
        self.releases.first()
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

//! Remote community list: descriptors, default selection and loading

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::DEFAULT_COMMUNITY_SENTINEL;
use crate::{Config, Error, Result};

/// A community entry as published in the remote JSON
///
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl CommunityDescriptor {
    /// First non-empty of name, title, id
    pub fn label(&self) -> Option<&str> {
        first_present(&[&self.name, &self.title, &self.id])
    }

    /// Label with the positional placeholder used in lists
    pub fn display_label(&self, index: usize) -> String {
        self.label()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Community {}", index + 1))
    }

    /// First non-empty of logo, image, icon
    pub fn logo_url(&self) -> Option<&str> {
        first_present(&[&self.logo, &self.image, &self.icon])
    }

    /// Case-insensitive sentinel match on name or title only
    fn matches_sentinel(&self, sentinel: &str) -> bool {
        let needle = sentinel.to_lowercase();
        [&self.name, &self.title]
            .iter()
            .filter_map(|f| f.as_deref())
            .any(|v| v.to_lowercase().contains(&needle))
    }
}

fn first_present<'a>(fields: &[&'a Option<String>]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|f| f.as_deref())
        .map(str::trim)
        .find(|v| !v.is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Index of the default community
///
/// The first entry whose name or title contains the sentinel, else the first
/// entry, else none.
pub fn select_default(entries: &[CommunityDescriptor], sentinel: &str) -> Option<usize> {
    entries
        .iter()
        .position(|c| c.matches_sentinel(sentinel))
        .or(if entries.is_empty() { None } else { Some(0) })
}

/// Fetched communities plus the chosen default
#[derive(Debug, Clone, Default)]
pub struct CommunityList {
    entries: Vec<CommunityDescriptor>,
    default_index: Option<usize>,
}

impl CommunityList {
    pub fn new(entries: Vec<CommunityDescriptor>) -> Self {
        let default_index = select_default(&entries, DEFAULT_COMMUNITY_SENTINEL);
        Self { entries, default_index }
    }

    pub fn entries(&self) -> &[CommunityDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_index(&self) -> Option<usize> {
        self.default_index
    }

    pub fn default_entry(&self) -> Option<&CommunityDescriptor> {
        self.default_index.and_then(|i| self.entries.get(i))
    }

    /// Resolve a user query as a list index or a case-insensitive label
    pub fn find(&self, query: &str) -> Option<&CommunityDescriptor> {
        let query = query.trim();
        if let Ok(index) = query.parse::<usize>() {
            if let Some(entry) = self.entries.get(index) {
                return Some(entry);
            }
        }

        let lower = query.to_lowercase();
        self.entries
            .iter()
            .find(|c| c.label().is_some_and(|l| l.to_lowercase() == lower))
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|c| c.label().is_some_and(|l| l.to_lowercase().contains(&lower)))
            })
    }
}

/// One-shot fetcher for the community list
pub struct CommunityLoader {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl CommunityLoader {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.communities_url.clone(),
            timeout: config.fetch_timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the remote list, surfacing every failure
    pub async fn fetch(&self) -> Result<Vec<CommunityDescriptor>> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!("{} returned {}", self.url, status)));
        }

        let bytes = response.bytes().await?;
        let entries: Vec<CommunityDescriptor> = serde_json::from_slice(&bytes)?;
        Ok(entries)
    }

    /// Fetch the list, degrading to an empty one on any failure
    pub async fn load(&self) -> CommunityList {
        match self.fetch().await {
            Ok(entries) => {
                let list = CommunityList::new(entries);
                tracing::info!(
                    "loaded {} communities, default: {:?}",
                    list.len(),
                    list.default_entry().and_then(|c| c.label())
                );
                list
            }
            Err(e) => {
                tracing::warn!("error fetching communities from {}: {}", self.url, e);
                CommunityList::default()
            }
        }
    }
}

use crate::view::Reconciliation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single checklist entry. Ids are unique across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "games", default)]
    pub items: Vec<Item>,
}

/// Shape of the catalog document: `{ "topics": [ { ..., "games": [...] } ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub topics: Vec<Topic>,
}

/// Persisted completion record, stored under a single key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredRecord {
    pub date: String,
    #[serde(default)]
    pub games: BTreeMap<String, bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct QueryParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub item_id: String,
    pub checked: bool,
    pub reconciliation: Reconciliation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollapseResponse {
    pub topic_id: String,
    pub collapsed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicProgress {
    pub topic_id: String,
    pub done: usize,
    pub total: usize,
    pub complete: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub date: String,
    pub done: usize,
    pub total: usize,
    pub topics: Vec<TopicProgress>,
}

use crate::errors::CatalogError;
use crate::models::{CatalogDocument, Item, Topic};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

/// Where the catalog document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// `http://` and `https://` values are fetched, anything else is a path.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    topics: Vec<Topic>,
    // item id -> (topic index, item index)
    index: HashMap<String, (usize, usize)>,
}

impl Catalog {
    /// Validates id uniqueness and builds the item index.
    pub fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        if doc.topics.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut topic_ids = HashSet::new();
        let mut index = HashMap::new();
        for (topic_idx, topic) in doc.topics.iter().enumerate() {
            if !topic_ids.insert(topic.id.as_str()) {
                return Err(CatalogError::DuplicateTopicId(topic.id.clone()));
            }
            for (item_idx, item) in topic.items.iter().enumerate() {
                if index.insert(item.id.clone(), (topic_idx, item_idx)).is_some() {
                    return Err(CatalogError::DuplicateItemId(item.id.clone()));
                }
            }
        }

        Ok(Self {
            topics: doc.topics,
            index,
        })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_slice(bytes)?;
        Self::from_document(doc)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.index
            .get(id)
            .map(|&(topic_idx, item_idx)| &self.topics[topic_idx].items[item_idx])
    }

    /// The topic owning `item_id` in the unfiltered catalog.
    pub fn topic_of_item(&self, item_id: &str) -> Option<&Topic> {
        self.index
            .get(item_id)
            .map(|&(topic_idx, _)| &self.topics[topic_idx])
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn item_count(&self) -> usize {
        self.index.len()
    }
}

/// Terminal outcome of the startup load. There is no retry and no partial
/// catalog.
#[derive(Debug, Clone)]
pub enum CatalogState {
    Loaded(Catalog),
    Failed(String),
}

impl CatalogState {
    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            Self::Loaded(catalog) => Some(catalog),
            Self::Failed(_) => None,
        }
    }
}

pub async fn load_catalog(source: &CatalogSource) -> Result<Catalog, CatalogError> {
    let bytes = match source {
        CatalogSource::File(path) => fs::read(path).await?,
        CatalogSource::Url(url) => {
            let response = reqwest::get(url).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::Status(status.as_u16()));
            }
            response.bytes().await?.to_vec()
        }
    };
    Catalog::from_json(&bytes)
}

/// Loads the catalog and folds any failure into `CatalogState::Failed`.
pub async fn load_catalog_state(source: &CatalogSource) -> CatalogState {
    match load_catalog(source).await {
        Ok(catalog) => {
            info!(
                source = %source,
                topics = catalog.topic_count(),
                items = catalog.item_count(),
                "catalog loaded"
            );
            CatalogState::Loaded(catalog)
        }
        Err(err) => {
            warn!(source = %source, "failed to load catalog: {err}");
            CatalogState::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "topics": [
            {
                "id": "word",
                "name": "Word Games",
                "description": "Guess the word",
                "icon": "fas fa-font",
                "games": [
                    { "id": "wordle", "name": "Wordle", "url": "https://example.com/wordle" },
                    { "id": "connections", "name": "Connections", "url": "https://example.com/c", "favicon": "https://example.com/c.ico" }
                ]
            },
            {
                "id": "geo",
                "name": "Geography",
                "games": [
                    { "id": "worldle", "name": "Worldle", "url": "https://example.com/worldle" }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_document_and_indexes_items() {
        let catalog = Catalog::from_json(DOC.as_bytes()).unwrap();
        assert_eq!(catalog.topic_count(), 2);
        assert_eq!(catalog.item_count(), 3);
        assert_eq!(catalog.item("connections").unwrap().favicon.as_deref(), Some("https://example.com/c.ico"));
        assert_eq!(catalog.topic_of_item("worldle").unwrap().id, "geo");
        assert_eq!(catalog.topic("geo").unwrap().description, "");
        assert!(catalog.item("missing").is_none());
    }

    #[test]
    fn rejects_duplicate_item_ids_across_topics() {
        let doc = r#"{"topics":[
            {"id":"a","name":"A","games":[{"id":"x","name":"X","url":"u"}]},
            {"id":"b","name":"B","games":[{"id":"x","name":"X2","url":"u"}]}
        ]}"#;
        let err = Catalog::from_json(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateItemId(id) if id == "x"));
    }

    #[test]
    fn rejects_duplicate_topic_ids() {
        let doc = r#"{"topics":[{"id":"a","name":"A","games":[]},{"id":"a","name":"B","games":[]}]}"#;
        assert!(matches!(
            Catalog::from_json(doc.as_bytes()),
            Err(CatalogError::DuplicateTopicId(_))
        ));
    }

    #[test]
    fn rejects_malformed_and_empty_documents() {
        assert!(matches!(Catalog::from_json(b"not json"), Err(CatalogError::Parse(_))));
        assert!(matches!(Catalog::from_json(b"{\"other\":1}"), Err(CatalogError::Parse(_))));
        assert!(matches!(Catalog::from_json(b"{\"topics\":[]}"), Err(CatalogError::Empty)));
    }

    #[test]
    fn source_parse_distinguishes_urls() {
        assert_eq!(
            CatalogSource::parse("https://example.com/dailys.json"),
            CatalogSource::Url("https://example.com/dailys.json".to_string())
        );
        assert_eq!(
            CatalogSource::parse("dailys.json"),
            CatalogSource::File(PathBuf::from("dailys.json"))
        );
    }

    #[tokio::test]
    async fn missing_file_becomes_failed_state() {
        let source = CatalogSource::File(std::env::temp_dir().join("dailys_no_such_catalog.json"));
        let state = load_catalog_state(&source).await;
        assert!(matches!(state, CatalogState::Failed(_)));
        assert!(state.catalog().is_none());
    }
}

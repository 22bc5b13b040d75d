use crate::catalog::{Catalog, CatalogState};
use crate::completion::CompletionStore;
use crate::filter::{FilterOutcome, FilterState};
use crate::models::{Item, Topic};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStrategy {
    /// Regenerate the whole tree on every change.
    Full,
    /// Send only the nodes whose state changed.
    Incremental,
}

impl ReconcileStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "incremental" => Some(Self::Incremental),
            _ => None,
        }
    }
}

/// Transient per-topic collapsed flags. Topics never toggled use the default.
#[derive(Debug, Clone)]
pub struct SectionUiState {
    default_collapsed: bool,
    overrides: HashMap<String, bool>,
}

impl SectionUiState {
    pub fn new(default_collapsed: bool) -> Self {
        Self {
            default_collapsed,
            overrides: HashMap::new(),
        }
    }

    pub fn is_collapsed(&self, topic_id: &str) -> bool {
        self.overrides
            .get(topic_id)
            .copied()
            .unwrap_or(self.default_collapsed)
    }

    /// Returns the new collapsed flag.
    pub fn toggle(&mut self, topic_id: &str) -> bool {
        let collapsed = !self.is_collapsed(topic_id);
        self.overrides.insert(topic_id.to_string(), collapsed);
        collapsed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub url: String,
    pub favicon: Option<String>,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    pub topic_id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Computed on the full topic, not on the filtered items.
    pub complete: bool,
    pub collapsed: bool,
    pub done: usize,
    pub total: usize,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    LoadFailed { reason: String },
    NoResults { query: String },
    Sections { sections: Vec<SectionView> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewPatch {
    ItemChecked { item_id: String, checked: bool },
    TopicComplete { topic_id: String, complete: bool },
    SectionCollapsed { topic_id: String, collapsed: bool },
    Progress { topic_id: String, done: usize, total: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Reconciliation {
    Rebuild { view: View },
    Patch { patches: Vec<ViewPatch> },
}

/// Builds the display tree. Completion is always looked up by item id, so a
/// filtered view reports the same state as the unfiltered one.
pub fn project<S: KeyValueStore>(
    catalog: &CatalogState,
    filter: Option<&FilterState<'_>>,
    completion: &CompletionStore<S>,
    sections: &SectionUiState,
) -> View {
    let catalog = match catalog {
        CatalogState::Loaded(catalog) => catalog,
        CatalogState::Failed(reason) => {
            return View::LoadFailed {
                reason: reason.clone(),
            };
        }
    };

    let outcome = filter.map(|state| &state.outcome);
    match outcome {
        None | Some(FilterOutcome::Inactive) => View::Sections {
            sections: unfiltered(catalog, completion, sections),
        },
        Some(FilterOutcome::Matched(matches)) if matches.is_empty() => View::NoResults {
            query: filter.map(|state| state.query.clone()).unwrap_or_default(),
        },
        Some(FilterOutcome::Matched(matches)) => View::Sections {
            sections: matches
                .iter()
                .map(|m| section(m.topic, m.items.iter().copied(), completion, sections))
                .collect(),
        },
    }
}

fn unfiltered<S: KeyValueStore>(
    catalog: &Catalog,
    completion: &CompletionStore<S>,
    sections: &SectionUiState,
) -> Vec<SectionView> {
    catalog
        .topics()
        .iter()
        .map(|topic| section(topic, topic.items.iter(), completion, sections))
        .collect()
}

fn section<'a, S: KeyValueStore>(
    topic: &Topic,
    items: impl Iterator<Item = &'a Item>,
    completion: &CompletionStore<S>,
    sections: &SectionUiState,
) -> SectionView {
    SectionView {
        topic_id: topic.id.clone(),
        name: topic.name.clone(),
        description: topic.description.clone(),
        icon: topic.icon.clone(),
        complete: completion.is_topic_complete(topic),
        collapsed: sections.is_collapsed(&topic.id),
        done: completion.completed_count(topic),
        total: topic.items.len(),
        items: items
            .map(|item| ItemView {
                id: item.id.clone(),
                name: item.name.clone(),
                url: item.url.clone(),
                favicon: item.favicon.clone(),
                checked: completion.is_complete(&item.id),
            })
            .collect(),
    }
}

/// Patches for a single toggled item: the item itself plus its owning topic's
/// completeness and progress. Nothing else in the tree is touched.
pub fn toggle_patches<S: KeyValueStore>(
    catalog: &Catalog,
    completion: &CompletionStore<S>,
    item_id: &str,
) -> Vec<ViewPatch> {
    let mut patches = vec![ViewPatch::ItemChecked {
        item_id: item_id.to_string(),
        checked: completion.is_complete(item_id),
    }];
    if let Some(topic) = catalog.topic_of_item(item_id) {
        patches.push(ViewPatch::TopicComplete {
            topic_id: topic.id.clone(),
            complete: completion.is_topic_complete(topic),
        });
        patches.push(ViewPatch::Progress {
            topic_id: topic.id.clone(),
            done: completion.completed_count(topic),
            total: topic.items.len(),
        });
    }
    patches
}

/// Reconciliation for a toggle. When the day rolled over just before it,
/// other items lost their checks too, so the whole shown tree is diffed.
pub fn reconcile_toggle<S: KeyValueStore>(
    strategy: ReconcileStrategy,
    catalog: &Catalog,
    completion: &CompletionStore<S>,
    item_id: &str,
    rolled_over: bool,
    shown: Option<&View>,
    next: &View,
) -> Reconciliation {
    if strategy == ReconcileStrategy::Incremental && !rolled_over {
        return Reconciliation::Patch {
            patches: toggle_patches(catalog, completion, item_id),
        };
    }
    reconcile(strategy, shown, next)
}

/// Reconciles `next` against the tree the client currently shows. Any change
/// of shape (different panel, sections or items) forces a rebuild.
pub fn reconcile(strategy: ReconcileStrategy, prev: Option<&View>, next: &View) -> Reconciliation {
    let rebuild = || Reconciliation::Rebuild { view: next.clone() };

    if strategy == ReconcileStrategy::Full {
        return rebuild();
    }

    let (prev_sections, next_sections) = match (prev, next) {
        (Some(View::Sections { sections: a }), View::Sections { sections: b }) => (a, b),
        (Some(prev), next) if prev == next => return Reconciliation::Patch { patches: Vec::new() },
        _ => return rebuild(),
    };

    if !same_shape(prev_sections, next_sections) {
        return rebuild();
    }

    let mut patches = Vec::new();
    for (old, new) in prev_sections.iter().zip(next_sections) {
        if old.collapsed != new.collapsed {
            patches.push(ViewPatch::SectionCollapsed {
                topic_id: new.topic_id.clone(),
                collapsed: new.collapsed,
            });
        }
        for (old_item, new_item) in old.items.iter().zip(&new.items) {
            if old_item.checked != new_item.checked {
                patches.push(ViewPatch::ItemChecked {
                    item_id: new_item.id.clone(),
                    checked: new_item.checked,
                });
            }
        }
        if old.complete != new.complete {
            patches.push(ViewPatch::TopicComplete {
                topic_id: new.topic_id.clone(),
                complete: new.complete,
            });
        }
        if old.done != new.done || old.total != new.total {
            patches.push(ViewPatch::Progress {
                topic_id: new.topic_id.clone(),
                done: new.done,
                total: new.total,
            });
        }
    }

    Reconciliation::Patch { patches }
}

fn same_shape(a: &[SectionView], b: &[SectionView]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.topic_id == y.topic_id
                && x.items.len() == y.items.len()
                && x.items.iter().zip(&y.items).all(|(i, j)| i.id == j.id)
        })
}

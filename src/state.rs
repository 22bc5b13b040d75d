use crate::catalog::CatalogState;
use crate::completion::{self, CompletionStore};
use crate::filter::filter;
use crate::storage::FileStore;
use crate::view::{project, ReconcileStrategy, SectionUiState, View};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything mutable lives here; handlers take the lock, run to completion
/// and release it, so user actions are applied one at a time.
pub struct Session {
    pub completion: CompletionStore<FileStore>,
    pub sections: SectionUiState,
    pub query: String,
    /// The tree the client was last sent, used for reconciliation.
    pub shown: Option<View>,
}

impl Session {
    pub fn new(completion: CompletionStore<FileStore>, start_collapsed: bool) -> Self {
        Self {
            completion,
            sections: SectionUiState::new(start_collapsed),
            query: String::new(),
            shown: None,
        }
    }

    /// Applies the daily reset before anything reads completions. Returns
    /// true when the completions were just cleared.
    pub async fn refresh(&mut self) -> bool {
        self.completion.roll_over(completion::today()).await
    }

    pub fn project(&self, catalog: &CatalogState) -> View {
        let filter_state = catalog.catalog().map(|catalog| filter(catalog, &self.query));
        project(catalog, filter_state.as_ref(), &self.completion, &self.sections)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogState>,
    pub strategy: ReconcileStrategy,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(catalog: CatalogState, strategy: ReconcileStrategy, session: Session) -> Self {
        Self {
            catalog: Arc::new(catalog),
            strategy,
            session: Arc::new(Mutex::new(session)),
        }
    }
}

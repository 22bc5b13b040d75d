use crate::completion::date_key;
use crate::errors::AppError;
use crate::models::{
    CollapseResponse, ProgressResponse, QueryParams, ToggleResponse, TopicProgress,
};
use crate::state::AppState;
use crate::ui::{render_page, render_view};
use crate::view::{reconcile_toggle, View};
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use tracing::debug;

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Html<String> {
    let view = show(&state, params.q.clone()).await;
    Html(render_page(&view, &params.q))
}

/// Rendered sections for a new query. Query changes always rebuild.
pub async fn sections(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Html<String> {
    let view = show(&state, params.q).await;
    Html(render_view(&view))
}

pub async fn get_view(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<View> {
    Json(show(&state, params.q).await)
}

pub async fn toggle_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<ToggleResponse>, AppError> {
    let catalog = state
        .catalog
        .catalog()
        .ok_or_else(|| AppError::not_found("catalog failed to load"))?;
    if catalog.item(&item_id).is_none() {
        return Err(AppError::not_found(format!("unknown item '{item_id}'")));
    }

    let mut session = state.session.lock().await;
    let reset = session.refresh().await;
    let checked = session.completion.toggle(&item_id).await?;
    debug!(item = %item_id, checked, "item toggled");

    let next = session.project(&state.catalog);
    let reconciliation = reconcile_toggle(
        state.strategy,
        catalog,
        &session.completion,
        &item_id,
        reset,
        session.shown.as_ref(),
        &next,
    );
    session.shown = Some(next);

    Ok(Json(ToggleResponse {
        item_id,
        checked,
        reconciliation,
    }))
}

pub async fn toggle_section(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> Result<Json<CollapseResponse>, AppError> {
    let known = state
        .catalog
        .catalog()
        .is_some_and(|catalog| catalog.topic(&topic_id).is_some());
    if !known {
        return Err(AppError::not_found(format!("unknown topic '{topic_id}'")));
    }

    let mut session = state.session.lock().await;
    let collapsed = session.sections.toggle(&topic_id);
    let next = session.project(&state.catalog);
    session.shown = Some(next);

    Ok(Json(CollapseResponse {
        topic_id,
        collapsed,
    }))
}

pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressResponse> {
    let mut session = state.session.lock().await;
    session.refresh().await;

    let completion = &session.completion;
    let topics: Vec<TopicProgress> = state
        .catalog
        .catalog()
        .map(|catalog| {
            catalog
                .topics()
                .iter()
                .map(|topic| TopicProgress {
                    topic_id: topic.id.clone(),
                    done: completion.completed_count(topic),
                    total: topic.items.len(),
                    complete: completion.is_topic_complete(topic),
                })
                .collect()
        })
        .unwrap_or_default();

    Json(ProgressResponse {
        date: date_key(completion.as_of()),
        done: topics.iter().map(|topic| topic.done).sum(),
        total: topics.iter().map(|topic| topic.total).sum(),
        topics,
    })
}

async fn show(state: &AppState, query: String) -> View {
    let mut session = state.session.lock().await;
    session.refresh().await;
    session.query = query;
    let view = session.project(&state.catalog);
    session.shown = Some(view.clone());
    view
}

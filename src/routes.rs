use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::RwLock;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::error;

use crate::gemini::GeminiClient;
use crate::models::{Strategy, StrategyInput};
use crate::store::StrategyStore;
use crate::toast::{Toast, ToastBus, ToastKind};
use crate::validation::validate;

#[derive(Clone)]
pub struct AppState {
    pub gemini: Arc<GeminiClient>,
    pub store: Arc<dyn StrategyStore>,
    pub toasts: Arc<ToastBus>,
    /// The single strategy slot; replaced wholesale on each generation.
    pub current: Arc<RwLock<Option<Strategy>>>,
    pub generating: Arc<AtomicBool>,
    pub monetizing: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(gemini: Arc<GeminiClient>, store: Arc<dyn StrategyStore>) -> Self {
        Self {
            gemini,
            store,
            toasts: Arc::new(ToastBus::new()),
            current: Arc::new(RwLock::new(None)),
            generating: Arc::new(AtomicBool::new(false)),
            monetizing: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Clears its in-flight flag on every exit path, including early returns
/// and panics inside the handler.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then_some(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Seed the strategy slot from storage at startup. A present document posts
/// the restore toast; an unreadable one is reported and treated as absent.
pub async fn restore_saved_strategy(state: &AppState) {
    match state.store.load().await {
        Ok(Some(strategy)) => {
            *state.current.write() = Some(strategy);
            state
                .toasts
                .post("Loaded saved strategy from your last session.", ToastKind::Info);
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to load saved strategy: {e}");
            state.toasts.post("Could not load saved strategy.", ToastKind::Error);
        }
    }
}

pub async fn generate_strategy(State(state): State<AppState>, Json(input): Json<StrategyInput>) -> Response {
    let errors = validate(&input);
    if !errors.is_empty() {
        state.toasts.post("Please fill in all required fields.", ToastKind::Error);
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors }))).into_response();
    }

    let Some(_guard) = InFlightGuard::acquire(&state.generating) else {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "a strategy generation is already in progress" })),
        )
            .into_response();
    };

    match state.gemini.generate_strategy(&input).await {
        Ok(generated) => {
            let strategy = Strategy::from_generation(input, generated);
            *state.current.write() = Some(strategy.clone());
            state.toasts.post("Strategy generated successfully!", ToastKind::Success);
            Json(strategy).into_response()
        }
        Err(e) => {
            // The slot is untouched, so the form input stays usable for a retry.
            state.toasts.post(format!("Generation failed: {e}"), ToastKind::Error);
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

pub async fn generate_monetization(State(state): State<AppState>) -> Response {
    let Some(strategy) = state.current.read().clone() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no strategy has been generated yet" })),
        )
            .into_response();
    };

    let Some(_guard) = InFlightGuard::acquire(&state.monetizing) else {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "a monetization plan is already being generated" })),
        )
            .into_response();
    };

    match state.gemini.generate_monetization_plan(&strategy).await {
        Some(plan) => {
            let mut slot = state.current.write();
            if let Some(current) = slot.as_mut() {
                current.monetization_plan = Some(plan);
            }
            let updated = slot.clone();
            drop(slot);
            state
                .toasts
                .post("Monetization plan generated successfully!", ToastKind::Success);
            Json(updated).into_response()
        }
        // The follow-on failing is non-fatal: the strategy is returned
        // unchanged and the view reports the plan as not available.
        None => Json(strategy).into_response(),
    }
}

pub async fn get_strategy(State(state): State<AppState>) -> Response {
    match state.current.read().clone() {
        Some(strategy) => Json(strategy).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn save_strategy(State(state): State<AppState>) -> Response {
    let Some(strategy) = state.current.read().clone() else {
        state.toasts.post("No strategy to save.", ToastKind::Warning);
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.store.save(&strategy).await {
        Ok(()) => {
            state.toasts.post("Strategy saved successfully!", ToastKind::Success);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!("Failed to save strategy: {e}");
            state
                .toasts
                .post("Failed to save strategy. Storage might be full.", ToastKind::Error);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

pub async fn clear_strategy(State(state): State<AppState>) -> Response {
    *state.current.write() = None;
    match state.store.clear().await {
        Ok(()) => {
            state.toasts.post("Strategy has been cleared.", ToastKind::Info);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!("Failed to clear saved strategy: {e}");
            state.toasts.post("Could not clear the saved strategy.", ToastKind::Error);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

pub async fn list_toasts(State(state): State<AppState>) -> Json<Vec<Toast>> {
    Json(state.toasts.active())
}

pub async fn dismiss_toast(Path(id): Path<u64>, State(state): State<AppState>) -> StatusCode {
    state.toasts.dismiss(id);
    StatusCode::NO_CONTENT
}

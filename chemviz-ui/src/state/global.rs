//! Global Application State
//!
//! Reactive state management using Leptos signals. The shell owns the
//! dataset list, the active dataset id and the authenticated flag; the
//! dataset payload is one local resource shared by the table and the charts,
//! so selecting a dataset fetches it once.

use leptos::*;
use std::rc::Rc;

use chemviz::guard::RequestGuard;
use chemviz::model::{AuthTokens, Dataset, DatasetDetail, DatasetId};
use chemviz::session::{SessionContext, SessionError};
use chemviz::view::ChartSet;

use crate::api;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Token storage; its access token is the only proof of login
    pub session: SessionContext,
    /// Recent datasets from the API, most recent first
    pub datasets: RwSignal<Vec<Dataset>>,
    /// Dataset the panels show
    pub current: RwSignal<Option<DatasetId>>,
    /// Whether an access token is stored
    pub authenticated: RwSignal<bool>,
    /// Dataset payload for `current`; `None` when unselected or failed
    pub dataset: Resource<Option<DatasetId>, Option<DatasetDetail>>,
    list_guard: Rc<RequestGuard>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let session = api::browser_session();
    let current = create_rw_signal(None::<DatasetId>);

    let fetch_session = session.clone();
    let dataset = create_local_resource(
        move || current.get(),
        move |id| {
            let session = fetch_session.clone();
            async move {
                let id = id?;
                match api::get_dataset(&session, id).await {
                    Ok(detail) => Some(detail),
                    Err(e) => {
                        log_degraded("dataset", id, &e.to_string());
                        None
                    }
                }
            }
        },
    );

    let state = GlobalState {
        authenticated: create_rw_signal(session.is_authenticated()),
        session,
        datasets: create_rw_signal(Vec::new()),
        current,
        dataset,
        list_guard: Rc::new(RequestGuard::new()),
    };

    provide_context(state);
}

/// Fetch the global state from context
pub fn use_global_state() -> GlobalState {
    expect_context::<GlobalState>()
}

pub(crate) fn log_degraded(what: &str, id: DatasetId, error: &str) {
    web_sys::console::warn_1(&format!("Failed to load {} {}: {}", what, id, error).into());
}

impl GlobalState {
    /// Re-fetch the dataset list. A failure empties it; only the latest
    /// request's answer is applied.
    pub fn refresh_datasets(&self) {
        let ticket = self.list_guard.begin();
        let state = self.clone();

        spawn_local(async move {
            let result = api::list_datasets(&state.session).await;
            if !state.list_guard.is_current(ticket) {
                return;
            }
            match result {
                Ok(datasets) => state.datasets.set(datasets),
                Err(e) => {
                    web_sys::console::warn_1(&format!("Failed to list datasets: {}", e).into());
                    state.datasets.set(Vec::new());
                }
            }
        });
    }

    pub fn select(&self, id: DatasetId) {
        self.current.set(Some(id));
    }

    /// A finished upload becomes the active dataset and the list reloads
    pub fn on_upload_success(&self, id: DatasetId) {
        self.select(id);
        self.refresh_datasets();
    }

    /// Persist a freshly issued token pair and flip the flag
    pub fn sign_in(&self, tokens: &AuthTokens) -> Result<(), SessionError> {
        self.session.save(tokens)?;
        self.authenticated.set(true);
        self.refresh_datasets();
        Ok(())
    }

    /// Forget both tokens. The server is not told.
    pub fn sign_out(&self) {
        if let Err(e) = self.session.clear() {
            web_sys::console::warn_1(&format!("Failed to clear session: {}", e).into());
        }
        self.authenticated.set(false);
    }

    /// Chart projections of the loaded dataset
    pub fn charts(&self) -> Option<ChartSet> {
        self.dataset
            .get()
            .flatten()
            .map(|detail| ChartSet::from_detail(&detail))
    }
}

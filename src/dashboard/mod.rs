//! Dashboard Shell
//!
//! Owns the dataset list, the active dataset id and the session, and wires
//! the panels together. Data flows one way: an upload publishes
//! [`DashboardEvent::DatasetListChanged`], the event loop re-fetches the list
//! and the panels re-fetch by the active id.

mod charts;
mod summary;
mod table;
mod upload;

pub use charts::ChartsPanel;
pub use summary::SummaryPanel;
pub use table::TablePanel;
pub use upload::UploadPanel;
pub use crate::view::status::{
    upload_success_message, StatusMessage, AUTH_FALLBACK, NO_FILE_MESSAGE, REPORT_FALLBACK,
    UPLOAD_FALLBACK,
};

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use crate::api::{DatasetApi, UploadFile};
use crate::error::ClientResult;
use crate::model::{Dataset, DatasetId, UploadResponse};
use crate::routes::Route;
use crate::session::SessionContext;
use crate::store::DatasetStore;

const EVENT_CAPACITY: usize = 64;

/// State changes other parts of the dashboard react to
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// The server-side dataset list changed (upload finished)
    DatasetListChanged { dataset_id: DatasetId },
    /// The list was re-fetched
    DatasetsRefreshed { count: usize },
    /// The active dataset changed
    DatasetSelected { dataset_id: Option<DatasetId> },
    /// Login, register or logout happened
    SessionChanged { authenticated: bool },
}

/// Shell settings
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub report_dir: PathBuf,
}

#[derive(Debug, Default)]
struct ShellState {
    datasets: Vec<Dataset>,
    active: Option<DatasetId>,
    /// Ids the server has reported through a list or upload response
    known: HashSet<DatasetId>,
}

pub struct Dashboard {
    api: Arc<dyn DatasetApi>,
    session: SessionContext,
    state: RwLock<ShellState>,
    events: broadcast::Sender<DashboardEvent>,
    upload: UploadPanel,
    summary: SummaryPanel,
    table: TablePanel,
    charts: ChartsPanel,
}

impl Dashboard {
    pub fn new(api: Arc<dyn DatasetApi>, session: SessionContext, config: DashboardConfig) -> Self {
        let store = Arc::new(DatasetStore::new(api.clone()));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            upload: UploadPanel::new(api.clone()),
            summary: SummaryPanel::new(api.clone(), config.report_dir),
            table: TablePanel::new(store.clone()),
            charts: ChartsPanel::new(store),
            api,
            session,
            state: RwLock::new(ShellState::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: DashboardEvent) {
        tracing::debug!(event = ?event, "Dashboard event");
        // No receivers is fine
        let _ = self.events.send(event);
    }

    pub fn upload_panel(&self) -> &UploadPanel {
        &self.upload
    }

    pub fn summary_panel(&self) -> &SummaryPanel {
        &self.summary
    }

    pub fn table_panel(&self) -> &TablePanel {
        &self.table
    }

    pub fn charts_panel(&self) -> &ChartsPanel {
        &self.charts
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub async fn datasets(&self) -> Vec<Dataset> {
        self.state.read().await.datasets.clone()
    }

    pub async fn active_dataset(&self) -> Option<DatasetId> {
        self.state.read().await.active
    }

    /// Re-fetch the dataset list. A failure empties the list.
    pub async fn refresh_datasets(&self) -> usize {
        let datasets = match self.api.list_datasets().await {
            Ok(datasets) => datasets,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load datasets");
                Vec::new()
            }
        };

        let count = datasets.len();
        {
            let mut state = self.state.write().await;
            state.known.extend(datasets.iter().map(|d| d.id));
            state.datasets = datasets;
        }

        self.publish(DashboardEvent::DatasetsRefreshed { count });
        count
    }

    /// Make a listed dataset active. Unknown ids are ignored.
    pub async fn select(&self, id: DatasetId) -> bool {
        {
            let mut state = self.state.write().await;
            if !state.known.contains(&id) {
                tracing::warn!(dataset_id = id, "Ignoring selection of unknown dataset");
                return false;
            }
            state.active = Some(id);
        }
        self.publish(DashboardEvent::DatasetSelected {
            dataset_id: Some(id),
        });
        true
    }

    async fn activate(&self, id: DatasetId) {
        self.state.write().await.active = Some(id);
        self.publish(DashboardEvent::DatasetSelected {
            dataset_id: Some(id),
        });
    }

    /// Visit a route and return where the user ends up. A dataset link
    /// activates its id even before the list has been fetched.
    pub async fn navigate(&self, route: &Route) -> Route {
        let nav = route.resolve();
        if let Some(id) = nav.select {
            self.activate(id).await;
        }
        nav.destination(route)
    }

    /// Record a finished upload: its dataset becomes active and the list is
    /// marked stale.
    pub async fn on_upload_success(&self, response: &UploadResponse) {
        {
            let mut state = self.state.write().await;
            state.known.insert(response.dataset_id);
            state.active = Some(response.dataset_id);
        }
        self.publish(DashboardEvent::DatasetSelected {
            dataset_id: Some(response.dataset_id),
        });
        self.publish(DashboardEvent::DatasetListChanged {
            dataset_id: response.dataset_id,
        });
    }

    pub async fn upload(&self, file: Option<UploadFile>) -> ClientResult<UploadResponse> {
        let response = self.upload.submit(file).await?;
        self.on_upload_success(&response).await;
        Ok(response)
    }

    /// React to one event
    pub async fn handle_event(&self, event: &DashboardEvent) {
        if let DashboardEvent::DatasetListChanged { .. } = event {
            self.refresh_datasets().await;
        }
    }

    /// Run [`Dashboard::handle_event`] for every published event until the
    /// dashboard is dropped
    pub fn spawn_event_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        let weak = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let Some(dashboard) = weak.upgrade() else {
                            break;
                        };
                        dashboard.handle_event(&event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Dashboard event loop lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Load every panel for the active dataset
    pub async fn load_panels(&self) -> Option<DatasetId> {
        let Some(id) = self.active_dataset().await else {
            tokio::join!(self.summary.clear(), self.table.clear(), self.charts.clear());
            return None;
        };

        tokio::join!(self.summary.load(id), self.table.load(id), self.charts.load(id));
        Some(id)
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        let tokens = self.api.login(username, password).await?;
        self.session.save(&tokens)?;
        self.publish(DashboardEvent::SessionChanged {
            authenticated: true,
        });
        Ok(())
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> ClientResult<()> {
        let tokens = self.api.register(username, password, email).await?;
        self.session.save(&tokens)?;
        self.publish(DashboardEvent::SessionChanged {
            authenticated: true,
        });
        Ok(())
    }

    /// Forget the session locally
    pub fn logout(&self) -> ClientResult<()> {
        self.session.clear()?;
        self.publish(DashboardEvent::SessionChanged {
            authenticated: false,
        });
        Ok(())
    }
}

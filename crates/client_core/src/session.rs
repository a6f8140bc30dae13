use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use futures::future::join_all;
use shared::{
    domain::{BulkJobId, CourseInstanceId, CourseInstanceRecord, FilterKind},
    protocol::{CourseInstancePage, CourseInstanceQuery, CreateBulkJobRequest, PageSeed},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

use crate::{
    api::{CatalogApi, MissingCatalogApi},
    error::{BulkJobError, FetchError, FilterError},
    filters::FilterState,
    selection::{SelectionSummary, SummarySnapshot},
    types::LoadOutcome,
};

/// Notifications telling renderers which part of the state to re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    FiltersChanged(FilterKind),
    SummaryChanged,
    SelectionChanged,
    Error(String),
}

/// Page-session root: owns the filter state, the selection summary and the
/// sticky error flag, and drives both models from the catalog API.
///
/// No lock is held across a network await, so every state transition is
/// applied within a single lock scope and responses are matched to their
/// request by generation ticket.
pub struct SelectionSession {
    api: Arc<dyn CatalogApi>,
    filters: Mutex<FilterState>,
    selection: Mutex<SelectionSummary>,
    has_error: AtomicBool,
    events: broadcast::Sender<SessionEvent>,
}

impl SelectionSession {
    pub fn new(api: Arc<dyn CatalogApi>, seed: &PageSeed) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            filters: Mutex::new(FilterState::from_seed(seed)),
            selection: Mutex::new(SelectionSummary::new()),
            has_error: AtomicBool::new(false),
            events,
        })
    }

    /// Session over the seed alone; every remote load fails.
    pub fn offline(seed: &PageSeed) -> Arc<Self> {
        Self::new(Arc::new(MissingCatalogApi), seed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn has_error(&self) -> bool {
        self.has_error.load(Ordering::SeqCst)
    }

    /// The flag is never cleared by the session itself.
    pub fn clear_error(&self) {
        self.has_error.store(false, Ordering::SeqCst);
    }

    pub async fn filters_snapshot(&self) -> FilterState {
        self.filters.lock().await.clone()
    }

    pub async fn summary_snapshot(&self) -> SummarySnapshot {
        self.selection.lock().await.snapshot()
    }

    /// Reloads one option list. School-scoped lists are emptied instead of
    /// fetched while no school is selected.
    pub async fn load_filter_options(&self, kind: FilterKind) -> LoadOutcome {
        let ticket = {
            let mut filters = self.filters.lock().await;
            let unscoped = filters.selected_filter_id(FilterKind::School).is_empty();
            if kind != FilterKind::School && unscoped {
                filters.reset_dimension(kind);
                None
            } else {
                Some(filters.begin_load(kind))
            }
        };
        self.emit(SessionEvent::FiltersChanged(kind));
        let Some(ticket) = ticket else {
            debug!(%kind, "filters: no school selected, skipping load");
            return LoadOutcome::Skipped;
        };

        let result = match kind {
            FilterKind::School => self.api.fetch_schools().await,
            _ => {
                self.api
                    .fetch_filter_options(kind, &ticket.school_id)
                    .await
            }
        };
        let failure = failure_message(&result);

        let outcome = self.filters.lock().await.complete_load(&ticket, result);
        match outcome {
            LoadOutcome::Stale => {}
            LoadOutcome::Failed => {
                self.emit(SessionEvent::FiltersChanged(kind));
                self.raise_error(format!(
                    "failed to load {kind} options: {}",
                    failure.unwrap_or_default()
                ));
            }
            _ => self.emit(SessionEvent::FiltersChanged(kind)),
        }
        outcome
    }

    pub async fn load_course_instance_summary(&self) -> LoadOutcome {
        // Filters before selection, held together so the ticket matches the scope.
        let ticket = {
            let filters = self.filters.lock().await;
            let mut selection = self.selection.lock().await;
            selection.begin_summary_load(
                filters.selected_filter_id(FilterKind::Term),
                filters.account_filter_id(),
            )
        };
        let Some(ticket) = ticket else {
            return LoadOutcome::Skipped;
        };
        self.emit(SessionEvent::SummaryChanged);

        let result = self
            .api
            .fetch_course_instance_summary(&ticket.term_id, &ticket.account_id)
            .await;
        let failure = failure_message(&result);

        let outcome = self
            .selection
            .lock()
            .await
            .complete_summary_load(&ticket, result);
        if outcome != LoadOutcome::Stale {
            self.emit(SessionEvent::SummaryChanged);
        }
        if outcome.is_failure() {
            self.raise_error(format!(
                "failed to load course instance summary: {}",
                failure.unwrap_or_default()
            ));
        }
        outcome
    }

    /// Applies a user choice and reloads what depends on it: a new school
    /// reloads the school-scoped option lists, and every change reloads the
    /// summary counts.
    pub async fn select_filter(&self, kind: FilterKind, id: &str) -> Result<bool, FilterError> {
        let changed = self.filters.lock().await.select(kind, id)?;
        if !changed {
            return Ok(false);
        }
        info!(%kind, id, "filters: selection changed");
        self.emit(SessionEvent::FiltersChanged(kind));

        if kind == FilterKind::School {
            let dependents = [
                FilterKind::Term,
                FilterKind::Department,
                FilterKind::CourseGroup,
            ];
            join_all(dependents.map(|dependent| self.load_filter_options(dependent))).await;
        }
        self.load_course_instance_summary().await;
        Ok(true)
    }

    /// One page of course instances for the current scope, or `None` when
    /// no term is selected.
    pub async fn list_course_instances(
        &self,
        query: &CourseInstanceQuery,
    ) -> Result<Option<CourseInstancePage>, FetchError> {
        let (term_id, account_id) = self.summary_scope().await;
        if term_id.is_empty() {
            return Ok(None);
        }
        match self
            .api
            .fetch_course_instances(&term_id, &account_id, query)
            .await
        {
            Ok(page) => Ok(Some(page)),
            Err(err) => {
                if !err.is_cancelled() {
                    self.raise_error(format!("failed to list course instances: {err}"));
                }
                Err(err)
            }
        }
    }

    /// Submits the selected course instances as a bulk site creation job
    /// scoped by the current filters.
    pub async fn create_bulk_job(
        &self,
        template: Option<String>,
    ) -> Result<BulkJobId, BulkJobError> {
        let filters = {
            let filters = self.filters.lock().await;
            for kind in [FilterKind::School, FilterKind::Term] {
                if filters.selected_filter_id(kind).is_empty() {
                    return Err(BulkJobError::MissingFilter(kind));
                }
            }
            filters.selected_filters()
        };
        let course_instance_ids: Vec<CourseInstanceId> = self
            .selection
            .lock()
            .await
            .selected_courses()
            .into_iter()
            .map(|record| record.id)
            .collect();
        if course_instance_ids.is_empty() {
            return Err(BulkJobError::NothingSelected);
        }

        let request = CreateBulkJobRequest {
            template: template.filter(|t| !t.trim().is_empty()),
            filters,
            course_instance_ids,
        };
        info!(courses = request.course_instance_ids.len(), "session: creating bulk job");
        self.api.create_bulk_job(&request).await.map_err(|err| {
            self.raise_error(format!("failed to create bulk job: {err}"));
            BulkJobError::from(err)
        })
    }

    pub async fn add_selected_course_instance(&self, record: CourseInstanceRecord) -> bool {
        let added = self
            .selection
            .lock()
            .await
            .add_selected_course_instance(record);
        self.emit(SessionEvent::SelectionChanged);
        added
    }

    pub async fn remove_selected_course_instance(&self, record: &CourseInstanceRecord) -> bool {
        let removed = self
            .selection
            .lock()
            .await
            .remove_selected_course_instance(record);
        if removed {
            self.emit(SessionEvent::SelectionChanged);
        }
        removed
    }

    pub async fn is_selected(&self, id: &CourseInstanceId) -> bool {
        self.selection.lock().await.is_selected(id)
    }

    pub async fn selected_course_ids_count(&self) -> usize {
        self.selection.lock().await.selected_course_ids_count()
    }

    pub async fn selected_courses(&self) -> Vec<CourseInstanceRecord> {
        self.selection.lock().await.selected_courses()
    }

    pub async fn clear_selection(&self) -> usize {
        let removed = self.selection.lock().await.clear_selection();
        if removed > 0 {
            self.emit(SessionEvent::SelectionChanged);
        }
        removed
    }

    async fn summary_scope(&self) -> (String, String) {
        let filters = self.filters.lock().await;
        (
            filters.selected_filter_id(FilterKind::Term).to_string(),
            filters.account_filter_id().to_string(),
        )
    }

    fn raise_error(&self, message: String) {
        self.has_error.store(true, Ordering::SeqCst);
        error!(%message, "session: error raised");
        self.emit(SessionEvent::Error(message));
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

fn failure_message<T>(result: &Result<T, FetchError>) -> Option<String> {
    result.as_ref().err().map(ToString::to_string)
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

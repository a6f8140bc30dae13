use std::collections::HashMap;

use shared::{
    domain::{CourseInstanceId, CourseInstanceRecord},
    protocol::CourseInstanceSummaryResponse,
};
use tracing::{debug, warn};

use crate::{error::FetchError, types::LoadOutcome};

/// Course counts for the current term/account scope, split by whether a
/// Canvas site already exists and which legacy site type is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounters {
    pub total_courses: u64,
    pub total_courses_with_canvas_site: u64,
    pub total_courses_with_canvas_site_with_isite: u64,
    pub total_courses_with_canvas_site_with_external: u64,
    pub total_courses_without_canvas_site: u64,
    pub total_courses_without_canvas_site_with_isite: u64,
    pub total_courses_without_canvas_site_with_external: u64,
}

impl From<CourseInstanceSummaryResponse> for SummaryCounters {
    fn from(value: CourseInstanceSummaryResponse) -> Self {
        Self {
            total_courses: value.records_total,
            total_courses_with_canvas_site: value.records_total_with_canvas_site,
            total_courses_with_canvas_site_with_isite: value
                .records_total_with_canvas_site_with_i_site,
            total_courses_with_canvas_site_with_external: value
                .records_total_with_canvas_site_with_external,
            total_courses_without_canvas_site: value.records_total_without_canvas_site,
            total_courses_without_canvas_site_with_isite: value
                .records_total_without_canvas_site_with_i_site,
            total_courses_without_canvas_site_with_external: value
                .records_total_without_canvas_site_with_external,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTicket {
    pub generation: u64,
    pub term_id: String,
    pub account_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummarySnapshot {
    pub counters: SummaryCounters,
    pub data_loading: bool,
    pub data_loaded: bool,
    pub selected_count: usize,
}

/// Selected course instances, keyed by id, and the aggregate counters.
#[derive(Debug, Clone, Default)]
pub struct SelectionSummary {
    selected: HashMap<CourseInstanceId, CourseInstanceRecord>,
    counters: SummaryCounters,
    data_loading: bool,
    data_loaded: bool,
    generation: u64,
}

impl SelectionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites by id. Returns true when the id was not
    /// selected before.
    pub fn add_selected_course_instance(&mut self, record: CourseInstanceRecord) -> bool {
        self.selected.insert(record.id.clone(), record).is_none()
    }

    /// Returns true when the id was selected.
    pub fn remove_selected_course_instance(&mut self, record: &CourseInstanceRecord) -> bool {
        self.remove_by_id(&record.id)
    }

    pub fn remove_by_id(&mut self, id: &CourseInstanceId) -> bool {
        self.selected.remove(id).is_some()
    }

    pub fn is_selected(&self, id: &CourseInstanceId) -> bool {
        self.selected.contains_key(id)
    }

    pub fn selected_course_ids_count(&self) -> usize {
        self.selected.len()
    }

    /// Snapshot of the selected records in no particular order.
    pub fn selected_courses(&self) -> Vec<CourseInstanceRecord> {
        self.selected.values().cloned().collect()
    }

    pub fn clear_selection(&mut self) -> usize {
        let removed = self.selected.len();
        self.selected.clear();
        removed
    }

    pub fn counters(&self) -> SummaryCounters {
        self.counters
    }

    pub fn data_loading(&self) -> bool {
        self.data_loading
    }

    pub fn data_loaded(&self) -> bool {
        self.data_loaded
    }

    pub fn snapshot(&self) -> SummarySnapshot {
        SummarySnapshot {
            counters: self.counters,
            data_loading: self.data_loading,
            data_loaded: self.data_loaded,
            selected_count: self.selected.len(),
        }
    }

    /// Starts a summary load for the given scope. Without a term nothing is
    /// requested and the current counters are kept.
    pub fn begin_summary_load(&mut self, term_id: &str, account_id: &str) -> Option<SummaryTicket> {
        let term_id = term_id.trim();
        if term_id.is_empty() {
            debug!("summary: no term selected, skipping load");
            return None;
        }
        self.generation += 1;
        self.counters = SummaryCounters::default();
        self.data_loading = true;
        debug!(generation = self.generation, term_id, account_id, "summary: load started");
        Some(SummaryTicket {
            generation: self.generation,
            term_id: term_id.to_string(),
            account_id: account_id.trim().to_string(),
        })
    }

    pub fn complete_summary_load(
        &mut self,
        ticket: &SummaryTicket,
        result: Result<CourseInstanceSummaryResponse, FetchError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "summary: dropping stale response"
            );
            return LoadOutcome::Stale;
        }

        self.data_loading = false;
        match result {
            Ok(response) => {
                self.counters = response.into();
                self.data_loaded = true;
                debug!(total = self.counters.total_courses, "summary: counters replaced");
                LoadOutcome::Applied
            }
            Err(FetchError::Cancelled) => {
                debug!(term_id = %ticket.term_id, "summary: request cancelled, ignoring");
                LoadOutcome::Cancelled
            }
            Err(err) => {
                warn!(
                    term_id = %ticket.term_id,
                    account_id = %ticket.account_id,
                    error = %err,
                    "summary: load failed"
                );
                LoadOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;

use std::collections::BTreeMap;

use shared::{
    domain::{FilterKind, FilterOption, DEFAULT_FILTER_ID},
    protocol::PageSeed,
};
use tracing::{debug, warn};

use crate::{
    error::{FetchError, FilterError},
    types::LoadOutcome,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDimension {
    options: Vec<FilterOption>,
    selected: String,
    loading: bool,
    disabled: bool,
    generation: u64,
}

impl FilterDimension {
    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// Raw selection, which may be the synthetic default id.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn contains(&self, id: &str) -> bool {
        self.options.iter().any(|option| option.id == id)
    }
}

/// Issued by [`FilterState::begin_load`]; only the ticket with the latest
/// generation for its dimension may apply a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterLoadTicket {
    pub kind: FilterKind,
    pub generation: u64,
    pub school_id: String,
}

/// The four cascading filter dimensions: school, term, department and
/// course group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    dimensions: [FilterDimension; 4],
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Startup state: pre-selected values first, then the seeded option
    /// lists. Kinds without a seeded list end up with no options.
    pub fn from_seed(seed: &PageSeed) -> Self {
        let mut state = Self::default();
        for (kind, id) in &seed.filters {
            state.dimension_mut(*kind).selected = id.trim().to_string();
        }
        state.init_filter_options(
            FilterKind::ALL.map(|kind| (kind, seed.options_for(kind).cloned().unwrap_or_default())),
        );
        state
    }

    pub fn dimension(&self, kind: FilterKind) -> &FilterDimension {
        &self.dimensions[kind.index()]
    }

    fn dimension_mut(&mut self, kind: FilterKind) -> &mut FilterDimension {
        &mut self.dimensions[kind.index()]
    }

    pub fn options(&self, kind: FilterKind) -> &[FilterOption] {
        self.dimension(kind).options()
    }

    pub fn is_loading(&self, kind: FilterKind) -> bool {
        self.dimension(kind).is_loading()
    }

    pub fn is_disabled(&self, kind: FilterKind) -> bool {
        self.dimension(kind).is_disabled()
    }

    /// Replaces the options of every listed dimension, prepends the
    /// synthetic default where it applies and defaults unset selections to
    /// the first option.
    pub fn init_filter_options<I>(&mut self, lists: I)
    where
        I: IntoIterator<Item = (FilterKind, Vec<FilterOption>)>,
    {
        for (kind, options) in lists {
            let mut options: Vec<FilterOption> = options
                .into_iter()
                .filter(|option| {
                    let keep = !option.id.trim().is_empty() && !option.is_default();
                    if !keep {
                        warn!(%kind, id = %option.id, "filters: dropping option with reserved or empty id");
                    }
                    keep
                })
                .collect();

            if !options.is_empty() && (options.len() > 1 || kind.always_show_default()) {
                options.insert(0, FilterOption::synthetic_default(kind));
            }

            let dimension = self.dimension_mut(kind);
            dimension.options = options;
            if !dimension.selected.is_empty() && !dimension.contains(&dimension.selected) {
                debug!(%kind, selected = %dimension.selected, "filters: selection not among options, resetting");
                dimension.selected.clear();
            }
            if dimension.selected.is_empty() {
                if let Some(first) = dimension.options.first() {
                    dimension.selected = first.id.clone();
                }
            }
        }
        self.refresh_disabled();
    }

    /// First half of an option reload: clears the dimension, marks it
    /// loading and hands out the ticket its response must present.
    pub fn begin_load(&mut self, kind: FilterKind) -> FilterLoadTicket {
        let school_id = self.selected_filter_id(FilterKind::School).to_string();
        let dimension = self.dimension_mut(kind);
        dimension.selected.clear();
        dimension.options.clear();
        dimension.loading = true;
        dimension.generation += 1;
        let ticket = FilterLoadTicket {
            kind,
            generation: dimension.generation,
            school_id,
        };
        self.refresh_disabled();
        debug!(%kind, generation = ticket.generation, school_id = %ticket.school_id, "filters: load started");
        ticket
    }

    /// Empties a dimension without a request. In-flight responses for it
    /// become stale.
    pub fn reset_dimension(&mut self, kind: FilterKind) {
        let dimension = self.dimension_mut(kind);
        dimension.selected.clear();
        dimension.options.clear();
        dimension.loading = false;
        dimension.generation += 1;
        self.refresh_disabled();
    }

    pub fn complete_load(
        &mut self,
        ticket: &FilterLoadTicket,
        result: Result<Vec<FilterOption>, FetchError>,
    ) -> LoadOutcome {
        let kind = ticket.kind;
        let current = self.dimension(kind).generation;
        if ticket.generation != current {
            debug!(%kind, generation = ticket.generation, current, "filters: dropping stale response");
            return LoadOutcome::Stale;
        }

        self.dimension_mut(kind).loading = false;
        let outcome = match result {
            Ok(options) => {
                debug!(%kind, count = options.len(), "filters: options loaded");
                self.init_filter_options([(kind, options)]);
                LoadOutcome::Applied
            }
            Err(FetchError::Cancelled) => {
                debug!(%kind, "filters: load cancelled");
                LoadOutcome::Cancelled
            }
            Err(err) => {
                warn!(%kind, error = %err, "filters: load failed");
                LoadOutcome::Failed
            }
        };
        self.refresh_disabled();
        outcome
    }

    /// User choice. The id must be one of the current options (the
    /// synthetic default included), or empty to clear the selection.
    /// Returns whether the selection changed.
    pub fn select(&mut self, kind: FilterKind, id: &str) -> Result<bool, FilterError> {
        let id = id.trim();
        let dimension = self.dimension_mut(kind);
        if !id.is_empty() && !dimension.contains(id) {
            return Err(FilterError::UnknownOption {
                kind,
                id: id.to_string(),
            });
        }
        if dimension.selected == id {
            return Ok(false);
        }
        dimension.selected = id.to_string();
        self.refresh_disabled();
        Ok(true)
    }

    pub fn is_filter_selectable(&self, kind: FilterKind) -> bool {
        self.options(kind).len() > 1
    }

    /// The real selection, or `""` when nothing or the synthetic default is selected.
    pub fn selected_filter_id(&self, kind: FilterKind) -> &str {
        let selected = self.dimension(kind).selected();
        if selected == DEFAULT_FILTER_ID {
            ""
        } else {
            selected
        }
    }

    pub fn selected_filter_name(&self, kind: FilterKind) -> &str {
        let id = self.selected_filter_id(kind);
        if id.is_empty() {
            return "";
        }
        self.options(kind)
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.name.as_str())
            .unwrap_or("")
    }

    /// Query payload for summary and listing requests: every dimension
    /// whose value is not the synthetic default.
    pub fn selected_filters(&self) -> BTreeMap<FilterKind, String> {
        FilterKind::ALL
            .into_iter()
            .filter(|kind| self.dimension(*kind).selected() != DEFAULT_FILTER_ID)
            .map(|kind| (kind, self.dimension(kind).selected().to_string()))
            .collect()
    }

    /// Most specific organizational scope: course group, then department,
    /// then school.
    pub fn account_filter_id(&self) -> &str {
        [
            FilterKind::CourseGroup,
            FilterKind::Department,
            FilterKind::School,
        ]
        .into_iter()
        .map(|kind| self.selected_filter_id(kind))
        .find(|id| !id.is_empty())
        .unwrap_or("")
    }

    fn refresh_disabled(&mut self) {
        let school_unresolved = self.selected_filter_id(FilterKind::School).is_empty();
        for kind in [FilterKind::Department, FilterKind::CourseGroup] {
            self.dimension_mut(kind).disabled = school_unresolved;
        }
    }
}

#[cfg(test)]
#[path = "tests/filters_tests.rs"]
mod tests;

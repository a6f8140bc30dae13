use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{CourseInstanceId, CourseInstanceRecord, FilterKind, FilterOption};

/// Form field of the `create_job` POST that carries the JSON payload.
pub const CREATE_JOB_FORM_FIELD: &str = "data";

/// Aggregate counts returned by the `course_instance_summary` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInstanceSummaryResponse {
    pub records_total: u64,
    pub records_total_with_canvas_site: u64,
    pub records_total_with_canvas_site_with_i_site: u64,
    pub records_total_with_canvas_site_with_external: u64,
    pub records_total_without_canvas_site: u64,
    pub records_total_without_canvas_site_with_i_site: u64,
    pub records_total_without_canvas_site_with_external: u64,
}

/// One page of the `course_instances` listing. The server repeats the
/// summary counters alongside the rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInstancePage {
    #[serde(flatten)]
    pub summary: CourseInstanceSummaryResponse,
    #[serde(default)]
    pub draw: u64,
    pub data: Vec<CourseInstanceRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Paging, sorting and search parameters of the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseInstanceQuery {
    pub draw: u64,
    pub start: u64,
    pub length: u64,
    #[serde(rename = "order[0][column]")]
    pub order_column: u32,
    #[serde(rename = "order[0][dir]")]
    pub order_dir: SortDirection,
    #[serde(rename = "search[value]", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for CourseInstanceQuery {
    fn default() -> Self {
        Self {
            draw: 0,
            start: 0,
            length: 10,
            order_column: 3,
            order_dir: SortDirection::Asc,
            search: None,
        }
    }
}

/// Payload of a bulk site creation job: the filter scope the courses were
/// chosen under, the selected course instances and an optional template
/// course to copy content from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBulkJobRequest {
    pub template: Option<String>,
    pub filters: BTreeMap<FilterKind, String>,
    pub course_instance_ids: Vec<CourseInstanceId>,
}

/// Startup globals rendered into the page by the server: pre-selected
/// filter values and the initial option lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSeed {
    #[serde(default)]
    pub filters: HashMap<FilterKind, String>,
    #[serde(default)]
    pub schools: Option<Vec<FilterOption>>,
    #[serde(default)]
    pub terms: Option<Vec<FilterOption>>,
    #[serde(default)]
    pub departments: Option<Vec<FilterOption>>,
    #[serde(default)]
    pub course_groups: Option<Vec<FilterOption>>,
}

impl PageSeed {
    pub fn options_for(&self, kind: FilterKind) -> Option<&Vec<FilterOption>> {
        match kind {
            FilterKind::School => self.schools.as_ref(),
            FilterKind::Term => self.terms.as_ref(),
            FilterKind::Department => self.departments.as_ref(),
            FilterKind::CourseGroup => self.course_groups.as_ref(),
        }
    }

    /// Seeded option lists keyed by kind, absent kinds left out.
    pub fn option_lists(&self) -> Vec<(FilterKind, Vec<FilterOption>)> {
        FilterKind::ALL
            .into_iter()
            .filter_map(|kind| self.options_for(kind).map(|list| (kind, list.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_requires_every_counter() {
        let raw = r#"{
            "recordsTotal": 12,
            "recordsTotalWithCanvasSite": 4,
            "recordsTotalWithCanvasSiteWithISite": 1,
            "recordsTotalWithCanvasSiteWithExternal": 2,
            "recordsTotalWithoutCanvasSite": 8,
            "recordsTotalWithoutCanvasSiteWithISite": 3,
            "recordsTotalWithoutCanvasSiteWithExternal": 0
        }"#;
        let summary: CourseInstanceSummaryResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(summary.records_total, 12);
        assert_eq!(summary.records_total_with_canvas_site_with_i_site, 1);
        assert_eq!(summary.records_total_without_canvas_site_with_i_site, 3);

        let missing = r#"{"recordsTotal": 12}"#;
        assert!(serde_json::from_str::<CourseInstanceSummaryResponse>(missing).is_err());

        let negative = raw.replace("\"recordsTotal\": 12", "\"recordsTotal\": -1");
        assert!(serde_json::from_str::<CourseInstanceSummaryResponse>(&negative).is_err());
    }

    #[test]
    fn listing_query_uses_datatables_parameter_names() {
        let query = CourseInstanceQuery {
            search: Some("CS 50".to_string()),
            order_dir: SortDirection::Desc,
            ..CourseInstanceQuery::default()
        };
        let value = serde_json::to_value(&query).expect("serialize");
        assert_eq!(value["order[0][column]"], 3);
        assert_eq!(value["order[0][dir]"], "desc");
        assert_eq!(value["search[value]"], "CS 50");
        assert_eq!(value["length"], 10);

        let value = serde_json::to_value(CourseInstanceQuery::default()).expect("serialize");
        assert!(value.get("search[value]").is_none());
    }

    #[test]
    fn bulk_job_payload_keys_filters_by_kind_name() {
        let request = CreateBulkJobRequest {
            template: None,
            filters: [
                (FilterKind::School, "school:colgsas".to_string()),
                (FilterKind::Term, "4321".to_string()),
                (FilterKind::CourseGroup, "coursegroup:12".to_string()),
            ]
            .into_iter()
            .collect(),
            course_instance_ids: vec![CourseInstanceId::new("339014")],
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["filters"]["course_group"], "coursegroup:12");
        assert_eq!(value["course_instance_ids"][0], "339014");
        assert!(value["template"].is_null());

        let back: CreateBulkJobRequest = serde_json::from_value(value).expect("decode");
        assert_eq!(back, request);
    }

    #[test]
    fn page_seed_fields_are_optional() {
        let seed: PageSeed = serde_json::from_str(
            r#"{"filters": {"school": "colgsas", "term": ""}, "terms": [{"id": "t1", "name": "Fall"}]}"#,
        )
        .expect("decode");
        assert_eq!(seed.filters.get(&FilterKind::School).map(String::as_str), Some("colgsas"));
        assert_eq!(seed.option_lists().len(), 1);
        assert!(seed.options_for(FilterKind::Department).is_none());
    }
}

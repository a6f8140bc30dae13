use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Id of the synthetic "all"/"please select" option prepended to a filter's options.
pub const DEFAULT_FILTER_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    School,
    Term,
    Department,
    CourseGroup,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::School,
        FilterKind::Term,
        FilterKind::Department,
        FilterKind::CourseGroup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::School => "school",
            FilterKind::Term => "term",
            FilterKind::Department => "department",
            FilterKind::CourseGroup => "course_group",
        }
    }

    /// Route segment used by the catalog API for this kind's option list.
    pub fn api_segment(self) -> &'static str {
        match self {
            FilterKind::School => "schools",
            FilterKind::Term => "terms",
            FilterKind::Department => "departments",
            FilterKind::CourseGroup => "course_groups",
        }
    }

    pub fn default_prompt(self) -> &'static str {
        match self {
            FilterKind::School => "Please select a school...",
            FilterKind::Term => "Please select an academic term...",
            FilterKind::Department => "All Departments",
            FilterKind::CourseGroup => "All Course Groups",
        }
    }

    /// Whether the synthetic default option is prepended even when the
    /// server returns a single real option.
    pub fn always_show_default(self) -> bool {
        matches!(self, FilterKind::Department | FilterKind::CourseGroup)
    }

    /// Every non-school option list is scoped by the school selection.
    pub fn parent(self) -> Option<FilterKind> {
        match self {
            FilterKind::School => None,
            _ => Some(FilterKind::School),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterKindError(pub String);

impl fmt::Display for ParseFilterKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown filter kind '{}' (expected school, term, department or course_group)",
            self.0
        )
    }
}

impl std::error::Error for ParseFilterKindError {}

impl std::str::FromStr for FilterKind {
    type Err = ParseFilterKindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "school" | "schools" => Ok(FilterKind::School),
            "term" | "terms" => Ok(FilterKind::Term),
            "department" | "departments" => Ok(FilterKind::Department),
            "course_group" | "course_groups" => Ok(FilterKind::CourseGroup),
            _ => Err(ParseFilterKindError(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub name: String,
}

impl FilterOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn synthetic_default(kind: FilterKind) -> Self {
        Self::new(DEFAULT_FILTER_ID, kind.default_prompt())
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_FILTER_ID
    }
}

/// Opaque course instance identity. The server emits numeric ids, other
/// sources may hand over strings; both normalize to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CourseInstanceId(pub String);

impl CourseInstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CourseInstanceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(text) if text.is_empty() => {
                Err(de::Error::custom("course instance id must not be empty"))
            }
            RawId::Text(text) => Ok(Self(text)),
            RawId::Number(number) => Ok(Self(number.to_string())),
        }
    }
}

/// Id of a bulk site creation job, read back from the job detail redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BulkJobId(pub u64);

impl fmt::Display for BulkJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the course instance listing, held by identity in the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInstanceRecord {
    pub id: CourseInstanceId,
    #[serde(default)]
    pub registrar_code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub has_canvas_site: bool,
    #[serde(default)]
    pub associated_sites: String,
    #[serde(default)]
    pub site_status: String,
}

impl CourseInstanceRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: CourseInstanceId::new(id),
            registrar_code: String::new(),
            title: title.into(),
            has_canvas_site: false,
            associated_sites: String::new(),
            site_status: String::new(),
        }
    }
}

use shared::domain::{BulkJobId, FilterKind};
use url::Url;

use crate::error::RouteError;

/// Query parameter carrying the LTI resource link id on every request.
pub const RESOURCE_LINK_ID_PARAM: &str = "resource_link_id";

/// Builds catalog API urls relative to the tool's base url.
#[derive(Debug, Clone)]
pub struct CatalogRoutes {
    base: Url,
    resource_link_id: Option<String>,
}

impl CatalogRoutes {
    pub fn new(base_url: &str) -> Result<Self, RouteError> {
        let base = Url::parse(base_url.trim()).map_err(|e| RouteError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(RouteError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "url cannot be used as a base".to_string(),
            });
        }
        Ok(Self {
            base,
            resource_link_id: None,
        })
    }

    pub fn with_resource_link_id(mut self, resource_link_id: Option<String>) -> Self {
        self.resource_link_id = resource_link_id.filter(|id| !id.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn schools(&self) -> Result<Url, RouteError> {
        self.build(&[Segment::Fixed("api"), Segment::Fixed("schools")])
    }

    /// Option list of `kind` for the given school. School options are not
    /// scoped, so `school_id` is ignored for [`FilterKind::School`].
    pub fn filter_options(&self, kind: FilterKind, school_id: &str) -> Result<Url, RouteError> {
        if kind == FilterKind::School {
            return self.schools();
        }
        self.build(&[
            Segment::Fixed("api"),
            Segment::Fixed("schools"),
            Segment::Param("school_id", school_id),
            Segment::Fixed(kind.api_segment()),
        ])
    }

    pub fn course_instance_summary(
        &self,
        term_id: &str,
        account_id: &str,
    ) -> Result<Url, RouteError> {
        self.term_account_route(term_id, account_id, "course_instance_summary")
    }

    pub fn course_instances(&self, term_id: &str, account_id: &str) -> Result<Url, RouteError> {
        self.term_account_route(term_id, account_id, "course_instances")
    }

    pub fn create_job(&self) -> Result<Url, RouteError> {
        self.build(&[Segment::Fixed("create_job")])
    }

    /// Job id named by a `bulk_job_detail/{id}` location, which may be
    /// relative to the tool's base url.
    pub fn bulk_job_id_from_location(&self, location: &str) -> Option<BulkJobId> {
        let url = self.base.join(location.trim()).ok()?;
        let mut segments = url.path_segments()?.rev().skip_while(|s| s.is_empty());
        let id = segments.next()?.parse().ok()?;
        (segments.next()? == "bulk_job_detail").then_some(BulkJobId(id))
    }

    fn term_account_route(
        &self,
        term_id: &str,
        account_id: &str,
        leaf: &'static str,
    ) -> Result<Url, RouteError> {
        self.build(&[
            Segment::Fixed("api"),
            Segment::Fixed("terms"),
            Segment::Param("term_id", term_id),
            Segment::Fixed("accounts"),
            Segment::Param("account_id", account_id),
            Segment::Fixed(leaf),
        ])
    }

    fn build(&self, segments: &[Segment<'_>]) -> Result<Url, RouteError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url.path_segments_mut().map_err(|_| RouteError::InvalidBaseUrl {
                url: self.base.to_string(),
                reason: "url cannot be used as a base".to_string(),
            })?;
            path.pop_if_empty();
            for segment in segments {
                match segment {
                    Segment::Fixed(value) => {
                        path.push(value);
                    }
                    Segment::Param(name, value) => {
                        let value = value.trim();
                        if value.is_empty() {
                            return Err(RouteError::EmptySegment(name));
                        }
                        path.push(value);
                    }
                }
            }
        }
        if let Some(resource_link_id) = &self.resource_link_id {
            url.query_pairs_mut()
                .append_pair(RESOURCE_LINK_ID_PARAM, resource_link_id);
        }
        Ok(url)
    }
}

enum Segment<'a> {
    Fixed(&'static str),
    Param(&'static str, &'a str),
}

#[cfg(test)]
#[path = "tests/routes_tests.rs"]
mod tests;

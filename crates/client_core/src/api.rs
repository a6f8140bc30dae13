use async_trait::async_trait;
use shared::{
    domain::{BulkJobId, FilterKind, FilterOption},
    protocol::{
        CourseInstancePage, CourseInstanceQuery, CourseInstanceSummaryResponse,
        CreateBulkJobRequest,
    },
};

use crate::error::FetchError;

/// Data-fetch capability the selection models are driven by.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_schools(&self) -> Result<Vec<FilterOption>, FetchError>;

    /// Options of a school-scoped dimension (term, department, course group).
    async fn fetch_filter_options(
        &self,
        kind: FilterKind,
        school_id: &str,
    ) -> Result<Vec<FilterOption>, FetchError>;

    async fn fetch_course_instance_summary(
        &self,
        term_id: &str,
        account_id: &str,
    ) -> Result<CourseInstanceSummaryResponse, FetchError>;

    async fn fetch_course_instances(
        &self,
        term_id: &str,
        account_id: &str,
        query: &CourseInstanceQuery,
    ) -> Result<CourseInstancePage, FetchError>;

    /// Submits a bulk site creation job and returns the id of the created job.
    async fn create_bulk_job(
        &self,
        request: &CreateBulkJobRequest,
    ) -> Result<BulkJobId, FetchError>;
}

pub struct MissingCatalogApi;

#[async_trait]
impl CatalogApi for MissingCatalogApi {
    async fn fetch_schools(&self) -> Result<Vec<FilterOption>, FetchError> {
        Err(FetchError::Unavailable)
    }

    async fn fetch_filter_options(
        &self,
        _kind: FilterKind,
        _school_id: &str,
    ) -> Result<Vec<FilterOption>, FetchError> {
        Err(FetchError::Unavailable)
    }

    async fn fetch_course_instance_summary(
        &self,
        _term_id: &str,
        _account_id: &str,
    ) -> Result<CourseInstanceSummaryResponse, FetchError> {
        Err(FetchError::Unavailable)
    }

    async fn fetch_course_instances(
        &self,
        _term_id: &str,
        _account_id: &str,
        _query: &CourseInstanceQuery,
    ) -> Result<CourseInstancePage, FetchError> {
        Err(FetchError::Unavailable)
    }

    async fn create_bulk_job(
        &self,
        _request: &CreateBulkJobRequest,
    ) -> Result<BulkJobId, FetchError> {
        Err(FetchError::Unavailable)
    }
}

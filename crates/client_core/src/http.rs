use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, LOCATION},
    redirect, Client,
};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{BulkJobId, FilterKind, FilterOption},
    error::ApiErrorBody,
    protocol::{
        CourseInstancePage, CourseInstanceQuery, CourseInstanceSummaryResponse,
        CreateBulkJobRequest, CREATE_JOB_FORM_FIELD,
    },
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{api::CatalogApi, error::FetchError, routes::CatalogRoutes};

pub const CSRF_HEADER: &str = "x-csrftoken";
pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";

#[derive(Debug, Clone, Default)]
pub struct HttpCatalogConfig {
    pub base_url: String,
    pub resource_link_id: Option<String>,
    pub csrf_token: Option<String>,
    pub timeout: Option<Duration>,
}

/// reqwest-backed catalog client. Every request carries the AJAX marker
/// header, the CSRF token when one is configured, and the LTI resource
/// link id in its query string. Redirects are not followed, so the job
/// detail location answering `create_job` stays readable.
pub struct HttpCatalogApi {
    http: Client,
    routes: CatalogRoutes,
}

impl HttpCatalogApi {
    pub fn new(config: HttpCatalogConfig) -> Result<Self, FetchError> {
        let routes = CatalogRoutes::new(&config.base_url)?
            .with_resource_link_id(config.resource_link_id);

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(REQUESTED_WITH_HEADER),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        if let Some(token) = config.csrf_token.filter(|t| !t.trim().is_empty()) {
            let value = HeaderValue::from_str(token.trim())
                .map_err(|e| FetchError::Transport(format!("invalid csrf token: {e}")))?;
            headers.insert(HeaderName::from_static(CSRF_HEADER), value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::none());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self { http, routes })
    }

    pub fn routes(&self) -> &CatalogRoutes {
        &self.routes
    }

    async fn get_json<T, Q>(&self, url: Url, query: Option<&Q>) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!(url = %url, "catalog: GET");
        let mut request = self.http.get(url.clone());
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(status_error(&url, status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(url = %url, error = %e, "catalog: malformed response payload");
            FetchError::Decode(e.to_string())
        })
    }
}

fn status_error(url: &Url, status: reqwest::StatusCode, body: &str) -> FetchError {
    let message = ApiErrorBody::message_from_body(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    warn!(url = %url, status = status.as_u16(), %message, "catalog: request failed");
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    // Timeouts surface the same way an aborted browser request does.
    if err.is_timeout() {
        return FetchError::Cancelled;
    }
    FetchError::Transport(err.to_string())
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_schools(&self) -> Result<Vec<FilterOption>, FetchError> {
        let url = self.routes.schools()?;
        self.get_json::<_, ()>(url, None).await
    }

    async fn fetch_filter_options(
        &self,
        kind: FilterKind,
        school_id: &str,
    ) -> Result<Vec<FilterOption>, FetchError> {
        let url = self.routes.filter_options(kind, school_id)?;
        self.get_json::<_, ()>(url, None).await
    }

    async fn fetch_course_instance_summary(
        &self,
        term_id: &str,
        account_id: &str,
    ) -> Result<CourseInstanceSummaryResponse, FetchError> {
        let url = self.routes.course_instance_summary(term_id, account_id)?;
        self.get_json::<_, ()>(url, None).await
    }

    async fn fetch_course_instances(
        &self,
        term_id: &str,
        account_id: &str,
        query: &CourseInstanceQuery,
    ) -> Result<CourseInstancePage, FetchError> {
        let url = self.routes.course_instances(term_id, account_id)?;
        self.get_json(url, Some(query)).await
    }

    async fn create_bulk_job(
        &self,
        request: &CreateBulkJobRequest,
    ) -> Result<BulkJobId, FetchError> {
        let url = self.routes.create_job()?;
        let data = serde_json::to_string(request)
            .map_err(|e| FetchError::Decode(format!("failed to encode job payload: {e}")))?;
        debug!(url = %url, courses = request.course_instance_ids.len(), "catalog: POST");

        let response = self
            .http
            .post(url.clone())
            .form(&[(CREATE_JOB_FORM_FIELD, data)])
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_redirection() {
            let body = response.text().await.map_err(transport_error)?;
            if status.is_success() {
                warn!(url = %url, "catalog: job creation answered without a redirect");
                return Err(FetchError::Decode(
                    "expected a redirect to the bulk job detail page".to_string(),
                ));
            }
            return Err(status_error(&url, status, &body));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let job_id = self
            .routes
            .bulk_job_id_from_location(location)
            .ok_or_else(|| FetchError::Decode(format!("unexpected job location '{location}'")))?;
        info!(%job_id, "catalog: bulk job created");
        Ok(job_id)
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;

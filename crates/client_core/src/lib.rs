pub mod api;
pub mod error;
pub mod filters;
pub mod http;
pub mod routes;
pub mod selection;
pub mod session;
pub mod types;

pub use api::{CatalogApi, MissingCatalogApi};
pub use error::{BulkJobError, FetchError, FilterError, RouteError};
pub use filters::{FilterDimension, FilterLoadTicket, FilterState};
pub use http::{HttpCatalogApi, HttpCatalogConfig};
pub use routes::CatalogRoutes;
pub use selection::{SelectionSummary, SummaryCounters, SummarySnapshot, SummaryTicket};
pub use session::{SelectionSession, SessionEvent};
pub use types::LoadOutcome;

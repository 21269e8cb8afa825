//! # Visitor Log
//!
//! Visit, click, and page-view counters kept in a relational store and keyed
//! by client IP address. Callers on the chat path treat every call as a
//! fire-and-forget notification: failures are logged, never shown, never retried.
//!
//! ```text
//! log_visitor(client)    →  upsert visitors row (visit_count + 1, country, last_visit)
//! log_click(client)      →  visitors.clicks + 1
//! increment_page_view()  →  total_visits[id = 1].total_count + 1
//! visitor_stats()        →  { total_visits, unique_visitors }
//! ```

pub mod geo;
pub mod store;

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;

pub use geo::{GeoInfo, GeoLookup};
pub use store::SqlVisitorLog;

/// Value stored when a field cannot be determined.
pub const UNKNOWN: &str = "Unknown";

/// What is known about the client being logged.
///
/// `ip: None` means "whoever this process is": the geolocation service is
/// asked about the caller's own public address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VisitorStats {
    pub total_visits: i64,
    pub unique_visitors: i64,
}

#[derive(Debug)]
pub enum VisitorError {
    /// Connecting, migrating, or querying the store failed.
    Database(String),
    /// The geolocation service could not be reached or refused the request.
    Lookup(String),
}

impl fmt::Display for VisitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitorError::Database(msg) => write!(f, "database error: {msg}"),
            VisitorError::Lookup(msg) => write!(f, "lookup error: {msg}"),
        }
    }
}

impl std::error::Error for VisitorError {}

impl From<sqlx::Error> for VisitorError {
    fn from(e: sqlx::Error) -> Self {
        VisitorError::Database(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for VisitorError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        VisitorError::Database(e.to_string())
    }
}

#[async_trait]
pub trait VisitorLog: Send + Sync {
    async fn log_visitor(&self, client: &ClientInfo) -> Result<(), VisitorError>;

    async fn log_click(&self, client: &ClientInfo) -> Result<(), VisitorError>;

    async fn increment_page_view(&self) -> Result<(), VisitorError>;

    /// Totals for display. Failures are logged and reported as zeros.
    async fn visitor_stats(&self) -> VisitorStats;
}

/// Notifications the chat front-ends send without waiting for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitEvent {
    Visit,
    Click,
    PageView,
}

/// Spawns the notification on the runtime and logs any failure.
pub fn notify(log: Arc<dyn VisitorLog>, event: VisitEvent, client: ClientInfo) {
    tokio::spawn(async move {
        let result = match event {
            VisitEvent::Visit => log.log_visitor(&client).await,
            VisitEvent::Click => log.log_click(&client).await,
            VisitEvent::PageView => log.increment_page_view().await,
        };
        match result {
            Ok(()) => debug!("Visitor event {:?} recorded", event),
            Err(e) => warn!("Visitor event {:?} failed: {}", event, e),
        }
    });
}

//! Application services and repository ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod grant_aggregator;
mod repository_ports;

pub use authorization_service::BulkAuthorizationService;
pub use grant_aggregator::GrantAggregator;
pub use repository_ports::{
    DocumentRow, QueryColumn, REQUESTED_COLUMNS, RepositorySession, RepositorySessionFactory,
};

//! # DTP API
//!
//! Request builders for the Digital Twin Platform REST API.
//!
//! Queries are assembled from ontology term names resolved through
//! [`config::DtpSettings`], posted as JSON with the developer token, and the
//! `total_items` field of the answer is returned as the count.

pub mod client;
pub mod count;
pub mod error;
pub mod query;

pub use client::DtpClient;
pub use count::{COUNT_NODES_OPERATION, CountApi, parse_total_items};
pub use error::{ApiError, ApiResult};
pub use query::{CountQuery, Direction, PropertyFilter};

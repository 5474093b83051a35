//! Core library for campus
//!
//! This crate implements the **Functional Core** of the campus application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`campus_core`** (this crate): Pure transformation functions with zero I/O
//! - **`campus`**: HTTP data provider and CLI (the Imperative Shell)
//!
//! The shell issues the request and reads the body; everything that decides
//! *what* to send and *how* to read the answer lives here and is testable
//! with fixture data.
//!
//! # Module Organization
//!
//! - [`query`]: list requests, pagination, filters and query parameter building
//! - [`resources`]: the per-resource filter field table
//! - [`response`]: list envelope parsing into records and total count
//! - [`error`]: normalized HTTP errors
//!
//! # Example Usage
//!
//! ```rust
//! use campus_core::query::{CrudFilter, ListRequest, Pagination};
//! use campus_core::response::{map_list_response, BufferedResponse};
//!
//! let request = ListRequest::new("subjects")
//!     .with_pagination(Pagination::off())
//!     .with_filter(CrudFilter::eq("department", "CS"));
//! assert_eq!(request.query_params().to_query_string(), "department=CS");
//!
//! let response = BufferedResponse::new(200, r#"{"data":[{"id":1}],"pagination":{"total":42}}"#);
//! let result = map_list_response(&response).unwrap();
//! assert_eq!(result.total, 42);
//! ```

pub mod error;
pub mod query;
pub mod resources;
pub mod response;

pub use error::HttpError;
pub use query::{CrudFilter, CrudOperator, ListRequest, Pagination, PaginationMode, QueryParams};
pub use response::{BufferedResponse, ListResult};

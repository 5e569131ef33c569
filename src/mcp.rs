//! MCP server exposing convention, Linear and GitHub tools.
//!
//! Built on `rmcp` over stdio. Backend clients are constructed lazily on
//! first use, so the convention tools work without any credentials
//! configured.

pub mod params;
pub mod service;

pub use service::ArcFlowService;

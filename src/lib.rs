//! specprobe - diagnostics for OpenAPI documents and MCP proxy processes
//!
//! This library backs the `specprobe` CLI, a pair of small diagnostic probes
//! used while developing OpenAPI-to-MCP proxy tooling:
//!
//! - **Schema inspection**: fetch a JSON OpenAPI document over HTTP and report
//!   the request-body schema of a single POST operation, property by property.
//! - **Proxy probing**: spawn an MCP proxy executable, drive the line-delimited
//!   JSON-RPC `initialize` / `tools/list` handshake over its stdio, and report
//!   the input schema of one generated tool definition.
//!
//! Both probes are single-shot and strictly sequential: fetch or spawn, parse
//! JSON, print selected fields. There is no retry, caching, or persistence.
//!
//! # Example Usage
//!
//! ```ignore
//! use specprobe::openapi;
//!
//! async fn inspect(url: &str) -> anyhow::Result<()> {
//!     let doc = openapi::fetch_document(url, std::time::Duration::from_secs(30)).await?;
//!     let report = openapi::endpoint_report(&doc, "/api/search/single")?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`openapi`]: OpenAPI document fetching and endpoint schema reporting
//! - [`rpc`]: JSON-RPC line protocol types for the MCP handshake
//! - [`probe`]: proxy session driver and tools/list report rendering
//! - [`cli`]: clap argument types

pub mod cli;
pub mod openapi;
pub mod probe;
pub mod rpc;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

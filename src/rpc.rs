//! JSON-RPC line protocol types for the MCP stdio handshake
//!
//! The proxy speaks newline-delimited JSON-RPC 2.0 over its stdin/stdout: one
//! serialized request per line, one response line per request. Only the two
//! methods the probe sends (`initialize` and `tools/list`) are modeled here;
//! responses are kept loose so unexpected shapes surface as report text
//! rather than deserialization failures.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// JSON-RPC protocol version sent on every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision announced during `initialize`.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// A single outbound JSON-RPC request.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl RpcRequest {
    /// Builds the `initialize` handshake request.
    pub fn initialize(id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: "initialize".to_string(),
            params: json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": crate::NAME,
                    "version": crate::VERSION,
                },
            }),
        }
    }

    /// Builds the `tools/list` request.
    pub fn tools_list(id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: "tools/list".to_string(),
            params: json!({}),
        }
    }

    /// Serializes the request as one newline-terminated wire line.
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// A loosely-typed JSON-RPC response line.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// One tool descriptor from a `tools/list` result.
///
/// The input schema stays a raw [`Value`] so printing it is lossless.
#[derive(Debug, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "inputSchema", default)]
    pub input_schema: Value,
}

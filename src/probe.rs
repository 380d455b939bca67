//! Proxy session driver and tools/list report rendering
//!
//! The probe treats the proxy as an opaque pipe peer: writes and reads are
//! strictly alternated, one line each way per request, with no timeout. If
//! the proxy never answers, the session blocks indefinitely (known
//! limitation of the protocol exchange, not a designed behavior).
//!
//! Session I/O and report rendering are split so the report logic can be
//! tested on canned response lines without spawning anything.

use anyhow::{anyhow, Result};
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::rpc::{RpcRequest, RpcResponse, Tool};

/// Drives the two-round handshake against an already-attached pipe pair.
///
/// Sends `initialize`, reads one line (received but otherwise unused), sends
/// `tools/list`, reads one line, and returns that raw second line for the
/// caller to render. Reads block until the peer writes a newline or closes
/// the pipe.
pub async fn run_session<R, W>(mut reader: R, mut writer: W) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let init = RpcRequest::initialize(1);
    writer.write_all(init.to_line()?.as_bytes()).await?;
    writer.flush().await?;

    let mut init_response = String::new();
    reader.read_line(&mut init_response).await?;
    debug!(response = init_response.trim_end(), "initialize response received");

    let list = RpcRequest::tools_list(2);
    writer.write_all(list.to_line()?.as_bytes()).await?;
    writer.flush().await?;

    let mut tools_response = String::new();
    reader.read_line(&mut tools_response).await?;
    debug!(
        bytes = tools_response.len(),
        "tools/list response received"
    );

    Ok(tools_response)
}

/// Renders the report for a raw `tools/list` response line.
///
/// Never fails: a line that cannot be parsed, or a descriptor missing its
/// name, produces an error report quoting the exception text and the raw
/// line, mirroring what a developer needs to debug the proxy by hand.
pub fn tools_report(raw_line: &str, tool_name: &str) -> String {
    match render_tools(raw_line, tool_name) {
        Ok(report) => report,
        Err(e) => format!(
            "Error parsing response: {}\nResponse: {}",
            e,
            raw_line.trim_end()
        ),
    }
}

fn render_tools(raw_line: &str, tool_name: &str) -> Result<String> {
    let response: RpcResponse = serde_json::from_str(raw_line)?;

    let tools = match response.result.as_ref().and_then(|result| result.get("tools")) {
        Some(tools) => tools
            .as_array()
            .ok_or_else(|| anyhow!("'tools' is not an array"))?,
        None => {
            return Ok(format!(
                "Error: No tools found in response\n{}",
                raw_line.trim_end()
            ));
        }
    };

    if tools.is_empty() {
        return Ok(format!(
            "Error: No tools found in response\n{}",
            raw_line.trim_end()
        ));
    }

    for descriptor in tools {
        let tool: Tool = serde_json::from_value(descriptor.clone())?;
        if tool.name != tool_name {
            continue;
        }

        let mut out = String::new();
        writeln!(out, "=== Tool: {} ===", tool.name)?;
        writeln!(
            out,
            "Description: {}",
            tool.description.as_deref().unwrap_or("N/A")
        )?;
        writeln!(out, "\nInput Schema:")?;
        writeln!(out, "{}", serde_json::to_string_pretty(&tool.input_schema)?)?;

        // The proxy nests the HTTP request body under a 'body' parameter.
        if let Some(body_properties) = tool
            .input_schema
            .pointer("/properties/body/properties")
        {
            writeln!(out, "\n=== Expected Arguments Structure ===")?;
            writeln!(
                out,
                "The 'body' parameter expects an object with these properties:"
            )?;
            writeln!(out, "{}", serde_json::to_string_pretty(body_properties)?)?;
        }

        return Ok(out);
    }

    Ok(format!(
        "Tool '{}' not found in tools/list response",
        tool_name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn tools_line(tools: Value) -> String {
        json!({"jsonrpc": "2.0", "id": 2, "result": {"tools": tools}}).to_string()
    }

    fn search_tool() -> Value {
        json!({
            "name": "postapisearchsingle",
            "description": "POST /api/search/single",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "body": {
                        "type": "object",
                        "properties": {
                            "query": {"type": "string", "description": "Search query text"}
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_report_prints_description_and_schema() {
        let line = tools_line(json!([search_tool()]));
        let report = tools_report(&line, "postapisearchsingle");

        assert!(report.contains("=== Tool: postapisearchsingle ==="));
        assert!(report.contains("Description: POST /api/search/single"));
        assert!(report.contains("Input Schema:"));
    }

    #[test]
    fn test_report_prints_nested_body_properties_verbatim() {
        let line = tools_line(json!([search_tool()]));
        let report = tools_report(&line, "postapisearchsingle");

        let nested = &search_tool()["inputSchema"]["properties"]["body"]["properties"];
        let rendered = serde_json::to_string_pretty(nested).unwrap();
        assert!(report.contains("=== Expected Arguments Structure ==="));
        assert!(report.contains(&rendered));

        let reparsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(&reparsed, nested);
    }

    #[test]
    fn test_report_stops_at_first_match() {
        let mut second = search_tool();
        second["name"] = json!("getapihealth");
        let line = tools_line(json!([search_tool(), second]));

        let report = tools_report(&line, "postapisearchsingle");
        assert!(report.contains("postapisearchsingle"));
        assert!(!report.contains("getapihealth"));
    }

    #[test]
    fn test_report_without_body_properties_omits_arguments_section() {
        let tool = json!({
            "name": "postapisearchsingle",
            "inputSchema": {"type": "object", "properties": {"q": {"type": "string"}}}
        });
        let report = tools_report(&tools_line(json!([tool])), "postapisearchsingle");

        assert!(report.contains("Description: N/A"));
        assert!(!report.contains("Expected Arguments Structure"));
    }

    #[test]
    fn test_report_empty_tool_sequence() {
        let line = tools_line(json!([]));
        let report = tools_report(&line, "postapisearchsingle");
        assert!(report.contains("Error: No tools found in response"));
        assert!(report.contains(&line));
    }

    #[test]
    fn test_report_non_array_tools_is_shape_error() {
        let line = json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": {"tools": {"postapisearchsingle": {}}}
        })
        .to_string();

        let report = tools_report(&line, "postapisearchsingle");
        assert!(report.contains("Error parsing response:"));
        assert!(report.contains("'tools' is not an array"));
        assert!(report.contains(&line));
        assert!(!report.contains("No tools found"));
    }

    #[test]
    fn test_report_missing_result() {
        let line = r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32603,"message":"boom"}}"#;
        let report = tools_report(line, "postapisearchsingle");
        assert!(report.contains("Error: No tools found in response"));
    }

    #[test]
    fn test_report_invalid_json_quotes_raw_line() {
        let line = "Unhandled exception: spec download failed\n";
        let report = tools_report(line, "postapisearchsingle");
        assert!(report.contains("Error parsing response:"));
        assert!(report.contains("Response: Unhandled exception: spec download failed"));
    }

    #[test]
    fn test_report_descriptor_without_name_is_parse_error() {
        let line = tools_line(json!([{"description": "anonymous"}]));
        let report = tools_report(&line, "postapisearchsingle");
        assert!(report.contains("Error parsing response:"));
    }

    #[test]
    fn test_report_tool_not_listed() {
        let line = tools_line(json!([search_tool()]));
        let report = tools_report(&line, "getapihealth");
        assert!(report.contains("Tool 'getapihealth' not found"));
    }

    #[tokio::test]
    async fn test_session_writes_both_requests_and_returns_second_line() {
        let responses = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"tools\":[]}}\n",
        );
        let mut written: Vec<u8> = Vec::new();

        let raw = run_session(responses.as_bytes(), &mut written)
            .await
            .unwrap();
        assert_eq!(raw, "{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"tools\":[]}}\n");

        let sent = String::from_utf8(written).unwrap();
        let lines: Vec<&str> = sent.lines().collect();
        assert_eq!(lines.len(), 2);

        let init: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(init["method"], "initialize");
        assert_eq!(init["id"], 1);

        let list: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(list["method"], "tools/list");
        assert_eq!(list["id"], 2);
    }

    #[tokio::test]
    async fn test_session_tolerates_peer_closing_early() {
        // Peer answers initialize then closes: the second read sees EOF and
        // yields an empty line, which the report path treats as a parse error.
        let responses = "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n";
        let mut written: Vec<u8> = Vec::new();

        let raw = run_session(responses.as_bytes(), &mut written)
            .await
            .unwrap();
        assert!(raw.is_empty());
        assert!(tools_report(&raw, "postapisearchsingle").contains("Error parsing response:"));
    }
}

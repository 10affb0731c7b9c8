//! Tool server
//!
//! Newline-delimited JSON-RPC 2.0 over stdin/stdout. Each request line gets
//! at most one response line; notifications get none. Logs go to stderr so
//! stdout carries protocol frames only.

pub mod args;
pub mod handlers;
pub mod response;
pub mod tools;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

pub use handlers::Bridge;
pub use response::{ToolFailure, ToolResponse};
pub use tools::{Tool, tool_specs};

/// Protocol version reported when the client does not name one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// Serve requests read from `reader` until end of input.
pub async fn serve<R, W>(bridge: &Bridge, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("reading request")? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(message) => handle_message(bridge, message).await,
            Err(err) => {
                warn!(error = %err, "unparseable request line");
                Some(jsonrpc_error(
                    Value::Null,
                    PARSE_ERROR,
                    &format!("parse error: {err}"),
                ))
            }
        };

        if let Some(payload) = response {
            let mut frame = serde_json::to_string(&payload)?;
            frame.push('\n');
            writer
                .write_all(frame.as_bytes())
                .await
                .context("writing response")?;
            writer.flush().await.context("flushing response")?;
        }
    }
    Ok(())
}

/// Serve on the process's stdin/stdout until end of input or Ctrl-C, then
/// kill any supervised process.
pub async fn serve_stdio(bridge: Arc<Bridge>) -> Result<()> {
    info!("gdbridge tool server listening on stdio");
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();

    let result = tokio::select! {
        result = serve(&bridge, reader, writer) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            Ok(())
        }
    };

    bridge.shutdown();
    info!("gdbridge tool server stopped");
    result
}

/// Dispatch one decoded message. `None` means no response is due.
pub async fn handle_message(bridge: &Bridge, message: Value) -> Option<Value> {
    let id = message.get("id").cloned();
    let Some(method) = message.get("method").and_then(Value::as_str) else {
        return id.map(|id| jsonrpc_error(id, INVALID_REQUEST, "invalid request"));
    };
    debug!(method, "request");

    match method {
        "initialize" => {
            let id = id?;
            Some(jsonrpc_result(id, initialize_result(&message)))
        }
        "notifications/initialized" => None,
        "ping" => id.map(|id| jsonrpc_result(id, json!({}))),
        "tools/list" => {
            let id = id?;
            Some(jsonrpc_result(id, json!({ "tools": tool_specs() })))
        }
        "tools/call" => {
            let id = id?;
            Some(handle_tool_call(bridge, id, &message).await)
        }
        _ => id.map(|id| jsonrpc_error(id, METHOD_NOT_FOUND, "method not found")),
    }
}

fn initialize_result(message: &Value) -> Value {
    let protocol = message
        .get("params")
        .and_then(|params| params.get("protocolVersion"))
        .cloned()
        .unwrap_or_else(|| Value::String(DEFAULT_PROTOCOL_VERSION.to_string()));
    json!({
        "protocolVersion": protocol,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": "gdbridge",
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

async fn handle_tool_call(bridge: &Bridge, id: Value, message: &Value) -> Value {
    let params = message.get("params").cloned().unwrap_or(Value::Null);
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return jsonrpc_error(id, INVALID_PARAMS, "missing tool name");
    };
    let Some(tool) = Tool::from_name(name) else {
        warn!(tool = name, "unknown tool");
        return jsonrpc_error(id, METHOD_NOT_FOUND, &format!("Unknown tool: {name}"));
    };

    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
    let response = bridge.call_tool(tool, &arguments).await;
    jsonrpc_result(id, response.to_value())
}

fn jsonrpc_result(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

fn jsonrpc_error(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_echoes_protocol_version() {
        let result = initialize_result(&json!({
            "method": "initialize",
            "params": {"protocolVersion": "2025-03-26"}
        }));
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "gdbridge");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[test]
    fn test_initialize_default_protocol_version() {
        let result = initialize_result(&json!({"method": "initialize"}));
        assert_eq!(result["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
    }

    #[test]
    fn test_jsonrpc_error_shape() {
        let value = jsonrpc_error(json!(7), METHOD_NOT_FOUND, "Unknown tool: nope");
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "error": {"code": -32601, "message": "Unknown tool: nope"}
            })
        );
    }
}

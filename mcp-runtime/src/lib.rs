//! Model Context Protocol server for the Edgee management API.
//!
//! The server speaks JSON-RPC 2.0 over stdio. Messages may arrive either as
//! one JSON document per line or with `Content-Length` headers; each reply is
//! written in the framing its request used.

mod catalog;
pub mod client;
pub mod credentials;
pub mod tools;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde_json::{Map, Value, json};
use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use client::{ApiClient, ApiConfig};
use credentials::CredentialProvider;
use tools::{call_tool, tool_definitions};

const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const MCP_SERVER_NAME: &str = "edgee-mcp";
const SERVER_INSTRUCTIONS: &str = "Each edgee-* tool performs exactly one call against the Edgee management API. \
List tools return a single page; pass the reported start_key to fetch the next one. \
Components can be addressed by UUID or by organization and component slug.";

#[derive(Subcommand, Debug)]
pub enum McpCommands {
    /// Run the Edgee MCP server over stdio
    Serve(McpServeArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct McpServeArgs {
    /// Override the User-Agent sent to the Edgee API
    #[arg(long, env = "EDGEE_USER_AGENT")]
    pub user_agent: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to read MCP message: {0}")]
    Read(#[source] io::Error),
    #[error("Failed to write MCP response: {0}")]
    Write(#[source] io::Error),
}

pub async fn run(
    config: ApiConfig,
    credentials: Arc<dyn CredentialProvider>,
    command: McpCommands,
) -> i32 {
    match command {
        McpCommands::Serve(args) => {
            let config = match args.user_agent {
                Some(user_agent) => config.with_user_agent(user_agent),
                None => config,
            };
            let server = McpServer::new(ApiClient::new(config, credentials));
            match server.serve_stdio().await {
                Ok(()) => 0,
                Err(err) => {
                    tracing::error!(error = %err, "mcp server stopped");
                    1
                }
            }
        }
    }
}

/// How a message was delimited on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    Line,
    ContentLength,
}

pub struct McpServer {
    client: ApiClient,
}

impl McpServer {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn serve_stdio(&self) -> Result<(), TransportError> {
        let mut reader = BufReader::new(io::stdin());
        let mut stdout = io::stdout();
        tracing::info!(
            server = MCP_SERVER_NAME,
            version = env!("CARGO_PKG_VERSION"),
            api_url = %self.client.config().base_url(),
            tools = tool_definitions().len(),
            "mcp server listening on stdio"
        );
        self.serve(&mut reader, &mut stdout).await
    }

    /// Reads messages until EOF, answering each one on `writer`.
    pub async fn serve<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<(), TransportError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let Some((framing, incoming)) =
                read_message(reader).await.map_err(TransportError::Read)?
            else {
                tracing::info!("stdin closed, shutting down");
                return Ok(());
            };

            let response = match incoming {
                Ok(message) => self.handle_incoming_message(message).await,
                Err(err) => {
                    tracing::warn!(error = %err, "unparseable message");
                    Some(error_response(Value::Null, RpcError::parse_error(err)))
                }
            };
            if let Some(response) = response {
                write_message(writer, framing, &response)
                    .await
                    .map_err(TransportError::Write)?;
            }
        }
    }

    async fn handle_incoming_message(&self, incoming: Value) -> Option<Value> {
        let Value::Array(batch) = incoming else {
            return self.handle_single_message(incoming).await;
        };
        if batch.is_empty() {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Batch request must not be empty"),
            ));
        }

        let mut responses = Vec::new();
        for item in batch {
            if let Some(response) = self.handle_single_message(item).await {
                responses.push(response);
            }
        }
        if responses.is_empty() {
            None
        } else {
            Some(Value::Array(responses))
        }
    }

    async fn handle_single_message(&self, incoming: Value) -> Option<Value> {
        let Some(obj) = incoming.as_object() else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Request must be a JSON object"),
            ));
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            let id = obj.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(
                id,
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        let Some(method) = obj.get("method").and_then(Value::as_str) else {
            // A response to a request we never sent.
            return None;
        };

        let params = obj.get("params").cloned().unwrap_or(Value::Null);
        match obj.get("id").cloned() {
            Some(id) => {
                tracing::debug!(method, "request");
                Some(match self.handle_request(method, params).await {
                    Ok(payload) => success_response(id, payload),
                    Err(err) => {
                        tracing::debug!(
                            method,
                            code = err.code,
                            message = %err.message,
                            "request rejected"
                        );
                        error_response(id, err)
                    }
                })
            }
            None => {
                tracing::debug!(method, "notification ignored");
                None
            }
        }
    }

    async fn handle_request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list_payload()),
            "tools/call" => self.handle_tools_call(params).await,
            "resources/list" => Ok(json!({ "resources": [] })),
            "prompts/list" => Ok(json!({ "prompts": [] })),
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize_payload(&self) -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "listChanged": false },
                "prompts": { "listChanged": false }
            },
            "serverInfo": {
                "name": MCP_SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": SERVER_INSTRUCTIONS
        })
    }

    fn tools_list_payload(&self) -> Value {
        let tools: Vec<Value> = tool_definitions()
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "inputSchema": tool.input_schema,
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, RpcError> {
        let params = params
            .as_object()
            .ok_or_else(|| RpcError::invalid_params("tools/call params must be an object"))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("tools/call requires string field 'name'"))?;

        let args = match params.get("arguments") {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Null) | None => Map::new(),
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "tools/call 'arguments' must be an object",
                ));
            }
        };

        Ok(call_tool(&self.client, name, &args).await)
    }
}

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self {
            code: -32700,
            message: format!("Parse error: {detail}"),
        }
    }

    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
        }
    }

    fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
        }
    }
}

fn success_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": error.code,
            "message": error.message
        }
    })
}

type ParsedMessage = Result<Value, serde_json::Error>;

/// Reads the next message. `Ok(None)` means clean EOF; a body that is not
/// valid JSON is returned as a parse failure so the loop can answer it.
async fn read_message<R>(reader: &mut R) -> Result<Option<(Framing, ParsedMessage)>, io::Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(length) = content_length(trimmed)? {
            return read_framed_body(reader, length)
                .await
                .map(|body| Some((Framing::ContentLength, body)));
        }
        return Ok(Some((Framing::Line, serde_json::from_str(trimmed))));
    }
}

fn content_length(header: &str) -> Result<Option<usize>, io::Error> {
    let Some((name, value)) = header.split_once(':') else {
        return Ok(None);
    };
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return Ok(None);
    }
    value.trim().parse::<usize>().map(Some).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidData, "Invalid Content-Length header")
    })
}

/// Skips the remaining headers up to the blank line, then reads the body.
async fn read_framed_body<R>(reader: &mut R, length: usize) -> Result<ParsedMessage, io::Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header).await? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Unexpected EOF while reading MCP headers",
            ));
        }
        if header.trim().is_empty() {
            break;
        }
    }

    let mut payload = vec![0_u8; length];
    reader.read_exact(&mut payload).await?;
    Ok(serde_json::from_slice(&payload))
}

async fn write_message<W>(writer: &mut W, framing: Framing, value: &Value) -> Result<(), io::Error>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(value).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to serialize JSON: {e}"),
        )
    })?;
    match framing {
        Framing::ContentLength => {
            let header = format!(
                "Content-Length: {}\r\nContent-Type: application/json\r\n\r\n",
                body.len()
            );
            writer.write_all(header.as_bytes()).await?;
            writer.write_all(&body).await?;
        }
        Framing::Line => {
            writer.write_all(&body).await?;
            writer.write_all(b"\n").await?;
        }
    }
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticToken;
    use crate::test_support::MockApi;

    fn offline_server() -> McpServer {
        McpServer::new(ApiClient::new(
            ApiConfig::new("http://127.0.0.1:9").unwrap(),
            Arc::new(StaticToken::none()),
        ))
    }

    async fn exchange(server: &McpServer, input: &str) -> String {
        let mut reader = BufReader::new(input.as_bytes());
        let mut output = Vec::new();
        server.serve(&mut reader, &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    fn lines(output: &str) -> Vec<Value> {
        output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn framed(body: &Value) -> String {
        let body = body.to_string();
        format!("Content-Length: {}\r\n\r\n{body}", body.len())
    }

    #[tokio::test]
    async fn initialize_over_newline_framing() {
        let server = offline_server();
        let output = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\",\"params\":{}}\n",
        )
        .await;

        let responses = lines(&output);
        assert_eq!(responses.len(), 1);
        let result = &responses[0]["result"];
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "edgee-mcp");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn content_length_requests_get_content_length_replies() {
        let server = offline_server();
        let request = json!({"jsonrpc": "2.0", "id": "a", "method": "ping"});
        let output = exchange(&server, &framed(&request)).await;

        let (header, body) = output.split_once("\r\n\r\n").unwrap();
        assert!(header.starts_with("Content-Length: "));
        assert!(header.contains("Content-Type: application/json"));
        let length: usize = header
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("Content-Length: "))
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(length, body.len());
        let response: Value = serde_json::from_str(body).unwrap();
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": "a", "result": {}}));
    }

    #[tokio::test]
    async fn framings_can_be_mixed_on_one_stream() {
        let server = offline_server();
        let input = format!(
            "{}{}\n",
            framed(&json!({"jsonrpc": "2.0", "id": 1, "method": "ping"})),
            json!({"jsonrpc": "2.0", "id": 2, "method": "ping"})
        );
        let output = exchange(&server, &input).await;

        let (header, rest) = output.split_once("\r\n\r\n").unwrap();
        let length: usize = header
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("Content-Length: "))
            .unwrap()
            .parse()
            .unwrap();
        let (first, second) = rest.split_at(length);
        assert_eq!(serde_json::from_str::<Value>(first).unwrap()["id"], 1);
        assert!(second.ends_with('\n'));
        assert_eq!(serde_json::from_str::<Value>(second.trim()).unwrap()["id"], 2);
        assert_eq!(output.matches("Content-Length").count(), 1);
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let server = offline_server();
        let output = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"sampling/createMessage\"}\n",
        )
        .await;

        let response = &lines(&output)[0];
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(
            response["error"]["message"],
            "Method not found: sampling/createMessage"
        );
    }

    #[tokio::test]
    async fn notifications_get_no_reply() {
        let server = offline_server();
        let output = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
        )
        .await;

        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn envelope_errors() {
        let server = offline_server();
        let output = exchange(
            &server,
            "[]\n{\"jsonrpc\":\"1.0\",\"id\":3,\"method\":\"ping\"}\nnot json\n",
        )
        .await;

        let responses = lines(&output);
        assert_eq!(responses[0]["error"]["code"], -32600);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[1]["error"]["code"], -32600);
        assert_eq!(responses[1]["id"], 3);
        assert_eq!(responses[2]["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn batches_answer_requests_only() {
        let server = offline_server();
        let batch = json!([
            {"jsonrpc": "2.0", "id": 1, "method": "ping"},
            {"jsonrpc": "2.0", "method": "notifications/initialized"},
            {"jsonrpc": "2.0", "id": 2, "method": "prompts/list"}
        ]);
        let output = exchange(&server, &format!("{batch}\n")).await;

        let responses = lines(&output);
        assert_eq!(responses.len(), 1);
        let batch = responses[0].as_array().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1]["result"], json!({"prompts": []}));
    }

    #[tokio::test]
    async fn tools_list_exposes_every_tool_once() {
        let server = offline_server();
        let output = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n",
        )
        .await;

        let tools = lines(&output)[0]["result"]["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), tool_definitions().len());
        let mut names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), tools.len());
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn tools_call_params_are_checked() {
        let server = offline_server();
        let output = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"arguments\":{}}}\n\
             {\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/call\",\"params\":{\"name\":\"edgee-getMe\",\"arguments\":[]}}\n",
        )
        .await;

        let responses = lines(&output);
        assert_eq!(responses[0]["error"]["code"], -32602);
        assert_eq!(responses[1]["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn tools_call_round_trip() {
        let mock = MockApi::start(
            200,
            r#"{"object":"list","url":"/v1/organizations","has_more":false,"data":[]}"#,
        )
        .await;
        let server = McpServer::new(ApiClient::new(
            ApiConfig::new(&mock.base_url).unwrap(),
            Arc::new(StaticToken::new("test-token")),
        ));
        let request = json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "tools/call",
            "params": {"name": "edgee-listOrganizations", "arguments": {"limit": 10}}
        });

        let output = exchange(&server, &format!("{request}\n")).await;

        let result = &lines(&output)[0]["result"];
        assert_eq!(result["content"][0]["text"], "Organizations:\n\nNone found.");
        assert!(result.get("isError").is_none());
        assert_eq!(mock.last_request().query.as_deref(), Some("limit=10"));
    }

    #[tokio::test]
    async fn truncated_headers_are_a_read_error() {
        let server = offline_server();
        let mut reader = BufReader::new("Content-Length: 10\r\n".as_bytes());
        let mut output = Vec::new();

        let err = server.serve(&mut reader, &mut output).await.unwrap_err();

        assert!(matches!(err, TransportError::Read(_)));
    }
}

use super::protocol::{
    CallToolParams, CallToolResult, CancelledParams, IncomingMessage, InitializeParams,
    InitializeResult, JsonRpcError, JsonRpcResponse, ListToolsResult, RequestId,
    ServerCapabilities, ServerInfo, ToolInfo, ToolsCapability, MCP_PROTOCOL_VERSION,
};
use crate::application::tools::ToolRegistry;
use crate::ports::inbound::ToolContext;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

const OUTBOUND_CAPACITY: usize = 64;

/// McpServer - JSON-RPC 2.0 server over a line-delimited byte stream
///
/// Requests are read sequentially; every `tools/call` runs in its own task
/// so slow package-manager calls never block the reader. Responses go
/// through one writer task and are emitted in completion order.
///
/// Each in-flight call owns a cancellation token, keyed by request id,
/// which `notifications/cancelled` fires. A cancelled call gets no response.
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
    in_flight: Arc<DashMap<RequestId, CancellationToken>>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, context: ToolContext) -> Self {
        Self {
            registry: Arc::new(registry),
            context,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Serves on the process's stdin and stdout until stdin closes.
    pub async fn serve_stdio(self) -> io::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serves until `reader` reaches EOF, then waits for in-flight calls
    /// to finish and flushes their responses.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
        let writer_task = tokio::spawn(write_messages(writer, rx));
        let mut calls = JoinSet::new();

        tracing::info!(tools = self.registry.len(), "MCP server listening on stdio");

        // Raw bytes: a line that is not UTF-8 is a parse error, not a read failure.
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        let read_result = loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break Ok(()),
                Ok(_) => {
                    if !line.iter().all(u8::is_ascii_whitespace) {
                        self.handle_line(&line, &tx, &mut calls).await;
                    }
                    reap_finished(&mut calls);
                }
                Err(e) => break Err(e),
            }
        };

        if !calls.is_empty() {
            tracing::info!(pending = calls.len(), "input closed, waiting for in-flight calls");
        }
        while let Some(joined) = calls.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "tool call task failed");
            }
        }

        drop(tx);
        match writer_task.await {
            Ok(result) => result?,
            Err(e) => return Err(io::Error::other(e)),
        }

        tracing::info!("MCP server stopped");
        read_result
    }

    async fn handle_line(
        &self,
        line: &[u8],
        tx: &mpsc::Sender<JsonRpcResponse>,
        calls: &mut JoinSet<()>,
    ) {
        let value: Value = match serde_json::from_slice(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable message");
                send(tx, JsonRpcResponse::failure(None, JsonRpcError::parse_error(e))).await;
                return;
            }
        };

        let message: IncomingMessage = match serde_json::from_value(value.clone()) {
            Ok(message) => message,
            Err(e) => {
                let id = value
                    .get("id")
                    .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
                send(
                    tx,
                    JsonRpcResponse::failure(
                        id,
                        JsonRpcError::new(
                            JsonRpcError::INVALID_REQUEST,
                            format!("Invalid request: {}", e),
                        ),
                    ),
                )
                .await;
                return;
            }
        };

        match message.id.clone() {
            None => self.handle_notification(message),
            Some(id) => self.handle_request(id, message, tx, calls).await,
        }
    }

    fn handle_notification(&self, message: IncomingMessage) {
        match message.method.as_str() {
            "notifications/cancelled" => {
                let params = message
                    .params
                    .and_then(|p| serde_json::from_value::<CancelledParams>(p).ok());
                let Some(params) = params else {
                    tracing::debug!("ignoring malformed cancellation notice");
                    return;
                };
                match self.in_flight.get(&params.request_id) {
                    Some(token) => {
                        tracing::info!(
                            request_id = %params.request_id,
                            reason = params.reason.as_deref().unwrap_or(""),
                            "cancelling tool call"
                        );
                        token.cancel();
                    }
                    None => tracing::debug!(
                        request_id = %params.request_id,
                        "cancellation for unknown or finished request"
                    ),
                }
            }
            other => tracing::debug!(method = other, "ignoring notification"),
        }
    }

    async fn handle_request(
        &self,
        id: RequestId,
        message: IncomingMessage,
        tx: &mpsc::Sender<JsonRpcResponse>,
        calls: &mut JoinSet<()>,
    ) {
        let response = match message.method.as_str() {
            "initialize" => {
                let params: InitializeParams = message
                    .params
                    .and_then(|p| serde_json::from_value(p).ok())
                    .unwrap_or_default();
                let result = InitializeResult {
                    protocol_version: params
                        .protocol_version
                        .unwrap_or_else(|| MCP_PROTOCOL_VERSION.to_string()),
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability {
                            list_changed: false,
                        },
                    },
                    server_info: ServerInfo::default(),
                };
                respond(id, &result)
            }
            "ping" => JsonRpcResponse::success(id, Value::Object(Default::default())),
            "tools/list" => {
                let tools = self
                    .registry
                    .list()
                    .map(|tool| ToolInfo {
                        name: tool.name().to_string(),
                        description: tool.description().to_string(),
                        input_schema: tool.input_schema(),
                    })
                    .collect();
                respond(id, &ListToolsResult { tools })
            }
            "tools/call" => {
                self.spawn_call(id, message.params, tx, calls).await;
                return;
            }
            other => JsonRpcResponse::failure(Some(id), JsonRpcError::method_not_found(other)),
        };
        send(tx, response).await;
    }

    async fn spawn_call(
        &self,
        id: RequestId,
        params: Option<Value>,
        tx: &mpsc::Sender<JsonRpcResponse>,
        calls: &mut JoinSet<()>,
    ) {
        let parsed = params
            .map(serde_json::from_value::<CallToolParams>)
            .transpose();
        let params = match parsed {
            Ok(Some(params)) => params,
            Ok(None) => {
                send(
                    tx,
                    JsonRpcResponse::failure(
                        Some(id),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ),
                )
                .await;
                return;
            }
            Err(e) => {
                send(
                    tx,
                    JsonRpcResponse::failure(
                        Some(id),
                        JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                    ),
                )
                .await;
                return;
            }
        };

        let Some(tool) = self.registry.get(&params.name) else {
            send(
                tx,
                JsonRpcResponse::failure(
                    Some(id),
                    JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)),
                ),
            )
            .await;
            return;
        };

        let token = CancellationToken::new();
        let registered = match self.in_flight.entry(id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(token.clone());
                true
            }
        };
        if !registered {
            send(
                tx,
                JsonRpcResponse::failure(
                    Some(id.clone()),
                    JsonRpcError::new(
                        JsonRpcError::INVALID_REQUEST,
                        format!("Request id {} is already in flight", id),
                    ),
                ),
            )
            .await;
            return;
        }
        let ctx = self.context.for_call(token.clone());
        let in_flight = Arc::clone(&self.in_flight);
        let tx = tx.clone();
        let arguments = params.arguments.unwrap_or(Value::Null);

        tracing::debug!(request_id = %id, tool = tool.name(), "tool call started");

        calls.spawn(async move {
            let outcome = tool.call(arguments, &ctx).await;
            in_flight.remove(&id);

            if token.is_cancelled() || matches!(outcome, Err(ref e) if e.is_cancelled()) {
                tracing::debug!(request_id = %id, "dropping result of cancelled call");
                return;
            }

            let result = match outcome {
                Ok(output) => CallToolResult::text(output.into_text()),
                Err(e) => {
                    tracing::warn!(request_id = %id, tool = tool.name(), error = %e, "tool call failed");
                    CallToolResult::error(e.to_string())
                }
            };
            send(&tx, respond(id, &result)).await;
        });
    }
}

fn respond<T: Serialize>(id: RequestId, payload: &T) -> JsonRpcResponse {
    match serde_json::to_value(payload) {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => JsonRpcResponse::failure(
            Some(id),
            JsonRpcError::new(JsonRpcError::INTERNAL_ERROR, e.to_string()),
        ),
    }
}

/// Collects tasks that already finished so the set only holds running calls.
fn reap_finished(calls: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while let Some(joined) = calls.try_join_next() {
        if let Err(e) = joined {
            tracing::error!(error = %e, "tool call task failed");
        }
        reaped += 1;
    }
    reaped
}

async fn send(tx: &mpsc::Sender<JsonRpcResponse>, response: JsonRpcResponse) {
    if tx.send(response).await.is_err() {
        tracing::error!("response dropped: writer has stopped");
    }
}

async fn write_messages<W>(mut writer: W, mut rx: mpsc::Receiver<JsonRpcResponse>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

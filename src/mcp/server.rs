//! MCP server implementation

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::handlers::ProtocolHandlers;
use crate::mcp::protocol::*;
use crate::mcp::transport::StdioTransport;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tracing::{debug, error, info};

pub struct McpServer {
    handlers: Arc<ProtocolHandlers>,
}

impl McpServer {
    pub fn new(services: Arc<Services>) -> Self {
        Self {
            handlers: Arc::new(ProtocolHandlers::new(services)),
        }
    }

    /// Run the MCP server on stdin/stdout until EOF or Ctrl+C
    pub async fn run(&mut self) -> Result<(), McpError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC from `input`, answering on `output`
    pub async fn serve<R, W>(&mut self, input: R, output: W) -> Result<(), McpError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Starting ragdex MCP server");

        let mut reader = BufReader::new(input).lines();
        let mut transport = StdioTransport::with_writer(output);

        // Spawn signal handler
        let mut shutdown = tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
        });

        // Main loop
        loop {
            tokio::select! {
                // Process input messages
                line = reader.next_line() => {
                    match line? {
                        Some(line) if !line.trim().is_empty() => {
                            let response = self.process_line(&line).await;
                            transport.send_response(response).await?;
                        }
                        None => break, // EOF
                        _ => continue,
                    }
                }

                // Handle Ctrl+C
                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        shutdown.abort();
        info!("MCP server shutting down");
        Ok(())
    }

    /// Turn one input line into a response, empty for notifications
    pub async fn process_line(&self, line: &str) -> JsonRpcResponse {
        debug!("Received: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                error!("Error parsing message: {}", e);
                return JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
            }
        };

        let id = request.id.clone();
        let notification = request.is_notification();

        let response = match self.process_message(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error processing message: {}", e);
                let (code, message) = e.code_and_message();
                JsonRpcResponse::error(id, code, message)
            }
        };

        if notification {
            JsonRpcResponse::empty()
        } else {
            response
        }
    }

    async fn process_message(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse, McpError> {
        if request.jsonrpc != "2.0" {
            return Err(McpError::InvalidRequest(format!(
                "Unsupported jsonrpc version: {}",
                request.jsonrpc
            )));
        }

        // Route to handler
        match request.method.as_str() {
            "initialize" => self.handlers.handle_initialize(request).await,
            "initialized" | "notifications/initialized" => {
                self.handlers.handle_initialized(request).await
            }
            "tools/list" => self.handlers.handle_tools_list(request).await,
            "tools/call" => self.handlers.handle_tools_call(request).await,
            "ping" => self.handlers.handle_ping(request).await,
            _ => Ok(JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Unknown method: {}", request.method),
            )),
        }
    }
}

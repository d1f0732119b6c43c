//! MCP server exposing the PCB calculators as tools.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: Capability negotiation and version agreement
//! 2. **Operation**: Handling tool calls and other requests
//! 3. **Shutdown**: Graceful connection termination
//!
//! Every tool call builds a fresh input from the configured defaults, overlays
//! the caller's arguments, evaluates one calculator and returns the input,
//! the result and a formatted report. Non-finite result values serialise as
//! `null` and are named in a `non_finite` list; the report shows them as
//! `NaN` or `inf`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::calc::report::non_finite_fields;
use crate::calc::{Calculator, Calculators, LayerKind, Report, TraceWidthInput};
use crate::mcp::protocol::{
    parse_message, ErrorCode, IncomingMessage, JsonRpcError, JsonRpcErrorData,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, OutgoingMessage, RequestId,
    MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::transport::StdioTransport;

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<Value>,
}

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Arguments of the `trace_ampacity` tool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct AmpacityArgs {
    width_mm: Option<f64>,
    copper_weight_oz: f64,
    allowed_rise_c: f64,
    layer: LayerKind,
}

impl Default for AmpacityArgs {
    fn default() -> Self {
        let trace = TraceWidthInput::default();
        Self {
            width_mm: None,
            copper_weight_oz: trace.copper_weight_oz,
            allowed_rise_c: trace.allowed_rise_c,
            layer: trace.layer,
        }
    }
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    pub is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Creates a successful result holding pretty-printed JSON.
    fn json(value: &Value) -> Self {
        // Serialising a `Value` cannot fail; non-finite numbers are already `null`
        Self::text(serde_json::to_string_pretty(value).unwrap_or_default())
    }
}

/// The MCP server for the PCB calculators.
pub struct McpServer {
    /// Current server state.
    state: ServerState,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// Calculators configured with the session's material constants.
    calculators: Calculators,
}

impl McpServer {
    /// Creates a new MCP server around the given calculators.
    #[must_use]
    pub const fn new(calculators: Calculators) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            protocol_version: None,
            calculators,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the negotiated protocol version, once initialised.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Runs the MCP server on stdio with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.run_with_shutdown(&mut transport).await
    }

    /// Serves messages from `transport` until its input is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve<R, W>(&mut self, transport: &mut StdioTransport<R, W>) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let line_result = transport.read_line().await;
            if self.handle_transport_result(transport, line_result).await? {
                return Ok(());
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown<R, W>(
        &mut self,
        transport: &mut StdioTransport<R, W>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = transport.read_line() => {
                    if self.handle_transport_result(transport, line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown<R, W>(
        &mut self,
        transport: &mut StdioTransport<R, W>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = transport.read_line() => {
                    if self.handle_transport_result(transport, line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result<R, W>(
        &mut self,
        transport: &mut StdioTransport<R, W>,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(line) = line_result? else {
            debug!("Input closed");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if let Some(reply) = self.handle_line(&line) {
            transport.write_message(&reply).await?;
        }

        Ok(self.state == ServerState::ShuttingDown)
    }

    /// Handles a single line of input and returns the reply, if any.
    ///
    /// Blank lines and notifications produce no reply.
    pub fn handle_line(&mut self, line: &str) -> Option<OutgoingMessage> {
        if line.trim().is_empty() {
            return None;
        }

        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => Some(self.handle_request(&req)),
            Ok(IncomingMessage::Notification(notif)) => {
                self.handle_notification(&notif);
                None
            }
            Err(error) => {
                warn!(code = error.error.code, "Rejected malformed message");
                Some(error.into())
            }
        }
    }

    /// Handles an incoming request.
    fn handle_request(&mut self, req: &JsonRpcRequest) -> OutgoingMessage {
        debug!(id = %req.id, method = %req.method, "Request");

        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(req),
            "tools/list" => self.handle_tools_list(req),
            "tools/call" => self.handle_tools_call(req),
            "ping" => Ok(JsonRpcResponse::success(req.id.clone(), json!({}))),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        };

        match response {
            Ok(resp) => resp.into(),
            Err(error) => error.into(),
        }
    }

    /// Handles an incoming notification.
    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            info!("Client initialised, server running");
            self.state = ServerState::Running;
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::invalid_request(
                Some(req.id.clone()),
                "Server already initialised",
            ));
        }

        let params: InitializeParams = decode_params(req)?;
        if params.protocol_version != MCP_PROTOCOL_VERSION {
            debug!(
                requested = %params.protocol_version,
                offered = MCP_PROTOCOL_VERSION,
                "Client requested a different protocol version"
            );
        }

        self.protocol_version = Some(MCP_PROTOCOL_VERSION.to_string());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": ServerCapabilities {
                tools: ToolCapabilities::default(),
            },
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let result = json!({
            "tools": Self::get_tool_definitions(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/call request.
    fn handle_tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ToolCallParams = decode_params(req)?;
        info!(tool = %params.name, "Tool call");

        let result = self.call_tool(&params.name, &params.arguments);

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::new(
                Some(req.id.clone()),
                JsonRpcErrorData::with_message(
                    ErrorCode::InternalError,
                    "Internal error: failed to serialise result",
                ),
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    /// Dispatches a tool call by name.
    #[must_use]
    pub fn call_tool(&self, name: &str, arguments: &Value) -> ToolCallResult {
        match name {
            "trace_width" => self.call_trace_width(arguments),
            "trace_ampacity" => self.call_trace_ampacity(arguments),
            "resistance_temperature" => self.call_resistance_temperature(arguments),
            "thermal_via" => self.call_thermal_via(arguments),
            "calculator_defaults" => self.call_calculator_defaults(),
            _ => ToolCallResult::error(format!("Unknown tool: {name}")),
        }
    }

    /// Ensures the server is in the Running state.
    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::invalid_request(
                Some(id.clone()),
                "Server not initialised",
            ));
        }
        Ok(())
    }

    fn call_trace_width(&self, arguments: &Value) -> ToolCallResult {
        let input = match normalise_layer(arguments)
            .and_then(|args| merge_arguments(TraceWidthInput::default(), &args))
        {
            Ok(input) => input,
            Err(e) => return ToolCallResult::error(e),
        };

        let result = self.calculators.trace_width.compute(&input);
        debug!(width_mm = result.required_width_mm, "trace_width evaluated");

        ToolCallResult::json(&success_payload(&input, &result, &result.report()))
    }

    fn call_trace_ampacity(&self, arguments: &Value) -> ToolCallResult {
        let args = match normalise_layer(arguments)
            .and_then(|args| merge_arguments(AmpacityArgs::default(), &args))
        {
            Ok(args) => args,
            Err(e) => return ToolCallResult::error(e),
        };
        let Some(width_mm) = args.width_mm else {
            return ToolCallResult::error("Missing required parameter: width_mm");
        };

        let max_current_a = self.calculators.trace_width.ampacity(
            width_mm,
            args.copper_weight_oz,
            args.allowed_rise_c,
            args.layer,
        );

        let report = Report::new("IPC-2221 ampacity")
            .line("Width", format!("{width_mm} mm"))
            .line("Layer", args.layer.to_string())
            .line("Maximum current", format!("{max_current_a:.3} A"));

        ToolCallResult::json(&success_payload(
            &args,
            &json!({ "max_current_a": max_current_a }),
            &report,
        ))
    }

    fn call_resistance_temperature(&self, arguments: &Value) -> ToolCallResult {
        let input = match merge_arguments(self.calculators.default_resistance_input(), arguments) {
            Ok(input) => input,
            Err(e) => return ToolCallResult::error(e),
        };

        let result = self.calculators.resistance.compute(&input);
        ToolCallResult::json(&success_payload(&input, &result, &result.report(&input)))
    }

    fn call_thermal_via(&self, arguments: &Value) -> ToolCallResult {
        let input = match merge_arguments(self.calculators.default_thermal_via_input(), arguments) {
            Ok(input) => input,
            Err(e) => return ToolCallResult::error(e),
        };

        let result = self.calculators.thermal_via.compute(&input);
        ToolCallResult::json(&success_payload(&input, &result, &result.report()))
    }

    fn call_calculator_defaults(&self) -> ToolCallResult {
        ToolCallResult::json(&json!({
            "status": "success",
            "trace_width": TraceWidthInput::default(),
            "resistance_temperature": self.calculators.default_resistance_input(),
            "thermal_via": self.calculators.default_thermal_via_input(),
            "copper": self.calculators.copper(),
            "ipc2221": self.calculators.trace_width.coefficients(),
        }))
    }

    /// Returns the list of available tools.
    #[allow(clippy::too_many_lines)]
    fn get_tool_definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "trace_width".to_string(),
                description: "Minimum PCB trace width for a current and allowed temperature \
                     rise using the IPC-2221 curve fit, plus DC resistance and I²R loss at \
                     20 °C and at ambient + rise. Omitted fields use the defaults from \
                     calculator_defaults. Lengths in millimetres."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "current_a": { "type": "number", "description": "Current in A" },
                        "allowed_rise_c": { "type": "number", "description": "Allowed temperature rise in °C" },
                        "layer": {
                            "type": "string",
                            "enum": ["external", "internal"],
                            "description": "Layer the trace is routed on"
                        },
                        "copper_weight_oz": { "type": "number", "description": "Copper weight in oz/ft²" },
                        "trace_length_mm": { "type": "number", "description": "Trace length in mm" },
                        "ambient_temp_c": { "type": "number", "description": "Ambient temperature in °C" }
                    }
                }),
            },
            ToolDefinition {
                name: "trace_ampacity".to_string(),
                description: "Maximum current of a trace of given width per IPC-2221."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "width_mm": { "type": "number", "description": "Trace width in mm" },
                        "copper_weight_oz": { "type": "number", "description": "Copper weight in oz/ft² (default 2)" },
                        "allowed_rise_c": { "type": "number", "description": "Allowed temperature rise in °C (default 10)" },
                        "layer": { "type": "string", "enum": ["external", "internal"] }
                    },
                    "required": ["width_mm"]
                }),
            },
            ToolDefinition {
                name: "resistance_temperature".to_string(),
                description: "Resistance of a rectangular conductor at two temperatures: \
                     R(T) = ρ20 × (1 + α(T − 20)) × L / A. Omitted fields use the configured \
                     copper properties and default geometry."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "resistivity_20c": { "type": "number", "description": "Resistivity at 20 °C in Ω·m" },
                        "temp_coefficient": { "type": "number", "description": "Temperature coefficient in 1/°C" },
                        "temp1_c": { "type": "number", "description": "First temperature in °C" },
                        "temp2_c": { "type": "number", "description": "Second temperature in °C" },
                        "length_mm": { "type": "number", "description": "Length in mm" },
                        "width_mm": { "type": "number", "description": "Width in mm" },
                        "thickness_mm": { "type": "number", "description": "Thickness in mm" }
                    }
                }),
            },
            ToolDefinition {
                name: "thermal_via".to_string(),
                description: "Vertical conductive thermal resistance of a via array through \
                     the barrel copper only. Lower bound: ignores spreading, pad contact, \
                     fill and dielectric conduction."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "via_count": { "type": "integer", "minimum": 0, "description": "Number of vias" },
                        "finished_hole_diameter_mm": { "type": "number", "description": "Finished hole diameter in mm" },
                        "plating_thickness_mm": { "type": "number", "description": "Barrel plating thickness in mm" },
                        "board_thickness_mm": { "type": "number", "description": "Board thickness in mm" },
                        "thermal_conductivity": { "type": "number", "description": "Plating thermal conductivity in W/(m·K)" }
                    }
                }),
            },
            ToolDefinition {
                name: "calculator_defaults".to_string(),
                description: "Default inputs of every calculator and the configured material \
                     constants."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
            },
        ]
    }
}

/// Decodes the params of a request, which must be present.
fn decode_params<T: DeserializeOwned>(req: &JsonRpcRequest) -> Result<T, JsonRpcError> {
    let params = req.params.as_ref().ok_or_else(|| {
        JsonRpcError::invalid_params(req.id.clone(), format!("Missing {} params", req.method))
    })?;

    serde_json::from_value(params.clone()).map_err(|e| {
        JsonRpcError::invalid_params(req.id.clone(), format!("Invalid {} params: {e}", req.method))
    })
}

/// Overlays the fields in `arguments` onto `defaults`.
///
/// `null` or missing arguments leave the defaults untouched. Unknown fields
/// and values of the wrong JSON type are rejected.
fn merge_arguments<T>(defaults: T, arguments: &Value) -> Result<T, String>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(&defaults) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    match arguments {
        Value::Null => {}
        Value::Object(overrides) => {
            for (key, value) in overrides {
                merged.insert(key.clone(), value.clone());
            }
        }
        _ => return Err("Tool arguments must be a JSON object".to_string()),
    }

    serde_json::from_value(Value::Object(merged)).map_err(|e| format!("Invalid arguments: {e}"))
}

/// Rewrites a loosely spelled `layer` argument to its canonical name.
fn normalise_layer(arguments: &Value) -> Result<Value, String> {
    let mut arguments = arguments.clone();
    if let Some(layer) = arguments.get_mut("layer") {
        let parsed = layer
            .as_str()
            .and_then(LayerKind::from_str_loose)
            .ok_or_else(|| "Parameter 'layer' must be \"external\" or \"internal\"".to_string())?;
        *layer = Value::String(parsed.to_string());
    }
    Ok(arguments)
}

fn success_payload<I: Serialize, O: Serialize>(input: &I, result: &O, report: &Report) -> Value {
    let result = serde_json::to_value(result).unwrap_or_default();
    let non_finite = non_finite_fields(&result);

    let mut payload = json!({
        "status": "success",
        "input": input,
        "result": result,
        "report": report.to_string(),
    });
    if !non_finite.is_empty() {
        payload["non_finite"] = json!(non_finite);
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_server() -> McpServer {
        let mut server = McpServer::new(Calculators::default());
        server.state = ServerState::Running;
        server
    }

    fn payload(result: &ToolCallResult) -> Value {
        let ToolContent::Text { text } = &result.content[0];
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn server_initial_state() {
        let server = McpServer::new(Calculators::default());
        assert_eq!(server.state(), ServerState::AwaitingInit);
        assert_eq!(server.protocol_version(), None);
    }

    #[test]
    fn tool_definitions_valid() {
        let tools = McpServer::get_tool_definitions();
        assert_eq!(tools.len(), 5);

        for tool in &tools {
            assert!(!tool.name.is_empty());
            assert!(tool.input_schema.is_object());
        }
    }

    #[test]
    fn tool_call_result_text() {
        let result = ToolCallResult::text("Hello, world!");
        assert!(!result.is_error);
        assert_eq!(result.content.len(), 1);

        match &result.content[0] {
            ToolContent::Text { text } => assert_eq!(text, "Hello, world!"),
        }
    }

    #[test]
    fn tool_call_result_error() {
        let result = ToolCallResult::error("Something went wrong");
        assert!(result.is_error);

        match &result.content[0] {
            ToolContent::Text { text } => assert_eq!(text, "Something went wrong"),
        }
    }

    #[test]
    fn merge_keeps_defaults_for_missing_fields() {
        let input: TraceWidthInput =
            merge_arguments(TraceWidthInput::default(), &json!({ "current_a": 5.0 })).unwrap();
        assert!((input.current_a - 5.0).abs() < f64::EPSILON);
        assert!((input.copper_weight_oz - 2.0).abs() < f64::EPSILON);

        let input: TraceWidthInput =
            merge_arguments(TraceWidthInput::default(), &Value::Null).unwrap();
        assert_eq!(input, TraceWidthInput::default());
    }

    #[test]
    fn merge_rejects_bad_arguments() {
        assert!(merge_arguments(TraceWidthInput::default(), &json!({ "bogus": 1 })).is_err());
        assert!(merge_arguments(TraceWidthInput::default(), &json!({ "current_a": "x" })).is_err());
        assert!(merge_arguments(TraceWidthInput::default(), &json!([1, 2])).is_err());
    }

    #[test]
    fn layer_spellings_are_normalised() {
        let args = normalise_layer(&json!({ "layer": "Inner" })).unwrap();
        assert_eq!(args["layer"], "internal");
        assert!(normalise_layer(&json!({ "layer": "top" })).is_err());
        assert!(normalise_layer(&json!({ "layer": 3 })).is_err());
    }

    #[test]
    fn trace_width_tool_returns_result() {
        let server = running_server();
        let result = server.call_tool("trace_width", &json!({ "layer": "internal" }));
        assert!(!result.is_error);

        let value = payload(&result);
        assert_eq!(value["status"], "success");
        assert_eq!(value["input"]["layer"], "internal");
        assert!(value["result"]["required_width_mm"].as_f64().unwrap() > 0.0);
        assert!(value["report"].as_str().unwrap().contains("Required width"));
    }

    #[test]
    fn thermal_via_rejects_negative_count() {
        let server = running_server();
        let result = server.call_tool("thermal_via", &json!({ "via_count": -4 }));
        assert!(result.is_error);
    }

    #[test]
    fn ampacity_requires_width() {
        let server = running_server();
        assert!(server.call_tool("trace_ampacity", &json!({})).is_error);

        let result = server.call_tool("trace_ampacity", &json!({ "width_mm": 1.0 }));
        assert!(!result.is_error);
        assert!(payload(&result)["result"]["max_current_a"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn ampacity_rejects_unknown_and_mistyped_arguments() {
        let server = running_server();
        assert!(
            server
                .call_tool("trace_ampacity", &json!({ "width_mm": 1.0, "width": 2.0 }))
                .is_error
        );
        assert!(
            server
                .call_tool("trace_ampacity", &json!({ "width_mm": "wide" }))
                .is_error
        );
        assert!(
            server
                .call_tool("trace_ampacity", &json!({ "width_mm": 1.0, "layer": "top" }))
                .is_error
        );

        let result = server.call_tool(
            "trace_ampacity",
            &json!({ "width_mm": 1.0, "layer": "inner", "copper_weight_oz": 1.0 }),
        );
        let value = payload(&result);
        assert_eq!(value["input"]["layer"], "internal");
        assert_eq!(value["input"]["allowed_rise_c"], 10.0);
    }

    #[test]
    fn non_finite_results_are_named() {
        let server = running_server();
        let result = server.call_tool("trace_width", &json!({ "current_a": -5.0 }));
        assert!(!result.is_error);

        let value = payload(&result);
        assert!(value["result"]["required_width_mm"].is_null());
        let names: Vec<_> = value["non_finite"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(names.contains(&"required_width_mm"));
        assert!(value["report"].as_str().unwrap().contains("NaN"));

        let finite = payload(&server.call_tool("trace_width", &json!({})));
        assert!(finite.get("non_finite").is_none());
    }

    #[test]
    fn unknown_tool_is_error() {
        let server = running_server();
        assert!(server.call_tool("solder_bridge", &json!({})).is_error);
    }
}

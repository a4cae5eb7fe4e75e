//! MCP server implementation for Trellis
//!
//! This module implements the Model Context Protocol server that exposes
//! window manager query and command tools to AI assistants.

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, serde,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::json;
use std::sync::Arc;

use crate::core::command::CommandOutcome;
use crate::core::matcher::{find_windows, MatchCriteria, WindowDescriptor};
use crate::gateway::{GatewayError, WmGateway};

/// Parameters for the find_windows tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct FindWindowsParams {
    /// Match window title (case-insensitive substring match)
    #[serde(default)]
    pub name: Option<String>,
    /// Match window class (e.g. firefox, Alacritty)
    #[serde(default)]
    pub class: Option<String>,
    /// Match window instance
    #[serde(default)]
    pub instance: Option<String>,
}

impl From<FindWindowsParams> for MatchCriteria {
    fn from(params: FindWindowsParams) -> Self {
        Self {
            name: params.name,
            class: params.class,
            instance: params.instance,
        }
    }
}

/// Parameters for the run_command tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RunCommandParams {
    /// The window manager command to execute
    pub command: String,
}

/// Trellis MCP Server
///
/// Bridges MCP tool calls to the window manager's IPC interface. Holds no
/// per-request state; every tool call fetches fresh window manager state
/// through the gateway.
#[derive(Clone)]
pub struct TrellisServer {
    /// Injected window manager gateway, shared by all handlers
    gateway: Arc<dyn WmGateway>,
    /// MCP tool router
    tool_router: ToolRouter<TrellisServer>,
}

#[tool_router]
impl TrellisServer {
    /// Create a new Trellis server over the given gateway.
    ///
    /// Probes the window manager version first so an unreachable window
    /// manager fails startup instead of the first tool call.
    pub async fn new(gateway: Arc<dyn WmGateway>) -> Result<Self, GatewayError> {
        let version = gateway.get_version().await?;
        tracing::info!("Connected to window manager {}", version.human_readable);

        Ok(Self {
            gateway,
            tool_router: Self::tool_router(),
        })
    }

    #[tool(description = "Get the window manager's current layout tree of outputs, workspaces, containers and windows.")]
    async fn get_tree(&self) -> Result<CallToolResult, McpError> {
        match self.gateway.get_tree().await {
            Ok(tree) => Ok(CallToolResult::success(vec![Content::text(
                serde_json::to_string_pretty(&tree).unwrap(),
            )])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(json!({
                "error": "Failed to get layout tree",
                "details": e.to_string()
            }).to_string())])),
        }
    }

    #[tool(description = "Get details about the window manager's current workspaces.")]
    async fn get_workspaces(&self) -> Result<CallToolResult, McpError> {
        match self.gateway.get_workspaces().await {
            Ok(workspaces) => {
                let result = json!({ "workspaces": workspaces });
                Ok(CallToolResult::success(vec![Content::text(
                    serde_json::to_string_pretty(&result).unwrap(),
                )]))
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(json!({
                "error": "Failed to get workspaces",
                "details": e.to_string()
            }).to_string())])),
        }
    }

    #[tool(description = "Search for windows matching the given criteria (name, class, or instance). Returns matching windows with their con_id which can be used with run_command.")]
    async fn find_windows(
        &self,
        params: Parameters<FindWindowsParams>,
    ) -> Result<CallToolResult, McpError> {
        let criteria: MatchCriteria = params.0.into();
        match self.search_windows(&criteria).await {
            Ok(windows) => {
                let result = json!({
                    "windows": windows,
                    "count": windows.len()
                });
                Ok(CallToolResult::success(vec![Content::text(
                    serde_json::to_string_pretty(&result).unwrap(),
                )]))
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(json!({
                "error": "Failed to search windows",
                "details": e.to_string()
            }).to_string())])),
        }
    }

    #[tool(description = "Execute a window manager command. Use i3 command syntax, e.g. '[con_id=123] move to workspace 7' or '[class=\"firefox\"] focus'. See https://i3wm.org/docs/userguide.html#command_criteria for criteria syntax.")]
    async fn run_command(
        &self,
        params: Parameters<RunCommandParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.execute_command(&params.0.command).await {
            Ok(results) => {
                let result = json!({ "results": results });
                Ok(CallToolResult::success(vec![Content::text(
                    serde_json::to_string_pretty(&result).unwrap(),
                )]))
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(json!({
                "error": "Failed to run command",
                "details": e.to_string()
            }).to_string())])),
        }
    }
}

impl TrellisServer {
    /// Fetch a fresh tree snapshot and search it.
    async fn search_windows(
        &self,
        criteria: &MatchCriteria,
    ) -> Result<Vec<WindowDescriptor>, GatewayError> {
        let tree = self.gateway.get_tree().await?;
        Ok(find_windows(&tree.root, criteria))
    }

    /// Pass the command string through verbatim.
    ///
    /// Sub-command failures come back as outcomes; only an IPC-level failure
    /// is an error here.
    async fn execute_command(&self, command: &str) -> Result<Vec<CommandOutcome>, GatewayError> {
        self.gateway.run_command(command).await
    }
}

#[tool_handler]
impl ServerHandler for TrellisServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Trellis bridges MCP to the i3/Sway window manager. \
                 Use find_windows to discover windows and their con_id, get_workspaces and \
                 get_tree to inspect the current layout, and run_command with i3 command \
                 syntax (e.g. '[con_id=123] focus') to act on them.".to_string()
            ),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::core::tree::{
        LayoutNode, LayoutTree, NodeKind, VersionInfo, WindowProperties, Workspace,
    };

    /// Gateway substitute serving canned replies.
    struct StubGateway {
        root: LayoutNode,
        workspaces: Vec<Workspace>,
        outcomes: Vec<CommandOutcome>,
        command_error: Option<String>,
        version_error: Option<String>,
    }

    impl Default for StubGateway {
        fn default() -> Self {
            Self {
                root: container(NodeKind::Root, "", Vec::new()),
                workspaces: Vec::new(),
                outcomes: Vec::new(),
                command_error: None,
                version_error: None,
            }
        }
    }

    #[async_trait]
    impl WmGateway for StubGateway {
        async fn get_version(&self) -> Result<VersionInfo, GatewayError> {
            if let Some(message) = &self.version_error {
                return Err(GatewayError::Unavailable { message: message.clone() });
            }
            Ok(VersionInfo {
                major: 4,
                minor: 23,
                patch: 0,
                human_readable: "4.23".to_string(),
            })
        }

        async fn get_tree(&self) -> Result<LayoutTree, GatewayError> {
            Ok(LayoutTree { root: self.root.clone() })
        }

        async fn get_workspaces(&self) -> Result<Vec<Workspace>, GatewayError> {
            Ok(self.workspaces.clone())
        }

        async fn run_command(&self, _command: &str) -> Result<Vec<CommandOutcome>, GatewayError> {
            if let Some(message) = &self.command_error {
                return Err(GatewayError::Unavailable { message: message.clone() });
            }
            Ok(self.outcomes.clone())
        }
    }

    fn window(con_id: i64, name: &str, class: &str) -> LayoutNode {
        LayoutNode {
            id: con_id,
            kind: NodeKind::Con,
            name: Some(name.to_string()),
            window: Some(con_id + 12000),
            window_properties: Some(WindowProperties {
                class: Some(class.to_string()),
                instance: None,
            }),
            focused: false,
            nodes: Vec::new(),
            floating_nodes: Vec::new(),
        }
    }

    fn container(kind: NodeKind, name: &str, nodes: Vec<LayoutNode>) -> LayoutNode {
        LayoutNode {
            id: 0,
            kind,
            name: if name.is_empty() { None } else { Some(name.to_string()) },
            window: None,
            window_properties: None,
            focused: false,
            nodes,
            floating_nodes: Vec::new(),
        }
    }

    async fn server(gateway: StubGateway) -> TrellisServer {
        TrellisServer::new(Arc::new(gateway))
            .await
            .expect("server construction should succeed")
    }

    #[tokio::test]
    async fn construction_fails_when_version_probe_fails() {
        let gateway = StubGateway {
            version_error: Some("socket not found".to_string()),
            ..Default::default()
        };

        let result = TrellisServer::new(Arc::new(gateway)).await;

        assert!(matches!(result, Err(GatewayError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn search_windows_matches_by_class_across_workspaces() {
        let gateway = StubGateway {
            root: container(
                NodeKind::Root,
                "",
                vec![container(
                    NodeKind::Output,
                    "eDP-1",
                    vec![
                        container(NodeKind::Workspace, "1", vec![window(100, "Firefox", "firefox")]),
                        container(NodeKind::Workspace, "2", vec![window(101, "Code", "Code")]),
                    ],
                )],
            ),
            ..Default::default()
        };
        let srv = server(gateway).await;

        let criteria = MatchCriteria {
            class: Some("Code".to_string()),
            ..Default::default()
        };
        let windows = srv.search_windows(&criteria).await.unwrap();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].con_id, 101);
        assert_eq!(windows[0].workspace, "2");
    }

    #[tokio::test]
    async fn search_windows_without_criteria_returns_every_window() {
        let gateway = StubGateway {
            root: container(
                NodeKind::Workspace,
                "1",
                vec![
                    window(100, "Mozilla Firefox", "firefox"),
                    window(101, "Terminal", "Alacritty"),
                ],
            ),
            ..Default::default()
        };
        let srv = server(gateway).await;

        let windows = srv.search_windows(&MatchCriteria::default()).await.unwrap();

        assert_eq!(windows.len(), 2);
    }

    #[tokio::test]
    async fn workspaces_pass_through_unchanged() {
        let gateway = StubGateway {
            workspaces: vec![
                Workspace { name: "1".to_string(), num: 1, visible: true, focused: true },
                Workspace { name: "2".to_string(), num: 2, visible: false, focused: false },
            ],
            ..Default::default()
        };
        let srv = server(gateway).await;

        let workspaces = srv.gateway.get_workspaces().await.unwrap();

        assert_eq!(workspaces.len(), 2);
        assert_eq!(workspaces[0].name, "1");
        assert_eq!(workspaces[1].name, "2");
        assert!(workspaces[0].focused);
        assert!(!workspaces[1].visible);
    }

    #[tokio::test]
    async fn execute_command_reports_each_sub_result() {
        let gateway = StubGateway {
            outcomes: vec![
                CommandOutcome { success: true, error: None },
                CommandOutcome {
                    success: false,
                    error: Some("No matching container".to_string()),
                },
                CommandOutcome { success: true, error: None },
            ],
            ..Default::default()
        };
        let srv = server(gateway).await;

        let results = srv.execute_command("focus; kill; focus").await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[2].success);
        assert_eq!(results[1].error.as_deref(), Some("No matching container"));
    }

    #[tokio::test]
    async fn execute_command_single_success() {
        let gateway = StubGateway {
            outcomes: vec![CommandOutcome { success: true, error: None }],
            ..Default::default()
        };
        let srv = server(gateway).await;

        let results = srv.execute_command("[con_id=123] focus").await.unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert_eq!(results[0].error, None);
    }

    #[tokio::test]
    async fn execute_command_surfaces_gateway_errors() {
        let gateway = StubGateway {
            command_error: Some("connection reset".to_string()),
            ..Default::default()
        };
        let srv = server(gateway).await;

        let result = srv.execute_command("[con_id=999] focus").await;

        assert!(matches!(result, Err(GatewayError::Unavailable { .. })));
    }
}

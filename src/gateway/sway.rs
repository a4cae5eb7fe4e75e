//! Production gateway speaking the i3/Sway IPC protocol via swayipc

use async_trait::async_trait;
use swayipc_async::{Connection, Node, NodeType};
use tokio::sync::Mutex;

use super::{GatewayError, WmGateway};
use crate::core::command::{collect_outcomes, CommandOutcome};
use crate::core::tree::{LayoutNode, LayoutTree, NodeKind, VersionInfo, WindowProperties, Workspace};

/// Gateway backed by a live i3 or Sway IPC connection.
///
/// The connection requires exclusive access per request, so it sits behind a
/// mutex; this is the gateway-internal serialization the rest of the crate
/// relies on. Socket discovery (`SWAYSOCK`/`I3SOCK`) is handled by swayipc.
pub struct SwayGateway {
    conn: Mutex<Connection>,
}

impl SwayGateway {
    /// Connect to the running window manager.
    pub async fn connect() -> Result<Self, GatewayError> {
        let conn = Connection::new().await.map_err(GatewayError::Connect)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

#[async_trait]
impl WmGateway for SwayGateway {
    async fn get_version(&self) -> Result<VersionInfo, GatewayError> {
        let mut conn = self.conn.lock().await;
        let version = conn.get_version().await.map_err(GatewayError::Request)?;

        Ok(VersionInfo {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            human_readable: version.human_readable,
        })
    }

    async fn get_tree(&self) -> Result<LayoutTree, GatewayError> {
        let mut conn = self.conn.lock().await;
        let root = conn.get_tree().await.map_err(GatewayError::Request)?;

        Ok(LayoutTree { root: layout_node(root) })
    }

    async fn get_workspaces(&self) -> Result<Vec<Workspace>, GatewayError> {
        let mut conn = self.conn.lock().await;
        let workspaces = conn.get_workspaces().await.map_err(GatewayError::Request)?;

        Ok(workspaces
            .into_iter()
            .map(|ws| Workspace {
                name: ws.name,
                num: ws.num,
                visible: ws.visible,
                focused: ws.focused,
            })
            .collect())
    }

    async fn run_command(&self, command: &str) -> Result<Vec<CommandOutcome>, GatewayError> {
        let mut conn = self.conn.lock().await;
        let replies = conn.run_command(command).await.map_err(GatewayError::Request)?;

        Ok(collect_outcomes(replies))
    }
}

/// Convert a swayipc node into the crate's tree model.
fn layout_node(node: Node) -> LayoutNode {
    LayoutNode {
        id: node.id,
        kind: node_kind(node.node_type),
        name: node.name,
        window: node.window,
        window_properties: node.window_properties.map(|props| WindowProperties {
            class: props.class,
            instance: props.instance,
        }),
        focused: node.focused,
        nodes: node.nodes.into_iter().map(layout_node).collect(),
        floating_nodes: node.floating_nodes.into_iter().map(layout_node).collect(),
    }
}

fn node_kind(node_type: NodeType) -> NodeKind {
    match node_type {
        NodeType::Root => NodeKind::Root,
        NodeType::Output => NodeKind::Output,
        NodeType::Workspace => NodeKind::Workspace,
        NodeType::FloatingCon => NodeKind::FloatingCon,
        NodeType::Con => NodeKind::Con,
        // dockarea and anything newer is structure as far as search goes
        _ => NodeKind::Con,
    }
}

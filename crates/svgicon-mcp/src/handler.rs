use async_trait::async_trait;
use rust_mcp_sdk::schema::{
    CallToolRequest, CallToolResult, ListToolsRequest, ListToolsResult, RpcError,
    schema_utils::CallToolError,
};
use rust_mcp_sdk::{McpServer, mcp_server::ServerHandler};
use std::sync::{Arc, Mutex, MutexGuard};
use svgicon::{MemoryClipboard, Session};

use crate::tools::{SvgIconTools, tool_error};

/// The one conversion session this server drives
pub struct SessionCell {
    session: Mutex<Session>,
    clipboard: Mutex<MemoryClipboard>,
}

impl Default for SessionCell {
    fn default() -> Self {
        Self {
            session: Mutex::new(Session::new()),
            clipboard: Mutex::new(MemoryClipboard::default()),
        }
    }
}

impl SessionCell {
    pub fn lock(&self) -> Result<MutexGuard<'_, Session>, CallToolError> {
        self.session
            .lock()
            .map_err(|_| tool_error("session lock poisoned by an earlier panic"))
    }

    pub fn clipboard(&self) -> Result<MutexGuard<'_, MemoryClipboard>, CallToolError> {
        self.clipboard
            .lock()
            .map_err(|_| tool_error("clipboard lock poisoned by an earlier panic"))
    }
}

pub struct SvgIconServerHandler {
    cell: SessionCell,
}

impl Default for SvgIconServerHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgIconServerHandler {
    pub fn new() -> Self {
        Self {
            cell: SessionCell::default(),
        }
    }
}

#[async_trait]
impl ServerHandler for SvgIconServerHandler {
    async fn handle_list_tools_request(
        &self,
        _request: ListToolsRequest,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: SvgIconTools::tools(),
        })
    }

    async fn handle_call_tool_request(
        &self,
        request: CallToolRequest,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<CallToolResult, CallToolError> {
        let tool_params: SvgIconTools =
            SvgIconTools::try_from(request.params).map_err(CallToolError::new)?;

        match tool_params {
            SvgIconTools::ConvertSvgTool(tool) => tool.call_tool(&self.cell),
            SvgIconTools::LoadSvgFileTool(tool) => tool.call_tool(&self.cell).await,
            SvgIconTools::SetComponentNameTool(tool) => tool.call_tool(&self.cell),
            SvgIconTools::SetViewboxFieldTool(tool) => tool.call_tool(&self.cell),
            SvgIconTools::ResetViewboxTool(tool) => tool.call_tool(&self.cell),
            SvgIconTools::GetComponentCodeTool(tool) => tool.call_tool(&self.cell),
            SvgIconTools::CopyComponentCodeTool(tool) => tool.call_tool(&self.cell),
            SvgIconTools::RenderPreviewTool(tool) => tool.call_tool(&self.cell),
            SvgIconTools::GetErrorsTool(tool) => tool.call_tool(&self.cell),
            SvgIconTools::DismissErrorsTool(tool) => tool.call_tool(&self.cell),
            SvgIconTools::ClearSessionTool(tool) => tool.call_tool(&self.cell),
        }
    }
}

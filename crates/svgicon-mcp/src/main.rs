mod handler;
mod raster;
mod tools;

use handler::SvgIconServerHandler;
use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, LATEST_PROTOCOL_VERSION, ServerCapabilities,
    ServerCapabilitiesTools,
};
use rust_mcp_sdk::{
    McpServer, StdioTransport, TransportOptions,
    error::SdkResult,
    mcp_server::{ServerRuntime, server_runtime},
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> SdkResult<()> {
    // Initialize tracing to stderr (stdout is for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let server_details = InitializeResult {
        server_info: Implementation {
            name: "svgicon".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: Some("SVG to SvgIcon Converter".to_string()),
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        meta: None,
        instructions: Some(
            "Convert SVG markup into a Material-UI SvgIcon React component. Start with \
             convert_svg or load_svg_file, adjust with set_component_name and \
             set_viewbox_field, then read the result with get_component_code or render_preview."
                .to_string(),
        ),
        protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
    };

    let transport = StdioTransport::new(TransportOptions::default())?;
    let handler = SvgIconServerHandler::new();
    let server: Arc<ServerRuntime> =
        server_runtime::create_server(server_details, transport, handler);

    tracing::info!("svgicon MCP server starting on stdio");
    if let Err(start_error) = server.start().await {
        eprintln!(
            "{}",
            start_error
                .rpc_error_message()
                .unwrap_or(&start_error.to_string())
        );
    }
    Ok(())
}

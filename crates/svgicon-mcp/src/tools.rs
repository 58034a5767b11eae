use facet::Facet;
use rust_mcp_sdk::macros::{JsonSchema, mcp_tool};
use rust_mcp_sdk::schema::{
    CallToolResult, ContentBlock, ImageContent, TextContent, schema_utils::CallToolError,
};
use rust_mcp_sdk::tool_box;
use serde::{Deserialize, Serialize};
use std::path::Path;
use svgicon::{ConvertError, SVG_MIME_TYPE, SelectedFile, Session, ViewBoxField};

use crate::handler::SessionCell;
use crate::raster::{PreviewOptions, calculate_ssim, create_side_by_side, svg_to_png};

use base64::Engine;

/// Helper to create CallToolError from a string message
pub fn tool_error(msg: impl Into<String>) -> CallToolError {
    CallToolError::new(std::io::Error::other(msg.into()))
}

/// Render a conversion error the way the error console shows it
fn render_error(error: &ConvertError) -> String {
    let mut out = String::new();
    let handler = miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut out, error).is_err() {
        return error.to_string();
    }
    strip_ansi(out.trim_end())
}

/// Strip ANSI escape sequences from text
fn strip_ansi(text: &str) -> String {
    let bytes = strip_ansi_escapes::strip(text);
    String::from_utf8_lossy(&bytes).into_owned()
}

fn json_result<'f, T: Facet<'f>>(value: &T) -> CallToolResult {
    CallToolResult::text_content(vec![TextContent::from(facet_json::to_string(value))])
}

/// Session summary returned by every state-changing tool
#[derive(Debug, Facet)]
pub struct SessionReport {
    pub state: String,
    pub component_name: String,
    #[facet(skip_unless_truthy)]
    pub view_box: Option<String>,
    #[facet(skip_unless_truthy)]
    pub original_view_box: Option<String>,
    #[facet(skip_unless_truthy)]
    pub element_count: Option<usize>,
    #[facet(skip_unless_truthy)]
    pub error: Option<String>,
    pub console_open: bool,
    pub copied: bool,
}

impl SessionReport {
    fn of(session: &Session) -> Self {
        let doc = session.parsed();
        Self {
            state: session.state().to_string(),
            component_name: session.component_name().to_string(),
            view_box: session.view_box().map(|v| v.to_string()),
            original_view_box: doc.map(|d| d.original_view_box.clone()),
            element_count: doc.map(|d| d.elements.iter().map(|e| e.node_count()).sum()),
            error: session.console().error().map(render_error),
            console_open: session.console().is_open(),
            copied: session.copied(),
        }
    }
}

#[derive(Debug, Facet)]
pub struct ErrorReport {
    pub open: bool,
    pub unacknowledged: bool,
    #[facet(skip_unless_truthy)]
    pub message: Option<String>,
}

#[derive(Debug, Facet)]
pub struct PreviewReport {
    pub view_box: String,
    pub element_count: usize,
    pub markup: String,
    /// Present whenever both images rendered, a score of 0 included
    pub ssim: Option<f64>,
    #[facet(skip_unless_truthy)]
    pub original_error: Option<String>,
    #[facet(skip_unless_truthy)]
    pub preview_error: Option<String>,
}

//====================//
//  ConvertSvg        //
//====================//
#[mcp_tool(
    name = "convert_svg",
    description = "Set the SVG input text and convert it. Returns the session state; errors are reported in the error console."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ConvertSvgTool {
    /// Raw SVG markup
    pub svg: String,
}

impl ConvertSvgTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let mut session = cell.lock()?;
        session.set_input(self.svg.as_str());
        let _ = session.parse();
        Ok(json_result(&SessionReport::of(&session)))
    }
}

//====================//
//  LoadSvgFile       //
//====================//
#[mcp_tool(
    name = "load_svg_file",
    description = "Load an SVG file from disk as the input and convert it. Only files of type image/svg+xml are accepted; the type is guessed from the extension unless given."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct LoadSvgFileTool {
    /// Path of the file to load
    pub path: String,
    /// Declared MIME type, e.g. 'image/svg+xml'
    pub mime_type: Option<String>,
}

impl LoadSvgFileTool {
    pub async fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let path = Path::new(&self.path);
        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| tool_error(format!("cannot read {}: {e}", self.path)))?;
        let mime_type = self
            .mime_type
            .clone()
            .unwrap_or_else(|| guess_mime_type(path).to_string());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.clone());

        let mut session = cell.lock()?;
        let _ = session.select_file(SelectedFile {
            name,
            mime_type,
            contents,
        });
        Ok(json_result(&SessionReport::of(&session)))
    }
}

//====================//
//  SetComponentName  //
//====================//
#[mcp_tool(
    name = "set_component_name",
    description = "Set the generated component's name. Characters outside [A-Za-z0-9_] are removed; an empty result falls back to CustomIcon."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetComponentNameTool {
    pub name: String,
}

impl SetComponentNameTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let mut session = cell.lock()?;
        session.set_component_name(&self.name);
        Ok(json_result(&SessionReport::of(&session)))
    }
}

//====================//
//  SetViewboxField   //
//====================//
#[mcp_tool(
    name = "set_viewbox_field",
    description = "Edit one field of the working viewBox (minX, minY, width or height) as if typed into its input. Blank means 0; otherwise the leading number is used. Ignored until something is converted."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetViewboxFieldTool {
    /// One of 'minX', 'minY', 'width', 'height'
    pub field: String,
    /// Raw text for the field
    pub value: String,
}

impl SetViewboxFieldTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let field: ViewBoxField = self.field.parse().map_err(|e| tool_error(format!("{e}")))?;
        let mut session = cell.lock()?;
        session.edit_viewbox(field, &self.value);
        Ok(json_result(&SessionReport::of(&session)))
    }
}

//====================//
//  ResetViewbox      //
//====================//
#[mcp_tool(
    name = "reset_viewbox",
    description = "Restore the working viewBox to the values resolved from the SVG."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ResetViewboxTool {}

impl ResetViewboxTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let mut session = cell.lock()?;
        session.reset_viewbox();
        Ok(json_result(&SessionReport::of(&session)))
    }
}

//====================//
//  GetComponentCode  //
//====================//
#[mcp_tool(
    name = "get_component_code",
    description = "Return the generated React component source for the current SVG, name and viewBox.",
    read_only_hint = true
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetComponentCodeTool {}

impl GetComponentCodeTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let session = cell.lock()?;
        let code = session
            .generated_code()
            .ok_or_else(|| tool_error("nothing converted yet: call convert_svg or load_svg_file first"))?;
        Ok(CallToolResult::text_content(vec![TextContent::from(code)]))
    }
}

//====================//
//  CopyComponentCode //
//====================//
#[mcp_tool(
    name = "copy_component_code",
    description = "Copy the generated component source to the server clipboard and return it."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct CopyComponentCodeTool {}

impl CopyComponentCodeTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let mut session = cell.lock()?;
        let mut clipboard = cell.clipboard()?;
        let _ = session.copy(&mut *clipboard);
        let report = SessionReport::of(&session);
        session.acknowledge_copy();

        let mut content: Vec<ContentBlock> =
            vec![TextContent::from(facet_json::to_string(&report)).into()];
        if report.copied {
            if let Some(code) = &clipboard.contents {
                content.push(TextContent::from(code.clone()).into());
            }
        }
        Ok(CallToolResult {
            content,
            is_error: None,
            meta: None,
            structured_content: None,
        })
    }
}

//====================//
//  RenderPreview     //
//====================//
#[mcp_tool(
    name = "render_preview",
    description = "Render the live preview as PNG next to the original input, with an SSIM similarity score and the preview's SVG markup.",
    read_only_hint = true
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct RenderPreviewTool {
    /// Width in pixels of each image (default 300)
    pub width: Option<u32>,
}

impl RenderPreviewTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let mut options = PreviewOptions::default();
        if let Some(width) = self.width {
            options.raster_width = width.clamp(16, 2048);
        }

        let session = cell.lock()?;
        let preview = session
            .preview()
            .ok_or_else(|| tool_error("nothing converted yet: call convert_svg or load_svg_file first"))?;
        let markup = preview.to_svg_markup();

        let original_png = svg_to_png(session.input(), &options);
        let preview_png = svg_to_png(&markup, &options);
        let ssim = match (&original_png, &preview_png) {
            (Ok(original), Ok(rendered)) => calculate_ssim(original, rendered).ok(),
            _ => None,
        };

        let report = PreviewReport {
            view_box: preview.view_box.clone(),
            element_count: preview.element_count(),
            markup,
            ssim,
            original_error: original_png.as_ref().err().map(|e| format!("{e:#}")),
            preview_error: preview_png.as_ref().err().map(|e| format!("{e:#}")),
        };

        let mut content: Vec<ContentBlock> =
            vec![TextContent::from(facet_json::to_string(&report)).into()];
        let side_by_side = create_side_by_side(
            original_png.as_deref().ok(),
            preview_png.as_deref().ok(),
        );
        match side_by_side {
            Ok(png) => {
                let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
                content.push(ImageContent::new(b64, "image/png".to_string(), None, None).into());
            }
            Err(e) => tracing::warn!(error = %e, "side-by-side image failed"),
        }

        Ok(CallToolResult {
            content,
            is_error: None,
            meta: None,
            structured_content: None,
        })
    }
}

//====================//
//  GetErrors         //
//====================//
#[mcp_tool(
    name = "get_errors",
    description = "Show the error console: whether it is open, whether an error is unacknowledged, and the rendered error.",
    read_only_hint = true
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetErrorsTool {}

impl GetErrorsTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let session = cell.lock()?;
        let console = session.console();
        Ok(json_result(&ErrorReport {
            open: console.is_open(),
            unacknowledged: console.has_unacknowledged(),
            message: console.error().map(render_error),
        }))
    }
}

//====================//
//  DismissErrors     //
//====================//
#[mcp_tool(
    name = "dismiss_errors",
    description = "Clear the current error message, optionally closing the error console."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DismissErrorsTool {
    /// Also close the console
    pub close: Option<bool>,
}

impl DismissErrorsTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let mut session = cell.lock()?;
        let console = session.console_mut();
        console.dismiss();
        if self.close.unwrap_or(false) {
            console.close();
        }
        Ok(json_result(&SessionReport::of(&session)))
    }
}

//====================//
//  ClearSession      //
//====================//
#[mcp_tool(
    name = "clear_session",
    description = "Discard the input, converted tree, viewBox and error, and reset the component name to CustomIcon."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ClearSessionTool {}

impl ClearSessionTool {
    pub fn call_tool(&self, cell: &SessionCell) -> Result<CallToolResult, CallToolError> {
        let mut session = cell.lock()?;
        session.clear();
        Ok(json_result(&SessionReport::of(&session)))
    }
}

// Generate the tool box enum
tool_box!(
    SvgIconTools,
    [
        ConvertSvgTool,
        LoadSvgFileTool,
        SetComponentNameTool,
        SetViewboxFieldTool,
        ResetViewboxTool,
        GetComponentCodeTool,
        CopyComponentCodeTool,
        RenderPreviewTool,
        GetErrorsTool,
        DismissErrorsTool,
        ClearSessionTool
    ]
);

//====================//
//  Helper functions  //
//====================//

/// MIME type a file picker would declare for this path
fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "svg" => SVG_MIME_TYPE,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "xml" => "text/xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_svg_from_extension() {
        assert_eq!(guess_mime_type(Path::new("icons/star.svg")), SVG_MIME_TYPE);
        assert_eq!(guess_mime_type(Path::new("STAR.SVG")), SVG_MIME_TYPE);
        assert_eq!(guess_mime_type(Path::new("star.png")), "image/png");
        assert_eq!(guess_mime_type(Path::new("star")), "application/octet-stream");
    }

    #[test]
    fn rendered_errors_have_no_escapes() {
        let mut session = Session::new();
        session.set_input("<svg>\n<path>\n</svg>");
        let err = session.parse().unwrap_err();
        let text = render_error(err);
        assert!(!text.contains('\x1b'), "{text}");
        assert!(text.contains("svgicon::parse::markup"), "{text}");
    }

    fn text_blocks(result: &CallToolResult) -> Vec<&str> {
        result
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::TextContent(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn convert_then_read_code() {
        let cell = SessionCell::default();
        let converted = ConvertSvgTool {
            svg: r#"<svg viewBox="0 0 24 24"><path d="M1 1h2v2"/></svg>"#.to_string(),
        }
        .call_tool(&cell)
        .expect("converts");
        let report = text_blocks(&converted).concat();
        assert!(report.contains(r#""state":"parsed""#), "{report}");

        SetComponentNameTool {
            name: "Dot".to_string(),
        }
        .call_tool(&cell)
        .expect("renames");
        let code = GetComponentCodeTool {}.call_tool(&cell).expect("code");
        let code = text_blocks(&code).concat();
        assert!(code.contains(r#"<path key={0} d="M1 1h2v2" />"#), "{code}");
        assert!(code.ends_with("export default Dot;"), "{code}");
    }

    #[test]
    fn code_before_conversion_is_a_tool_error() {
        let cell = SessionCell::default();
        assert!(GetComponentCodeTool {}.call_tool(&cell).is_err());
    }

    #[test]
    fn zero_similarity_is_still_reported() {
        let report = PreviewReport {
            view_box: "0 0 24 24".to_string(),
            element_count: 1,
            markup: String::new(),
            ssim: Some(0.0),
            original_error: None,
            preview_error: None,
        };
        let json = facet_json::to_string(&report);
        assert!(json.contains(r#""ssim":0"#), "{json}");
        assert!(!json.contains(r#""ssim":null"#), "{json}");
    }

    #[test]
    fn report_reflects_session() {
        let mut session = Session::new();
        session.set_input(r#"<svg viewBox="0 0 10 10"><g><path d="M0 0"/></g></svg>"#);
        session.parse().expect("parses");
        let report = SessionReport::of(&session);
        assert_eq!(report.state, "parsed");
        assert_eq!(report.element_count, Some(2));
        assert_eq!(report.view_box.as_deref(), Some("0 0 10 10"));
        assert!(report.error.is_none());
    }
}

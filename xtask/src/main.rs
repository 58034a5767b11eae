use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use std::fs;
use svgicon::compare::{CompareResult, check_round_trip};
use svgicon::{ViewBoxValues, generate_component, parse_document, render_preview};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  preview-html    Generate an HTML page previewing every fixture conversion");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "preview-html" => preview_html(),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

/// Outcome of converting one fixture
struct FixtureResult {
    name: String,
    source: String,
    /// Preview markup and generated code, or the rendered error
    output: Result<(String, String), String>,
    round_trip: CompareResult,
}

fn convert_fixture(path: &Utf8Path) -> FixtureResult {
    let name = path.file_name().unwrap_or(path.as_str()).to_string();
    eprintln!("Processing {name}...");

    let source = fs::read_to_string(path).unwrap_or_default();
    let output = match parse_document(&source) {
        Ok(doc) => {
            let view_box = ViewBoxValues::from_frame(&doc.original_view_box);
            let markup = render_preview(&doc.elements, &view_box).to_svg_markup();
            let code = generate_component(&doc.elements, "CustomIcon", &view_box);
            Ok((markup, code))
        }
        Err(e) => Err(e.to_string()),
    };
    let round_trip = check_round_trip(&source, "CustomIcon");

    FixtureResult {
        name,
        source,
        output,
        round_trip,
    }
}

fn preview_html() {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    let fixtures_dir = manifest_dir.join("../tests/fixtures");
    let output_path = manifest_dir.join("../preview.html");

    let mut paths: Vec<Utf8PathBuf> = fixtures_dir
        .read_dir_utf8()
        .expect("Failed to read fixtures directory")
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.extension() == Some("svg"))
        .collect();
    paths.sort();

    let results: Vec<FixtureResult> = paths.par_iter().map(|p| convert_fixture(p)).collect();

    let total = results.len();
    let passed = results.iter().filter(|r| r.round_trip.is_match()).count();
    let pass_rate = if total > 0 {
        (passed as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let mut html = String::new();
    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>SvgIcon Conversion Preview</title>
    <style>
        * {{ box-sizing: border-box; }}
        body {{
            font-family: system-ui, sans-serif;
            margin: 0;
            background: #eee;
            color: #333;
        }}
        .page {{ max-width: 1200px; margin: 0 auto; padding: 24px; }}
        h1 {{ font-weight: 600; font-size: 20px; margin: 0 0 24px 0; }}
        .stats {{ font-size: 13px; margin-bottom: 16px; }}
        .card {{
            background: white;
            border-radius: 8px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.08);
            margin-bottom: 16px;
            overflow: hidden;
        }}
        .card-header {{
            display: flex;
            justify-content: space-between;
            padding: 12px 16px;
            border-bottom: 1px solid #eee;
            background: #fafafa;
            font-size: 13px;
            font-weight: 600;
        }}
        .status {{ font-size: 11px; padding: 3px 8px; border-radius: 4px; }}
        .status.match {{ background: #dcfce7; color: #166534; }}
        .status.mismatch {{ background: #fee2e2; color: #991b1b; }}
        .card-body {{ padding: 12px 16px; }}
        .comparison {{ display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }}
        .column {{ border: 1px solid #e5e5e5; border-radius: 6px; overflow: hidden; }}
        .column-header {{
            padding: 8px 12px;
            font-size: 11px;
            font-weight: 600;
            text-transform: uppercase;
            border-bottom: 1px solid #e5e5e5;
            background: #f5f5f5;
        }}
        .svg-container {{
            padding: 12px;
            min-height: 60px;
            display: flex;
            align-items: center;
            justify-content: center;
        }}
        .svg-container svg {{ width: 96px; height: 96px; }}
        .error, .source {{
            font-family: 'SF Mono', Monaco, monospace;
            font-size: 11px;
            white-space: pre-wrap;
            padding: 8px 10px;
        }}
        .error {{ color: #991b1b; background: #fef2f2; }}
        .source {{ background: #f8f8f8; border: 1px solid #e0e0e0; border-radius: 4px; max-height: 300px; overflow: auto; }}
        summary {{ cursor: pointer; font-size: 11px; color: #666; padding: 4px 0; }}
    </style>
</head>
<body>
<div class="page">
<h1>SvgIcon Conversion Preview</h1>
<div class="stats">{:.0}% round-trip ({} / {})</div>
"#,
        pass_rate, passed, total
    ));

    for result in &results {
        let (status_class, status_text) = match &result.round_trip {
            CompareResult::Match => ("match", "ROUND TRIP OK".to_string()),
            other => ("mismatch", format!("{other:?}")),
        };
        let (preview, code) = match &result.output {
            Ok((markup, code)) => (markup.clone(), html_escape(code)),
            Err(e) => (
                format!(r#"<div class="error">{}</div>"#, html_escape(e)),
                String::new(),
            ),
        };

        html.push_str(&format!(
            r#"
<div class="card" id="{name}">
    <div class="card-header">
        <span>{name}</span>
        <span class="status {status_class}">{status}</span>
    </div>
    <div class="card-body">
        <div class="comparison">
            <div class="column">
                <div class="column-header">Input</div>
                <div class="svg-container">{input}</div>
            </div>
            <div class="column">
                <div class="column-header">Live preview</div>
                <div class="svg-container">{preview}</div>
            </div>
        </div>
        <details open>
            <summary>Generated component</summary>
            <div class="source">{code}</div>
        </details>
        <details>
            <summary>Source</summary>
            <div class="source">{source}</div>
        </details>
    </div>
</div>
"#,
            name = result.name,
            status = html_escape(&status_text),
            input = strip_prolog(&result.source),
            source = html_escape(&result.source),
        ));
    }

    html.push_str("</div>\n</body></html>");

    fs::write(&output_path, html).expect("Failed to write HTML");
    println!("Generated preview at: {output_path}");
}

/// Inline SVG without the XML declaration or doctype in front of it
fn strip_prolog(source: &str) -> &str {
    source.find("<svg").map_or(source, |start| &source[start..])
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

use camino::Utf8Path;
use svgicon::compare::{CompareResult, check_round_trip};

/// `sized_group.svg` -> `SizedGroup`
fn component_name(path: &Utf8Path) -> String {
    path.file_stem()
        .unwrap_or("CustomIcon")
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Format a colored inline diff using dissimilar
fn format_inline_diff(expected: &str, actual: &str) -> String {
    use dissimilar::Chunk;

    let mut output = String::new();
    output.push_str("\n=== Inline Diff (expected vs generated) ===\n");
    output.push_str("Legend: [-expected only-] [+generated only+] [unchanged]\n\n");

    for chunk in dissimilar::diff(expected, actual) {
        match chunk {
            Chunk::Equal(s) => output.push_str(s),
            Chunk::Delete(s) => {
                output.push_str("\x1b[31m[-");
                output.push_str(s);
                output.push_str("-]\x1b[0m");
            }
            Chunk::Insert(s) => {
                output.push_str("\x1b[32m[+");
                output.push_str(s);
                output.push_str("+]\x1b[0m");
            }
        }
    }

    output
}

fn test_svg_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let expected_path = path.with_extension("jsx");
    let expected = std::fs::read_to_string(&expected_path)?;
    let expected = expected.strip_suffix('\n').unwrap_or(&expected);

    let name = component_name(path);
    let generated = match svgicon::convert(&source, &name) {
        Ok(code) => code,
        Err(e) => panic!("Conversion failed for {}: {:?}", path, miette::Report::new(e)),
    };

    if generated != expected {
        panic!(
            "Component mismatch for {} (expected {}):\n{}",
            path,
            expected_path,
            format_inline_diff(expected, &generated)
        );
    }

    match check_round_trip(&source, &name) {
        CompareResult::Match => {}
        other => panic!("Round trip failed for {}: {:?}", path, other),
    }

    Ok(())
}

datatest_stable::harness! {
    { test = test_svg_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.svg$" },
}

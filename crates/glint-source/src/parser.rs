use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::source::ShaderSourcePair;

/// Token that marks a section switch line.
pub const MARKER: &str = "#shader";

// ── Section ───────────────────────────────────────────────────────────────

/// Section currently receiving lines.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Section {
    /// No marker seen yet; lines are dropped.
    None,
    Vertex,
    Fragment,
}

impl Section {
    /// Section selected by a marker line, or `current` when the marker names neither stage.
    fn after_marker(line: &str, current: Section) -> Section {
        if line.contains("vertex") {
            Section::Vertex
        } else if line.contains("fragment") {
            Section::Fragment
        } else {
            current
        }
    }
}

// ── ParseReport ───────────────────────────────────────────────────────────

/// Bookkeeping gathered while splitting a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Number of `#shader` marker lines encountered.
    pub markers: usize,
    /// Lines dropped because they appeared before the first usable marker.
    pub skipped_lines: usize,
}

// ── entry points ──────────────────────────────────────────────────────────

/// Splits `src` into vertex and fragment sections.
pub fn parse_str(src: &str) -> ShaderSourcePair {
    parse_str_with_report(src).0
}

/// Like [`parse_str`] but also returns a [`ParseReport`].
pub fn parse_str_with_report(src: &str) -> (ShaderSourcePair, ParseReport) {
    let mut vertex = String::new();
    let mut fragment = String::new();
    let mut report = ParseReport::default();
    let mut section = Section::None;

    for line in src.lines() {
        if line.contains(MARKER) {
            report.markers += 1;
            section = Section::after_marker(line, section);
            continue;
        }

        let out = match section {
            Section::None => {
                report.skipped_lines += 1;
                continue;
            }
            Section::Vertex => &mut vertex,
            Section::Fragment => &mut fragment,
        };
        out.push_str(line);
        out.push('\n');
    }

    (ShaderSourcePair::new(vertex, fragment), report)
}

/// Reads `path` and splits it with [`parse_str`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<ShaderSourcePair, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| LoadError::from_io(path.to_path_buf(), e))?;
    Ok(parse_str(&text))
}

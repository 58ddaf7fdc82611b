use std::path::Path;

use similar::TextDiff;

const CONTEXT_LINES: usize = 3;

/// A unified diff previewing what `gflows update` would do to `destination`,
/// preceded by a short description of both sides.
pub fn update_preview(actual: &str, generated: &str, source: &str, destination: &Path) -> String {
  let destination = destination.display().to_string();
  let patch = TextDiff::from_lines(actual, generated)
    .unified_diff()
    .context_radius(CONTEXT_LINES)
    .header(&destination, &destination)
    .to_string();

  format!(
    "src: <generated from: {}>\ndst: {}\nThis diff previews what will happen to {} if you run \"gflows update\"\n{}",
    source, destination, destination, patch
  )
}

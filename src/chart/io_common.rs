use std::path::Path;

use log::warn;

/// The name of the file without its extension, used as a default poll id.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Reads a textual vote count. Blank cells are missing counts; anything that is
/// not an integer is reported and counted as missing.
pub fn votes_from_text(cell: &str, option_id: &str) -> Option<i64> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    match s.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(
                "votes_from_text: option {}: vote count {:?} is not an integer, counting 0",
                option_id, s
            );
            None
        }
    }
}

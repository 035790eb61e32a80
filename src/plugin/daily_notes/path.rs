//! Daily note path resolution

use chrono::{DateTime, FixedOffset};

use crate::core::moment;
use crate::core::vault::Vault;

/// Compute the vault path of the daily note for `now`.
///
/// An explicit `folder_hint` is used verbatim, even when empty. Without one,
/// the vault decides the folder from `active_file`. The file name is `now`
/// formatted with `date_format`; characters it produces are not escaped, so a
/// format containing `/` yields nested folders.
pub fn resolve_path(
    folder_hint: Option<&str>,
    active_file: Option<&str>,
    date_format: &str,
    now: &DateTime<FixedOffset>,
    vault: &dyn Vault,
) -> String {
    let base = match folder_hint {
        Some(folder) => folder.to_string(),
        None => vault.new_file_parent(active_file.unwrap_or("")),
    };
    let stem = moment::format(now, date_format);
    tracing::debug!(base = %base, stem = %stem, "Resolving daily note path");

    // "" and "/" both mean the vault root. Length is in UTF-16 code units, so a
    // single astral character such as an emoji still names a folder.
    if base.encode_utf16().count() <= 1 {
        format!("/{stem}.md")
    } else {
        format!("{base}/{stem}.md")
    }
}

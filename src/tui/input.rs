use crate::model::Commit;

pub fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())
}

/// One line per commit: its URL when the repository is known, the bare id otherwise.
pub fn clipboard_text(commits: &[&Commit]) -> String {
    commits
        .iter()
        .map(|c| c.url.clone().unwrap_or_else(|| c.id.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}

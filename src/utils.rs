use std::path::Path;

/// Maps a file name to the language tag placed after the opening code fence.
///
/// The tag is looked up from whatever follows the last `.` of the file name,
/// lower-cased. Names without a `.` or with an unknown suffix get an empty tag.
pub fn get_language_tag(path: &Path) -> &'static str {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    let extension = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return "",
    };

    match extension.as_str() {
        "py" => "python",
        "js" => "javascript",
        "html" => "html",
        "css" => "css",
        "java" => "java",
        "c" => "c",
        "cpp" => "cpp",
        "md" => "markdown",
        "txt" => "text",
        "json" => "json",
        "xml" => "xml",
        "sql" => "sql",
        "sh" => "bash",
        "yaml" | "yml" => "yaml",
        _ => "",
    }
}

/// Link target used by the table of contents for a heading label.
pub fn toc_anchor(label: &str) -> String {
    label.replace(' ', "-").replace('.', "")
}

/// Picks a backtick fence long enough that nothing inside `content` can close it.
pub fn fence_for(content: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

/// Renders a path relative to `root` with `/` separators.
pub fn display_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

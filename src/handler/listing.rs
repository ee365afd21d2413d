//! Directory listing module
//!
//! Generates the HTML index page returned for directories that have no
//! index file.

use chrono::{DateTime, Local};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters escaped when embedding an entry name in an href
const HREF_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'&')
    .add(b'\'');

/// A single listing row
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

/// Collect the entries of `dir`, sorted by name.
///
/// Entries whose metadata cannot be read are still listed, with unknown
/// size and modification time.
pub async fn collect(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        match entry.metadata().await {
            Ok(metadata) => entries.push(ListingEntry {
                name,
                is_dir: metadata.is_dir(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::from),
            }),
            Err(_) => entries.push(ListingEntry {
                name,
                is_dir: false,
                size: 0,
                modified: None,
            }),
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Render the listing page for `request_path`
pub fn render(request_path: &str, entries: &[ListingEntry]) -> String {
    let title = escape_html(request_path);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>Index of {title}</title>");
    html.push_str(
        "<style>\n\
         body { font-family: monospace; margin: 2em; }\n\
         table { border-collapse: collapse; }\n\
         td { padding: 0.1em 1.5em 0.1em 0; }\n\
         .size, .mtime { color: #555; }\n\
         </style>\n</head>\n<body>\n",
    );
    let _ = writeln!(html, "<h1>Index of {title}</h1>\n<hr>\n<table>");

    if request_path != "/" {
        html.push_str("<tr><td><a href=\"../\">../</a></td><td></td><td></td></tr>\n");
    }

    for entry in entries {
        let mut href = utf8_percent_encode(&entry.name, HREF_ESCAPE).to_string();
        let mut name = escape_html(&entry.name);
        if entry.is_dir {
            href.push('/');
            name.push('/');
        }

        let size = if entry.is_dir {
            "-".to_string()
        } else {
            entry.size.to_string()
        };
        let mtime = entry.modified.map_or_else(
            || "-".to_string(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        );

        let _ = writeln!(
            html,
            "<tr><td><a href=\"{href}\">{name}</a></td>\
             <td class=\"size\">{size}</td>\
             <td class=\"mtime\">{mtime}</td></tr>"
        );
    }

    html.push_str("</table>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape text for embedding in HTML
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, size: u64) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            size,
            modified: None,
        }
    }

    #[test]
    fn test_render_lists_files_and_dirs() {
        let entries = vec![entry("docs", true, 0), entry("readme.txt", false, 42)];
        let html = render("/", &entries);

        assert!(html.contains("<title>Index of /</title>"));
        assert!(html.contains("<a href=\"docs/\">docs/</a>"));
        assert!(html.contains("<a href=\"readme.txt\">readme.txt</a>"));
        assert!(html.contains("42"));
        // No parent link at the root
        assert!(!html.contains("href=\"../\""));
    }

    #[test]
    fn test_render_subdirectory_has_parent_link() {
        let html = render("/docs/", &[]);
        assert!(html.contains("<title>Index of /docs/</title>"));
        assert!(html.contains("href=\"../\""));
    }

    #[test]
    fn test_render_empty_directory() {
        let html = render("/", &[]);
        assert!(html.contains("Index of /"));
        assert!(html.contains("</table>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let entries = vec![entry("a<b>&c.txt", false, 1), entry("with space.txt", false, 1)];
        let html = render("/", &entries);

        assert!(html.contains("a&lt;b&gt;&amp;c.txt"));
        assert!(!html.contains("a<b>&c.txt"));
        assert!(html.contains("href=\"with%20space.txt\""));
    }
}

// ABOUTME: Renders a unified diff into a standalone browsable HTML report.
// ABOUTME: Escapes every line and classifies added/removed/hunk lines for styling.

use chrono::Local;

/// Render a unified diff as a self-contained HTML page.
///
/// Each diff line becomes one classified `<div>`: file headers, hunk
/// markers, additions, removals, and context. An empty diff renders a
/// "no differences" note instead of an empty body.
pub fn render(diff: &str) -> String {
    let mut body = String::new();
    if diff.trim().is_empty() {
        body.push_str("<p class=\"clean\">No differences found.</p>\n");
    } else {
        for line in diff.lines() {
            let class = classify(line);
            body.push_str(&format!(
                "<div class=\"{}\">{}</div>\n",
                class,
                escape(line)
            ));
        }
    }

    let generated = Local::now().format("%Y-%m-%d %H:%M:%S %Z");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>sitecmp report</title>
<style>
body {{ font-family: monospace; margin: 1em; background: #fff; color: #111; }}
.meta {{ color: #666; margin-bottom: 1em; }}
.clean {{ color: #080; }}
div {{ white-space: pre-wrap; }}
.file {{ font-weight: bold; background: #eee; }}
.hunk {{ color: #06c; }}
.add {{ background: #e6ffe6; }}
.del {{ background: #ffe6e6; }}
.ctx {{ color: #333; }}
</style>
</head>
<body>
<h1>sitecmp report</h1>
<p class="meta">Generated {generated}</p>
{body}</body>
</html>
"#
    )
}

fn classify(line: &str) -> &'static str {
    if line.starts_with("+++") || line.starts_with("---") || line.starts_with("diff ")
        || line.starts_with("Only in ")
    {
        "file"
    } else if line.starts_with("@@") {
        "hunk"
    } else if line.starts_with('+') {
        "add"
    } else if line.starts_with('-') {
        "del"
    } else {
        "ctx"
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_diff_lines() {
        assert_eq!(classify("--- local/index.html"), "file");
        assert_eq!(classify("+++ live/index.html"), "file");
        assert_eq!(classify("Only in local: about.html"), "file");
        assert_eq!(classify("@@ -1,3 +1,3 @@"), "hunk");
        assert_eq!(classify("+<p>new</p>"), "add");
        assert_eq!(classify("-<p>old</p>"), "del");
        assert_eq!(classify(" <p>same</p>"), "ctx");
    }

    #[test]
    fn test_lines_are_escaped() {
        let html = render("+<script>alert(1)</script>");
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn test_empty_diff_renders_clean_note() {
        let html = render("");
        assert!(html.contains("No differences found."));
    }

    #[test]
    fn test_report_is_a_full_page() {
        let html = render("-a\n+b");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("class=\"del\""));
        assert!(html.contains("class=\"add\""));
        assert!(html.contains("Generated "));
    }
}

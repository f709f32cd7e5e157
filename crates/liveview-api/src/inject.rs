//! Script injection for host pages.

/// Insert `script` as an inline `<script>` block into `html`.
///
/// The block goes right before `</head>`, else right before `</body>`
/// (both matched case-insensitively), else at the very start.
pub fn inject_script(html: &str, script: &str) -> String {
    let block = format!("<script>{script}</script>");
    let lower = html.to_ascii_lowercase();
    let at = lower
        .find("</head>")
        .or_else(|| lower.find("</body>"))
        .unwrap_or(0);

    let mut out = String::with_capacity(html.len() + block.len());
    out.push_str(&html[..at]);
    out.push_str(&block);
    out.push_str(&html[at..]);
    out
}

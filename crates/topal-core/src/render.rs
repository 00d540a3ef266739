//! Sandboxed rendering of deployed site content
//!
//! Site HTML is untrusted. It is only ever emitted as the `srcdoc` of a
//! sandboxed iframe without `allow-same-origin`, so it runs in an opaque
//! origin and cannot reach the host page's DOM, storage or cookies.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SandboxedFrame {
    allow_scripts: bool,
}

impl SandboxedFrame {
    pub fn new(allow_scripts: bool) -> Self {
        Self { allow_scripts }
    }

    /// Value of the iframe `sandbox` attribute.
    pub fn sandbox_policy(&self) -> &'static str {
        if self.allow_scripts {
            "allow-scripts"
        } else {
            ""
        }
    }

    /// Wrap `html` in an isolated iframe.
    pub fn render(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len() + 96);
        out.push_str("<iframe sandbox=\"");
        out.push_str(self.sandbox_policy());
        out.push_str("\" srcdoc=\"");
        out.push_str(&escape_attribute(html));
        out.push_str("\" title=\"Site Content\" class=\"w-full h-full border-0\"></iframe>");
        out
    }
}

impl Default for SandboxedFrame {
    fn default() -> Self {
        Self::new(true)
    }
}

fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_escapes_content() {
        let frame = SandboxedFrame::default();
        let html = r#"<h1 class="x">Tom & Jerry's</h1>"#;
        let out = frame.render(html);

        assert!(out.starts_with("<iframe sandbox=\"allow-scripts\" srcdoc=\""));
        assert!(out.contains("&lt;h1 class=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/h1&gt;"));
        assert!(!out.contains("<h1"));
    }

    #[test]
    fn test_never_same_origin() {
        for frame in [SandboxedFrame::new(true), SandboxedFrame::new(false)] {
            let out = frame.render("<script>parent.document.body.remove()</script>");
            assert!(!out.contains("allow-same-origin"));
            assert!(!out.contains("<script>"));
        }
    }

    #[test]
    fn test_scripts_disabled() {
        let out = SandboxedFrame::new(false).render("<p>hi</p>");
        assert!(out.starts_with("<iframe sandbox=\"\" srcdoc="));
    }

    #[test]
    fn test_attribute_breakout_is_escaped() {
        let out = SandboxedFrame::default().render(r#""><script>alert(1)</script>"#);
        assert_eq!(out.matches('"').count(), 8);
    }
}

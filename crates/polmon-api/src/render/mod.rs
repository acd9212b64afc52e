//! # HTML Rendering
//!
//! Server-side page assembly with `format!`/`write!` templates. Every
//! dynamic string goes through [`html_escape`].
//!
//! | Module       | Renders                                     |
//! |--------------|---------------------------------------------|
//! | [`table`]    | filter bar, record table, pagination strip  |
//! | [`detail`]   | single-record detail page                   |
//! | [`download`] | export form with the result count           |

pub mod detail;
pub mod download;
pub mod table;

use std::fmt::Write as _;

use polmon_core::i18n::label;
use polmon_core::{RecordId, Translator};

use crate::session::Notice;

/// Failure while rendering a fragment.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("formatting failed")]
    Fmt(#[from] std::fmt::Error),
    #[error("record {0} is not in the dataset")]
    MissingRecord(RecordId),
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Inline block shown in place of a fragment that failed to render.
pub fn error_block(tr: &Translator, err: &RenderError) -> String {
    format!(
        r#"<div class="render-error"><strong>{}:</strong> <code>{}</code></div>"#,
        html_escape(tr.t(label::RENDER_ERROR)),
        html_escape(&err.to_string())
    )
}

/// A one-button form posting to `action`.
pub(crate) fn post_button(action: &str, text: &str, class: &str) -> String {
    format!(
        r#"<form method="post" action="{}" class="inline"><button type="submit" class="{}">{}</button></form>"#,
        html_escape(action),
        class,
        html_escape(text)
    )
}

/// Full HTML document around `content`.
pub fn page(tr: &Translator, notices: &[Notice], content: &str) -> String {
    let mut flash = String::new();
    for notice in notices {
        // Writing into a String cannot fail.
        let _ = write!(
            flash,
            r#"<div class="notice notice-{}" role="status">{}</div>"#,
            notice.level.as_str(),
            html_escape(&notice.text)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <header><h1>{title}</h1></header>
    <div class="notices">{flash}</div>
    <main>
{content}
    </main>
</body>
</html>"#,
        lang = tr.language().html_lang(),
        title = html_escape(tr.t(label::APP_TITLE)),
        css = CSS,
        flash = flash,
        content = content,
    )
}

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 1200px; padding: 1em; color: #222; }
header h1 { font-size: 1.6rem; color: rgb(13, 97, 72); }
form.inline { display: inline; }
.filters { display: flex; gap: 0.75em; flex-wrap: wrap; align-items: end; margin-bottom: 1em; }
.filters label { display: flex; flex-direction: column; font-size: 0.9rem; }
table.records { width: 100%; border-collapse: collapse; }
table.records th, table.records td { border-bottom: 1px solid #ddd; padding: 0.5em; text-align: left; vertical-align: top; }
table.records tr:hover { background: #f3f8f6; }
button.row-link { background: none; border: none; padding: 0; color: inherit; text-align: left; cursor: pointer; font: inherit; }
.pager { display: flex; gap: 0.3em; align-items: center; margin-top: 1em; flex-wrap: wrap; }
.pager button[disabled] { font-weight: bold; }
.detail-title { font-size: 2rem; font-weight: bold; margin-bottom: 1em; }
.detail-meta { display: flex; background: #f9f9f9; padding: 1em; border-radius: 0.5em; margin-bottom: 1.5em; }
.meta-item { flex: 1; padding: 0 1em; border-right: 1px solid #aaa; }
.meta-item:last-child { border-right: none; }
.meta-label { font-weight: bold; margin-bottom: 0.2em; }
.detail-text { line-height: 1.8; white-space: pre-wrap; margin-bottom: 2em; }
.detail-buttons { display: flex; gap: 1em; margin-top: 1em; }
.detail-buttons a, .detail-buttons button, .primary { padding: 0.6em 1.6em; border: none; border-radius: 999px; color: #fff; background: rgb(13, 97, 72); cursor: pointer; text-decoration: none; }
.notice { padding: 0.6em 1em; border-radius: 0.3em; margin-bottom: 0.5em; }
.notice-info { background: #e6f4ea; }
.notice-warning { background: #fff4e5; }
.notice-error { background: #fdecea; }
.render-error { padding: 1em; background: #fdecea; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::NoticeLevel;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn page_includes_notices_and_language() {
        let tr = Translator::default();
        let notices = vec![Notice {
            level: NoticeLevel::Error,
            text: "<bad>".into(),
        }];
        let html = page(&tr, &notices, "<p>body</p>");
        assert!(html.contains(r#"<html lang="zh-CN">"#));
        assert!(html.contains(r#"notice-error"#));
        assert!(html.contains("&lt;bad&gt;"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn error_block_is_escaped() {
        let tr = Translator::default();
        let html = error_block(&tr, &RenderError::MissingRecord(RecordId(7)));
        assert!(html.contains("表格渲染出错"));
        assert!(html.contains("record 7 is not in the dataset"));
    }
}

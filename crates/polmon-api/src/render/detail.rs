//! Detail page for a single record.

use polmon_core::i18n::label;
use polmon_core::{Record, Translator};

use super::{html_escape, post_button};

/// Detail content for `record`, or the not-found placeholder for `None`.
pub fn detail(tr: &Translator, record: Option<&Record>) -> String {
    let back = post_button("/back", tr.t(label::BACK), "primary");
    let Some(record) = record else {
        return format!(
            r#"<div class="detail-missing"><p>{}</p><div class="detail-buttons">{}</div></div>"#,
            html_escape(tr.t(label::NOT_FOUND)),
            back
        );
    };

    let period = record.period.display();
    let meta = [
        (label::REGION, record.region.as_deref().unwrap_or_default()),
        (label::PERIOD, period.as_str()),
        (label::CATEGORY, record.category.as_deref().unwrap_or_default()),
        (label::ISSUER, record.issuer.as_deref().unwrap_or_default()),
        (label::KEYWORDS, record.keywords.as_deref().unwrap_or_default()),
    ]
    .iter()
    .map(|(caption, value)| {
        format!(
            r#"<div class="meta-item"><div class="meta-label">{}</div>{}</div>"#,
            html_escape(tr.t(caption)),
            html_escape(value)
        )
    })
    .collect::<String>();

    let text = record
        .description
        .as_deref()
        .unwrap_or_else(|| tr.t(label::NO_DESCRIPTION));

    let link = record
        .detail_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                html_escape(url),
                html_escape(tr.t(label::DETAIL_LINK))
            )
        })
        .unwrap_or_default();

    format!(
        r#"<article class="detail">
<div class="detail-title">{title}</div>
<div class="detail-meta">{meta}</div>
<div class="detail-text">{text}</div>
<div class="detail-buttons">{link}{back}</div>
</article>"#,
        title = html_escape(&record.title),
        text = html_escape(text),
    )
}

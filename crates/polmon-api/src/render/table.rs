//! Filter bar, record table and pagination strip.

use std::fmt::Write as _;

use polmon_core::i18n::label;
use polmon_core::pagination::{self, Controls};
use polmon_core::{Choice, Dataset, FilterSelection, RecordId, Translator};

use super::{html_escape, post_button, RenderError};

/// A `<select>` with the "all" option followed by `options`.
fn choice_select(
    out: &mut String,
    tr: &Translator,
    name: &str,
    caption: &str,
    options: &[String],
    current: &Choice,
) -> std::fmt::Result {
    write!(
        out,
        r#"<label>{}<select name="{}"><option value="{}"{}>{}</option>"#,
        html_escape(tr.t(caption)),
        name,
        polmon_core::filter::ALL,
        if current.is_all() { " selected" } else { "" },
        html_escape(tr.t(label::ALL))
    )?;
    for option in options {
        write!(
            out,
            r#"<option value="{v}"{s}>{v}</option>"#,
            v = html_escape(option),
            s = if current.selects(option) { " selected" } else { "" }
        )?;
    }
    out.write_str("</select></label>")
}

/// The filter form plus the download button.
pub fn filter_bar(
    tr: &Translator,
    dataset: &Dataset,
    selection: &FilterSelection,
) -> Result<String, RenderError> {
    let mut out = String::from(r#"<div class="filters"><form method="post" action="/filters" class="filters">"#);
    choice_select(&mut out, tr, "region", label::REGION, dataset.regions(), &selection.region)?;
    choice_select(&mut out, tr, "category", label::CATEGORY, dataset.categories(), &selection.category)?;
    choice_select(&mut out, tr, "year", label::YEAR, dataset.years(), &selection.year)?;
    write!(
        out,
        r#"<label>{}<input type="text" name="keyword" value="{}" placeholder="{}"></label><button type="submit" class="primary">{}</button></form>"#,
        html_escape(tr.t(label::KEYWORDS)),
        html_escape(&selection.keyword),
        html_escape(tr.t(label::KEYWORD_PLACEHOLDER)),
        html_escape(tr.t(label::APPLY))
    )?;
    out.push_str(&post_button("/download", tr.t(label::DOWNLOAD), "primary"));
    out.push_str("</div>");
    Ok(out)
}

/// One page of `rows` as a table, followed by the pagination strip.
///
/// `page` is clamped to the valid range. Every row posts its [`RecordId`]
/// to open the detail view.
pub fn records_table(
    tr: &Translator,
    dataset: &Dataset,
    rows: &[RecordId],
    page: usize,
    page_size: usize,
) -> Result<String, RenderError> {
    let total = pagination::page_count(rows.len(), page_size);
    let controls = Controls::new(page, total);
    let range = pagination::page_range(controls.current, page_size, rows.len());

    let mut out = String::from(r#"<table class="records"><thead><tr>"#);
    for caption in [label::REGION, label::TITLE, label::CATEGORY, label::ISSUER, label::PERIOD] {
        write!(out, "<th>{}</th>", html_escape(tr.t(caption)))?;
    }
    out.push_str("</tr></thead><tbody>");

    for &id in &rows[range] {
        let record = dataset.get(id).ok_or(RenderError::MissingRecord(id))?;
        write!(
            out,
            r#"<tr data-id="{id}"><td>{}</td><td><form method="post" action="/records/{id}" class="inline"><button type="submit" class="row-link">{}</button></form></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            html_escape(record.region.as_deref().unwrap_or_default()),
            html_escape(&record.title),
            html_escape(record.category.as_deref().unwrap_or_default()),
            html_escape(record.issuer.as_deref().unwrap_or_default()),
            html_escape(&record.period.display()),
        )?;
    }
    out.push_str("</tbody></table>");

    pager(&mut out, tr, &controls)?;
    Ok(out)
}

fn pager(out: &mut String, tr: &Translator, controls: &Controls) -> std::fmt::Result {
    let button = |out: &mut String, target: usize, text: &str, current: bool| {
        write!(
            out,
            r#"<button type="submit" name="page" value="{}"{}>{}</button>"#,
            target,
            if current { " disabled" } else { "" },
            html_escape(text)
        )
    };

    out.push_str(r#"<div class="pager"><form method="post" action="/page" class="inline">"#);
    button(out, controls.first, tr.t(label::FIRST), false)?;
    button(out, controls.prev, tr.t(label::PREV), false)?;
    for n in controls.window.clone() {
        button(out, n, &n.to_string(), n == controls.current)?;
    }
    button(out, controls.next, tr.t(label::NEXT), false)?;
    button(out, controls.last, tr.t(label::LAST), false)?;
    out.push_str("</form>");

    write!(
        out,
        r#"<form method="post" action="/page" class="inline"><select name="page">"#
    )?;
    for n in controls.jump_targets() {
        write!(
            out,
            r#"<option value="{n}"{}>{n} {}</option>"#,
            if n == controls.current { " selected" } else { "" },
            html_escape(tr.t(label::PAGE))
        )?;
    }
    write!(
        out,
        r#"</select><button type="submit">{}</button></form></div>"#,
        html_escape(tr.t(label::JUMP))
    )
}

//! Export form.

use polmon_core::i18n::label;
use polmon_core::{ExportFormat, Translator};

use super::{html_escape, post_button};

/// Values to prefill the contact fields with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub email: String,
    pub institution: String,
}

/// The download panel: result count, contact fields and one submit per format.
pub fn download_panel(tr: &Translator, count: usize, prefill: &Prefill) -> String {
    format!(
        r#"<section class="download">
<p class="row-count">{prefix}{count} {suffix}</p>
<form method="post" action="/export">
<label>{inst_label}<input type="text" name="institution" value="{inst}" placeholder="{inst_hint}"></label>
<label>{email_label}<input type="email" name="email" value="{email}" placeholder="{email_hint}"></label>
<div class="detail-buttons">
<button type="submit" name="format" value="{csv}">{send_csv}</button>
<button type="submit" name="format" value="{xlsx}">{send_xlsx}</button>
</div>
</form>
<div class="detail-buttons">{back}</div>
</section>"#,
        prefix = html_escape(tr.t(label::RESULT_PREFIX)),
        suffix = html_escape(tr.t(label::RESULT_SUFFIX)),
        inst_label = html_escape(tr.t(label::INSTITUTION)),
        inst = html_escape(&prefill.institution),
        inst_hint = html_escape(tr.t(label::INSTITUTION_PLACEHOLDER)),
        email_label = html_escape(tr.t(label::EMAIL)),
        email = html_escape(&prefill.email),
        email_hint = html_escape(tr.t(label::EMAIL_PLACEHOLDER)),
        csv = ExportFormat::Csv.as_str(),
        xlsx = ExportFormat::Xlsx.as_str(),
        send_csv = html_escape(tr.t(label::SEND_CSV)),
        send_xlsx = html_escape(tr.t(label::SEND_EXCEL)),
        back = post_button("/download/back", tr.t(label::BACK), "primary"),
    )
}

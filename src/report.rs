//! Printable case conference report
//!
//! Produces a standalone HTML document for one student. Every interpolated
//! value is escaped.

use crate::record::StudentRecord;

/// Escape `& < > " '` for HTML text and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped multi-line text with newlines as `<br>`, or `fallback` when empty
fn text_block(s: &str, fallback: &str) -> String {
    if s.is_empty() {
        fallback.to_string()
    } else {
        escape_html(s).replace('\n', "<br>")
    }
}

const REPORT_STYLE: &str = "
      body { font-family: Arial, sans-serif; padding: 20px; color: #111; }
      h1 { font-size: 20px; margin-bottom: 6px; }
      .meta { color: #333; margin-bottom: 12px; }
      .section { margin-top: 12px; }
      .label { font-weight: 600; margin-bottom: 6px; }
      .box { border: 1px solid #ccc; padding: 10px; border-radius: 6px; background: #fff; }
      .small { font-size: 12px; color: #555; margin-top: 8px; }
      @media print { button { display: none; } }
";

/// Render the report. `generated_at` is shown verbatim as the generation time.
pub fn render_report(record: &StudentRecord, generated_at: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
    <meta charset="utf-8">
    <title>Case Conference - {name}</title>
    <style>{style}</style>
</head>
<body>
    <button onclick="window.print()" style="padding:8px 12px;margin-bottom:12px">Print report</button>
    <h1>Case Conference Form</h1>
    <div class="meta">
      <div><strong>Name:</strong> {name}</div>
      <div><strong>DOB:</strong> {dob}</div>
      <div><strong>Center:</strong> {center}</div>
      <div><strong>Teacher:</strong> {teacher}</div>
      <div class="small">Generated: {generated}</div>
    </div>

    <div class="section">
      <div class="label">Goals / Areas of focus</div>
      <div class="box">{goals}</div>
    </div>

    <div class="section">
      <div class="label">Progress notes</div>
      <div class="box">{progress}</div>
    </div>

    <div class="section small">This is a prototype report generated from locally stored data.</div>
</body>
</html>
"#,
        style = REPORT_STYLE,
        name = escape_html(&record.name),
        dob = escape_html(&record.dob),
        center = escape_html(&record.center),
        teacher = escape_html(&record.teacher),
        generated = escape_html(generated_at),
        goals = text_block(&record.goals, "<em>None provided</em>"),
        progress = text_block(&record.progress, "<em>No notes</em>"),
    )
}

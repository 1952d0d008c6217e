// src/report/html.rs
use std::fmt::Write;

use super::{Report, ReportEntry};
use crate::types::CompatibilityBucket;

const STYLE: &str = r#"
body { margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #eef0f7; }
.container { max-width: 640px; margin: 0 auto; padding: 20px; }
.header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; border-radius: 20px 20px 0 0; text-align: center; }
.header h1 { margin: 0; font-size: 24px; font-weight: 600; }
.header p { margin: 10px 0 0 0; font-size: 16px; opacity: 0.9; }
.summary { background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%); color: white; padding: 25px; border-radius: 15px; margin: 20px 0; text-align: center; }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(120px, 1fr)); gap: 20px; }
.stat-number { font-size: 36px; font-weight: bold; display: block; line-height: 1; }
.stat-label { font-size: 14px; opacity: 0.9; margin-top: 5px; }
.jobs-section { background: white; border-radius: 15px; padding: 25px; margin: 20px 0; }
.job-item { background: #f8f9fa; border-left: 4px solid #667eea; padding: 20px; margin: 20px 0; border-radius: 12px; }
.job-header { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 15px; }
.job-title { font-weight: bold; color: #333; font-size: 18px; margin-bottom: 5px; }
.job-company { color: #667eea; font-weight: 500; font-size: 16px; }
.job-location { color: #666; font-size: 14px; }
.job-salary { color: #28a745; font-weight: bold; margin: 8px 0; }
.compatibility-badge { color: white; padding: 5px 12px; border-radius: 20px; font-size: 12px; font-weight: bold; white-space: nowrap; }
.compatibility-low { background: #6c757d; }
.compatibility-medium { background: #ffa500; }
.compatibility-high { background: #28a745; }
.job-description { background: #fff; border: 1px solid #e9ecef; padding: 15px; border-radius: 8px; margin: 15px 0; font-size: 14px; color: #555; }
.skill-badge { display: inline-block; background: #e7e9fd; color: #4c5bd4; padding: 3px 10px; border-radius: 12px; font-size: 12px; margin: 2px; }
.job-meta { font-size: 13px; color: #666; margin-top: 10px; }
.apply-button { display: inline-block; margin-top: 15px; background: #667eea; color: white; padding: 10px 20px; border-radius: 25px; text-decoration: none; font-weight: bold; }
.footer { background: white; border-radius: 0 0 20px 20px; padding: 25px; color: #555; font-size: 14px; }
"#;

/// Escape text for HTML element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_html(report: &Report) -> String {
    let counts = report.bucket_counts();
    let mut out = String::new();

    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{subject}</title>
<style>{style}</style>
</head>
<body>
<div class="container">
<div class="header">
<h1>Daily Job Search Report</h1>
<p>{date}</p>
</div>
<div class="summary">
<div class="stats">
<div class="stat-item"><span class="stat-number">{jobs}</span><div class="stat-label">Offers found</div></div>
<div class="stat-item"><span class="stat-number">{documents}</span><div class="stat-label">Documents generated</div></div>
<div class="stat-item"><span class="stat-number">{high}</span><div class="stat-label">High compatibility</div></div>
</div>
</div>
<div class="jobs-section">
<h3>Job opportunities</h3>
"#,
        subject = escape_html(&report.subject()),
        style = STYLE,
        date = report.date.format("%A, %d %B %Y"),
        jobs = report.jobs(),
        documents = report.documents(),
        high = counts.high,
    );

    if report.entries.is_empty() {
        out.push_str("<p>No relevant offers were found today.</p>\n");
    }

    for entry in &report.entries {
        render_entry(&mut out, entry);
    }

    out.push_str(
        r#"</div>
<div class="footer">
<strong>Next steps</strong>
<ol>
<li>Review the attached CVs and cover letters</li>
<li>Apply to the selected positions</li>
<li>Follow up on your applications</li>
</ol>
</div>
</div>
</body>
</html>
"#,
    );

    out
}

fn render_entry(out: &mut String, entry: &ReportEntry) {
    let posting = &entry.scored.posting;
    let bucket: CompatibilityBucket = entry.scored.bucket;

    let _ = write!(
        out,
        r#"<div class="job-item">
<div class="job-header">
<div>
<div class="job-title">{title}</div>
<div class="job-company">{company}</div>
<div class="job-location">{location}</div>
</div>
<span class="compatibility-badge {css}" style="background: {color};">{badge}</span>
</div>
<div class="job-salary">{salary}</div>
<div class="job-description">{description}</div>
<div>"#,
        title = escape_html(&posting.title),
        company = escape_html(&posting.company),
        location = escape_html(&posting.location),
        css = bucket.css_class(),
        color = bucket.color(),
        badge = escape_html(&entry.scored.badge()),
        salary = escape_html(entry.salary),
        description = escape_html(&posting.description),
    );

    for skill in &entry.skills {
        let _ = write!(out, r#"<span class="skill-badge">{}</span>"#, escape_html(skill));
    }
    out.push_str("</div>\n");

    let _ = writeln!(
        out,
        r#"<div class="job-meta">Experience: {}</div>"#,
        escape_html(entry.experience)
    );

    if !entry.documents.is_empty() {
        let files = entry
            .documents
            .iter()
            .map(|d| escape_html(d))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, r#"<div class="job-meta">Documents: {}</div>"#, files);
    }

    if !posting.url.is_empty() {
        let _ = writeln!(
            out,
            r#"<a class="apply-button" href="{}">Apply now</a>"#,
            escape_html(&posting.url)
        );
    }

    out.push_str("</div>\n");
}

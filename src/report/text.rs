// src/report/text.rs
use std::fmt::Write;

use super::Report;

const EMAIL_PREVIEW_CHARS: usize = 150;
const SUMMARY_PREVIEW_CHARS: usize = 200;

/// First `max` characters, with `...` appended when something was cut
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

/// Plain-text alternative of the email
pub fn render_text(report: &Report) -> String {
    let counts = report.bucket_counts();
    let mut out = String::new();

    let _ = writeln!(out, "Daily Job Search Automation Report");
    let _ = writeln!(out, "Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out);
    let _ = writeln!(out, "SUMMARY:");
    let _ = writeln!(out, "- Total jobs found: {}", report.jobs());
    let _ = writeln!(out, "- Documents generated: {}", report.documents());
    let _ = writeln!(
        out,
        "- Compatibility: {} high, {} medium, {} low",
        counts.high, counts.medium, counts.low
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "JOB OPPORTUNITIES FOUND:");

    for (i, entry) in report.entries.iter().enumerate() {
        let posting = &entry.scored.posting;
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {} at {}", i + 1, posting.title, posting.company);
        let _ = writeln!(out, "   Location: {}", posting.location);
        let _ = writeln!(
            out,
            "   {} ({})",
            entry.scored.badge(),
            entry.scored.bucket.label()
        );
        let _ = writeln!(out, "   URL: {}", posting.url);
        let _ = writeln!(
            out,
            "   Description: {}",
            preview(&posting.description, EMAIL_PREVIEW_CHARS)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "NEXT STEPS:");
    let _ = writeln!(out, "1. Review attached CVs and cover letters");
    let _ = writeln!(out, "2. Apply to selected positions");
    let _ = writeln!(out, "3. Follow up on applications");
    out
}

/// Content of the `Job_Summary_<date>.txt` file bundled into the archive
pub fn render_job_summary(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "JOB SEARCH AUTOMATION SUMMARY");
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out);
    let _ = writeln!(out, "Date: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Total jobs found: {}", report.jobs());
    let _ = writeln!(out, "Documents generated: {}", report.documents());

    for (i, entry) in report.entries.iter().enumerate() {
        let posting = &entry.scored.posting;
        let _ = writeln!(out);
        let _ = writeln!(out, "Job {}:", i + 1);
        let _ = writeln!(out, "  Title: {}", posting.title);
        let _ = writeln!(out, "  Company: {}", posting.company);
        let _ = writeln!(out, "  Location: {}", posting.location);
        let _ = writeln!(out, "  URL: {}", posting.url);
        let _ = writeln!(
            out,
            "  Compatibility: {} ({})",
            entry.scored.score,
            entry.scored.bucket.label()
        );
        let _ = writeln!(
            out,
            "  Description: {}",
            preview(&posting.description, SUMMARY_PREVIEW_CHARS)
        );
    }

    out
}

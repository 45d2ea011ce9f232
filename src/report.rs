//! Markdown rendering of a finished run.

use crate::research::ResearchReport;

pub fn format_report(report: &ResearchReport, details: bool) -> String {
    let mut output = format!("# {} Scholar Response\n\n", report.provider.display_name());
    output.push_str(report.answer.trim_end());
    output.push_str("\n\n");

    if !details {
        return output;
    }

    output.push_str(&format!(
        "---\n\n## Research Details: {}\n\n",
        one_line(&report.query)
    ));

    output.push_str("### Research Areas\n\n");
    for (i, area) in report.research_areas.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, one_line(area)));
    }

    output.push_str("\n### Related Questions\n\n");
    for (i, question) in report.related_questions.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, one_line(question)));
    }

    output.push_str("\n### Sources\n\n");
    if report.results.is_empty() {
        output.push_str("(no scholar results)\n");
    }
    for result in &report.results {
        let title = if result.title.is_empty() {
            "(untitled)"
        } else {
            result.title.as_str()
        };
        output.push_str(&format!("- **Title:** {}\n", one_line(title)));
        if !result.source.is_empty() {
            output.push_str(&format!("  **Source:** {}\n", one_line(&result.source)));
        }
        if !result.link.is_empty() {
            output.push_str(&format!(
                "  **Link:** {}\n",
                md_link("Click here", &result.link)
            ));
        }
        if result.citations > 0 {
            output.push_str(&format!("  **Cited by:** {}\n", result.citations));
        }
    }

    output
}

/// Markdown link with `[`/`]` escaped in the text and the target wrapped in
/// angle brackets when it contains characters that would end it early.
fn md_link(text: &str, url: &str) -> String {
    let text = text.replace('[', "\\[").replace(']', "\\]");
    if url.contains(|c: char| matches!(c, ' ' | '(' | ')')) {
        format!("[{text}](<{url}>)")
    } else {
        format!("[{text}]({url})")
    }
}

/// Collapse newlines so model text cannot break list or heading structure.
fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

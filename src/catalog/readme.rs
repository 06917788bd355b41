//! README section extraction
//!
//! Pure text processing: pull the body of the first README section whose
//! heading matches a candidate name, trimmed for display on a project page.

/// Maximum number of non-blank lines kept from a section body.
const MAX_SECTION_LINES: usize = 10;

/// Maximum number of characters kept after line trimming.
const MAX_SECTION_CHARS: usize = 700;

const TRUNCATION_MARKER: &str = "…";

/// Extract and truncate the body of the first section whose heading matches
/// one of `candidate_headings`.
///
/// Headings of depth 1-3 are considered; matching is on the trimmed,
/// case-insensitive title text only. Returns the empty string when no
/// candidate heading is present, signaling "fall through to the static
/// default" to the caller.
#[must_use]
pub fn extract_section(markdown: &str, candidate_headings: &[&str]) -> String {
    let lines: Vec<&str> = markdown.lines().collect();

    let Some((start, depth)) = find_heading(&lines, candidate_headings) else {
        return String::new();
    };

    // Body runs until a heading of equal-or-shallower depth or input end.
    let body: Vec<&str> = lines[start..]
        .iter()
        .take_while(|line| !matches!(parse_heading(line), Some((d, _)) if d <= depth))
        .copied()
        .collect();

    truncate_body(&body)
}

/// Locate the first matching heading; returns (index of first body line,
/// heading depth). First match wins if duplicate headings exist.
fn find_heading(lines: &[&str], candidate_headings: &[&str]) -> Option<(usize, usize)> {
    for (i, line) in lines.iter().enumerate() {
        if let Some((depth, title)) = parse_heading(line) {
            if depth <= 3 && candidate_headings.iter().any(|c| c.trim().eq_ignore_ascii_case(title)) {
                return Some((i + 1, depth));
            }
        }
    }
    None
}

/// Parse an ATX heading line into (depth, trimmed title). Punctuation and
/// trailing decoration in the title are not normalized further.
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let depth = trimmed.bytes().take_while(|b| *b == b'#').count();
    if depth == 0 || depth > 6 {
        return None;
    }

    let rest = &trimmed[depth..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }

    Some((depth, rest.trim()))
}

/// Drop blank lines, keep at most [`MAX_SECTION_LINES`] leading lines, then
/// hard-truncate by character count with an ellipsis marker.
fn truncate_body(lines: &[&str]) -> String {
    let kept: Vec<&str> = lines
        .iter()
        .map(|line| line.trim_end())
        .filter(|line| !line.is_empty())
        .take(MAX_SECTION_LINES)
        .collect();

    let body = kept.join("\n");

    if body.chars().count() <= MAX_SECTION_CHARS {
        return body;
    }

    let mut truncated: String = body.chars().take(MAX_SECTION_CHARS).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_until_next_heading() {
        let md = "## Getting Started\ntext line 1\ntext line 2\n## Next";
        assert_eq!(extract_section(md, &["Getting Started"]), "text line 1\ntext line 2");
    }

    #[test]
    fn test_deeper_heading_stays_in_body() {
        let md = "# Usage\nintro\n### Advanced\nmore\n# License\nMIT";
        assert_eq!(extract_section(md, &["Usage"]), "intro\n### Advanced\nmore");
    }

    #[test]
    fn test_no_match_returns_empty() {
        let md = "# Overview\nsome text\n## Details\nmore text";
        assert_eq!(extract_section(md, &["Getting Started", "Quickstart"]), "");
        assert_eq!(extract_section("", &["Usage"]), "");
    }

    #[test]
    fn test_matching_is_case_insensitive_and_trimmed() {
        let md = "##  getting STARTED  \nbody";
        assert_eq!(extract_section(md, &["Getting Started"]), "body");
    }

    #[test]
    fn test_first_candidate_match_wins() {
        let md = "## Usage\nfrom usage\n## Installation\nfrom installation";
        assert_eq!(extract_section(md, &["Installation", "Usage"]), "from usage");
    }

    #[test]
    fn test_deep_headings_are_not_matched() {
        let md = "#### Usage\nhidden";
        assert_eq!(extract_section(md, &["Usage"]), "");
    }

    #[test]
    fn test_hash_without_space_is_not_a_heading() {
        let md = "## Usage\nuse #tags liberally\n#not-a-heading\n## Next\nx";
        assert_eq!(extract_section(md, &["Usage"]), "use #tags liberally\n#not-a-heading");
    }

    #[test]
    fn test_blank_lines_are_dropped_and_lines_capped() {
        let body: String = (1..=15).map(|i| format!("line {i}\n\n")).collect();
        let md = format!("# Usage\n{body}");

        let section = extract_section(&md, &["Usage"]);
        let lines: Vec<&str> = section.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "line 1");
        assert_eq!(lines[9], "line 10");
    }

    #[test]
    fn test_char_truncation_appends_marker() {
        let long_line = "x".repeat(900);
        let md = format!("# Usage\n{long_line}");

        let section = extract_section(&md, &["Usage"]);
        assert_eq!(section.chars().count(), 701);
        assert!(section.ends_with('…'));
    }

    #[test]
    fn test_idempotent_on_truncated_output() {
        let md = "# Usage\nshort body\nsecond line";
        let once = extract_section(md, &["Usage"]);

        // The heading does not survive extraction, so re-extracting the
        // output yields the empty string.
        assert_eq!(extract_section(&once, &["Usage"]), "");

        // With the heading re-attached, re-extraction is a fixed point.
        let with_heading = format!("# Usage\n{once}");
        assert_eq!(extract_section(&with_heading, &["Usage"]), once);
    }
}

use crate::extractor::lexer::{CommentKind, Source};

/// Comment block bound to the declaration starting at `pos`, if any.
///
/// The nearest comment ending before `pos` binds when it sits on its own line,
/// is one of the `accepted` kinds, and is separated from `pos` by whitespace
/// holding at most one line break. Consecutive line comments of the same kind
/// are merged into one block.
pub fn doc_comment_before(
    src: &Source<'_>,
    pos: usize,
    accepted: &[CommentKind],
) -> Option<String> {
    let comments = src.comments();
    let idx = comments.partition_point(|comment| comment.end <= pos);
    if idx == 0 {
        return None;
    }
    let text = src.text();
    let nearest = comments[idx - 1];
    if !accepted.contains(&nearest.kind)
        || !adjacent(text, nearest.end, pos)
        || !own_line(text, nearest.start)
    {
        return None;
    }
    let mut first = idx - 1;
    if nearest.line {
        while first > 0 {
            let prev = comments[first - 1];
            if prev.line
                && prev.kind == nearest.kind
                && own_line(text, prev.start)
                && adjacent(text, prev.end, comments[first].start)
            {
                first -= 1;
            } else {
                break;
            }
        }
    }
    let raw: Vec<&str> = comments[first..idx]
        .iter()
        .map(|comment| src.comment_text(comment))
        .collect();
    Some(normalize(&raw.join("\n")))
}

fn adjacent(text: &str, from: usize, to: usize) -> bool {
    match text.get(from..to) {
        Some(gap) => gap.chars().all(char::is_whitespace) && gap.matches('\n').count() <= 1,
        None => false,
    }
}

fn own_line(text: &str, start: usize) -> bool {
    let before = text.get(..start).unwrap_or("");
    let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    before[line_start..].trim().is_empty()
}

/// Strips comment delimiters and leading `*`, trims every line, and drops
/// blank lines at both ends.
pub fn normalize(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().map(strip_markers).collect();
    join_trimmed(&lines)
}

/// Trims every line and drops blank lines at both ends.
pub fn normalize_lines(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().map(str::trim).collect();
    join_trimmed(&lines)
}

fn join_trimmed(lines: &[&str]) -> String {
    let start = lines.iter().position(|line| !line.is_empty());
    let end = lines.iter().rposition(|line| !line.is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

fn strip_markers(line: &str) -> &str {
    let mut line = line.trim();
    if let Some(rest) = line
        .strip_prefix("/**")
        .or_else(|| line.strip_prefix("/*!"))
        .or_else(|| line.strip_prefix("/*"))
    {
        line = rest;
    } else if let Some(rest) = line
        .strip_prefix("///")
        .or_else(|| line.strip_prefix("//!"))
        .or_else(|| line.strip_prefix("//"))
    {
        line = rest;
    } else if line.starts_with('%') {
        line = line.trim_start_matches('%');
    } else if line.starts_with('#') {
        line = line.trim_start_matches('#');
    } else if line.starts_with('*') && !line.starts_with("*/") {
        line = &line[1..];
    }
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest;
    }
    line.trim()
}

/// Output form of a comment: every line prefixed with `# `.
pub fn line_prefixed(comment: &str) -> String {
    comment
        .split('\n')
        .map(|line| {
            let line = line.trim();
            if line.is_empty() {
                "#".to_string()
            } else {
                format!("# {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::lexer::LexSyntax;

    const DOCS: &[CommentKind] = &[CommentKind::DocLine, CommentKind::DocBlock];

    fn bound(text: &str, marker: &str, accepted: &[CommentKind]) -> Option<String> {
        let src = Source::lex(text, &LexSyntax::C_FAMILY);
        let pos = text.find(marker).unwrap();
        doc_comment_before(&src, pos, accepted)
    }

    #[test]
    fn binds_adjacent_block_comment() {
        let text = "/**\n * Adds two numbers.\n *\n * Returns the sum.\n */\nint add();";
        assert_eq!(
            bound(text, "int add", DOCS).as_deref(),
            Some("Adds two numbers.\n\nReturns the sum.")
        );
    }

    #[test]
    fn merges_consecutive_line_comments() {
        let text = "/// first\n/// second\nclass A {}";
        assert_eq!(bound(text, "class", DOCS).as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn blank_line_breaks_binding() {
        let text = "/// detached\n\nclass A {}";
        assert_eq!(bound(text, "class", DOCS), None);
    }

    #[test]
    fn only_nearest_declaration_gets_comment() {
        let text = "/** doc */\nint a;\nint b;";
        assert_eq!(bound(text, "int a", DOCS).as_deref(), Some("doc"));
        assert_eq!(bound(text, "int b", DOCS), None);
    }

    #[test]
    fn trailing_comments_do_not_bind_forward() {
        let text = "int a; // about a\nint b;";
        assert_eq!(bound(text, "int b", &[CommentKind::Line]), None);
    }

    #[test]
    fn rejects_kinds_outside_profile() {
        let text = "// plain\nclass A {}";
        assert_eq!(bound(text, "class", DOCS), None);
        assert_eq!(
            bound(text, "class", &[CommentKind::Line]).as_deref(),
            Some("plain")
        );
    }

    #[test]
    fn empty_comment_is_present_but_empty() {
        let text = "/** */\nclass A {}";
        assert_eq!(bound(text, "class", DOCS).as_deref(), Some(""));
    }

    #[test]
    fn prefixes_each_line() {
        assert_eq!(line_prefixed("one\n\ntwo"), "# one\n#\n# two");
    }
}

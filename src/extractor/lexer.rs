//! Comment and string aware scanning over raw source text.
//!
//! A file is lexed once into three byte-aligned views: the original text, a
//! `code` view with comments blanked, and a `masked` view with comments and
//! string contents blanked. Structure (braces, separators, keywords) is always
//! located on `masked`; text handed to callers is sliced from `code`.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `//`, `#` or `%`.
    Line,
    /// `///`
    DocLine,
    /// `//!` and `/*!`
    InnerDoc,
    Block,
    /// `/** ... */`
    DocBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub start: usize,
    pub end: usize,
    pub kind: CommentKind,
    pub line: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct LexSyntax {
    pub line_comments: &'static [&'static str],
    pub block_comments: bool,
    pub nested_block_comments: bool,
    /// Quote bytes whose literals honor backslash escapes.
    pub quotes: &'static [u8],
    /// Quote bytes whose literals have no escapes (Go raw strings).
    pub raw_quotes: &'static [u8],
    pub triple_quotes: bool,
    /// C# `@"..."` with doubled-quote escapes.
    pub verbatim_strings: bool,
    /// Rust raw strings, byte strings, and char literals vs lifetimes.
    pub rust_literals: bool,
    /// Erlang `$c` character literals.
    pub char_prefix: Option<u8>,
    /// `#[` starts an attribute, not a `#` comment (PHP 8).
    pub hash_attributes: bool,
    pub php_tags: bool,
    /// A line break may end a statement (Go, JavaScript, TypeScript).
    pub newline_terminates: bool,
}

impl LexSyntax {
    pub const C_FAMILY: LexSyntax = LexSyntax {
        line_comments: &["//"],
        block_comments: true,
        nested_block_comments: false,
        quotes: b"\"'",
        raw_quotes: &[],
        triple_quotes: false,
        verbatim_strings: false,
        rust_literals: false,
        char_prefix: None,
        hash_attributes: false,
        php_tags: false,
        newline_terminates: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeStyle {
    None,
    /// C# `[Serializable]`
    Bracket,
    /// Java/TypeScript `@Inject()`
    At,
    /// Rust and PHP `#[derive(..)]`
    Hash,
}

pub struct Source<'a> {
    text: &'a str,
    code: String,
    masked: String,
    comments: Vec<Comment>,
}

impl<'a> Source<'a> {
    pub fn lex(text: &'a str, syntax: &LexSyntax) -> Self {
        let mut lexer = Lexer {
            bytes: text.as_bytes(),
            syntax,
            code: text.as_bytes().to_vec(),
            masked: text.as_bytes().to_vec(),
            comments: Vec::new(),
        };
        lexer.run();
        Source {
            text,
            code: into_string(lexer.code),
            masked: into_string(lexer.masked),
            comments: lexer.comments,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn masked(&self) -> &[u8] {
        self.masked.as_bytes()
    }

    pub fn masked_str(&self, range: Range<usize>) -> &str {
        self.masked.get(range).unwrap_or("")
    }

    pub fn code_str(&self, range: Range<usize>) -> &str {
        self.code.get(range).unwrap_or("")
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment_text(&self, comment: &Comment) -> &'a str {
        self.text.get(comment.start..comment.end).unwrap_or("")
    }

    /// Offset of the first byte that is neither whitespace nor comment.
    pub fn code_start(&self) -> usize {
        skip_ws(self.masked(), 0, self.len())
    }
}

fn into_string(bytes: Vec<u8>) -> String {
    // Only whole characters are ever blanked, so the bytes stay valid UTF-8.
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

struct Literal {
    content: Range<usize>,
    end: usize,
}

struct Lexer<'s> {
    bytes: &'s [u8],
    syntax: &'s LexSyntax,
    code: Vec<u8>,
    masked: Vec<u8>,
    comments: Vec<Comment>,
}

impl Lexer<'_> {
    fn run(&mut self) {
        let len = self.bytes.len();
        let mut i = 0;
        while i < len {
            if self.syntax.php_tags {
                if let Some(tag) = ["<?php", "<?=", "?>"]
                    .iter()
                    .find(|tag| self.starts_with(i, tag))
                {
                    blank(&mut self.code, i..i + tag.len());
                    blank(&mut self.masked, i..i + tag.len());
                    i += tag.len();
                    continue;
                }
            }
            if let Some(comment) = self.comment_at(i) {
                blank(&mut self.code, comment.start..comment.end);
                blank(&mut self.masked, comment.start..comment.end);
                i = comment.end;
                self.comments.push(comment);
                continue;
            }
            if let Some(literal) = self.literal_at(i) {
                blank(&mut self.masked, literal.content);
                i = literal.end.max(i + 1);
                continue;
            }
            i += 1;
        }
    }

    fn starts_with(&self, i: usize, pat: &str) -> bool {
        self.bytes[i..].starts_with(pat.as_bytes())
    }

    fn comment_at(&self, i: usize) -> Option<Comment> {
        for prefix in self.syntax.line_comments {
            if !self.starts_with(i, prefix) {
                continue;
            }
            if *prefix == "#" && self.syntax.hash_attributes && self.bytes.get(i + 1) == Some(&b'[')
            {
                continue;
            }
            let end = self.bytes[i..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| i + offset)
                .unwrap_or(self.bytes.len());
            let kind = if *prefix != "//" || self.starts_with(i, "////") {
                CommentKind::Line
            } else if self.starts_with(i, "///") {
                CommentKind::DocLine
            } else if self.starts_with(i, "//!") {
                CommentKind::InnerDoc
            } else {
                CommentKind::Line
            };
            return Some(Comment {
                start: i,
                end,
                kind,
                line: true,
            });
        }
        if self.syntax.block_comments && self.starts_with(i, "/*") {
            let kind = if self.starts_with(i, "/**") && !self.starts_with(i, "/**/") {
                CommentKind::DocBlock
            } else if self.starts_with(i, "/*!") {
                CommentKind::InnerDoc
            } else {
                CommentKind::Block
            };
            return Some(Comment {
                start: i,
                end: self.block_comment_end(i),
                kind,
                line: false,
            });
        }
        None
    }

    fn block_comment_end(&self, start: usize) -> usize {
        let len = self.bytes.len();
        let mut depth = 1usize;
        let mut j = start + 2;
        while j < len {
            if self.syntax.nested_block_comments && self.starts_with(j, "/*") {
                depth += 1;
                j += 2;
                continue;
            }
            if self.starts_with(j, "*/") {
                depth -= 1;
                j += 2;
                if depth == 0 {
                    return j;
                }
                continue;
            }
            j += 1;
        }
        len
    }

    fn literal_at(&self, i: usize) -> Option<Literal> {
        let b = self.bytes[i];
        let len = self.bytes.len();
        if self.syntax.rust_literals {
            if let Some(literal) = self.rust_raw_string(i) {
                return Some(literal);
            }
            if b == b'\'' {
                return self.rust_char(i);
            }
        }
        if self.syntax.char_prefix == Some(b) {
            let next = i + 1;
            if next >= len {
                return None;
            }
            let width = if self.bytes[next] == b'\\' {
                1 + char_width(self.bytes, next + 1)
            } else {
                char_width(self.bytes, next)
            };
            let end = (next + width).min(len);
            return Some(Literal {
                content: next..end,
                end,
            });
        }
        if self.syntax.verbatim_strings && b == b'@' && self.bytes.get(i + 1) == Some(&b'"') {
            let mut k = i + 2;
            while k < len {
                if self.bytes[k] == b'"' {
                    if self.bytes.get(k + 1) == Some(&b'"') {
                        k += 2;
                        continue;
                    }
                    return Some(Literal {
                        content: i + 2..k,
                        end: k + 1,
                    });
                }
                k += 1;
            }
            return Some(Literal {
                content: i + 2..len,
                end: len,
            });
        }
        if self.syntax.triple_quotes && self.starts_with(i, "\"\"\"") {
            let close = self.bytes[i + 3..]
                .windows(3)
                .position(|w| w == b"\"\"\"")
                .map(|offset| i + 3 + offset);
            return Some(match close {
                Some(k) => Literal {
                    content: i + 3..k,
                    end: k + 3,
                },
                None => Literal {
                    content: i + 3..len,
                    end: len,
                },
            });
        }
        if self.syntax.raw_quotes.contains(&b) {
            let close = self.bytes[i + 1..]
                .iter()
                .position(|c| *c == b)
                .map(|offset| i + 1 + offset);
            return Some(match close {
                Some(k) => Literal {
                    content: i + 1..k,
                    end: k + 1,
                },
                None => Literal {
                    content: i + 1..len,
                    end: len,
                },
            });
        }
        if self.syntax.quotes.contains(&b) {
            let mut k = i + 1;
            while k < len {
                let c = self.bytes[k];
                if c == b'\\' {
                    k += 2;
                    continue;
                }
                if c == b {
                    return Some(Literal {
                        content: i + 1..k,
                        end: k + 1,
                    });
                }
                k += 1;
            }
            return Some(Literal {
                content: (i + 1).min(len)..len,
                end: len,
            });
        }
        None
    }

    fn rust_raw_string(&self, i: usize) -> Option<Literal> {
        let b = self.bytes[i];
        if i > 0 && is_ident_byte(self.bytes[i - 1]) {
            return None;
        }
        let mut j = match b {
            b'r' => i + 1,
            b'b' if self.bytes.get(i + 1) == Some(&b'r') => i + 2,
            _ => return None,
        };
        let hashes_start = j;
        while self.bytes.get(j) == Some(&b'#') {
            j += 1;
        }
        let hashes = j - hashes_start;
        if self.bytes.get(j) != Some(&b'"') {
            return None;
        }
        let content_start = j + 1;
        let len = self.bytes.len();
        let mut k = content_start;
        while k < len {
            if self.bytes[k] == b'"'
                && (0..hashes).all(|h| self.bytes.get(k + 1 + h) == Some(&b'#'))
            {
                return Some(Literal {
                    content: content_start..k,
                    end: k + 1 + hashes,
                });
            }
            k += 1;
        }
        Some(Literal {
            content: content_start..len,
            end: len,
        })
    }

    /// `'x'` and `'\n'` are literals; anything else after `'` is a lifetime.
    fn rust_char(&self, i: usize) -> Option<Literal> {
        let next = i + 1;
        match self.bytes.get(next)? {
            b'\\' => {
                let limit = (next + 12).min(self.bytes.len());
                (next + 2..limit)
                    .find(|k| self.bytes[*k] == b'\'')
                    .map(|k| Literal {
                        content: next..k,
                        end: k + 1,
                    })
            }
            _ => {
                let width = char_width(self.bytes, next);
                (self.bytes.get(next + width) == Some(&b'\'')).then(|| Literal {
                    content: next..next + width,
                    end: next + width + 1,
                })
            }
        }
    }
}

fn char_width(bytes: &[u8], i: usize) -> usize {
    match bytes.get(i) {
        Some(b) if *b < 0x80 => 1,
        Some(b) if *b >= 0xF0 => 4,
        Some(b) if *b >= 0xE0 => 3,
        Some(_) => 2,
        None => 0,
    }
}

fn blank(buf: &mut [u8], range: Range<usize>) {
    let end = range.end.min(buf.len());
    for b in &mut buf[range.start.min(end)..end] {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

pub fn skip_ws(m: &[u8], mut i: usize, end: usize) -> usize {
    while i < end && m[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

pub fn trim_end(m: &[u8], start: usize, mut end: usize) -> usize {
    while end > start && m[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    end
}

/// Heuristic for `<` opening a generic argument list rather than comparing.
pub fn opens_angle(m: &[u8], i: usize) -> bool {
    let next = m.get(i + 1).copied();
    if next == Some(b'=') {
        return false;
    }
    let prev_ident = i > 0 && is_ident_byte(m[i - 1]);
    let next_opens = next.is_some_and(|n| is_ident_byte(n) || matches!(n, b'<' | b'>' | b'['));
    prev_ident || next_opens
}

pub fn closes_angle(m: &[u8], i: usize) -> bool {
    !(i > 0 && matches!(m[i - 1], b'-' | b'='))
}

/// Index of the byte closing the bracket opened at `open`.
pub fn find_close(m: &[u8], open: usize, end: usize) -> Option<usize> {
    let (o, c) = match m.get(open)? {
        b'(' => (b'(', b')'),
        b'[' => (b'[', b']'),
        b'{' => (b'{', b'}'),
        b'<' => (b'<', b'>'),
        _ => return None,
    };
    let end = end.min(m.len());
    let mut depth = 0usize;
    for i in open..end {
        let b = m[i];
        if b == o {
            depth += 1;
        } else if b == c {
            if o == b'<' && !closes_angle(m, i) {
                continue;
            }
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// First `target` byte at bracket and angle depth zero.
pub fn find_top_level(m: &[u8], range: Range<usize>, target: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut angle = 0usize;
    for i in range.start..range.end.min(m.len()) {
        let b = m[i];
        if b == target && depth == 0 && angle == 0 {
            return Some(i);
        }
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'<' if opens_angle(m, i) => angle += 1,
            b'>' if angle > 0 && closes_angle(m, i) => angle -= 1,
            _ => {}
        }
    }
    None
}

/// Skips leading attributes/annotations, returning the first byte after them.
pub fn skip_attributes(m: &[u8], start: usize, end: usize, style: AttributeStyle) -> usize {
    let mut i = skip_ws(m, start, end);
    loop {
        match style {
            AttributeStyle::Bracket if i < end && m[i] == b'[' => match find_close(m, i, end) {
                Some(close) => i = skip_ws(m, close + 1, end),
                None => return i,
            },
            AttributeStyle::Hash if i + 1 < end && m[i] == b'#' => {
                let mut j = i + 1;
                if m[j] == b'!' {
                    j += 1;
                }
                if j >= end || m[j] != b'[' {
                    return i;
                }
                match find_close(m, j, end) {
                    Some(close) => i = skip_ws(m, close + 1, end),
                    None => return i,
                }
            }
            AttributeStyle::At if i < end && m[i] == b'@' => {
                let mut j = i + 1;
                while j < end && (is_ident_byte(m[j]) || m[j] == b'.' || m[j] == b'$') {
                    j += 1;
                }
                if j == i + 1 || &m[i + 1..j] == b"interface" {
                    return i;
                }
                if j < end && m[j] == b'(' {
                    match find_close(m, j, end) {
                        Some(close) => j = close + 1,
                        None => return i,
                    }
                }
                i = skip_ws(m, j, end);
            }
            _ => return i,
        }
    }
}

/// One statement-level unit: a declaration with an optional braced body, or
/// a statement ended by a separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    /// End of the head: the body's `{`, the separator, or the trimmed end.
    pub head_end: usize,
    pub end: usize,
    /// Inside of the braced body, excluding the braces.
    pub body: Option<Range<usize>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkRules {
    pub separator: u8,
    pub newline_terminates: bool,
    /// Separators inside `<...>` do not split (Rust struct fields).
    pub angle_aware: bool,
    pub attributes: AttributeStyle,
}

pub fn split_chunks(src: &Source<'_>, range: Range<usize>, rules: ChunkRules) -> Vec<Chunk> {
    let m = src.masked();
    let end = range.end.min(m.len());
    let mut chunks = Vec::new();
    let mut i = range.start;
    loop {
        while i < end && (m[i].is_ascii_whitespace() || m[i] == rules.separator || m[i] == b';') {
            i += 1;
        }
        if i >= end {
            break;
        }
        let chunk = scan_chunk(m, i, end, rules);
        i = chunk.end.max(i + 1);
        chunks.push(chunk);
    }
    chunks
}

fn scan_chunk(m: &[u8], start: usize, end: usize, rules: ChunkRules) -> Chunk {
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut assigned = is_brace_statement(m, start, end);
    let mut i = start;
    while i < end {
        let b = m[i];
        match b {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b'{' if depth == 0 && angle == 0 && !assigned => {
                let close = find_close(m, i, end).unwrap_or(end);
                let body = (i + 1)..close;
                let after = (close + 1).min(end);
                let next = skip_ws(m, after, end);
                if next < end && m[next] == rules.separator {
                    return Chunk {
                        start,
                        head_end: i,
                        end: next + 1,
                        body: Some(body),
                    };
                }
                if rules.separator == b';'
                    && next < end
                    && m[next] == b'='
                    && is_assignment(m, next)
                {
                    // `{ get; set; } = value;`
                    let rest = scan_chunk_tail(m, next, end, rules.separator);
                    return Chunk {
                        start,
                        head_end: i,
                        end: rest,
                        body: Some(body),
                    };
                }
                return Chunk {
                    start,
                    head_end: i,
                    end: after,
                    body: Some(body),
                };
            }
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return Chunk {
                        start,
                        head_end: trim_end(m, start, i),
                        end: i + 1,
                        body: None,
                    };
                }
                depth -= 1;
            }
            b'=' if depth == 0 && angle == 0 && is_assignment(m, i) => assigned = true,
            b'<' if depth == 0 && !assigned && opens_angle(m, i) => angle += 1,
            b'>' if depth == 0 && angle > 0 && closes_angle(m, i) => angle -= 1,
            b'\n' if rules.newline_terminates
                && depth == 0
                && (!rules.angle_aware || angle == 0)
                && !continues_line(m, start, i, end, rules.attributes) =>
            {
                return Chunk {
                    start,
                    head_end: trim_end(m, start, i),
                    end: i,
                    body: None,
                };
            }
            _ if b == rules.separator && depth == 0 && (!rules.angle_aware || angle == 0) => {
                return Chunk {
                    start,
                    head_end: i,
                    end: i + 1,
                    body: None,
                };
            }
            _ => {}
        }
        i += 1;
    }
    Chunk {
        start,
        head_end: trim_end(m, start, end),
        end,
        body: None,
    }
}

/// `import {a, b} from ..`, `export * from ..`, `use a::{b, c}`: braces
/// belong to the statement rather than opening a body.
fn is_brace_statement(m: &[u8], start: usize, end: usize) -> bool {
    let mut i = start;
    if m[i..end].starts_with(b"pub") && !m.get(i + 3).is_some_and(|b| is_ident_byte(*b)) {
        i += 3;
        if i < end && m[i] == b'(' {
            i = find_close(m, i, end).map_or(end, |close| close + 1);
        }
        i = skip_ws(m, i, end);
    }
    let mut word_end = i;
    while word_end < end && is_ident_byte(m[word_end]) {
        word_end += 1;
    }
    match &m[i..word_end] {
        b"import" => true,
        b"export" => {
            let next = skip_ws(m, word_end, end);
            next < end && matches!(m[next], b'{' | b'*')
        }
        b"use" => {
            let Some(k) = (word_end..end).find(|k| matches!(m[*k], b'{' | b';')) else {
                return false;
            };
            let prev = trim_end(m, word_end, k);
            m[k] == b'{' && prev > word_end && matches!(m[prev - 1], b'\\' | b':')
        }
        _ => false,
    }
}

/// Continues an initializer after a braced body up to the separator.
fn scan_chunk_tail(m: &[u8], from: usize, end: usize, separator: u8) -> usize {
    let mut depth = 0usize;
    for i in from..end {
        match m[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b if b == separator && depth == 0 => return i + 1,
            _ => {}
        }
    }
    end
}

fn is_assignment(m: &[u8], i: usize) -> bool {
    let prev = if i > 0 { m[i - 1] } else { b' ' };
    let next = m.get(i + 1).copied().unwrap_or(b' ');
    !matches!(prev, b'=' | b'!' | b'<' | b'>' | b':') && !matches!(next, b'=' | b'>')
}

fn continues_line(
    m: &[u8],
    start: usize,
    i: usize,
    end: usize,
    attributes: AttributeStyle,
) -> bool {
    let last = trim_end(m, start, i);
    if last == start {
        return true;
    }
    if matches!(
        m[last - 1],
        b',' | b'(' | b'[' | b'{' | b'=' | b'+' | b'-' | b'*' | b'/' | b'&' | b'|' | b':' | b'.'
            | b'<' | b'!' | b'?' | b'%'
    ) {
        return true;
    }
    if attributes != AttributeStyle::None
        && m[start] == b'@'
        && skip_attributes(m, start, i, attributes) >= last
    {
        return true;
    }
    let mut word_start = last;
    while word_start > start && is_ident_byte(m[word_start - 1]) {
        word_start -= 1;
    }
    if matches!(
        &m[word_start..last],
        b"extends" | b"implements" | b"export" | b"default" | b"abstract" | b"declare"
    ) {
        return true;
    }
    let next = skip_ws(m, i, end);
    if next >= end {
        return false;
    }
    if matches!(m[next], b'{' | b'.' | b'=' | b'?' | b':' | b'|' | b'&' | b')' | b']' | b',') {
        return true;
    }
    let rest = &m[next..end];
    rest.starts_with(b"extends ") || rest.starts_with(b"implements ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_heads(text: &str, rules: ChunkRules) -> Vec<String> {
        let src = Source::lex(text, &LexSyntax::C_FAMILY);
        split_chunks(&src, 0..src.len(), rules)
            .into_iter()
            .map(|chunk| src.code_str(chunk.start..chunk.head_end).trim().to_string())
            .collect()
    }

    const SEMI: ChunkRules = ChunkRules {
        separator: b';',
        newline_terminates: false,
        angle_aware: false,
        attributes: AttributeStyle::None,
    };

    #[test]
    fn grouped_imports_are_single_statements() {
        let text = "import {\n  a,\n  b,\n} from './x';\nuse std::{fs, io};\nclass A { }";
        assert_eq!(
            chunk_heads(text, SEMI),
            vec!["import {\n  a,\n  b,\n} from './x'", "use std::{fs, io}", "class A"]
        );
    }

    #[test]
    fn masks_comments_and_string_contents() {
        let text = "a = \"x{y}\"; // c { d\n/* e } */ b;";
        let src = Source::lex(text, &LexSyntax::C_FAMILY);
        assert_eq!(src.masked().len(), text.len());
        assert!(!src.masked_str(0..src.len()).contains('{'));
        assert!(src.code_str(0..src.len()).contains("x{y}"));
        assert_eq!(src.comments().len(), 2);
        assert_eq!(src.comments()[0].kind, CommentKind::Line);
        assert_eq!(src.comments()[1].kind, CommentKind::Block);
    }

    #[test]
    fn classifies_doc_comments() {
        let text = "/// a\n//! b\n/** c */\n/*! d */\n//// e";
        let src = Source::lex(text, &LexSyntax::C_FAMILY);
        let kinds: Vec<_> = src.comments().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CommentKind::DocLine,
                CommentKind::InnerDoc,
                CommentKind::DocBlock,
                CommentKind::InnerDoc,
                CommentKind::Line
            ]
        );
    }

    #[test]
    fn rust_lifetimes_are_not_char_literals() {
        let syntax = LexSyntax {
            nested_block_comments: true,
            rust_literals: true,
            quotes: b"\"",
            ..LexSyntax::C_FAMILY
        };
        let text = "fn f<'a>(x: &'a str) -> char { '{' }";
        let src = Source::lex(text, &syntax);
        let m = src.masked();
        let open = m.iter().position(|b| *b == b'{').unwrap();
        assert_eq!(find_close(m, open, m.len()), Some(text.len() - 1));
    }

    #[test]
    fn splits_members_and_skips_bodies() {
        let heads = chunk_heads(
            "int a; void f() { if (x) { y(); } } string s = \"};\"; int P { get; set; } = 3;",
            SEMI,
        );
        assert_eq!(heads, vec!["int a", "void f()", "string s = \"};\"", "int P"]);
    }

    #[test]
    fn braces_after_assignment_are_expressions() {
        let heads = chunk_heads("Runnable r = new Runnable() { void run() {} }; int b;", SEMI);
        assert_eq!(heads.len(), 2);
        assert_eq!(heads[1], "int b");
    }

    #[test]
    fn newline_terminated_statements() {
        let rules = ChunkRules {
            separator: b';',
            newline_terminates: true,
            angle_aware: false,
            attributes: AttributeStyle::At,
        };
        let heads = chunk_heads(
            "count = 0\n@Input()\nname: string\nfoo(a,\n  b) {\n}\nclass A\n  extends B {}",
            rules,
        );
        assert_eq!(
            heads,
            vec!["count = 0", "@Input()\nname: string", "foo(a,\n  b)", "class A\n  extends B"]
        );
    }

    #[test]
    fn comma_separated_fields_respect_generics() {
        let rules = ChunkRules {
            separator: b',',
            newline_terminates: false,
            angle_aware: true,
            attributes: AttributeStyle::Hash,
        };
        let heads = chunk_heads("a: HashMap<K, V>, b: fn(u8) -> u8, c: u8,", rules);
        assert_eq!(heads, vec!["a: HashMap<K, V>", "b: fn(u8) -> u8", "c: u8"]);
    }

    #[test]
    fn skips_attribute_styles() {
        let text = "[Serializable] [Obsolete(\"x\")] public class A";
        let src = Source::lex(text, &LexSyntax::C_FAMILY);
        let i = skip_attributes(src.masked(), 0, src.len(), AttributeStyle::Bracket);
        assert_eq!(&text[i..], "public class A");

        let text = "@Component({ selector: 'x' }) @Injectable export class B";
        let src = Source::lex(text, &LexSyntax::C_FAMILY);
        let i = skip_attributes(src.masked(), 0, src.len(), AttributeStyle::At);
        assert_eq!(&text[i..], "export class B");
    }
}

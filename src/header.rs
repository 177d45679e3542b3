//! Lightweight header parsing for Go source files
//!
//! Parses only what stub generation needs: the package clause and the
//! import declarations. The rest of the file is never looked at, so a file
//! whose body would not compile still yields a usable import list.
//!
//! Unlike a scan that collects whatever happens to match, this parser
//! rejects a header it cannot understand: a corrupt import list would make
//! the generated stub lie about the package's real dependencies.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::error::{Error, Result};

/// A single import declaration, as written in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Optional name preceding the path: an identifier, `.`, or `_`.
    /// Stub generation discards this; every emitted import is blank.
    pub alias: Option<String>,
    /// The path literal exactly as it appears in source, quotes included.
    pub path: String,
}

/// The parsed header of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Package name from the package clause.
    pub package: String,
    /// Import declarations in source order, duplicates and all.
    pub imports: Vec<ImportSpec>,
}

/// A syntax error in a file's package/import header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct HeaderError {
    /// 1-based line number the error was detected on.
    pub line: usize,
    pub message: String,
}

impl HeaderError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

type ParseResult<T> = std::result::Result<T, HeaderError>;

static PACKAGE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^package\s+([\p{L}_][\p{L}\p{N}_]*)(.*)$").expect("PACKAGE_CLAUSE regex is invalid")
});

/// `[alias] "path"` where alias is an identifier, `.`, or `_`, and the path
/// literal is an interpreted or raw string. Group 1 = alias, group 2 = path.
const IMPORT_SPEC_PATTERN: &str = r#"(?:([\p{L}_][\p{L}\p{N}_]*|\.)\s+)?("(?:[^"\\]|\\.)*"|`[^`]*`)"#;

static IMPORT_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^import\s*{IMPORT_SPEC_PATTERN}(.*)$"))
        .expect("IMPORT_SINGLE regex is invalid")
});

static IMPORT_BLOCK_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^import\s*\((.*)$").expect("IMPORT_BLOCK_OPEN regex is invalid")
});

static IMPORT_SPEC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{IMPORT_SPEC_PATTERN}(.*)$")).expect("IMPORT_SPEC_LINE regex is invalid")
});

/// Line-oriented scanner over one file's header.
///
/// All position state lives in this value; a fresh scanner is built per
/// parse call, so nothing leaks between files.
struct HeaderScanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> HeaderScanner<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines().collect(),
            pos: 0,
        }
    }

    /// Next raw line with its 1-based number, CR stripped.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.get(self.pos)?;
        self.pos += 1;
        Some((self.pos, line.trim_end_matches('\r')))
    }

    /// Advance past blank lines and comments, returning the next
    /// significant line (leading closed comments stripped) and its number.
    fn next_significant(&mut self) -> ParseResult<Option<(usize, &'a str)>> {
        while let Some((no, raw)) = self.next_line() {
            let mut no = no;
            let mut line = raw.trim();
            loop {
                if line.is_empty() || line.starts_with("//") {
                    break;
                }
                if let Some(rest) = line.strip_prefix("/*") {
                    match rest.find("*/") {
                        Some(idx) => {
                            line = rest[idx + 2..].trim_start();
                            continue;
                        }
                        None => {
                            let (close_no, remainder) = self.find_comment_close(no)?;
                            no = close_no;
                            line = remainder.trim_start();
                            continue;
                        }
                    }
                }
                return Ok(Some((no, line)));
            }
        }
        Ok(None)
    }

    /// Consume lines until the `*/` closing a comment opened on `open_line`,
    /// returning what follows the close on that line.
    fn find_comment_close(&mut self, open_line: usize) -> ParseResult<(usize, &'a str)> {
        while let Some((no, raw)) = self.next_line() {
            if let Some(idx) = raw.find("*/") {
                return Ok((no, raw[idx + 2..].trim()));
            }
        }
        Err(HeaderError::new(open_line, "unterminated block comment"))
    }
}

/// Parse the package clause and import declarations from file content.
///
/// Everything after the last import declaration is ignored unparsed.
pub fn parse_header(content: &str) -> ParseResult<FileHeader> {
    let mut scanner = HeaderScanner::new(content);
    let package = parse_package_line(&mut scanner)?;

    let mut imports = Vec::new();
    loop {
        let checkpoint = scanner.pos;
        let Some((no, line)) = scanner.next_significant()? else {
            break;
        };
        if let Some(caps) = IMPORT_BLOCK_OPEN.captures(line) {
            let first_rest = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            parse_import_block(&mut scanner, no, first_rest, &mut imports)?;
        } else if is_import_decl(line) {
            let caps = IMPORT_SINGLE.captures(line).ok_or_else(|| {
                HeaderError::new(no, format!("malformed import declaration: {line}"))
            })?;
            let tail = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            if !trailing_trivia_ok(tail) {
                return Err(HeaderError::new(
                    no,
                    format!("unexpected text after import declaration: {}", tail.trim()),
                ));
            }
            imports.push(spec_from_caps(&caps));
        } else {
            // First non-import declaration: the body starts here and is
            // not this parser's problem.
            scanner.pos = checkpoint;
            break;
        }
    }

    Ok(FileHeader { package, imports })
}

/// Parse only the package clause. Used by the package resolver, which needs
/// the name of every file before any stub is written.
pub fn parse_package_clause(content: &str) -> ParseResult<String> {
    let mut scanner = HeaderScanner::new(content);
    parse_package_line(&mut scanner)
}

/// Parse the header of the file at `path`, mapping read failures and syntax
/// errors into the crate-level [`Error::Parse`] with the offending path.
pub fn parse_header_file(path: &Path) -> Result<FileHeader> {
    let content = fs::read_to_string(path).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_header(&content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn parse_package_line(scanner: &mut HeaderScanner) -> ParseResult<String> {
    match scanner.next_significant()? {
        Some((no, line)) => {
            let caps = PACKAGE_CLAUSE.captures(line).ok_or_else(|| {
                HeaderError::new(no, format!("expected package clause, found {line}"))
            })?;
            let tail = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            if !trailing_trivia_ok(tail) {
                return Err(HeaderError::new(no, format!("malformed package clause: {line}")));
            }
            Ok(caps[1].to_string())
        }
        None => Err(HeaderError::new(
            scanner.lines.len().max(1),
            "expected package clause",
        )),
    }
}

fn parse_import_block(
    scanner: &mut HeaderScanner,
    open_line: usize,
    first_rest: &str,
    imports: &mut Vec<ImportSpec>,
) -> ParseResult<()> {
    if consume_block_fragment(first_rest, open_line, imports)? {
        return Ok(());
    }
    loop {
        match scanner.next_significant()? {
            Some((no, line)) => {
                if consume_block_fragment(line, no, imports)? {
                    return Ok(());
                }
            }
            None => return Err(HeaderError::new(open_line, "unterminated import block")),
        }
    }
}

/// Parse one line's worth of import block interior: zero or more specs,
/// possibly followed by the closing parenthesis. Returns true once the
/// block is closed.
fn consume_block_fragment(
    fragment: &str,
    line_no: usize,
    imports: &mut Vec<ImportSpec>,
) -> ParseResult<bool> {
    let mut rest = fragment.trim();
    loop {
        if rest.is_empty() || rest.starts_with("//") {
            return Ok(false);
        }
        if let Some(inner) = rest.strip_prefix("/*") {
            match inner.find("*/") {
                Some(idx) => {
                    rest = inner[idx + 2..].trim_start();
                    continue;
                }
                None => {
                    return Err(HeaderError::new(line_no, "unterminated block comment"));
                }
            }
        }
        if let Some(after) = rest.strip_prefix(')') {
            if !trailing_trivia_ok(after) {
                return Err(HeaderError::new(
                    line_no,
                    format!("unexpected text after import block: {}", after.trim()),
                ));
            }
            return Ok(true);
        }
        let caps = IMPORT_SPEC_LINE.captures(rest).ok_or_else(|| {
            HeaderError::new(line_no, format!("expected import spec, found {rest}"))
        })?;
        imports.push(spec_from_caps(&caps));
        rest = caps.get(3).map(|m| m.as_str()).unwrap_or("").trim_start();
        if let Some(after) = rest.strip_prefix(';') {
            rest = after.trim_start();
        }
    }
}

/// Whether a significant line starts an import declaration, as opposed to
/// an identifier that merely begins with the letters "import".
fn is_import_decl(line: &str) -> bool {
    match line.strip_prefix("import") {
        Some(rest) => !rest
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_'),
        None => false,
    }
}

fn spec_from_caps(caps: &regex::Captures) -> ImportSpec {
    ImportSpec {
        alias: caps.get(1).map(|m| m.as_str().to_string()),
        path: caps[2].to_string(),
    }
}

/// Whether `rest` holds nothing but an optional semicolon and comments.
fn trailing_trivia_ok(rest: &str) -> bool {
    let mut rest = rest.trim_start();
    if let Some(after) = rest.strip_prefix(';') {
        rest = after.trim_start();
    }
    loop {
        if rest.is_empty() || rest.starts_with("//") {
            return true;
        }
        if let Some(inner) = rest.strip_prefix("/*") {
            match inner.find("*/") {
                Some(idx) => {
                    rest = inner[idx + 2..].trim_start();
                    continue;
                }
                // Comment runs past end of line; whatever follows the
                // close is trivia territory for a header.
                None => return true,
            }
        }
        return false;
    }
}

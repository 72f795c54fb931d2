//! Text encoding for LaTeX output.
//!
//! Text is encoded one character at a time so the replacement of one special
//! never feeds into another (`\` becomes `\textbackslash{}`, whose braces must
//! stay unescaped).

/// How text is being encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodeMode {
    /// Running text: quotes are localized.
    #[default]
    Normal,
    /// `\texttt{}` content: quotes and spaces kept.
    InlineLiteral,
    /// Literal block line: spaces become `~`, `""` is kept apart.
    LiteralBlock,
}

/// Opening/closing double quotes of a language plus the alternation state.
#[derive(Debug, Clone)]
pub struct QuoteState {
    open: &'static str,
    close: &'static str,
    is_open: bool,
}

impl QuoteState {
    pub fn new(open: &'static str, close: &'static str) -> Self {
        Self {
            open,
            close,
            is_open: false,
        }
    }

    /// Quote to emit for the next straight double quote.
    pub fn next(&mut self) -> &'static str {
        self.is_open = !self.is_open;
        if self.is_open {
            self.open
        } else {
            self.close
        }
    }
}

impl Default for QuoteState {
    fn default() -> Self {
        Self::new("``", "''")
    }
}

fn special(c: char) -> Option<&'static str> {
    Some(match c {
        '\\' => "\\textbackslash{}",
        '{' => "\\{",
        '}' => "\\}",
        '$' => "\\$",
        '&' => "\\&",
        '#' => "\\#",
        '^' => "\\textasciicircum{}",
        '_' => "\\_",
        '~' => "\\textasciitilde{}",
        '%' => "\\%",
        '[' => "{[}",
        ']' => "{]}",
        '<' => "\\textless{}",
        '>' => "\\textgreater{}",
        '|' => "\\textbar{}",
        '\u{a0}' => "~",
        '\u{2013}' => "--",
        '\u{2014}' => "---",
        _ => return None,
    })
}

/// Encode `text` for the given mode.
pub fn encode(text: &str, mode: EncodeMode, quotes: &mut QuoteState) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(replacement) = special(c) {
            out.push_str(replacement);
            continue;
        }
        match (c, mode) {
            ('"', EncodeMode::Normal) => out.push_str(quotes.next()),
            ('"', EncodeMode::LiteralBlock) if chars.peek() == Some(&'"') => out.push_str("\"{}"),
            (' ', EncodeMode::LiteralBlock) => out.push('~'),
            _ => out.push(c),
        }
    }
    out
}

/// Escape running text with default English quotes.
pub fn escape_latex_text(text: &str) -> String {
    encode(text, EncodeMode::Normal, &mut QuoteState::default())
}

/// Encode the text of a literal block.
///
/// Line ends become `\\` line breaks; empty lines between two others are
/// written as `~` so LaTeX does not start a new paragraph.
pub fn encode_literal_block(text: &str, quotes: &mut QuoteState) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len().saturating_sub(1);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if line.is_empty() && i > 0 && i < last {
                "~".to_string()
            } else {
                encode(line, EncodeMode::LiteralBlock, quotes)
            }
        })
        .collect::<Vec<_>>()
        .join("\\\\\n")
}

/// Escape a URL for `\href{}`: only `%`, `#` and `\` are special there.
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '%' | '#' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

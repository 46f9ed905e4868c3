//! Line tokenizer for `go.mod`.
//!
//! Splits a manifest into non-empty lines of tokens. Comments (`//` to end of
//! line) are dropped, quoted strings are unquoted, and `(`, `)` and `=>` are
//! always tokens of their own.

/// One non-empty line of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    /// 1-based line number
    pub number: usize,
    /// Tokens in order; never empty
    pub tokens: Vec<String>,
}

/// Tokenizes `content`; errors carry the 1-based line number.
pub(crate) fn tokenize(content: &str) -> Result<Vec<Line>, (usize, String)> {
    let mut lines = Vec::new();
    for (index, text) in content.lines().enumerate() {
        let number = index + 1;
        let tokens = tokenize_line(text).map_err(|reason| (number, reason))?;
        if !tokens.is_empty() {
            lines.push(Line {
                number,
                tokens,
            });
        }
    }
    Ok(lines)
}

fn tokenize_line(text: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.is_empty() {
            tokens.push(std::mem::take(current));
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => break,
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            '(' | ')' => {
                flush(&mut current, &mut tokens);
                tokens.push(c.to_string());
            }
            '=' if chars.peek() == Some(&'>') => {
                chars.next();
                flush(&mut current, &mut tokens);
                tokens.push("=>".to_string());
            }
            '"' => {
                flush(&mut current, &mut tokens);
                tokens.push(read_interpreted(&mut chars)?);
            }
            '`' => {
                flush(&mut current, &mut tokens);
                let mut raw = String::new();
                loop {
                    match chars.next() {
                        Some('`') => break,
                        Some(c) => raw.push(c),
                        None => return Err("unterminated raw string".to_string()),
                    }
                }
                tokens.push(raw);
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

/// Reads a double-quoted string body (opening quote already consumed).
fn read_interpreted(chars: &mut impl Iterator<Item = char>) -> Result<String, String> {
    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Ok(value),
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some(escaped @ ('"' | '\\')) => value.push(escaped),
                Some(other) => return Err(format!("invalid escape \\{other} in quoted string")),
                None => break,
            },
            _ => value.push(c),
        }
    }
    Err("unterminated quoted string".to_string())
}

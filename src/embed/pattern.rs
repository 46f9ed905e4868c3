//! Translation of Go match patterns into `glob` crate syntax.
//!
//! Embed patterns use Go's `path.Match` language, which differs from the
//! `glob` crate in three places:
//!
//! | Go            | `glob` crate              |
//! |---------------|---------------------------|
//! | `**` = `*`    | `**` crosses directories  |
//! | `[^a]`        | `[!a]`                    |
//! | `\*` escapes  | no escapes, `[*]` instead |
//!
//! Character classes are rebuilt from their ranges so that `]`, `-` and `!`
//! end up where the `glob` crate reads them literally.

/// Rewrites a Go pattern for the `glob` crate.
///
/// Returns `None` if `pattern` is malformed by Go's rules: an unterminated
/// or empty class, an unescaped `-` or `]` at the start of a range, or a
/// trailing backslash.
pub(crate) fn translate(pattern: &str) -> Option<String> {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                out.push('*');
            }
            '?' => out.push('?'),
            '\\' => push_literal(&mut out, chars.next()?),
            '[' => {
                let class = CharClass::parse(&mut chars)?;
                class.write(&mut out);
            }
            c => push_literal(&mut out, c),
        }
    }
    Some(out)
}

fn push_literal(out: &mut String, c: char) {
    if matches!(c, '*' | '?' | '[' | ']') {
        out.push('[');
        out.push(c);
        out.push(']');
    } else {
        out.push(c);
    }
}

/// A bracket expression, as inclusive ranges.
#[derive(Debug, Default)]
struct CharClass {
    negated: bool,
    ranges: Vec<(char, char)>,
}

impl CharClass {
    /// Reads everything after the opening `[`, including the closing `]`.
    fn parse(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<Self> {
        let mut class = Self::default();
        if chars.peek() == Some(&'^') {
            chars.next();
            class.negated = true;
        }

        let mut count = 0usize;
        loop {
            if chars.peek() == Some(&']') && count > 0 {
                chars.next();
                return Some(class);
            }
            let lo = class_char(chars)?;
            let hi = if chars.peek() == Some(&'-') {
                chars.next();
                class_char(chars)?
            } else {
                lo
            };
            if lo <= hi {
                class.ranges.push((lo, hi));
            }
            count += 1;
        }
    }

    fn write(&self, out: &mut String) {
        let mut ranges = self.ranges.clone();
        let close = split_out(&mut ranges, ']');
        let dash = split_out(&mut ranges, '-');
        let bang = split_out(&mut ranges, '!');

        if ranges.is_empty() && !close && !dash && !bang {
            // Every range was empty.
            if self.negated {
                out.push('?');
            } else {
                out.push_str("[!\u{0}-\u{10FFFF}]");
            }
            return;
        }

        if !self.negated && ranges.len() == 1 && ranges[0].0 == ranges[0].1 && !close && !dash && !bang {
            push_literal(out, ranges[0].0);
            return;
        }
        if !self.negated && ranges.is_empty() && usize::from(close) + usize::from(dash) + usize::from(bang) == 1 {
            let c = if close {
                ']'
            } else if dash {
                '-'
            } else {
                '!'
            };
            push_literal(out, c);
            return;
        }

        out.push('[');
        if self.negated {
            out.push('!');
        }
        if close {
            out.push(']');
        }
        // `!` right after `[` would negate the class.
        let bang_first = bang && !self.negated && !close && ranges.is_empty();
        if bang_first {
            out.push('-');
        }
        for (lo, hi) in &ranges {
            out.push(*lo);
            if lo != hi {
                out.push('-');
                out.push(*hi);
            }
        }
        if bang {
            out.push('!');
        }
        if dash && !bang_first {
            out.push('-');
        }
        out.push(']');
    }
}

/// One class character: a plain character or a backslash escape.
fn class_char(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<char> {
    match chars.next()? {
        '-' | ']' => None,
        '\\' => chars.next(),
        c => Some(c),
    }
}

/// Removes `c` from every range; returns whether any range covered it.
fn split_out(ranges: &mut Vec<(char, char)>, c: char) -> bool {
    let mut found = false;
    let mut kept = Vec::with_capacity(ranges.len() + 1);
    for &(lo, hi) in ranges.iter() {
        if lo > c || hi < c {
            kept.push((lo, hi));
            continue;
        }
        found = true;
        if lo < c
            && let Some(before) = char::from_u32(c as u32 - 1)
        {
            kept.push((lo, before));
        }
        if hi > c
            && let Some(after) = char::from_u32(c as u32 + 1)
        {
            kept.push((after, hi));
        }
    }
    *ranges = kept;
    found
}

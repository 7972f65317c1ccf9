//! Character-level scanning for the `$name<dtype>(args)` notation.
//!
//! The lexer does not tokenize the whole expression. It peels one layer:
//! [`scan_head`] takes the text after the `$` sigil and locates the call
//! name, the optional type tag, and the raw argument body, and
//! [`split_args`] cuts that body into top-level argument fragments. The
//! parser recurses into each fragment, so nesting is handled one layer at
//! a time and the scanners never need a stack of their own.

use crate::error::SyntaxError;

/// One decomposed call head: the pieces between the `$` sigil and the
/// closing paren, still borrowed from the input.
#[derive(Debug, PartialEq)]
pub(crate) struct Head<'a> {
    pub name: &'a str,
    pub dtype: Option<&'a str>,
    /// Text between the outer parens, untrimmed. `None` when the call has
    /// no parens at all (`$now`), as opposed to empty parens (`$now()`).
    pub body: Option<&'a str>,
}

/// Splits `text` (everything after the `$`) into name, optional `<dtype>`
/// tag and raw argument body.
///
/// Scans left to right: the name runs until the first `<` or `(`, a tag
/// opened by `<` runs until its `>`, and the body spans from the first `(`
/// to the final character of `text`, which must be the matching `)`.
pub(crate) fn scan_head(text: &str) -> Result<Head<'_>, SyntaxError> {
    let bytes = text.as_bytes();
    let len = bytes.len();

    // The name runs to the first structural delimiter. `>` and `)` cannot
    // start anything, so finding one here is a definite error.
    let mut i = 0;
    while i < len && !matches!(bytes[i], b'<' | b'(') {
        i += 1;
    }
    let name = &text[..i];
    if name.contains('>') {
        return Err(SyntaxError::MalformedTypeAnnotation(
            "'>' without a matching '<'".to_owned(),
        ));
    }
    if name.contains(')') {
        return Err(SyntaxError::UnbalancedParens("')' closes nothing".to_owned()));
    }
    if !is_ident(name) {
        return Err(SyntaxError::MalformedName(name.to_owned()));
    }

    // Optional `<dtype>` tag.
    let mut dtype = None;
    if i < len && bytes[i] == b'<' {
        let tag_start = i + 1;
        let mut j = tag_start;
        while j < len && bytes[j] != b'>' {
            if bytes[j] == b'(' {
                return Err(SyntaxError::MalformedTypeAnnotation(
                    "'<' has no matching '>' before the argument list".to_owned(),
                ));
            }
            j += 1;
        }
        if j == len {
            return Err(SyntaxError::MalformedTypeAnnotation(
                "'<' is never closed".to_owned(),
            ));
        }
        dtype = Some(&text[tag_start..j]);
        i = j + 1;
        if i < len && bytes[i] != b'(' {
            let junk_end = text[i..].find('(').map_or(len, |off| i + off);
            return Err(SyntaxError::MalformedTypeAnnotation(format!(
                "unexpected text {:?} after the type tag",
                &text[i..junk_end]
            )));
        }
    }

    // Argument body, when parens are present. The closing paren of the
    // outermost list must be the last character of the expression.
    let body = if i < len {
        if bytes[len - 1] != b')' {
            return match text.rfind(')') {
                Some(close) => Err(SyntaxError::TrailingInput(text[close + 1..].to_owned())),
                None => Err(SyntaxError::UnbalancedParens("'(' is never closed".to_owned())),
            };
        }
        Some(&text[i + 1..len - 1])
    } else {
        None
    };

    Ok(Head { name, dtype, body })
}

/// Cuts an argument body into its top-level fragments.
///
/// A comma separates arguments only at paren depth zero and outside
/// string literals; commas nested in a sub-call or quoted in a string
/// belong to the fragment they sit in. Inside quotes a backslash makes
/// the next character opaque, so `\"` does not close the literal.
/// Fragments come back untrimmed, exactly as written.
pub(crate) fn split_args(body: &str) -> Result<Vec<&str>, SyntaxError> {
    let bytes = body.as_bytes();
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut depth: u32 = 0;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if in_quotes {
            match bytes[i] {
                b'"' => in_quotes = false,
                // Skip the escaped byte. A multi-byte character after the
                // backslash is fine: its continuation bytes are never
                // ASCII, so they cannot be mistaken for a delimiter.
                b'\\' => i += 1,
                _ => {}
            }
        } else {
            match bytes[i] {
                b'"' => in_quotes = true,
                b'(' => depth += 1,
                b')' => {
                    if depth == 0 {
                        return Err(SyntaxError::UnbalancedParens(
                            "')' closes nothing".to_owned(),
                        ));
                    }
                    depth -= 1;
                }
                b',' if depth == 0 => {
                    parts.push(&body[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        i += 1;
    }
    if in_quotes {
        return Err(SyntaxError::UnterminatedString);
    }
    if depth != 0 {
        return Err(SyntaxError::UnbalancedParens("'(' is never closed".to_owned()));
    }
    parts.push(&body[start..]);
    Ok(parts)
}

/// Resolves one quoted fragment to its string value.
///
/// `text` must start with the opening `"`. `\"` and `\\` resolve to the
/// bare character; any other backslash sequence is kept literally.
pub(crate) fn unquote(text: &str) -> Result<String, SyntaxError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text[1..].chars();
    loop {
        match chars.next() {
            None => return Err(SyntaxError::UnterminatedString),
            Some('"') => break,
            Some('\\') => match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err(SyntaxError::UnterminatedString),
            },
            Some(c) => out.push(c),
        }
    }
    let rest = chars.as_str();
    if !rest.is_empty() {
        return Err(SyntaxError::TrailingInput(rest.to_owned()));
    }
    Ok(out)
}

/// Call names follow the identifier rule: alphabetic or `_` first, then
/// alphanumerics and `_`.
fn is_ident(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

//! Recursive-descent parser for the `$`-call notation.
//!
//! [`parse`] turns one expression string into an [`Expr`] tree. Each call
//! is decomposed by the lexer into name, type tag and argument body, the
//! body is split into top-level fragments, and every fragment is
//! classified as a nested call, a string literal or a number. Nested
//! calls recurse through the same path, so the grammar needs no token
//! stream and no lookahead beyond the first character of a fragment.

use crate::ast::{Arg, Args, Expr};
use crate::error::SyntaxError;
use crate::lexer;

/// How many levels of call nesting a single expression may use before
/// the parser refuses with [`SyntaxError::TooDeep`]. Deep enough for any
/// hand-written rule; shallow enough that adversarial input cannot blow
/// the stack.
pub const MAX_DEPTH: usize = 64;

/// Parses the textual notation into an expression tree.
///
/// Leading and trailing whitespace around the whole expression is
/// ignored; whitespace anywhere else is significant only between
/// arguments, where each fragment is trimmed before classification.
pub fn parse(text: &str) -> Result<Expr, SyntaxError> {
    parse_at(text, 0)
}

fn parse_at(text: &str, depth: usize) -> Result<Expr, SyntaxError> {
    if depth >= MAX_DEPTH {
        return Err(SyntaxError::TooDeep(MAX_DEPTH));
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SyntaxError::EmptyInput);
    }
    let rest = trimmed.strip_prefix('$').ok_or(SyntaxError::MissingPrefix)?;
    let head = lexer::scan_head(rest)?;

    let data = match head.body {
        // `$now` and `$now()` both carry no arguments.
        None => None,
        Some(body) if body.trim().is_empty() => None,
        Some(body) => {
            let fragments = lexer::split_args(body)?;
            let mut args = Vec::with_capacity(fragments.len());
            for (position, fragment) in fragments.into_iter().enumerate() {
                let arg = classify(fragment, depth).map_err(|source| SyntaxError::Nested {
                    call: head.name.to_owned(),
                    index: position + 1,
                    source: Box::new(source),
                })?;
                args.push(arg);
            }
            Args::from_vec(args)
        }
    };

    Ok(Expr {
        name: head.name.to_owned(),
        dtype: head.dtype.map(str::to_owned),
        data,
    })
}

/// Classifies one trimmed argument fragment by its first character:
/// `$` starts a nested call, `"` a string literal, anything else must
/// parse as a finite number.
fn classify(fragment: &str, depth: usize) -> Result<Arg, SyntaxError> {
    let trimmed = fragment.trim();
    if trimmed.starts_with('$') {
        return parse_at(trimmed, depth + 1).map(|expr| Arg::Call(Box::new(expr)));
    }
    if trimmed.starts_with('"') {
        return lexer::unquote(trimmed).map(Arg::Str);
    }
    match trimmed.parse::<f64>() {
        // `parse::<f64>` accepts "inf" and "NaN"; neither survives a
        // round trip through the printer, so reject them here.
        Ok(number) if number.is_finite() => Ok(Arg::Num(number)),
        _ => Err(SyntaxError::MalformedNumber(trimmed.to_owned())),
    }
}

//! Rendering back to the `$`-call notation.
//!
//! Output is canonical: every call gets parens, arguments are joined
//! with `", "`, and string literals escape `"` and `\`. Canonical text
//! parses back to the same tree, so formatting an expression is
//! parse-then-print.

use std::fmt::{self, Write as _};

use crate::ast::{Arg, Expr};

/// Renders the canonical textual form of an expression tree.
pub fn print(expr: &Expr) -> String {
    expr.to_string()
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)?;
        if let Some(ref dtype) = self.dtype {
            write!(f, "<{dtype}>")?;
        }
        f.write_char('(')?;
        if let Some(ref data) = self.data {
            for (i, arg) in data.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                arg.fmt(f)?;
            }
        }
        f.write_char(')')
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Call(expr) => expr.fmt(f),
            Arg::Str(text) => {
                f.write_char('"')?;
                for c in text.chars() {
                    if matches!(c, '"' | '\\') {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char('"')
            }
            // f64 Display is the shortest decimal form that parses back
            // to the same value, so numbers survive the round trip.
            Arg::Num(number) => write!(f, "{number}"),
        }
    }
}

/// All errors that `parse` can return. Printing never fails.
///
/// A failure anywhere in a nested argument fails the whole parse; the
/// `Nested` variant wraps the inner error with the enclosing call name
/// and the 1-based argument position so callers can report which
/// fragment of the input was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    /// Input was blank or whitespace-only.
    #[error("empty expression")]
    EmptyInput,

    /// Input does not begin with the `$` call sigil.
    #[error("expected '$' at the start of the expression")]
    MissingPrefix,

    /// No identifier between `$` and the type tag / argument list, or
    /// the name contains non-identifier characters.
    #[error("expected a call name after '$', found {0:?}")]
    MalformedName(String),

    /// An opened `<` has no matching `>` before the argument list, a
    /// stray `>` appears without `<`, or text sits between the closing
    /// `>` and the `(`.
    #[error("malformed type annotation: {0}")]
    MalformedTypeAnnotation(String),

    /// An opened `(` has no matching `)`, or a `)` closes nothing.
    #[error("unbalanced parentheses: {0}")]
    UnbalancedParens(String),

    /// Text remains after the closing `)` of the call or the closing
    /// `"` of a string argument.
    #[error("unexpected trailing text {0:?}")]
    TrailingInput(String),

    /// A string argument's opening `"` is never closed.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A bare argument is neither a nested call, nor a quoted string,
    /// nor a finite number.
    #[error("malformed number {0:?}")]
    MalformedNumber(String),

    /// Call nesting exceeds the parser's depth limit.
    #[error("expression nesting exceeds {0} levels")]
    TooDeep(usize),

    /// Propagated from a recursive parse of a nested call argument.
    #[error("in argument {index} of ${call}: {source}")]
    Nested {
        call: String,
        /// 1-based position of the failing argument.
        index: usize,
        #[source]
        source: Box<SyntaxError>,
    },
}

impl SyntaxError {
    /// Stable kind name for structured output and log matching.
    pub fn kind(&self) -> &'static str {
        match self {
            SyntaxError::EmptyInput => "EmptyInput",
            SyntaxError::MissingPrefix => "MissingPrefix",
            SyntaxError::MalformedName(_) => "MalformedName",
            SyntaxError::MalformedTypeAnnotation(_) => "MalformedTypeAnnotation",
            SyntaxError::UnbalancedParens(_) => "UnbalancedParens",
            SyntaxError::TrailingInput(_) => "TrailingInput",
            SyntaxError::UnterminatedString => "UnterminatedString",
            SyntaxError::MalformedNumber(_) => "MalformedNumber",
            SyntaxError::TooDeep(_) => "TooDeep",
            SyntaxError::Nested { .. } => "Nested",
        }
    }

    /// The innermost error of a `Nested` chain (the one that names the
    /// actual defect rather than the path to it).
    pub fn root_cause(&self) -> &SyntaxError {
        match self {
            SyntaxError::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Serialize for `--output json` consumers.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind":    self.kind(),
            "message": self.to_string(),
        })
    }
}

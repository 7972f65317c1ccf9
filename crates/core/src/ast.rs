//! Expression tree types shared by the parser, the printer, and the
//! builder construction interface.
//!
//! Trees are built either by [`crate::parse`] (from text) or directly by
//! generator code through the builder methods here; the codec treats both
//! identically. Nodes own their children outright (a strict tree, no
//! sharing), and nothing in the crate mutates a tree after construction.

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Expression nodes
// ──────────────────────────────────────────────

/// A named call, optionally type-tagged, optionally argumented.
///
/// Textual form `$name<dtype>(args)`. The serde shape embeds a node in
/// larger survey JSON documents as
/// `{"name":"or","dtype":"boolean","data":[...]}` with absent fields
/// omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// Operator / function being invoked. Never empty in parser output.
    pub name: String,
    /// Free-form type annotation, present only when the textual form
    /// carries `<...>`. Advisory to downstream consumers, not validated.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dtype: Option<String>,
    /// Argument payload; `None` for a call written with no arguments.
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "data_from_json"
    )]
    pub data: Option<Args>,
}

/// Argument payload of a call: exactly one value, or an ordered list.
///
/// The two shapes never overlap in trees this crate produces: `Many`
/// always holds two or more entries (the parser and the builders both
/// collapse a single argument into `One` and an empty list into no
/// payload at all). Order is semantically load-bearing and is never
/// changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Args {
    /// A single argument written without list wrapping.
    One(Arg),
    /// Two or more arguments, one entry per comma-separated argument.
    Many(Vec<Arg>),
}

/// One argument value: a nested call or a literal leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    /// Nested call.
    Call(Box<Expr>),
    /// String literal (content only, quotes stripped, escapes resolved).
    Str(String),
    /// Numeric literal.
    Num(f64),
}

// ──────────────────────────────────────────────
// Builders
// ──────────────────────────────────────────────

impl Expr {
    /// A call with no type tag and no arguments: `$name()`.
    pub fn call(name: impl Into<String>) -> Expr {
        Expr {
            name: name.into(),
            dtype: None,
            data: None,
        }
    }

    /// Attach a `<dtype>` type tag.
    pub fn with_dtype(mut self, dtype: impl Into<String>) -> Expr {
        self.dtype = Some(dtype.into());
        self
    }

    /// Replace the argument list, collapsing the count: an empty list
    /// becomes no payload, a single entry becomes [`Args::One`].
    pub fn with_args<I>(mut self, args: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.data = Args::from_vec(args.into_iter().map(Into::into).collect());
        self
    }

    /// Append one argument, keeping the payload shapes canonical.
    pub fn with_arg(mut self, arg: impl Into<Arg>) -> Expr {
        let mut all = match self.data.take() {
            None => Vec::new(),
            Some(Args::One(a)) => vec![a],
            Some(Args::Many(v)) => v,
        };
        all.push(arg.into());
        self.data = Args::from_vec(all);
        self
    }

    /// Number of arguments (0 when there is no payload).
    pub fn arg_count(&self) -> usize {
        self.data.as_ref().map_or(0, Args::len)
    }
}

impl Args {
    /// Canonical payload for an argument vector: `None` for zero
    /// entries, `One` for exactly one, `Many` otherwise.
    pub fn from_vec(mut args: Vec<Arg>) -> Option<Args> {
        match args.len() {
            0 => None,
            1 => Some(Args::One(args.remove(0))),
            _ => Some(Args::Many(args)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Args::One(_) => 1,
            Args::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arguments in their original left-to-right order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arg> {
        match self {
            Args::One(a) => std::slice::from_ref(a).iter(),
            Args::Many(v) => v.iter(),
        }
    }
}

impl Arg {
    /// Is this value a call node (as opposed to a literal leaf)?
    pub fn is_call(&self) -> bool {
        matches!(self, Arg::Call(_))
    }

    /// Is this value a string or numeric leaf?
    pub fn is_leaf(&self) -> bool {
        !self.is_call()
    }

    pub fn as_call(&self) -> Option<&Expr> {
        match self {
            Arg::Call(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Arg::Num(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Expr> for Arg {
    fn from(e: Expr) -> Arg {
        Arg::Call(Box::new(e))
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Arg {
        Arg::Str(s.to_owned())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Arg {
        Arg::Str(s)
    }
}

impl From<f64> for Arg {
    fn from(n: f64) -> Arg {
        Arg::Num(n)
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Arg {
        Arg::Num(n as f64)
    }
}

// ──────────────────────────────────────────────
// JSON payload normalization
// ──────────────────────────────────────────────

/// Deserialize the `data` field, renormalizing the count shapes so that
/// non-canonical JSON (`[]`, `[x]`) cannot smuggle an empty or
/// one-element `Many` into a tree.
fn data_from_json<'de, D>(deserializer: D) -> Result<Option<Args>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(Arg),
        Many(Vec<Arg>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::One(a)) => Some(Args::One(a)),
        Some(Raw::Many(v)) => Args::from_vec(v),
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

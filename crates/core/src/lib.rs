//! pollex-core: expression model and text codec.
//!
//! A rule expression like `$and($gt($q1(), 17), $eq($q2(), "yes"))` has
//! two equal representations: the `$`-call textual notation and the
//! [`Expr`] tree. This crate converts between them, in both directions.
//!
//! # Public API
//!
//! Key items are re-exported at the crate root for convenience:
//!
//! - [`parse()`] -- build an [`Expr`] tree from the textual notation
//! - [`print()`] -- render a tree back to canonical text
//! - [`SyntaxError`] -- typed parse failure
//! - Model types: [`Expr`], [`Args`], [`Arg`]
//!
//! Parsing and printing are inverse on canonical text: for every tree
//! `e`, `parse(&print(&e)) == Ok(e)`. Trees also serialize to JSON
//! through serde for storage and transport.

pub mod ast;
pub mod error;
mod lexer;
pub mod parser;
pub mod printer;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Arg, Args, Expr};
pub use error::SyntaxError;

// ── Convenience re-exports: codec entry points ───────────────────────

pub use parser::{parse, MAX_DEPTH};
pub use printer::print;

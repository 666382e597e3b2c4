//! Core pipeline of the MHS toolchain.
//!
//! MHS programs are compiled to a single Rust source file:
//!
//!   source .mhs
//!     -> lexer         (tokens)
//!     -> parser        (AST)
//!     -> codegen_rust  (Rust text over the runtime prefix)
//!
//! The runtime value model lives in [`runtime`]. The same file is copied
//! verbatim in front of every generated unit, so its behaviour can be
//! tested here without building generated programs.
//!
//! Higher-level tools (the CLI) should depend on this crate rather than
//! reimplementing the pipeline.

// ---------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------

pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;
pub mod ast;

// ---------------------------------------------------------------------
// Builtins and runtime
// ---------------------------------------------------------------------

pub mod builtins;
pub mod runtime;

// ---------------------------------------------------------------------
// Back-end: code generation and compiler orchestration
// ---------------------------------------------------------------------

pub mod codegen_rust;
pub mod compiler;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use compiler::{CompilationArtifact, compile_rust, emit_ast, emit_tokens, translate};
pub use error::CoreError;

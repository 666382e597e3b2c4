use std::io::{Read, Write};

use log::{info, warn};

use crate::builtins::{self, BuiltinDescriptor};
use crate::codegen_rust::{DispatchEntry, RustGenerator};
use crate::error::CoreError;
use crate::lexer::lex;
use crate::parser::parse_tokens;

/// Runtime prefix placed in front of every generated unit.
pub const RUNTIME: &str = include_str!("runtime.rs");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationArtifact {
    /// Complete Rust source, buildable with `rustc --edition 2021`.
    pub code: String,
    pub builtins: Vec<BuiltinDescriptor>,
    pub structs: Vec<String>,
    pub methods: Vec<DispatchEntry>,
}

pub fn compile_rust(source: &str) -> Result<CompilationArtifact, CoreError> {
    let lexed = lex(source);
    for skipped in &lexed.skipped {
        warn!(
            "dropping unrecognized character {:?} at byte {}",
            skipped.ch, skipped.offset
        );
    }

    let program = parse_tokens(&lexed.tokens)?;
    let used_builtins = builtins::collect_builtins(&program);

    let mut generator = RustGenerator::new();
    let body = generator.generate(&program);

    let mut code = String::with_capacity(RUNTIME.len() + body.len() + 1);
    code.push_str(RUNTIME);
    code.push('\n');
    code.push_str(&body);

    info!(
        "compiled {} items ({} structs, {} methods, {} builtins)",
        program.items.len(),
        generator.struct_names().len(),
        generator.methods().len(),
        used_builtins.len()
    );

    Ok(CompilationArtifact {
        code,
        builtins: used_builtins.into_iter().copied().collect(),
        structs: generator.struct_names(),
        methods: generator.methods().to_vec(),
    })
}

/// Read all of `input`, compile it, and write the unit to `output`.
pub fn translate(mut input: impl Read, mut output: impl Write) -> Result<CompilationArtifact, CoreError> {
    let mut source = String::new();
    input.read_to_string(&mut source)?;
    let artifact = compile_rust(&source)?;
    output.write_all(artifact.code.as_bytes())?;
    output.flush()?;
    Ok(artifact)
}

/// One `Kind lexeme` line per token, ending with `Eof`.
pub fn emit_tokens(source: &str) -> String {
    let mut out = String::new();
    for token in lex(source).tokens {
        if token.lexeme.is_empty() {
            out.push_str(&format!("{}\n", token.kind));
        } else {
            out.push_str(&format!("{} {}\n", token.kind, token.lexeme));
        }
    }
    out
}

pub fn emit_ast(source: &str) -> Result<String, CoreError> {
    let program = parse_tokens(&lex(source).tokens)?;
    Ok(format!("{program:#?}\n"))
}

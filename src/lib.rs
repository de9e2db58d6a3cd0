pub mod analyzer;
pub mod codegen;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;

use analyzer::{SemanticAnalyzer, SymbolTable};
use codegen::{Codegen, Instruction};
use error::{Diagnostics, LexicalError, PipelineError, RuntimeError, SemanticError, SyntaxError};
use interpreter::{ExecOptions, Execution, Interpreter};
use lexer::{Lexer, Token};
use parser::Parser;

pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexicalError>) {
    Lexer::tokenize(source)
}

pub fn build_symbol_table(tokens: &[Token]) -> SymbolTable {
    SymbolTable::build(tokens)
}

pub fn parse(tokens: &[Token]) -> Vec<SyntaxError> {
    Parser::new(tokens).parse().1
}

pub fn analyze(symbol_table: &SymbolTable, tokens: &[Token]) -> Vec<SemanticError> {
    SemanticAnalyzer::new(symbol_table, tokens).analyze()
}

fn to_text(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Instruction text, one instruction per line. Expects an error-free program.
pub fn generate(symbol_table: &SymbolTable, tokens: &[Token]) -> String {
    let (program, _) = Parser::new(tokens).parse();
    to_text(&Codegen::new(symbol_table).generate(&program))
}

pub fn execute(text: &str) -> Result<Execution, RuntimeError> {
    execute_with(text, &ExecOptions::default())
}

pub fn execute_with(text: &str, options: &ExecOptions) -> Result<Execution, RuntimeError> {
    Interpreter::from_text(text, options)?.run()
}

/// Everything the front end produced for an accepted program.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub symbol_table: SymbolTable,
    pub instructions: Vec<Instruction>,
}

impl Compilation {
    pub fn assembly(&self) -> String {
        to_text(&self.instructions)
    }
}

/// Runs every analysis phase and generates code once none of them reported an error.
pub fn compile(source: &str) -> Result<Compilation, PipelineError> {
    if source.trim().is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let (tokens, lexical_errors) = tokenize(source);
    let symbol_table = build_symbol_table(&tokens);
    let (program, syntax_errors) = Parser::new(&tokens).parse();
    let semantic_errors = analyze(&symbol_table, &tokens);

    let mut diagnostics = Diagnostics::default();
    diagnostics.extend(lexical_errors);
    diagnostics.extend(syntax_errors);
    diagnostics.extend(semantic_errors);
    diagnostics.dedup();
    if !diagnostics.is_empty() {
        log::debug!("rejected with {} diagnostic(s)", diagnostics.len());
        return Err(PipelineError::Rejected(diagnostics));
    }

    let instructions = Codegen::new(&symbol_table).generate(&program);
    Ok(Compilation {
        tokens,
        symbol_table,
        instructions,
    })
}

pub fn run(source: &str, options: &ExecOptions) -> Result<Execution, PipelineError> {
    let compilation = compile(source)?;
    let execution = Interpreter::new(compilation.instructions, options).run()?;
    Ok(execution)
}

use std::fmt;

use thiserror::Error;

use crate::interpreter::{Rule, Value};
use crate::lexer::TokenKind;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("unexpected character '{character}' at line {line}")]
pub struct LexicalError {
    pub line: usize,
    pub character: char,
}

/// What the parser saw instead of the token it wanted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Found {
    Token(TokenKind),
    Eof,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Token(kind) => write!(f, "{kind}"),
            Found::Eof => f.write_str("EOF"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found} at line {line}")]
    Expected {
        expected: TokenKind,
        found: Found,
        line: usize,
    },

    #[error("expected an operand, found {found} at line {line}")]
    ExpectedOperand { found: Found, line: usize },

    #[error("expected a comparison operator, found '{operator}' at line {line}")]
    ExpectedComparison { operator: String, line: usize },

    #[error("unexpected token '{lexeme}' at line {line}")]
    UnexpectedToken { lexeme: String, line: usize },

    #[error("unmatched closing brace at line {line}")]
    UnmatchedClosingBrace { line: usize },

    #[error("missing closing brace at line {line}")]
    MissingClosingBrace { line: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum SemanticError {
    #[error("undeclared variable '{name}' at line {line}")]
    UndeclaredVariable { name: String, line: usize },

    #[error("undefined function '{name}' at line {line}")]
    UndefinedFunction { name: String, line: usize },

    #[error("built-in function '{name}' redefined at line {line}")]
    BuiltinRedefinition { name: String, line: usize },

    #[error("type mismatch at declaration of '{name}' at line {line}")]
    DeclarationTypeMismatch { name: String, line: usize },

    #[error("operator '{operator}' requires two operands at line {line}")]
    MissingOperand { operator: String, line: usize },

    #[error("type not defined for operator '{operator}' at line {line}")]
    UndefinedType { operator: String, line: usize },

    #[error("cannot perform operation '{operator}' on non-numeric types at line {line}")]
    NonNumericOperation { operator: String, line: usize },

    #[error("type mismatch in expression at line {line}")]
    ExpressionTypeMismatch { line: usize },

    #[error("variable '{name}' used outside its scope at line {line}")]
    OutOfScope { name: String, line: usize },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to read instructions: {0}")]
    Parse(#[from] Box<pest::error::Error<Rule>>),

    #[error("malformed instruction '{0}'")]
    Malformed(String),

    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    #[error("unresolved operand '{0}'")]
    UnresolvedOperand(String),

    #[error("conditional jump to '{0}' without a preceding comparison")]
    MissingComparison(String),

    #[error("cannot compare {0} with {1}")]
    Incomparable(Value, Value),

    #[error("operation not supported on {0} and {1}")]
    TypeMismatch(Value, Value),

    #[error("division by zero")]
    DivisionByZero,

    #[error("return outside of a call")]
    ReturnOutsideCall,

    #[error("no input left for '{0}'")]
    InputExhausted(String),

    #[error("step budget of {0} instructions exceeded")]
    StepBudgetExceeded(usize),
}

/// Any error that is accumulated during analysis rather than raised.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum Diagnostic {
    #[error("Lexical error: {0}")]
    Lexical(#[from] LexicalError),

    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn extend<E: Into<Diagnostic>>(&mut self, errors: impl IntoIterator<Item = E>) {
        self.0.extend(errors.into_iter().map(Into::into));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Drops repeated diagnostics, keeping the first occurrence of each.
    pub fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.0.retain(|d| seen.insert(d.clone()));
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.0 {
            writeln!(f, "{d}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("empty input")]
    EmptyInput,

    #[error("program rejected with {} error(s)", .0.len())]
    Rejected(Diagnostics),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

use crate::codegen::is_builtin;
use crate::error::SemanticError;
use crate::lexer::{DataType, Token, TokenKind};

use super::{accepts, operand_type, scope::ScopeChain, SymbolKind, SymbolTable};

const ARITHMETIC_OPERATORS: [&str; 5] = ["+", "-", "*", "/", "%"];
const NUMERIC_ONLY_OPERATORS: [&str; 4] = ["-", "/", "*", "%"];
pub const COMPARISON_OPERATORS: [&str; 6] = ["==", "!=", "<", ">", "<=", ">="];

pub struct SemanticAnalyzer<'a> {
    symbol_table: &'a SymbolTable,
    tokens: &'a [Token],
    errors: Vec<SemanticError>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(symbol_table: &'a SymbolTable, tokens: &'a [Token]) -> Self {
        Self {
            symbol_table,
            tokens,
            errors: vec![],
        }
    }

    pub fn analyze(mut self) -> Vec<SemanticError> {
        self.check_variable_usage();
        self.check_function_calls();
        self.check_declared_types();
        self.check_operators();
        self.check_scopes();

        log::debug!("{} semantic error(s)", self.errors.len());
        self.errors
    }

    fn check_variable_usage(&mut self) {
        let tokens = self.tokens;
        for t in tokens.iter().filter(|t| t.is(TokenKind::Variable)) {
            if !self.symbol_table.contains(&t.lexeme) {
                self.errors.push(SemanticError::UndeclaredVariable {
                    name: t.lexeme.clone(),
                    line: t.line,
                });
            }
        }
    }

    fn check_function_calls(&mut self) {
        let tokens = self.tokens;
        for t in tokens.iter().filter(|t| t.is(TokenKind::Function)) {
            if !self.symbol_table.contains(&t.lexeme) && !is_builtin(&t.lexeme) {
                self.errors.push(SemanticError::UndefinedFunction {
                    name: t.lexeme.clone(),
                    line: t.line,
                });
            }
        }

        let symbol_table = self.symbol_table;
        for (name, symbol) in symbol_table.iter() {
            if symbol.kind == SymbolKind::Function && is_builtin(name) {
                self.errors.push(SemanticError::BuiltinRedefinition {
                    name: name.to_string(),
                    line: symbol.line,
                });
            }
        }
    }

    fn check_declared_types(&mut self) {
        let symbol_table = self.symbol_table;
        for (name, symbol) in symbol_table.iter() {
            if symbol.kind != SymbolKind::Variable {
                continue;
            }
            let (Some(ty), Some(value)) = (symbol.declared_type.data_type(), &symbol.value) else {
                continue;
            };
            if !accepts(ty, value) {
                self.errors.push(SemanticError::DeclarationTypeMismatch {
                    name: name.to_string(),
                    line: symbol.line,
                });
            }
        }
    }

    fn check_operators(&mut self) {
        let tokens = self.tokens;
        for (i, t) in tokens.iter().enumerate() {
            let op = t.lexeme.as_str();
            if !t.is(TokenKind::Operator)
                || !(ARITHMETIC_OPERATORS.contains(&op) || COMPARISON_OPERATORS.contains(&op))
            {
                continue;
            }
            if i == 0 || i == tokens.len() - 1 {
                self.errors.push(SemanticError::MissingOperand {
                    operator: op.to_string(),
                    line: t.line,
                });
                continue;
            }
            if let Some(e) = self.check_operands(t, &tokens[i - 1], &tokens[i + 1]) {
                self.errors.push(e);
            }
        }
    }

    fn check_operands(&self, op: &Token, left: &Token, right: &Token) -> Option<SemanticError> {
        let operator = op.lexeme.clone();
        let line = op.line;
        let (Some(l), Some(r)) = (
            operand_type(left, self.symbol_table),
            operand_type(right, self.symbol_table),
        ) else {
            return Some(SemanticError::UndefinedType { operator, line });
        };

        let non_numeric = |ty: DataType| matches!(ty, DataType::Line | DataType::Flag);
        if NUMERIC_ONLY_OPERATORS.contains(&operator.as_str()) && (non_numeric(l) || non_numeric(r)) {
            return Some(SemanticError::NonNumericOperation { operator, line });
        }
        if l.is_numeric() && r.is_numeric() {
            return None;
        }
        if l != r {
            return Some(SemanticError::ExpressionTypeMismatch { line });
        }
        None
    }

    fn check_scopes(&mut self) {
        let mut scopes = ScopeChain::new();
        let mut paren_depth = 0usize;

        for t in self.tokens {
            match t.kind {
                TokenKind::LParen => paren_depth += 1,
                TokenKind::RParen => paren_depth = paren_depth.saturating_sub(1),
                TokenKind::LCurly => scopes.push(),
                TokenKind::RCurly => scopes.pop(),
                TokenKind::StatementEnd if paren_depth == 0 => scopes.flush_staged(),
                TokenKind::Variable if t.declared_type.is_some() => {
                    if paren_depth > 0 {
                        scopes.stage(&t.lexeme);
                    } else {
                        scopes.declare(&t.lexeme);
                    }
                }
                TokenKind::Variable => {
                    if self.symbol_table.contains(&t.lexeme) && scopes.is_out_of_scope(&t.lexeme) {
                        self.errors.push(SemanticError::OutOfScope {
                            name: t.lexeme.clone(),
                            line: t.line,
                        });
                    }
                }
                _ => (),
            }
        }
    }
}

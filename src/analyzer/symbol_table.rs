use std::collections::HashMap;
use std::fmt;

use crate::lexer::{DeclaredType, Token, TokenKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Variable => f.write_str("VARIABLE"),
            SymbolKind::Function => f.write_str("FUNCTION"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub declared_type: DeclaredType,
    pub line: usize,
    /// Lexeme of the initializer seen at declaration time.
    pub value: Option<String>,
}

/// One flat, global namespace of every declared name.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    table: HashMap<String, Symbol>,
    order: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(tokens: &[Token]) -> Self {
        let mut symbol_table = Self::new();
        let mut pending_name: Option<&str> = None;

        for token in tokens {
            match token.kind {
                TokenKind::Variable => {
                    pending_name = None;
                    let Some(declared_type) = token.declared_type else {
                        continue;
                    };
                    symbol_table.declare(&token.lexeme, SymbolKind::Variable, declared_type, token.line);
                    if symbol_table.get(&token.lexeme).map(|s| s.kind) == Some(SymbolKind::Variable) {
                        pending_name = Some(&token.lexeme);
                    }
                }
                TokenKind::Literal | TokenKind::Constant => {
                    if let Some(name) = pending_name.take() {
                        symbol_table.set_value(name, &token.lexeme);
                    }
                }
                TokenKind::Function => {
                    pending_name = None;
                    if let Some(declared_type) = token.declared_type {
                        symbol_table.declare(&token.lexeme, SymbolKind::Function, declared_type, token.line);
                    }
                }
                TokenKind::StatementEnd => pending_name = None,
                _ => (),
            }
        }

        log::debug!("symbol table holds {} entries", symbol_table.len());
        symbol_table
    }

    /// Opens an entry unless the name is already taken; the first declaration wins.
    pub fn declare(&mut self, name: &str, kind: SymbolKind, declared_type: DeclaredType, line: usize) {
        if self.table.contains_key(name) {
            return;
        }
        self.order.push(name.to_string());
        self.table.insert(
            name.to_string(),
            Symbol {
                kind,
                declared_type,
                line,
                value: None,
            },
        );
    }

    fn set_value(&mut self, name: &str, value: &str) {
        if let Some(symbol) = self.table.get_mut(name) {
            if symbol.kind == SymbolKind::Variable {
                symbol.value = Some(value.to_string());
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.get(name).is_some_and(|s| s.kind == SymbolKind::Function)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.order
            .iter()
            .filter_map(|name| self.table.get(name).map(|s| (name.as_str(), s)))
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, symbol) in self.iter() {
            writeln!(
                f,
                "{name}: {} {} line {} value {}",
                symbol.kind,
                symbol.declared_type,
                symbol.line,
                symbol.value.as_deref().unwrap_or("-")
            )?;
        }
        Ok(())
    }
}

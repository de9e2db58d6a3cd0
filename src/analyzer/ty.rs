use crate::lexer::{DataType, Token, TokenKind};

use super::SymbolTable;

pub const TRUE_LITERAL: &str = "yes";
pub const FALSE_LITERAL: &str = "no";

pub fn is_flag_literal(s: &str) -> bool {
    s == TRUE_LITERAL || s == FALSE_LITERAL
}

pub fn is_integer_literal(s: &str) -> bool {
    s.parse::<i64>().is_ok()
}

pub fn is_decimal_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().filter(|&c| c == '.').count() <= 1
        && digits.starts_with(|c: char| c.is_ascii_digit())
}

fn quoted(s: &str, quote: char) -> Option<&str> {
    s.strip_prefix(quote)?.strip_suffix(quote)
}

/// Type of a literal or constant lexeme, judged from its spelling alone.
pub fn literal_type(s: &str) -> Option<DataType> {
    if is_flag_literal(s) {
        Some(DataType::Flag)
    } else if is_integer_literal(s) {
        Some(DataType::Integer)
    } else if is_decimal_literal(s) {
        Some(DataType::Decimal)
    } else if s.len() >= 2 && quoted(s, '"').is_some() {
        Some(DataType::Line)
    } else if s.len() >= 2 && quoted(s, '\'').is_some() {
        Some(DataType::Single)
    } else {
        None
    }
}

/// Whether `value` is a valid initializer spelling for `ty`.
pub fn accepts(ty: DataType, value: &str) -> bool {
    match ty {
        DataType::Integer => is_integer_literal(value),
        DataType::Decimal => is_decimal_literal(value),
        DataType::Line => value.len() >= 2 && quoted(value, '"').is_some(),
        DataType::Flag => is_flag_literal(value),
        DataType::Single => {
            value.len() >= 2 && quoted(value, '\'').is_some_and(|inner| inner.chars().count() == 1)
        }
    }
}

/// Type of a token used as an operand, from its spelling or the symbol table.
pub fn operand_type(token: &Token, symbol_table: &SymbolTable) -> Option<DataType> {
    match token.kind {
        TokenKind::Literal | TokenKind::Constant => literal_type(&token.lexeme),
        TokenKind::Variable | TokenKind::Function => symbol_table
            .get(&token.lexeme)
            .and_then(|s| s.declared_type.data_type()),
        _ => None,
    }
}

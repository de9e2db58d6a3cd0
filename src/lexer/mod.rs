mod lexer;
mod token;

pub use lexer::*;
pub use token::{DataType, DeclaredType, Token, TokenKind};

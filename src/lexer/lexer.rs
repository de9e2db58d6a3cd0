use super::{
    token::{BLANK_KEYWORD, ONE_SYMBOL_TOKENS, TWO_SYMBOLS_TOKENS, WORDS},
    DataType, DeclaredType, Token, TokenKind,
};
use crate::error::LexicalError;

const COMMENT: char = '@';

#[derive(Debug)]
pub struct Lexer {
    tokens: Vec<Token>,
    errors: Vec<LexicalError>,
    index: usize,
    line: usize,
}

impl Lexer {
    fn new() -> Self {
        Self {
            tokens: vec![],
            errors: vec![],
            index: 0,
            line: 0,
        }
    }

    fn new_token(&mut self, kind: TokenKind, s: &str) {
        self.tokens.push(Token::new(kind, s, self.line));
        self.index += s.chars().count();
    }

    /// Type tag for a name, taken from the token right before it.
    fn declared_type(&self) -> Option<DeclaredType> {
        let prev = self.tokens.last()?;
        match prev.kind {
            TokenKind::DataType => DataType::from_keyword(&prev.lexeme).map(DeclaredType::Data),
            TokenKind::Keyword if prev.lexeme == BLANK_KEYWORD => Some(DeclaredType::Blank),
            _ => None,
        }
    }

    /// A `-` folds into the literal after it unless the previous token on this
    /// line could be the left operand of a subtraction.
    fn starts_negative_literal(&self, chars: &[char]) -> bool {
        if chars.len() < 2 || chars[0] != '-' || !chars[1].is_ascii_digit() {
            return false;
        }
        match self.tokens.last() {
            Some(prev) if prev.line == self.line => !prev.kind.ends_operand(),
            _ => true,
        }
    }

    fn parse_number(&mut self, chars: &[char]) {
        let mut len = usize::from(chars[0] == '-');
        len += chars[len..].iter().take_while(|c| c.is_ascii_digit()).count();
        if chars.get(len) == Some(&'.') {
            len += 1;
            len += chars[len..].iter().take_while(|c| c.is_ascii_digit()).count();
        }
        let s: String = chars[..len].iter().collect();
        self.new_token(TokenKind::Literal, &s);
    }

    fn parse_constant(&mut self, chars: &[char]) {
        let quote = chars[0];
        match chars[1..].iter().position(|&c| c == quote) {
            Some(end) => {
                let s: String = chars[..end + 2].iter().collect();
                self.new_token(TokenKind::Constant, &s);
            }
            None => self.error(quote),
        }
    }

    fn parse_word(&mut self, chars: &[char]) {
        let s: String = chars
            .iter()
            .take_while(|&&c| c.is_ascii_alphanumeric() || c == '_')
            .collect();

        if let Some(kind) = WORDS.get(s.as_str()) {
            self.new_token(*kind, &s);
            return;
        }

        let len = s.chars().count();
        let is_call = chars[len..]
            .iter()
            .find(|c| !c.is_whitespace())
            .is_some_and(|&c| c == '(');
        let kind = if is_call {
            TokenKind::Function
        } else {
            TokenKind::Variable
        };

        let token = Token::new(kind, s, self.line).with_declared_type(self.declared_type());
        self.tokens.push(token);
        self.index += len;
    }

    fn error(&mut self, character: char) {
        self.errors.push(LexicalError {
            line: self.line,
            character,
        });
        self.index += 1;
    }

    fn tokenize_line(&mut self, line: &str) {
        let chars: Vec<_> = line.chars().collect();
        self.index = 0;

        while self.index < chars.len() {
            let rest = &chars[self.index..];
            let c = rest[0];
            let c2 = rest.iter().take(2).collect::<String>();

            if c.is_whitespace() {
                self.index += 1;
            } else if c == COMMENT {
                break;
            } else if c == '"' || c == '\'' {
                self.parse_constant(rest);
            } else if c.is_ascii_digit() || self.starts_negative_literal(rest) {
                self.parse_number(rest);
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.parse_word(rest);
            } else if let Some(kind) = TWO_SYMBOLS_TOKENS.get(c2.as_str()) {
                self.new_token(*kind, &c2);
            } else if let Some(kind) = ONE_SYMBOL_TOKENS.get(&c) {
                self.new_token(*kind, &c.to_string());
            } else {
                self.error(c);
            }
        }
    }

    fn _tokenize(&mut self, s: &str) {
        for (i, line) in s.lines().enumerate() {
            self.line = i + 1;
            self.tokenize_line(line);
        }
    }

    pub fn tokenize(s: &str) -> (Vec<Token>, Vec<LexicalError>) {
        let mut lexer = Lexer::new();
        lexer._tokenize(s);

        log::debug!(
            "lexed {} token(s), {} lexical error(s)",
            lexer.tokens.len(),
            lexer.errors.len()
        );
        (lexer.tokens, lexer.errors)
    }
}

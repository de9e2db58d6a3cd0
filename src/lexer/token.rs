use std::fmt;

use phf::phf_map;

pub(super) static WORDS: phf::Map<&str, TokenKind> = phf_map! {
    "iff" => TokenKind::Keyword,
    "otherwise" => TokenKind::Keyword,
    "then" => TokenKind::Keyword,
    "repeat" => TokenKind::Keyword,
    "rotate" => TokenKind::Keyword,
    "blank" => TokenKind::Keyword,
    "stop" => TokenKind::Keyword,
    "resume" => TokenKind::Keyword,

    "integer" => TokenKind::DataType,
    "decimal" => TokenKind::DataType,
    "line" => TokenKind::DataType,
    "flag" => TokenKind::DataType,
    "single" => TokenKind::DataType,

    "yes" => TokenKind::Literal,
    "no" => TokenKind::Literal,
};

pub(super) static TWO_SYMBOLS_TOKENS: phf::Map<&str, TokenKind> = phf_map! {
    "<=" => TokenKind::Operator,
    ">=" => TokenKind::Operator,
    "==" => TokenKind::Operator,
    "!=" => TokenKind::Operator,
    "++" => TokenKind::Operator,
    "--" => TokenKind::Operator,
};

pub(super) static ONE_SYMBOL_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '+' => TokenKind::Operator,
    '-' => TokenKind::Operator,
    '*' => TokenKind::Operator,
    '/' => TokenKind::Operator,
    '%' => TokenKind::Operator,
    '<' => TokenKind::Operator,
    '>' => TokenKind::Operator,
    '=' => TokenKind::Assign,
    '{' => TokenKind::LCurly,
    '}' => TokenKind::RCurly,
    '(' => TokenKind::LParen,
    ')' => TokenKind::RParen,
    ',' => TokenKind::Separator,
    '!' => TokenKind::StatementEnd,
};

pub const BLANK_KEYWORD: &str = "blank";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    DataType,
    Variable,
    Function,
    Keyword,
    Operator,
    Literal,
    Constant,
    Assign,
    LCurly,
    RCurly,
    LParen,
    RParen,
    Separator,
    StatementEnd,
}

impl TokenKind {
    /// Whether a token of this kind can be the last token of an operand.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Variable | TokenKind::Literal | TokenKind::Constant | TokenKind::RParen
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::DataType => "DATA_TYPE",
            TokenKind::Variable => "VARIABLE",
            TokenKind::Function => "FUNCTION",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Literal => "LITERAL",
            TokenKind::Constant => "CONSTANT",
            TokenKind::Assign => "ASSIGN",
            TokenKind::LCurly => "LCURLY",
            TokenKind::RCurly => "RCURLY",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::StatementEnd => "STATEMENT_END",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Decimal,
    Line,
    Flag,
    Single,
}

impl DataType {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "integer" => Some(DataType::Integer),
            "decimal" => Some(DataType::Decimal),
            "line" => Some(DataType::Line),
            "flag" => Some(DataType::Flag),
            "single" => Some(DataType::Single),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Decimal)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Integer => "integer",
            DataType::Decimal => "decimal",
            DataType::Line => "line",
            DataType::Flag => "flag",
            DataType::Single => "single",
        };
        f.write_str(name)
    }
}

/// The tag a name inherits from the type keyword or `blank` right before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Data(DataType),
    Blank,
}

impl DeclaredType {
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            DeclaredType::Data(ty) => Some(*ty),
            DeclaredType::Blank => None,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Data(ty) => write!(f, "{ty}"),
            DeclaredType::Blank => f.write_str(BLANK_KEYWORD),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub declared_type: Option<DeclaredType>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            declared_type: None,
        }
    }

    pub fn with_declared_type(mut self, declared_type: Option<DeclaredType>) -> Self {
        self.declared_type = declared_type;
        self
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declared_type {
            Some(ty) => write!(
                f,
                "({}, {:?}, {}, {})",
                self.kind, self.lexeme, self.line, ty
            ),
            None => write!(f, "({}, {:?}, {})", self.kind, self.lexeme, self.line),
        }
    }
}

use crate::lexer::{DataType, DeclaredType};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program(pub Vec<Stmt>);

#[derive(Clone, Debug, PartialEq)]
pub enum Atom {
    /// Numbers and the `yes`/`no` flags.
    Literal(String),
    /// Quoted strings and characters, quotes included.
    Constant(String),
    Variable(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprItem {
    Atom(Atom),
    Operator(String),
    Call(FunctionCall),
}

/// A flat run of operands and operators, evaluated left to right.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expr(pub Vec<ExprItem>);

impl Expr {
    pub fn as_single_atom(&self) -> Option<&Atom> {
        match self.0.as_slice() {
            [ExprItem::Atom(atom)] => Some(atom),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Atom(Atom),
    Call(FunctionCall),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub left: Operand,
    pub operator: String,
    pub right: Operand,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    Param { ty: DataType, name: String },
    Value(Atom),
    Call(FunctionCall),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Argument>,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Progression {
    /// `None` when the header only names an operator and an amount, e.g. `+ 2`.
    pub target: Option<String>,
    pub operator: String,
    pub operand: Option<Atom>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Stop,
    Resume,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Declaration {
        ty: DataType,
        name: String,
        init: Option<Expr>,
    },
    Assignment {
        name: String,
        value: Expr,
    },
    Block(Vec<Stmt>),
    /// `iff` and `otherwise` arms in order, then the `then` fallback.
    If {
        arms: Vec<(Condition, Vec<Stmt>)>,
        otherwise: Option<Vec<Stmt>>,
    },
    Repeat {
        init: Box<Stmt>,
        condition: Condition,
        progression: Option<Progression>,
        body: Vec<Stmt>,
    },
    Rotate {
        condition: Condition,
        body: Vec<Stmt>,
    },
    FunctionDef {
        name: String,
        return_type: DeclaredType,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    Call(FunctionCall),
    LoopControl(LoopControl),
}

use std::cmp::Ordering;
use std::fmt;

pub const SHOW_OUT: &str = "showOut";
pub const GET_INPUT: &str = "getInput";

/// Functions the interpreter provides without a definition in the program.
pub fn is_builtin(name: &str) -> bool {
    name == SHOW_OUT || name == GET_INPUT
}

/// Scratch register used to evaluate multi-item expressions.
pub const ACCUMULATOR: &str = "%acc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Move { dest: Operand, src: Operand },
    Compare { left: Operand, right: Operand },
    JumpIf { condition: ComparisonOp, label: String },
    Jump(String),
    Label(String),
    Call { name: String, args: Vec<Operand> },
    Arith { op: ArithOp, dest: Operand, src: Operand },
    Return,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Move { dest, src } => write!(f, "MOV {dest}, {src}"),
            Instruction::Compare { left, right } => write!(f, "CMP {left}, {right}"),
            Instruction::JumpIf { condition, label } => {
                write!(f, "{} {label}", condition.mnemonic())
            }
            Instruction::Jump(label) => write!(f, "JMP {label}"),
            Instruction::Label(name) => write!(f, "{name}:"),
            Instruction::Call { name, args } => {
                write!(f, "CALL {name}")?;
                for (i, arg) in args.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{arg}")?;
                }
                Ok(())
            }
            Instruction::Arith { op, dest, src } => write!(f, "{op} {dest}, {src}"),
            Instruction::Return => write!(f, "RET"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Variable(String),
    Register(String),
    Number(String),
    /// Quoted text, quotes included.
    Text(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Variable(s) | Operand::Register(s) | Operand::Number(s) | Operand::Text(s) => {
                write!(f, "{s}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl ComparisonOp {
    pub fn from_operator(op: &str) -> Option<Self> {
        Some(match op {
            "==" => ComparisonOp::Eq,
            "!=" => ComparisonOp::Ne,
            "<" => ComparisonOp::Lt,
            ">" => ComparisonOp::Gt,
            "<=" => ComparisonOp::Le,
            ">=" => ComparisonOp::Ge,
            _ => return None,
        })
    }

    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "JE" => ComparisonOp::Eq,
            "JNE" => ComparisonOp::Ne,
            "JL" => ComparisonOp::Lt,
            "JG" => ComparisonOp::Gt,
            "JLE" => ComparisonOp::Le,
            "JGE" => ComparisonOp::Ge,
            _ => return None,
        })
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "JE",
            ComparisonOp::Ne => "JNE",
            ComparisonOp::Lt => "JL",
            ComparisonOp::Gt => "JG",
            ComparisonOp::Le => "JLE",
            ComparisonOp::Ge => "JGE",
        }
    }

    pub fn compare(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::Ne => ordering != Ordering::Equal,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Le => ordering != Ordering::Greater,
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Ge => ordering != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub fn from_operator(op: &str) -> Option<Self> {
        Some(match op {
            "+" | "++" => ArithOp::Add,
            "-" | "--" => ArithOp::Sub,
            "*" => ArithOp::Mul,
            "/" => ArithOp::Div,
            "%" => ArithOp::Mod,
            _ => return None,
        })
    }

    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "ADD" => ArithOp::Add,
            "SUB" => ArithOp::Sub,
            "MUL" => ArithOp::Mul,
            "DIV" => ArithOp::Div,
            "MOD" => ArithOp::Mod,
            _ => return None,
        })
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArithOp::Add => "ADD",
            ArithOp::Sub => "SUB",
            ArithOp::Mul => "MUL",
            ArithOp::Div => "DIV",
            ArithOp::Mod => "MOD",
        };
        write!(f, "{s}")
    }
}

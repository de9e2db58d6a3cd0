use crate::analyzer::COMPARISON_OPERATORS;
use crate::error::{Found, SyntaxError};
use crate::lexer::{DataType, DeclaredType, Token, TokenKind};

use super::{
    Argument, Atom, Condition, Expr, ExprItem, FunctionCall, LoopControl, Operand, Program,
    Progression, Stmt,
};

/// Error-tolerant recursive descent over the token list. A mismatch is
/// recorded and one token is skipped, so parsing always reaches the end.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [Token],
    index: usize,
    /// Lines of the currently open `{`.
    blocks: Vec<usize>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            index: 0,
            blocks: vec![],
            errors: vec![],
        }
    }

    pub fn parse(mut self) -> (Program, Vec<SyntaxError>) {
        let program = self.parse_program();
        log::debug!(
            "parsed {} top-level statement(s), {} syntax error(s)",
            program.0.len(),
            self.errors.len()
        );
        (program, self.errors)
    }

    fn is_eof(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let t = self.peek();
        if t.is_some() {
            self.index += 1;
        }
        t
    }

    fn found(&self) -> Found {
        self.peek_kind().map_or(Found::Eof, Found::Token)
    }

    /// Line of the current token, or of the last one once input is exhausted.
    fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn consume(&mut self, kind: TokenKind) -> Option<&'a Token> {
        if self.at(kind) {
            self.advance()
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Option<&'a Token> {
        if let Some(t) = self.consume(kind) {
            return Some(t);
        }
        self.errors.push(SyntaxError::Expected {
            expected: kind,
            found: self.found(),
            line: self.line(),
        });
        self.advance();
        None
    }

    /// program = statement*
    fn parse_program(&mut self) -> Program {
        let mut stmts = vec![];
        while !self.is_eof() {
            self.parse_statement_into(&mut stmts);
        }

        if let Some(&line) = self.blocks.last() {
            self.errors.push(SyntaxError::MissingClosingBrace { line });
        }
        Program(stmts)
    }

    /// block = "{" statement* "}"
    fn parse_block(&mut self) -> Vec<Stmt> {
        let Some(open) = self.expect(TokenKind::LCurly) else {
            return vec![];
        };
        self.blocks.push(open.line);

        let mut stmts = vec![];
        while !self.is_eof() && !self.at(TokenKind::RCurly) {
            self.parse_statement_into(&mut stmts);
        }
        if self.consume(TokenKind::RCurly).is_some() {
            self.blocks.pop();
        }
        stmts
    }

    /// statement = block
    ///           | DATA_TYPE declaration_tail
    ///           | conditional
    ///           | loop
    ///           | function_def
    ///           | function_call "!"
    ///           | assignment
    ///           | loop_control "!"
    fn parse_statement_into(&mut self, stmts: &mut Vec<Stmt>) {
        let Some(t) = self.peek() else {
            return;
        };

        match t.kind {
            TokenKind::LCurly => {
                let body = self.parse_block();
                stmts.push(Stmt::Block(body));
            }
            TokenKind::RCurly => {
                self.errors
                    .push(SyntaxError::UnmatchedClosingBrace { line: t.line });
                self.advance();
            }
            TokenKind::DataType => stmts.extend(self.parse_declaration()),
            TokenKind::Keyword => match t.lexeme.as_str() {
                "iff" => {
                    let arm = self.parse_conditional_arm();
                    stmts.push(Stmt::If {
                        arms: arm.into_iter().collect(),
                        otherwise: None,
                    });
                }
                "otherwise" => {
                    let arm = self.parse_conditional_arm();
                    match stmts.last_mut() {
                        Some(Stmt::If {
                            arms,
                            otherwise: None,
                        }) if !arms.is_empty() => arms.extend(arm),
                        _ => stmts.push(Stmt::If {
                            arms: arm.into_iter().collect(),
                            otherwise: None,
                        }),
                    }
                }
                "then" => {
                    self.advance();
                    let body = self.parse_block();
                    match stmts.last_mut() {
                        Some(Stmt::If {
                            arms,
                            otherwise: slot @ None,
                        }) if !arms.is_empty() => *slot = Some(body),
                        _ => stmts.push(Stmt::If {
                            arms: vec![],
                            otherwise: Some(body),
                        }),
                    }
                }
                "repeat" => stmts.extend(self.parse_repeat()),
                "rotate" => stmts.extend(self.parse_rotate()),
                "blank" => {
                    self.advance();
                    stmts.extend(self.parse_function_def(DeclaredType::Blank));
                }
                "stop" | "resume" => {
                    let control = if t.lexeme == "stop" {
                        LoopControl::Stop
                    } else {
                        LoopControl::Resume
                    };
                    self.advance();
                    self.expect(TokenKind::StatementEnd);
                    stmts.push(Stmt::LoopControl(control));
                }
                _ => self.unexpected(),
            },
            TokenKind::Function => {
                let call = self.parse_function_call();
                self.expect(TokenKind::StatementEnd);
                stmts.push(Stmt::Call(call));
            }
            TokenKind::Variable => stmts.extend(self.parse_assignment()),
            _ => self.unexpected(),
        }
    }

    fn unexpected(&mut self) {
        if let Some(t) = self.advance() {
            self.errors.push(SyntaxError::UnexpectedToken {
                lexeme: t.lexeme.clone(),
                line: t.line,
            });
        }
    }

    fn parse_declaration(&mut self) -> Option<Stmt> {
        let ty = self
            .advance()
            .and_then(|t| DataType::from_keyword(&t.lexeme))?;
        if self.at(TokenKind::Function) {
            return self.parse_function_def(DeclaredType::Data(ty));
        }
        self.parse_declaration_tail(ty)
    }

    /// declaration_tail = VARIABLE ("!" | "=" expression* "!")
    fn parse_declaration_tail(&mut self, ty: DataType) -> Option<Stmt> {
        let name = self.expect(TokenKind::Variable).map(|t| t.lexeme.clone());

        let terminated = if self.is_eof() {
            name.is_some() && self.expect(TokenKind::StatementEnd).is_some()
        } else {
            self.consume(TokenKind::StatementEnd).is_some()
        };
        if terminated || self.is_eof() {
            return name.map(|name| Stmt::Declaration {
                ty,
                name,
                init: None,
            });
        }

        self.expect(TokenKind::Assign);
        let value = self.parse_expr();
        self.expect(TokenKind::StatementEnd);
        name.map(|name| Stmt::Declaration {
            ty,
            name,
            init: Some(value),
        })
    }

    /// assignment = VARIABLE "=" expression* "!"
    fn parse_assignment(&mut self) -> Option<Stmt> {
        let name = self.expect(TokenKind::Variable)?.lexeme.clone();
        self.expect(TokenKind::Assign);
        let value = self.parse_expr();
        self.expect(TokenKind::StatementEnd);
        Some(Stmt::Assignment { name, value })
    }

    fn parse_atom(&mut self) -> Option<Atom> {
        let t = self.peek()?;
        let atom = match t.kind {
            TokenKind::Literal => Atom::Literal(t.lexeme.clone()),
            TokenKind::Constant => Atom::Constant(t.lexeme.clone()),
            TokenKind::Variable => Atom::Variable(t.lexeme.clone()),
            _ => return None,
        };
        self.advance();
        Some(atom)
    }

    /// expression = LITERAL | CONSTANT | VARIABLE | OPERATOR | function_call
    fn parse_expr(&mut self) -> Expr {
        let mut items = vec![];
        loop {
            if let Some(atom) = self.parse_atom() {
                items.push(ExprItem::Atom(atom));
            } else if let Some(t) = self.consume(TokenKind::Operator) {
                items.push(ExprItem::Operator(t.lexeme.clone()));
            } else if self.at(TokenKind::Function) {
                items.push(ExprItem::Call(self.parse_function_call()));
            } else {
                break;
            }
        }
        Expr(items)
    }

    fn parse_operand(&mut self) -> Option<Operand> {
        if let Some(atom) = self.parse_atom() {
            return Some(Operand::Atom(atom));
        }
        if self.at(TokenKind::Function) {
            return Some(Operand::Call(self.parse_function_call()));
        }
        self.errors.push(SyntaxError::ExpectedOperand {
            found: self.found(),
            line: self.line(),
        });
        None
    }

    /// condition = expression OPERATOR expression
    fn parse_condition(&mut self) -> Option<Condition> {
        let left = self.parse_operand();
        let operator = self.expect(TokenKind::Operator);
        if let Some(op) = operator {
            if !COMPARISON_OPERATORS.contains(&op.lexeme.as_str()) {
                self.errors.push(SyntaxError::ExpectedComparison {
                    operator: op.lexeme.clone(),
                    line: op.line,
                });
            }
        }
        let right = self.parse_operand();

        let operator = operator?.lexeme.clone();
        if !COMPARISON_OPERATORS.contains(&operator.as_str()) {
            return None;
        }
        Some(Condition {
            left: left?,
            operator,
            right: right?,
        })
    }

    /// conditional = ("iff" | "otherwise") condition block
    ///
    /// The condition may sit inside one pair of parentheses.
    fn parse_conditional_arm(&mut self) -> Option<(Condition, Vec<Stmt>)> {
        self.advance();
        let wrapped = self.consume(TokenKind::LParen).is_some();
        let condition = self.parse_condition();
        if wrapped {
            self.expect(TokenKind::RParen);
        }
        let body = self.parse_block();
        Some((condition?, body))
    }

    /// loop = "repeat" "(" declaration_tail condition "!" progression ")" block
    fn parse_repeat(&mut self) -> Option<Stmt> {
        self.advance();
        self.expect(TokenKind::LParen);

        let init = match self.peek_kind() {
            Some(TokenKind::DataType) => self.parse_declaration(),
            Some(TokenKind::Variable) => self.parse_assignment(),
            _ => {
                self.expect(TokenKind::Variable);
                None
            }
        };
        let condition = self.parse_condition();
        self.expect(TokenKind::StatementEnd);
        let progression = self.parse_progression();
        self.expect(TokenKind::RParen);
        let body = self.parse_block();

        Some(Stmt::Repeat {
            init: Box::new(init?),
            condition: condition?,
            progression,
            body,
        })
    }

    /// loop = "rotate" "(" condition ")" block
    fn parse_rotate(&mut self) -> Option<Stmt> {
        self.advance();
        self.expect(TokenKind::LParen);
        let condition = self.parse_condition();
        self.expect(TokenKind::RParen);
        let body = self.parse_block();

        Some(Stmt::Rotate {
            condition: condition?,
            body,
        })
    }

    /// progression = VARIABLE OPERATOR (LITERAL | VARIABLE)?
    ///             | OPERATOR (LITERAL | VARIABLE)
    fn parse_progression(&mut self) -> Option<Progression> {
        match self.peek_kind() {
            Some(TokenKind::Variable) => {
                let target = self.parse_atom().and_then(|a| match a {
                    Atom::Variable(name) => Some(name),
                    _ => None,
                });
                let operator = self.expect(TokenKind::Operator)?.lexeme.clone();
                let operand = self.parse_atom();
                Some(Progression {
                    target,
                    operator,
                    operand,
                })
            }
            Some(TokenKind::Operator) => {
                let operator = self.advance()?.lexeme.clone();
                let step_only = operator == "++" || operator == "--";
                match self.parse_atom() {
                    Some(Atom::Variable(name)) if step_only => Some(Progression {
                        target: Some(name),
                        operator,
                        operand: None,
                    }),
                    operand => Some(Progression {
                        target: None,
                        operator,
                        operand,
                    }),
                }
            }
            _ => {
                self.errors.push(SyntaxError::Expected {
                    expected: TokenKind::Variable,
                    found: self.found(),
                    line: self.line(),
                });
                None
            }
        }
    }

    /// function_def = "blank"? FUNCTION "(" argument_list ")" block
    fn parse_function_def(&mut self, return_type: DeclaredType) -> Option<Stmt> {
        let name = self.expect(TokenKind::Function).map(|t| t.lexeme.clone());
        self.expect(TokenKind::LParen);
        let args = self.parse_argument_list();
        self.expect(TokenKind::RParen);
        let body = self.parse_block();

        let params = args
            .into_iter()
            .filter_map(|a| match a {
                Argument::Param { name, .. } => Some(name),
                _ => None,
            })
            .collect();
        Some(Stmt::FunctionDef {
            name: name?,
            return_type,
            params,
            body,
        })
    }

    /// function_call = FUNCTION "(" argument_list ")"
    fn parse_function_call(&mut self) -> FunctionCall {
        let (name, line) = self
            .advance()
            .map_or((String::new(), self.line()), |t| (t.lexeme.clone(), t.line));
        self.expect(TokenKind::LParen);
        let args = self.parse_argument_list();
        self.expect(TokenKind::RParen);
        FunctionCall { name, args, line }
    }

    /// argument_list = (argument ("," argument)*)?
    /// argument = DATA_TYPE VARIABLE | LITERAL | CONSTANT | VARIABLE | function_call
    fn parse_argument_list(&mut self) -> Vec<Argument> {
        let mut args = vec![];
        while !self.at_argument_end() {
            match self.peek_kind() {
                Some(TokenKind::DataType) => {
                    let ty = self
                        .advance()
                        .and_then(|t| DataType::from_keyword(&t.lexeme));
                    let name = self.expect(TokenKind::Variable);
                    if let (Some(ty), Some(name)) = (ty, name) {
                        args.push(Argument::Param {
                            ty,
                            name: name.lexeme.clone(),
                        });
                    }
                }
                Some(TokenKind::Function) => args.push(Argument::Call(self.parse_function_call())),
                _ => match self.parse_atom() {
                    Some(atom) => args.push(Argument::Value(atom)),
                    None => {
                        self.unexpected();
                        continue;
                    }
                },
            }
            if !self.at_argument_end() {
                self.expect(TokenKind::Separator);
            }
        }
        args
    }

    fn at_argument_end(&self) -> bool {
        self.is_eof()
            || self.at(TokenKind::RParen)
            || self.at(TokenKind::StatementEnd)
            || self.at(TokenKind::LCurly)
    }
}

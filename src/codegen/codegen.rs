use std::collections::HashMap;

use crate::{
    analyzer::{is_integer_literal, SymbolKind, SymbolTable, FALSE_LITERAL, TRUE_LITERAL},
    lexer::{DataType, DeclaredType},
    parser::{
        self, Argument, Atom, Condition, Expr, ExprItem, FunctionCall, LoopControl, Program,
        Progression, Stmt,
    },
};

use super::{is_builtin, ArithOp, ComparisonOp, Instruction, Operand, ACCUMULATOR};

/// Jump targets for `stop` and `resume` inside the innermost loop.
struct LoopLabels {
    resume: String,
    end: String,
}

pub struct Codegen<'a> {
    label_index: usize,
    symbol_table: &'a SymbolTable,
    params: HashMap<String, Vec<String>>,
    loops: Vec<LoopLabels>,
    instructions: Vec<Instruction>,
}

fn encode_atom(atom: &Atom) -> Operand {
    match atom {
        Atom::Literal(s) if s == TRUE_LITERAL => Operand::Number("1".to_string()),
        Atom::Literal(s) if s == FALSE_LITERAL => Operand::Number("0".to_string()),
        Atom::Literal(s) => Operand::Number(s.clone()),
        Atom::Constant(s) => Operand::Text(s.clone()),
        Atom::Variable(name) => Operand::Variable(name.clone()),
    }
}

fn zero_value(ty: DataType) -> Operand {
    match ty {
        DataType::Integer | DataType::Flag => Operand::Number("0".to_string()),
        DataType::Decimal => Operand::Number("0.0".to_string()),
        DataType::Line => Operand::Text("\"\"".to_string()),
        DataType::Single => Operand::Text("''".to_string()),
    }
}

fn accumulator() -> Operand {
    Operand::Register(ACCUMULATOR.to_string())
}

/// Records the parameter names of every function definition, nested ones included.
fn collect_params(stmts: &[Stmt], params: &mut HashMap<String, Vec<String>>) {
    for stmt in stmts {
        match stmt {
            Stmt::FunctionDef {
                name,
                params: names,
                body,
                ..
            } => {
                params.entry(name.clone()).or_insert_with(|| names.clone());
                collect_params(body, params);
            }
            Stmt::Block(body) | Stmt::Rotate { body, .. } | Stmt::Repeat { body, .. } => {
                collect_params(body, params)
            }
            Stmt::If { arms, otherwise } => {
                for (_, body) in arms {
                    collect_params(body, params);
                }
                if let Some(body) = otherwise {
                    collect_params(body, params);
                }
            }
            _ => (),
        }
    }
}

impl<'a> Codegen<'a> {
    pub fn new(symbol_table: &'a SymbolTable) -> Self {
        Self {
            label_index: 0,
            symbol_table,
            params: HashMap::new(),
            loops: vec![],
            instructions: vec![],
        }
    }

    pub fn generate(mut self, program: &Program) -> Vec<Instruction> {
        collect_params(&program.0, &mut self.params);
        self.gen_block(&program.0);
        log::debug!(
            "generated {} instruction(s), {} label(s)",
            self.instructions.len(),
            self.label_index
        );
        self.instructions
    }

    /// Mints the next `L<n>` label, skipping names taken by user functions.
    fn new_label(&mut self) -> String {
        loop {
            self.label_index += 1;
            let label = format!("L{}", self.label_index);
            if !self.symbol_table.is_function(&label) {
                return label;
            }
        }
    }

    fn is_decimal_variable(&self, name: &str) -> bool {
        self.symbol_table.get(name).is_some_and(|s| {
            s.kind == SymbolKind::Variable && s.declared_type == DeclaredType::Data(DataType::Decimal)
        })
    }

    /// Stores `src` into a variable, keeping `decimal` variables decimal at runtime.
    fn gen_move(&mut self, name: &str, src: Operand) {
        let dest = Operand::Variable(name.to_string());
        if !self.is_decimal_variable(name) {
            self.emit(Instruction::Move { dest, src });
            return;
        }

        let widen = match &src {
            Operand::Number(n) if is_integer_literal(n) => {
                self.emit(Instruction::Move {
                    dest,
                    src: Operand::Number(format!("{n}.0")),
                });
                return;
            }
            Operand::Variable(v) => !self.is_decimal_variable(v),
            Operand::Register(_) => true,
            Operand::Number(_) | Operand::Text(_) => false,
        };
        self.emit(Instruction::Move {
            dest: dest.clone(),
            src,
        });
        if widen {
            self.emit(Instruction::Arith {
                op: ArithOp::Add,
                dest,
                src: Operand::Number("0.0".to_string()),
            });
        }
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn gen_block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.gen_stmt(stmt);
        }
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration { ty, name, init } => match init {
                Some(expr) if !expr.0.is_empty() => self.gen_assign(name, expr),
                _ => self.emit(Instruction::Move {
                    dest: Operand::Variable(name.clone()),
                    src: zero_value(*ty),
                }),
            },
            Stmt::Assignment { name, value } => self.gen_assign(name, value),
            Stmt::Block(stmts) => self.gen_block(stmts),
            Stmt::If { arms, otherwise } => self.gen_if(arms, otherwise.as_deref()),
            Stmt::Repeat {
                init,
                condition,
                progression,
                body,
            } => {
                self.gen_stmt(init);
                let counter = match init.as_ref() {
                    Stmt::Declaration { name, .. } | Stmt::Assignment { name, .. } => {
                        Some(name.as_str())
                    }
                    _ => None,
                };
                self.gen_loop(condition, body, |g| {
                    if let Some(p) = progression {
                        g.gen_progression(p, counter);
                    }
                });
            }
            Stmt::Rotate { condition, body } => self.gen_loop(condition, body, |_| ()),
            Stmt::FunctionDef { name, body, .. } => {
                let after = self.new_label();
                self.emit(Instruction::Jump(after.clone()));
                self.emit(Instruction::Label(name.clone()));

                let outer = std::mem::take(&mut self.loops);
                self.gen_block(body);
                self.loops = outer;

                self.emit(Instruction::Return);
                self.emit(Instruction::Label(after));
            }
            Stmt::Call(call) => self.gen_call(call),
            Stmt::LoopControl(control) => {
                let Some(labels) = self.loops.last() else {
                    log::warn!("{control:?} outside of a loop is ignored");
                    return;
                };
                let target = match control {
                    LoopControl::Stop => labels.end.clone(),
                    LoopControl::Resume => labels.resume.clone(),
                };
                self.emit(Instruction::Jump(target));
            }
        }
    }

    fn gen_if(&mut self, arms: &[(Condition, Vec<Stmt>)], otherwise: Option<&[Stmt]>) {
        let end = self.new_label();
        for (condition, body) in arms {
            let then = self.new_label();
            let next = self.new_label();
            self.gen_condition(condition, &then);
            self.emit(Instruction::Jump(next.clone()));
            self.emit(Instruction::Label(then));
            self.gen_block(body);
            self.emit(Instruction::Jump(end.clone()));
            self.emit(Instruction::Label(next));
        }
        if let Some(body) = otherwise {
            self.gen_block(body);
        }
        self.emit(Instruction::Label(end));
    }

    /// test: CMP; Jcc body; JMP end; body: ...; step: ...; JMP test; end:
    fn gen_loop<F>(&mut self, condition: &Condition, body: &[Stmt], step: F)
    where
        F: FnOnce(&mut Self),
    {
        let test = self.new_label();
        let body_label = self.new_label();
        let step_label = self.new_label();
        let end = self.new_label();

        self.emit(Instruction::Label(test.clone()));
        self.gen_condition(condition, &body_label);
        self.emit(Instruction::Jump(end.clone()));
        self.emit(Instruction::Label(body_label));

        self.loops.push(LoopLabels {
            resume: step_label.clone(),
            end: end.clone(),
        });
        self.gen_block(body);
        self.loops.pop();

        self.emit(Instruction::Label(step_label));
        step(self);
        self.emit(Instruction::Jump(test));
        self.emit(Instruction::Label(end));
    }

    fn gen_progression(&mut self, progression: &Progression, counter: Option<&str>) {
        let Some(target) = progression.target.as_deref().or(counter) else {
            log::warn!("loop progression without a target variable is ignored");
            return;
        };
        let Some(op) = ArithOp::from_operator(&progression.operator) else {
            log::warn!("unsupported progression operator '{}'", progression.operator);
            return;
        };
        let src = progression
            .operand
            .as_ref()
            .map_or_else(|| Operand::Number("1".to_string()), encode_atom);
        self.emit(Instruction::Arith {
            op,
            dest: Operand::Variable(target.to_string()),
            src,
        });
    }

    fn gen_condition(&mut self, condition: &Condition, target: &str) {
        let left = self.gen_operand(&condition.left);
        let right = self.gen_operand(&condition.right);
        let Some(op) = ComparisonOp::from_operator(&condition.operator) else {
            log::warn!("'{}' is not a comparison", condition.operator);
            return;
        };
        self.emit(Instruction::Compare { left, right });
        self.emit(Instruction::JumpIf {
            condition: op,
            label: target.to_string(),
        });
    }

    /// Calls yield no value, so a call used as an operand reads as `0`.
    fn gen_operand(&mut self, operand: &parser::Operand) -> Operand {
        match operand {
            parser::Operand::Atom(atom) => encode_atom(atom),
            parser::Operand::Call(call) => {
                self.gen_call(call);
                Operand::Number("0".to_string())
            }
        }
    }

    fn gen_assign(&mut self, name: &str, expr: &Expr) {
        if let Some(atom) = expr.as_single_atom() {
            self.gen_move(name, encode_atom(atom));
            return;
        }
        if expr.0.is_empty() {
            return;
        }
        self.gen_expr(expr);
        self.gen_move(name, accumulator());
    }

    /// Left to right, no precedence. The result ends up in the accumulator.
    fn gen_expr(&mut self, expr: &Expr) {
        let mut started = false;
        let mut pending: Option<&str> = None;

        for item in &expr.0 {
            match item {
                ExprItem::Call(call) => self.gen_call(call),
                ExprItem::Operator(op) if op == "++" || op == "--" => (),
                ExprItem::Operator(op) => pending = Some(op.as_str()),
                ExprItem::Atom(atom) => {
                    let src = encode_atom(atom);
                    match (started, pending.take()) {
                        (false, Some("-")) => {
                            self.emit(Instruction::Move {
                                dest: accumulator(),
                                src: Operand::Number("0".to_string()),
                            });
                            self.gen_binary("-", src);
                        }
                        (true, Some(op)) => self.gen_binary(op, src),
                        _ => self.emit(Instruction::Move {
                            dest: accumulator(),
                            src,
                        }),
                    }
                    started = true;
                }
            }
        }

        if !started {
            self.emit(Instruction::Move {
                dest: accumulator(),
                src: Operand::Number("0".to_string()),
            });
        }
    }

    fn gen_binary(&mut self, op: &str, src: Operand) {
        if let Some(op) = ArithOp::from_operator(op) {
            self.emit(Instruction::Arith {
                op,
                dest: accumulator(),
                src,
            });
            return;
        }
        let Some(condition) = ComparisonOp::from_operator(op) else {
            log::warn!("unsupported operator '{op}' in expression");
            return;
        };

        let done = self.new_label();
        self.emit(Instruction::Compare {
            left: accumulator(),
            right: src,
        });
        self.emit(Instruction::Move {
            dest: accumulator(),
            src: Operand::Number("1".to_string()),
        });
        self.emit(Instruction::JumpIf {
            condition,
            label: done.clone(),
        });
        self.emit(Instruction::Move {
            dest: accumulator(),
            src: Operand::Number("0".to_string()),
        });
        self.emit(Instruction::Label(done));
    }

    fn gen_call(&mut self, call: &FunctionCall) {
        let mut args = vec![];
        for arg in &call.args {
            match arg {
                Argument::Value(atom) => args.push(encode_atom(atom)),
                Argument::Param { name, .. } => args.push(Operand::Variable(name.clone())),
                Argument::Call(inner) => self.gen_call(inner),
            }
        }

        if !is_builtin(&call.name) && self.symbol_table.is_function(&call.name) {
            let params = self.params.get(&call.name).cloned().unwrap_or_default();
            for (param, arg) in params.iter().zip(&args) {
                self.gen_move(param, arg.clone());
            }
        }

        self.emit(Instruction::Call {
            name: call.name.clone(),
            args,
        });
    }
}

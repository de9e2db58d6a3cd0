use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;

use crate::codegen::{Instruction, Operand, GET_INPUT, SHOW_OUT};
use crate::error::RuntimeError;

use super::{read, Value};

pub const DEFAULT_MAX_STEPS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Upper bound on executed instructions.
    pub max_steps: usize,
    /// Lines handed to `getInput`, in order.
    pub input: Vec<String>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            input: vec![],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Out,
    In,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    pub kind: OutputKind,
    pub payload: String,
}

impl fmt::Display for OutputEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OutputKind::Out => write!(f, "out: {}", self.payload),
            OutputKind::In => write!(f, "in: {}", self.payload),
        }
    }
}

/// Final state of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub variables: BTreeMap<String, Value>,
    pub output: Vec<OutputEntry>,
}

impl Execution {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Payloads printed by `showOut`, in order.
    pub fn printed(&self) -> Vec<&str> {
        self.output
            .iter()
            .filter(|e| e.kind == OutputKind::Out)
            .map(|e| e.payload.as_str())
            .collect()
    }
}

pub struct Interpreter {
    instructions: Vec<Instruction>,
    labels: HashMap<String, usize>,
    variables: BTreeMap<String, Value>,
    registers: HashMap<String, Value>,
    comparison: Option<Ordering>,
    call_stack: Vec<usize>,
    input: VecDeque<String>,
    output: Vec<OutputEntry>,
    pc: usize,
    steps: usize,
    max_steps: usize,
}

impl Interpreter {
    pub fn new(instructions: Vec<Instruction>, options: &ExecOptions) -> Self {
        let mut labels = HashMap::new();
        for (i, instruction) in instructions.iter().enumerate() {
            if let Instruction::Label(name) = instruction {
                labels.entry(name.clone()).or_insert(i);
            }
        }

        Self {
            instructions,
            labels,
            variables: BTreeMap::new(),
            registers: HashMap::new(),
            comparison: None,
            call_stack: vec![],
            input: options.input.iter().cloned().collect(),
            output: vec![],
            pc: 0,
            steps: 0,
            max_steps: options.max_steps,
        }
    }

    pub fn from_text(text: &str, options: &ExecOptions) -> Result<Self, RuntimeError> {
        Ok(Self::new(read(text)?, options))
    }

    pub fn run(mut self) -> Result<Execution, RuntimeError> {
        while self.pc < self.instructions.len() {
            if self.steps >= self.max_steps {
                return Err(RuntimeError::StepBudgetExceeded(self.max_steps));
            }
            self.steps += 1;
            self.step()?;
        }

        log::debug!("execution finished after {} step(s)", self.steps);
        Ok(Execution {
            variables: self.variables,
            output: self.output,
        })
    }

    fn step(&mut self) -> Result<(), RuntimeError> {
        let instruction = self.instructions[self.pc].clone();
        log::trace!("{:>4}: {instruction}", self.pc);
        self.pc += 1;

        match instruction {
            Instruction::Label(_) => (),
            Instruction::Move { dest, src } => {
                let value = self.resolve(&src)?;
                self.store(&dest, value)?;
            }
            Instruction::Compare { left, right } => {
                let left = self.resolve(&left)?;
                let right = self.resolve(&right)?;
                self.comparison = Some(left.compare(&right)?);
            }
            Instruction::JumpIf { condition, label } => {
                let ordering = self
                    .comparison
                    .take()
                    .ok_or_else(|| RuntimeError::MissingComparison(label.clone()))?;
                if condition.compare(ordering) {
                    self.jump(&label)?;
                }
            }
            Instruction::Jump(label) => self.jump(&label)?,
            Instruction::Arith { op, dest, src } => {
                let left = self.resolve(&dest)?;
                let right = self.resolve(&src)?;
                self.store(&dest, left.apply(op, &right)?)?;
            }
            Instruction::Call { name, args } => self.call(&name, &args)?,
            Instruction::Return => {
                self.pc = self.call_stack.pop().ok_or(RuntimeError::ReturnOutsideCall)?;
            }
        }
        Ok(())
    }

    fn jump(&mut self, label: &str) -> Result<(), RuntimeError> {
        self.pc = *self
            .labels
            .get(label)
            .ok_or_else(|| RuntimeError::UnknownLabel(label.to_string()))?;
        Ok(())
    }

    fn call(&mut self, name: &str, args: &[Operand]) -> Result<(), RuntimeError> {
        match name {
            SHOW_OUT => {
                let values = args
                    .iter()
                    .map(|arg| self.resolve(arg).map(|v| v.to_string()))
                    .collect::<Result<Vec<_>, _>>()?;
                let payload = values.join(" ");
                log::debug!("showOut: {payload}");
                self.output.push(OutputEntry {
                    kind: OutputKind::Out,
                    payload,
                });
            }
            GET_INPUT => {
                for arg in args {
                    let line = self
                        .input
                        .pop_front()
                        .ok_or_else(|| RuntimeError::InputExhausted(arg.to_string()))?;
                    self.store(arg, Value::from_input(&line))?;
                    self.output.push(OutputEntry {
                        kind: OutputKind::In,
                        payload: line,
                    });
                }
            }
            _ => {
                let target = *self
                    .labels
                    .get(name)
                    .ok_or_else(|| RuntimeError::UnknownLabel(name.to_string()))?;
                self.call_stack.push(self.pc);
                self.pc = target;
            }
        }
        Ok(())
    }

    fn resolve(&self, operand: &Operand) -> Result<Value, RuntimeError> {
        let unresolved = || RuntimeError::UnresolvedOperand(operand.to_string());
        match operand {
            Operand::Number(s) => Value::parse_number(s).ok_or_else(unresolved),
            Operand::Text(s) => {
                let inner = s.get(1..s.len().saturating_sub(1)).ok_or_else(unresolved)?;
                Ok(Value::Text(inner.to_string()))
            }
            Operand::Variable(name) => self.variables.get(name).cloned().ok_or_else(unresolved),
            Operand::Register(name) => self.registers.get(name).cloned().ok_or_else(unresolved),
        }
    }

    fn store(&mut self, operand: &Operand, value: Value) -> Result<(), RuntimeError> {
        match operand {
            Operand::Variable(name) => {
                self.variables.insert(name.clone(), value);
            }
            Operand::Register(name) => {
                self.registers.insert(name.clone(), value);
            }
            Operand::Number(_) | Operand::Text(_) => {
                return Err(RuntimeError::UnresolvedOperand(operand.to_string()))
            }
        }
        Ok(())
    }
}

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::codegen::{ArithOp, ComparisonOp, Instruction, Operand};
use crate::error::RuntimeError;

#[derive(Parser)]
#[grammar = "interpreter/asm.pest"]
pub struct AsmParser;

/// Reads instruction text back into instructions.
pub fn read(text: &str) -> Result<Vec<Instruction>, RuntimeError> {
    let mut pairs = AsmParser::parse(Rule::program, text).map_err(Box::new)?;
    let Some(program) = pairs.next() else {
        return Ok(vec![]);
    };

    program
        .into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(instruction_from_pair)
        .collect()
}

fn next_pair<'i>(inner: &mut Pairs<'i, Rule>, text: &str) -> Result<Pair<'i, Rule>, RuntimeError> {
    inner
        .next()
        .ok_or_else(|| RuntimeError::Malformed(text.to_string()))
}

fn operand_from_pair(pair: Pair<Rule>) -> Result<Operand, RuntimeError> {
    let s = pair.as_str().to_string();
    match pair.as_rule() {
        Rule::register => Ok(Operand::Register(s)),
        Rule::identifier => Ok(Operand::Variable(s)),
        Rule::number => Ok(Operand::Number(s)),
        Rule::string => Ok(Operand::Text(s)),
        _ => Err(RuntimeError::Malformed(s)),
    }
}

fn instruction_from_pair(pair: Pair<Rule>) -> Result<Instruction, RuntimeError> {
    let text = pair.as_str().trim().to_string();
    let rule = pair.as_rule();
    let mut inner = pair.into_inner();
    let mut next = || next_pair(&mut inner, &text);

    let instruction = match rule {
        Rule::label => Instruction::Label(next()?.as_str().to_string()),
        Rule::mov => Instruction::Move {
            dest: operand_from_pair(next()?)?,
            src: operand_from_pair(next()?)?,
        },
        Rule::cmp => Instruction::Compare {
            left: operand_from_pair(next()?)?,
            right: operand_from_pair(next()?)?,
        },
        Rule::jmp => Instruction::Jump(next()?.as_str().to_string()),
        Rule::jump_if => {
            let condition = ComparisonOp::from_mnemonic(next()?.as_str())
                .ok_or_else(|| RuntimeError::Malformed(text.clone()))?;
            Instruction::JumpIf {
                condition,
                label: next()?.as_str().to_string(),
            }
        }
        Rule::call => {
            let name = next()?.as_str().to_string();
            let args = inner.map(operand_from_pair).collect::<Result<_, _>>()?;
            Instruction::Call { name, args }
        }
        Rule::arith => {
            let op = ArithOp::from_mnemonic(next()?.as_str())
                .ok_or_else(|| RuntimeError::Malformed(text.clone()))?;
            Instruction::Arith {
                op,
                dest: operand_from_pair(next()?)?,
                src: operand_from_pair(next()?)?,
            }
        }
        Rule::ret => Instruction::Return,
        _ => return Err(RuntimeError::Malformed(text)),
    };
    Ok(instruction)
}

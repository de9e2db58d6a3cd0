use apcc::codegen::{ArithOp, ComparisonOp, Instruction, Operand};
use apcc::{build_symbol_table, generate, tokenize};

fn asm(input: &str) -> Vec<String> {
    let (tokens, errors) = tokenize(input);
    assert!(errors.is_empty());
    let symbol_table = build_symbol_table(&tokens);
    generate(&symbol_table, &tokens)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn instruction_text() {
    let mov = Instruction::Move {
        dest: Operand::Variable("x".to_string()),
        src: Operand::Number("5".to_string()),
    };
    assert_eq!(mov.to_string(), "MOV x, 5");
    let jump = Instruction::JumpIf {
        condition: ComparisonOp::Le,
        label: "L3".to_string(),
    };
    assert_eq!(jump.to_string(), "JLE L3");
    let call = Instruction::Call {
        name: "showOut".to_string(),
        args: vec![
            Operand::Text("\"n\"".to_string()),
            Operand::Variable("n".to_string()),
        ],
    };
    assert_eq!(call.to_string(), "CALL showOut \"n\", n");
    let add = Instruction::Arith {
        op: ArithOp::Add,
        dest: Operand::Register("%acc".to_string()),
        src: Operand::Number("1".to_string()),
    };
    assert_eq!(add.to_string(), "ADD %acc, 1");
    assert_eq!(Instruction::Label("L1".to_string()).to_string(), "L1:");
}

#[test]
fn simple_moves() {
    assert_eq!(asm("integer x = 5!"), vec!["MOV x, 5"]);
    assert_eq!(
        asm("flag f = yes!\nflag g = no!\nline s = \"hi\"!\nsingle c = 'c'!"),
        vec!["MOV f, 1", "MOV g, 0", "MOV s, \"hi\"", "MOV c, 'c'"]
    );
    assert_eq!(
        asm("integer i!\ndecimal d!\nline s!"),
        vec!["MOV i, 0", "MOV d, 0.0", "MOV s, \"\""]
    );
}

#[test]
fn expressions_use_the_accumulator() {
    assert_eq!(
        asm("integer a = 1! integer b = 2! a = a + b * 3!"),
        vec![
            "MOV a, 1",
            "MOV b, 2",
            "MOV %acc, a",
            "ADD %acc, b",
            "MUL %acc, 3",
            "MOV a, %acc",
        ]
    );
}

#[test]
fn comparisons_in_expressions_yield_flags() {
    assert_eq!(
        asm("flag f! f = 3 > 2!"),
        vec![
            "MOV f, 0",
            "MOV %acc, 3",
            "CMP %acc, 2",
            "MOV %acc, 1",
            "JG L1",
            "MOV %acc, 0",
            "L1:",
            "MOV f, %acc",
        ]
    );
}

#[test]
fn conditional_chain_layout() {
    assert_eq!(
        asm("integer x = 1!\niff (x == 1) { x = 2! }\nthen { x = 3! }"),
        vec![
            "MOV x, 1",
            "CMP x, 1",
            "JE L2",
            "JMP L3",
            "L2:",
            "MOV x, 2",
            "JMP L1",
            "L3:",
            "MOV x, 3",
            "L1:",
        ]
    );
}

#[test]
fn loops_jump_back_to_their_test() {
    assert_eq!(
        asm("repeat (integer i = 0! i < 3! i++) { stop! resume! }"),
        vec![
            "MOV i, 0",
            "L1:",
            "CMP i, 3",
            "JL L2",
            "JMP L4",
            "L2:",
            "JMP L4",
            "JMP L3",
            "L3:",
            "ADD i, 1",
            "JMP L1",
            "L4:",
        ]
    );
}

#[test]
fn functions_are_skipped_until_called() {
    assert_eq!(
        asm("blank show(integer n) { showOut(n)! }\nshow(4)!"),
        vec![
            "JMP L1",
            "show:",
            "CALL showOut n",
            "RET",
            "L1:",
            "MOV n, 4",
            "CALL show 4",
        ]
    );
}

#[test]
fn loop_control_outside_loops_is_dropped() {
    assert_eq!(asm("stop!"), Vec::<String>::new());
}

#[test]
fn labels_are_never_reused() {
    let lines = asm("integer x = 0!\niff (x == 0) { }\niff (x == 1) { }\nrotate (x < 1) { x = 1! }");
    let mut labels: Vec<_> = lines.iter().filter(|l| l.ends_with(':')).collect();
    let count = labels.len();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), count);
    assert_eq!(count, 10);
}

#[test]
fn generated_labels_skip_function_names() {
    assert_eq!(
        asm("integer L1(integer a) { showOut(a)! }\nL1(3)!"),
        vec![
            "JMP L2",
            "L1:",
            "CALL showOut a",
            "RET",
            "L2:",
            "MOV a, 3",
            "CALL L1 3",
        ]
    );
}

#[test]
fn decimal_variables_stay_decimal() {
    assert_eq!(
        asm("decimal d = 5!\ninteger n = 2!\nd = n!\nd = n * 2!"),
        vec![
            "MOV d, 5.0",
            "MOV n, 2",
            "MOV d, n",
            "ADD d, 0.0",
            "MOV %acc, n",
            "MUL %acc, 2",
            "MOV d, %acc",
            "ADD d, 0.0",
        ]
    );
}

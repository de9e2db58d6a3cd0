use apcc::error::RuntimeError;
use apcc::interpreter::{read, ExecOptions, OutputKind, Value};
use apcc::{execute, execute_with};

#[test]
fn moves_and_arithmetic() {
    let run = execute("MOV x, 5\nMOV y, 2.5\nMOV %acc, x\nADD %acc, y\nMOV z, %acc\nSUB x, 1").unwrap();
    assert_eq!(run.get("x"), Some(&Value::Integer(4)));
    assert_eq!(run.get("z"), Some(&Value::Decimal(7.5)));
    assert_eq!(run.get("%acc"), None);
}

#[test]
fn integer_division_truncates() {
    let run = execute("MOV a, 7\nDIV a, 2\nMOV b, 7\nMOD b, 4\nMOV c, -7\nDIV c, 2").unwrap();
    assert_eq!(run.get("a"), Some(&Value::Integer(3)));
    assert_eq!(run.get("b"), Some(&Value::Integer(3)));
    assert_eq!(run.get("c"), Some(&Value::Integer(-3)));
}

#[test]
fn text_values() {
    let run = execute("MOV s, \"ab\"\nADD s, \"cd\"\nMOV c, 'x'").unwrap();
    assert_eq!(run.get("s"), Some(&Value::Text("abcd".to_string())));
    assert_eq!(run.get("c"), Some(&Value::Text("x".to_string())));
}

#[test]
fn conditional_jumps() {
    let text = "\
MOV x, 3
CMP x, 5
JL small
MOV r, \"big\"
JMP done
small:
MOV r, \"small\"
done:";
    let run = execute(text).unwrap();
    assert_eq!(run.get("r"), Some(&Value::Text("small".to_string())));
}

#[test]
fn calls_return_to_the_caller() {
    let text = "\
JMP main
double:
MUL n, 2
RET
main:
MOV n, 4
CALL double
CALL showOut \"n =\", n";
    let run = execute(text).unwrap();
    assert_eq!(run.get("n"), Some(&Value::Integer(8)));
    assert_eq!(run.printed(), vec!["n = 8"]);
}

#[test]
fn input_feeds_get_input() {
    let options = ExecOptions {
        input: vec!["42".to_string(), "hello".to_string()],
        ..ExecOptions::default()
    };
    let run = execute_with("MOV a, 0\nMOV b, 0\nCALL getInput a, b", &options).unwrap();
    assert_eq!(run.get("a"), Some(&Value::Integer(42)));
    assert_eq!(run.get("b"), Some(&Value::Text("hello".to_string())));
    assert_eq!(run.output.len(), 2);
    assert!(run.output.iter().all(|e| e.kind == OutputKind::In));

    let err = execute("CALL getInput a").unwrap_err();
    assert!(matches!(err, RuntimeError::InputExhausted(_)));
}

#[test]
fn faults() {
    assert!(matches!(
        execute("JMP nowhere").unwrap_err(),
        RuntimeError::UnknownLabel(l) if l == "nowhere"
    ));
    assert!(matches!(
        execute("MOV x, y").unwrap_err(),
        RuntimeError::UnresolvedOperand(o) if o == "y"
    ));
    assert!(matches!(
        execute("MOV x, 1\nDIV x, 0").unwrap_err(),
        RuntimeError::DivisionByZero
    ));
    assert!(matches!(
        execute("RET").unwrap_err(),
        RuntimeError::ReturnOutsideCall
    ));
    assert!(matches!(
        execute("L1:\nJE L1").unwrap_err(),
        RuntimeError::MissingComparison(_)
    ));
    assert!(matches!(
        execute("CMP \"a\", 1").unwrap_err(),
        RuntimeError::Incomparable(..)
    ));
    assert!(matches!(
        execute("MOV x, \"a\"\nSUB x, 1").unwrap_err(),
        RuntimeError::TypeMismatch(..)
    ));
    assert!(matches!(
        execute("FLY x").unwrap_err(),
        RuntimeError::Parse(_)
    ));
}

#[test]
fn step_budget_stops_endless_loops() {
    let options = ExecOptions {
        max_steps: 50,
        ..ExecOptions::default()
    };
    let err = execute_with("top:\nJMP top", &options).unwrap_err();
    assert!(matches!(err, RuntimeError::StepBudgetExceeded(50)));
}

#[test]
fn reader_accepts_blank_lines_and_comments() {
    let instructions = read("\nMOV x, 1 ; set x\n\nL1:\n  CMP x, 1\n").unwrap();
    assert_eq!(instructions.len(), 3);
    assert_eq!(instructions[2].to_string(), "CMP x, 1");
}

#[test]
fn empty_text_runs_nothing() {
    let run = execute("").unwrap();
    assert!(run.variables.is_empty());
    assert!(run.output.is_empty());
}

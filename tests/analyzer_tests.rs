use apcc::analyzer::{SemanticAnalyzer, SymbolKind, SymbolTable};
use apcc::error::SemanticError;
use apcc::lexer::{DataType, DeclaredType, Lexer};

fn symbols(input: &str) -> SymbolTable {
    SymbolTable::build(&Lexer::tokenize(input).0)
}

fn semantic_errors(input: &str) -> Vec<SemanticError> {
    let (tokens, _) = Lexer::tokenize(input);
    let symbol_table = SymbolTable::build(&tokens);
    SemanticAnalyzer::new(&symbol_table, &tokens).analyze()
}

#[test]
fn declarations_record_type_and_value() {
    let table = symbols("integer x = 5!\nline s = \"hi\"!\nflag f = yes!\ndecimal d!");

    let x = table.get("x").unwrap();
    assert_eq!(x.kind, SymbolKind::Variable);
    assert_eq!(x.declared_type, DeclaredType::Data(DataType::Integer));
    assert_eq!(x.value.as_deref(), Some("5"));
    assert_eq!(x.line, 1);

    assert_eq!(table.get("s").unwrap().value.as_deref(), Some("\"hi\""));
    assert_eq!(table.get("f").unwrap().value.as_deref(), Some("yes"));
    assert_eq!(table.get("d").unwrap().value, None);
    assert_eq!(table.len(), 4);
}

#[test]
fn entries_keep_declaration_order() {
    let table = symbols("integer b = 1! integer a = 2! blank f() { }");
    let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["b", "a", "f"]);
    assert!(table.is_function("f"));
    assert!(!table.is_function("a"));
}

#[test]
fn initializer_stops_at_statement_end() {
    let table = symbols("integer x! 7!");
    assert_eq!(table.get("x").unwrap().value, None);
}

#[test]
fn first_declaration_wins_but_value_is_refreshed() {
    let table = symbols("integer x = 1!\ndecimal x = 2!");
    let x = table.get("x").unwrap();
    assert_eq!(x.declared_type, DeclaredType::Data(DataType::Integer));
    assert_eq!(x.line, 1);
    assert_eq!(x.value.as_deref(), Some("2"));
}

#[test]
fn functions_and_parameters() {
    let table = symbols("integer twice(integer n) { n = n * 2! }");
    let f = table.get("twice").unwrap();
    assert_eq!(f.kind, SymbolKind::Function);
    assert_eq!(f.declared_type, DeclaredType::Data(DataType::Integer));
    assert_eq!(f.value, None);
    assert_eq!(table.get("n").unwrap().kind, SymbolKind::Variable);
}

#[test]
fn undeclared_variable_is_reported_once_per_use() {
    assert_eq!(
        semantic_errors("y = 3!"),
        vec![SemanticError::UndeclaredVariable {
            name: "y".to_string(),
            line: 1
        }]
    );
    let errors = semantic_errors("integer a = 1!\nb = a!\na = b!");
    assert_eq!(
        errors,
        vec![
            SemanticError::UndeclaredVariable {
                name: "b".to_string(),
                line: 2
            },
            SemanticError::UndeclaredVariable {
                name: "b".to_string(),
                line: 3
            },
        ]
    );
}

#[test]
fn mixed_numeric_operands_are_compatible() {
    let errors = semantic_errors("integer a = 2! decimal b = 1.5! c = a + b!");
    assert_eq!(
        errors,
        vec![SemanticError::UndeclaredVariable {
            name: "c".to_string(),
            line: 1
        }]
    );
}

#[test]
fn builtins_need_no_definition() {
    assert!(semantic_errors("integer a = 1! showOut(a)! getInput(a)!").is_empty());
    assert_eq!(
        semantic_errors("launch()!"),
        vec![SemanticError::UndefinedFunction {
            name: "launch".to_string(),
            line: 1
        }]
    );
}

#[test]
fn declaration_values_must_match_type() {
    let errors = semantic_errors(
        "integer i = 1.5!\ndecimal d = 2!\nline l = 'c'!\nflag f = 1!\nsingle s = 'ab'!\nsingle t = 'z'!",
    );
    let names: Vec<_> = errors
        .iter()
        .map(|e| match e {
            SemanticError::DeclarationTypeMismatch { name, .. } => name.as_str(),
            other => panic!("unexpected error {other}"),
        })
        .collect();
    assert_eq!(names, vec!["i", "l", "f", "s"]);
}

#[test]
fn operator_checks() {
    assert_eq!(
        semantic_errors("line a = \"x\"! integer b = 2! integer c = 0! c = a - b!"),
        vec![SemanticError::NonNumericOperation {
            operator: "-".to_string(),
            line: 1
        }]
    );
    assert_eq!(
        semantic_errors("line a = \"x\"! flag b = yes! flag c! c = a == b!"),
        vec![SemanticError::ExpressionTypeMismatch { line: 1 }]
    );
    assert_eq!(
        semantic_errors("line a = \"x\"! line b = a + \"y\"!"),
        vec![]
    );
    assert_eq!(
        semantic_errors("+ 1"),
        vec![SemanticError::MissingOperand {
            operator: "+".to_string(),
            line: 1
        }]
    );
}

#[test]
fn operand_without_type() {
    let errors = semantic_errors("integer a = 1! a = a + ( 2!");
    assert_eq!(
        errors,
        vec![SemanticError::UndefinedType {
            operator: "+".to_string(),
            line: 1
        }]
    );
}

#[test]
fn block_locals_do_not_leak() {
    let errors = semantic_errors("{ integer inner = 1! }\ninner = 2!");
    assert_eq!(
        errors,
        vec![SemanticError::OutOfScope {
            name: "inner".to_string(),
            line: 2
        }]
    );
}

#[test]
fn header_declarations_belong_to_the_block() {
    let source = "\
integer total = 0!
repeat (integer i = 0! i < 3! i++) {
    total = total + i!
}
blank show(integer n) { showOut(n)! }
show(total)!";
    assert!(semantic_errors(source).is_empty());

    let errors = semantic_errors("blank f(integer n) { }\ninteger m = 0!\nm = n!");
    assert_eq!(
        errors,
        vec![SemanticError::OutOfScope {
            name: "n".to_string(),
            line: 3
        }]
    );
}

#[test]
fn builtins_cannot_be_redefined() {
    assert_eq!(
        semantic_errors("blank showOut(line s) { }\nshowOut(\"hi\")!"),
        vec![SemanticError::BuiltinRedefinition {
            name: "showOut".to_string(),
            line: 1
        }]
    );
}

use apcc::error::{Found, SyntaxError};
use apcc::lexer::{DataType, Lexer, TokenKind};
use apcc::parser::*;

fn parse(input: &str) -> (Program, Vec<SyntaxError>) {
    let (tokens, errors) = Lexer::tokenize(input);
    assert!(errors.is_empty(), "lexical errors: {errors:?}");
    Parser::new(&tokens).parse()
}

fn parse_ok(input: &str) -> Vec<Stmt> {
    let (program, errors) = parse(input);
    assert!(errors.is_empty(), "syntax errors: {errors:?}");
    program.0
}

fn var(name: &str) -> Atom {
    Atom::Variable(name.to_string())
}

fn lit(value: &str) -> Atom {
    Atom::Literal(value.to_string())
}

#[test]
fn declarations_and_assignments() {
    let stmts = parse_ok("integer x = 5!\nline s!\nx = x + 1!");
    assert_eq!(
        stmts,
        vec![
            Stmt::Declaration {
                ty: DataType::Integer,
                name: "x".to_string(),
                init: Some(Expr(vec![ExprItem::Atom(lit("5"))])),
            },
            Stmt::Declaration {
                ty: DataType::Line,
                name: "s".to_string(),
                init: None,
            },
            Stmt::Assignment {
                name: "x".to_string(),
                value: Expr(vec![
                    ExprItem::Atom(var("x")),
                    ExprItem::Operator("+".to_string()),
                    ExprItem::Atom(lit("1")),
                ]),
            },
        ]
    );
}

#[test]
fn conditional_chain_is_one_statement() {
    let stmts = parse_ok(
        "integer x = 1!\niff (x > 5) { x = 0! }\notherwise x > 2 { x = 1! }\nthen { x = 2! }",
    );
    assert_eq!(stmts.len(), 2);
    let Stmt::If { arms, otherwise } = &stmts[1] else {
        panic!("expected a conditional, got {:?}", stmts[1]);
    };
    assert_eq!(arms.len(), 2);
    assert_eq!(
        arms[0].0,
        Condition {
            left: Operand::Atom(var("x")),
            operator: ">".to_string(),
            right: Operand::Atom(lit("5")),
        }
    );
    assert_eq!(otherwise.as_ref().map(Vec::len), Some(1));
}

#[test]
fn separate_iff_statements_are_not_chained() {
    let stmts = parse_ok("integer x = 1! iff (x > 5) { } iff (x < 5) { } then { }");
    assert_eq!(stmts.len(), 3);
    let Stmt::If { arms, otherwise } = &stmts[2] else {
        panic!();
    };
    assert_eq!(arms.len(), 1);
    assert!(otherwise.is_some());
}

#[test]
fn repeat_header() {
    let stmts = parse_ok("repeat (integer i = 0! i < 10! i++) { stop! }");
    let Stmt::Repeat {
        init,
        condition,
        progression,
        body,
    } = &stmts[0]
    else {
        panic!();
    };
    assert!(matches!(**init, Stmt::Declaration { ref name, .. } if name == "i"));
    assert_eq!(condition.operator, "<");
    assert_eq!(
        progression,
        &Some(Progression {
            target: Some("i".to_string()),
            operator: "++".to_string(),
            operand: None,
        })
    );
    assert_eq!(body, &vec![Stmt::LoopControl(LoopControl::Stop)]);
}

#[test]
fn progression_forms() {
    let step = |src: &str| {
        let stmts = parse_ok(src);
        match &stmts[0] {
            Stmt::Repeat { progression, .. } => progression.clone(),
            other => panic!("{other:?}"),
        }
    };
    assert_eq!(
        step("repeat (i = 0! i < 10! i + 2) { }"),
        Some(Progression {
            target: Some("i".to_string()),
            operator: "+".to_string(),
            operand: Some(lit("2")),
        })
    );
    assert_eq!(
        step("repeat (i = 0! i < 10! ++i) { }"),
        Some(Progression {
            target: Some("i".to_string()),
            operator: "++".to_string(),
            operand: None,
        })
    );
    assert_eq!(
        step("repeat (i = 0! i < 10! * 3) { }"),
        Some(Progression {
            target: None,
            operator: "*".to_string(),
            operand: Some(lit("3")),
        })
    );
}

#[test]
fn functions_and_calls() {
    let stmts = parse_ok("blank greet(line who, integer times) { showOut(who, times)! }\ngreet(\"Ann\", 2)!");
    assert_eq!(
        stmts[0],
        Stmt::FunctionDef {
            name: "greet".to_string(),
            return_type: apcc::lexer::DeclaredType::Blank,
            params: vec!["who".to_string(), "times".to_string()],
            body: vec![Stmt::Call(FunctionCall {
                name: "showOut".to_string(),
                args: vec![Argument::Value(var("who")), Argument::Value(var("times"))],
                line: 1,
            })],
        }
    );
    assert_eq!(
        stmts[1],
        Stmt::Call(FunctionCall {
            name: "greet".to_string(),
            args: vec![
                Argument::Value(Atom::Constant("\"Ann\"".to_string())),
                Argument::Value(lit("2")),
            ],
            line: 2,
        })
    );
}

#[test]
fn missing_statement_end() {
    let (_, errors) = parse("integer x = 5");
    assert_eq!(
        errors,
        vec![SyntaxError::Expected {
            expected: TokenKind::StatementEnd,
            found: Found::Eof,
            line: 1,
        }]
    );
    assert_eq!(errors[0].to_string(), "expected STATEMENT_END, found EOF at line 1");

    let (_, errors) = parse("integer y");
    assert_eq!(errors.len(), 1);
}

#[test]
fn unterminated_block_reports_innermost_brace_once() {
    let (_, errors) = parse("{ integer z = 1!");
    assert_eq!(errors, vec![SyntaxError::MissingClosingBrace { line: 1 }]);
    assert_eq!(errors[0].to_string(), "missing closing brace at line 1");

    let (_, errors) = parse("{\n  {\n    integer z = 1!\n");
    assert_eq!(errors, vec![SyntaxError::MissingClosingBrace { line: 2 }]);
}

#[test]
fn stray_tokens_are_skipped() {
    let (program, errors) = parse("}\ninteger a = 1!\n5!\na = 2!");
    assert_eq!(
        errors,
        vec![
            SyntaxError::UnmatchedClosingBrace { line: 1 },
            SyntaxError::UnexpectedToken {
                lexeme: "5".to_string(),
                line: 3
            },
            SyntaxError::UnexpectedToken {
                lexeme: "!".to_string(),
                line: 3
            },
        ]
    );
    assert_eq!(program.0.len(), 2);
}

#[test]
fn conditions_need_comparisons() {
    let (_, errors) = parse("integer x = 1! iff (x + 1) { }");
    assert_eq!(
        errors,
        vec![SyntaxError::ExpectedComparison {
            operator: "+".to_string(),
            line: 1
        }]
    );
}

#[test]
fn loop_control_statements() {
    let stmts = parse_ok("rotate (yes == yes) { resume! stop! }");
    let Stmt::Rotate { body, .. } = &stmts[0] else {
        panic!();
    };
    assert_eq!(
        body,
        &vec![
            Stmt::LoopControl(LoopControl::Resume),
            Stmt::LoopControl(LoopControl::Stop),
        ]
    );
}

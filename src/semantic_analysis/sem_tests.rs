use serde_json::Value;

use crate::ast::Ast;
use crate::testutil::*;

fn analyze(ast: &Ast) -> Vec<String> {
    let table = build_table(ast);
    super::analyze(ast, &table)
        .into_iter()
        .map(|r| r.message)
        .collect()
}

fn single_method(rest: Vec<Value>) -> Ast {
    test_class(vec![method("work", typ("int"), rest)])
}

#[test]
fn well_typed_program_has_no_reports() {
    let ast = parse_program(
        vec![import("io")],
        class_decl(
            "Test",
            None,
            vec![
                var_decl("total", typ("int")),
                method(
                    "work",
                    typ("int"),
                    vec![
                        param("xs", array_typ("int")),
                        var_decl("i", typ("int")),
                        assign("i", int_lit(0)),
                        while_stmt(
                            bin("<", ident("i"), length(ident("xs"))),
                            block(vec![
                                assign("total", bin("+", ident("total"), array_access(ident("xs"), ident("i")))),
                                assign("i", bin("+", ident("i"), int_lit(1))),
                            ]),
                        ),
                        expr_stmt(call(ident("io"), "println", vec![ident("total")])),
                        ret_stmt(ident("total")),
                    ],
                ),
            ],
        ),
    );
    assert_eq!(analyze(&ast), Vec::<String>::new());
}

#[test]
fn undeclared_variable_is_reported() {
    let ast = single_method(vec![assign("missing", int_lit(1)), ret_stmt(int_lit(0))]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("'missing' was not declared")));
}

#[test]
fn imports_resolve_as_globals() {
    let ast = parse_program(
        vec![import("io")],
        class_decl(
            "Test",
            None,
            vec![method(
                "work",
                typ("int"),
                vec![
                    expr_stmt(call(ident("io"), "println", vec![int_lit(1)])),
                    ret_stmt(int_lit(0)),
                ],
            )],
        ),
    );
    assert_eq!(analyze(&ast), Vec::<String>::new());
}

#[test]
fn incompatible_assignment_is_reported() {
    let ast = single_method(vec![
        var_decl("i", typ("int")),
        assign("i", tru()),
        ret_stmt(int_lit(0)),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("cannot assign")));
}

#[test]
fn arithmetic_needs_int_operands() {
    let ast = single_method(vec![
        var_decl("i", typ("int")),
        assign("i", bin("+", int_lit(1), tru())),
        ret_stmt(int_lit(0)),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("operator '+'")));
}

#[test]
fn and_needs_boolean_operands() {
    let ast = single_method(vec![
        var_decl("b", typ("boolean")),
        assign("b", bin("&&", tru(), int_lit(1))),
        ret_stmt(int_lit(0)),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("operator '&&'")));
}

#[test]
fn external_call_operand_is_rejected() {
    let ast = parse_program(
        vec![import("io")],
        class_decl(
            "Test",
            None,
            vec![method(
                "work",
                typ("int"),
                vec![
                    var_decl("i", typ("int")),
                    assign("i", bin("+", int_lit(1), call(ident("io"), "read", vec![]))),
                    ret_stmt(int_lit(0)),
                ],
            )],
        ),
    );
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("external class")));
}

#[test]
fn condition_must_be_boolean() {
    let ast = single_method(vec![
        if_stmt(int_lit(1), block(vec![]), block(vec![])),
        ret_stmt(int_lit(0)),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("condition must be 'boolean'")));
}

#[test]
fn indexing_a_non_array_is_reported() {
    let ast = single_method(vec![
        var_decl("i", typ("int")),
        assign("i", array_access(ident("i"), int_lit(0))),
        ret_stmt(int_lit(0)),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("cannot index")));
}

#[test]
fn import_call_index_is_tolerated() {
    let ast = parse_program(
        vec![import("io")],
        class_decl(
            "Test",
            None,
            vec![method(
                "work",
                typ("int"),
                vec![
                    param("xs", array_typ("int")),
                    var_decl("i", typ("int")),
                    assign("i", array_access(ident("xs"), call(ident("io"), "read", vec![]))),
                    ret_stmt(int_lit(0)),
                ],
            )],
        ),
    );
    assert_eq!(analyze(&ast), Vec::<String>::new());
}

#[test]
fn mixed_array_literal_is_reported() {
    let ast = single_method(vec![
        var_decl("xs", array_typ("int")),
        assign("xs", array_literal(vec![int_lit(1), tru()])),
        ret_stmt(int_lit(0)),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("same type")));
}

#[test]
fn non_int_store_index_is_reported() {
    let ast = single_method(vec![
        param("xs", array_typ("int")),
        array_assign("xs", tru(), int_lit(1)),
        ret_stmt(int_lit(0)),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("array index must be 'int'")));
}

#[test]
fn unknown_store_index_is_reported_as_not_declared() {
    let ast = single_method(vec![
        param("xs", array_typ("int")),
        array_assign("xs", ident("nope"), int_lit(1)),
        ret_stmt(int_lit(0)),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("was not declared")));
}

#[test]
fn unknown_method_is_reported() {
    let ast = single_method(vec![
        expr_stmt(call(this(), "nope", vec![])),
        ret_stmt(int_lit(0)),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("'nope' was not declared")));
}

#[test]
fn imported_super_provides_unknown_methods() {
    let ast = parse_program(
        vec![import("Base")],
        class_decl(
            "Test",
            Some("Base"),
            vec![method(
                "work",
                typ("int"),
                vec![expr_stmt(call(this(), "inherited", vec![])), ret_stmt(int_lit(0))],
            )],
        ),
    );
    assert_eq!(analyze(&ast), Vec::<String>::new());
}

#[test]
fn too_few_arguments_is_reported() {
    let ast = test_class(vec![
        method(
            "add",
            typ("int"),
            vec![
                param("a", typ("int")),
                param("b", typ("int")),
                ret_stmt(bin("+", ident("a"), ident("b"))),
            ],
        ),
        method(
            "work",
            typ("int"),
            vec![ret_stmt(call(this(), "add", vec![int_lit(1)]))],
        ),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("expects at least 2")));
}

#[test]
fn extra_arguments_past_the_fixed_prefix_are_ignored() {
    let ast = test_class(vec![
        method(
            "takes_one",
            typ("int"),
            vec![param("a", typ("int")), ret_stmt(ident("a"))],
        ),
        method(
            "work",
            typ("int"),
            vec![ret_stmt(call(this(), "takes_one", vec![int_lit(1), int_lit(2)]))],
        ),
    ]);
    assert_eq!(analyze(&ast), Vec::<String>::new());
}

#[test]
fn arguments_to_a_zero_parameter_callee_are_rejected() {
    let ast = test_class(vec![
        method("nullary", typ("int"), vec![ret_stmt(int_lit(0))]),
        method(
            "work",
            typ("int"),
            vec![ret_stmt(call(this(), "nullary", vec![int_lit(1)]))],
        ),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("expects 0 argument(s)")));
}

#[test]
fn wrong_argument_type_is_reported() {
    let ast = test_class(vec![
        method(
            "twice",
            typ("int"),
            vec![param("a", typ("int")), ret_stmt(bin("+", ident("a"), ident("a")))],
        ),
        method(
            "work",
            typ("int"),
            vec![ret_stmt(call(this(), "twice", vec![tru()]))],
        ),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("expected 'int'")));
}

#[test]
fn vararg_tail_must_be_ints() {
    let ast = test_class(vec![
        method(
            "sum",
            typ("int"),
            vec![param("rest", vararg_typ()), ret_stmt(int_lit(0))],
        ),
        method(
            "work",
            typ("int"),
            vec![ret_stmt(call(this(), "sum", vec![int_lit(1), tru(), int_lit(3)]))],
        ),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("vararg argument")));
}

#[test]
fn return_type_mismatch_is_reported() {
    let ast = single_method(vec![ret_stmt(tru())]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("declared to return")));
}

#[test]
fn return_types_are_compared_by_name_only() {
    let ast = single_method(vec![
        param("xs", array_typ("int")),
        ret_stmt(ident("xs")),
    ]);
    assert_eq!(analyze(&ast), Vec::<String>::new());
}

#[test]
fn this_in_static_method_is_reported() {
    let ast = test_class(vec![
        method("helper", typ("int"), vec![ret_stmt(int_lit(0))]),
        static_method(
            "main",
            typ("void"),
            vec![
                param("args", array_typ("String")),
                expr_stmt(call(this(), "helper", vec![])),
            ],
        ),
    ]);
    let reports = analyze(&ast);
    assert!(reports.iter().any(|m| m.contains("'this' used in static method")));
}

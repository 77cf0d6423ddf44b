use super::*;
use crate::testutil::*;

fn sample() -> crate::ast::Ast {
    parse_program(
        vec![import("io"), import("other.pkg.Ext")],
        class_decl(
            "Test",
            Some("Ext"),
            vec![
                var_decl("count", typ("int")),
                method(
                    "work",
                    typ("int"),
                    vec![
                        param("count", typ("boolean")),
                        var_decl("local", typ("int")),
                        ret_stmt(ident("local")),
                    ],
                ),
                static_method(
                    "main",
                    typ("int"),
                    vec![param("args", array_typ("String"))],
                ),
            ],
        ),
    )
}

#[test]
fn builds_class_and_super() {
    let ast = sample();
    let (table, reports) = build(&ast);
    assert!(reports.is_empty());
    assert_eq!(table.class_name, "Test");
    assert_eq!(table.super_name.as_deref(), Some("Ext"));
    assert_eq!(table.methods(), ["work", "main"]);
}

#[test]
fn main_always_returns_void() {
    let ast = sample();
    let (table, _) = build(&ast);
    assert_eq!(table.return_type("main"), Some(&Type::void()));
    assert_eq!(table.return_type("work"), Some(&Type::int()));
}

#[test]
fn parameters_shadow_fields() {
    let ast = sample();
    let (table, _) = build(&ast);
    assert_eq!(table.var_type("work", "count"), Some(&Type::boolean()));
    assert!(!table.is_field("work", "count"));
    assert_eq!(table.var_type("main", "count"), Some(&Type::int()));
}

#[test]
fn imports_match_by_last_segment() {
    let ast = sample();
    let (table, _) = build(&ast);
    assert!(table.has_import("io"));
    assert!(table.has_import("Ext"));
    assert!(!table.has_import("pkg"));
    assert_eq!(table.import_path("Ext"), Some("other.pkg.Ext"));
}

#[test]
fn duplicates_are_reported_but_kept() {
    let ast = test_class(vec![
        var_decl("x", typ("int")),
        var_decl("x", typ("boolean")),
        method("work", typ("int"), vec![ret_stmt(int_lit(0))]),
    ]);
    let (table, reports) = build(&ast);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].message.contains("duplicate field 'x'"));
    assert_eq!(table.fields().len(), 2);
}

#[test]
fn vararg_restrictions_are_reported() {
    let ast = test_class(vec![
        var_decl("bad", vararg_typ()),
        method(
            "work",
            typ("int"),
            vec![
                param("rest", vararg_typ()),
                param("after", typ("int")),
                ret_stmt(int_lit(0)),
            ],
        ),
    ]);
    let (_, reports) = build(&ast);
    assert!(reports
        .iter()
        .any(|r| r.message.contains("cannot be vararg")));
    assert!(reports.iter().any(|r| r.message.contains("must come last")));
}

#[test]
fn compatibility_is_structural_or_one_super_step() {
    let ast = parse_program(
        vec![import("Ext")],
        class_decl(
            "Test",
            Some("Ext"),
            vec![method("work", typ("int"), vec![ret_stmt(int_lit(0))])],
        ),
    );
    let (table, _) = build(&ast);
    assert!(is_compatible(&Type::int(), &Type::int(), &table));
    assert!(!is_compatible(&Type::int(), &Type::int_array(), &table));
    let test = Type::new("Test", false);
    let ext = Type::new("Ext", false);
    assert!(is_compatible(&ext, &test, &table));
    assert!(!is_compatible(&test, &ext, &table));
}

#[test]
fn expr_types_follow_node_kind() {
    let ast = test_class(vec![method(
        "work",
        typ("boolean"),
        vec![
            param("xs", array_typ("int")),
            ret_stmt(bin(
                "<",
                length(ident("xs")),
                array_access(ident("xs"), int_lit(0)),
            )),
        ],
    )]);
    let (table, _) = build(&ast);
    let resolver = TypeResolver::new(&table, "work");
    let method_id = ast.class_methods()[0];
    let crate::ast::NodeKind::MethodDecl { ret_expr, .. } = ast.kind(method_id) else {
        panic!("expected a method declaration");
    };
    let ret = ret_expr.unwrap();
    assert_eq!(resolver.expr_type(&ast, ret), Some(Type::boolean()));
    let operands = ast.children(ret);
    assert_eq!(resolver.expr_type(&ast, operands[0]), Some(Type::int()));
    assert_eq!(resolver.expr_type(&ast, operands[1]), Some(Type::int()));
}

use super::jasmin_ast::push_int;
use super::*;
use crate::ast::BinaryOp;
use crate::ollir::{CallKind, CmpOp, IrType, OClass, OCond, OInstruction, OMethod, OParam, OValue};
use crate::regalloc::{allocate, AllocMode};
use crate::testutil::*;

fn var(name: &str, ty: IrType) -> OValue {
    OValue::Var(name.to_string(), ty)
}

fn imm(value: i32) -> OValue {
    OValue::Imm(value, IrType::I32)
}

fn static_method_with(instructions: Vec<OInstruction>) -> OMethod {
    OMethod {
        name: "work".to_string(),
        is_public: true,
        is_static: true,
        is_vararg: false,
        params: Vec::new(),
        ret: IrType::Void,
        instructions,
    }
}

fn gen(method: &OMethod) -> Vec<JInstruction> {
    let class = OClass {
        name: "Test".to_string(),
        super_name: None,
        imports: vec!["io".to_string()],
        fields: Vec::new(),
        methods: Vec::new(),
    };
    let alloc = allocate(method, AllocMode::PassThrough);
    super::gen::gen_method(&class, method, &alloc)
}

#[test]
fn literal_pushes_pick_the_most_compact_form() {
    assert_eq!(push_int(-1), JInstruction::IconstM1);
    assert_eq!(push_int(0), JInstruction::Iconst(0));
    assert_eq!(push_int(5), JInstruction::Iconst(5));
    assert_eq!(push_int(6), JInstruction::Bipush(6));
    assert_eq!(push_int(-100), JInstruction::Bipush(-100));
    assert_eq!(push_int(200), JInstruction::Sipush(200));
    assert_eq!(push_int(40000), JInstruction::Ldc(40000));
}

#[test]
fn two_argument_void_call_needs_stack_for_both_arguments() {
    let method = static_method_with(vec![
        OInstruction::Call {
            dst: None,
            kind: CallKind::Static("io".to_string()),
            method: "println".to_string(),
            args: vec![imm(1), imm(2)],
            ret: IrType::Void,
        },
        OInstruction::Return {
            value: None,
            ty: IrType::Void,
        },
    ]);
    assert_eq!(super::stack::stack_limit(&method), 2);
}

#[test]
fn long_methods_get_a_higher_stack_floor() {
    let instructions = (0..6)
        .map(|i| OInstruction::Label(format!("L{i}")))
        .chain(std::iter::once(OInstruction::Return {
            value: None,
            ty: IrType::Void,
        }))
        .collect();
    assert_eq!(super::stack::stack_limit(&static_method_with(instructions)), 3);
}

#[test]
fn locals_limit_covers_the_signature_and_highest_slot() {
    let mut method = static_method_with(vec![OInstruction::Return {
        value: None,
        ty: IrType::Void,
    }]);
    method.is_static = false;
    method.params.push(OParam {
        name: "p".to_string(),
        ty: IrType::I32,
    });
    let alloc = allocate(&method, AllocMode::PassThrough);
    assert_eq!(super::stack::locals_limit(&method, &alloc), 2);
}

#[test]
fn adjacent_increment_pair_collapses_to_iinc() {
    let method = static_method_with(vec![
        OInstruction::Binary {
            dst: var("tmp0", IrType::I32),
            op: BinaryOp::Add,
            lhs: var("i", IrType::I32),
            rhs: imm(1),
        },
        OInstruction::Assign {
            dst: var("i", IrType::I32),
            src: var("tmp0", IrType::I32),
        },
        OInstruction::Return {
            value: None,
            ty: IrType::Void,
        },
    ]);
    let code = gen(&method);
    // Slot 0 belongs to the temporary, which occurs first.
    assert_eq!(
        code,
        vec![JInstruction::Iinc { slot: 1, delta: 1 }, JInstruction::Return]
    );
}

#[test]
fn in_place_increment_collapses_to_iinc() {
    let method = static_method_with(vec![
        OInstruction::Binary {
            dst: var("i", IrType::I32),
            op: BinaryOp::Add,
            lhs: imm(1),
            rhs: var("i", IrType::I32),
        },
        OInstruction::Return {
            value: None,
            ty: IrType::Void,
        },
    ]);
    let code = gen(&method);
    assert_eq!(
        code,
        vec![JInstruction::Iinc { slot: 0, delta: 1 }, JInstruction::Return]
    );
}

#[test]
fn comparison_against_zero_uses_the_single_operand_form() {
    let method = static_method_with(vec![
        OInstruction::Branch {
            cond: OCond::Compare {
                op: CmpOp::LessThan,
                lhs: var("a", IrType::I32),
                rhs: imm(0),
            },
            target: "Then0".to_string(),
        },
        OInstruction::Label("Then0".to_string()),
        OInstruction::Return {
            value: None,
            ty: IrType::Void,
        },
    ]);
    let code = gen(&method);
    assert_eq!(code[0], JInstruction::Iload(0));
    assert_eq!(code[1], JInstruction::If(Cmp::Lt, "Then0".to_string()));
}

#[test]
fn zero_on_the_left_flips_the_comparison() {
    let method = static_method_with(vec![
        OInstruction::Branch {
            cond: OCond::Compare {
                op: CmpOp::LessThan,
                lhs: imm(0),
                rhs: var("a", IrType::I32),
            },
            target: "Then0".to_string(),
        },
        OInstruction::Label("Then0".to_string()),
        OInstruction::Return {
            value: None,
            ty: IrType::Void,
        },
    ]);
    let code = gen(&method);
    assert_eq!(code[1], JInstruction::If(Cmp::Gt, "Then0".to_string()));
}

#[test]
fn general_comparison_uses_the_two_operand_form() {
    let method = static_method_with(vec![
        OInstruction::Branch {
            cond: OCond::Compare {
                op: CmpOp::GreaterThan,
                lhs: var("a", IrType::I32),
                rhs: var("b", IrType::I32),
            },
            target: "Then0".to_string(),
        },
        OInstruction::Label("Then0".to_string()),
        OInstruction::Return {
            value: None,
            ty: IrType::Void,
        },
    ]);
    let code = gen(&method);
    assert_eq!(code[2], JInstruction::IfIcmp(Cmp::Gt, "Then0".to_string()));
}

#[test]
fn hoisted_comparison_branch_is_rebuilt_from_its_definition() {
    let method = static_method_with(vec![
        OInstruction::Binary {
            dst: var("tmp0", IrType::Bool),
            op: BinaryOp::LessThan,
            lhs: var("a", IrType::I32),
            rhs: var("b", IrType::I32),
        },
        OInstruction::Branch {
            cond: OCond::Value(var("tmp0", IrType::Bool)),
            target: "Then0".to_string(),
        },
        OInstruction::Label("Then0".to_string()),
        OInstruction::Return {
            value: None,
            ty: IrType::Void,
        },
    ]);
    let code = gen(&method);
    // Materialized as a difference, then branched compactly.
    assert_eq!(
        &code[..3],
        &[
            JInstruction::Iload(1),
            JInstruction::Iload(2),
            JInstruction::Isub,
        ]
    );
    assert!(code.contains(&JInstruction::IfIcmp(Cmp::Lt, "Then0".to_string())));
}

#[test]
fn branch_on_plain_boolean_falls_back_to_ifne() {
    let method = static_method_with(vec![
        OInstruction::Branch {
            cond: OCond::Value(var("b", IrType::Bool)),
            target: "Then0".to_string(),
        },
        OInstruction::Label("Then0".to_string()),
        OInstruction::Return {
            value: None,
            ty: IrType::Void,
        },
    ]);
    let code = gen(&method);
    assert_eq!(code[1], JInstruction::If(Cmp::Ne, "Then0".to_string()));
}

#[test]
fn imported_owners_expand_to_their_full_path() {
    let ast = parse_program(
        vec![import("other.pkg.Ext")],
        class_decl(
            "Test",
            Some("Ext"),
            vec![method(
                "work",
                typ("int"),
                vec![
                    expr_stmt(call(ident("Ext"), "go", vec![])),
                    ret_stmt(int_lit(0)),
                ],
            )],
        ),
    );
    let table = build_table(&ast);
    let class = crate::ollir::lower(&ast, &table);
    let generated = generate(&class, AllocMode::PassThrough);
    assert_eq!(generated.super_path, "other/pkg/Ext");
    assert!(generated.methods[0].instructions.contains(
        &JInstruction::Invokestatic {
            owner: "other/pkg/Ext".to_string(),
            method: "go".to_string(),
            desc: "()V".to_string(),
        }
    ));
}

#[test]
fn emitted_text_has_headers_limits_and_constructor() {
    let ast = test_class(vec![static_method(
        "main",
        typ("void"),
        vec![param("args", array_typ("String"))],
    )]);
    let table = build_table(&ast);
    let class = crate::ollir::lower(&ast, &table);
    let text = generate(&class, AllocMode::PassThrough).to_string();
    assert!(text.contains(".class public Test"));
    assert!(text.contains(".super java/lang/Object"));
    assert!(text.contains(".method public <init>()V"));
    assert!(text.contains(".method public static main([Ljava/lang/String;)V"));
    assert!(text.contains(".limit stack 2"));
    assert!(text.contains(".limit locals 1"));
    assert!(text.contains("\treturn"));
}

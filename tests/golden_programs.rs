//! End-to-end golden-file tests driving the public `Compiler` API: a full
//! program in, the exact TAC text out. Complements the per-construct
//! scenarios co-located with the generator's own unit tests.

use fis25_compiler::ast::{AstNode, BinaryOp, DataType};
use fis25_compiler::error::CompileError;
use fis25_compiler::Compiler;
use pretty_assertions::assert_eq;

#[test]
fn full_program_preamble_main_and_trailer() {
    let program = AstNode::statement_list(vec![
        AstNode::decl(DataType::Int, "score", None),
        AstNode::function_def(
            "main",
            vec![],
            DataType::Void,
            AstNode::statement_list(vec![
                AstNode::assign("score", AstNode::int_lit(0)),
                AstNode::print(AstNode::identifier("score")),
            ]),
        ),
    ]);

    let tac = Compiler::new().compile(&program).unwrap();
    let expected = "\
; Código generado por el compilador FIS-25
; Arquitectura: FIS-25
VAR score

GOSUB func_main
LABEL L0
GOTO L0


LABEL func_main
VAR _t0
ASSIGN 0 _t0
ASSIGN _t0 score
PRINT score
; End of program
";
    assert_eq!(tac, expected);
}

#[test]
fn function_call_between_two_user_functions() {
    let program = AstNode::statement_list(vec![
        AstNode::function_def(
            "double",
            vec![AstNode::parameter(DataType::Int, "n")],
            DataType::Int,
            AstNode::statement_list(vec![AstNode::return_stmt(Some(AstNode::bin_op(
                BinaryOp::Mul,
                AstNode::identifier("n"),
                AstNode::int_lit(2),
            )))]),
        ),
        AstNode::function_def(
            "main",
            vec![],
            DataType::Void,
            AstNode::statement_list(vec![AstNode::decl(
                DataType::Int,
                "result",
                Some(AstNode::function_call("double", vec![AstNode::int_lit(21)])),
            )]),
        ),
    ]);

    let tac = Compiler::new().compile(&program).unwrap();
    assert!(tac.contains("PARAM _t0"));
    assert!(tac.contains("GOSUB func_double"));
    assert!(tac.contains("ASSIGN ret_double"));

    let call_site = tac.find("LABEL func_main").unwrap();
    let gosub = tac.find("GOSUB func_double").unwrap();
    assert!(gosub > call_site);
}

#[test]
fn array_feature_is_rejected_at_generation_time_but_accepted_by_the_analyzer() {
    let program = AstNode::statement_list(vec![AstNode::array_decl(
        DataType::Int,
        "nums",
        vec![AstNode::int_lit(1), AstNode::int_lit(2), AstNode::int_lit(3)],
    )]);

    let err = Compiler::new().compile(&program).unwrap_err();
    assert!(matches!(err, CompileError::Codegen(_)));
}

#[test]
fn undeclared_identifier_is_a_semantic_error_not_a_codegen_error() {
    let program = AstNode::statement_list(vec![AstNode::print(AstNode::identifier("ghost"))]);
    let err = Compiler::new().compile(&program).unwrap_err();
    assert!(matches!(err, CompileError::Semantic(_)));
}

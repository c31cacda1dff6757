//! Semantic analyzer and three-address-code generator for the FIS-25
//! didactic compiler.
//!
//! This crate does not parse source text (see `SPEC_FULL.md` §8) — it takes
//! an already-built [`ast::AstNode`] tree (typically deserialized from a
//! JSON fixture) and runs it through two independent passes: [`semantic`]
//! populates a [`symbol::SymbolTable`] and enforces the language's type
//! rules, then [`codegen`] walks the same tree again to emit flat TAC text.
//! [`Compiler::compile`] wires the two together.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod semantic;
pub mod symbol;

use ast::AstNode;
use error::CompileError;
use semantic::Analyzer;
use symbol::SymbolTable;

/// The two-phase driver: analyze, then generate. A fresh [`SymbolTable`] is
/// built per call — nothing about this type carries state across calls.
#[derive(Debug, Default)]
pub struct Compiler;

impl Compiler {
    pub fn new() -> Self {
        Compiler
    }

    /// Analyzes `root` and, if it passes, lowers it to TAC text. The first
    /// error from either phase aborts the pipeline (spec.md §7).
    pub fn compile(&self, root: &AstNode) -> Result<String, CompileError> {
        let mut table = SymbolTable::new();
        Analyzer::new(&mut table).analyze_program(root)?;
        log::debug!(
            "semantic analysis passed, deepest scope level {}",
            table.scope_level(table.global_scope())
        );
        let text = codegen::Generator::new(&table).generate(root)?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::DataType;

    #[test]
    fn compiles_a_minimal_main_to_tac() {
        let program = AstNode::statement_list(vec![AstNode::function_def(
            "main",
            vec![],
            DataType::Void,
            AstNode::statement_list(vec![AstNode::print(AstNode::int_lit(42))]),
        )]);
        let text = Compiler::new().compile(&program).unwrap();
        assert!(text.contains("GOSUB func_main"));
        assert!(text.contains("LABEL func_main"));
        assert!(text.contains("PRINT _t0"));
    }

    #[test]
    fn semantic_errors_short_circuit_before_codegen_runs() {
        let program = AstNode::statement_list(vec![AstNode::print(AstNode::identifier("missing"))]);
        let err = Compiler::new().compile(&program).unwrap_err();
        assert!(matches!(err, CompileError::Semantic(_)));
    }
}

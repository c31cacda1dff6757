//! Semantic analyzer (module C): a single top-down walk that populates the
//! symbol table and enforces the type rules of spec.md §4.3.
//!
//! Errors short-circuit through `?` the first time they're raised — there is
//! no recovery and no diagnostic accumulation (spec.md §7's fail-fast
//! policy). The driver is responsible for turning the first `Err` into a
//! process exit.

use crate::ast::{AstNode, BinaryOp, DataType, NodeKind};
use crate::error::SemanticError;
use crate::symbol::{ScopeId, SymbolTable};

pub struct Analyzer<'a> {
    table: &'a mut SymbolTable,
}

impl<'a> Analyzer<'a> {
    pub fn new(table: &'a mut SymbolTable) -> Self {
        Analyzer { table }
    }

    /// Entry point: analyze the whole program starting at the global scope.
    pub fn analyze_program(&mut self, root: &AstNode) -> Result<(), SemanticError> {
        let global = self.table.global_scope();
        self.analyze_statement(root, global)
    }

    /// `checkExpressionType(expr, table)`.
    pub fn check_expression_type(
        &mut self,
        expr: &AstNode,
        scope: ScopeId,
    ) -> Result<DataType, SemanticError> {
        match &expr.kind {
            NodeKind::IntLit(_) => Ok(DataType::Int),
            NodeKind::FloatLit(_) => Ok(DataType::Float),
            NodeKind::BoolLit(_) => Ok(DataType::Bool),
            NodeKind::StringLit(_) => Ok(DataType::String),

            NodeKind::Identifier(name) => self
                .table
                .lookup(scope, name)
                .map(|sym| sym.data_type)
                .ok_or_else(|| SemanticError::UndeclaredVariable(name.clone())),

            NodeKind::ArrayAccess { name, index } => {
                let symbol = self
                    .table
                    .lookup(scope, name)
                    .ok_or_else(|| SemanticError::UndeclaredArray(name.clone()))?;
                if !symbol.is_array {
                    return Err(SemanticError::NotAnArray(name.clone()));
                }
                let element_type = symbol.data_type;
                if self.check_expression_type(index, scope)? != DataType::Int {
                    return Err(SemanticError::NonIntegerIndex);
                }
                Ok(element_type)
            }

            NodeKind::BinOp { op, lhs, rhs } => {
                let left = self.check_expression_type(lhs, scope)?;
                let right = self.check_expression_type(rhs, scope)?;
                self.check_binary_op(*op, left, right)
            }

            NodeKind::UnOp { operand, .. } => self.check_expression_type(operand, scope),

            NodeKind::Length { .. } => Ok(DataType::Int),

            NodeKind::FunctionCall { name, .. } => self
                .table
                .lookup(scope, name)
                .map(|sym| sym.return_type)
                .ok_or_else(|| SemanticError::UndeclaredFunction(name.clone())),

            _ => Ok(DataType::Void),
        }
    }

    fn check_binary_op(
        &self,
        op: BinaryOp,
        left: DataType,
        right: DataType,
    ) -> Result<DataType, SemanticError> {
        use BinaryOp::*;
        match op {
            Add | Sub | Mul | Div | Mod => {
                if !(left.is_numeric() && right.is_numeric()) {
                    return Err(SemanticError::ArithmeticTypeMismatch);
                }
                Ok(if left == DataType::Float || right == DataType::Float {
                    DataType::Float
                } else {
                    DataType::Int
                })
            }
            Eq | Ne => {
                let mixed_numeric = left.is_numeric() && right.is_numeric();
                if left != right && !mixed_numeric {
                    return Err(SemanticError::EqualityTypeMismatch);
                }
                Ok(DataType::Bool)
            }
            Lt | Gt | Le | Ge => {
                if !(left.is_numeric() && right.is_numeric()) {
                    return Err(SemanticError::RelationalTypeMismatch);
                }
                Ok(DataType::Bool)
            }
            And | Or => {
                if left != DataType::Bool || right != DataType::Bool {
                    return Err(SemanticError::LogicalTypeMismatch);
                }
                Ok(DataType::Bool)
            }
        }
    }

    /// `analyzeStatement(node, table)`. `StatementList` is walked head then
    /// tail in source order; the first error aborts the whole walk.
    pub fn analyze_statement(
        &mut self,
        node: &AstNode,
        scope: ScopeId,
    ) -> Result<(), SemanticError> {
        match &node.kind {
            NodeKind::StatementList(statements) => {
                for stmt in statements {
                    self.analyze_statement(stmt, scope)?;
                }
                Ok(())
            }

            NodeKind::Decl { var_type, name, init } => {
                self.table.add_symbol(scope, name, *var_type)?;
                if let Some(init) = init {
                    let init_type = self.check_expression_type(init, scope)?;
                    if !is_assignable(init_type, *var_type) {
                        return Err(SemanticError::InitTypeMismatch(name.clone()));
                    }
                }
                Ok(())
            }

            NodeKind::ArrayDecl { elem_type, name, elements } => {
                // Element type compatibility is not checked in this version.
                self.table
                    .add_array_symbol(scope, name, *elem_type, elements.len())?;
                Ok(())
            }

            NodeKind::Assign { name, expr } => {
                let symbol = self
                    .table
                    .lookup(scope, name)
                    .ok_or_else(|| SemanticError::UndeclaredVariable(name.clone()))?;
                let target_type = symbol.data_type;
                let value_type = self.check_expression_type(expr, scope)?;
                if !is_assignable(value_type, target_type) {
                    return Err(SemanticError::AssignmentTypeMismatch(name.clone()));
                }
                Ok(())
            }

            // No validation, matching the reference analyzer: array
            // assignment has no case in its statement switch and falls
            // through to an unconditional accept.
            NodeKind::ArrayAssign { .. } => Ok(()),

            NodeKind::If { cond, then_branch, else_branch } => {
                if self.check_expression_type(cond, scope)? != DataType::Bool {
                    return Err(SemanticError::NonBooleanCondition("if"));
                }
                self.analyze_statement(then_branch, scope)?;
                if let Some(else_branch) = else_branch {
                    self.analyze_statement(else_branch, scope)?;
                }
                Ok(())
            }

            NodeKind::While { cond, body } => {
                if self.check_expression_type(cond, scope)? != DataType::Bool {
                    return Err(SemanticError::NonBooleanCondition("while"));
                }
                self.analyze_statement(body, scope)
            }

            NodeKind::For { init, cond, step, body } => {
                self.analyze_statement(init, scope)?;
                if self.check_expression_type(cond, scope)? != DataType::Bool {
                    return Err(SemanticError::NonBooleanCondition("for"));
                }
                self.analyze_statement(step, scope)?;
                self.analyze_statement(body, scope)
            }

            NodeKind::FunctionDef { name, params, ret_type, body } => {
                self.table.add_function_symbol(scope, name, *ret_type)?;
                let func_scope = self.table.enter_scope(scope);
                for param in params {
                    if let NodeKind::Parameter { param_type, name } = &param.kind {
                        self.table.add_symbol(func_scope, name, *param_type)?;
                    }
                }
                self.analyze_statement(body, func_scope)
            }

            NodeKind::Pixel { x, y, color } => {
                self.check_expression_type(x, scope)?;
                self.check_expression_type(y, scope)?;
                self.check_expression_type(color, scope)?;
                Ok(())
            }

            NodeKind::Key { key_code, .. } => {
                self.check_expression_type(key_code, scope)?;
                Ok(())
            }

            NodeKind::Print { expr } => {
                self.check_expression_type(expr, scope)?;
                Ok(())
            }

            NodeKind::Return { value } => {
                if let Some(value) = value {
                    self.check_expression_type(value, scope)?;
                }
                Ok(())
            }

            NodeKind::FunctionCall { .. } => {
                self.check_expression_type(node, scope)?;
                Ok(())
            }

            // Input and the remaining expression-only node kinds carry no
            // additional statement-level obligation.
            _ => Ok(()),
        }
    }
}

/// `Int` is assignable to `Float` (widening); otherwise types must match
/// exactly. Shared by declaration-initializer and assignment checks.
fn is_assignable(value_type: DataType, target_type: DataType) -> bool {
    value_type == target_type || (value_type == DataType::Int && target_type == DataType::Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, BinaryOp, DataType};

    fn analyze(root: &AstNode) -> Result<(), SemanticError> {
        let mut table = SymbolTable::new();
        Analyzer::new(&mut table).analyze_program(root)
    }

    #[test]
    fn undeclared_variable_is_rejected() {
        let program = AstNode::statement_list(vec![AstNode::print(AstNode::identifier("x"))]);
        assert_eq!(
            analyze(&program),
            Err(SemanticError::UndeclaredVariable("x".to_string()))
        );
    }

    #[test]
    fn int_widens_to_float_in_declaration() {
        let program = AstNode::statement_list(vec![AstNode::decl(
            DataType::Float,
            "x",
            Some(AstNode::int_lit(5)),
        )]);
        assert_eq!(analyze(&program), Ok(()));
    }

    #[test]
    fn float_does_not_narrow_to_int() {
        let program = AstNode::statement_list(vec![AstNode::decl(
            DataType::Int,
            "x",
            Some(AstNode::float_lit(5.0)),
        )]);
        assert_eq!(
            analyze(&program),
            Err(SemanticError::InitTypeMismatch("x".to_string()))
        );
    }

    #[test]
    fn if_condition_must_be_bool() {
        let program = AstNode::statement_list(vec![AstNode::if_stmt(
            AstNode::int_lit(1),
            AstNode::print(AstNode::int_lit(1)),
            None,
        )]);
        assert_eq!(
            analyze(&program),
            Err(SemanticError::NonBooleanCondition("if"))
        );
    }

    #[test]
    fn logical_operators_require_bool_operands() {
        let expr = AstNode::bin_op(BinaryOp::And, AstNode::int_lit(1), AstNode::bool_lit(true));
        let mut table = SymbolTable::new();
        let scope = table.global_scope();
        let result = Analyzer::new(&mut table).check_expression_type(&expr, scope);
        assert_eq!(result, Err(SemanticError::LogicalTypeMismatch));
    }

    #[test]
    fn equality_allows_mixed_int_float() {
        let expr = AstNode::bin_op(BinaryOp::Eq, AstNode::int_lit(1), AstNode::float_lit(1.0));
        let mut table = SymbolTable::new();
        let scope = table.global_scope();
        assert_eq!(
            Analyzer::new(&mut table).check_expression_type(&expr, scope),
            Ok(DataType::Bool)
        );
    }

    #[test]
    fn array_access_yields_the_element_type() {
        let mut table = SymbolTable::new();
        let scope = table.global_scope();
        table
            .add_array_symbol(scope, "nums", DataType::Int, 3)
            .unwrap();
        let expr = AstNode::array_access("nums", AstNode::int_lit(0));
        assert_eq!(
            Analyzer::new(&mut table).check_expression_type(&expr, scope),
            Ok(DataType::Int)
        );
    }

    #[test]
    fn array_access_on_undeclared_name_is_rejected() {
        let mut table = SymbolTable::new();
        let scope = table.global_scope();
        let expr = AstNode::array_access("nums", AstNode::int_lit(0));
        assert_eq!(
            Analyzer::new(&mut table).check_expression_type(&expr, scope),
            Err(SemanticError::UndeclaredArray("nums".to_string()))
        );
    }

    #[test]
    fn array_access_on_a_scalar_is_rejected() {
        let mut table = SymbolTable::new();
        let scope = table.global_scope();
        table.add_symbol(scope, "nums", DataType::Int).unwrap();
        let expr = AstNode::array_access("nums", AstNode::int_lit(0));
        assert_eq!(
            Analyzer::new(&mut table).check_expression_type(&expr, scope),
            Err(SemanticError::NotAnArray("nums".to_string()))
        );
    }

    #[test]
    fn array_access_with_a_non_integer_index_is_rejected() {
        let mut table = SymbolTable::new();
        let scope = table.global_scope();
        table
            .add_array_symbol(scope, "nums", DataType::Int, 3)
            .unwrap();
        let expr = AstNode::array_access("nums", AstNode::bool_lit(true));
        assert_eq!(
            Analyzer::new(&mut table).check_expression_type(&expr, scope),
            Err(SemanticError::NonIntegerIndex)
        );
    }

    #[test]
    fn array_assignment_is_not_validated_by_the_analyzer() {
        // Matches `examples/original_source/src/symtable.c`'s
        // `analyze_statement`: array assignment has no case and falls
        // through to an unconditional accept, even against an undeclared
        // array or a non-integer index.
        let program = AstNode::statement_list(vec![AstNode::array_assign(
            AstNode::array_access("missing", AstNode::bool_lit(true)),
            AstNode::int_lit(1),
        )]);
        assert_eq!(analyze(&program), Ok(()));
    }

    #[test]
    fn function_scope_does_not_leak_to_caller() {
        let program = AstNode::statement_list(vec![
            AstNode::function_def(
                "helper",
                vec![AstNode::parameter(DataType::Int, "n")],
                DataType::Void,
                AstNode::statement_list(vec![]),
            ),
            // `n` was only declared inside helper's scope.
            AstNode::print(AstNode::identifier("n")),
        ]);
        assert_eq!(
            analyze(&program),
            Err(SemanticError::UndeclaredVariable("n".to_string()))
        );
    }

    #[test]
    fn redeclaration_in_same_scope_is_rejected() {
        let program = AstNode::statement_list(vec![
            AstNode::decl(DataType::Int, "x", None),
            AstNode::decl(DataType::Bool, "x", None),
        ]);
        assert_eq!(
            analyze(&program),
            Err(SemanticError::Redeclaration("x".to_string()))
        );
    }
}

//! Code generator (module D): lowers an analyzed AST to flat three-address
//! code for the FIS-25 machine (spec.md §4.4).
//!
//! Lowering assumes `analyze_program` has already run successfully against
//! the same `SymbolTable` — the generator does not re-check types, it only
//! re-queries declarations (function return types, the global variable set
//! for the preamble). Constructs the analyzer accepts but this emitter
//! cannot lower (arrays, `.length`) fail here instead, per spec.md's
//! "Current restrictions" note.

mod instr;

pub use instr::{Instruction, TacOp};

use crate::ast::{AstNode, DataType, NodeKind};
use crate::error::CodegenError;
use crate::symbol::{Symbol, SymbolTable};

/// Literal ASCII codes remapped to the FIS-25 hardware's key-scan values.
/// `27` (Esc) and `32` (Space) intentionally collide on `8` — see
/// `SPEC_FULL.md` §9.
fn remap_key_code(code: i32) -> i32 {
    match code {
        87 => 4,
        83 => 5,
        65 => 6,
        68 => 7,
        27 => 8,
        32 => 8,
        other => other,
    }
}

pub struct Generator<'a> {
    table: &'a SymbolTable,
    instructions: Vec<Instruction>,
    next_temp: u32,
    next_label: u32,
    current_function: Option<String>,
    current_return_type: DataType,
}

impl<'a> Generator<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Generator {
            table,
            instructions: Vec::new(),
            next_temp: 0,
            next_label: 0,
            current_function: None,
            current_return_type: DataType::Void,
        }
    }

    /// `generateCode(root, table)`: preamble, then the program body, then
    /// the trailing comment. Returns the rendered TAC text.
    pub fn generate(mut self, root: &AstNode) -> Result<String, CodegenError> {
        self.emit(Instruction::Comment(
            "Código generado por el compilador FIS-25".to_string(),
        ));
        self.emit(Instruction::Comment("Arquitectura: FIS-25".to_string()));

        let global = self.table.global_scope();
        let globals: Vec<Symbol> = self.table.iter_scope(global).cloned().collect();
        for symbol in &globals {
            if symbol.is_function {
                if symbol.return_type != DataType::Void {
                    self.emit(Instruction::Var(format!("ret_{}", symbol.name)));
                }
            } else if !symbol.is_array {
                self.emit(Instruction::Var(symbol.name.clone()));
            }
        }

        self.emit(Instruction::Blank);
        self.emit(Instruction::Gosub("func_main".to_string()));
        let halt_label = self.fresh_label();
        self.emit(Instruction::Label(halt_label.clone()));
        self.emit(Instruction::Goto(halt_label));
        self.emit(Instruction::Blank);

        self.lower_statement(root)?;

        self.emit(Instruction::Comment("End of program".to_string()));

        Ok(self.render())
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for instruction in &self.instructions {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }
        out
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn fresh_temp(&mut self) -> String {
        let name = format!("_t{}", self.next_temp);
        self.next_temp += 1;
        name
    }

    fn fresh_label(&mut self) -> String {
        let name = format!("L{}", self.next_label);
        self.next_label += 1;
        name
    }

    /// Lowers `expr`, returning the name of the location (identifier or
    /// temporary) holding its value.
    fn lower_expression(&mut self, expr: &AstNode) -> Result<String, CodegenError> {
        match &expr.kind {
            NodeKind::IntLit(value) => self.lower_literal(value.to_string()),
            NodeKind::FloatLit(value) => self.lower_literal(format!("{value:.6}")),
            NodeKind::BoolLit(value) => {
                self.lower_literal(if *value { "1".to_string() } else { "0".to_string() })
            }
            NodeKind::StringLit(value) => self.lower_literal(value.clone()),

            NodeKind::Identifier(name) => Ok(name.clone()),

            NodeKind::BinOp { op, lhs, rhs } => {
                let a = self.lower_expression(lhs)?;
                let b = self.lower_expression(rhs)?;
                let dst = self.fresh_temp();
                self.emit(Instruction::Var(dst.clone()));
                self.emit(Instruction::BinOp { op: TacOp::from(*op), a, b, dst: dst.clone() });
                Ok(dst)
            }

            NodeKind::UnOp { op, operand } => {
                let value = self.lower_expression(operand)?;
                let dst = self.fresh_temp();
                self.emit(Instruction::Var(dst.clone()));
                match op {
                    crate::ast::UnaryOp::Neg => self.emit(Instruction::BinOp {
                        op: TacOp::Sub,
                        a: "0".to_string(),
                        b: value,
                        dst: dst.clone(),
                    }),
                    crate::ast::UnaryOp::Not => self.emit(Instruction::BinOp {
                        op: TacOp::Eq,
                        a: value,
                        b: "0".to_string(),
                        dst: dst.clone(),
                    }),
                }
                Ok(dst)
            }

            NodeKind::FunctionCall { name, args } => self
                .lower_call(name, args)?
                .ok_or_else(|| CodegenError::VoidCallUsedAsValue(name.clone())),

            NodeKind::ArrayAccess { .. } => Err(CodegenError::UnsupportedArrayAccess),
            NodeKind::Length { .. } => Err(CodegenError::UnsupportedLength),

            _ => Err(CodegenError::MalformedAst(
                "node kind is not a valid expression position",
            )),
        }
    }

    fn lower_literal(&mut self, text: String) -> Result<String, CodegenError> {
        let dst = self.fresh_temp();
        self.emit(Instruction::Var(dst.clone()));
        self.emit(Instruction::Assign { src: text, dst: dst.clone() });
        Ok(dst)
    }

    /// Emits `PARAM` per argument (interleaved with whatever instructions
    /// lowering that argument itself requires) followed by `GOSUB`, then
    /// conditionally captures the return value into a fresh temporary if
    /// the callee's declared return type is not `Void`. Function symbols
    /// are always looked up from the global scope, matching the reference
    /// generator (which never tracks which nested scope a call site sits
    /// in) — see `DESIGN.md`.
    fn lower_call(&mut self, name: &str, args: &[AstNode]) -> Result<Option<String>, CodegenError> {
        for arg in args {
            let value = self.lower_expression(arg)?;
            self.emit(Instruction::Param(value));
        }
        self.emit(Instruction::Gosub(format!("func_{name}")));

        let global = self.table.global_scope();
        match self.table.lookup(global, name) {
            Some(symbol) if symbol.is_function && symbol.return_type != DataType::Void => {
                let dst = self.fresh_temp();
                self.emit(Instruction::Var(dst.clone()));
                self.emit(Instruction::Assign { src: format!("ret_{name}"), dst: dst.clone() });
                Ok(Some(dst))
            }
            _ => Ok(None),
        }
    }

    fn lower_statement(&mut self, node: &AstNode) -> Result<(), CodegenError> {
        match &node.kind {
            NodeKind::StatementList(statements) => {
                for stmt in statements {
                    self.lower_statement(stmt)?;
                }
                Ok(())
            }

            NodeKind::Decl { name, init, .. } => {
                if self.current_function.is_some() {
                    self.emit(Instruction::Var(name.clone()));
                    if let Some(init) = init {
                        let value = self.lower_expression(init)?;
                        self.emit(Instruction::Assign { src: value, dst: name.clone() });
                    }
                    Ok(())
                } else if init.is_some() {
                    Err(CodegenError::UnsupportedGlobalInit(name.clone()))
                } else {
                    Ok(())
                }
            }

            NodeKind::ArrayDecl { .. } => Err(CodegenError::UnsupportedArrayDeclaration),
            NodeKind::ArrayAssign { .. } => Err(CodegenError::UnsupportedArrayAssignment),

            NodeKind::Assign { name, expr } => {
                let value = self.lower_expression(expr)?;
                self.emit(Instruction::Assign { src: value, dst: name.clone() });
                Ok(())
            }

            NodeKind::If { cond, then_branch, else_branch } => {
                let test = self.lower_expression(cond)?;
                match else_branch {
                    Some(else_branch) => {
                        let else_label = self.fresh_label();
                        let end_label = self.fresh_label();
                        self.emit(Instruction::IfFalseGoto { cond: test, label: else_label.clone() });
                        self.lower_statement(then_branch)?;
                        self.emit(Instruction::Goto(end_label.clone()));
                        self.emit(Instruction::Label(else_label));
                        self.lower_statement(else_branch)?;
                        self.emit(Instruction::Label(end_label));
                    }
                    None => {
                        let end_label = self.fresh_label();
                        self.emit(Instruction::IfFalseGoto { cond: test, label: end_label.clone() });
                        self.lower_statement(then_branch)?;
                        self.emit(Instruction::Label(end_label));
                    }
                }
                Ok(())
            }

            NodeKind::While { cond, body } => {
                let start_label = self.fresh_label();
                let end_label = self.fresh_label();
                self.emit(Instruction::Label(start_label.clone()));
                let test = self.lower_expression(cond)?;
                self.emit(Instruction::IfFalseGoto { cond: test, label: end_label.clone() });
                self.lower_statement(body)?;
                self.emit(Instruction::Goto(start_label));
                self.emit(Instruction::Label(end_label));
                Ok(())
            }

            NodeKind::For { init, cond, step, body } => {
                self.lower_statement(init)?;
                let start_label = self.fresh_label();
                let end_label = self.fresh_label();
                self.emit(Instruction::Label(start_label.clone()));
                let test = self.lower_expression(cond)?;
                self.emit(Instruction::IfFalseGoto { cond: test, label: end_label.clone() });
                self.lower_statement(body)?;
                self.lower_statement(step)?;
                self.emit(Instruction::Goto(start_label));
                self.emit(Instruction::Label(end_label));
                Ok(())
            }

            NodeKind::FunctionDef { name, params, ret_type, body } => {
                self.emit(Instruction::Blank);
                self.emit(Instruction::Label(format!("func_{name}")));
                for param in params {
                    if let NodeKind::Parameter { name: param_name, .. } = &param.kind {
                        self.emit(Instruction::Var(param_name.clone()));
                    }
                }
                for param in params.iter().rev() {
                    if let NodeKind::Parameter { name: param_name, .. } = &param.kind {
                        self.emit(Instruction::ParamGet(param_name.clone()));
                    }
                }

                let outer_function = self.current_function.replace(name.clone());
                let outer_return_type = self.current_return_type;
                self.current_return_type = *ret_type;

                self.lower_statement(body)?;

                self.current_function = outer_function;
                self.current_return_type = outer_return_type;
                Ok(())
            }

            NodeKind::Pixel { x, y, color } => {
                let x = self.lower_expression(x)?;
                let y = self.lower_expression(y)?;
                let color = self.lower_expression(color)?;
                self.emit(Instruction::Pixel { x, y, color });
                Ok(())
            }

            NodeKind::Key { key_code, dest_var } => {
                match &key_code.kind {
                    NodeKind::IntLit(code) => {
                        let mapped = remap_key_code(*code);
                        self.emit(Instruction::Key { code: mapped.to_string(), dest: dest_var.clone() });
                    }
                    _ => {
                        let code = self.lower_expression(key_code)?;
                        self.emit(Instruction::Key { code, dest: dest_var.clone() });
                    }
                }
                Ok(())
            }

            NodeKind::Input { var_name } => {
                self.emit(Instruction::Input(var_name.clone()));
                Ok(())
            }

            NodeKind::Print { expr } => {
                let value = self.lower_expression(expr)?;
                self.emit(Instruction::Print(value));
                Ok(())
            }

            NodeKind::Return { value } => {
                if let Some(value) = value {
                    if self.current_return_type != DataType::Void {
                        let result = self.lower_expression(value)?;
                        if let Some(function) = self.current_function.clone() {
                            self.emit(Instruction::Assign { src: result, dst: format!("ret_{function}") });
                        }
                    }
                }
                self.emit(Instruction::Return);
                Ok(())
            }

            NodeKind::FunctionCall { name, args } => {
                self.lower_call(name, args)?;
                Ok(())
            }

            _ => Err(CodegenError::MalformedAst("node kind is not a valid statement")),
        }
    }
}

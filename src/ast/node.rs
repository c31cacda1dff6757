use serde::{Deserialize, Serialize};

/// Scalar and container types recognised by the analyzer and generator.
///
/// `Array` is a container tag only — its element type lives on the owning
/// symbol (see `symbol::Symbol::element_type`), not on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Int,
    Float,
    Bool,
    String,
    Array,
    Void,
}

impl DataType {
    /// Widening numeric promotion used by arithmetic, initializers, and
    /// assignments: `Int -> Float` is allowed, nothing else is.
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Bool => "bool",
            DataType::String => "string",
            DataType::Array => "array",
            DataType::Void => "void",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Tagged variant of a tree node. `StatementList`, function parameters, and
/// call arguments are cons-cells in the source model (see `SPEC_FULL.md`
/// §2); here they are flattened to `Vec<AstNode>` while preserving source
/// order, per spec.md §9.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    IntLit(i32),
    FloatLit(f32),
    BoolLit(bool),
    StringLit(String),

    /// Use of a previously declared name.
    Identifier(String),

    BinOp {
        op: BinaryOp,
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
    },
    UnOp {
        op: UnaryOp,
        operand: Box<AstNode>,
    },

    /// `<type> <name> (= <init>)?;`
    Decl {
        var_type: DataType,
        name: String,
        init: Option<Box<AstNode>>,
    },
    /// `<name> = <expr>;`
    Assign {
        name: String,
        expr: Box<AstNode>,
    },

    ArrayDecl {
        elem_type: DataType,
        name: String,
        elements: Vec<AstNode>,
    },
    ArrayAccess {
        name: String,
        index: Box<AstNode>,
    },
    /// `access` is always an `ArrayAccess` node.
    ArrayAssign {
        access: Box<AstNode>,
        value: Box<AstNode>,
    },

    If {
        cond: Box<AstNode>,
        then_branch: Box<AstNode>,
        else_branch: Option<Box<AstNode>>,
    },
    While {
        cond: Box<AstNode>,
        body: Box<AstNode>,
    },
    For {
        init: Box<AstNode>,
        cond: Box<AstNode>,
        step: Box<AstNode>,
        body: Box<AstNode>,
    },

    /// A single formal parameter; `FunctionDef::params` holds these in
    /// declaration order.
    Parameter {
        param_type: DataType,
        name: String,
    },
    FunctionDef {
        name: String,
        params: Vec<AstNode>,
        ret_type: DataType,
        body: Box<AstNode>,
    },
    /// `args` holds argument expressions in left-to-right call order.
    FunctionCall {
        name: String,
        args: Vec<AstNode>,
    },
    Return {
        value: Option<Box<AstNode>>,
    },

    // FIS-25 hardware primitives.
    Pixel {
        x: Box<AstNode>,
        y: Box<AstNode>,
        color: Box<AstNode>,
    },
    Key {
        key_code: Box<AstNode>,
        dest_var: String,
    },
    Input {
        var_name: String,
    },
    Print {
        expr: Box<AstNode>,
    },
    Length {
        array_expr: Box<AstNode>,
    },

    /// Sequencing: statements run in the order they appear here.
    StatementList(Vec<AstNode>),
}

/// A node in the program tree: a tag (`NodeKind`) plus the resolved
/// `data_type` attribute every node carries (spec.md §3.2). `data_type` is
/// set once at construction — `Void` by default, or the node's own type for
/// self-typed nodes (literals, `ArrayDecl`, `Length`) — and is never mutated
/// or consulted again; the analyzer and generator both recompute types from
/// the symbol table instead of trusting this field, matching the reference
/// implementation's behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstNode {
    pub kind: NodeKind,
    pub data_type: DataType,
}

impl AstNode {
    fn new(kind: NodeKind, data_type: DataType) -> Self {
        Self { kind, data_type }
    }

    pub fn int_lit(value: i32) -> Self {
        Self::new(NodeKind::IntLit(value), DataType::Int)
    }

    pub fn float_lit(value: f32) -> Self {
        Self::new(NodeKind::FloatLit(value), DataType::Float)
    }

    pub fn bool_lit(value: bool) -> Self {
        Self::new(NodeKind::BoolLit(value), DataType::Bool)
    }

    pub fn string_lit(value: impl Into<String>) -> Self {
        Self::new(NodeKind::StringLit(value.into()), DataType::String)
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Identifier(name.into()), DataType::Void)
    }

    pub fn bin_op(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
        Self::new(
            NodeKind::BinOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            DataType::Void,
        )
    }

    pub fn un_op(op: UnaryOp, operand: AstNode) -> Self {
        Self::new(
            NodeKind::UnOp {
                op,
                operand: Box::new(operand),
            },
            DataType::Void,
        )
    }

    pub fn decl(var_type: DataType, name: impl Into<String>, init: Option<AstNode>) -> Self {
        Self::new(
            NodeKind::Decl {
                var_type,
                name: name.into(),
                init: init.map(Box::new),
            },
            DataType::Void,
        )
    }

    pub fn assign(name: impl Into<String>, expr: AstNode) -> Self {
        Self::new(
            NodeKind::Assign {
                name: name.into(),
                expr: Box::new(expr),
            },
            DataType::Void,
        )
    }

    pub fn array_decl(elem_type: DataType, name: impl Into<String>, elements: Vec<AstNode>) -> Self {
        Self::new(
            NodeKind::ArrayDecl {
                elem_type,
                name: name.into(),
                elements,
            },
            DataType::Array,
        )
    }

    pub fn array_access(name: impl Into<String>, index: AstNode) -> Self {
        Self::new(
            NodeKind::ArrayAccess {
                name: name.into(),
                index: Box::new(index),
            },
            DataType::Void,
        )
    }

    pub fn array_assign(access: AstNode, value: AstNode) -> Self {
        Self::new(
            NodeKind::ArrayAssign {
                access: Box::new(access),
                value: Box::new(value),
            },
            DataType::Void,
        )
    }

    pub fn if_stmt(cond: AstNode, then_branch: AstNode, else_branch: Option<AstNode>) -> Self {
        Self::new(
            NodeKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            },
            DataType::Void,
        )
    }

    pub fn while_loop(cond: AstNode, body: AstNode) -> Self {
        Self::new(
            NodeKind::While {
                cond: Box::new(cond),
                body: Box::new(body),
            },
            DataType::Void,
        )
    }

    pub fn for_loop(init: AstNode, cond: AstNode, step: AstNode, body: AstNode) -> Self {
        Self::new(
            NodeKind::For {
                init: Box::new(init),
                cond: Box::new(cond),
                step: Box::new(step),
                body: Box::new(body),
            },
            DataType::Void,
        )
    }

    pub fn parameter(param_type: DataType, name: impl Into<String>) -> Self {
        Self::new(
            NodeKind::Parameter {
                param_type,
                name: name.into(),
            },
            DataType::Void,
        )
    }

    pub fn function_def(
        name: impl Into<String>,
        params: Vec<AstNode>,
        ret_type: DataType,
        body: AstNode,
    ) -> Self {
        Self::new(
            NodeKind::FunctionDef {
                name: name.into(),
                params,
                ret_type,
                body: Box::new(body),
            },
            DataType::Void,
        )
    }

    pub fn function_call(name: impl Into<String>, args: Vec<AstNode>) -> Self {
        Self::new(
            NodeKind::FunctionCall {
                name: name.into(),
                args,
            },
            DataType::Void,
        )
    }

    pub fn return_stmt(value: Option<AstNode>) -> Self {
        Self::new(NodeKind::Return { value: value.map(Box::new) }, DataType::Void)
    }

    pub fn pixel(x: AstNode, y: AstNode, color: AstNode) -> Self {
        Self::new(
            NodeKind::Pixel {
                x: Box::new(x),
                y: Box::new(y),
                color: Box::new(color),
            },
            DataType::Void,
        )
    }

    pub fn key(key_code: AstNode, dest_var: impl Into<String>) -> Self {
        Self::new(
            NodeKind::Key {
                key_code: Box::new(key_code),
                dest_var: dest_var.into(),
            },
            DataType::Void,
        )
    }

    pub fn input(var_name: impl Into<String>) -> Self {
        Self::new(NodeKind::Input { var_name: var_name.into() }, DataType::Void)
    }

    pub fn print(expr: AstNode) -> Self {
        Self::new(NodeKind::Print { expr: Box::new(expr) }, DataType::Void)
    }

    pub fn length(array_expr: AstNode) -> Self {
        Self::new(NodeKind::Length { array_expr: Box::new(array_expr) }, DataType::Int)
    }

    pub fn statement_list(statements: Vec<AstNode>) -> Self {
        Self::new(NodeKind::StatementList(statements), DataType::Void)
    }
}

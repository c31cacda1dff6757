//! Error taxonomy for the analyzer/codegen/driver boundary (spec.md §7).
//!
//! Each variant corresponds to a row of the error taxonomy table. The
//! library never panics or calls `process::exit` on these paths — `?`
//! propagation gives the same fail-fast behaviour (first error wins, nothing
//! downstream runs) without the library reaching for the process. `main.rs`
//! is the only place that turns an `Err` into a one-line stderr message and
//! a non-zero exit status.

use thiserror::Error;

/// Failures raised while adding symbols to a scope.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SymbolTableError {
    #[error("Variable '{0}' already declared in this scope")]
    Redeclaration(String),
}

/// Failures raised by the semantic analyzer (module C).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SemanticError {
    #[error("Variable '{0}' already declared in this scope")]
    Redeclaration(String),

    #[error("Variable '{0}' not declared")]
    UndeclaredVariable(String),

    #[error("Array '{0}' not declared")]
    UndeclaredArray(String),

    #[error("Function '{0}' not declared")]
    UndeclaredFunction(String),

    #[error("'{0}' is not an array")]
    NotAnArray(String),

    #[error("Array index must be an integer")]
    NonIntegerIndex,

    #[error("Arithmetic operations are only allowed between int and float")]
    ArithmeticTypeMismatch,

    #[error("Equality comparison between incompatible types")]
    EqualityTypeMismatch,

    #[error("Relational comparisons are only allowed between int and float")]
    RelationalTypeMismatch,

    #[error("Logical operators require boolean operands")]
    LogicalTypeMismatch,

    #[error("Incompatible type in assignment to '{0}'")]
    AssignmentTypeMismatch(String),

    #[error("Incompatible type in initialization of '{0}'")]
    InitTypeMismatch(String),

    #[error("{0} condition must be of type bool")]
    NonBooleanCondition(&'static str),
}

impl From<SymbolTableError> for SemanticError {
    fn from(err: SymbolTableError) -> Self {
        match err {
            SymbolTableError::Redeclaration(name) => SemanticError::Redeclaration(name),
        }
    }
}

/// Failures raised by the code generator (module D) for constructs the
/// emitter does not support (spec.md §4.4 "Current restrictions").
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CodegenError {
    #[error("array declarations are not supported by this code generator")]
    UnsupportedArrayDeclaration,

    #[error("array access is not supported by this code generator")]
    UnsupportedArrayAccess,

    #[error("array assignment is not supported by this code generator")]
    UnsupportedArrayAssignment,

    #[error("the .length operator is not supported by this code generator")]
    UnsupportedLength,

    #[error("global initialization of '{0}' is not supported by this code generator")]
    UnsupportedGlobalInit(String),

    #[error("call to void function '{0}' cannot be used as a value")]
    VoidCallUsedAsValue(String),

    #[error("malformed AST: {0}")]
    MalformedAst(&'static str),
}

/// Top-level error returned to callers of the driver (`Compiler`).
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("semantic error: {0}")]
    Semantic(#[from] SemanticError),

    #[error("code generation error: {0}")]
    Codegen(#[from] CodegenError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid AST fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

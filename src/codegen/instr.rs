use crate::ast::BinaryOp;

/// A TAC opcode that takes two operands and a destination. Maps 1:1 onto
/// `BinaryOp`, except `Ne`/`Le`/`Ge` get the mnemonics the emitter actually
/// uses (`NEQ`, `LTE`, `GTE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
}

impl From<BinaryOp> for TacOp {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => TacOp::Add,
            BinaryOp::Sub => TacOp::Sub,
            BinaryOp::Mul => TacOp::Mul,
            BinaryOp::Div => TacOp::Div,
            BinaryOp::Mod => TacOp::Mod,
            BinaryOp::Eq => TacOp::Eq,
            BinaryOp::Ne => TacOp::Neq,
            BinaryOp::Lt => TacOp::Lt,
            BinaryOp::Gt => TacOp::Gt,
            BinaryOp::Le => TacOp::Lte,
            BinaryOp::Ge => TacOp::Gte,
            BinaryOp::And => TacOp::And,
            BinaryOp::Or => TacOp::Or,
        }
    }
}

impl std::fmt::Display for TacOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = match self {
            TacOp::Add => "ADD",
            TacOp::Sub => "SUB",
            TacOp::Mul => "MUL",
            TacOp::Div => "DIV",
            TacOp::Mod => "MOD",
            TacOp::Eq => "EQ",
            TacOp::Neq => "NEQ",
            TacOp::Lt => "LT",
            TacOp::Gt => "GT",
            TacOp::Lte => "LTE",
            TacOp::Gte => "GTE",
            TacOp::And => "AND",
            TacOp::Or => "OR",
        };
        write!(f, "{mnemonic}")
    }
}

/// One line of emitted three-address code. `Display` is the only place the
/// exact on-disk grammar is assembled — keep it in lockstep with spec.md
/// §4.4 and the golden scenarios of §8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Var(String),
    Assign { src: String, dst: String },
    BinOp { op: TacOp, a: String, b: String, dst: String },
    Label(String),
    Goto(String),
    IfFalseGoto { cond: String, label: String },
    Param(String),
    ParamGet(String),
    Gosub(String),
    Return,
    Pixel { x: String, y: String, color: String },
    Key { code: String, dest: String },
    Input(String),
    Print(String),
    Comment(String),
    Blank,
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Var(name) => write!(f, "VAR {name}"),
            Instruction::Assign { src, dst } => write!(f, "ASSIGN {src} {dst}"),
            Instruction::BinOp { op, a, b, dst } => write!(f, "{op} {a} {b} {dst}"),
            Instruction::Label(name) => write!(f, "LABEL {name}"),
            Instruction::Goto(name) => write!(f, "GOTO {name}"),
            Instruction::IfFalseGoto { cond, label } => write!(f, "IFFALSE {cond} GOTO {label}"),
            Instruction::Param(value) => write!(f, "PARAM {value}"),
            Instruction::ParamGet(name) => write!(f, "PARAM_GET {name}"),
            Instruction::Gosub(label) => write!(f, "GOSUB {label}"),
            Instruction::Return => write!(f, "RETURN"),
            Instruction::Pixel { x, y, color } => write!(f, "PIXEL {x} {y} {color}"),
            Instruction::Key { code, dest } => write!(f, "KEY {code} {dest}"),
            Instruction::Input(name) => write!(f, "INPUT {name}"),
            Instruction::Print(value) => write!(f, "PRINT {value}"),
            Instruction::Comment(text) => write!(f, "; {text}"),
            Instruction::Blank => Ok(()),
        }
    }
}

//! Boolean expression language for authored pack conditions.
//!
//! Packs may gate events and choices on small authored expressions such as
//! `flag('gate_open') && faith >= 10`. The vocabulary is closed on purpose:
//! every variable and function name must come from the fixed tables below,
//! so a misspelled flag or quest reference fails at pack load time instead
//! of silently never matching at runtime.

mod evaluate;
mod parse;

pub use evaluate::holds;
pub use parse::parse;

/// Variables readable by expressions. Closed table.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Variable {
    Health,
    MaxHealth,
    Faith,
    MaxFaith,
    Balance,
}

/// Functions callable by expressions. Closed table. Every function takes a
/// single quoted string argument.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Function {
    Flag,
    QuestActive,
    QuestCompleted,
    EventCompleted,
    RegionDiscovered,
    RegionStatus,
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Parsed expression tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Int(i64),
    Str(String),
    Var(Variable),
    Call { function: Function, argument: String },
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// Walks every function call in the tree. The validator uses this to
    /// cross-check call arguments (quest IDs, region IDs, flag names)
    /// against the registry.
    pub fn visit_calls(&self, visit: &mut impl FnMut(Function, &str)) {
        match self {
            Expr::Call { function, argument } => visit(*function, argument),
            Expr::Compare { lhs, rhs, .. } => {
                lhs.visit_calls(visit);
                rhs.visit_calls(visit);
            }
            Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                lhs.visit_calls(visit);
                rhs.visit_calls(visit);
            }
            Expr::Not(inner) => inner.visit_calls(visit),
            Expr::Int(_) | Expr::Str(_) | Expr::Var(_) => {}
        }
    }
}

/// Typed parse failures, surfaced verbatim in validation reports.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected character `{found}` at byte {position}")]
    UnexpectedCharacter { position: usize, found: char },

    #[error("unexpected token `{found}` at byte {position}")]
    UnexpectedToken { position: usize, found: String },

    #[error("expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("function `{function}` takes a single quoted string argument")]
    BadArgument { function: String },
}

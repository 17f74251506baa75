//! Pure expression evaluation against the engine state.

use crate::state::EngineState;

use super::{CompareOp, Expr, Function, Variable};

/// Runtime value of a sub-expression.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
}

/// Evaluates a parsed expression to a boolean.
///
/// Validated packs cannot produce type mismatches that matter here, but the
/// evaluator stays total regardless: a non-boolean result or a mismatched
/// comparison evaluates to `false` rather than panicking.
pub fn holds(expr: &Expr, state: &EngineState) -> bool {
    match evaluate(expr, state) {
        Value::Bool(value) => value,
        Value::Int(_) | Value::Str(_) => false,
    }
}

fn evaluate(expr: &Expr, state: &EngineState) -> Value {
    match expr {
        Expr::Int(value) => Value::Int(*value),
        Expr::Str(value) => Value::Str(value.clone()),
        Expr::Var(variable) => Value::Int(read_variable(*variable, state)),
        Expr::Call { function, argument } => {
            Value::from_call(*function, argument, state)
        }
        Expr::Compare { op, lhs, rhs } => {
            let lhs = evaluate(lhs, state);
            let rhs = evaluate(rhs, state);
            Value::Bool(compare(*op, &lhs, &rhs))
        }
        Expr::And(lhs, rhs) => Value::Bool(holds(lhs, state) && holds(rhs, state)),
        Expr::Or(lhs, rhs) => Value::Bool(holds(lhs, state) || holds(rhs, state)),
        Expr::Not(inner) => Value::Bool(!holds(inner, state)),
    }
}

fn read_variable(variable: Variable, state: &EngineState) -> i64 {
    let resources = state.resources();
    match variable {
        Variable::Health => i64::from(resources.health.current),
        Variable::MaxHealth => i64::from(resources.health.maximum),
        Variable::Faith => i64::from(resources.faith.current),
        Variable::MaxFaith => i64::from(resources.faith.maximum),
        Variable::Balance => i64::from(resources.balance),
    }
}

impl Value {
    fn from_call(function: Function, argument: &str, state: &EngineState) -> Value {
        match function {
            Function::Flag => Value::Bool(state.flag(argument)),
            Function::QuestActive => {
                Value::Bool(state.quests().is_active(&argument.into()))
            }
            Function::QuestCompleted => {
                Value::Bool(state.quests().is_completed(&argument.into()))
            }
            Function::EventCompleted => {
                Value::Bool(state.completed_events().contains(&argument.into()))
            }
            Function::RegionDiscovered => {
                Value::Bool(state.world().discovered.contains(&argument.into()))
            }
            Function::RegionStatus => {
                Value::Str(state.world().status_of(&argument.into()).to_string())
            }
        }
    }
}

fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(lhs), Value::Int(rhs)) => match op {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        },
        (Value::Str(lhs), Value::Str(rhs)) => match op {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            // Ordering over authored strings is meaningless.
            _ => false,
        },
        (Value::Bool(lhs), Value::Bool(rhs)) => match op {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            _ => false,
        },
        _ => false,
    }
}

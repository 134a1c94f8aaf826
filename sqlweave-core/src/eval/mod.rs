//! Condition expression compiler and evaluator.
//!
//! Expressions are compiled once at load time and evaluated against the
//! parameter scope on every render. The dialect is deliberately small:
//! comparisons, logical connectives, arithmetic, literals, and dotted paths
//! resolved through the scope.

mod grammar;

use std::cmp::Ordering;
use std::sync::LazyLock;

use pest::iterators::Pairs;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use smol_str::SmolStr;
use thiserror::Error;

use crate::param::Parameter;
use crate::value::ParamValue;

pub use grammar::{ExprParser, Rule};

/// Errors raised while compiling or evaluating an expression.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The expression text did not parse.
    #[error("syntax error in expression `{expression}`: {message}")]
    Syntax {
        expression: String,
        message: String,
    },

    /// A path in the expression resolved to nothing.
    #[error("variable `{0}` not found")]
    MissingVariable(SmolStr),

    /// A binary operator was applied to incompatible operand kinds.
    #[error("operator `{op}` not supported between {lhs} and {rhs}")]
    InvalidOperands {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// A unary operator was applied to an unsupported operand kind.
    #[error("operator `{op}` not supported on {operand}")]
    InvalidUnary {
        op: &'static str,
        operand: &'static str,
    },

    /// Integer division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The value a condition produced has no defined truthiness.
    #[error("{kind} value has no truth value")]
    Truthiness { kind: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

#[derive(Debug, Clone)]
enum Expr {
    Literal(ParamValue),
    Path(SmolStr),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

static PRATT: LazyLock<PrattParser<Rule>> = LazyLock::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::or, Assoc::Left))
        .op(Op::infix(Rule::and, Assoc::Left))
        .op(Op::infix(Rule::eq, Assoc::Left) | Op::infix(Rule::ne, Assoc::Left))
        .op(Op::infix(Rule::lt, Assoc::Left)
            | Op::infix(Rule::le, Assoc::Left)
            | Op::infix(Rule::gt, Assoc::Left)
            | Op::infix(Rule::ge, Assoc::Left))
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left) | Op::infix(Rule::div, Assoc::Left))
        .op(Op::prefix(Rule::not) | Op::prefix(Rule::neg))
});

/// A compiled, reusable condition expression.
#[derive(Debug, Clone)]
pub struct Expression {
    source: SmolStr,
    root: Expr,
}

impl Expression {
    /// Compile an expression from its source text.
    pub fn compile(source: &str) -> Result<Self, EvalError> {
        let mut pairs =
            ExprParser::parse(Rule::expression, source).map_err(|e| EvalError::Syntax {
                expression: source.to_string(),
                message: e.to_string(),
            })?;
        // The grammar guarantees one `expression` pair wrapping a single `expr`.
        let expr = pairs
            .next()
            .unwrap()
            .into_inner()
            .find(|pair| pair.as_rule() == Rule::expr)
            .unwrap();
        let root = build_expr(expr.into_inner())?;
        Ok(Self {
            source: SmolStr::new(source),
            root,
        })
    }

    /// The original expression text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a parameter scope.
    pub fn eval(&self, scope: &dyn Parameter) -> Result<ParamValue, EvalError> {
        eval_expr(&self.root, scope)
    }

    /// Evaluate and reduce to a truth value.
    pub fn truthy(&self, scope: &dyn Parameter) -> Result<bool, EvalError> {
        let value = self.eval(scope)?;
        value
            .truthy()
            .ok_or_else(|| EvalError::Truthiness { kind: value.kind() })
    }
}

fn build_expr(pairs: Pairs<'_, Rule>) -> Result<Expr, EvalError> {
    PRATT
        .map_primary(|primary| match primary.as_rule() {
            Rule::group => {
                // A group wraps exactly one `expr`.
                let inner = primary.into_inner().next().unwrap();
                build_expr(inner.into_inner())
            }
            Rule::integer => {
                let text = primary.as_str();
                let value = text
                    .parse::<i64>()
                    .map(ParamValue::Int)
                    .unwrap_or_else(|_| ParamValue::Float(text.parse::<f64>().unwrap_or_default()));
                Ok(Expr::Literal(value))
            }
            Rule::float => Ok(Expr::Literal(ParamValue::Float(
                primary.as_str().parse().unwrap_or_default(),
            ))),
            Rule::string => {
                let text = primary.as_str();
                Ok(Expr::Literal(ParamValue::String(
                    text[1..text.len() - 1].to_string(),
                )))
            }
            Rule::boolean => Ok(Expr::Literal(ParamValue::Bool(primary.as_str() == "true"))),
            Rule::path => Ok(Expr::Path(SmolStr::new(primary.as_str()))),
            rule => unreachable!("unexpected primary rule {rule:?}"),
        })
        .map_prefix(|op, operand| {
            let op = match op.as_rule() {
                Rule::not => UnaryOp::Not,
                Rule::neg => UnaryOp::Neg,
                rule => unreachable!("unexpected prefix rule {rule:?}"),
            };
            Ok(Expr::Unary {
                op,
                operand: Box::new(operand?),
            })
        })
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::eq => BinaryOp::Eq,
                Rule::ne => BinaryOp::Ne,
                Rule::lt => BinaryOp::Lt,
                Rule::le => BinaryOp::Le,
                Rule::gt => BinaryOp::Gt,
                Rule::ge => BinaryOp::Ge,
                Rule::and => BinaryOp::And,
                Rule::or => BinaryOp::Or,
                Rule::add => BinaryOp::Add,
                Rule::sub => BinaryOp::Sub,
                Rule::mul => BinaryOp::Mul,
                Rule::div => BinaryOp::Div,
                rule => unreachable!("unexpected infix rule {rule:?}"),
            };
            Ok(Expr::Binary {
                op,
                lhs: Box::new(lhs?),
                rhs: Box::new(rhs?),
            })
        })
        .parse(pairs)
}

fn eval_expr(expr: &Expr, scope: &dyn Parameter) -> Result<ParamValue, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Path(path) => scope
            .get(path)
            .ok_or_else(|| EvalError::MissingVariable(path.clone())),
        Expr::Unary { op, operand } => {
            let value = eval_expr(operand, scope)?;
            match op {
                UnaryOp::Not => {
                    let truth = value
                        .truthy()
                        .ok_or_else(|| EvalError::Truthiness { kind: value.kind() })?;
                    Ok(ParamValue::Bool(!truth))
                }
                UnaryOp::Neg => match value {
                    ParamValue::Int(i) => Ok(ParamValue::Int(-i)),
                    ParamValue::Uint(u) => Ok(ParamValue::Int(-(u as i64))),
                    ParamValue::Float(f) => Ok(ParamValue::Float(-f)),
                    other => Err(EvalError::InvalidUnary {
                        op: "-",
                        operand: other.kind(),
                    }),
                },
            }
        }
        Expr::Binary { op, lhs, rhs } => match op {
            BinaryOp::And => {
                let lhs = eval_expr(lhs, scope)?;
                if !truth_of(&lhs)? {
                    return Ok(ParamValue::Bool(false));
                }
                let rhs = eval_expr(rhs, scope)?;
                Ok(ParamValue::Bool(truth_of(&rhs)?))
            }
            BinaryOp::Or => {
                let lhs = eval_expr(lhs, scope)?;
                if truth_of(&lhs)? {
                    return Ok(ParamValue::Bool(true));
                }
                let rhs = eval_expr(rhs, scope)?;
                Ok(ParamValue::Bool(truth_of(&rhs)?))
            }
            _ => {
                let lhs = eval_expr(lhs, scope)?;
                let rhs = eval_expr(rhs, scope)?;
                apply_binary(*op, lhs, rhs)
            }
        },
    }
}

fn truth_of(value: &ParamValue) -> Result<bool, EvalError> {
    value
        .truthy()
        .ok_or_else(|| EvalError::Truthiness { kind: value.kind() })
}

/// Numeric view used for cross-kind comparison and arithmetic.
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i128),
    Float(f64),
}

fn as_num(value: &ParamValue) -> Option<Num> {
    match value {
        ParamValue::Int(i) => Some(Num::Int(*i as i128)),
        ParamValue::Uint(u) => Some(Num::Int(*u as i128)),
        ParamValue::Float(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

fn apply_binary(op: BinaryOp, lhs: ParamValue, rhs: ParamValue) -> Result<ParamValue, EvalError> {
    match op {
        BinaryOp::Eq => Ok(ParamValue::Bool(values_equal(op, &lhs, &rhs)?)),
        BinaryOp::Ne => Ok(ParamValue::Bool(!values_equal(op, &lhs, &rhs)?)),
        BinaryOp::Lt => Ok(ParamValue::Bool(
            values_order(op, &lhs, &rhs)? == Ordering::Less,
        )),
        BinaryOp::Le => Ok(ParamValue::Bool(
            values_order(op, &lhs, &rhs)? != Ordering::Greater,
        )),
        BinaryOp::Gt => Ok(ParamValue::Bool(
            values_order(op, &lhs, &rhs)? == Ordering::Greater,
        )),
        BinaryOp::Ge => Ok(ParamValue::Bool(
            values_order(op, &lhs, &rhs)? != Ordering::Less,
        )),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => arith(op, lhs, rhs),
        BinaryOp::And | BinaryOp::Or => unreachable!("logical operators are short-circuited"),
    }
}

fn values_equal(op: BinaryOp, lhs: &ParamValue, rhs: &ParamValue) -> Result<bool, EvalError> {
    match (lhs, rhs) {
        (ParamValue::Null, ParamValue::Null) => Ok(true),
        (ParamValue::Null, _) | (_, ParamValue::Null) => Ok(false),
        (ParamValue::Bool(a), ParamValue::Bool(b)) => Ok(a == b),
        (ParamValue::String(a), ParamValue::String(b)) => Ok(a == b),
        (ParamValue::List(a), ParamValue::List(b)) => Ok(a == b),
        (ParamValue::Map(a), ParamValue::Map(b)) => Ok(a == b),
        _ => match (as_num(lhs), as_num(rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(a == b),
            (Some(a), Some(b)) => Ok(to_f64(a) == to_f64(b)),
            _ => Err(EvalError::InvalidOperands {
                op: op.symbol(),
                lhs: lhs.kind(),
                rhs: rhs.kind(),
            }),
        },
    }
}

fn values_order(op: BinaryOp, lhs: &ParamValue, rhs: &ParamValue) -> Result<Ordering, EvalError> {
    if let (ParamValue::String(a), ParamValue::String(b)) = (lhs, rhs) {
        return Ok(a.cmp(b));
    }
    let mismatch = || EvalError::InvalidOperands {
        op: op.symbol(),
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    };
    match (as_num(lhs).ok_or_else(mismatch)?, as_num(rhs).ok_or_else(mismatch)?) {
        (Num::Int(a), Num::Int(b)) => Ok(a.cmp(&b)),
        (a, b) => to_f64(a).partial_cmp(&to_f64(b)).ok_or_else(mismatch),
    }
}

fn to_f64(num: Num) -> f64 {
    match num {
        Num::Int(i) => i as f64,
        Num::Float(f) => f,
    }
}

fn arith(op: BinaryOp, lhs: ParamValue, rhs: ParamValue) -> Result<ParamValue, EvalError> {
    if op == BinaryOp::Add {
        if let (ParamValue::String(a), ParamValue::String(b)) = (&lhs, &rhs) {
            return Ok(ParamValue::String(format!("{a}{b}")));
        }
    }
    let mismatch = || EvalError::InvalidOperands {
        op: op.symbol(),
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    };
    let a = as_num(&lhs).ok_or_else(mismatch)?;
    let b = as_num(&rhs).ok_or_else(mismatch)?;
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => {
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a / b
                }
                _ => unreachable!("non-arithmetic operator in arith()"),
            };
            Ok(i64::try_from(result)
                .map(ParamValue::Int)
                .unwrap_or(ParamValue::Float(result as f64)))
        }
        (a, b) => {
            let (a, b) = (to_f64(a), to_f64(b));
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                _ => unreachable!("non-arithmetic operator in arith()"),
            };
            Ok(ParamValue::Float(result))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    fn truthy(expr: &str, scope: &dyn Parameter) -> bool {
        Expression::compile(expr).unwrap().truthy(scope).unwrap()
    }

    #[test]
    fn test_comparisons() {
        let p = params! { "id" => 3, "name" => "ada" };
        assert!(truthy("id != 0", &p));
        assert!(truthy("id == 3", &p));
        assert!(truthy("id >= 3", &p));
        assert!(!truthy("id < 3", &p));
        assert!(truthy("name == 'ada'", &p));
        assert!(truthy("name != \"bob\"", &p));
    }

    #[test]
    fn test_logical_operators() {
        let p = params! { "a" => 0, "b" => 5 };
        assert!(!truthy("a > 0 && b > 0", &p));
        assert!(truthy("a > 0 || b > 0", &p));
        assert!(truthy("!(a > 0)", &p));
        assert!(truthy("!a", &p));
    }

    #[test]
    fn test_short_circuit_skips_missing_rhs() {
        let p = params! { "a" => 1 };
        // `missing` never resolves, but the left side already decides.
        assert!(truthy("a == 1 || missing == 2", &p));
    }

    #[test]
    fn test_arithmetic() {
        let p = params! { "a" => 7, "b" => 2 };
        assert!(truthy("a + b == 9", &p));
        assert!(truthy("a / b == 3", &p));
        assert!(truthy("a * b - 14 == 0", &p));
        assert!(truthy("a + 0.5 == 7.5", &p));
        assert!(truthy("-a == 0 - 7", &p));
    }

    #[test]
    fn test_string_concat() {
        let p = params! { "first" => "a", "last" => "b" };
        assert!(truthy("first + last == 'ab'", &p));
    }

    #[test]
    fn test_dotted_path() {
        let p = crate::param::Params::from_json(serde_json::json!({"user": {"age": 21}}));
        assert!(truthy("user.age >= 18", &p));
    }

    #[test]
    fn test_truthiness_of_bare_values() {
        let p = params! { "empty" => "", "text" => "x", "zero" => 0 };
        assert!(!truthy("empty", &p));
        assert!(truthy("text", &p));
        assert!(!truthy("zero", &p));
    }

    #[test]
    fn test_missing_variable_is_error() {
        let p = params! { "a" => 1 };
        let expr = Expression::compile("missing == 1").unwrap();
        assert!(matches!(
            expr.truthy(&p),
            Err(EvalError::MissingVariable(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_division_by_zero() {
        let p = params! { "a" => 1, "b" => 0 };
        let expr = Expression::compile("a / b == 0").unwrap();
        assert!(matches!(expr.eval(&p), Err(EvalError::DivisionByZero)));
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let p = params! { "a" => 1, "s" => "x" };
        let expr = Expression::compile("a < s").unwrap();
        assert!(matches!(expr.eval(&p), Err(EvalError::InvalidOperands { .. })));
    }

    #[test]
    fn test_truthiness_error_for_list() {
        let p = params! { "xs" => vec![1, 2] };
        let expr = Expression::compile("xs").unwrap();
        assert!(matches!(expr.truthy(&p), Err(EvalError::Truthiness { .. })));
    }

    #[test]
    fn test_compile_error() {
        assert!(matches!(
            Expression::compile("a =="),
            Err(EvalError::Syntax { .. })
        ));
    }

    #[test]
    fn test_precedence() {
        let p = params! { "a" => 2, "b" => 3 };
        assert!(truthy("a + b * 2 == 8", &p));
        assert!(truthy("(a + b) * 2 == 10", &p));
    }
}

//! Pest grammar parser for condition expressions.

use pest_derive::Parser;

/// The expression parser.
#[derive(Parser)]
#[grammar = "eval/expr.pest"]
pub struct ExprParser;

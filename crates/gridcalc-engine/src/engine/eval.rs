//! Formula evaluation.
//!
//! A formula is either a range aggregate (`=SUM(A1:B3)`) or an arithmetic
//! expression over cell references (`=(A1+B2)*C3`). References are resolved
//! against the [`Grid`] passed in, their current values are substituted into
//! the formula text, and the result is computed by the safe parser in
//! [`super::expr`].
//!
//! Evaluation never fails: any reference or arithmetic error turns the result
//! into a literal-echo of the formula.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use super::cell::CellValue;
use super::cell_ref::CellRef;
use super::expr::eval_arithmetic;
use super::format::format_operand;
use super::grid::Grid;
use crate::error::{EngineError, Result};

/// Marks raw input as a formula.
pub const FORMULA_MARKER: char = '=';

/// Prefix of the range aggregate formula.
pub const RANGE_KEYWORD: &str = "=SUM";

/// Result of evaluating one formula.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub value: CellValue,
    /// Every cell the formula resolved, whether or not evaluation succeeded.
    pub dependencies: BTreeSet<CellRef>,
}

/// Normalize raw input into a formula, or None if it is a plain value.
pub fn normalize_formula(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with(FORMULA_MARKER) {
        Some(trimmed.to_uppercase())
    } else {
        None
    }
}

/// Evaluate the formula stored in a cell.
///
/// Cells without a formula keep their stored value and have no dependencies.
pub fn evaluate(grid: &Grid, at: &CellRef) -> Evaluation {
    match grid.get(at).and_then(|c| c.formula.as_deref()) {
        Some(formula) => evaluate_formula(grid, formula),
        None => Evaluation {
            value: grid.value(at).clone(),
            dependencies: BTreeSet::new(),
        },
    }
}

/// Evaluate a normalized formula against the grid.
pub fn evaluate_formula(grid: &Grid, formula: &str) -> Evaluation {
    let mut dependencies = BTreeSet::new();
    let result = if formula.starts_with(RANGE_KEYWORD) {
        eval_range(grid, formula, &mut dependencies)
    } else {
        eval_expression(grid, formula, &mut dependencies)
    };

    let value = match result {
        Ok(n) => CellValue::Number(n),
        Err(e) => {
            log::trace!("formula {} echoed: {}", formula, e);
            CellValue::Echo(formula.to_string())
        }
    };
    Evaluation {
        value,
        dependencies,
    }
}

/// `=SUM(X:Y)`: sum every cell in the rectangle between X and Y.
fn eval_range(grid: &Grid, formula: &str, deps: &mut BTreeSet<CellRef>) -> Result<f64> {
    let args = formula[RANGE_KEYWORD.len()..]
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| EngineError::Evaluation(format!("malformed range in '{}'", formula)))?;

    let mut endpoints = args.split(':');
    let (Some(first), Some(second), None) = (endpoints.next(), endpoints.next(), endpoints.next())
    else {
        return Err(EngineError::Evaluation(format!(
            "expected two range endpoints in '{}'",
            formula
        )));
    };

    let cells = grid.resolve_range(first.trim(), second.trim())?;
    deps.extend(cells.iter().copied());

    let mut sum = 0.0;
    for at in &cells {
        sum += match grid.value(at) {
            CellValue::Empty | CellValue::Text(_) => 0.0,
            CellValue::Number(n) => *n,
            CellValue::Circular => return Err(EngineError::CircularReference(at.to_string())),
            CellValue::Echo(_) => {
                return Err(EngineError::Evaluation(format!(
                    "{} does not hold a number",
                    at
                )));
            }
        };
    }

    if !sum.is_finite() {
        return Err(EngineError::Evaluation(format!("sum overflow in '{}'", formula)));
    }
    Ok(sum)
}

/// Arithmetic over references: substitute each resolved reference with its
/// value, then evaluate the remaining expression.
fn eval_expression(grid: &Grid, formula: &str, deps: &mut BTreeSet<CellRef>) -> Result<f64> {
    let expression = formula.strip_prefix(FORMULA_MARKER).unwrap_or(formula);

    let mut candidates: Vec<(&str, CellRef)> = Vec::new();
    for token in operator_re().split(expression) {
        let token = token.trim();
        if token.is_empty() || candidates.iter().any(|(t, _)| *t == token) {
            continue;
        }
        // Tokens that are not cell ids (numbers, garbage) are left in place.
        if let Ok(at) = grid.resolve_id(token) {
            candidates.push((token, at));
        }
    }

    // Longest ids first so "A1" is never substituted inside "A10".
    candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    deps.extend(candidates.iter().map(|(_, at)| *at));

    let mut substituted = expression.to_string();
    for (token, at) in &candidates {
        let operand = match grid.value(at) {
            CellValue::Empty => "0".to_string(),
            CellValue::Number(n) => format_operand(*n),
            CellValue::Circular => return Err(EngineError::CircularReference(at.to_string())),
            _ => {
                return Err(EngineError::Evaluation(format!(
                    "{} does not hold a number",
                    at
                )));
            }
        };
        substituted = replace_reference(&substituted, token, &operand);
    }

    eval_arithmetic(&substituted)
}

/// Characters a formula is split on to find candidate references.
fn operator_re() -> &'static Regex {
    static OPERATOR_RE: OnceLock<Regex> = OnceLock::new();
    OPERATOR_RE.get_or_init(|| {
        Regex::new(r"[+\-*/()]").expect("operator split regex must compile")
    })
}

/// Replace whole occurrences of `id` in `text`: an occurrence preceded by a
/// letter or digit, or followed by a digit, belongs to a different token.
fn replace_reference(text: &str, id: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(index) = rest.find(id) {
        let before = rest[..index].chars().last().or(prev);
        let after = rest[index + id.len()..].chars().next();
        let bounded = !before.is_some_and(|c| c.is_ascii_alphanumeric())
            && !after.is_some_and(|c| c.is_ascii_digit());

        out.push_str(&rest[..index]);
        if bounded {
            out.push_str(replacement);
        } else {
            out.push_str(id);
        }
        prev = id.chars().last();
        rest = &rest[index + id.len()..];
    }
    out.push_str(rest);
    out
}

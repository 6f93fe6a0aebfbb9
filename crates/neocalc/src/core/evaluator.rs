//! Expression evaluation and result formatting
//!
//! The candidate expression is normalized (display glyphs to ASCII),
//! stripped down to `0-9 . + - * / ( )`, parsed and evaluated. Only the
//! stripped string ever reaches the parser.

use crate::core::history::{History, HistoryEntry};
use crate::core::input::{CalculatorState, InputMode};
use crate::core::parser::{AstNode, Parser};
use crate::core::{CalcError, CalcResult, DEFAULT_DECIMAL_PLACES};

/// Replaces display-only glyphs with their arithmetic equivalents
#[must_use]
pub fn normalize(expression: &str) -> String {
    expression
        .chars()
        .map(|ch| match ch {
            '×' => '*',
            '÷' => '/',
            ',' => '.',
            other => other,
        })
        .collect()
}

/// Drops every character outside `0-9 . + - * / ( )`
#[must_use]
pub fn sanitize(expression: &str) -> String {
    expression
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '+' | '-' | '*' | '/' | '(' | ')'))
        .collect()
}

/// Formats a numeric result for display
///
/// The value is rounded to `decimal_places` (exact ties away from zero),
/// read back, and printed in the shortest form that parses to the same
/// number. Trailing zeros, a bare decimal point and `-0` never appear.
#[must_use]
pub fn format_result(value: f64, decimal_places: usize) -> String {
    let rounded = if value.fract() == 0.0 || !value.is_finite() {
        value
    } else {
        let fixed = round_half_away(value.abs(), decimal_places);
        let magnitude: f64 = fixed.parse().unwrap_or(value.abs());
        magnitude.copysign(value)
    };

    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Rounds a non-negative value to `places` decimals
///
/// `{:.N}` rounds exact ties to even; a tie is detected from the binary
/// representation and rounded up instead.
fn round_half_away(value: f64, places: usize) -> String {
    if !is_decimal_tie(value, places) {
        return format!("{value:.places$}");
    }

    // A tie terminates at digit `places + 1`, so this rendering is exact
    let exact = format!("{value:.prec$}", prec = places + 1);
    let truncated = exact[..exact.len() - 1].trim_end_matches('.');
    increment_last_digit(truncated)
}

/// Returns true when `value * 10^places` has a fractional part of exactly 0.5
fn is_decimal_tie(value: f64, places: usize) -> bool {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return false;
    }
    // value = odd * 2^lowest; times 10^p = odd * 5^p * 2^(lowest + p)
    let lowest = exponent + i64::from(mantissa.trailing_zeros());
    lowest + places as i64 == -1
}

/// Adds one unit in the last place of a plain decimal string
fn increment_last_digit(digits: &str) -> String {
    let mut out: Vec<u8> = digits.bytes().collect();
    let mut carry = true;
    for i in (0..out.len()).rev() {
        match out[i] {
            b'.' => {}
            b'9' => out[i] = b'0',
            _ => {
                out[i] += 1;
                carry = false;
                break;
            }
        }
    }
    if carry {
        out.insert(0, b'1');
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Outcome of an evaluate request that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Nothing was pending; state untouched
    Skipped,
    /// Evaluation succeeded and this entry was recorded
    Completed(HistoryEntry),
}

/// Evaluator for calculator expressions
#[derive(Debug, Clone)]
pub struct Evaluator {
    decimal_places: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Creates a new evaluator with default precision
    #[must_use]
    pub fn new() -> Self {
        Self::with_decimal_places(DEFAULT_DECIMAL_PLACES)
    }

    /// Creates an evaluator rounding non-integer results to `decimal_places`
    #[must_use]
    pub fn with_decimal_places(decimal_places: usize) -> Self {
        Self { decimal_places }
    }

    /// Evaluates an AST node
    pub fn evaluate_ast(&self, node: &AstNode) -> CalcResult<f64> {
        match node {
            AstNode::Number(n) => Ok(*n),
            AstNode::Negate(inner) => Ok(-self.evaluate_ast(inner)?),
            AstNode::BinaryOp { left, op, right } => {
                let left_val = self.evaluate_ast(left)?;
                let right_val = self.evaluate_ast(right)?;
                op.apply(left_val, right_val)
            }
        }
    }

    /// Normalizes, sanitizes and evaluates a display expression
    pub fn evaluate_str(&self, expression: &str) -> CalcResult<f64> {
        let sanitized = sanitize(&normalize(expression));
        if sanitized.is_empty() {
            return Err(CalcError::malformed("Empty expression"));
        }

        let ast = Parser::parse_str(&sanitized)?;
        let value = self.evaluate_ast(&ast)?;

        if !value.is_finite() {
            return Err(CalcError::malformed(format!("Non-finite result: {value}")));
        }
        Ok(value)
    }

    /// Evaluates and formats a display expression
    pub fn evaluate_formatted(&self, expression: &str) -> CalcResult<String> {
        self.evaluate_str(expression)
            .map(|value| format_result(value, self.decimal_places))
    }

    /// Evaluates `expression + current_value` and folds the outcome back
    /// into the state and the history
    ///
    /// On failure the display shows the error sentinel, the pending
    /// expression is dropped and the error is returned for the caller to
    /// surface.
    pub fn evaluate(
        &self,
        state: &mut CalculatorState,
        history: &mut History,
    ) -> CalcResult<Evaluation> {
        if state.expression.is_empty() && state.last_operation.is_none() {
            return Ok(Evaluation::Skipped);
        }

        let candidate = format!("{}{}", state.expression, state.current_value);

        match self.evaluate_formatted(&candidate) {
            Ok(formatted) => {
                let entry = HistoryEntry::new(candidate, formatted.clone());
                history.push(entry.clone());

                state.current_value = formatted;
                state.expression.clear();
                state.last_operation = None;
                state.mode = InputMode::AwaitingNewOperand;

                Ok(Evaluation::Completed(entry))
            }
            Err(e) => {
                state.current_value = state.error_sentinel().to_string();
                state.expression.clear();
                state.mode = InputMode::AwaitingNewOperand;
                Err(e)
            }
        }
    }
}

//! Property-based tests for input accumulation, formatting and history

#![allow(clippy::unwrap_used)]

use neocalc::core::input::parse_float;
use neocalc::prelude::*;
use proptest::prelude::*;

// ===== Strategy definitions =====

/// Generate any valid digit (0-9)
fn digit_strategy() -> impl Strategy<Value = u8> {
    0u8..=9u8
}

/// A digit or a decimal point press
fn entry_action_strategy() -> impl Strategy<Value = KeypadAction> {
    prop_oneof![
        4 => digit_strategy().prop_map(KeypadAction::Digit),
        1 => Just(KeypadAction::Decimal),
    ]
}

/// Decimal values with at most six fractional digits
fn short_decimal_strategy() -> impl Strategy<Value = f64> {
    (-1_000_000_000i64..=1_000_000_000i64, 0i32..=6i32)
        .prop_map(|(mantissa, scale)| mantissa as f64 / 10f64.powi(scale))
}

/// Decimals with a large integer part and at most three fractional digits
fn wide_decimal_strategy() -> impl Strategy<Value = (f64, usize)> {
    (-10_000_000_000_000i64..=10_000_000_000_000i64, 0usize..=3usize)
        .prop_map(|(mantissa, scale)| (mantissa as f64 / 10f64.powi(scale as i32), scale))
}

fn apply(state: &mut CalculatorState, action: KeypadAction) {
    match action {
        KeypadAction::Digit(d) => state.input_digit(d),
        KeypadAction::Decimal => state.input_decimal_point(),
        _ => unreachable!("entry strategy only yields digits and decimals"),
    }
}

// ===== Input accumulation properties =====

proptest! {
    /// Typing digits on a fresh display concatenates them, minus leading zeros
    #[test]
    fn prop_digits_concatenate(digits in prop::collection::vec(digit_strategy(), 1..20)) {
        let mut state = CalculatorState::new();
        for d in &digits {
            state.input_digit(*d);
        }

        let typed: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        let expected = match typed.trim_start_matches('0') {
            "" => "0",
            rest => rest,
        };
        prop_assert_eq!(state.current_value(), expected);
    }

    /// No sequence of digit and decimal presses yields two decimal points
    #[test]
    fn prop_single_decimal_point(actions in prop::collection::vec(entry_action_strategy(), 0..30)) {
        let mut state = CalculatorState::new();
        for action in actions {
            apply(&mut state, action);
        }
        prop_assert!(state.current_value().matches('.').count() <= 1);
        prop_assert!(parse_float(state.current_value()).is_some());
    }

    /// Operators never leave the display empty
    #[test]
    fn prop_operator_keeps_display(
        digits in prop::collection::vec(digit_strategy(), 0..5),
        op_index in 0usize..4,
    ) {
        let op = [Operator::Add, Operator::Subtract, Operator::Multiply, Operator::Divide][op_index];
        let mut state = CalculatorState::new();
        for d in digits {
            state.input_digit(d);
        }
        let before = state.current_value().to_string();
        state.input_operator(op);

        prop_assert_eq!(state.current_value(), before.as_str());
        let suffix = format!(" {} ", op.glyph());
        prop_assert!(state.expression().ends_with(&suffix));
        prop_assert_eq!(state.mode(), InputMode::AwaitingNewOperand);
    }
}

// ===== Formatting properties =====

proptest! {
    /// Formatting an already formatted value changes nothing
    #[test]
    fn prop_format_idempotent(value in -1.0e6f64..1.0e6f64) {
        let once = format_result(value, 10);
        let reparsed = parse_float(&once).unwrap();
        prop_assert_eq!(format_result(reparsed, 10), once);
    }

    /// Values with at most ten decimals survive format then parse
    #[test]
    fn prop_format_round_trip(value in short_decimal_strategy()) {
        let formatted = format_result(value, 10);
        prop_assert_eq!(parse_float(&formatted), Some(value));
    }

    /// Large operands keep the decimals they were typed with
    #[test]
    fn prop_format_no_float_noise((value, scale) in wide_decimal_strategy()) {
        let formatted = format_result(value, 10);
        let decimals = formatted.split_once('.').map_or(0, |(_, frac)| frac.len());
        prop_assert!(decimals <= scale, "{} rendered as {}", value, formatted);
        prop_assert_eq!(formatted.parse::<f64>().unwrap(), value);
    }

    /// Formatted results never carry trailing zeros after a decimal point
    #[test]
    fn prop_format_no_trailing_zeros(value in -1.0e6f64..1.0e6f64) {
        let formatted = format_result(value, 10);
        if formatted.contains('.') {
            prop_assert!(!formatted.ends_with('0'));
            prop_assert!(!formatted.ends_with('.'));
        }
        prop_assert_ne!(formatted.as_str(), "-0");
    }
}

// ===== History properties =====

proptest! {
    /// History never exceeds capacity and keeps the newest entries
    #[test]
    fn prop_history_bounded(count in 0usize..30) {
        let mut history = History::new();
        for i in 0..count {
            history.push(HistoryEntry::new(format!("{i} + 0"), i.to_string()));
        }

        prop_assert_eq!(history.len(), count.min(10));
        if count > 0 {
            let expected_latest = (count - 1).to_string();
            prop_assert_eq!(history.latest().unwrap().result(), expected_latest.as_str());
            let expected_oldest = count.saturating_sub(10).to_string();
            prop_assert_eq!(history.oldest().unwrap().result(), expected_oldest.as_str());
        }
    }

    /// Evaluating through the calculator obeys the same bound
    #[test]
    fn prop_calculator_history_bounded(operands in prop::collection::vec(1u8..=9u8, 1..15)) {
        let mut calc = Calculator::new();
        for d in &operands {
            calc.dispatch(KeypadAction::Digit(*d)).unwrap();
            calc.dispatch(KeypadAction::Operator(Operator::Add)).unwrap();
            calc.dispatch(KeypadAction::Digit(1)).unwrap();
            calc.dispatch(KeypadAction::Evaluate).unwrap();
        }

        prop_assert_eq!(calc.history().len(), operands.len().min(10));
        let expected = (operands[operands.len() - 1] + 1).to_string();
        prop_assert_eq!(calc.history().latest().unwrap().result(), expected.as_str());
    }
}

// ===== Sanitization properties =====

proptest! {
    /// Letters never reach the evaluator
    #[test]
    fn prop_letters_stripped(text in "[a-zA-Z ]{0,12}", n in 0u32..1000) {
        let expression = format!("{text}{n}{text}");
        let value = Evaluator::new().evaluate_str(&expression).unwrap();
        prop_assert_eq!(value, f64::from(n));
    }
}

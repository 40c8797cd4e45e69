//! Coordinate expression language
//!
//! Position and size values in skin documents are small arithmetic
//! expressions over literals and a handful of symbols:
//!
//! - `e` the parent extent, `c` half of it, `center` the centering offset
//! - `N%` a percentage of the extent
//! - `Nw` / `Nh` multiples of the current font's char width / line height
//! - `f` the global skin factor
//!
//! e.g. `10+center-10w+4%` or `3*(e-c/2)`.

pub mod ast;
pub mod eval;
pub mod lexer;

// The lalrpop generated parser (generated at build time)
lalrpop_mod!(#[allow(clippy::all)] pub expr_parser, "/expr/expr.rs");

use thiserror::Error;

use crate::errors::Diagnostics;
use crate::types::{AxisScale, FontMetrics};

pub use ast::{Expr, Symbol, Unit};
pub use eval::{eval, EvalEnv};
pub use lexer::{Lexer, LexerError, Token};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("Coordinate '{input}' cannot be evaluated: {message}")]
    Syntax { input: String, message: String },
    #[error("'w' or 'h' is being used in a field where neither is valid")]
    MissingFontMetrics,
    #[error("'{0}' is not available in this context")]
    Unbound(&'static str),
    #[error("division by zero")]
    DivisionByZero,
}

/// Parse an expression into its AST
pub fn parse(input: &str) -> Result<Box<Expr>, CoordinateError> {
    expr_parser::ExprParser::new()
        .parse(Lexer::new(input))
        .map_err(|e| CoordinateError::Syntax {
            input: input.to_string(),
            message: format!("{:?}", e),
        })
}

/// Evaluate a position/size coordinate along one axis
///
/// Returns `Ok(None)` for `*`, which leaves the value to the caller.
/// `center` and `e` short-circuit to actual pixels; everything else is
/// computed in declared-resolution units and scaled back by `scale`.
pub fn evaluate(
    input: &str,
    extent: i32,
    object_size: i32,
    font: Option<FontMetrics>,
    scale: AxisScale,
    skin_factor: f64,
) -> Result<Option<i32>, CoordinateError> {
    let s = input.trim();

    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        let value = s.parse::<i32>().map_err(|e| CoordinateError::Syntax {
            input: input.to_string(),
            message: e.to_string(),
        })?;
        return Ok(Some(scale.apply_truncating(value)));
    }

    match s {
        "center" if object_size == 0 => return Ok(Some(0)),
        "center" => return Ok(Some((extent - object_size).div_euclid(2))),
        "e" => return Ok(Some(extent)),
        "*" => return Ok(None),
        _ => {}
    }

    let expr = parse(s)?;

    let identity = scale.is_identity() || scale.num() == 0;
    let to_declared = if identity {
        1.0
    } else {
        scale.den() as f64 / scale.num() as f64
    };
    let env = EvalEnv {
        extent: Some(extent as f64 * to_declared),
        object_size: object_size as f64 * to_declared,
        char_width: font.map(|m| m.char_width as f64 * to_declared),
        line_height: font.map(|m| m.line_height as f64 * to_declared),
        skin_factor: Some(if identity { skin_factor } else { 1.0 }),
    };
    let value = eval::eval(&expr, &env)?;

    if identity {
        Ok(Some(value as i32))
    } else {
        Ok(Some((value * scale.num() as f64 / scale.den() as f64) as i32))
    }
}

/// [`evaluate`], reporting failures and falling back to 0
pub fn evaluate_or_report(
    input: &str,
    extent: i32,
    object_size: i32,
    font: Option<FontMetrics>,
    scale: AxisScale,
    skin_factor: f64,
    diagnostics: &mut Diagnostics,
) -> Option<i32> {
    match evaluate(input, extent, object_size, font, scale, skin_factor) {
        Ok(value) => value,
        Err(err) => {
            diagnostics.report(err);
            Some(0)
        }
    }
}

/// Evaluate a scalar: a plain integer or a formula over `f`
pub fn parse_scale(input: &str, skin_factor: f64) -> Result<i32, CoordinateError> {
    let s = input.trim();
    if let Ok(value) = s.parse::<i32>() {
        return Ok(value);
    }
    let expr = parse(s)?;
    Ok(eval::eval(&expr, &EvalEnv::factor_only(skin_factor))? as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: FontMetrics = FontMetrics {
        line_height: 24,
        char_width: 10,
    };

    fn eval_plain(input: &str, extent: i32, object_size: i32) -> Option<i32> {
        evaluate(input, extent, object_size, None, AxisScale::IDENTITY, 1.0).unwrap()
    }

    #[test]
    fn test_fast_paths() {
        assert_eq!(eval_plain("center", 100, 20), Some(40));
        assert_eq!(eval_plain("center", 100, 0), Some(0));
        assert_eq!(eval_plain("e", 100, 0), Some(100));
        assert_eq!(eval_plain("*", 100, 0), None);
        assert_eq!(eval_plain(" 42 ", 100, 0), Some(42));
    }

    #[test]
    fn test_percent_of_extent() {
        assert_eq!(eval_plain("50%", 200, 0), Some(100));
    }

    #[test]
    fn test_mixed_expression_with_font() {
        let value = evaluate(
            "10+center-10w",
            100,
            20,
            Some(METRICS),
            AxisScale::IDENTITY,
            1.0,
        )
        .unwrap();
        assert_eq!(value, Some(10 + 40 - 100));
    }

    #[test]
    fn test_literal_is_rescaled() {
        let value = evaluate("100", 0, 0, None, AxisScale::new(2, 1), 1.0).unwrap();
        assert_eq!(value, Some(200));
    }

    #[test]
    fn test_relative_expression_under_scale() {
        // Actual extent 1920 for a skin declared at 1280: "c" is half the
        // declared extent, scaled back to actual pixels.
        let scale = AxisScale::new(1920, 1280);
        let value = evaluate("c+10", 1920, 0, None, scale, 1.5).unwrap();
        assert_eq!(value, Some(975));
    }

    #[test]
    fn test_skin_factor_only_without_scale() {
        assert_eq!(
            evaluate("10*f", 0, 0, None, AxisScale::IDENTITY, 1.5).unwrap(),
            Some(15)
        );
        assert_eq!(
            evaluate("10*f", 0, 0, None, AxisScale::new(2, 1), 1.5).unwrap(),
            Some(20)
        );
    }

    #[test]
    fn test_failures_report_and_yield_zero() {
        let mut diagnostics = Diagnostics::new();
        let value = evaluate_or_report(
            "10w",
            100,
            0,
            None,
            AxisScale::IDENTITY,
            1.0,
            &mut diagnostics,
        );
        assert_eq!(value, Some(0));

        let value = evaluate_or_report(
            "10+)",
            100,
            0,
            None,
            AxisScale::IDENTITY,
            1.0,
            &mut diagnostics,
        );
        assert_eq!(value, Some(0));
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!(parse_scale("18", 1.5).unwrap(), 18);
        assert_eq!(parse_scale("-4", 1.5).unwrap(), -4);
        assert_eq!(parse_scale("20*f", 1.5).unwrap(), 30);
        assert!(parse_scale("20*e", 1.5).is_err());
    }
}

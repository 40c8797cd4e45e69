//! Expression evaluation against an extent, an object size and font metrics

use crate::expr::ast::{Expr, Symbol, Unit};
use crate::expr::CoordinateError;

/// Values the symbolic tokens resolve to
///
/// `None` marks a token as unavailable in the current context; using it is
/// an error rather than a silent zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EvalEnv {
    pub extent: Option<f64>,
    pub object_size: f64,
    pub char_width: Option<f64>,
    pub line_height: Option<f64>,
    pub skin_factor: Option<f64>,
}

impl EvalEnv {
    /// Environment where only the skin factor is bound (scalar formulae)
    pub fn factor_only(skin_factor: f64) -> Self {
        Self {
            skin_factor: Some(skin_factor),
            ..Self::default()
        }
    }

    fn extent(&self, symbol: &'static str) -> Result<f64, CoordinateError> {
        self.extent.ok_or(CoordinateError::Unbound(symbol))
    }
}

pub fn eval(expr: &Expr, env: &EvalEnv) -> Result<f64, CoordinateError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Symbol(Symbol::Center) => Ok((env.extent("center")? - env.object_size) / 2.0),
        Expr::Symbol(Symbol::Half) => Ok(env.extent("c")? / 2.0),
        Expr::Symbol(Symbol::Extent) => env.extent("e"),
        Expr::Symbol(Symbol::Factor) => env.skin_factor.ok_or(CoordinateError::Unbound("f")),
        Expr::Neg(inner) => Ok(-eval(inner, env)?),
        Expr::Add(l, r) => Ok(eval(l, env)? + eval(r, env)?),
        Expr::Sub(l, r) => Ok(eval(l, env)? - eval(r, env)?),
        Expr::Mul(l, r) => Ok(eval(l, env)? * eval(r, env)?),
        Expr::Div(l, r) => {
            let divisor = eval(r, env)?;
            if divisor == 0.0 {
                return Err(CoordinateError::DivisionByZero);
            }
            Ok(eval(l, env)? / divisor)
        }
        Expr::Scaled(inner, unit) => {
            let factor = match unit {
                Unit::CharWidth => env.char_width.ok_or(CoordinateError::MissingFontMetrics)?,
                Unit::LineHeight => env.line_height.ok_or(CoordinateError::MissingFontMetrics)?,
                Unit::Percent => env.extent("%")? / 100.0,
            };
            Ok(eval(inner, env)? * factor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    fn env(extent: f64, object_size: f64) -> EvalEnv {
        EvalEnv {
            extent: Some(extent),
            object_size,
            ..EvalEnv::default()
        }
    }

    #[test]
    fn test_precedence_and_parentheses() {
        let e = env(100.0, 0.0);
        assert_eq!(eval(&parse("3*(e-c/2)").unwrap(), &e).unwrap(), 225.0);
        assert_eq!(eval(&parse("2+3*4").unwrap(), &e).unwrap(), 14.0);
        assert_eq!(eval(&parse("-(2+3)*2").unwrap(), &e).unwrap(), -10.0);
        assert_eq!(eval(&parse("10-4-3").unwrap(), &e).unwrap(), 3.0);
    }

    #[test]
    fn test_percent_binds_to_its_operand() {
        let e = env(200.0, 0.0);
        assert_eq!(eval(&parse("10+50%").unwrap(), &e).unwrap(), 110.0);
        assert_eq!(eval(&parse("2*25%").unwrap(), &e).unwrap(), 100.0);
    }

    #[test]
    fn test_font_units_need_metrics() {
        let e = env(100.0, 0.0);
        let err = eval(&parse("2w").unwrap(), &e).unwrap_err();
        assert_eq!(err, CoordinateError::MissingFontMetrics);

        let with_font = EvalEnv {
            char_width: Some(10.0),
            line_height: Some(24.0),
            ..e
        };
        assert_eq!(eval(&parse("2w+1h").unwrap(), &with_font).unwrap(), 44.0);
    }

    #[test]
    fn test_unbound_and_division_errors() {
        let scalar = EvalEnv::factor_only(1.5);
        assert_eq!(eval(&parse("20*f").unwrap(), &scalar).unwrap(), 30.0);
        assert_eq!(
            eval(&parse("e/2").unwrap(), &scalar).unwrap_err(),
            CoordinateError::Unbound("e")
        );
        assert_eq!(
            eval(&parse("4/(2-2)").unwrap(), &scalar).unwrap_err(),
            CoordinateError::DivisionByZero
        );
    }
}

//! Skin parameters: named scalars or lists that tune code behavior

use crate::errors::Diagnostics;
use crate::expr;
use crate::types::Color;

/// Decoded parameter value
#[derive(Clone, Debug, PartialEq)]
pub enum Parameter {
    Str(String),
    Int(i64),
    Float(f64),
    /// `[face, size]`
    Font(String, i32),
    List(Vec<Parameter>),
}

impl Parameter {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Parameter::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Parameter::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Parameter]> {
        match self {
            Parameter::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Decode a parameter value
///
/// A comma anywhere makes a list whose elements are decoded independently.
/// `lookup_color` resolves named colors.
pub fn parse_parameter(
    value: &str,
    skin_factor: f64,
    lookup_color: &dyn Fn(&str) -> Option<Color>,
    diagnostics: &mut Diagnostics,
) -> Result<Parameter, String> {
    if value.contains(',') {
        let items = value
            .split(',')
            .map(|item| parse_scalar(item.trim(), skin_factor, lookup_color, diagnostics))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Parameter::List(items));
    }
    parse_scalar(value, skin_factor, lookup_color, diagnostics)
}

fn parse_scalar(
    s: &str,
    skin_factor: f64,
    lookup_color: &dyn Fn(&str) -> Option<Color>,
    diagnostics: &mut Diagnostics,
) -> Result<Parameter, String> {
    if let Some(text) = s.strip_prefix('*') {
        return Ok(Parameter::Str(text.to_string()));
    }
    if let Some(hex) = s.strip_prefix('#') {
        return i64::from_str_radix(hex, 16)
            .map(Parameter::Int)
            .map_err(|e| format!("invalid hex color '{}': {}", s, e));
    }
    if let Some(hex) = s.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16)
            .map(Parameter::Int)
            .map_err(|e| format!("invalid hex integer '{}': {}", s, e));
    }
    if s.contains('.') {
        return s
            .parse::<f64>()
            .map(Parameter::Float)
            .map_err(|e| format!("invalid float '{}': {}", s, e));
    }
    if let Some(color) = lookup_color(s) {
        return Ok(Parameter::Int(color.argb() as i64));
    }
    if let Some((face, size)) = s.split_once(';') {
        return Ok(Parameter::Font(
            face.trim().to_string(),
            scale_or_report(size.trim(), skin_factor, diagnostics),
        ));
    }
    Ok(Parameter::Int(scale_or_report(s, skin_factor, diagnostics) as i64))
}

/// Scale-evaluate a scalar, reporting failures as 0
pub(crate) fn scale_or_report(s: &str, skin_factor: f64, diagnostics: &mut Diagnostics) -> i32 {
    match expr::parse_scale(s, skin_factor) {
        Ok(v) => v,
        Err(err) => {
            diagnostics.report(err);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(value: &str) -> Parameter {
        let lookup = |name: &str| (name == "red").then_some(Color::from_argb(0x00ff_0000));
        parse_parameter(value, 1.5, &lookup, &mut Diagnostics::new()).unwrap()
    }

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(decode("*Hello"), Parameter::Str("Hello".to_string()));
        assert_eq!(decode("#00ff00"), Parameter::Int(0x00ff00));
        assert_eq!(decode("0x10"), Parameter::Int(16));
        assert_eq!(decode("2.5"), Parameter::Float(2.5));
        assert_eq!(decode("red"), Parameter::Int(0x00ff_0000));
        assert_eq!(decode("Regular; 20"), Parameter::Font("Regular".to_string(), 20));
        assert_eq!(decode("20*f"), Parameter::Int(30));
    }

    #[test]
    fn test_lists_decode_each_element() {
        assert_eq!(
            decode("5, 10*f, *x"),
            Parameter::List(vec![
                Parameter::Int(5),
                Parameter::Int(15),
                Parameter::Str("x".to_string()),
            ])
        );
    }

    #[test]
    fn test_bad_values() {
        let lookup = |_: &str| None;
        let mut diagnostics = Diagnostics::new();
        assert!(parse_parameter("#zz", 1.0, &lookup, &mut diagnostics).is_err());

        // Unevaluable integers degrade to 0 with a report
        let value = parse_parameter("bogus", 1.0, &lookup, &mut diagnostics).unwrap();
        assert_eq!(value, Parameter::Int(0));
        assert_eq!(diagnostics.len(), 1);
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parameter expression evaluation
//!
//! An expression is a number with an optional length unit (`12`, `2.5mm`,
//! `1 cm`, `0.5in`, `2m`) or the name of another parameter, either
//! optionally negated. Lengths evaluate to millimetres.

use crate::error::HostError;
use regex::Regex;
use std::sync::LazyLock;

static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-)?\s*(?:(\d+(?:\.\d*)?|\.\d+)\s*(mm|cm|m|in)?|([A-Za-z_][A-Za-z0-9_]*))$")
        .expect("expression pattern is valid")
});

/// Longest chain of parameter references followed before giving up
const MAX_DEPTH: usize = 32;

/// Evaluate `expression`, resolving parameter names through `lookup`
pub fn evaluate<'a, F>(expression: &str, lookup: &F) -> Result<f64, HostError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    evaluate_at(expression, lookup, 0)
}

fn evaluate_at<'a, F>(expression: &str, lookup: &F, depth: usize) -> Result<f64, HostError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let invalid = |reason: &str| HostError::InvalidExpression {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };

    if depth > MAX_DEPTH {
        return Err(invalid("reference chain too deep or circular"));
    }

    let captures = EXPRESSION
        .captures(expression.trim())
        .ok_or_else(|| invalid("expected a number, a length or a parameter name"))?;

    let sign = if captures.get(1).is_some() { -1.0 } else { 1.0 };

    if let Some(number) = captures.get(2) {
        let value: f64 = number
            .as_str()
            .parse()
            .map_err(|_| invalid("unparsable number"))?;
        let scale = match captures.get(3).map(|m| m.as_str()) {
            None | Some("mm") => 1.0,
            Some("cm") => 10.0,
            Some("m") => 1000.0,
            Some("in") => 25.4,
            Some(_) => return Err(invalid("unknown unit")),
        };
        return Ok(sign * value * scale);
    }

    let name = captures
        .get(4)
        .map(|m| m.as_str())
        .ok_or_else(|| invalid("empty expression"))?;
    let referenced = lookup(name).ok_or_else(|| invalid(&format!("unknown parameter '{}'", name)))?;

    Ok(sign * evaluate_at(referenced, lookup, depth + 1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn no_params(_: &str) -> Option<&'static str> {
        None
    }

    #[test]
    fn test_numbers_and_units() {
        assert_relative_eq!(evaluate("12", &no_params).unwrap(), 12.0);
        assert_relative_eq!(evaluate("2.5mm", &no_params).unwrap(), 2.5);
        assert_relative_eq!(evaluate(" 1 cm ", &no_params).unwrap(), 10.0);
        assert_relative_eq!(evaluate("0.5in", &no_params).unwrap(), 12.7);
        assert_relative_eq!(evaluate("2m", &no_params).unwrap(), 2000.0);
        assert_relative_eq!(evaluate("-3", &no_params).unwrap(), -3.0);
        assert_relative_eq!(evaluate(".5", &no_params).unwrap(), 0.5);
    }

    #[test]
    fn test_parameter_references() {
        let lookup = |name: &str| match name {
            "Width" => Some("Base"),
            "Base" => Some("4 cm"),
            _ => None,
        };
        assert_relative_eq!(evaluate("Width", &lookup).unwrap(), 40.0);
        assert_relative_eq!(evaluate("-Width", &lookup).unwrap(), -40.0);
        assert!(evaluate("Height", &lookup).is_err());
    }

    #[test]
    fn test_circular_reference_is_rejected() {
        let lookup = |name: &str| match name {
            "A" => Some("B"),
            "B" => Some("A"),
            _ => None,
        };
        assert!(evaluate("A", &lookup).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        for expression in ["", "1 + 2", "3ft", "mm", "1..2"] {
            assert!(
                evaluate(expression, &no_params).is_err(),
                "accepted {:?}",
                expression
            );
        }
    }
}

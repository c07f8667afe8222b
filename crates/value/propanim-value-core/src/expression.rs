//! Minimal `@` arithmetic.
//!
//! `@a + 2 * b` is evaluated strictly left to right, without operator
//! precedence. Terms that start with a digit or `.` are numbers (an exponent
//! sign such as `1e-3` stays part of the number); anything else
//! names another property and is resolved through a [`Scope`].

use crate::error::{PropertyError, Result};
use crate::locale::Locale;
use crate::number::scan_double;

/// Resolves property names referenced by an expression.
pub trait Scope {
    fn resolve(&self, name: &str) -> Option<f64>;
}

impl<F> Scope for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn resolve(&self, name: &str) -> Option<f64> {
        self(name)
    }
}

/// A scope in which no names resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScope;

impl Scope for NoScope {
    fn resolve(&self, _name: &str) -> Option<f64> {
        None
    }
}

pub fn is_expression(text: &str) -> bool {
    text.starts_with('@')
}

fn term_value(term: &str, whole: &str, locale: Locale, scope: &dyn Scope) -> Result<f64> {
    let term = term.trim();
    let first = term
        .chars()
        .next()
        .ok_or_else(|| PropertyError::expression(whole, "missing operand"))?;
    if first.is_ascii_digit() || first == '.' || first == locale.decimal_point() {
        return match scan_double(term, locale) {
            Some(s) if s.len == term.len() => Ok(s.value),
            _ => Err(PropertyError::expression(
                whole,
                format!("bad number {term:?}"),
            )),
        };
    }
    scope
        .resolve(term)
        .ok_or_else(|| PropertyError::expression(whole, format!("unknown name {term:?}")))
}

fn starts_numeral(term: &str, locale: Locale) -> bool {
    term.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == locale.decimal_point())
}

/// Byte offset of the next operator. A sign directly after the exponent
/// marker of a numeral belongs to the numeral.
fn next_operator(rest: &str, locale: Locale) -> Option<usize> {
    let numeral = starts_numeral(rest, locale);
    let mut prev = None;
    for (i, c) in rest.char_indices() {
        match c {
            '+' | '-' if numeral && matches!(prev, Some('e' | 'E')) => {}
            '+' | '-' | '*' | '/' => return Some(i),
            _ => {}
        }
        prev = Some(c);
    }
    None
}

/// Evaluate an expression. The leading `@` is optional.
pub fn evaluate(text: &str, locale: Locale, scope: &dyn Scope) -> Result<f64> {
    let body = text.strip_prefix('@').unwrap_or(text);
    let mut total = 0.0;
    let mut op = '+';
    let mut rest = body;
    loop {
        let end = next_operator(rest, locale).unwrap_or(rest.len());
        let term = &rest[..end];
        // A sign before the first operand applies to it.
        let leading_sign = rest.len() == body.len() && end < rest.len();
        let value = if leading_sign && term.trim().is_empty() {
            0.0
        } else {
            term_value(term, text, locale, scope)?
        };
        total = match op {
            '+' => total + value,
            '-' => total - value,
            '*' => total * value,
            _ => total / value,
        };
        if end == rest.len() {
            return Ok(total);
        }
        op = rest[end..].chars().next().unwrap_or('+');
        rest = &rest[end + 1..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn left_to_right_without_precedence() {
        let v = evaluate("@16.0/9.0 *2 +3 -1", Locale::C, &NoScope).unwrap();
        assert_relative_eq!(v, 16.0 / 9.0 * 2.0 + 3.0 - 1.0);
        assert_eq!(v as i32, 5);
        assert_relative_eq!(evaluate("@1+2*3", Locale::C, &NoScope).unwrap(), 9.0);
    }

    #[test]
    fn names_resolve_through_scope() {
        let scope = |name: &str| match name {
            "width" => Some(1920.0),
            "height" => Some(1080.0),
            _ => None,
        };
        assert_relative_eq!(
            evaluate("@width / height", Locale::C, &scope).unwrap(),
            1920.0 / 1080.0
        );
        assert!(matches!(
            evaluate("@width * depth", Locale::C, &scope),
            Err(PropertyError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn leading_sign_and_errors() {
        assert_relative_eq!(evaluate("@-2+5", Locale::C, &NoScope).unwrap(), 3.0);
        assert!(evaluate("@1+", Locale::C, &NoScope).is_err());
        assert!(evaluate("@", Locale::C, &NoScope).is_err());
        assert!(evaluate("@2x+1", Locale::C, &NoScope).is_err());
    }

    #[test]
    fn exponent_signs_stay_in_the_numeral() {
        assert_relative_eq!(evaluate("@1e-3*1000", Locale::C, &NoScope).unwrap(), 1.0);
        assert_relative_eq!(evaluate("@2.5E+2 - 50", Locale::C, &NoScope).unwrap(), 200.0);
        let scope = |name: &str| (name == "e").then_some(10.0);
        assert_relative_eq!(evaluate("@e-1", Locale::C, &scope).unwrap(), 9.0);
    }

    #[test]
    fn decimal_comma() {
        let de = Locale::with_decimal_point(',');
        assert_relative_eq!(evaluate("@1,5*2", de, &NoScope).unwrap(), 3.0);
    }
}

//! Safe arithmetic over substituted formulas.
//!
//! A small recursive descent parser restricted to numeric literals,
//! `+ - * /` and parentheses. Multiplication and division bind tighter than
//! addition and subtraction; operators of equal precedence associate left
//! to right. Any other character is a parse error.

use crate::error::{EngineError, Result};

/// Nesting limit for parentheses and unary signs.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

/// Evaluate a pure arithmetic expression.
///
/// Division by zero and overflow produce an `Evaluation` error rather than a
/// non-finite number.
pub fn eval_arithmetic(input: &str) -> Result<f64> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EngineError::Evaluation("empty expression".into()));
    }
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.parse_expression()?;
    if parser.pos != tokens.len() {
        return Err(EngineError::Evaluation(format!(
            "unexpected token {:?}",
            tokens[parser.pos]
        )));
    }
    if !value.is_finite() {
        return Err(EngineError::Evaluation(format!(
            "non-finite result in '{}'",
            input
        )));
    }
    Ok(value)
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let token = match c {
            b' ' | b'\t' => {
                pos += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LeftParen,
            b')' => Token::RightParen,
            b'0'..=b'9' | b'.' => {
                let (n, end) = scan_number(input, pos)?;
                tokens.push(Token::Number(n));
                pos = end;
                continue;
            }
            _ => {
                return Err(EngineError::Evaluation(format!(
                    "unexpected character '{}' in '{}'",
                    input[pos..].chars().next().unwrap_or('?'),
                    input
                )));
            }
        };
        tokens.push(token);
        pos += 1;
    }

    Ok(tokens)
}

fn scan_number(input: &str, start: usize) -> Result<(f64, usize)> {
    let bytes = input.as_bytes();
    let mut pos = start;

    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;
        if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
            pos += 1;
        }
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }

    let text = &input[start..pos];
    let n = text
        .parse::<f64>()
        .map_err(|_| EngineError::Evaluation(format!("invalid number '{}'", text)))?;
    Ok((n, pos))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EngineError::Evaluation("expression nested too deeply".into()));
        }
        Ok(())
    }

    // expression := term (('+' | '-') term)*
    fn parse_expression(&mut self) -> Result<f64> {
        let mut left = self.parse_term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let right = self.parse_term()?;
            left = if op == Token::Plus { left + right } else { left - right };
        }
        Ok(left)
    }

    // term := unary (('*' | '/') unary)*
    fn parse_term(&mut self) -> Result<f64> {
        let mut left = self.parse_unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let right = self.parse_unary()?;
            left = if op == Token::Star { left * right } else { left / right };
        }
        Ok(left)
    }

    // unary := ('+' | '-') unary | primary
    fn parse_unary(&mut self) -> Result<f64> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.enter()?;
                let value = self.parse_unary();
                self.depth -= 1;
                value
            }
            Some(Token::Minus) => {
                self.pos += 1;
                self.enter()?;
                let value = self.parse_unary().map(|v| -v);
                self.depth -= 1;
                value
            }
            _ => self.parse_primary(),
        }
    }

    // primary := number | '(' expression ')'
    fn parse_primary(&mut self) -> Result<f64> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.pos += 1;
                Ok(n)
            }
            Some(Token::LeftParen) => {
                self.pos += 1;
                self.enter()?;
                let value = self.parse_expression()?;
                self.depth -= 1;
                match self.peek() {
                    Some(Token::RightParen) => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => Err(EngineError::Evaluation("missing ')'".into())),
                }
            }
            Some(other) => Err(EngineError::Evaluation(format!(
                "unexpected token {:?}",
                other
            ))),
            None => Err(EngineError::Evaluation("unexpected end of expression".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval_arithmetic("1+2*3").unwrap(), 7.0);
        assert_eq!(eval_arithmetic("(1+2)*3").unwrap(), 9.0);
        assert_eq!(eval_arithmetic("10-4-3").unwrap(), 3.0);
        assert_eq!(eval_arithmetic("24/4/2").unwrap(), 3.0);
        assert_eq!(eval_arithmetic("2*3/4").unwrap(), 1.5);
    }

    #[test]
    fn test_unary_signs_and_decimals() {
        assert_eq!(eval_arithmetic("-2*3").unwrap(), -6.0);
        assert_eq!(eval_arithmetic("5--2").unwrap(), 7.0);
        assert_eq!(eval_arithmetic("+.5 + 1.25").unwrap(), 1.75);
        assert_eq!(eval_arithmetic("1e3/10").unwrap(), 100.0);
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        assert!(eval_arithmetic("1/0").is_err());
        assert!(eval_arithmetic("0/0").is_err());
    }

    #[test]
    fn test_malformed_input() {
        assert!(eval_arithmetic("").is_err());
        assert!(eval_arithmetic("1+").is_err());
        assert!(eval_arithmetic("(1+2").is_err());
        assert!(eval_arithmetic("1+2)").is_err());
        assert!(eval_arithmetic("1 2").is_err());
        assert!(eval_arithmetic("A1+1").is_err());
        assert!(eval_arithmetic("2^3").is_err());
        assert!(eval_arithmetic("1.2.3").is_err());
    }

    #[test]
    fn test_deep_nesting_is_rejected_not_overflowed() {
        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(eval_arithmetic(&deep).is_err());
        let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(eval_arithmetic(&shallow).unwrap(), 1.0);
    }
}

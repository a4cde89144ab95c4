//! Evaluator for `expect_for_pid:` payload expressions.
//!
//! Payloads are a deliberately small language over the worker id: integer
//! literals, double-quoted strings, the variable `pid`, the binary operators
//! `+ - * / %`, unary minus, and parentheses. Evaluation is deterministic and
//! side-effect-free; there is no escape hatch into arbitrary code.
//!
//! `/` and `%` use floor semantics. The fixture corpus relies on this:
//! `(pid - 1) % 16` must yield 15 for worker 0.

use std::fmt;

use thiserror::Error;

/// Result of evaluating a payload expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("expected a value, found end of expression")]
    UnexpectedEnd,
    #[error("trailing input after expression")]
    TrailingInput,
    #[error("operator `{op}` is not defined for strings")]
    StringOperand { op: char },
    #[error("division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i64),
    Str(String),
    Ident(String),
    Op(char),
    Open,
    Close,
}

/// Evaluate a payload expression for one worker id.
pub fn eval(payload: &str, pid: i64) -> Result<Value, ExprError> {
    let tokens = tokenize(payload)?;
    let mut parser = Parser { tokens, pos: 0, pid };
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return Err(ExprError::TrailingInput);
    }
    Ok(value)
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '0'..='9' => {
                let mut n: i64 = 0;
                while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                    n = n * 10 + i64::from(d);
                    chars.next();
                }
                tokens.push(Token::Int(n));
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => s.push(escaped),
                            None => return Err(ExprError::UnterminatedString),
                        },
                        Some(c) => s.push(c),
                        None => return Err(ExprError::UnterminatedString),
                    }
                }
                tokens.push(Token::Str(s));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            '+' | '-' | '*' | '/' | '%' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::Open);
                chars.next();
            }
            ')' => {
                tokens.push(Token::Close);
                chars.next();
            }
            other => return Err(ExprError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    pid: i64,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// expression := term (("+" | "-") term)*
    fn expression(&mut self) -> Result<Value, ExprError> {
        let mut lhs = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.term()?;
            lhs = apply(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    /// term := factor (("*" | "/" | "%") factor)*
    fn term(&mut self) -> Result<Value, ExprError> {
        let mut lhs = self.factor()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = apply(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    /// factor := INT | STRING | "pid" | "-" factor | "(" expression ")"
    fn factor(&mut self) -> Result<Value, ExprError> {
        match self.next() {
            Some(Token::Int(n)) => Ok(Value::Int(n)),
            Some(Token::Str(s)) => Ok(Value::Str(s)),
            Some(Token::Ident(name)) => {
                if name == "pid" {
                    Ok(Value::Int(self.pid))
                } else {
                    Err(ExprError::UnknownVariable(name))
                }
            }
            Some(Token::Op('-')) => match self.factor()? {
                Value::Int(n) => Ok(Value::Int(-n)),
                Value::Str(_) => Err(ExprError::StringOperand { op: '-' }),
            },
            Some(Token::Open) => {
                let value = self.expression()?;
                match self.next() {
                    Some(Token::Close) => Ok(value),
                    Some(_) => Err(ExprError::TrailingInput),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some(Token::Op(c)) => Err(ExprError::UnexpectedChar(c)),
            Some(Token::Close) => Err(ExprError::UnexpectedChar(')')),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

fn apply(op: char, lhs: Value, rhs: Value) -> Result<Value, ExprError> {
    // `+` doubles as concatenation when either side is a string.
    if op == '+' && matches!((&lhs, &rhs), (Value::Str(_), _) | (_, Value::Str(_))) {
        return Ok(Value::Str(format!("{}{}", lhs, rhs)));
    }
    let (Value::Int(a), Value::Int(b)) = (&lhs, &rhs) else {
        return Err(ExprError::StringOperand { op });
    };
    let (a, b) = (*a, *b);
    let result = match op {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => {
            if b == 0 {
                return Err(ExprError::DivisionByZero);
            }
            a.div_euclid(b)
        }
        '%' => {
            if b == 0 {
                return Err(ExprError::DivisionByZero);
            }
            a.rem_euclid(b)
        }
        _ => unreachable!("tokenizer only emits known operators"),
    };
    Ok(Value::Int(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_int() {
        assert_eq!(eval("42", 0), Ok(Value::Int(42)));
    }

    #[test]
    fn literal_string() {
        assert_eq!(eval("\"packets: 2\"", 7), Ok(Value::Str("packets: 2".into())));
    }

    #[test]
    fn pid_variable() {
        assert_eq!(eval("pid", 11), Ok(Value::Int(11)));
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("1 + 2 * 3", 0), Ok(Value::Int(7)));
        assert_eq!(eval("(1 + 2) * 3", 0), Ok(Value::Int(9)));
    }

    #[test]
    fn modulo_wraps_below_zero() {
        // Worker 0 asking for its left neighbour in a ring of 16.
        assert_eq!(eval("(pid - 1) % 16", 0), Ok(Value::Int(15)));
        assert_eq!(eval("(pid - 2) % 16", 1), Ok(Value::Int(15)));
    }

    #[test]
    fn offset_by_pid() {
        assert_eq!(eval("1000 + pid", 3), Ok(Value::Int(1003)));
    }

    #[test]
    fn unary_minus() {
        assert_eq!(eval("-pid + 1", 4), Ok(Value::Int(-3)));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(eval("\"core \" + pid", 2), Ok(Value::Str("core 2".into())));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(eval("pid % 0", 3), Err(ExprError::DivisionByZero));
        assert_eq!(eval("1 / (pid - 2)", 2), Err(ExprError::DivisionByZero));
    }

    #[test]
    fn string_operand_rejected() {
        assert_eq!(
            eval("\"a\" * 2", 0),
            Err(ExprError::StringOperand { op: '*' })
        );
    }

    #[test]
    fn unknown_variable_rejected() {
        assert_eq!(
            eval("nprocs", 0),
            Err(ExprError::UnknownVariable("nprocs".into()))
        );
    }

    #[test]
    fn trailing_input_rejected() {
        assert_eq!(eval("1 2", 0), Err(ExprError::TrailingInput));
    }

    #[test]
    fn empty_payload_rejected() {
        assert_eq!(eval("", 0), Err(ExprError::UnexpectedEnd));
    }
}

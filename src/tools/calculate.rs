//! Arithmetic calculator tool.
//!
//! Expressions are parsed into a small AST and evaluated by structural
//! recursion; only the grammar below exists, so there is no way for an
//! expression to reach anything outside pure arithmetic.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := '-' unary | power
//! power  := atom ('^' unary)?          right-associative
//! atom   := NUMBER | '(' expr ')' | FUNC '(' expr (',' expr)* ')'
//! FUNC   := sqrt | abs | round | min | max
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;

/// Evaluate arithmetic expressions.
pub struct Calculate;

#[async_trait]
impl Tool for Calculate {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "Perform mathematical calculations. Supports +, -, *, /, ^ (power), sqrt, abs, round, min, max and parentheses."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Mathematical expression to evaluate, e.g. '123 * 456 + 789' or 'sqrt(2)'"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let expression = args["expression"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'expression' argument"))?;

        // Evaluation failures are a local recovery boundary: they become
        // error envelopes fed back into the conversation, never an Err.
        Ok(match evaluate(expression) {
            Ok(value) => json!({
                "expression": expression,
                "result": json_number(value),
                "success": true,
            }),
            Err(e) => json!({
                "expression": expression,
                "error": e,
                "success": false,
            }),
        })
    }
}

/// Encode an integral result as a JSON integer, anything else as a float.
fn json_number(value: f64) -> Value {
    const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Evaluate an expression string.
fn evaluate(input: &str) -> Result<f64, String> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(format!("unexpected token: {}", parser.tokens[parser.pos]));
    }
    let value = expr.eval()?;
    if !value.is_finite() {
        return Err("result is not a finite number".to_string());
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = literal
                    .parse()
                    .map_err(|_| format!("invalid number: {}", literal))?;
                tokens.push(Token::Num(value));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Caret);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => return Err(format!("unexpected character: {}", other)),
        }
    }

    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    Ok(tokens)
}

#[derive(Debug)]
enum Expr {
    Num(f64),
    Neg(Box<Expr>),
    Bin(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

#[derive(Debug, Clone, Copy)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy)]
enum Func {
    Sqrt,
    Abs,
    Round,
    Min,
    Max,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Func::Sqrt),
            "abs" => Some(Func::Abs),
            "round" => Some(Func::Round),
            "min" => Some(Func::Min),
            "max" => Some(Func::Max),
            _ => None,
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected '{}', found '{}'", expected, token)),
            None => Err(format!("expected '{}', found end of expression", expected)),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Bin(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Bin(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.advance();
            return Ok(Expr::Neg(Box::new(self.parse_unary()?)));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, String> {
        let base = self.parse_atom()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            self.advance();
            // Right-associative: 2^3^2 == 2^(3^2)
            let exponent = self.parse_unary()?;
            return Ok(Expr::Bin(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, String> {
        match self.advance() {
            Some(Token::Num(value)) => Ok(Expr::Num(value)),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                let func = Func::from_name(&name)
                    .ok_or_else(|| format!("unknown identifier: {}", name))?;
                self.expect(Token::LParen)?;
                let mut args = vec![self.parse_expr()?];
                while matches!(self.peek(), Some(Token::Comma)) {
                    self.advance();
                    args.push(self.parse_expr()?);
                }
                self.expect(Token::RParen)?;
                Ok(Expr::Call(func, args))
            }
            Some(token) => Err(format!("unexpected token: {}", token)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

impl Expr {
    fn eval(&self) -> Result<f64, String> {
        match self {
            Expr::Num(value) => Ok(*value),
            Expr::Neg(inner) => Ok(-inner.eval()?),
            Expr::Bin(op, left, right) => {
                let l = left.eval()?;
                let r = right.eval()?;
                match op {
                    BinOp::Add => Ok(l + r),
                    BinOp::Sub => Ok(l - r),
                    BinOp::Mul => Ok(l * r),
                    BinOp::Div => {
                        if r == 0.0 {
                            Err("division by zero".to_string())
                        } else {
                            Ok(l / r)
                        }
                    }
                    BinOp::Pow => Ok(l.powf(r)),
                }
            }
            Expr::Call(func, args) => {
                let values: Vec<f64> = args
                    .iter()
                    .map(Expr::eval)
                    .collect::<Result<_, _>>()?;
                match func {
                    Func::Sqrt => {
                        let x = single_arg("sqrt", &values)?;
                        if x < 0.0 {
                            Err("sqrt of negative number".to_string())
                        } else {
                            Ok(x.sqrt())
                        }
                    }
                    Func::Abs => Ok(single_arg("abs", &values)?.abs()),
                    Func::Round => Ok(single_arg("round", &values)?.round()),
                    Func::Min => values
                        .iter()
                        .copied()
                        .fold(None, |acc: Option<f64>, v| {
                            Some(acc.map_or(v, |a| a.min(v)))
                        })
                        .ok_or_else(|| "min requires at least one argument".to_string()),
                    Func::Max => values
                        .iter()
                        .copied()
                        .fold(None, |acc: Option<f64>, v| {
                            Some(acc.map_or(v, |a| a.max(v)))
                        })
                        .ok_or_else(|| "max requires at least one argument".to_string()),
                }
            }
        }
    }
}

fn single_arg(name: &str, values: &[f64]) -> Result<f64, String> {
    match values {
        [value] => Ok(*value),
        _ => Err(format!("{} takes exactly one argument", name)),
    }
}

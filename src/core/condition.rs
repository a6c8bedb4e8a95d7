//! Manifest object conditions
//!
//! Each object in a toolchain descriptor carries a condition such as
//! `host_os == "mac" and host_cpu == "x64"`. Conditions are parsed into a
//! small typed expression tree and evaluated against a [`PlatformId`];
//! nothing is ever evaluated dynamically.
//!
//! Grammar:
//!
//! ```text
//! expr    := or
//! or      := and ("or" and)*
//! and     := not ("and" not)*
//! not     := "not" not | atom
//! atom    := "(" expr ")" | "True" | "False" | var ("==" | "!=") string
//! var     := "host_os" | "host_cpu"
//! string  := '…' | "…"
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::platform::PlatformId;
use crate::error::ConditionError;

/// Variable bound during evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var {
    /// Normalized OS name
    HostOs,
    /// Normalized CPU name
    HostCpu,
}

impl Var {
    fn from_ident(name: &str) -> Option<Self> {
        match name {
            "host_os" => Some(Self::HostOs),
            "host_cpu" => Some(Self::HostCpu),
            _ => None,
        }
    }

    fn value<'a>(self, platform: &'a PlatformId) -> &'a str {
        match self {
            Self::HostOs => platform.os.as_str(),
            Self::HostCpu => platform.cpu.as_str(),
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostOs => f.write_str("host_os"),
            Self::HostCpu => f.write_str("host_cpu"),
        }
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

/// Parsed condition expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Condition {
    /// `True` / `False`
    Literal(bool),
    /// `var == "value"` or `var != "value"`
    Compare { var: Var, op: CmpOp, value: String },
    /// `not expr`
    Not(Box<Condition>),
    /// `lhs and rhs`
    And(Box<Condition>, Box<Condition>),
    /// `lhs or rhs`
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// Condition that matches every platform
    pub fn always() -> Self {
        Self::Literal(true)
    }

    /// Condition matching exactly one (OS, CPU) pair
    pub fn platform(os: &str, cpu: &str) -> Self {
        Self::And(
            Box::new(Self::Compare {
                var: Var::HostOs,
                op: CmpOp::Eq,
                value: os.to_string(),
            }),
            Box::new(Self::Compare {
                var: Var::HostCpu,
                op: CmpOp::Eq,
                value: cpu.to_string(),
            }),
        )
    }

    /// Parse a condition expression
    pub fn parse(expr: &str) -> Result<Self, ConditionError> {
        let tokens = tokenize(expr)?;
        let mut parser = Parser {
            expr,
            tokens: &tokens,
            pos: 0,
        };
        let condition = parser.parse_or()?;
        match parser.peek() {
            None => Ok(condition),
            Some(token) => Err(parser.unexpected(token)),
        }
    }

    /// Evaluate against a platform
    pub fn matches(&self, platform: &PlatformId) -> bool {
        match self {
            Self::Literal(value) => *value,
            Self::Compare { var, op, value } => {
                let actual = var.value(platform);
                match op {
                    CmpOp::Eq => actual == value,
                    CmpOp::Ne => actual != value,
                }
            }
            Self::Not(inner) => !inner.matches(platform),
            Self::And(lhs, rhs) => lhs.matches(platform) && rhs.matches(platform),
            Self::Or(lhs, rhs) => lhs.matches(platform) || rhs.matches(platform),
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::always()
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Condition {
    type Error = ConditionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(true) => f.write_str("True"),
            Self::Literal(false) => f.write_str("False"),
            Self::Compare { var, op, value } => {
                let op = match op {
                    CmpOp::Eq => "==",
                    CmpOp::Ne => "!=",
                };
                // No escapes in the grammar: quote with whichever mark the value lacks
                let quote = if value.contains('"') { '\'' } else { '"' };
                write!(f, "{var} {op} {quote}{value}{quote}")
            }
            Self::Not(inner) => write!(f, "not ({inner})"),
            Self::And(lhs, rhs) => write!(f, "({lhs}) and ({rhs})"),
            Self::Or(lhs, rhs) => write!(f, "({lhs}) or ({rhs})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    LParen,
    RParen,
    Eq,
    Ne,
    And,
    Or,
    Not,
    True,
    False,
    Ident(String),
    Str(String),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
    text: String,
}

fn tokenize(expr: &str) -> Result<Vec<Token>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match c {
            '(' => {
                chars.next();
                TokenKind::LParen
            }
            ')' => {
                chars.next();
                TokenKind::RParen
            }
            '=' | '!' => {
                chars.next();
                match chars.next() {
                    Some((_, '=')) if c == '=' => TokenKind::Eq,
                    Some((_, '=')) => TokenKind::Ne,
                    _ => {
                        return Err(ConditionError::UnexpectedToken {
                            expr: expr.to_string(),
                            token: c.to_string(),
                            offset,
                        })
                    }
                }
            }
            '\'' | '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                for (_, ch) in chars.by_ref() {
                    if ch == c {
                        closed = true;
                        break;
                    }
                    value.push(ch);
                }
                if !closed {
                    return Err(ConditionError::UnterminatedString {
                        expr: expr.to_string(),
                        offset,
                    });
                }
                TokenKind::Str(value)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        word.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match word.as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    "True" => TokenKind::True,
                    "False" => TokenKind::False,
                    _ => TokenKind::Ident(word),
                }
            }
            other => {
                return Err(ConditionError::UnexpectedToken {
                    expr: expr.to_string(),
                    token: other.to_string(),
                    offset,
                })
            }
        };

        let end = chars.peek().map_or(expr.len(), |&(i, _)| i);
        tokens.push(Token {
            kind,
            offset,
            text: expr[offset..end].trim_end().to_string(),
        });
    }

    Ok(tokens)
}

struct Parser<'a> {
    expr: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Result<&Token, ConditionError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| ConditionError::UnexpectedEnd {
                expr: self.expr.to_string(),
            })?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| &t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self, token: &Token) -> ConditionError {
        ConditionError::UnexpectedToken {
            expr: self.expr.to_string(),
            token: token.text.clone(),
            offset: token.offset,
        }
    }

    fn parse_or(&mut self) -> Result<Condition, ConditionError> {
        let mut lhs = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let rhs = self.parse_and()?;
            lhs = Condition::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Condition, ConditionError> {
        let mut lhs = self.parse_not()?;
        while self.eat(&TokenKind::And) {
            let rhs = self.parse_not()?;
            lhs = Condition::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Condition, ConditionError> {
        if self.eat(&TokenKind::Not) {
            let inner = self.parse_not()?;
            return Ok(Condition::Not(Box::new(inner)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Condition, ConditionError> {
        let token = self.advance()?.clone();
        match token.kind {
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                let close = self.advance()?.clone();
                if close.kind == TokenKind::RParen {
                    Ok(inner)
                } else {
                    Err(self.unexpected(&close))
                }
            }
            TokenKind::True => Ok(Condition::Literal(true)),
            TokenKind::False => Ok(Condition::Literal(false)),
            TokenKind::Ident(name) => {
                let var = Var::from_ident(&name).ok_or_else(|| ConditionError::UnknownVariable {
                    expr: self.expr.to_string(),
                    name: name.clone(),
                })?;
                let op_token = self.advance()?.clone();
                let op = match op_token.kind {
                    TokenKind::Eq => CmpOp::Eq,
                    TokenKind::Ne => CmpOp::Ne,
                    _ => return Err(self.unexpected(&op_token)),
                };
                let value_token = self.advance()?.clone();
                match value_token.kind {
                    TokenKind::Str(value) => Ok(Condition::Compare { var, op, value }),
                    _ => Err(self.unexpected(&value_token)),
                }
            }
            _ => Err(self.unexpected(&token)),
        }
    }
}

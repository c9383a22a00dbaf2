//! Postfix logic of volumes
//!
//! The membership of a point in a volume is a boolean expression over the senses of the volume's faces. The
//! expression is stored as a postfix (reverse polish) token stream which is evaluated in a single pass using a
//! fixed-size bit stack.
//!
//! The text notation uses whitespace separated tokens: a face index `<n>` is true if the point is inside face `n`,
//! `*` is unconditionally true, `~` negates, `&` and `|` combine the two topmost values. For example `"0 1 ~ &"`
//! reads "inside face 0 and outside face 1".
use crate::{
    error::{CsgError, CsgResult},
    types::{FaceId, Sense},
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Maximum depth of the logic evaluation stack.
pub const LOGIC_STACK_CAPACITY: usize = u64::BITS as usize;

/// A single token of a postfix logic expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicToken {
    /// push "point is inside this face"
    Face(FaceId),
    /// push `true`
    True,
    /// negate the top of the stack
    Not,
    /// pop two values and push their conjunction
    And,
    /// pop two values and push their disjunction
    Or,
}
impl Display for LogicToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Face(id) => write!(f, "{id}"),
            Self::True => write!(f, "*"),
            Self::Not => write!(f, "~"),
            Self::And => write!(f, "&"),
            Self::Or => write!(f, "|"),
        }
    }
}
impl FromStr for LogicToken {
    type Err = CsgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "*" => Ok(Self::True),
            "~" => Ok(Self::Not),
            "&" => Ok(Self::And),
            "|" => Ok(Self::Or),
            _ => {
                let index = s
                    .parse::<u32>()
                    .map_err(|_| CsgError::Logic(format!("invalid logic token '{s}'")))?;
                if index == u32::MAX {
                    return Err(CsgError::Logic(format!("face index {index} too large")));
                }
                Ok(Self::Face(FaceId::from_raw(index)))
            }
        }
    }
}

/// A postfix logic expression.
///
/// Parsing only checks the individual tokens. The well-formedness of the whole stream is checked with
/// [`Logic::validate`] when a volume is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Logic(Vec<LogicToken>);

impl Logic {
    /// Create a new [`Logic`] from a token stream.
    #[must_use]
    pub const fn new(tokens: Vec<LogicToken>) -> Self {
        Self(tokens)
    }
    /// Returns the tokens of this [`Logic`].
    #[must_use]
    pub fn tokens(&self) -> &[LogicToken] {
        &self.0
    }
    /// Check the stream for well-formedness and return the required stack depth.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the stream is empty.
    ///   - a face index is not smaller than `num_faces`.
    ///   - an operator is applied to too few operands.
    ///   - the stream does not reduce to exactly one value.
    ///   - the required stack depth exceeds [`LOGIC_STACK_CAPACITY`].
    pub fn validate(&self, num_faces: usize) -> CsgResult<usize> {
        if self.0.is_empty() {
            return Err(CsgError::Logic("empty logic expression".into()));
        }
        let mut size = 0_usize;
        let mut depth = 0_usize;
        for (position, token) in self.0.iter().enumerate() {
            match token {
                LogicToken::Face(id) => {
                    if !id.to_index().is_some_and(|i| i < num_faces) {
                        return Err(CsgError::Logic(format!(
                            "face {id} out of range for a volume with {num_faces} faces"
                        )));
                    }
                    size += 1;
                }
                LogicToken::True => size += 1,
                LogicToken::Not => {
                    if size < 1 {
                        return Err(CsgError::Logic(format!(
                            "missing operand for '~' at position {position} in '{self}'"
                        )));
                    }
                }
                LogicToken::And | LogicToken::Or => {
                    if size < 2 {
                        return Err(CsgError::Logic(format!(
                            "missing operand for '{token}' at position {position} in '{self}'"
                        )));
                    }
                    size -= 1;
                }
            }
            depth = depth.max(size);
        }
        if size != 1 {
            return Err(CsgError::Logic(format!(
                "expression '{self}' leaves {size} values on the stack"
            )));
        }
        if depth > LOGIC_STACK_CAPACITY {
            return Err(CsgError::Logic(format!(
                "expression requires a stack depth of {depth} (max. {LOGIC_STACK_CAPACITY})"
            )));
        }
        Ok(depth)
    }
    /// Returns true if the expression is a plain intersection of (possibly negated) faces.
    ///
    /// For such a volume, leaving through any face means leaving the volume.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.0
            .iter()
            .tuple_windows()
            .all(|(prev, token)| match token {
                LogicToken::Or => false,
                LogicToken::Not => matches!(prev, LogicToken::Face(_) | LogicToken::True),
                _ => true,
            })
            && !matches!(self.0.first(), Some(LogicToken::Or | LogicToken::Not))
    }
}
impl Display for Logic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}
impl FromStr for Logic {
    type Err = CsgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(LogicToken::from_str)
            .collect::<CsgResult<Vec<_>>>()
            .map(Self)
    }
}
impl TryFrom<String> for Logic {
    type Error = CsgError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}
impl From<Logic> for String {
    fn from(value: Logic) -> Self {
        value.to_string()
    }
}

/// Fixed-capacity stack of booleans stored as bits of an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicStack {
    data: u64,
    size: usize,
}
impl LogicStack {
    /// Number of values on the stack.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }
    /// Returns true if the stack is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
    /// Value on top of the stack.
    #[must_use]
    pub const fn top(&self) -> bool {
        debug_assert!(self.size > 0);
        self.data & 1 == 1
    }
    /// Push a value.
    pub fn push(&mut self, value: bool) {
        debug_assert!(self.size < LOGIC_STACK_CAPACITY, "logic stack overflow");
        self.data = (self.data << 1) | u64::from(value);
        self.size += 1;
    }
    /// Pop the top value.
    pub fn pop(&mut self) -> bool {
        debug_assert!(self.size > 0, "logic stack underflow");
        let value = self.top();
        self.data >>= 1;
        self.size -= 1;
        value
    }
    /// Negate the top value.
    pub fn apply_not(&mut self) {
        debug_assert!(self.size > 0);
        self.data ^= 1;
    }
    /// Replace the two topmost values by their conjunction.
    pub fn apply_and(&mut self) {
        let value = self.pop();
        debug_assert!(self.size > 0);
        self.data &= !1 | u64::from(value);
    }
    /// Replace the two topmost values by their disjunction.
    pub fn apply_or(&mut self) {
        let value = self.pop();
        debug_assert!(self.size > 0);
        self.data |= u64::from(value);
    }
}

/// Evaluates a validated postfix expression for a set of face senses.
#[derive(Debug, Clone, Copy)]
pub struct LogicEvaluator<'a> {
    logic: &'a [LogicToken],
}
impl<'a> LogicEvaluator<'a> {
    /// Create an evaluator for the given token stream.
    #[must_use]
    pub const fn new(logic: &'a [LogicToken]) -> Self {
        Self { logic }
    }
    /// Returns true if a point with the given face senses belongs to the volume.
    #[must_use]
    pub fn evaluate(&self, senses: &[Sense]) -> bool {
        let mut stack = LogicStack::default();
        for token in self.logic {
            match token {
                LogicToken::Face(id) => stack.push(senses[id.get()] == Sense::Inside),
                LogicToken::True => stack.push(true),
                LogicToken::Not => stack.apply_not(),
                LogicToken::And => stack.apply_and(),
                LogicToken::Or => stack.apply_or(),
            }
        }
        debug_assert_eq!(stack.len(), 1, "malformed logic expression");
        stack.top()
    }
}

//! Path and filter expression compiler
//!
//! Compiles SCIM path strings such as `emails[value eq "foo@bar.com"].type`
//! into an immutable step list. A step is either a named segment or a value
//! filter narrowing the elements of a multi-valued attribute. Attribute
//! resolution walks the steps with a cursor and skips filter steps, since a
//! filter selects elements, not schema shape.

mod lex;
mod parse;

pub use parse::{compile_filter, compile_path};

/// A compiled path expression
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    steps: Vec<Step>,
}

/// One step of a compiled path
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A named path segment
    Attr(String),
    /// A filter over the elements of the preceding segment
    ValueFilter(Filter),
}

/// A compiled filter predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        path: Vec<String>,
        op: CompareOp,
        literal: Literal,
    },
    Present {
        path: Vec<String>,
    },
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

/// Comparison operator inside a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Co,
    Sw,
    Ew,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Parse an operator keyword, case-insensitively
    pub fn parse(text: &str) -> Option<CompareOp> {
        match text.to_ascii_lowercase().as_str() {
            "eq" => Some(CompareOp::Eq),
            "ne" => Some(CompareOp::Ne),
            "co" => Some(CompareOp::Co),
            "sw" => Some(CompareOp::Sw),
            "ew" => Some(CompareOp::Ew),
            "gt" => Some(CompareOp::Gt),
            "ge" => Some(CompareOp::Ge),
            "lt" => Some(CompareOp::Lt),
            "le" => Some(CompareOp::Le),
            _ => None,
        }
    }
}

/// Literal operand of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl PathExpr {
    /// The empty path, addressing the whole resource
    pub fn empty() -> Self {
        PathExpr { steps: Vec::new() }
    }

    /// Check whether the path has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the compiled steps
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Start a cursor at the first step
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            steps: &self.steps,
            pos: 0,
        }
    }

    /// Drop the leading segment when it exactly matches the given name
    ///
    /// Supports paths qualified by the resource type identifier. The match
    /// is case-sensitive; unlike attribute lookup, the qualifier is an
    /// identifier, not an attribute name.
    pub fn strip_prefix(&self, name: &str) -> PathExpr {
        match self.steps.first() {
            Some(Step::Attr(head)) if head == name => PathExpr {
                steps: self.steps[1..].to_vec(),
            },
            _ => self.clone(),
        }
    }

    /// Check whether the last step is a value filter
    pub fn ends_with_value_filter(&self) -> bool {
        matches!(self.steps.last(), Some(Step::ValueFilter(_)))
    }
}

/// Read-only position over the steps of a compiled path
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    steps: &'a [Step],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Get the step under the cursor
    pub fn current(&self) -> Option<&'a Step> {
        self.steps.get(self.pos)
    }

    /// Move past the current step
    pub fn advance(&mut self) {
        self.pos += 1;
    }
}

/// Failure to compile a path or filter string
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unterminated string literal starting at position {pos}")]
    UnterminatedString { pos: usize },

    #[error("malformed literal '{text}' at position {pos}")]
    BadLiteral { text: String, pos: usize },

    #[error("unknown operator '{text}' at position {pos}")]
    UnknownOperator { text: String, pos: usize },

    #[error("empty path segment at position {pos}")]
    EmptySegment { pos: usize },

    #[error("unbalanced bracket at position {pos}")]
    UnbalancedBracket { pos: usize },

    #[error("expected {expected} at position {pos}")]
    Expected { expected: &'static str, pos: usize },

    #[error("trailing input at position {pos}")]
    TrailingInput { pos: usize },
}

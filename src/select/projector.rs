//! Response projectors
//!
//! A projector turns a page (or, for echo selections, nothing at all) into
//! the value the caller asked for.

use crate::error::{Error, Result};
use crate::pagination::{InvocationContext, SelectionMode};
use crate::types::{json_path, JsonValue};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static PARAM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Maps a response to the caller's output
pub trait ResponseProjector<R> {
    /// Projected value
    type Output;

    /// Project a response
    ///
    /// `response` is `None` for end-of-stream selections and when a run
    /// produced no page.
    fn project(&self, response: Option<&R>, ctx: &InvocationContext) -> Result<Self::Output>;

    /// Whether the projector can answer from bound inputs alone
    fn can_echo(&self) -> bool {
        false
    }

    /// Check the projector against the invocation before any call is made
    fn validate(&self, _ctx: &InvocationContext) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Select Expressions
// ============================================================================

/// Selection expression
///
/// - `*` selects the whole response
/// - `Field.Path` selects a dotted path of the response
/// - `^Param` echoes the bound input `Param` once paging ends; concrete pages
///   project to `null`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectExpr {
    /// Entire response
    #[default]
    Whole,
    /// Dotted path into the response
    Field(String),
    /// Bound input echoed back
    Param(String),
}

impl SelectExpr {
    /// Parse an expression
    pub fn parse(expr: &str) -> Result<Self> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(Error::select(expr, "empty expression"));
        }
        if expr == "*" {
            return Ok(Self::Whole);
        }
        if let Some(name) = expr.strip_prefix('^') {
            if !PARAM_NAME.is_match(name) {
                return Err(Error::select(expr, "invalid parameter name"));
            }
            return Ok(Self::Param(name.to_string()));
        }
        if expr.split('.').any(str::is_empty) {
            return Err(Error::select(expr, "empty path segment"));
        }
        Ok(Self::Field(expr.to_string()))
    }

    /// How the invoker should deliver results for this expression
    pub fn selection_mode(&self) -> SelectionMode {
        match self {
            Self::Param(_) => SelectionMode::EndOfStream,
            Self::Whole | Self::Field(_) => SelectionMode::Stream,
        }
    }
}

impl FromStr for SelectExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole => write!(f, "*"),
            Self::Field(path) => write!(f, "{path}"),
            Self::Param(name) => write!(f, "^{name}"),
        }
    }
}

impl<R: Serialize> ResponseProjector<R> for SelectExpr {
    type Output = JsonValue;

    fn project(&self, response: Option<&R>, ctx: &InvocationContext) -> Result<JsonValue> {
        match self {
            Self::Param(_) if response.is_some() => Ok(JsonValue::Null),
            Self::Param(name) => Ok(ctx.param(name).cloned().unwrap_or(JsonValue::Null)),
            Self::Whole => match response {
                Some(response) => Ok(serde_json::to_value(response)?),
                None => Ok(JsonValue::Null),
            },
            Self::Field(path) => match response {
                Some(response) => {
                    let value = serde_json::to_value(response)?;
                    Ok(json_path(&value, path).cloned().unwrap_or(JsonValue::Null))
                }
                None => Ok(JsonValue::Null),
            },
        }
    }

    fn can_echo(&self) -> bool {
        matches!(self, Self::Param(_))
    }

    fn validate(&self, ctx: &InvocationContext) -> Result<()> {
        match self {
            Self::Param(name) if ctx.param(name).is_none() => {
                Err(Error::invalid_configuration(format!(
                    "selection '^{name}' echoes a parameter that is not bound"
                )))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Closure Projector
// ============================================================================

/// Projector backed by a closure
pub struct FnProjector<F> {
    f: F,
    echo: bool,
}

impl<F> FnProjector<F> {
    /// Project responses with `f`
    pub fn new(f: F) -> Self {
        Self { f, echo: false }
    }

    /// Project with `f`, which answers from bound inputs when given no response
    pub fn echoing(f: F) -> Self {
        Self { f, echo: true }
    }
}

impl<R, T, F> ResponseProjector<R> for FnProjector<F>
where
    F: Fn(Option<&R>, &InvocationContext) -> Result<T>,
{
    type Output = T;

    fn project(&self, response: Option<&R>, ctx: &InvocationContext) -> Result<T> {
        (self.f)(response, ctx)
    }

    fn can_echo(&self) -> bool {
        self.echo
    }
}

impl<F> fmt::Debug for FnProjector<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProjector")
            .field("echo", &self.echo)
            .finish_non_exhaustive()
    }
}

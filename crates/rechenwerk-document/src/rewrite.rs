// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Expression rewriter — finds `int op int` spans in text and replaces each
// with its value.
//
// The pattern is non-recursive and matches are taken left to right without
// overlap, so `1+2+3` becomes `3+3`. Substituted text is never re-scanned.
// Evaluation is a closed four-operator evaluator over the two parsed
// operands; nothing else from the input is ever interpreted.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use rechenwerk_core::error::{RechenError, Result};

static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*([-+*/])\s*([0-9]+)").expect("expression pattern is valid")
});

static WHOLE_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+)\s*([-+*/])\s*([0-9]+)\s*$").expect("expression pattern is valid")
});

/// One of the four supported binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }
}

/// Result of evaluating one expression.
///
/// `+`, `-` and `*` stay integral; `/` is true division.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Value {
    /// Integral quotients keep one decimal place (`5.0`); anything else uses
    /// the shortest representation that round-trips (`3.5`, `0.3333333333333333`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A located, parsed `int op int` span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionMatch<'t> {
    pub span: Range<usize>,
    pub text: &'t str,
    pub lhs: i64,
    pub op: Operator,
    pub rhs: i64,
}

impl ExpressionMatch<'_> {
    pub fn evaluate(&self) -> Result<Value> {
        let overflow = || RechenError::expression(self.text, "result overflows a 64-bit integer");
        match self.op {
            Operator::Add => self
                .lhs
                .checked_add(self.rhs)
                .map(Value::Integer)
                .ok_or_else(overflow),
            Operator::Sub => self
                .lhs
                .checked_sub(self.rhs)
                .map(Value::Integer)
                .ok_or_else(overflow),
            Operator::Mul => self
                .lhs
                .checked_mul(self.rhs)
                .map(Value::Integer)
                .ok_or_else(overflow),
            Operator::Div if self.rhs == 0 => {
                Err(RechenError::expression(self.text, "division by zero"))
            }
            Operator::Div => Ok(Value::Float(self.lhs as f64 / self.rhs as f64)),
        }
    }
}

fn parse_match<'t>(text: &'t str, caps: &Captures<'t>) -> Result<ExpressionMatch<'t>> {
    let whole = caps.get(0).expect("group 0 is always present");
    let expression = &text[whole.range()];
    let operand = |idx: usize| -> Result<i64> {
        caps[idx].parse::<i64>().map_err(|_| {
            RechenError::expression(expression, "operand does not fit in a 64-bit integer")
        })
    };
    let op = Operator::from_symbol(&caps[2])
        .ok_or_else(|| RechenError::expression(expression, "unknown operator"))?;

    Ok(ExpressionMatch {
        span: whole.range(),
        text: expression,
        lhs: operand(1)?,
        op,
        rhs: operand(3)?,
    })
}

/// All expression spans in `text`, left to right, non-overlapping.
pub fn find_expressions(text: &str) -> Result<Vec<ExpressionMatch<'_>>> {
    EXPRESSION
        .captures_iter(text)
        .map(|caps| parse_match(text, &caps))
        .collect()
}

/// Replace every expression span in `text` with its value.
///
/// Fails on the first expression that cannot be evaluated; nothing is
/// returned in that case.
pub fn rewrite(text: &str) -> Result<String> {
    let matches = find_expressions(text)?;
    if matches.is_empty() {
        return Ok(text.to_owned());
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for found in &matches {
        out.push_str(&text[cursor..found.span.start]);
        out.push_str(&found.evaluate()?.to_string());
        cursor = found.span.end;
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}

/// Evaluate a string that must be exactly one expression.
pub fn evaluate_expression(text: &str) -> Result<Value> {
    let caps = WHOLE_EXPRESSION.captures(text).ok_or_else(|| {
        RechenError::expression(text.trim(), "not a single `int op int` expression")
    })?;
    let mut found = parse_match(text, &caps)?;
    found.text = text.trim();
    found.evaluate()
}

/// Rewrite every string leaf of a structured value in place.
///
/// Object keys and non-string scalars are left alone.
pub fn rewrite_value(value: &mut serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::String(s) => {
            *s = rewrite(s)?;
            Ok(())
        }
        serde_json::Value::Array(items) => items.iter_mut().try_for_each(rewrite_value),
        serde_json::Value::Object(map) => map.values_mut().try_for_each(rewrite_value),
        _ => Ok(()),
    }
}

/// Yaml counterpart of [`rewrite_value`].
///
/// Mapping keys, tags and non-string scalars (including `.inf` and `.nan`)
/// are left alone.
pub fn rewrite_yaml_value(value: &mut serde_yaml::Value) -> Result<()> {
    match value {
        serde_yaml::Value::String(s) => {
            *s = rewrite(s)?;
            Ok(())
        }
        serde_yaml::Value::Sequence(items) => items.iter_mut().try_for_each(rewrite_yaml_value),
        serde_yaml::Value::Mapping(map) => map.values_mut().try_for_each(rewrite_yaml_value),
        serde_yaml::Value::Tagged(tagged) => rewrite_yaml_value(&mut tagged.value),
        _ => Ok(()),
    }
}

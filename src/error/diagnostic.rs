use core::fmt;

use serde::Serialize;

use crate::{error::format_message, token::Token};

pub type Res<T> = Result<T, Diagnostics>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// A single semantic failure: a stable catalog key plus its arguments,
/// anchored at a source position. Rendering is owned by the catalog so the
/// entry stays machine-readable.
#[derive(Debug, Clone, Serialize)]
pub struct Diag {
    pub severity: Severity,
    pub path: String,
    pub row: usize,
    pub col: usize,
    pub key: &'static str,
    pub args: Vec<String>,
}

impl Diag {
    pub fn error(token: &Token, key: &'static str, args: Vec<String>) -> Diag {
        Diag {
            severity: Severity::Error,
            path: token.path.clone(),
            row: token.row,
            col: token.col,
            key,
            args,
        }
    }

    /// Human-readable form of this entry.
    pub fn render(&self) -> String {
        format!(
            "{}:{}:{} error: {}",
            self.path,
            self.row + 1,
            self.col + 1,
            format_message(self.key, &self.args)
        )
    }
}

/// Push-only diagnostic buffer owned by a checking session. Entries are
/// appended in visitation order and emitted in that order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diags: Vec<Diag>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { diags: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.diags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diags.len()
    }

    pub fn get(&self, i: usize) -> &Diag {
        &self.diags[i]
    }

    pub fn push(&mut self, diag: Diag) {
        self.diags.push(diag);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diag> {
        self.diags.iter()
    }

    pub fn join(&mut self, other: Diagnostics) {
        self.diags.extend(other.diags);
    }

    /// Return this as Err value if any error is contained, else Ok(v).
    pub fn err_or<T>(self, v: T) -> Res<T> {
        if self.is_empty() { Ok(v) } else { Err(self) }
    }

    pub fn render(&self) -> String {
        self.diags
            .iter()
            .map(Diag::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Stable machine-readable form of the full diagnostic list.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.diags).unwrap_or_default()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

//! Scalar values and SQL literal rendering.
//!
//! The command-line transport has no bind protocol, so every value that
//! reaches a statement does so as a rendered literal. `Value` closes the
//! set of accepted scalars; anything else simply has no `From` conversion.

/// A scalar accepted by the builders and the raw-query path.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text, rendered single-quoted with embedded quotes doubled.
    Text(String),
    /// Integer, rendered verbatim.
    Int(i64),
    /// Float, rendered in plain decimal form.
    Float(f64),
    /// SQL NULL.
    Null,
}

impl Value {
    /// Render this value as a SQL literal.
    ///
    /// Text escaping doubles single quotes (`'` -> `''`), never
    /// backslash-escapes. Numbers use Rust's `Display`, which is
    /// locale-independent and never scientific for `f64`.
    pub fn to_literal(&self) -> String {
        match self {
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Int(n) => n.to_string(),
            Self::Float(f) => {
                // NaN/inf have no MySQL literal form.
                if f.is_finite() {
                    f.to_string()
                } else {
                    "NULL".to_string()
                }
            }
            Self::Null => "NULL".to_string(),
        }
    }

    /// Check if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Int(i64::from(b))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

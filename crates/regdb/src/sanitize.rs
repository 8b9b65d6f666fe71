//! Statement sanitization: blacklist screening and placeholder binding.
//!
//! Every statement leaving this crate passes through [`sanitize`] first,
//! both builder output and hand-written SQL from the raw path. The check
//! is a case-insensitive blacklist of constructs that have no business in
//! application traffic: schema-destroying verbs, always-true deletion
//! predicates, comment tokens, UNION stacking, remote-execution keywords.
//!
//! This is defense in depth, not a sound defense. The only sound defense
//! is keeping untrusted text out of SQL entirely: the builders put caller
//! data exclusively in literal positions, rendered and escaped by
//! [`Value`]. The blacklist exists to stop the obvious disasters in the
//! raw path as well.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DbError, DbResult};
use crate::value::Value;

static BLACKLIST: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("DROP", r"(?i)\bDROP\b"),
        ("DELETE WHERE 1=1", r"(?i)\bDELETE\b.*\bWHERE\s+1\s*=\s*1\b"),
        ("TRUNCATE", r"(?i)\bTRUNCATE\b"),
        ("ALTER", r"(?i)\bALTER\b"),
        ("CREATE USER", r"(?i)\bCREATE\b.*\bUSER\b"),
        ("GRANT", r"(?i)\bGRANT\b"),
        ("REVOKE", r"(?i)\bREVOKE\b"),
        ("comment token", r"--|/\*|\*/"),
        ("UNION SELECT", r"(?i)\bUNION\b.*\bSELECT\b"),
        ("EXEC", r"(?i)\bEXEC\b"),
        ("EVAL", r"(?i)\bEVAL\b"),
    ]
    .into_iter()
    .map(|(name, pattern)| {
        let re = Regex::new(pattern).unwrap_or_else(|e| panic!("bad blacklist pattern {name}: {e}"));
        (name, re)
    })
    .collect()
});

/// Screen a statement against the blacklist and bind named placeholders.
///
/// The blacklist is applied to the template, before substitution. Each
/// `:key` present in `params` is then replaced by the rendered literal for
/// its value; placeholders without a matching key are left untouched and
/// will surface later as a malformed-SQL failure from the server.
///
/// Returns the bound statement, or [`DbError::InjectionRejected`] naming
/// the matched pattern, or [`DbError::EmptySql`] for blank input.
pub fn sanitize(sql: &str, params: &[(String, Value)]) -> DbResult<String> {
    if sql.trim().is_empty() {
        return Err(DbError::EmptySql);
    }

    for (name, re) in BLACKLIST.iter() {
        if re.is_match(sql) {
            return Err(DbError::InjectionRejected {
                pattern: (*name).to_string(),
            });
        }
    }

    if params.is_empty() {
        return Ok(sql.to_string());
    }

    // Longest keys first so `:id` cannot clobber the prefix of `:id_card`.
    let mut ordered: Vec<&(String, Value)> = params.iter().collect();
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut bound = sql.to_string();
    for (key, value) in ordered {
        bound = bound.replace(&format!(":{key}"), &value.to_literal());
    }
    Ok(bound)
}

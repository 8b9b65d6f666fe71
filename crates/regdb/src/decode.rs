//! Decoding of the client's tab-delimited batch output.

use std::sync::Arc;

use crate::row::Row;

/// Keywords whose statements produce a result set worth decoding.
const READ_KEYWORDS: [&str; 4] = ["SELECT", "SHOW", "DESCRIBE", "EXPLAIN"];

/// Check whether a statement is a read (produces a result set).
pub(crate) fn is_read(sql: &str) -> bool {
    let first = sql.trim_start().split_whitespace().next().unwrap_or("");
    READ_KEYWORDS
        .iter()
        .any(|kw| first.eq_ignore_ascii_case(kw))
}

/// Decode header-enabled batch output into rows.
///
/// The first line carries tab-separated column names; every following
/// line is tab-split and zipped to that header. A line whose field count
/// does not match the header is dropped with a warning rather than
/// failing the whole result.
pub(crate) fn rows(stdout: &str) -> Vec<Row> {
    let mut lines = stdout.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    if header.is_empty() {
        return Vec::new();
    }

    let columns: Arc<[String]> = header
        .split('\t')
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into();

    let mut out = Vec::new();
    for line in lines {
        let values: Vec<String> = line.split('\t').map(str::to_string).collect();
        if values.len() != columns.len() {
            tracing::warn!(
                expected = columns.len(),
                got = values.len(),
                "dropping row with mismatched column count"
            );
            continue;
        }
        out.push(Row::new(Arc::clone(&columns), values));
    }
    out
}

/// Pull the first cell of the first row out of batch output, if any.
///
/// Used for the single-value recovery queries (`LAST_INSERT_ID()`,
/// `ROW_COUNT()`, session-captured variables).
pub(crate) fn scalar(stdout: &str) -> Option<String> {
    rows(stdout)
        .into_iter()
        .next()
        .and_then(|row| row.values().first().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zips_header_to_fields() {
        let decoded = rows("alice\tbob\n1\t2");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].get("alice"), Some("1"));
        assert_eq!(decoded[0].get("bob"), Some("2"));
    }

    #[test]
    fn multiple_rows_keep_stream_order() {
        let decoded = rows("id\tname\nS1\tAlice\nS2\tBob");
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].get("id"), Some("S1"));
        assert_eq!(decoded[1].get("name"), Some("Bob"));
    }

    #[test]
    fn mismatched_rows_are_dropped() {
        let decoded = rows("a\tb\n1\t2\t3\n4\t5");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].get("a"), Some("4"));
    }

    #[test]
    fn empty_output_means_no_rows() {
        assert!(rows("").is_empty());
        assert!(rows("\n").is_empty());
    }

    #[test]
    fn header_only_means_no_rows() {
        assert!(rows("id\tname\n").is_empty());
    }

    #[test]
    fn null_cells_pass_through_as_text() {
        let decoded = rows("advisor\nNULL");
        assert_eq!(decoded[0].get("advisor"), Some("NULL"));
        assert_eq!(decoded[0].get_nullable("advisor"), None);
    }

    #[test]
    fn read_detection() {
        assert!(is_read("SELECT 1"));
        assert!(is_read("  select * from t"));
        assert!(is_read("SHOW TABLES"));
        assert!(is_read("DESCRIBE students"));
        assert!(is_read("EXPLAIN SELECT 1"));
        assert!(!is_read("INSERT INTO t VALUES (1)"));
        assert!(!is_read("UPDATE t SET a = 1 WHERE id = 1"));
        assert!(!is_read(""));
    }

    #[test]
    fn scalar_reads_first_cell() {
        assert_eq!(scalar("LAST_INSERT_ID()\n42"), Some("42".to_string()));
        assert_eq!(scalar(""), None);
    }
}

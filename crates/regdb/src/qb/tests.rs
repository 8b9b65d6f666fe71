//! SQL-text tests for the qb module.

use crate::error::DbError;
use crate::qb::{delete, insert, select, update};
use crate::value::Value;

#[test]
fn select_basic() {
    let qb = select("students");
    assert_eq!(qb.to_sql(), "SELECT * FROM students");
}

#[test]
fn select_with_columns() {
    let qb = select("students").columns(&["student_id", "name"]);
    assert_eq!(qb.to_sql(), "SELECT student_id, name FROM students");
}

#[test]
fn select_with_filter_order_limit() {
    let qb = select("students")
        .eq("major", "CS")
        .eq("year", 2i64)
        .order_by("name DESC")
        .limit(10);
    assert_eq!(
        qb.to_sql(),
        "SELECT * FROM students WHERE major = 'CS' AND year = 2 ORDER BY name DESC LIMIT 10"
    );
}

#[test]
fn select_null_filter_uses_is_null() {
    let qb = select("students").eq("advisor", Value::Null);
    assert_eq!(qb.to_sql(), "SELECT * FROM students WHERE advisor IS NULL");
}

#[test]
fn select_with_joins() {
    let qb = select("enrollments e")
        .columns(&["e.id", "c.title"])
        .join("INNER JOIN courses c ON c.id = e.course_id")
        .eq("e.student_id", "S1");
    assert_eq!(
        qb.to_sql(),
        "SELECT e.id, c.title FROM enrollments e \
         INNER JOIN courses c ON c.id = e.course_id WHERE e.student_id = 'S1'"
    );
}

#[test]
fn select_escapes_text_filters() {
    let qb = select("students").eq("name", "O'Brien");
    assert_eq!(qb.to_sql(), "SELECT * FROM students WHERE name = 'O''Brien'");
}

#[test]
fn insert_basic() {
    let qb = insert("students")
        .set("student_id", "S2")
        .set("name", "O'Brien")
        .set("credits", 12i64);
    assert_eq!(
        qb.to_sql(),
        "INSERT INTO students (student_id, name, credits) VALUES ('S2', 'O''Brien', 12)"
    );
}

#[test]
fn insert_null_value() {
    let qb = insert("students").set("student_id", "S3").set("advisor", Value::Null);
    assert_eq!(
        qb.to_sql(),
        "INSERT INTO students (student_id, advisor) VALUES ('S3', NULL)"
    );
}

#[test]
fn insert_set_opt_skips_none() {
    let qb = insert("students")
        .set("student_id", "S4")
        .set_opt("nickname", None::<&str>)
        .set_opt("year", Some(1i64));
    assert_eq!(qb.to_sql(), "INSERT INTO students (student_id, year) VALUES ('S4', 1)");
}

#[test]
fn insert_empty_payload_fails_validation() {
    let err = insert("students").validate().unwrap_err();
    assert!(matches!(err, DbError::EmptyPayload { ref table } if table == "students"));
}

#[test]
fn update_basic() {
    let qb = update("students").set("credits", 18i64).eq("student_id", "S1");
    assert_eq!(
        qb.to_sql(),
        "UPDATE students SET credits = 18 WHERE student_id = 'S1'"
    );
}

#[test]
fn update_set_null_assigns_keyword() {
    let qb = update("students").set("advisor", Value::Null).eq("student_id", "S1");
    assert_eq!(
        qb.to_sql(),
        "UPDATE students SET advisor = NULL WHERE student_id = 'S1'"
    );
}

#[test]
fn update_requires_filter() {
    let err = update("students").set("credits", 0i64).validate().unwrap_err();
    assert!(matches!(err, DbError::MissingFilter { verb: "UPDATE", .. }));
}

#[test]
fn update_requires_payload() {
    let err = update("students").eq("student_id", "S1").validate().unwrap_err();
    assert!(matches!(err, DbError::EmptyPayload { .. }));
}

#[test]
fn delete_basic() {
    let qb = delete("enrollments").eq("student_id", "S1").eq("course_id", 42i64);
    assert_eq!(
        qb.to_sql(),
        "DELETE FROM enrollments WHERE student_id = 'S1' AND course_id = 42"
    );
}

#[test]
fn delete_requires_filter() {
    let err = delete("enrollments").validate().unwrap_err();
    assert!(matches!(err, DbError::MissingFilter { verb: "DELETE", .. }));
}

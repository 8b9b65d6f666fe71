//! Basic CRUD against the registration schema.
//!
//! Run with a reachable MySQL server and the `mysql` client installed:
//!
//! ```bash
//! MYSQL_HOST=localhost MYSQL_USER=root MYSQL_DATABASE=student_course_system \
//!     cargo run --example basic
//! ```

use regdb::{DbClient, DbResult, MysqlConfig, qb, query};

#[tokio::main]
async fn main() -> DbResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regdb=debug".into()),
        )
        .init();

    let client = DbClient::new(MysqlConfig::from_env());

    // Insert a student; the apostrophe is escaped for us.
    let id = qb::insert("students")
        .set("student_id", "S2024")
        .set("name", "O'Brien")
        .set("major", "CS")
        .execute(&client)
        .await?;
    println!("inserted student row, generated id {id}");

    // Structured lookup.
    let students = qb::select("students")
        .columns(&["student_id", "name", "major"])
        .eq("major", "CS")
        .order_by("student_id")
        .limit(10)
        .fetch_all(&client)
        .await?;
    for student in &students {
        println!(
            "{}  {}",
            student.get("student_id").unwrap_or("?"),
            student.get("name").unwrap_or("?")
        );
    }

    // Raw SQL with named parameters.
    let heavy = query("SELECT course_id, title FROM courses WHERE credits > :min")
        .bind("min", 3i64)
        .fetch_all(&client)
        .await?;
    println!("{} heavy courses", heavy.len());

    // Update and delete report affected-row counts.
    let changed = qb::update("students")
        .set("year", 2i64)
        .eq("student_id", "S2024")
        .execute(&client)
        .await?;
    println!("updated {changed} row(s)");

    let removed = qb::delete("students")
        .eq("student_id", "S2024")
        .execute(&client)
        .await?;
    println!("deleted {removed} row(s)");

    Ok(())
}

//! Report queries
//!
//! Fixed read queries against the loaded table, printed to stdout. A query
//! failure is printed and the run moves on to the next query.

use eyre::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool, TypeInfo, ValueRef};

/// Execute `sql` and print every result row in order.
///
/// Errors are printed, never raised.
pub async fn run_query(pool: &SqlitePool, sql: &str) {
    println!("Query Statement:");
    println!("{}", sql);
    println!();
    match sqlx::query(sql).fetch_all(pool).await {
        Ok(rows) => {
            println!("Query Output:");
            for row in &rows {
                match render_row(row) {
                    Ok(line) => println!("{}", line),
                    Err(error) => println!("Error rendering row: {}", error),
                }
            }
            println!();
        }
        Err(error) => println!("Error executing query: {}", error),
    }
}

fn render_row(row: &SqliteRow) -> Result<String> {
    let mut fields = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        let raw = row.try_get_raw(index)?;
        let rendered = match raw.type_info().name() {
            "NULL" => "NULL".to_string(),
            "INTEGER" => row.try_get::<i64, _>(index)?.to_string(),
            "REAL" => row.try_get::<f64, _>(index)?.to_string(),
            _ => row.try_get::<String, _>(index)?,
        };
        fields.push(rendered);
    }
    Ok(fields.join(" | "))
}

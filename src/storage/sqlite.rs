//! SQLite table sink

use crate::batch::{RecordBatch, Value};
use crate::etl::TableWriter;

use eyre::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

/// Open (or create) a SQLite database file.
///
/// The pool is capped at a single connection: a run holds its database
/// connection exclusively and closes it at the end.
pub async fn connect_sqlite(path: impl AsRef<Path>) -> Result<SqlitePool> {
    let path = path.as_ref();
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    Ok(pool)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Replace-table loader.
///
/// Drops and recreates the named table from the batch schema (TEXT or REAL,
/// inferred from the first row), inserts every row, then applies any
/// configured post-write column renames. The inserted row count is logged
/// and returned; errors are returned to the caller, which decides whether
/// they abort the run.
///
/// # Example
/// ```no_run
/// use etl_pipelines::storage::SqliteTableWriter;
/// # use sqlx::SqlitePool;
///
/// # fn example(pool: SqlitePool) {
/// let writer = SqliteTableWriter::new(pool, "Largest_banks")
///     .with_rename("Bank name", "Name");
/// # }
/// ```
pub struct SqliteTableWriter {
    pool: SqlitePool,
    table: String,
    renames: Vec<(String, String)>,
}

impl SqliteTableWriter {
    pub fn new(pool: SqlitePool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
            renames: Vec::new(),
        }
    }

    /// Rename a column after the table is written.
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.push((from.into(), to.into()));
        self
    }

    fn column_ddl(batch: &RecordBatch) -> String {
        batch
            .columns()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let sql_type = match batch.rows().first().map(|row| &row[i]) {
                    Some(Value::Number(_)) => "REAL",
                    _ => "TEXT",
                };
                format!("{} {}", quote_ident(name), sql_type)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn replace_table(&self, batch: &RecordBatch) -> Result<usize> {
        let table = quote_ident(&self.table);

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(&self.pool)
            .await?;
        sqlx::query(&format!(
            "CREATE TABLE {} ({})",
            table,
            Self::column_ddl(batch)
        ))
        .execute(&self.pool)
        .await?;

        let placeholders = vec!["?"; batch.columns().len()].join(", ");
        let insert = format!("INSERT INTO {} VALUES ({})", table, placeholders);
        for row in batch.rows() {
            let mut query = sqlx::query(&insert);
            for value in row {
                query = match value {
                    Value::Text(s) => query.bind(s.clone()),
                    Value::Number(n) => query.bind(*n),
                };
            }
            query.execute(&self.pool).await?;
        }

        for (from, to) in &self.renames {
            sqlx::query(&format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                table,
                quote_ident(from),
                quote_ident(to)
            ))
            .execute(&self.pool)
            .await?;
        }

        log::info!(
            "Loaded {} row(s) into table '{}'",
            batch.len(),
            self.table
        );
        Ok(batch.len())
    }
}

impl TableWriter for SqliteTableWriter {
    async fn write(&self, batch: &RecordBatch) -> Result<usize> {
        self.replace_table(batch)
            .await
            .with_context(|| format!("Failed to load table '{}'", self.table))
    }
}

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn execute_sql(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    execute_sql(db, "PRAGMA foreign_keys = ON").await?;

    // Departments own students, professors and books
    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS departments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            joined_on TEXT NOT NULL,
            department_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (department_id) REFERENCES departments(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS professors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            department_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (department_id) REFERENCES departments(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS staff (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            department_id INTEGER NOT NULL,
            copy_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (department_id) REFERENCES departments(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    // Create book_authors junction table
    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS book_authors (
            book_id INTEGER NOT NULL,
            author_id INTEGER NOT NULL,
            PRIMARY KEY (book_id, author_id),
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE,
            FOREIGN KEY (author_id) REFERENCES authors(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS copies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            purchase_date TEXT NOT NULL,
            publication_date TEXT NOT NULL,
            price REAL NOT NULL CHECK (price >= 0),
            edition REAL,
            status TEXT NOT NULL DEFAULT 'AVAILABLE'
                CHECK (status IN ('AVAILABLE', 'UNAVAILABLE', 'LOST')),
            tampered BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS loan_transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            issue_date TEXT NOT NULL,
            borrower_kind TEXT NOT NULL CHECK (borrower_kind IN ('STUDENT', 'PROFESSOR')),
            borrower_id INTEGER NOT NULL,
            staff_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (staff_id) REFERENCES staff(id)
        )
        "#,
    )
    .await?;

    execute_sql(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS loan_ledger (
            transaction_id INTEGER NOT NULL,
            copy_id INTEGER NOT NULL,
            due_date TEXT NOT NULL,
            return_date TEXT,
            PRIMARY KEY (transaction_id, copy_id),
            FOREIGN KEY (transaction_id) REFERENCES loan_transactions(id) ON DELETE CASCADE,
            FOREIGN KEY (copy_id) REFERENCES copies(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    // At most one outstanding loan per copy
    execute_sql(
        db,
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_loan_ledger_outstanding
            ON loan_ledger (copy_id) WHERE return_date IS NULL
        "#,
    )
    .await?;

    execute_sql(
        db,
        "CREATE INDEX IF NOT EXISTS idx_loan_transactions_borrower ON loan_transactions (borrower_kind, borrower_id)",
    )
    .await?;

    execute_sql(
        db,
        "CREATE INDEX IF NOT EXISTS idx_copies_book ON copies (book_id)",
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = init_db("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();

        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'loan_ledger'"
                    .to_owned(),
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i32 = row.try_get("", "n").unwrap();
        assert_eq!(n, 1);
    }
}

use sqlx::PgPool;

use crate::{cmd::migrate::MIGRATOR, pkg::server::state, prelude::Result};

/// Lazy pool against the configured database. Nothing connects until a
/// test runs its first query, so the build and the non-ignored tests
/// get by without postgres.
pub fn test_pool() -> Result<PgPool> {
    state::db_pool()
}

/// Migrates, wipes and reseeds the tables the database tests assume:
/// companies c1..c3 and jobs J1..J3, all hanging off c1. Returns the
/// seeded job ids in title order.
///
/// The tables are shared, so run the ignored tests single-threaded.
pub async fn reset(pool: &PgPool) -> Result<Vec<i32>> {
    MIGRATOR.run(pool).await?;
    sqlx::query("TRUNCATE companies, jobs RESTART IDENTITY CASCADE")
        .execute(pool)
        .await?;
    sqlx::query(
        r#"
        INSERT INTO companies (handle, name, num_employees, description, logo_url)
        VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
               ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
               ('c3', 'C3', 3, 'Desc3', 'http://c3.img')
        "#,
    )
    .execute(pool)
    .await?;
    let ids = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO jobs (title, salary, equity, company_handle)
        VALUES ('J1', 1, 0.1, 'c1'),
               ('J2', 2, 0.2, 'c1'),
               ('J3', 3, NULL, 'c1')
        RETURNING id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

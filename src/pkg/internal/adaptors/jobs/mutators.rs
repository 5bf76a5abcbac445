use sqlx::PgConnection;

use crate::{
    errors::Error,
    pkg::internal::adaptors::jobs::spec::JobEntry,
    pkg::internal::sql,
    pkg::server::handlers::jobs::{CreateJobInput, PatchJobInput},
    prelude::Result,
};

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, job: &CreateJobInput) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(
            r#"
            INSERT INTO jobs (title, salary, equity, company_handle)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, salary, equity, company_handle
            "#,
        )
        .bind(&job.title)
        .bind(job.salary)
        .bind(&job.equity)
        .bind(&job.company_handle)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row.normalized())
    }

    /// Updates only the fields present in the patch. The row id takes
    /// the first placeholder after the SET clause's own.
    pub async fn update(&mut self, id: i32, job: &PatchJobInput) -> Result<JobEntry> {
        let update = sql::partial_update(job.changes(), &[])?;
        let query = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING id, title, salary, equity, company_handle",
            update.clause,
            update.next_placeholder(),
        );
        let row = update
            .bind_to(sqlx::query_as::<_, JobEntry>(&query))
            .bind(id)
            .fetch_optional(&mut *self.pool)
            .await?;
        row.map(JobEntry::normalized)
            .ok_or_else(|| Error::NotFound(format!("No job: {id}")))
    }

    pub async fn delete(&mut self, id: i32) -> Result<()> {
        let row = sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&mut *self.pool)
            .await?;
        row.map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("No job: {id}")))
    }
}

use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::{
    errors::Error,
    pkg::internal::adaptors::companies::selectors::CompanySelector,
    pkg::internal::adaptors::jobs::spec::{JobDetails, JobEntry, JobWithCompany},
    pkg::server::handlers::jobs::SearchJobsInput,
    prelude::Result,
};

/// Composes the list query for the given filters. Filters left unset
/// contribute no condition at all; the ones present are ANDed in a
/// fixed order, so placeholder numbering stays stable.
fn filtered_query(filters: &SearchJobsInput) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, c.name AS company_name \
         FROM jobs AS j LEFT JOIN companies AS c ON c.handle = j.company_handle",
    );
    let mut prefix = " WHERE ";
    if let Some(title) = &filters.title {
        qb.push(prefix)
            .push("j.title ILIKE ")
            .push_bind(format!("%{title}%"));
        prefix = " AND ";
    }
    if let Some(min_salary) = filters.min_salary {
        qb.push(prefix).push("j.salary >= ").push_bind(min_salary);
        prefix = " AND ";
    }
    if filters.has_equity {
        qb.push(prefix).push("j.equity > 0");
    }
    qb.push(" ORDER BY j.title");
    qb
}

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_all(&mut self, filters: &SearchJobsInput) -> Result<Vec<JobWithCompany>> {
        let mut qb = filtered_query(filters);
        let rows = qb
            .build_query_as::<JobWithCompany>()
            .fetch_all(&mut *self.pool)
            .await?;
        Ok(rows.into_iter().map(JobWithCompany::normalized).collect())
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<JobDetails> {
        let job = sqlx::query_as::<_, JobEntry>(
            "SELECT id, title, salary, equity, company_handle
             FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No job: {id}")))?
        .normalized();

        let company = CompanySelector::new(&mut *self.pool)
            .get_by_handle(&job.company_handle)
            .await?;

        Ok(JobDetails {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        })
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::pkg::internal::adaptors::fixtures;

    #[test]
    fn no_filters_means_no_where_clause() {
        let qb = filtered_query(&SearchJobsInput::default());
        assert_eq!(
            qb.sql(),
            "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, c.name AS company_name \
             FROM jobs AS j LEFT JOIN companies AS c ON c.handle = j.company_handle \
             ORDER BY j.title"
        );
    }

    #[test]
    fn each_filter_adds_one_condition() {
        let filters = SearchJobsInput {
            title: Some("net".into()),
            min_salary: None,
            has_equity: false,
        };
        let qb = filtered_query(&filters);
        assert!(qb.sql().contains("WHERE j.title ILIKE $1"));
        assert!(!qb.sql().contains("AND"));

        let filters = SearchJobsInput {
            title: None,
            min_salary: Some(2),
            has_equity: true,
        };
        let qb = filtered_query(&filters);
        assert!(qb.sql().contains("WHERE j.salary >= $1 AND j.equity > 0"));
    }

    #[test]
    fn all_filters_join_with_and() {
        let filters = SearchJobsInput {
            title: Some("j".into()),
            min_salary: Some(2),
            has_equity: true,
        };
        let qb = filtered_query(&filters);
        assert!(qb.sql().contains(
            "WHERE j.title ILIKE $1 AND j.salary >= $2 AND j.equity > 0 ORDER BY j.title"
        ));
    }

    #[tokio::test]
    #[traced_test]
    #[ignore = "requires a running postgres"]
    async fn lists_every_job_ordered_by_title() -> Result<()> {
        let pool = fixtures::test_pool()?;
        fixtures::reset(&pool).await?;
        let mut conn = pool.acquire().await?;
        let jobs = JobSelector::new(&mut conn)
            .get_all(&SearchJobsInput::default())
            .await?;
        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["J1", "J2", "J3"]);
        assert!(jobs.iter().all(|j| j.company_name.as_deref() == Some("C1")));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    #[ignore = "requires a running postgres"]
    async fn filters_narrow_the_listing() -> Result<()> {
        let pool = fixtures::test_pool()?;
        fixtures::reset(&pool).await?;
        let mut conn = pool.acquire().await?;

        let by_title = JobSelector::new(&mut conn)
            .get_all(&SearchJobsInput {
                title: Some("3".into()),
                ..Default::default()
            })
            .await?;
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "J3");

        let by_salary = JobSelector::new(&mut conn)
            .get_all(&SearchJobsInput {
                min_salary: Some(2),
                ..Default::default()
            })
            .await?;
        let titles: Vec<&str> = by_salary.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["J2", "J3"]);

        let with_equity = JobSelector::new(&mut conn)
            .get_all(&SearchJobsInput {
                has_equity: true,
                ..Default::default()
            })
            .await?;
        let titles: Vec<&str> = with_equity.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["J1", "J2"]);

        let combined = JobSelector::new(&mut conn)
            .get_all(&SearchJobsInput {
                min_salary: Some(2),
                has_equity: true,
                ..Default::default()
            })
            .await?;
        let titles: Vec<&str> = combined.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["J2"]);
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    #[ignore = "requires a running postgres"]
    async fn detail_nests_the_company() -> Result<()> {
        let pool = fixtures::test_pool()?;
        let ids = fixtures::reset(&pool).await?;
        let mut conn = pool.acquire().await?;
        let job = JobSelector::new(&mut conn).get_by_id(ids[0]).await?;
        assert_eq!(job.title, "J1");
        assert_eq!(job.equity.as_ref().map(|e| e.to_string()), Some("0.1".into()));
        let company = job.company.expect("company should resolve");
        assert_eq!(company.handle, "c1");
        assert_eq!(company.name, "C1");
        assert_eq!(company.num_employees, Some(1));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    #[ignore = "requires a running postgres"]
    async fn missing_job_is_not_found() -> Result<()> {
        let pool = fixtures::test_pool()?;
        fixtures::reset(&pool).await?;
        let mut conn = pool.acquire().await?;
        let err = JobSelector::new(&mut conn).get_by_id(0).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        Ok(())
    }
}

use sqlx::{PgPool, Row};
use std::collections::HashMap;

use crate::handlers::admin::AnalyticsResponse;

#[derive(Debug)]
pub struct AnalyticsService {
    pool: PgPool,
}

#[derive(Debug)]
pub enum AnalyticsError {
    DatabaseError(String),
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_overview(&self) -> Result<AnalyticsResponse, AnalyticsError> {
        let results = tokio::try_join!(
            self.get_basic_counts(),
            self.get_status_breakdown(),
            self.get_course_breakdown()
        );

        match results {
            Ok(((total_students, total_applications), status_breakdown, course_breakdown)) => {
                Ok(AnalyticsResponse {
                    total_students,
                    total_applications,
                    status_breakdown,
                    course_breakdown,
                })
            }
            Err(_) => Err(AnalyticsError::DatabaseError(
                "Failed to fetch analytics".to_string(),
            )),
        }
    }

    async fn get_basic_counts(&self) -> Result<(i64, i64), sqlx::Error> {
        let row = sqlx::query(
            "SELECT
                (SELECT COUNT(*)::bigint FROM users WHERE is_student = TRUE) as students,
                (SELECT COUNT(*)::bigint FROM applications) as applications",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((row.get(0), row.get(1)))
    }

    async fn get_status_breakdown(&self) -> Result<HashMap<String, i64>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT status::text, COUNT(*)::bigint as count
             FROM applications
             GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut breakdown = HashMap::new();
        for row in rows {
            let status: String = row.get(0);
            let count: i64 = row.get(1);
            breakdown.insert(status, count);
        }
        Ok(breakdown)
    }

    async fn get_course_breakdown(&self) -> Result<HashMap<String, i64>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT course::text, COUNT(*)::bigint as count
             FROM applications
             GROUP BY course",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut breakdown = HashMap::new();
        for row in rows {
            let course: String = row.get(0);
            let count: i64 = row.get(1);
            breakdown.insert(course, count);
        }
        Ok(breakdown)
    }
}

//! Query timing and connection pool gauges for the PostgreSQL collaborators.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Histogram of collaborator query durations, labelled by query and outcome.
pub const QUERY_DURATION_METRIC: &str = "review_store_query_duration_seconds";

/// Records one collaborator query duration.
pub fn record_query_duration(query: &'static str, outcome: &'static str, duration_secs: f64) {
    histogram!(QUERY_DURATION_METRIC, "query" => query, "outcome" => outcome)
        .record(duration_secs);
}

/// Records connection pool gauges. Called periodically by the pool metrics job.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one query from construction until [`QueryTimer::finish`].
///
/// ```ignore
/// let timer = QueryTimer::new("review_aggregate");
/// let result = sqlx::query_as::<_, ReviewTotalsEntity>(SQL).fetch_one(&pool).await;
/// timer.finish(result).map_err(store_error)
/// ```
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time under the result's outcome and hands the
    /// result back.
    pub fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        record_query_duration(
            self.query,
            outcome_label(&result),
            self.start.elapsed().as_secs_f64(),
        );
        result
    }
}

fn outcome_label<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label::<_, ()>(&Ok(1)), "ok");
        assert_eq!(outcome_label::<(), _>(&Err("pool closed")), "error");
    }

    #[test]
    fn test_finish_returns_result_unchanged() {
        let timer = QueryTimer::new("review_aggregate");
        assert_eq!(timer.query, "review_aggregate");
        assert_eq!(timer.finish::<_, String>(Ok(42)), Ok(42));

        let timer = QueryTimer::new("find_content");
        assert_eq!(
            timer.finish::<i32, _>(Err("timeout".to_string())),
            Err("timeout".to_string())
        );
    }

    #[test]
    fn test_timer_measures_elapsed_time() {
        let timer = QueryTimer::new("has_rated_reviews");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.start.elapsed().as_millis() >= 5);
    }
}

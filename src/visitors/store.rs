//! SQLite-backed [`VisitorLog`].

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::geo::GeoLookup;
use super::{ClientInfo, UNKNOWN, VisitorError, VisitorLog, VisitorStats};

const UPSERT_VISITOR: &str = "\
INSERT INTO visitors (ip_address, user_agent, visit_count, last_visit, clicks, country) \
VALUES (?1, ?2, 1, ?3, 0, ?4) \
ON CONFLICT (ip_address) DO UPDATE SET \
    visit_count = visit_count + 1, \
    last_visit = excluded.last_visit, \
    country = excluded.country";

const INCREMENT_CLICKS: &str =
    "UPDATE visitors SET clicks = COALESCE(clicks, 0) + 1 WHERE ip_address = ?1";

const INCREMENT_PAGE_VIEWS: &str = "\
INSERT INTO total_visits (id, total_count) VALUES (1, 1) \
ON CONFLICT (id) DO UPDATE SET total_count = total_count + 1";

pub struct SqlVisitorLog {
    pool: SqlitePool,
    geo: GeoLookup,
}

impl SqlVisitorLog {
    /// Opens the database at `database_url` and applies the embedded migrations.
    ///
    /// A single connection is kept open for the life of the pool so that
    /// `sqlite::memory:` databases survive between queries.
    pub async fn connect(database_url: &str, geo: GeoLookup) -> Result<Self, VisitorError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Visitor log connected to {}", database_url);

        Ok(Self { pool, geo })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Count of visits recorded for `ip`, if a row exists.
    pub async fn visit_count(&self, ip: &str) -> Result<Option<i64>, VisitorError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT visit_count FROM visitors WHERE ip_address = ?1")
                .bind(ip)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| r.0))
    }

    async fn stats(&self) -> Result<VisitorStats, VisitorError> {
        let total: Option<(i64,)> =
            sqlx::query_as("SELECT total_count FROM total_visits WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;
        let unique: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM visitors")
            .fetch_one(&self.pool)
            .await?;

        Ok(VisitorStats {
            total_visits: total.map_or(0, |r| r.0),
            unique_visitors: unique.0,
        })
    }
}

#[async_trait]
impl VisitorLog for SqlVisitorLog {
    async fn log_visitor(&self, client: &ClientInfo) -> Result<(), VisitorError> {
        let geo = self.geo.lookup(client.ip).await?;
        let user_agent = client.user_agent.as_deref().unwrap_or(UNKNOWN);
        let now = Utc::now().to_rfc3339();

        sqlx::query(UPSERT_VISITOR)
            .bind(&geo.ip)
            .bind(user_agent)
            .bind(&now)
            .bind(&geo.country)
            .execute(&self.pool)
            .await?;

        debug!("Logged visit from {} ({})", geo.ip, geo.country);
        Ok(())
    }

    async fn log_click(&self, client: &ClientInfo) -> Result<(), VisitorError> {
        let geo = self.geo.lookup(client.ip).await?;

        let result = sqlx::query(INCREMENT_CLICKS)
            .bind(&geo.ip)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!("Click from {} has no visitor row", geo.ip);
        }
        Ok(())
    }

    async fn increment_page_view(&self) -> Result<(), VisitorError> {
        sqlx::query(INCREMENT_PAGE_VIEWS)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn visitor_stats(&self) -> VisitorStats {
        match self.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Failed to read visitor stats: {}", e);
                VisitorStats::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_log() -> SqlVisitorLog {
        SqlVisitorLog::connect("sqlite::memory:", GeoLookup::offline())
            .await
            .unwrap()
    }

    fn client(ip: &str, agent: &str) -> ClientInfo {
        ClientInfo {
            ip: Some(ip.parse().unwrap()),
            user_agent: Some(agent.to_string()),
        }
    }

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let log = memory_log().await;
        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(log.pool())
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(names, vec!["total_visits", "visitors"]);
    }

    #[tokio::test]
    async fn test_repeat_visits_increment_count() {
        let log = memory_log().await;
        let c = client("198.51.100.7", "curl/8.0");
        log.log_visitor(&c).await.unwrap();
        log.log_visitor(&c).await.unwrap();
        log.log_visitor(&c).await.unwrap();

        assert_eq!(log.visit_count("198.51.100.7").await.unwrap(), Some(3));
        assert_eq!(log.visitor_stats().await.unique_visitors, 1);
    }

    #[tokio::test]
    async fn test_visit_stores_unknown_defaults() {
        let log = memory_log().await;
        log.log_visitor(&ClientInfo {
            ip: Some("192.0.2.1".parse().unwrap()),
            user_agent: None,
        })
        .await
        .unwrap();

        let row: (String, String, i64) = sqlx::query_as(
            "SELECT user_agent, country, clicks FROM visitors WHERE ip_address = '192.0.2.1'",
        )
        .fetch_one(log.pool())
        .await
        .unwrap();
        assert_eq!(row, (UNKNOWN.to_string(), UNKNOWN.to_string(), 0));
    }

    #[tokio::test]
    async fn test_click_increments_existing_visitor() {
        let log = memory_log().await;
        let c = client("198.51.100.8", "Mozilla/5.0");
        log.log_visitor(&c).await.unwrap();
        log.log_click(&c).await.unwrap();
        log.log_click(&c).await.unwrap();

        let clicks: (i64,) =
            sqlx::query_as("SELECT clicks FROM visitors WHERE ip_address = '198.51.100.8'")
                .fetch_one(log.pool())
                .await
                .unwrap();
        assert_eq!(clicks.0, 2);
    }

    #[tokio::test]
    async fn test_click_without_visit_is_harmless() {
        let log = memory_log().await;
        log.log_click(&client("198.51.100.9", "x")).await.unwrap();
        assert_eq!(log.visit_count("198.51.100.9").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_page_views_accumulate() {
        let log = memory_log().await;
        assert_eq!(log.visitor_stats().await.total_visits, 0);
        log.increment_page_view().await.unwrap();
        log.increment_page_view().await.unwrap();
        assert_eq!(log.visitor_stats().await.total_visits, 2);
    }

    #[tokio::test]
    async fn test_stats_fall_back_to_zero_when_closed() {
        let log = memory_log().await;
        log.increment_page_view().await.unwrap();
        log.pool().close().await;
        assert_eq!(log.visitor_stats().await, VisitorStats::default());
    }
}

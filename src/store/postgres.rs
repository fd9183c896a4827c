use anyhow::{anyhow, Context, Result};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};

use crate::model::{City, CityDto, Id, State, StateDto};
use crate::store::traits::{CityStore, StateStore};

const CITY_COLUMNS: &str = "id, name, active, created_at, updated_at";

const STATE_SELECT_SQL: &str = "SELECT
    s.id, s.name, s.zip_code, s.city_id, s.active, s.created_at, s.updated_at,
    c.name AS city_name, c.active AS city_active,
    c.created_at AS city_created_at, c.updated_at AS city_updated_at
FROM states s
JOIN cities c ON c.id = s.city_id";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

fn state_from_row(row: &PgRow) -> Result<State, sqlx::Error> {
    let city_id: Id = row.try_get("city_id")?;
    Ok(State {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        zip_code: row.try_get("zip_code")?,
        city_id,
        city: City {
            id: city_id,
            name: row.try_get("city_name")?,
            active: row.try_get("city_active")?,
            created_at: row.try_get("city_created_at")?,
            updated_at: row.try_get("city_updated_at")?,
        },
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait::async_trait]
impl CityStore for PostgresStore {
    async fn list_cities(&self) -> Result<Vec<City>> {
        let sql = format!("SELECT {CITY_COLUMNS} FROM cities ORDER BY id DESC");
        sqlx::query_as::<_, City>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list cities")
    }

    async fn get_city(&self, id: Id) -> Result<Option<City>> {
        let sql = format!("SELECT {CITY_COLUMNS} FROM cities WHERE id = $1");
        sqlx::query_as::<_, City>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch city")
    }

    async fn create_city(&self, city: CityDto) -> Result<City> {
        let sql = format!("INSERT INTO cities (name, active) VALUES ($1, $2) RETURNING {CITY_COLUMNS}");
        sqlx::query_as::<_, City>(&sql)
            .bind(&city.name)
            .bind(city.active)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert city")
    }

    async fn update_city(&self, id: Id, city: CityDto) -> Result<Option<City>> {
        let sql = format!(
            "UPDATE cities SET name = $1, active = $2, updated_at = NOW() WHERE id = $3 RETURNING {CITY_COLUMNS}"
        );
        sqlx::query_as::<_, City>(&sql)
            .bind(&city.name)
            .bind(city.active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update city")
    }

    async fn delete_city(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete city")?;

        Ok(result.rows_affected() > 0)
    }

    async fn city_name_exists(&self, exclude_id: Id, name: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM cities WHERE name = $1 AND id <> $2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check city name")
    }
}

#[async_trait::async_trait]
impl StateStore for PostgresStore {
    async fn list_states(&self) -> Result<Vec<State>> {
        let sql = format!("{STATE_SELECT_SQL} ORDER BY s.id DESC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list states")?;

        rows.iter()
            .map(state_from_row)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to decode state rows")
    }

    async fn get_state(&self, id: Id) -> Result<Option<State>> {
        let sql = format!("{STATE_SELECT_SQL} WHERE s.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch state")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(state_from_row(&row).context("Failed to decode state row")?))
    }

    async fn list_states_by_city(&self, city_id: Id) -> Result<Vec<State>> {
        let sql = format!("{STATE_SELECT_SQL} WHERE s.city_id = $1 ORDER BY s.id DESC");
        let rows = sqlx::query(&sql)
            .bind(city_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list states for city")?;

        rows.iter()
            .map(state_from_row)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to decode state rows")
    }

    async fn create_state(&self, state: StateDto) -> Result<State> {
        let id: Id = sqlx::query_scalar(
            "INSERT INTO states (name, zip_code, city_id, active) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&state.name)
        .bind(&state.zip_code)
        .bind(state.city_id)
        .bind(state.active)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert state")?;

        self.get_state(id)
            .await?
            .ok_or_else(|| anyhow!("state {id} missing after insert"))
    }

    async fn update_state(&self, id: Id, state: StateDto) -> Result<Option<State>> {
        let updated: Option<Id> = sqlx::query_scalar(
            r#"
            UPDATE states
            SET name = $1, zip_code = $2, city_id = $3, active = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id
            "#,
        )
        .bind(&state.name)
        .bind(&state.zip_code)
        .bind(state.city_id)
        .bind(state.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update state")?;

        match updated {
            Some(id) => self.get_state(id).await,
            None => Ok(None),
        }
    }

    async fn delete_state(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM states WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete state")?;

        Ok(result.rows_affected() > 0)
    }

    async fn state_name_exists(&self, exclude_id: Id, name: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM states WHERE name = $1 AND id <> $2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check state name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Joined city columns read back by `state_from_row`.
    const CITY_ALIASES: [&str; 4] = ["city_name", "city_active", "city_created_at", "city_updated_at"];

    #[test]
    fn state_select_aliases_every_joined_city_column() {
        for alias in CITY_ALIASES {
            assert!(
                STATE_SELECT_SQL.contains(&format!(" AS {alias}")),
                "missing alias {alias}"
            );
        }
        assert!(STATE_SELECT_SQL.contains("JOIN cities c ON c.id = s.city_id"));
    }

    /// Connects to `DATABASE_URL` when it is set; the database tests are skipped otherwise.
    async fn connect() -> Option<PostgresStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let store = PostgresStore::new(&url, 2).await.unwrap();
        store.migrate().await.unwrap();
        Some(store)
    }

    fn unique(prefix: &str) -> String {
        format!("{prefix} {}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    #[tokio::test]
    async fn states_round_trip_with_their_city() {
        let Some(store) = connect().await else {
            return;
        };

        let city = store
            .create_city(CityDto { name: unique("Cali"), active: true })
            .await
            .unwrap();
        let state = store
            .create_state(StateDto {
                name: unique("San Fernando"),
                zip_code: "760042".to_string(),
                city_id: city.id,
                active: true,
            })
            .await
            .unwrap();

        assert_eq!(state.city, city);
        let fetched = store.get_state(state.id).await.unwrap().unwrap();
        assert_eq!(fetched.city.name, city.name);
        assert_eq!(store.list_states_by_city(city.id).await.unwrap().len(), 1);

        assert!(store.delete_city(city.id).await.unwrap());
        assert!(store.get_state(state.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn name_exists_excludes_the_given_id() {
        let Some(store) = connect().await else {
            return;
        };

        let name = unique("Pasto");
        let city = store
            .create_city(CityDto { name: name.clone(), active: true })
            .await
            .unwrap();

        assert!(store.city_name_exists(0, &name).await.unwrap());
        assert!(!store.city_name_exists(city.id, &name).await.unwrap());

        store.delete_city(city.id).await.unwrap();
    }
}

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::model::{exceeds_text_column, City, CityDto, Id, State, StateDto};
use crate::store::traits::{CityStore, StateStore};

#[derive(Debug, Clone)]
struct StateRow {
    id: Id,
    name: String,
    zip_code: String,
    city_id: Id,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Tables {
    cities: BTreeMap<Id, City>,
    states: BTreeMap<Id, StateRow>,
    last_city_id: Id,
    last_state_id: Id,
}

impl Tables {
    fn join(&self, row: &StateRow) -> Option<State> {
        let city = self.cities.get(&row.city_id)?.clone();
        Some(State {
            id: row.id,
            name: row.name.clone(),
            zip_code: row.zip_code.clone(),
            city_id: row.city_id,
            city,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn states_where(&self, keep: impl Fn(&StateRow) -> bool) -> Vec<State> {
        self.states
            .values()
            .rev()
            .filter(|row| keep(*row))
            .filter_map(|row| self.join(row))
            .collect()
    }
}

/// Process-local store with the same ordering, uniqueness and cascade rules as
/// the PostgreSQL schema. Every operation runs under one lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_width(column: &str, value: &str) -> Result<()> {
    if exceeds_text_column(value) {
        bail!("value too long for column '{column}'");
    }
    Ok(())
}

#[async_trait::async_trait]
impl CityStore for MemoryStore {
    async fn list_cities(&self) -> Result<Vec<City>> {
        let tables = self.tables.lock();
        Ok(tables.cities.values().rev().cloned().collect())
    }

    async fn get_city(&self, id: Id) -> Result<Option<City>> {
        Ok(self.tables.lock().cities.get(&id).cloned())
    }

    async fn create_city(&self, city: CityDto) -> Result<City> {
        check_width("name", &city.name)?;
        let mut tables = self.tables.lock();
        if tables.cities.values().any(|existing| existing.name == city.name) {
            bail!("duplicate city name '{}'", city.name);
        }

        tables.last_city_id += 1;
        let created = City {
            id: tables.last_city_id,
            name: city.name,
            active: city.active,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.cities.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_city(&self, id: Id, city: CityDto) -> Result<Option<City>> {
        check_width("name", &city.name)?;
        let mut tables = self.tables.lock();
        if tables
            .cities
            .values()
            .any(|existing| existing.id != id && existing.name == city.name)
        {
            bail!("duplicate city name '{}'", city.name);
        }

        let Some(existing) = tables.cities.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = city.name;
        existing.active = city.active;
        existing.updated_at = Some(Utc::now());
        Ok(Some(existing.clone()))
    }

    async fn delete_city(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.lock();
        if tables.cities.remove(&id).is_none() {
            return Ok(false);
        }
        tables.states.retain(|_, row| row.city_id != id);
        Ok(true)
    }

    async fn city_name_exists(&self, exclude_id: Id, name: &str) -> Result<bool> {
        let tables = self.tables.lock();
        Ok(tables
            .cities
            .values()
            .any(|city| city.id != exclude_id && city.name == name))
    }
}

#[async_trait::async_trait]
impl StateStore for MemoryStore {
    async fn list_states(&self) -> Result<Vec<State>> {
        Ok(self.tables.lock().states_where(|_| true))
    }

    async fn get_state(&self, id: Id) -> Result<Option<State>> {
        let tables = self.tables.lock();
        Ok(tables.states.get(&id).and_then(|row| tables.join(row)))
    }

    async fn list_states_by_city(&self, city_id: Id) -> Result<Vec<State>> {
        Ok(self.tables.lock().states_where(|row| row.city_id == city_id))
    }

    async fn create_state(&self, state: StateDto) -> Result<State> {
        check_width("name", &state.name)?;
        check_width("zip_code", &state.zip_code)?;
        let mut tables = self.tables.lock();
        if !tables.cities.contains_key(&state.city_id) {
            bail!("city {} does not exist", state.city_id);
        }
        if tables.states.values().any(|existing| existing.name == state.name) {
            bail!("duplicate state name '{}'", state.name);
        }

        tables.last_state_id += 1;
        let row = StateRow {
            id: tables.last_state_id,
            name: state.name,
            zip_code: state.zip_code,
            city_id: state.city_id,
            active: state.active,
            created_at: Utc::now(),
            updated_at: None,
        };
        let created = tables.join(&row);
        tables.states.insert(row.id, row);
        created.ok_or_else(|| anyhow::anyhow!("state joined to a missing city"))
    }

    async fn update_state(&self, id: Id, state: StateDto) -> Result<Option<State>> {
        check_width("name", &state.name)?;
        check_width("zip_code", &state.zip_code)?;
        let mut tables = self.tables.lock();
        if !tables.cities.contains_key(&state.city_id) {
            bail!("city {} does not exist", state.city_id);
        }
        if tables
            .states
            .values()
            .any(|existing| existing.id != id && existing.name == state.name)
        {
            bail!("duplicate state name '{}'", state.name);
        }

        let Some(row) = tables.states.get_mut(&id) else {
            return Ok(None);
        };
        row.name = state.name;
        row.zip_code = state.zip_code;
        row.city_id = state.city_id;
        row.active = state.active;
        row.updated_at = Some(Utc::now());

        let row = row.clone();
        Ok(tables.join(&row))
    }

    async fn delete_state(&self, id: Id) -> Result<bool> {
        Ok(self.tables.lock().states.remove(&id).is_some())
    }

    async fn state_name_exists(&self, exclude_id: Id, name: &str) -> Result<bool> {
        let tables = self.tables.lock();
        Ok(tables
            .states
            .values()
            .any(|state| state.id != exclude_id && state.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str) -> CityDto {
        CityDto {
            name: name.to_string(),
            active: true,
        }
    }

    fn state(name: &str, city_id: Id) -> StateDto {
        StateDto {
            name: name.to_string(),
            zip_code: "050021".to_string(),
            city_id,
            active: true,
        }
    }

    #[tokio::test]
    async fn lists_are_newest_first() {
        let store = MemoryStore::new();
        let first = store.create_city(city("Cali")).await.unwrap();
        let second = store.create_city(city("Medellín")).await.unwrap();

        let ids: Vec<Id> = store
            .list_cities()
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn name_check_excludes_own_id() {
        let store = MemoryStore::new();
        let cali = store.create_city(city("Cali")).await.unwrap();

        assert!(store.city_name_exists(0, "Cali").await.unwrap());
        assert!(!store.city_name_exists(cali.id, "Cali").await.unwrap());
        assert!(!store.city_name_exists(0, "cali").await.unwrap());
    }

    #[tokio::test]
    async fn update_of_unknown_city_returns_none() {
        let store = MemoryStore::new();
        assert!(store.update_city(42, city("Pasto")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_sets_updated_timestamp() {
        let store = MemoryStore::new();
        let cali = store.create_city(city("Cali")).await.unwrap();
        assert!(cali.updated_at.is_none());

        let updated = store
            .update_city(cali.id, CityDto { name: "Santiago de Cali".to_string(), active: false })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Santiago de Cali");
        assert!(!updated.active);
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, cali.created_at);
    }

    #[tokio::test]
    async fn states_carry_their_city_and_filter_by_it() {
        let store = MemoryStore::new();
        let medellin = store.create_city(city("Medellín")).await.unwrap();
        let bogota = store.create_city(city("Bogotá")).await.unwrap();
        store.create_state(state("El Poblado", medellin.id)).await.unwrap();
        store.create_state(state("Chapinero", bogota.id)).await.unwrap();
        let laureles = store.create_state(state("Laureles", medellin.id)).await.unwrap();

        assert_eq!(laureles.city, medellin);

        let names: Vec<String> = store
            .list_states_by_city(medellin.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Laureles", "El Poblado"]);
        assert_eq!(store.list_states().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn deleting_a_city_cascades_to_states() {
        let store = MemoryStore::new();
        let cali = store.create_city(city("Cali")).await.unwrap();
        let san_fernando = store.create_state(state("San Fernando", cali.id)).await.unwrap();

        assert!(store.delete_city(cali.id).await.unwrap());
        assert!(store.get_state(san_fernando.id).await.unwrap().is_none());
        assert!(!store.delete_city(cali.id).await.unwrap());
    }

    #[tokio::test]
    async fn text_longer_than_column_is_rejected() {
        let store = MemoryStore::new();
        assert!(store.create_city(city(&"x".repeat(101))).await.is_err());

        let cali = store.create_city(city(&"x".repeat(100))).await.unwrap();
        let mut long_zip = state("San Fernando", cali.id);
        long_zip.zip_code = "7".repeat(101);
        assert!(store.create_state(long_zip).await.is_err());
        assert!(store.update_city(cali.id, city(&"y".repeat(101))).await.is_err());
    }

    #[tokio::test]
    async fn state_requires_existing_city() {
        let store = MemoryStore::new();
        assert!(store.create_state(state("Orphan", 9)).await.is_err());
    }
}

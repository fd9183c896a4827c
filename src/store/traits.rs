use crate::model::{City, CityDto, Id, State, StateDto};
use anyhow::Result;

#[async_trait::async_trait]
pub trait CityStore: Send + Sync {
    /// All cities, newest first
    async fn list_cities(&self) -> Result<Vec<City>>;
    async fn get_city(&self, id: Id) -> Result<Option<City>>;
    async fn create_city(&self, city: CityDto) -> Result<City>;
    /// Replace the city's fields, returning `None` when no row has `id`
    async fn update_city(&self, id: Id, city: CityDto) -> Result<Option<City>>;
    /// Delete the city and, by cascade, its states
    async fn delete_city(&self, id: Id) -> Result<bool>;
    /// Whether a city other than `exclude_id` already uses `name` (pass 0 to exclude nothing)
    async fn city_name_exists(&self, exclude_id: Id, name: &str) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait StateStore: Send + Sync {
    /// All states with their city, newest first
    async fn list_states(&self) -> Result<Vec<State>>;
    async fn get_state(&self, id: Id) -> Result<Option<State>>;
    async fn list_states_by_city(&self, city_id: Id) -> Result<Vec<State>>;
    async fn create_state(&self, state: StateDto) -> Result<State>;
    async fn update_state(&self, id: Id, state: StateDto) -> Result<Option<State>>;
    async fn delete_state(&self, id: Id) -> Result<bool>;
    async fn state_name_exists(&self, exclude_id: Id, name: &str) -> Result<bool>;
}

pub trait Store: CityStore + StateStore + Send + Sync {}
impl<T: CityStore + StateStore + Send + Sync> Store for T {}

use anyhow::{Context, Result};

use crate::model::{CityDto, StateDto};
use crate::store::traits::Store;

/// Cities and the states (districts) registered under each of them.
const SEED: &[(&str, &[(&str, &str)])] = &[
    ("Bogotá", &[("Chapinero", "110231"), ("Usaquén", "110111")]),
    ("Medellín", &[("El Poblado", "050021"), ("Laureles", "050031")]),
    ("Cali", &[("San Fernando", "760042")]),
];

/// Insert the demonstration data set. Skipped when any city already exists so
/// restarts with `LOAD_SEED_DATA=true` stay idempotent.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    if !store.list_cities().await?.is_empty() {
        log::info!("Seed data skipped: cities table is not empty");
        return Ok(());
    }

    for (city_name, states) in SEED {
        let city = store
            .create_city(CityDto {
                name: city_name.to_string(),
                active: true,
            })
            .await
            .with_context(|| format!("Failed to seed city '{city_name}'"))?;

        for (state_name, zip_code) in states.iter() {
            store
                .create_state(StateDto {
                    name: state_name.to_string(),
                    zip_code: zip_code.to_string(),
                    city_id: city.id,
                    active: true,
                })
                .await
                .with_context(|| format!("Failed to seed state '{state_name}'"))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::traits::{CityStore, StateStore};

    #[tokio::test]
    async fn seeds_once() {
        let store = MemoryStore::new();
        load_seed_data(&store).await.unwrap();
        load_seed_data(&store).await.unwrap();

        assert_eq!(store.list_cities().await.unwrap().len(), 3);
        assert_eq!(store.list_states().await.unwrap().len(), 5);
    }
}

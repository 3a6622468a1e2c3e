use tracing::debug;

use super::types::PetQuery;
use crate::database::models::Pet;
use crate::database::repository::{PetRepository, RepoError};

/// Runs a pet listing query in two passes: the direct predicates go to the
/// store, the address predicates are applied to whatever the store returns.
pub struct PetQueryPlanner<'a> {
    pets: &'a dyn PetRepository,
}

impl<'a> PetQueryPlanner<'a> {
    pub fn new(pets: &'a dyn PetRepository) -> Self {
        Self { pets }
    }

    /// Plans and executes a query built from raw request parameters.
    pub async fn filter<I, K, V>(&self, params: I) -> Result<Vec<Pet>, RepoError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.execute(&PetQuery::partition(params)).await
    }

    pub async fn execute(&self, query: &PetQuery) -> Result<Vec<Pet>, RepoError> {
        if let Some(field) = query.unknown_direct_field() {
            debug!("Pet filter on unknown field '{}', returning no pets", field);
            return Ok(vec![]);
        }

        let candidates = self.pets.find_by_filter(&query.direct).await?;
        let total = candidates.len();
        let pets: Vec<Pet> = candidates
            .into_iter()
            .filter(|pet| query.matches_address(pet))
            .collect();

        debug!(
            "Pet filter: {} direct, {} address predicates, {} of {} candidates kept",
            query.direct.len(),
            query.address.len(),
            pets.len(),
            total
        );
        Ok(pets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::{Address, PetData};

    async fn seed(store: &MemoryStore) {
        for (name, species, city) in [("Milo", "cat", "Lima"), ("Rex", "dog", "Lima"), ("Luna", "cat", "Quito")] {
            PetRepository::create(
                store,
                PetData {
                    name: name.to_string(),
                    species: species.to_string(),
                    age: Some(3),
                    address: Address {
                        city: city.to_string(),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }
    }

    fn names(pets: &[Pet]) -> Vec<&str> {
        pets.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn empty_values_do_not_constrain() {
        let store = MemoryStore::new();
        seed(&store).await;
        let planner = PetQueryPlanner::new(&store);

        let pets = planner.filter([("species", "dog"), ("name", "")]).await.unwrap();
        assert_eq!(names(&pets), vec!["Rex"]);
    }

    #[tokio::test]
    async fn address_and_direct_predicates_combine() {
        let store = MemoryStore::new();
        seed(&store).await;
        let planner = PetQueryPlanner::new(&store);

        let pets = planner.filter([("city", "Lima"), ("species", "cat")]).await.unwrap();
        assert_eq!(names(&pets), vec!["Milo"]);

        let pets = planner.filter([("city", "Quito"), ("species", "dog")]).await.unwrap();
        assert!(pets.is_empty());
    }

    #[tokio::test]
    async fn survivors_keep_store_order() {
        let store = MemoryStore::new();
        seed(&store).await;
        let planner = PetQueryPlanner::new(&store);

        let pets = planner.filter([("age", "3")]).await.unwrap();
        assert_eq!(names(&pets), vec!["Milo", "Rex", "Luna"]);
    }

    #[tokio::test]
    async fn unknown_field_yields_empty_result() {
        let store = MemoryStore::new();
        seed(&store).await;
        let planner = PetQueryPlanner::new(&store);

        let pets = planner.filter([("color", "black")]).await.unwrap();
        assert!(pets.is_empty());
    }
}

use std::{any::Any, collections::HashMap};

use itertools::Itertools;
use substreams_entity_change::{
    pb::entity::EntityChanges,
    tables::{Row, Tables},
};

use crate::entities::Entity;

/// A dynamically created NFT data source, scoped to the pool that owns the NFT contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftWatcher {
    /// NFT contract to start watching.
    pub address: String,
    pub pool: String,
    /// Either `deposit` or `funding`.
    pub nft_type: String,
}

/// Entity persistence as seen by the handlers.
///
/// Loads and saves are synchronous and always see the latest save; the host runs one
/// handler at a time so no locking is involved.
pub trait EntityStore {
    fn load<E: Entity>(&self, id: &str) -> Option<E>;

    /// Upserts the entity, replacing every stored field.
    fn save<E: Entity>(&mut self, entity: &E);

    fn create_watcher(&mut self, watcher: NftWatcher);
}

trait StoredEntity {
    fn as_any(&self) -> &dyn Any;
    fn write_fields(&self, row: &mut Row);
}

impl<E: Entity> StoredEntity for E {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn write_fields(&self, row: &mut Row) {
        Entity::write_fields(self, row)
    }
}

type EntityKey = (&'static str, String);

/// In-process [`EntityStore`] that also records what was written, so the changes can be
/// shipped to a sink as [`EntityChanges`].
#[derive(Default)]
pub struct MemoryStore {
    entities: HashMap<EntityKey, Box<dyn StoredEntity>>,
    created: Vec<EntityKey>,
    touched: Vec<EntityKey>,
    watchers: Vec<NftWatcher>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains<E: Entity>(&self, id: &str) -> bool {
        self.entities
            .contains_key(&(E::TYPE, id.to_string()))
    }

    /// Watchers in registration order.
    pub fn watchers(&self) -> &[NftWatcher] {
        &self.watchers
    }

    /// Drains everything saved since the previous call into a single change set, one row
    /// per touched entity.
    pub fn take_entity_changes(&mut self) -> EntityChanges {
        let mut tables = Tables::new();
        let created = std::mem::take(&mut self.created);

        for key in self.touched.drain(..).unique() {
            let Some(entity) = self.entities.get(&key) else {
                continue;
            };
            let (entity_type, id) = &key;
            let row = if created.contains(&key) {
                tables.create_row(entity_type, id.clone())
            } else {
                tables.update_row(entity_type, id.clone())
            };
            entity.write_fields(row);
        }

        tables.to_entity_changes()
    }
}

impl EntityStore for MemoryStore {
    fn load<E: Entity>(&self, id: &str) -> Option<E> {
        self.entities
            .get(&(E::TYPE, id.to_string()))
            .and_then(|entity| entity.as_any().downcast_ref::<E>())
            .cloned()
    }

    fn save<E: Entity>(&mut self, entity: &E) {
        let key = (E::TYPE, entity.id().to_string());
        if !self.entities.contains_key(&key) {
            self.created.push(key.clone());
        }
        self.touched.push(key.clone());
        self.entities
            .insert(key, Box::new(entity.clone()));
    }

    fn create_watcher(&mut self, watcher: NftWatcher) {
        self.watchers.push(watcher);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Mph, PoolList, Vest};
    use substreams::scalar::BigDecimal;
    use substreams_entity_change::pb::entity::entity_change::Operation;

    fn vest(id: &str) -> Vest {
        Vest {
            id: id.to_string(),
            pool: "0xpool".to_string(),
            deposit: "0xpool---1".to_string(),
            owner: "0xowner".to_string(),
            last_update_timestamp: 1,
            accumulated_amount: BigDecimal::zero(),
            withdrawn_amount: BigDecimal::zero(),
            vest_amount_per_stablecoin_per_second: BigDecimal::zero(),
        }
    }

    #[test]
    fn load_returns_latest_save() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load::<Vest>("1"), None);

        let mut entity = vest("1");
        store.save(&entity);
        entity.owner = "0xother".to_string();
        store.save(&entity);

        assert_eq!(store.load::<Vest>("1"), Some(entity));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ids_are_scoped_by_entity_type() {
        let mut store = MemoryStore::new();
        store.save(&PoolList::new());

        assert!(store.contains::<PoolList>("0"));
        assert!(!store.contains::<Mph>("0"));
        assert_eq!(store.load::<Mph>("0"), None);
    }

    #[test]
    fn entity_changes_have_one_row_per_touched_entity() {
        let mut store = MemoryStore::new();
        store.save(&vest("1"));
        store.save(&vest("1"));
        store.save(&vest("2"));

        let changes = store.take_entity_changes();
        assert_eq!(changes.entity_changes.len(), 2);
        for id in ["1", "2"] {
            let change = changes
                .entity_changes
                .iter()
                .find(|change| change.id == id)
                .unwrap();
            assert_eq!(change.entity, "Vest");
            assert_eq!(change.operation, Operation::Create as i32);
        }

        assert!(store
            .take_entity_changes()
            .entity_changes
            .is_empty());
    }

    #[test]
    fn saves_after_a_drain_are_updates() {
        let mut store = MemoryStore::new();
        store.save(&vest("1"));
        store.take_entity_changes();

        store.save(&vest("1"));
        let changes = store.take_entity_changes();
        assert_eq!(changes.entity_changes.len(), 1);
        assert_eq!(changes.entity_changes[0].operation, Operation::Update as i32);
        assert!(changes.entity_changes[0]
            .fields
            .iter()
            .any(|field| field.name == "withdrawnAmount"));
    }

    #[test]
    fn watchers_are_kept_in_order() {
        let mut store = MemoryStore::new();
        let deposit = NftWatcher {
            address: "0xd".to_string(),
            pool: "0xp".to_string(),
            nft_type: "deposit".to_string(),
        };
        let funding = NftWatcher { nft_type: "funding".to_string(), ..deposit.clone() };
        store.create_watcher(deposit.clone());
        store.create_watcher(funding.clone());

        assert_eq!(store.watchers(), &[deposit, funding]);
    }
}

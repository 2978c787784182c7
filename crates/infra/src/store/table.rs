use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tasktrack_core::Entity;

/// Rows of one table plus its id sequence. Only reachable through the table's lock.
#[derive(Debug)]
pub struct Rows<E: Entity> {
    map: BTreeMap<E::Id, E>,
    last_id: i64,
}

impl<E: Entity> Rows<E> {
    /// Next sequential id. Ids are never reused, even after deletes.
    pub fn allocate_id(&mut self) -> E::Id
    where
        E::Id: From<i64>,
    {
        self.last_id += 1;
        E::Id::from(self.last_id)
    }

    pub fn get(&self, id: E::Id) -> Option<&E> {
        self.map.get(&id)
    }

    pub fn get_mut(&mut self, id: E::Id) -> Option<&mut E> {
        self.map.get_mut(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.map.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.map.values_mut()
    }

    pub fn put(&mut self, entity: E) {
        self.map.insert(entity.id(), entity);
    }

    pub fn remove(&mut self, id: E::Id) -> Option<E> {
        self.map.remove(&id)
    }

    /// Remove every row matching `pred`, returning how many went.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&E) -> bool) -> usize {
        let before = self.map.len();
        self.map.retain(|_, e| !pred(e));
        before - self.map.len()
    }
}

/// Id-keyed table guarded by a single `RwLock`.
///
/// A poisoned lock is recovered rather than propagated: every write leaves
/// the map consistent before it can panic.
#[derive(Debug)]
pub struct InMemoryTable<E: Entity> {
    rows: RwLock<Rows<E>>,
}

impl<E: Entity> InMemoryTable<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Rows {
                map: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Rows<E>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Rows<E>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity + Clone> InMemoryTable<E> {
    pub fn get(&self, id: E::Id) -> Option<E> {
        self.read().get(id).cloned()
    }

    /// All rows in id order.
    pub fn list(&self) -> Vec<E> {
        self.read().values().cloned().collect()
    }

    pub fn find(&self, mut pred: impl FnMut(&E) -> bool) -> Option<E> {
        self.read().values().find(|e| pred(e)).cloned()
    }

    pub fn filter(&self, mut pred: impl FnMut(&E) -> bool) -> Vec<E> {
        self.read().values().filter(|e| pred(e)).cloned().collect()
    }

    /// Apply `change` to one row under the write lock and return the result.
    pub fn modify(&self, id: E::Id, change: impl FnOnce(&mut E)) -> Option<E> {
        let mut rows = self.write();
        let row = rows.get_mut(id)?;
        change(row);
        Some(row.clone())
    }

    pub fn remove(&self, id: E::Id) -> Option<E> {
        self.write().remove(id)
    }
}

impl<E: Entity> Default for InMemoryTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasktrack_core::TaskId;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: TaskId,
        label: &'static str,
    }

    impl Entity for Row {
        type Id = TaskId;

        fn id(&self) -> TaskId {
            self.id
        }
    }

    fn insert(table: &InMemoryTable<Row>, label: &'static str) -> TaskId {
        let mut rows = table.write();
        let id = rows.allocate_id();
        rows.put(Row { id, label });
        id
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let table = InMemoryTable::<Row>::new();
        let first = insert(&table, "a");
        let second = insert(&table, "b");
        assert_eq!(first, TaskId::new(1));
        assert_eq!(second, TaskId::new(2));

        table.remove(second);
        assert_eq!(insert(&table, "c"), TaskId::new(3));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn modify_returns_updated_row() {
        let table = InMemoryTable::<Row>::new();
        let id = insert(&table, "a");

        let updated = table.modify(id, |r| r.label = "z").unwrap();
        assert_eq!(updated.label, "z");
        assert_eq!(table.get(id).unwrap().label, "z");
        assert!(table.modify(TaskId::new(99), |r| r.label = "x").is_none());
    }

    #[test]
    fn remove_where_counts_removed_rows() {
        let table = InMemoryTable::<Row>::new();
        insert(&table, "keep");
        insert(&table, "drop");
        insert(&table, "drop");

        assert_eq!(table.write().remove_where(|r| r.label == "drop"), 2);
        assert_eq!(table.list().len(), 1);
    }

    #[test]
    fn survives_a_poisoned_lock() {
        let table = std::sync::Arc::new(InMemoryTable::<Row>::new());
        insert(&table, "a");

        let poisoner = table.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.write();
            panic!("poison");
        })
        .join();

        assert_eq!(table.list().len(), 1);
        insert(&table, "b");
        assert_eq!(table.len(), 2);
    }
}

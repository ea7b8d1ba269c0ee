//! Keyed document map with snapshot publication.

use portfoliohub_error::{HubResult, StoreError, StoreErrorKind};
use portfoliohub_interface::Snapshot;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

#[derive(Debug)]
pub(crate) struct Collection<K, V> {
    name: &'static str,
    docs: RwLock<BTreeMap<K, V>>,
    tx: watch::Sender<Snapshot<V>>,
}

impl<K, V> Collection<K, V>
where
    K: Ord + Clone + ToString,
    V: Clone,
{
    pub(crate) fn new(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self {
            name,
            docs: RwLock::new(BTreeMap::new()),
            tx,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) async fn get(&self, key: &K) -> Option<V> {
        self.docs.read().await.get(key).cloned()
    }

    pub(crate) async fn all(&self) -> Vec<V> {
        self.docs.read().await.values().cloned().collect()
    }

    pub(crate) async fn filter(&self, keep: impl Fn(&V) -> bool) -> Vec<V> {
        self.docs
            .read()
            .await
            .values()
            .filter(|doc| keep(doc))
            .cloned()
            .collect()
    }

    pub(crate) async fn insert_new(&self, key: K, doc: V) -> HubResult<()> {
        let mut docs = self.docs.write().await;
        if docs.contains_key(&key) {
            return Err(StoreError::new(StoreErrorKind::Conflict {
                collection: self.name.to_string(),
                id: key.to_string(),
            })
            .into());
        }
        docs.insert(key, doc);
        self.publish(&docs);
        Ok(())
    }

    /// Run `edit` on a copy of the document and commit it only if `edit` succeeds.
    ///
    /// Returns `Ok(None)` when the document does not exist.
    pub(crate) async fn modify<R>(
        &self,
        key: &K,
        edit: impl FnOnce(&mut V) -> HubResult<R>,
    ) -> HubResult<Option<R>> {
        let mut docs = self.docs.write().await;
        let Some(current) = docs.get(key) else {
            return Ok(None);
        };
        let mut next = current.clone();
        let out = edit(&mut next)?;
        docs.insert(key.clone(), next);
        self.publish(&docs);
        Ok(Some(out))
    }

    /// Like [`Collection::modify`], but leaves the document untouched and
    /// unpublished when `applies` rejects it.
    ///
    /// Returns `Ok(None)` when the document does not exist and
    /// `Ok(Some(None))` when `applies` returned false.
    pub(crate) async fn modify_when<R>(
        &self,
        key: &K,
        applies: impl FnOnce(&V) -> bool,
        edit: impl FnOnce(&mut V) -> HubResult<R>,
    ) -> HubResult<Option<Option<R>>> {
        let mut docs = self.docs.write().await;
        let Some(current) = docs.get(key) else {
            return Ok(None);
        };
        if !applies(current) {
            return Ok(Some(None));
        }
        let mut next = current.clone();
        let out = edit(&mut next)?;
        docs.insert(key.clone(), next);
        self.publish(&docs);
        Ok(Some(Some(out)))
    }

    pub(crate) async fn remove(&self, key: &K) -> Option<V> {
        let mut docs = self.docs.write().await;
        let removed = docs.remove(key);
        if removed.is_some() {
            self.publish(&docs);
        }
        removed
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot<V>> {
        self.tx.subscribe()
    }

    fn publish(&self, docs: &BTreeMap<K, V>) {
        self.tx
            .send_replace(Arc::new(docs.values().cloned().collect()));
    }
}

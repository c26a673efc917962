use crate::entry::KeyStyle;
use crate::error::{Error, Result};
use crate::store::KeyValueStore;
use diagnostics::{log_debug, log_error, log_info};
use polyfs::TreePath;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// One named side store: a key-value persistence collaborator plus the key
/// style that maps (mount, path) locations onto its keys.
pub struct SideStore {
    name: String,
    style: KeyStyle,
    store: Arc<dyn KeyValueStore>,
}

impl SideStore {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn put_entry<T: Serialize>(
        &self,
        mount: &str,
        path: &TreePath,
        entry: &T,
    ) -> Result<()> {
        let key = self.style.key_for(mount, path);
        self.store.put(&key, serde_json::to_value(entry)?).await
    }

    pub async fn get_entry<T: DeserializeOwned>(
        &self,
        mount: &str,
        path: &TreePath,
    ) -> Result<Option<T>> {
        let key = self.style.key_for(mount, path);
        match self.store.get(&key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn delete_entry(&self, mount: &str, path: &TreePath) -> Result<()> {
        let key = self.style.key_for(mount, path);
        self.store.delete(&key).await
    }

    /// All raw keys currently stored, for reconciliation and tests
    pub async fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .get_all()
            .await?
            .into_iter()
            .map(|(k, _)| k)
            .collect())
    }

    /// Migrate every entry keyed at or under `old` to the corresponding key
    /// under `new`: write the new key, then delete the old one.
    async fn rename_prefix(&self, mount: &str, old: &TreePath, new: &TreePath) -> Result<usize> {
        let old_key = self.style.key_for(mount, old);
        let new_key = self.style.key_for(mount, new);
        let old_child_prefix = format!("{old_key}/");
        let mut migrated = 0usize;

        for (key, value) in self.store.get_all().await? {
            let rewritten = if key == old_key {
                new_key.clone()
            } else if key.starts_with(&old_child_prefix) {
                format!("{new_key}{}", &key[old_key.len()..])
            } else {
                continue;
            };
            log_debug!(
                "Store {name}: migrating {key} -> {rewritten}",
                name: &self.name
            );
            self.store.put(&rewritten, value).await?;
            self.store.delete(&key).await?;
            migrated += 1;
        }
        Ok(migrated)
    }

    /// Delete every entry keyed at or under `path`; no migration step
    async fn delete_prefix(&self, mount: &str, path: &TreePath) -> Result<usize> {
        let key = self.style.key_for(mount, path);
        let child_prefix = format!("{key}/");
        let mut deleted = 0usize;

        for (stored_key, _) in self.store.get_all().await? {
            if stored_key == key || stored_key.starts_with(&child_prefix) {
                self.store.delete(&stored_key).await?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

/// The set of independent path-keyed stores (folder properties, notes,
/// bookmarks, ...) kept logically consistent with the tree's namespace.
///
/// Cascades run store by store, awaited sequentially. A failure in a later
/// store aborts the remaining stores and fails the whole operation; stores
/// already migrated are not rolled back. Entries for paths with no backing
/// node are harmless dead data, collected by the next cascade that touches
/// their prefix — there is no background sweep.
#[derive(Default)]
pub struct SideStoreManager {
    stores: Vec<SideStore>,
}

impl SideStoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: Into<String>>(
        &mut self,
        name: S,
        style: KeyStyle,
        store: Arc<dyn KeyValueStore>,
    ) {
        self.stores.push(SideStore {
            name: name.into(),
            style,
            store,
        });
    }

    pub fn store(&self, name: &str) -> Result<&SideStore> {
        self.stores
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::unknown_store(name))
    }

    /// Rewrite every store's entries from under `old` to under `new`.
    /// Runs after the backend rename succeeded; must complete in every
    /// store before the rename is reported successful.
    pub async fn cascade_rename(
        &self,
        mount: &str,
        old: &TreePath,
        new: &TreePath,
    ) -> Result<()> {
        for store in &self.stores {
            match store.rename_prefix(mount, old, new).await {
                Ok(migrated) => {
                    if migrated > 0 {
                        log_info!(
                            "Cascade: store {name} migrated {migrated} entries",
                            name: &store.name
                        );
                    }
                }
                Err(err) => {
                    log_error!(
                        "Cascade aborted in store {name}: {err}",
                        name: &store.name,
                        err: err.to_string().as_str()
                    );
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Delete every store's entries at or under `path`
    pub async fn cascade_delete(&self, mount: &str, path: &TreePath) -> Result<()> {
        for store in &self.stores {
            match store.delete_prefix(mount, path).await {
                Ok(deleted) => {
                    if deleted > 0 {
                        log_info!(
                            "Cascade: store {name} dropped {deleted} entries",
                            name: &store.name
                        );
                    }
                }
                Err(err) => {
                    log_error!(
                        "Delete cascade aborted in store {name}: {err}",
                        name: &store.name,
                        err: err.to_string().as_str()
                    );
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

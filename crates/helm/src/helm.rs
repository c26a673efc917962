use crate::error::Result;
use crate::gate::AvailabilityGate;
use diagnostics::{log_debug, log_info};
use polyfs::{
    Mounts, Node, Router, SearchHit, TransferOutcome, TreeCache, TreePath,
    TreeProvider,
};
use sidecar::SideStoreManager;
use serde_json::Value;
use std::sync::Arc;

/// The orchestration layer: one object owning the mount table, the
/// id-router, the lazy tree cache, the side stores and the availability
/// gate.
///
/// Reads flow UI -> mounts -> provider -> cache; mutations fan out: the
/// provider applies the change, then the cached subtree is invalidated and
/// the side-store cascade rewrites or drops every entry keyed under the
/// affected prefix. The cascade must complete before a rename or delete is
/// reported successful; a cascade failure fails the operation even though
/// the backend change and earlier stores already applied (no rollback).
pub struct Helm {
    mounts: Mounts,
    router: Router,
    cache: TreeCache,
    stores: SideStoreManager,
    gate: AvailabilityGate,
}

impl Helm {
    pub fn new(
        mounts: Mounts,
        router: Router,
        stores: SideStoreManager,
        gate: AvailabilityGate,
    ) -> Self {
        Self {
            mounts,
            router,
            cache: TreeCache::new(),
            stores,
            gate,
        }
    }

    pub fn mounts(&self) -> &Mounts {
        &self.mounts
    }

    pub fn stores(&self) -> &SideStoreManager {
        &self.stores
    }

    pub fn gate(&self) -> &AvailabilityGate {
        &self.gate
    }

    /// Children of `path` under `mount`, cache-first. A cache miss fetches
    /// from the mounted provider and records the result; concurrent misses
    /// for the same path both fetch, last writer wins.
    pub async fn contents(&self, mount: &str, path: &TreePath) -> Result<Vec<Node>> {
        if let Some(children) = self.cache.children(mount, path).await {
            log_debug!("Cache hit for {mount}:{path}", path: path.serialize());
            return Ok(children);
        }
        let provider = self.mounts.get(mount)?;
        let children = provider.get_contents(path).await?;
        self.cache.store_children(mount, path, children.clone()).await;
        Ok(children)
    }

    /// Drop the cached subtree so the next read refetches
    pub async fn refresh(&self, mount: &str, path: &TreePath) {
        self.cache.invalidate(mount, path).await;
    }

    pub async fn read_file(&self, mount: &str, path: &TreePath) -> Result<Vec<u8>> {
        Ok(self.mounts.get(mount)?.read_file(path).await?)
    }

    pub async fn search(&self, mount: &str, query: &str) -> Result<Vec<SearchHit>> {
        Ok(self.mounts.get(mount)?.search(query).await?)
    }

    pub async fn create_directory(&self, mount: &str, path: &TreePath, name: &str) -> Result<()> {
        self.mounts.get(mount)?.create_directory(path, name).await?;
        self.cache.invalidate(mount, path).await;
        Ok(())
    }

    pub async fn create_file(
        &self,
        mount: &str,
        path: &TreePath,
        name: &str,
        content: &[u8],
    ) -> Result<()> {
        self.mounts
            .get(mount)?
            .create_file(path, name, content)
            .await?;
        self.cache.invalidate(mount, path).await;
        Ok(())
    }

    /// Rename one child of `path`, then cascade every side store from the
    /// old location to the new one. The rename is only reported successful
    /// once every store has migrated.
    pub async fn rename(
        &self,
        mount: &str,
        path: &TreePath,
        old_name: &str,
        new_name: &str,
    ) -> Result<()> {
        self.mounts
            .get(mount)?
            .rename(path, old_name, new_name)
            .await?;
        let old = path.join(old_name)?;
        let new = path.join(new_name)?;
        self.stores.cascade_rename(mount, &old, &new).await?;
        self.cache.invalidate(mount, path).await;
        log_info!(
            "Renamed {mount}:{old} -> {new}",
            old: old.serialize(),
            new: new.serialize()
        );
        Ok(())
    }

    /// Delete one child of `path` (folder or file per `folder`), then drop
    /// every side-store entry at or under it.
    pub async fn delete(
        &self,
        mount: &str,
        path: &TreePath,
        name: &str,
        folder: bool,
    ) -> Result<()> {
        let provider = self.mounts.get(mount)?;
        if folder {
            provider.remove_directory(path, name).await?;
        } else {
            provider.delete_file(path, name).await?;
        }
        let target = path.join(name)?;
        self.stores.cascade_delete(mount, &target).await?;
        self.cache.invalidate(mount, path).await;
        Ok(())
    }

    /// Move items between two folders of the same mount. Each moved item's
    /// side-store entries follow it, location by location. Cross-mount
    /// transfers are not routed here: side-store entries decorate a
    /// location, not the content occupying it, so they never follow content
    /// to another mount.
    pub async fn move_items(
        &self,
        mount: &str,
        source: &TreePath,
        dest: &TreePath,
        items: &[String],
    ) -> Result<TransferOutcome> {
        let outcome = self
            .mounts
            .get(mount)?
            .move_items(source, dest, items)
            .await?;
        for item in &outcome.transferred {
            let old = source.join(item)?;
            let new = dest.join(item)?;
            self.stores.cascade_rename(mount, &old, &new).await?;
        }
        self.cache.invalidate(mount, source).await;
        self.cache.invalidate(mount, dest).await;
        Ok(outcome)
    }

    /// Copy items between two folders of the same mount. No cascade: the
    /// source entries stay where they are and the copies start undecorated.
    pub async fn copy_items(
        &self,
        mount: &str,
        source: &TreePath,
        dest: &TreePath,
        items: &[String],
    ) -> Result<TransferOutcome> {
        let outcome = self
            .mounts
            .get(mount)?
            .copy_items(source, dest, items)
            .await?;
        self.cache.invalidate(mount, dest).await;
        Ok(outcome)
    }

    /// Route an id-addressed node to its provider and list its children
    pub async fn registry_children(&self, node_id: &str) -> Result<Vec<Node>> {
        let provider = self.router.provider_for(node_id)?;
        Ok(provider.get_children(node_id).await?)
    }

    /// Route an id-addressed operation to the first matching provider
    pub async fn registry_execute(
        &self,
        node_id: &str,
        operation: &str,
        params: Value,
    ) -> Result<Value> {
        let provider = self.router.provider_for(node_id)?;
        Ok(provider.execute_operation(node_id, operation, params).await?)
    }

    pub fn registry_provider(&self, node_id: &str) -> Result<Arc<dyn TreeProvider>> {
        Ok(self.router.provider_for(node_id)?)
    }
}

//! Shared skeleton store keyed by engine target
//!
//! Skin building needs the reference skeleton for whatever engine the
//! document targets, and skeleton files are big enough that reading one
//! per operation would hurt. A [`SkeletonCache`] is made once, pointed at
//! a directory of skeleton files, and passed around explicitly; it reads
//! each target's file at most once and hands out shared handles after
//! that.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use strata_core::EngineTarget;

use crate::error::SkinError;
use crate::skeleton::Skeleton;

pub struct SkeletonCache {
    dir: PathBuf,
    loaded: Mutex<HashMap<EngineTarget, Arc<Skeleton>>>,
}

impl SkeletonCache {
    /// A cache reading skeleton files from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<EngineTarget, Arc<Skeleton>>> {
        self.loaded.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Where a target's skeleton file is expected
    pub fn path_for(&self, target: EngineTarget) -> PathBuf {
        self.dir.join(format!("{}.ron", target.skeleton_stem()))
    }

    /// The skeleton for a target, reading its file on first use.
    ///
    /// Concurrent first loads may both read the file; they converge on a
    /// single cached copy.
    pub fn load(&self, target: EngineTarget) -> Result<Arc<Skeleton>, SkinError> {
        if let Some(found) = self.lock().get(&target) {
            return Ok(Arc::clone(found));
        }
        let path = self.path_for(target);
        let skeleton = Skeleton::load(&path)?;
        if skeleton.target() != target {
            return Err(SkinError::Structural(format!(
                "skeleton file for {} declares target {}",
                target,
                skeleton.target()
            )));
        }
        log::info!(
            "Loaded skeleton for {} ({} bones) from {}",
            target,
            skeleton.bone_count(),
            path.display()
        );
        Ok(self.insert(Arc::new(skeleton)))
    }

    /// Put a skeleton in the cache under its own target.
    ///
    /// The first skeleton in for a target wins; the one actually cached is
    /// answered either way.
    pub fn insert(&self, skeleton: Arc<Skeleton>) -> Arc<Skeleton> {
        let mut loaded = self.lock();
        Arc::clone(loaded.entry(skeleton.target()).or_insert(skeleton))
    }

    /// The cached skeleton for a target, without touching the disk
    pub fn get(&self, target: EngineTarget) -> Option<Arc<Skeleton>> {
        self.lock().get(&target).map(Arc::clone)
    }

    pub fn loaded_targets(&self) -> Vec<EngineTarget> {
        self.lock().keys().copied().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

//! Thread-safe registry of distinct objects.
//!
//! Every operation takes the same exclusive lock. With a zero lock timeout an
//! operation waits for the lock indefinitely; otherwise it gives up once the
//! timeout elapses. The plain API treats a timed-out operation as a no-op
//! (mutations) or as an empty registry (reads). The `try_*` API reports the
//! timeout as [`RegistryError::LockTimeout`] instead.
//!
//! Weak-mode members disappear on their own once their last strong reference
//! outside the registry is dropped. Dead slots are compacted out of the
//! backing map by whichever operation next takes the lock.
//!
//! Members an operation releases (removed slots, predicate rejects) are
//! dropped only after the lock is released, so a member's destructor may
//! use the registry it belonged to.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::holder::{Holder, Ownership, Slot, identity};

/// Members keyed by allocation identity.
struct Members<T: ?Sized> {
    slots: HashMap<usize, Slot<T>>,
}

impl<T: ?Sized> Members<T> {
    fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Drop slots whose weak member has been deallocated.
    fn compact(&mut self) {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.is_alive());
        let expired = before - self.slots.len();
        if expired > 0 {
            tracing::debug!(expired, remaining = self.slots.len(), "compacted expired members");
        }
    }

    fn insert(&mut self, object: &Arc<T>, ownership: Ownership) {
        self.slots
            .entry(identity(object))
            .or_insert_with(|| Slot::new(object, ownership));
    }

    fn live(&self) -> impl Iterator<Item = Arc<T>> + '_ {
        self.slots.values().filter_map(Holder::get)
    }
}

/// A mutually-exclusive set of distinct objects.
///
/// Membership is by identity: two `Arc`s are the same member only if they
/// point at the same allocation. Predicates passed to
/// [`contains_where`](Registry::contains_where) and
/// [`first_where`](Registry::first_where) run while the lock is held and
/// must not call back into the same registry.
///
/// In [`Ownership::Weak`] mode every operation first sweeps dead slots out
/// of the map, which makes even single-member calls such as
/// [`add`](Registry::add) and [`contains`](Registry::contains) linear in the
/// number of slots. Registries of a few thousand members are the intended
/// scale; strong mode does no sweeping.
pub struct Registry<T: ?Sized> {
    ownership: Ownership,
    lock_timeout: Duration,
    members: Mutex<Members<T>>,
}

impl<T: ?Sized> Registry<T> {
    /// Create a registry with the given ownership and lock timeout.
    ///
    /// A zero `lock_timeout` blocks until the lock is available.
    pub fn new(ownership: Ownership, lock_timeout: Duration) -> Self {
        Self {
            ownership,
            lock_timeout,
            members: Mutex::new(Members::new()),
        }
    }

    /// Strong-membership registry that waits for its lock indefinitely.
    pub fn strong() -> Self {
        Self::new(Ownership::Strong, Duration::ZERO)
    }

    /// Weak-membership registry that waits for its lock indefinitely.
    pub fn weak() -> Self {
        Self::new(Ownership::Weak, Duration::ZERO)
    }

    /// Create a registry from validated configuration.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.ownership, config.lock_timeout))
    }

    /// Replace the lock timeout.
    #[must_use]
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Ownership mode fixed at construction.
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Configured lock timeout (zero = wait forever).
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    fn acquire(&self) -> Result<MutexGuard<'_, Members<T>>> {
        let mut members = if self.lock_timeout.is_zero() {
            self.members.lock()
        } else {
            self.members.try_lock_for(self.lock_timeout).ok_or_else(|| {
                tracing::debug!(
                    timeout = ?self.lock_timeout,
                    ownership = %self.ownership,
                    "registry lock timed out"
                );
                RegistryError::LockTimeout {
                    timeout: self.lock_timeout,
                }
            })?
        };
        if self.ownership == Ownership::Weak {
            members.compact();
        }
        Ok(members)
    }

    // ---------------------------------------------------------------------
    // Fallible API
    // ---------------------------------------------------------------------

    /// Insert `object` unless it is `None` or already a member.
    pub fn try_add<'a>(&self, object: impl Into<Option<&'a Arc<T>>>) -> Result<()>
    where
        T: 'a,
    {
        let Some(object) = object.into() else {
            return Ok(());
        };
        self.acquire()?.insert(object, self.ownership);
        Ok(())
    }

    /// Insert every object under a single lock acquisition.
    ///
    /// Empty input returns without touching the lock.
    pub fn try_add_all<'a, I>(&self, objects: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Arc<T>>,
        T: 'a,
    {
        let objects: Vec<&Arc<T>> = objects.into_iter().collect();
        if objects.is_empty() {
            return Ok(());
        }
        let mut members = self.acquire()?;
        for object in objects {
            members.insert(object, self.ownership);
        }
        Ok(())
    }

    /// Remove `object` if it is a member.
    pub fn try_remove(&self, object: &Arc<T>) -> Result<()> {
        // The guard is a temporary of this statement, released before `removed`.
        let removed = self.acquire()?.slots.remove(&identity(object));
        drop(removed);
        Ok(())
    }

    /// Remove every listed object that is a member, under one lock acquisition.
    pub fn try_remove_all<'a, I>(&self, objects: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Arc<T>>,
        T: 'a,
    {
        let objects: Vec<&Arc<T>> = objects.into_iter().collect();
        if objects.is_empty() {
            return Ok(());
        }
        let removed: Vec<Slot<T>> = {
            let mut members = self.acquire()?;
            objects
                .into_iter()
                .filter_map(|object| members.slots.remove(&identity(object)))
                .collect()
        };
        drop(removed);
        Ok(())
    }

    /// Remove all members.
    pub fn try_clear(&self) -> Result<()> {
        let slots = std::mem::take(&mut self.acquire()?.slots);
        drop(slots);
        Ok(())
    }

    /// Number of live members.
    pub fn try_count(&self) -> Result<usize> {
        let members = self.acquire()?;
        Ok(members.slots.values().filter(|slot| slot.is_alive()).count())
    }

    /// Snapshot of the live members, in no particular order.
    pub fn try_all_objects(&self) -> Result<Vec<Arc<T>>> {
        Ok(self.acquire()?.live().collect())
    }

    /// Whether `object` is a live member.
    pub fn try_contains(&self, object: &Arc<T>) -> Result<bool> {
        let members = self.acquire()?;
        Ok(members
            .slots
            .get(&identity(object))
            .is_some_and(Holder::is_alive))
    }

    /// Whether any live member satisfies `predicate`.
    pub fn try_contains_where(&self, predicate: impl FnMut(&T) -> bool) -> Result<bool> {
        Ok(self.try_first_where(predicate)?.is_some())
    }

    /// First live member satisfying `predicate`, in unspecified order.
    pub fn try_first_where(
        &self,
        mut predicate: impl FnMut(&T) -> bool,
    ) -> Result<Option<Arc<T>>> {
        // A weak member can lose its last outside reference while upgraded
        // here, so rejected upgrades are released after the lock.
        let mut rejected = Vec::new();
        let found = {
            let members = self.acquire()?;
            let mut found = None;
            for object in members.live() {
                if predicate(&*object) {
                    found = Some(object);
                    break;
                }
                rejected.push(object);
            }
            found
        };
        drop(rejected);
        Ok(found)
    }

    // ---------------------------------------------------------------------
    // Lenient API: a lock timeout degrades to a no-op or an empty result
    // ---------------------------------------------------------------------

    /// Insert `object` unless it is `None` or already a member.
    pub fn add<'a>(&self, object: impl Into<Option<&'a Arc<T>>>)
    where
        T: 'a,
    {
        self.try_add(object).unwrap_or_default();
    }

    /// Insert every object under a single lock acquisition.
    pub fn add_all<'a, I>(&self, objects: I)
    where
        I: IntoIterator<Item = &'a Arc<T>>,
        T: 'a,
    {
        self.try_add_all(objects).unwrap_or_default();
    }

    /// Remove `object` if it is a member.
    pub fn remove(&self, object: &Arc<T>) {
        self.try_remove(object).unwrap_or_default();
    }

    /// Remove every listed object that is a member.
    pub fn remove_all<'a, I>(&self, objects: I)
    where
        I: IntoIterator<Item = &'a Arc<T>>,
        T: 'a,
    {
        self.try_remove_all(objects).unwrap_or_default();
    }

    /// Remove all members.
    pub fn clear(&self) {
        self.try_clear().unwrap_or_default();
    }

    /// Number of live members; `0` on lock timeout.
    pub fn count(&self) -> usize {
        self.try_count().unwrap_or_default()
    }

    /// Whether there are no live members; `true` on lock timeout.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Snapshot of the live members; empty on lock timeout.
    pub fn all_objects(&self) -> Vec<Arc<T>> {
        self.try_all_objects().unwrap_or_default()
    }

    /// Whether `object` is a live member; `false` on lock timeout.
    pub fn contains(&self, object: &Arc<T>) -> bool {
        self.try_contains(object).unwrap_or_default()
    }

    /// Whether any live member satisfies `predicate`; `false` on lock timeout.
    pub fn contains_where(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.try_contains_where(predicate).unwrap_or_default()
    }

    /// First live member satisfying `predicate`; `None` on lock timeout.
    pub fn first_where(&self, predicate: impl FnMut(&T) -> bool) -> Option<Arc<T>> {
        self.try_first_where(predicate).unwrap_or_default()
    }
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::strong()
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Registry");
        s.field("ownership", &self.ownership)
            .field("lock_timeout", &self.lock_timeout);
        match self.members.try_lock() {
            Some(members) => s.field("slots", &members.slots.len()),
            None => s.field("slots", &"<locked>"),
        };
        s.finish()
    }
}

//! Membership holders: how a registry keeps hold of each member.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Whether a registry keeps its members alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    /// Members are kept alive by the registry.
    #[default]
    Strong,
    /// Members are tracked without extending their lifetime.
    Weak,
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strong => write!(f, "strong"),
            Self::Weak => write!(f, "weak"),
        }
    }
}

impl FromStr for Ownership {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong" => Ok(Self::Strong),
            "weak" => Ok(Self::Weak),
            other => Err(RegistryError::config(format!(
                "unknown ownership '{other}' (expected 'strong' or 'weak')"
            ))),
        }
    }
}

/// Something that may still yield the object it was created for.
pub trait Holder<T: ?Sized> {
    /// The held object, if it is still alive.
    fn get(&self) -> Option<Arc<T>>;

    /// Whether [`get`](Holder::get) would currently return `Some`.
    fn is_alive(&self) -> bool {
        self.get().is_some()
    }
}

/// A registry slot: a strong or weak reference to one member.
pub enum Slot<T: ?Sized> {
    /// Keeps the member alive.
    Strong(Arc<T>),
    /// Yields the member only while something else keeps it alive.
    Weak(Weak<T>),
}

impl<T: ?Sized> Slot<T> {
    /// Hold `object` according to `ownership`.
    pub fn new(object: &Arc<T>, ownership: Ownership) -> Self {
        match ownership {
            Ownership::Strong => Self::Strong(Arc::clone(object)),
            Ownership::Weak => Self::Weak(Arc::downgrade(object)),
        }
    }

    /// Identity of the held allocation.
    ///
    /// Stable for as long as the slot exists, even after a weak member has
    /// been dropped: the slot's `Weak` keeps the allocation itself reserved.
    pub fn identity(&self) -> usize {
        match self {
            Self::Strong(object) => identity(object),
            Self::Weak(object) => Weak::as_ptr(object).cast::<()>().addr(),
        }
    }
}

impl<T: ?Sized> Holder<T> for Slot<T> {
    fn get(&self) -> Option<Arc<T>> {
        match self {
            Self::Strong(object) => Some(Arc::clone(object)),
            Self::Weak(object) => object.upgrade(),
        }
    }

    fn is_alive(&self) -> bool {
        match self {
            Self::Strong(_) => true,
            Self::Weak(object) => object.strong_count() > 0,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Strong(_) => "Strong",
            Self::Weak(_) => "Weak",
        };
        f.debug_struct("Slot")
            .field("kind", &kind)
            .field("identity", &format_args!("{:#x}", self.identity()))
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Identity of an object: the address of its allocation.
///
/// Two `Arc`s share an identity only if they point at the same allocation,
/// regardless of whether their contents compare equal.
pub fn identity<T: ?Sized>(object: &Arc<T>) -> usize {
    Arc::as_ptr(object).cast::<()>().addr()
}

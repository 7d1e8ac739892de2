use std::{
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::RwLock;

use crate::{
    Class, LookupResult, Slot, Value,
    class::ClassInner,
    lookup,
    slot::CONSTRUCTOR,
};

/// The delegation object of a class: its own slots plus at most one
/// parent prototype.
///
/// The parent is fixed at creation, which keeps every chain acyclic. The
/// `constructor` entry is not stored as a slot; it is a weak link back to
/// the owning class so that class and prototype never form a strong cycle.
#[derive(Clone)]
pub struct Prototype(Arc<PrototypeInner>);

struct PrototypeInner {
    slots: RwLock<Vec<Slot>>,
    parent: Option<Prototype>,
    constructor: Weak<ClassInner>,
}

impl Prototype {
    pub(crate) fn new(
        parent: Option<Prototype>,
        constructor: Weak<ClassInner>,
    ) -> Self {
        Self(Arc::new(PrototypeInner {
            slots: RwLock::new(Vec::new()),
            parent,
            constructor,
        }))
    }

    #[inline]
    pub fn parent(&self) -> Option<&Prototype> {
        self.0.parent.as_ref()
    }

    /// The class this prototype belongs to, while that class is alive.
    pub fn constructor(&self) -> Option<Class> {
        self.0.constructor.upgrade().map(Class::from_inner)
    }

    /// Add or replace an own slot.
    ///
    /// Returns `false` and leaves the prototype untouched for the reserved
    /// `constructor` name, which always resolves to the owning class.
    pub fn define(&self, name: &str, value: impl Into<Value>) -> bool {
        if name == CONSTRUCTOR {
            log::warn!("refusing to redefine `{CONSTRUCTOR}` on a prototype");
            return false;
        }
        self.insert_slot(Slot::new(name, value.into()));
        true
    }

    pub(crate) fn insert_slot(&self, slot: Slot) {
        let mut slots = self.0.slots.write();
        match slots.iter_mut().find(|s| s.name == slot.name) {
            Some(existing) => *existing = slot,
            None => slots.push(slot),
        }
    }

    /// Own (non-inherited) slot named `name`.
    pub fn get_own(&self, name: &str) -> Option<Slot> {
        if name == CONSTRUCTOR {
            return self
                .constructor()
                .map(|class| Slot::new(CONSTRUCTOR, Value::Class(class)));
        }
        self.0.slots.read().iter().find(|s| *s.name == *name).cloned()
    }

    #[inline]
    pub fn has_own(&self, name: &str) -> bool {
        self.get_own(name).is_some()
    }

    /// Own slot names in definition order, `constructor` first.
    pub fn own_keys(&self) -> Vec<Arc<str>> {
        let mut keys = Vec::new();
        if self.0.constructor.strong_count() > 0 {
            keys.push(Arc::from(CONSTRUCTOR));
        }
        keys.extend(self.0.slots.read().iter().map(|s| s.name.clone()));
        keys
    }

    /// Resolve `name` here or anywhere up the chain.
    #[inline]
    pub fn lookup(&self, name: &str) -> LookupResult {
        lookup::lookup(self, name)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.lookup(name).into_value()
    }

    /// Number of prototypes above this one.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(proto) = current {
            depth += 1;
            current = proto.parent();
        }
        depth
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = self
            .constructor()
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| "<dropped>".to_string());
        f.debug_struct("Prototype")
            .field("owner", &owner)
            .field("keys", &self.own_keys())
            .field("has_parent", &self.0.parent.is_some())
            .finish()
    }
}

use crate::{Prototype, Slot, Value};

/// The result of a slot lookup.
#[derive(Debug, Clone)]
pub enum LookupResult {
    /// Name was not found anywhere on the chain.
    None,
    /// Name was found.
    Found {
        /// The prototype that owns the slot (may differ from the start of
        /// the walk if the slot was inherited).
        holder: Prototype,
        /// Copy of the matching slot.
        slot: Slot,
        /// Number of parent links followed to reach `holder`.
        depth: usize,
    },
}

impl LookupResult {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::None => None,
            Self::Found { slot, .. } => Some(slot.value),
        }
    }
}

/// Look up `name` starting at `start`.
///
/// Scans the own slots of each prototype, most-derived first, and follows
/// the single parent link until a match is found or the chain ends. A chain
/// terminated at nothing simply runs out; there is no implicit fallback to
/// the object root.
pub fn lookup(start: &Prototype, name: &str) -> LookupResult {
    let mut current = Some(start);
    let mut depth = 0;

    while let Some(proto) = current {
        if let Some(slot) = proto.get_own(name) {
            return LookupResult::Found {
                holder: proto.clone(),
                slot,
                depth,
            };
        }
        current = proto.parent();
        depth += 1;
    }

    log::trace!("lookup of `{name}` missed after {depth} prototypes");
    LookupResult::None
}

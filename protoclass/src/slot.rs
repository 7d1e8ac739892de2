use std::{fmt, sync::Arc};

use crate::Value;

/// Name of the constructor hook recognized in a method table.
pub const CONSTRUCT: &str = "__construct";
/// Name of the virtual constructor hook recognized in a method table.
pub const VCONSTRUCT: &str = "__vconstruct";
/// Reserved entry pointing back at the owning class.
pub const CONSTRUCTOR: &str = "constructor";

/// Property flags for a [`Slot`].
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SlotFlags(pub u8);

impl SlotFlags {
    pub const NONE: Self = Self(0);

    /// Plain data slot; reading it yields the value.
    pub const CONSTANT: Self = Self(1 << 0);

    /// Slot holds something callable with a receiver.
    pub const EXECUTABLE: Self = Self(1 << 1);

    /// Slot name is part of the construction protocol
    /// (`__construct`, `__vconstruct`, `constructor`).
    pub const RESERVED: Self = Self(1 << 2);

    #[inline(always)]
    pub const fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }

    #[inline(always)]
    pub const fn with(self, flag: Self) -> Self {
        Self(self.0 | flag.0)
    }

    #[inline(always)]
    pub const fn without(self, flag: Self) -> Self {
        Self(self.0 & !flag.0)
    }
}

impl fmt::Debug for SlotFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::CONSTANT) {
            set.entry(&"CONSTANT");
        }
        if self.contains(Self::EXECUTABLE) {
            set.entry(&"EXECUTABLE");
        }
        if self.contains(Self::RESERVED) {
            set.entry(&"RESERVED");
        }
        set.finish()
    }
}

/// A named entry of a method table or prototype.
#[derive(Clone)]
pub struct Slot {
    pub name: Arc<str>,
    pub flags: SlotFlags,
    pub value: Value,
}

impl Slot {
    /// Build a slot, deriving its flags from the name and value.
    pub fn new(name: impl Into<Arc<str>>, value: Value) -> Self {
        let name = name.into();
        let mut flags = if value.is_callable() {
            SlotFlags::EXECUTABLE
        } else {
            SlotFlags::CONSTANT
        };
        if is_reserved(&name) {
            flags = flags.with(SlotFlags::RESERVED);
        }
        Self { name, flags, value }
    }

    #[inline(always)]
    pub fn is_executable(&self) -> bool {
        self.flags.contains(SlotFlags::EXECUTABLE)
    }

    #[inline(always)]
    pub fn is_constant(&self) -> bool {
        self.flags.contains(SlotFlags::CONSTANT)
    }

    #[inline(always)]
    pub fn is_reserved(&self) -> bool {
        self.flags.contains(SlotFlags::RESERVED)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("value", &self.value)
            .finish()
    }
}

#[inline]
pub fn is_reserved(name: &str) -> bool {
    matches!(name, CONSTRUCT | VCONSTRUCT | CONSTRUCTOR)
}

use std::sync::Arc;

use crate::{
    Instance, Method, Result, Slot, Value,
    slot::{CONSTRUCT, VCONSTRUCT},
};

/// The caller-supplied table of own entries handed to `extend`.
///
/// Entries keep insertion order; inserting an existing name replaces the
/// earlier value in place, the way assigning an object key twice does.
/// The table is consumed by `extend` and copied into a fresh
/// [`Prototype`](crate::Prototype), so later edits to a cloned table never
/// reach an already built class.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    name: Option<Arc<str>>,
    slots: Vec<Slot>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table whose class will report `name` in diagnostics.
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(Arc::from(name)),
            slots: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        let slot = Slot::new(name, value.into());
        match self.slots.iter_mut().find(|s| *s.name == *name) {
            Some(existing) => *existing = slot,
            None => self.slots.push(slot),
        }
    }

    pub fn constant(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn method<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(name, Method::new(f));
        self
    }

    /// Install a `__construct` entry.
    pub fn construct<F>(self, f: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.method(CONSTRUCT, f)
    }

    /// Install a `__vconstruct` entry. The hook is called as
    /// `(self_class, parent_class, ...args)`.
    pub fn vconstruct<F>(self, f: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.method(VCONSTRUCT, f)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|s| *s.name == *name)
            .map(|s| &s.value)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Callable entry stored under `name`, if any.
    pub(crate) fn hook(&self, name: &str) -> Option<Value> {
        self.get(name).filter(|v| v.is_callable()).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let table = MethodTable::new()
            .constant("a", 1i64)
            .constant("b", 2i64)
            .constant("a", 3i64);

        let names: Vec<&str> = table.iter().map(|s| &*s.name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(table.get("a"), Some(&Value::Fixnum(3)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn hooks_must_be_callable() {
        let table = MethodTable::new()
            .constant(CONSTRUCT, "not a function")
            .vconstruct(|_, _| Ok(Value::Nil));

        assert!(table.hook(CONSTRUCT).is_none());
        assert!(table.hook(VCONSTRUCT).is_some());
        assert!(table.contains(CONSTRUCT));
    }

    #[test]
    fn named_table_carries_name() {
        assert_eq!(MethodTable::named("Cat").name(), Some("Cat"));
        assert_eq!(MethodTable::new().name(), None);
        assert!(MethodTable::new().is_empty());
    }
}

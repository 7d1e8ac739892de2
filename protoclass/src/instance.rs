use std::{fmt, sync::Arc};

use parking_lot::RwLock;

use crate::{Class, ClassError, Prototype, Result, Slot, Value};

/// An object created by [`Class::new_instance`].
///
/// Holds its own fields and delegates every other lookup to the
/// prototype chain of its class. The instance keeps its class alive, so
/// the `constructor` entry always resolves.
#[derive(Clone)]
pub struct Instance(Arc<InstanceInner>);

struct InstanceInner {
    fields: RwLock<Vec<Slot>>,
    class: Class,
}

impl Instance {
    pub(crate) fn allocate(class: Class) -> Self {
        Self(Arc::new(InstanceInner {
            fields: RwLock::new(Vec::new()),
            class,
        }))
    }

    #[inline]
    pub fn prototype(&self) -> &Prototype {
        self.0.class.prototype()
    }

    #[inline]
    pub fn class(&self) -> &Class {
        &self.0.class
    }

    #[inline]
    pub fn class_name(&self) -> &str {
        self.0.class.name()
    }

    /// Set an own field, shadowing anything inherited.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let slot = Slot::new(name, value.into());
        let mut fields = self.0.fields.write();
        match fields.iter_mut().find(|s| *s.name == *name) {
            Some(existing) => *existing = slot,
            None => fields.push(slot),
        }
    }

    #[inline]
    pub fn has_own(&self, name: &str) -> bool {
        self.0.fields.read().iter().any(|s| *s.name == *name)
    }

    /// Own field names in assignment order.
    pub fn own_keys(&self) -> Vec<Arc<str>> {
        self.0.fields.read().iter().map(|s| s.name.clone()).collect()
    }

    /// Resolve `name` on the instance, then up the prototype chain.
    pub fn try_get(&self, name: &str) -> Option<Value> {
        let own = self
            .0
            .fields
            .read()
            .iter()
            .find(|s| *s.name == *name)
            .map(|s| s.value.clone());
        own.or_else(|| self.prototype().get(name))
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        self.try_get(name)
            .ok_or_else(|| ClassError::MissingMember {
                name: name.to_string(),
                class: self.class_name().to_string(),
            })
    }

    /// Resolve `name` and call it with `self` as receiver.
    pub fn send(&self, name: &str, args: &[Value]) -> Result<Value> {
        let member = self.get(name)?;
        if !member.is_callable() {
            return Err(ClassError::NotCallable {
                name: name.to_string(),
                class: self.class_name().to_string(),
            });
        }
        member.call(self, args)
    }

    /// `true` if `class`'s prototype is on this instance's chain.
    pub fn is_instance_of(&self, class: &Class) -> bool {
        let target = class.prototype();
        let mut current = Some(self.prototype());
        while let Some(proto) = current {
            if proto.ptr_eq(target) {
                return true;
            }
            current = proto.parent();
        }
        false
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.0.fields.read();
        let mut map = f.debug_map();
        map.entry(&"class", &self.class_name());
        for slot in fields.iter() {
            map.entry(&slot.name, &slot.value);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MethodTable, argument, base_class, extend};

    fn counter_class() -> Class {
        base_class().extend(
            MethodTable::named("Counter")
                .construct(|this, args| {
                    let start = argument(args, 0).as_i64().unwrap_or(0);
                    this.set("count", start);
                    Ok(Value::Nil)
                })
                .method("bump", |this, _| {
                    let next = this.get("count")?.as_i64().unwrap_or(0) + 1;
                    this.set("count", next);
                    Ok(next.into())
                })
                .constant("step", 1i64),
        )
    }

    #[test]
    fn fields_shadow_prototype() {
        let class = counter_class();
        let counter = class.new_instance(&[]).unwrap();
        assert_eq!(counter.get("step").unwrap(), Value::Fixnum(1));
        assert!(!counter.has_own("step"));

        counter.set("step", 10i64);
        assert!(counter.has_own("step"));
        assert_eq!(counter.get("step").unwrap(), Value::Fixnum(10));
        assert_eq!(class.get("step"), Some(Value::Fixnum(1)));
    }

    #[test]
    fn send_calls_with_receiver() {
        let counter = counter_class().new_instance(&[41i64.into()]).unwrap();
        assert_eq!(counter.send("bump", &[]).unwrap(), Value::Fixnum(42));
        assert_eq!(counter.get("count").unwrap(), Value::Fixnum(42));
    }

    #[test]
    fn send_rejects_constants() {
        let counter = counter_class().new_instance(&[]).unwrap();
        let err = counter.send("step", &[]).unwrap_err();
        assert_eq!(
            err,
            ClassError::NotCallable {
                name: "step".to_string(),
                class: "Counter".to_string(),
            }
        );
    }

    #[test]
    fn missing_member_is_an_error() {
        let counter = counter_class().new_instance(&[]).unwrap();
        assert!(matches!(
            counter.get("nope"),
            Err(ClassError::MissingMember { .. })
        ));
        assert!(counter.try_get("nope").is_none());
    }

    #[test]
    fn bare_instances_have_only_their_table() {
        let point = extend(
            None,
            MethodTable::named("Point")
                .constant("x", 1i64)
                .method("norm", |this, _| {
                    let x = this.get("x")?.as_i64().unwrap_or(0);
                    Ok(x.abs().into())
                }),
        );
        let p = point.new_instance(&[]).unwrap();

        assert_eq!(p.get("x").unwrap(), Value::Fixnum(1));
        assert_eq!(p.send("norm", &[]).unwrap(), Value::Fixnum(1));
        for default in ["to_string", "has_own", "value_of"] {
            assert!(
                matches!(
                    p.send(default, &[]),
                    Err(ClassError::MissingMember { .. })
                ),
                "{default} must not resolve on a bare instance"
            );
        }
    }

    #[test]
    fn instance_keeps_class_alive() {
        let counter = counter_class().new_instance(&[]).unwrap();
        assert_eq!(counter.class_name(), "Counter");
        assert!(counter.get("constructor").is_ok());
    }

    #[test]
    fn class_comes_from_constructor_entry() {
        let class = counter_class();
        let counter = class.new_instance(&[]).unwrap();
        assert!(counter.class().ptr_eq(&class));
        assert_eq!(counter.class_name(), "Counter");

        let ctor = counter.get("constructor").unwrap();
        assert!(ctor.as_class().is_some_and(|c| c.ptr_eq(&class)));
    }

    #[test]
    fn instance_of_follows_chain() {
        let counter_cls = counter_class();
        let other = counter_class();
        let counter = counter_cls.new_instance(&[]).unwrap();

        assert!(counter.is_instance_of(&counter_cls));
        assert!(counter.is_instance_of(base_class()));
        assert!(!counter.is_instance_of(&other));
    }

    #[test]
    fn own_keys_in_assignment_order() {
        let counter = counter_class().new_instance(&[]).unwrap();
        counter.set("label", "c");
        counter.set("count", 3i64);
        let keys = counter.own_keys();
        let keys: Vec<&str> = keys.iter().map(|k| &**k).collect();
        assert_eq!(keys, ["count", "label"]);
    }
}

//! Single-inheritance classes over prototype delegation.
//!
//! A [`Class`] is a constructor plus a [`Prototype`] (its method table)
//! plus an optional parent class. New classes are derived with one call to
//! [`Class::extend`] or the free function [`extend`], which also accepts
//! "no parent" to build classes whose instances inherit nothing.
//!
//! ```
//! use protoclass::{MethodTable, Value, base_class};
//!
//! let cat = base_class().extend(
//!     MethodTable::named("Cat")
//!         .constant("sound", "meow")
//!         .method("say", |this, _| {
//!             Ok(format!("cat says {}", this.get("sound")?).into())
//!         }),
//! );
//! let tiger = cat.extend(MethodTable::named("Tiger").constant("sound", "roar"));
//!
//! let t = tiger.new_instance(&[]).unwrap();
//! assert_eq!(t.send("say", &[]).unwrap(), Value::from("cat says roar"));
//! ```

mod class;
mod error;
mod instance;
mod lookup;
mod prototype;
mod slot;
mod special;
mod table;
mod value;

pub use class::{Ancestors, Class, ConstructKind, ExtendArgs, extend};
pub use error::{ClassError, Result};
pub use instance::Instance;
pub use lookup::{LookupResult, lookup};
pub use prototype::Prototype;
pub use slot::{CONSTRUCT, CONSTRUCTOR, Slot, SlotFlags, VCONSTRUCT};
pub use special::{base_class, object_root};
pub use table::MethodTable;
pub use value::{Method, NativeFn, Value, argument};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// Collects printed lines so tests can assert on them.
    type Output = Arc<Mutex<Vec<String>>>;

    fn cat_and_tiger(out: &Output) -> (Class, Class) {
        let say_out = out.clone();
        let catch_out = out.clone();
        let hunt_out = out.clone();
        let cat = base_class().extend((
            Method::new(|this, args| {
                let name = argument(args, 0);
                this.set("name", if name.truthy() { name } else { "Cat".into() });
                Ok(Value::Nil)
            }),
            MethodTable::named("Cat")
                .constant("sound", "meow")
                .method("say", move |this, _| {
                    let line = format!(
                        "{} makes {}",
                        this.get("name")?,
                        this.get("sound")?
                    );
                    say_out.lock().push(line);
                    Ok(Value::Nil)
                })
                .method("hunt", move |this, _| {
                    let line = format!("{} catches mice", this.get("name")?);
                    catch_out.lock().push(line);
                    Ok(Value::Nil)
                }),
        ));

        let tiger = cat.extend((
            Method::new(|this, args| {
                let name = argument(args, 0);
                this.set("name", if name.truthy() { name } else { "Tiger".into() });
                Ok(Value::Nil)
            }),
            MethodTable::named("Tiger")
                .constant("sound", "grooarrr")
                .method("hunt", move |this, args| {
                    let prey = argument(args, 0);
                    let prey = if prey.truthy() { prey } else { "sheep".into() };
                    let line = format!("{} hunts {}", this.get("name")?, prey);
                    hunt_out.lock().push(line);
                    Ok(Value::Nil)
                }),
        ));

        (cat, tiger)
    }

    // ── Cat and Tiger ──────────────────────────────────────────────

    #[test]
    fn tiger_overrides_sound_and_hunt() {
        let out = Output::default();
        let (cat, tiger) = cat_and_tiger(&out);

        let t = tiger.new_instance(&[]).unwrap();
        t.send("say", &[]).unwrap();
        t.send("hunt", &["deer".into()]).unwrap();
        t.send("hunt", &[]).unwrap();

        assert_eq!(
            *out.lock(),
            ["Tiger makes grooarrr", "Tiger hunts deer", "Tiger hunts sheep"]
        );

        let inherited = t.get("say").unwrap();
        assert_eq!(Some(inherited), cat.get("say"));
        assert!(!tiger.prototype().has_own("say"));
    }

    #[test]
    fn cat_keeps_its_own_behavior() {
        let out = Output::default();
        let (cat, _tiger) = cat_and_tiger(&out);

        let c = cat.new_instance(&["Tom".into()]).unwrap();
        c.send("say", &[]).unwrap();
        c.send("hunt", &[]).unwrap();

        assert_eq!(*out.lock(), ["Tom makes meow", "Tom catches mice"]);
    }

    // ── Own entries and overriding ─────────────────────────────────

    #[test]
    fn derived_own_entries_match_table() {
        let parent = base_class().extend(
            MethodTable::new()
                .constant("a", 1i64)
                .method("f", |_, _| Ok("parent f".into()))
                .method("g", |_, _| Ok("parent g".into())),
        );
        let child = parent.extend((
            Method::new(|_, _| Ok(Value::Nil)),
            MethodTable::new()
                .constant("b", 2i64)
                .method("f", |_, _| Ok("child f".into())),
        ));

        let mut keys = child.prototype().own_keys();
        keys.retain(|k| &**k != CONSTRUCTOR);
        let keys: Vec<&str> = keys.iter().map(|k| &**k).collect();
        assert_eq!(keys, ["b", "f"]);

        let obj = child.new_instance(&[]).unwrap();
        assert_eq!(obj.send("f", &[]).unwrap(), Value::from("child f"));
        assert_eq!(obj.send("g", &[]).unwrap(), Value::from("parent g"));
        assert_eq!(obj.get("a").unwrap(), Value::Fixnum(1));
    }
}

use std::sync::LazyLock;

use crate::{Class, ClassError, MethodTable, Value, argument, extend};

// Both singletons are built lazily on first access and live until process
// exit.
static OBJECT_ROOT: LazyLock<Class> = LazyLock::new(|| {
    extend(
        None,
        MethodTable::named("Object")
            .method("to_string", |this, _| {
                Ok(format!("[object {}]", this.class_name()).into())
            })
            .method("has_own", |this, args| {
                let name = argument(args, 0);
                let name = name.as_str().ok_or_else(|| ClassError::Type {
                    expected: "string",
                    got: name.type_name().to_string(),
                })?;
                Ok(this.has_own(name).into())
            })
            .method("value_of", |this, _| Ok(Value::Instance(this.clone()))),
    )
});

static BASE_CLASS: LazyLock<Class> =
    LazyLock::new(|| object_root().extend(MethodTable::named("BaseClass")));

/// The universal object root class.
///
/// Its prototype has no parent and carries the default behaviors every
/// ordinary object gets:
/// - `to_string()` returns `"[object <ClassName>]"`
/// - `has_own(name)` reports whether the receiver has an own field `name`
/// - `value_of()` returns the receiver itself
#[inline]
pub fn object_root() -> &'static Class {
    &OBJECT_ROOT
}

/// The class every ordinary hierarchy starts from: the object root
/// extended with an empty table.
#[inline]
pub fn base_class() -> &'static Class {
    &BASE_CLASS
}

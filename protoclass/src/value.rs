use std::{fmt, sync::Arc};

use crate::{Class, ClassError, Instance, Result};

/// Signature of every native callable: receiver first, then the
/// positional arguments.
pub type NativeFn = dyn Fn(&Instance, &[Value]) -> Result<Value> + Send + Sync;

/// A shareable native method.
///
/// Cloning a `Method` clones the handle, not the closure, so two slots
/// holding clones of the same method compare equal with
/// [`Method::ptr_eq`].
#[derive(Clone)]
pub struct Method(Arc<NativeFn>);

/// A dynamically typed slot value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Fixnum(i64),
    Float(f64),
    Str(Arc<str>),
    Method(Method),
    Class(Class),
    Instance(Instance),
}

impl Method {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[inline]
    pub fn call(&self, this: &Instance, args: &[Value]) -> Result<Value> {
        (self.0)(this, args)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({:p})", Arc::as_ptr(&self.0))
    }
}

impl Value {
    pub fn str(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Methods and classes can be called; calling a class runs its
    /// constructor on the receiver.
    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Method(_) | Self::Class(_))
    }

    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Fixnum(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Fixnum(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Self::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Fixnum(_) => "fixnum",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Method(_) => "method",
            Self::Class(_) => "class",
            Self::Instance(_) => "instance",
        }
    }

    /// Invoke this value with `this` as receiver.
    ///
    /// A class value runs [`Class::construct`] and yields `nil`, which is
    /// how a virtual constructor hands off to its parent.
    pub fn call(&self, this: &Instance, args: &[Value]) -> Result<Value> {
        match self {
            Self::Method(method) => method.call(this, args),
            Self::Class(class) => {
                class.construct(this, args)?;
                Ok(Value::Nil)
            }
            other => Err(ClassError::Type {
                expected: "callable",
                got: other.type_name().to_string(),
            }),
        }
    }
}

/// Positional argument `index`, or `nil` when the caller passed fewer.
#[inline]
pub fn argument(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Fixnum(a), Self::Fixnum(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Method(a), Self::Method(b)) => a.ptr_eq(b),
            (Self::Class(a), Self::Class(b)) => a.ptr_eq(b),
            (Self::Instance(a), Self::Instance(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("Nil"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Fixnum(n) => write!(f, "Fixnum({n})"),
            Self::Float(n) => write!(f, "Float({n})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Method(m) => fmt::Debug::fmt(m, f),
            Self::Class(c) => write!(f, "Class({})", c.name()),
            Self::Instance(i) => write!(f, "Instance({})", i.class_name()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Fixnum(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::Method(_) => f.write_str("<method>"),
            Self::Class(c) => write!(f, "<class {}>", c.name()),
            Self::Instance(i) => write!(f, "<{} instance>", i.class_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Fixnum(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::str(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<Method> for Value {
    fn from(value: Method) -> Self {
        Self::Method(value)
    }
}

impl From<Class> for Value {
    fn from(value: Class) -> Self {
        Self::Class(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Self::Instance(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_class;

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.truthy());
        assert!(!Value::Bool(false).truthy());
        assert!(Value::Fixnum(0).truthy());
        assert!(Value::from("").truthy());
    }

    #[test]
    fn callables_compare_by_identity() {
        let m = Method::new(|_, _| Ok(Value::Nil));
        let same = Value::from(m.clone());
        let other = Value::from(Method::new(|_, _| Ok(Value::Nil)));

        assert_eq!(Value::from(m), same);
        assert_ne!(same, other);
        assert_eq!(Value::from("a"), Value::from("a".to_string()));
        assert_ne!(Value::Fixnum(1), Value::Float(1.0));
    }

    #[test]
    fn calling_constants_fails() {
        let this = base_class().new_instance(&[]).unwrap();
        let err = Value::Fixnum(3).call(&this, &[]).unwrap_err();
        assert_eq!(
            err,
            ClassError::Type {
                expected: "callable",
                got: "fixnum".to_string(),
            }
        );
    }

    #[test]
    fn missing_arguments_are_nil() {
        let args = [Value::Fixnum(1)];
        assert_eq!(argument(&args, 0), Value::Fixnum(1));
        assert!(argument(&args, 1).is_nil());
    }
}

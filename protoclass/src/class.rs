use std::{fmt, sync::Arc};

use crate::{
    Instance, Method, MethodTable, Prototype, Result, Value,
    slot::{CONSTRUCT, CONSTRUCTOR, VCONSTRUCT},
};

const ANONYMOUS: &str = "anonymous";

/// The call forms accepted by [`extend`].
///
/// Which arguments were supplied is decided by the caller's types, so the
/// "is the first argument a function or a table" question is answered at
/// compile time.
#[derive(Debug, Clone, Default)]
pub enum ExtendArgs {
    #[default]
    Empty,
    Table(MethodTable),
    Constructor(Method),
    Both(Method, MethodTable),
}

impl ExtendArgs {
    /// Split into the explicit constructor and the method table.
    ///
    /// The table-only form leaves the constructor slot empty so that
    /// resolution falls through to `__construct` and synthesis.
    pub fn into_parts(self) -> (Option<Method>, Option<MethodTable>) {
        match self {
            Self::Empty => (None, None),
            Self::Table(table) => (None, Some(table)),
            Self::Constructor(ctor) => (Some(ctor), None),
            Self::Both(ctor, table) => (Some(ctor), Some(table)),
        }
    }
}

impl From<()> for ExtendArgs {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl From<MethodTable> for ExtendArgs {
    fn from(table: MethodTable) -> Self {
        Self::Table(table)
    }
}

impl From<Method> for ExtendArgs {
    fn from(ctor: Method) -> Self {
        Self::Constructor(ctor)
    }
}

impl From<(Method, MethodTable)> for ExtendArgs {
    fn from((ctor, table): (Method, MethodTable)) -> Self {
        Self::Both(ctor, table)
    }
}

/// How a class initializes a receiver.
#[derive(Clone)]
pub(crate) enum Construct {
    /// Derived from nothing and given no constructor.
    Noop,
    /// Explicit constructor argument or `__construct` entry.
    Explicit(Value),
    /// Pass every argument through to the parent unchanged.
    Forward(Class),
    /// Call `hook(self_class, parent, ...args)`.
    Virtual { hook: Value, parent: Class },
}

/// Payload-free view of [`Construct`] for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    Noop,
    Explicit,
    Forward,
    Virtual,
}

impl Construct {
    fn kind(&self) -> ConstructKind {
        match self {
            Self::Noop => ConstructKind::Noop,
            Self::Explicit(_) => ConstructKind::Explicit,
            Self::Forward(_) => ConstructKind::Forward,
            Self::Virtual { .. } => ConstructKind::Virtual,
        }
    }
}

pub(crate) struct ClassInner {
    name: Arc<str>,
    construct: Construct,
    prototype: Prototype,
    parent: Option<Class>,
}

/// A constructor together with its prototype and parent.
///
/// Cloning is cheap and yields the same class; identity is compared with
/// [`Class::ptr_eq`]. A class never changes after [`extend`] returns,
/// though the slots of its prototype remain mutable.
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

/// Derive a new class from `receiver`.
///
/// `None` is the "no parent" sentinel: the new prototype has no parent at
/// all, so instances inherit nothing, not even the object root defaults.
/// `Some(class)` chains the new prototype below `class.prototype()`.
///
/// Constructor resolution, first match wins:
/// 1. the explicit constructor argument
/// 2. a callable `__construct` entry in the table
/// 3. a no-op, when deriving from nothing
/// 4. forwarding all arguments to the parent, when the table has no
///    callable `__vconstruct`
/// 5. calling `__vconstruct(self_class, parent, ...args)`
pub fn extend(receiver: Option<&Class>, args: impl Into<ExtendArgs>) -> Class {
    let (explicit, table) = args.into().into_parts();
    let table = table.unwrap_or_default();

    let construct = match explicit {
        Some(ctor) => Construct::Explicit(Value::Method(ctor)),
        None => match (table.hook(CONSTRUCT), receiver) {
            (Some(ctor), _) => Construct::Explicit(ctor),
            (None, None) => Construct::Noop,
            (None, Some(parent)) => match table.hook(VCONSTRUCT) {
                Some(hook) => Construct::Virtual {
                    hook,
                    parent: parent.clone(),
                },
                None => Construct::Forward(parent.clone()),
            },
        },
    };

    let name: Arc<str> = Arc::from(table.name().unwrap_or(ANONYMOUS));
    log::debug!(
        "extend {} from {}: {:?} constructor, {} entries",
        name,
        receiver.map_or("nothing", |p| p.name()),
        construct.kind(),
        table.len(),
    );

    let inner = Arc::new_cyclic(|me| {
        let prototype =
            Prototype::new(receiver.map(|p| p.prototype().clone()), me.clone());

        for slot in table.iter() {
            if *slot.name == *CONSTRUCT || *slot.name == *CONSTRUCTOR {
                continue;
            }
            log::trace!("  copy `{}` {:?}", slot.name, slot.flags);
            prototype.insert_slot(slot.clone());
        }

        ClassInner {
            name,
            construct,
            prototype,
            parent: receiver.cloned(),
        }
    });

    Class(inner)
}

impl Class {
    pub(crate) fn from_inner(inner: Arc<ClassInner>) -> Self {
        Self(inner)
    }

    /// Derive a subclass with `self` as parent.
    #[inline]
    pub fn extend(&self, args: impl Into<ExtendArgs>) -> Class {
        extend(Some(self), args)
    }

    /// Allocate an instance delegating to this class's prototype and run
    /// the constructor on it.
    pub fn new_instance(&self, args: &[Value]) -> Result<Instance> {
        let instance = Instance::allocate(self.clone());
        self.construct(&instance, args)?;
        Ok(instance)
    }

    /// Run this class's constructor logic on an existing receiver.
    ///
    /// This is what a subclass does when it hands construction to its
    /// parent. Constructor return values are discarded.
    pub fn construct(&self, this: &Instance, args: &[Value]) -> Result<()> {
        match &self.0.construct {
            Construct::Noop => Ok(()),
            Construct::Explicit(ctor) => ctor.call(this, args).map(drop),
            Construct::Forward(parent) => parent.construct(this, args),
            Construct::Virtual { hook, parent } => {
                let mut full = Vec::with_capacity(args.len() + 2);
                full.push(Value::Class(self.clone()));
                full.push(Value::Class(parent.clone()));
                full.extend_from_slice(args);
                hook.call(this, &full).map(drop)
            }
        }
    }

    #[inline]
    pub fn construct_kind(&self) -> ConstructKind {
        self.0.construct.kind()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[inline]
    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    #[inline]
    pub fn prototype(&self) -> &Prototype {
        &self.0.prototype
    }

    /// Resolve a member through the prototype chain without an instance.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.prototype().get(name)
    }

    /// Parents of this class, nearest first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// `true` if `self` is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ptr_eq(other) || self.ancestors().any(|a| a.ptr_eq(other))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a Class>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Class;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name())
            .field("construct", &self.construct_kind())
            .field("parent", &self.parent().map(|p| p.name()))
            .finish()
    }
}

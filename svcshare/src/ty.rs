use std::{
    any::{self, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

/// Describes a concrete Rust type.
///
/// Equality and hashing consider only the [`id`](Type::id); the name is kept
/// for diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct Type {
    /// The full path name of the type.
    pub name: &'static str,
    /// The unique identifier of the type.
    pub id: TypeId,
}

impl Type {
    /// Returns the descriptor of `T`.
    pub fn of<T: 'static>() -> Type {
        Type {
            name: any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Returns whether this descriptor denotes `T`.
    pub fn is<T: 'static>(self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

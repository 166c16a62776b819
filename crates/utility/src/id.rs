use std::{fmt, hash, marker::PhantomData};

use serde::{Deserialize, Serialize};

pub trait HasId {
    type IdType;
}

/// An identifier that is tagged with the type it identifies, so ids of
/// different kinds can not be mixed up.
pub struct Id<T: HasId>(T::IdType, PhantomData<T>);

impl<T: HasId> Id<T> {
    pub fn new(inner: T::IdType) -> Self {
        Self(inner, PhantomData)
    }
}

/// Hands out strictly increasing numeric ids. An id handed out later always
/// compares greater than every id handed out before it.
pub struct IdGenerator<T: HasId<IdType = u64>> {
    last: u64,
    _phantom: PhantomData<T>,
}

impl<T: HasId<IdType = u64>> IdGenerator<T> {
    pub fn new() -> Self {
        Self {
            last: 0,
            _phantom: PhantomData,
        }
    }

    pub fn next_id(&mut self) -> Id<T> {
        self.last += 1;
        Id::new(self.last)
    }

    /// `true` if `id` is the most recently issued id.
    pub fn is_current(&self, id: &Id<T>) -> bool {
        self.last == id.0
    }
}

impl<T: HasId<IdType = u64>> Default for IdGenerator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HasId<IdType = u64>> fmt::Debug for IdGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").field("last", &self.last).finish()
    }
}

impl<T: HasId<IdType = u64>> Clone for IdGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            last: self.last,
            _phantom: PhantomData,
        }
    }
}

impl<T: HasId> fmt::Debug for Id<T>
where
    T::IdType: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.0).finish()
    }
}

impl<T: HasId> fmt::Display for Id<T>
where
    T::IdType: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: HasId> Clone for Id<T>
where
    T::IdType: Clone,
{
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T: HasId> Copy for Id<T> where T::IdType: Copy {}

impl<T: HasId> hash::Hash for Id<T>
where
    T::IdType: hash::Hash,
{
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T: HasId> PartialEq for Id<T>
where
    T::IdType: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl<T: HasId> Eq for Id<T> where T::IdType: Eq {}

impl<T: HasId> PartialOrd for Id<T>
where
    T::IdType: PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl<T: HasId> Ord for Id<T>
where
    T::IdType: Ord,
{
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<'de, T: HasId> Deserialize<'de> for Id<T>
where
    T::IdType: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::IdType::deserialize(deserializer).map(|id| Id::new(id))
    }
}

impl<T: HasId> Serialize for Id<T>
where
    T::IdType: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

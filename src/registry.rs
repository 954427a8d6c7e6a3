//! Per-caller conversion registry for values known only at run time.
//!
//! Types that implement [`PackedRep`] can be converted directly. A [`Converters`] map is
//! for code that holds values behind `&dyn Any`, or that wants to override how a type is
//! packed without touching the type.

use crate::{
    encoding::encode_full, errors::EncodeError, rep::PackedRep, timestamp::Timestamp, Packed,
};
use bytes::Bytes;
use half::f16;
use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    fmt,
    time::SystemTime,
};

type ConvertFn = Box<dyn Fn(&dyn Any) -> Option<Packed> + Send + Sync>;

struct Entry {
    type_name: &'static str,
    convert: ConvertFn,
}

/// A map from concrete types to the functions that convert them into [`Packed`].
///
/// # Example
///
/// ```
/// use packed_json::{registry::Converters, Packed};
///
/// struct Celsius(f64);
///
/// let mut converters = Converters::with_builtins();
/// converters.register(|c: &Celsius| Packed::Fixed64(c.0));
///
/// assert_eq!(converters.to_packed(&Celsius(21.5)).unwrap(), Packed::Fixed64(21.5));
/// assert_eq!(converters.to_packed(&7u64).unwrap(), Packed::VarUInt(7));
///
/// // never silently null
/// struct Unknown;
/// assert!(converters.to_packed(&Unknown).is_err());
/// ```
#[derive(Default)]
pub struct Converters {
    entries: HashMap<TypeId, Entry>,
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.values().map(|e| e.type_name).collect();
        names.sort_unstable();
        f.debug_struct("Converters").field("types", &names).finish()
    }
}

macro_rules! register_reps {
    ($converters:ident, $($t:ty),*) => {
        $( $converters.register_rep::<$t>(); )*
    };
}

impl Converters {
    /// An empty registry.
    pub fn new() -> Self { Self::default() }

    /// A registry holding every scalar type the crate converts natively.
    pub fn with_builtins() -> Self {
        let mut converters = Self::new();
        register_reps!(
            converters, Packed, (), bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize,
            f16, f32, f64, char, String, Bytes, Timestamp, SystemTime
        );
        converters
    }

    /// Registers `convert` for values of type `T`, replacing any earlier entry.
    pub fn register<T, F>(&mut self, convert: F) -> &mut Self
    where
        T: Any,
        F: Fn(&T) -> Packed + Send + Sync + 'static,
    {
        let type_name = type_name::<T>();
        let entry = Entry {
            type_name,
            convert: Box::new(move |any: &dyn Any| any.downcast_ref::<T>().map(&convert)),
        };
        if self.entries.insert(TypeId::of::<T>(), entry).is_some() {
            tracing::debug!(type_name, "replaced packed converter");
        } else {
            tracing::debug!(type_name, "registered packed converter");
        }
        self
    }

    /// Registers `T` through its [`PackedRep`] implementation.
    pub fn register_rep<T: PackedRep + Any>(&mut self) -> &mut Self {
        self.register(T::to_packed)
    }

    /// Indicates whether `T` has a converter.
    pub fn contains<T: Any>(&self) -> bool { self.entries.contains_key(&TypeId::of::<T>()) }

    /// Number of registered types.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Indicates whether nothing is registered.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Converts `value` with the converter registered for `T`.
    ///
    /// # Errors
    ///
    /// [`EncodeError::UnmappedType`] if `T` was never registered.
    pub fn to_packed<T: Any>(&self, value: &T) -> Result<Packed, EncodeError> {
        self.lookup(value, type_name::<T>())
    }

    /// Converts a type-erased value. The error can only name the type by its id.
    pub fn to_packed_dyn(&self, value: &dyn Any) -> Result<Packed, EncodeError> {
        let fallback = format!("{:?}", value.type_id());
        self.lookup(value, &fallback)
    }

    /// Converts and encodes `value`.
    pub fn encode<T: Any>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        self.to_packed(value).map(|p| encode_full(&p))
    }

    fn lookup(&self, value: &dyn Any, name: &str) -> Result<Packed, EncodeError> {
        match self
            .entries
            .get(&value.type_id())
            .and_then(|entry| (entry.convert)(value))
        {
            Some(p) => Ok(p),
            None => {
                tracing::warn!(type_name = name, "no packed converter registered");
                Err(EncodeError::UnmappedType {
                    type_name: name.to_string(),
                })
            }
        }
    }
}

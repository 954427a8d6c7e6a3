use crate::{errors::ConversionError, timestamp::Timestamp, vecmap::*, *};
use bytes::Bytes;
use half::f16;
use std::{
    collections::{BTreeMap, HashMap},
    convert::TryFrom,
    hash::BuildHasher,
    time::SystemTime,
    vec::IntoIter,
};

pub use failure::{bail, format_err, Error};

/// A value representable as [`Packed`].
pub trait PackedRep: Sized {
    /// Converts value into [`Packed`].
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::rep::*;
    ///
    /// let p_num = 1.to_packed();
    /// ```
    fn to_packed(&self) -> Packed;

    /// Consumes value, converting it into [`Packed`].
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::rep::*;
    ///
    /// let p_num = 1.into_packed();
    /// ```
    fn into_packed(self) -> Packed { self.to_packed() }

    /// Converts value from [`Packed`].
    ///
    /// # Arguments
    ///
    /// `p: Packed` - The value to be converted from [`Packed`].
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::rep::*;
    ///
    /// let p_str = "foo".to_string().into_packed();
    ///
    /// assert_eq!(String::from_packed(p_str).unwrap(), "foo");
    /// ```
    fn from_packed(p: Packed) -> Result<Self, Error>;
}

/// Wraps a message in a [`ConversionError`].
pub fn conversion_error(msg: &str) -> Error { ConversionError::new(msg).into() }

fn mismatch(found: &Packed, expected: &str) -> Error {
    conversion_error(&format!("Value is `{}`, not `{}`", found.kind_name(), expected))
}

impl PackedRep for Packed {
    fn to_packed(&self) -> Packed { self.clone() }

    fn into_packed(self) -> Packed { self }

    fn from_packed(p: Packed) -> Result<Self, Error> { Ok(p) }
}

impl PackedRep for bool {
    fn to_packed(&self) -> Packed { Bool(*self) }

    fn from_packed(p: Packed) -> Result<Self, Error> { p.to_bool() }
}

macro_rules! int_rep {
    ($read:ident, $($t:ty),*) => {
        $(
            impl PackedRep for $t {
                fn to_packed(&self) -> Packed { Packed::from(*self) }

                fn from_packed(p: Packed) -> Result<Self, Error> {
                    let wide = p.$read()?;
                    <$t>::try_from(wide).map_err(|_| {
                        format_err!("{} does not fit in `{}`", wide, stringify!($t))
                    })
                }
            }
        )*
    };
}

int_rep!(to_u64, u8, u16, u32, u64, usize);
int_rep!(to_i64, i8, i16, i32, i64, isize);

impl PackedRep for f32 {
    fn to_packed(&self) -> Packed { Fixed32(*self) }

    fn from_packed(p: Packed) -> Result<Self, Error> { Ok(p.to_f64()? as f32) }
}

impl PackedRep for f64 {
    fn to_packed(&self) -> Packed { Fixed64(*self) }

    fn from_packed(p: Packed) -> Result<Self, Error> { p.to_f64() }
}

impl PackedRep for f16 {
    fn to_packed(&self) -> Packed { Fixed32(self.to_f32()) }

    fn from_packed(p: Packed) -> Result<Self, Error> { Ok(f16::from_f64(p.to_f64()?)) }
}

impl PackedRep for char {
    fn to_packed(&self) -> Packed { Packed::from(*self) }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        match p {
            Char(c) => {
                std::char::from_u32(c).ok_or_else(|| format_err!("{:#x} is not a `char`", c))
            }
            other => Err(mismatch(&other, "char")),
        }
    }
}

impl PackedRep for String {
    fn to_packed(&self) -> Packed { Str(self.clone()) }

    fn into_packed(self) -> Packed { Str(self) }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        match p {
            Str(s) => Ok(s),
            other => Err(mismatch(&other, "string")),
        }
    }
}

impl PackedRep for Bytes {
    fn to_packed(&self) -> Packed { Binary(self.clone()) }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        match p {
            Binary(b) => Ok(b),
            other => Err(mismatch(&other, "binary")),
        }
    }
}

impl PackedRep for Timestamp {
    fn to_packed(&self) -> Packed { Packed::Timestamp(*self) }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        match p {
            Packed::Timestamp(ts) => Ok(ts),
            other => Err(mismatch(&other, "timestamp")),
        }
    }
}

impl PackedRep for SystemTime {
    fn to_packed(&self) -> Packed { Packed::Timestamp(Timestamp::saturating_from_system_time(*self)) }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        Ok(Timestamp::from_packed(p)?.to_system_time())
    }
}

impl<T: PackedRep> PackedRep for Vec<T> {
    fn to_packed(&self) -> Packed { Array(self.iter().map(T::to_packed).collect()) }

    fn into_packed(self) -> Packed { Array(self.into_iter().map(T::into_packed).collect()) }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        p.into_vec()?.into_iter().map(T::from_packed).collect()
    }
}

impl<T: PackedRep> PackedRep for VecMap<String, T> {
    fn to_packed(&self) -> Packed {
        Object(VecMap::from_sorted(
            self.iter().map(|(k, v)| (k.clone(), v.to_packed())).collect(),
        ))
    }

    fn into_packed(self) -> Packed {
        Object(VecMap::from_sorted(
            self.into_iter().map(|(k, v)| (k, v.into_packed())).collect(),
        ))
    }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        let vm = p.into_vecmap()?;
        let mut out = Vec::with_capacity(vm.len());
        for (k, v) in vm {
            out.push((k, T::from_packed(v)?));
        }
        Ok(VecMap::from_sorted(out))
    }
}

impl<T: PackedRep, S: BuildHasher + Default> PackedRep for HashMap<String, T, S> {
    fn to_packed(&self) -> Packed {
        Object(self.iter().map(|(k, v)| (k.clone(), v.to_packed())).collect())
    }

    fn into_packed(self) -> Packed {
        Object(self.into_iter().map(|(k, v)| (k, v.into_packed())).collect())
    }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        p.into_vecmap()?
            .into_iter()
            .map(|(k, v)| Ok((k, T::from_packed(v)?)))
            .collect()
    }
}

impl<T: PackedRep> PackedRep for BTreeMap<String, T> {
    fn to_packed(&self) -> Packed {
        // already in key order
        Object(VecMap::from_sorted(
            self.iter().map(|(k, v)| (k.clone(), v.to_packed())).collect(),
        ))
    }

    fn into_packed(self) -> Packed {
        Object(VecMap::from_sorted(
            self.into_iter().map(|(k, v)| (k, v.into_packed())).collect(),
        ))
    }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        p.into_vecmap()?
            .into_iter()
            .map(|(k, v)| Ok((k, T::from_packed(v)?)))
            .collect()
    }
}

impl PackedRep for () {
    fn to_packed(&self) -> Packed { Null }

    fn from_packed(p: Packed) -> Result<(), Error> {
        match p {
            Null => Ok(()),
            other => Err(mismatch(&other, "null")),
        }
    }
}

/// `None` is [`Packed::Null`] and `Some(t)` is `t`'s own representation, so
/// `Some(None)` reads back as `None`.
impl<T: PackedRep> PackedRep for Option<T> {
    fn to_packed(&self) -> Packed {
        match self {
            Some(x) => x.to_packed(),
            None => Null,
        }
    }

    fn into_packed(self) -> Packed {
        match self {
            Some(x) => x.into_packed(),
            None => Null,
        }
    }

    fn from_packed(p: Packed) -> Result<Self, Error> {
        match p {
            Null => Ok(None),
            p => T::from_packed(p).map(Some),
        }
    }
}

macro_rules! tuple_rep {
    ($len:expr, $($t:ident . $i:tt),*) => {
        impl<$($t: PackedRep),*> PackedRep for ($($t,)*) {
            fn to_packed(&self) -> Packed { Array(vec![$(self.$i.to_packed()),*]) }

            fn into_packed(self) -> Packed { Array(vec![$(self.$i.into_packed()),*]) }

            fn from_packed(p: Packed) -> Result<Self, Error> {
                let arr = p.into_vec()?;
                if arr.len() != $len {
                    bail!("Expected a tuple of {} elements, found {}", $len, arr.len());
                }
                let mut iter = arr.into_iter();
                Ok(($(pop_packed::<$t>(&mut iter)?,)*))
            }
        }
    };
}

tuple_rep!(1, A.0);
tuple_rep!(2, A.0, B.1);
tuple_rep!(3, A.0, B.1, C.2);
tuple_rep!(4, A.0, B.1, C.2, D.3);

/// Manually specify how the fields of a struct should be converted to [`Packed`].
/// Usually, you should just add `#[derive(PackedRep)]` to your struct definition instead
/// of doing it manually.
///
/// # Arguments
///
/// * `entries: Vec<(&str, Packed)>` - A vector of pairs containing the name of the field
///   and the value.
///
/// # Examples
///
/// An example using `#[derive(PackedRep)]`.
///
/// ```
/// use packed_json::prelude::*;
///
/// #[derive(PackedRep)]
/// /// This is a silly struct.
/// struct SillyStruct {
///     foo: String,
///     bar: u8,
/// }
///
/// /// This is an example using a silly struct.
/// let example = SillyStruct {
///     foo: "hello world".to_string(),
///     bar: 0,
/// };
///
/// /// Here, in the spirit of the silly struct, we convert it to and from `Packed`.
/// let extracted = SillyStruct::from_packed(example.to_packed()).unwrap();
///
/// assert_eq!(extracted.foo, example.foo);
/// assert_eq!(extracted.bar, example.bar);
/// ```
///
/// An example of how this might be done manually.
///
/// ```
/// use packed_json::{rep::*, Packed};
///
/// /// This is, again, a silly struct.
/// struct SillyStruct {
///     foo: String,
///     bar: u8,
/// }
///
/// impl PackedRep for SillyStruct {
///     fn to_packed(&self) -> Packed {
///         struct_to_packed_helper(vec![
///             ("foo", self.foo.to_packed()),
///             ("bar", self.bar.to_packed()),
///         ])
///     }
///
///     fn from_packed(p: Packed) -> Result<SillyStruct, Error> {
///         let mut fields = struct_from_packed_helper(p, &["foo", "bar"])?.into_iter();
///         Ok(SillyStruct {
///             foo: pop_packed(&mut fields)?,
///             bar: pop_packed(&mut fields)?,
///         })
///     }
/// }
///
/// let example = SillyStruct {
///     foo: "hello world".to_string(),
///     bar: 0,
/// };
///
/// let extracted = SillyStruct::from_packed(example.to_packed()).unwrap();
///
/// assert_eq!(extracted.foo, example.foo);
/// assert_eq!(extracted.bar, example.bar);
/// ```
///
/// If you find this tedious and repetitive (we do), please see the previous example.
pub fn struct_to_packed_helper(entries: Vec<(&str, Packed)>) -> Packed {
    Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

/// Manually specify how the fields of a struct should be read from [`Packed`]. Usually,
/// you should just add `#[derive(PackedRep)]` to your struct definition instead of doing
/// it manually. See [`struct_to_packed_helper`] for an example of usage.
///
/// Every name must be present, and no other keys may be.
///
/// # Arguments
///
/// * `p: Packed` - The [`Packed`] value containing the struct data.
/// * `names: &[&str]` - The names of the fields in the order they are to be extracted.
pub fn struct_from_packed_helper(p: Packed, names: &[&str]) -> Result<Vec<Packed>, Error> {
    let mut m = p.into_vecmap()?;
    let mut outs = Vec::with_capacity(names.len());
    for name in names {
        match m.remove(*name) {
            Some(v) => outs.push(v),
            None => bail!("Missing field `{}`", name),
        }
    }
    if let Some(extra) = m.keys().next() {
        bail!(
            "Found {actual} fields, expected {exp}; `{extra}` is not a field",
            actual = names.len() + m.len(),
            exp = names.len(),
            extra = extra,
        )
    }
    Ok(outs)
}

/// Helper function to manually specify how the variants of an enum should be converted
/// to [`Packed`]. Usually, you should just add `#[derive(PackedRep)]` to your enum
/// definition instead of doing it manually.
///
/// # Arguments
///
/// * `name: &str` - The name of the enum variant.
/// * `fields: Vec<Packed>` - The corresponding values.
///
/// # Examples
///
/// An example using `#[derive(PackedRep)]`.
///
/// ```
/// use packed_json::prelude::*;
///
/// #[derive(PackedRep, Debug)]
/// /// This is a silly enum. It has no purpose in life beyond being used for an example.
/// enum SillyEnum {
///     Foo(String),
///     Bar(String, u8),
/// }
///
/// use SillyEnum::*;
///
/// let foo = Foo("hello".to_string());
///
/// /// Returns the `String` inside `Foo` if the value is
/// /// indeed a `Foo`, otherwise returns `None`.
/// fn foo_or_none(maybe_foo: SillyEnum) -> Option<String> {
///     match maybe_foo {
///         Foo(s) => Some(s),
///         Bar(_, _) => None,
///     }
/// }
///
/// let extract_foo = SillyEnum::from_packed(foo.to_packed()).unwrap();
///
/// assert_eq!(foo_or_none(extract_foo).unwrap(), "hello".to_string());
/// ```
///
/// An example of how this might be done manually.
///
/// ```
/// use packed_json::{rep::*, Packed};
/// use std::vec::IntoIter;
///
/// #[derive(Debug)]
/// /// This, again, is a silly enum.
/// enum SillyEnum {
///     Foo(String),
///     Bar(String, u8),
/// }
///
/// use SillyEnum::*;
///
/// impl PackedRep for SillyEnum {
///     fn to_packed(&self) -> Packed {
///         match self {
///             Foo(string) => enum_to_packed_helper("Foo", vec![string.to_packed()]),
///             Bar(string, num) => {
///                 enum_to_packed_helper("Bar", vec![string.to_packed(), num.to_packed()])
///             }
///         }
///     }
///
///     fn from_packed(p: Packed) -> Result<SillyEnum, Error> {
///         let fns: Vec<(&str, Box<dyn FnMut(IntoIter<Packed>) -> Result<SillyEnum, Error>>)> = vec![
///             (
///                 "Foo",
///                 Box::new(|mut iter: IntoIter<Packed>| {
///                     let string = pop_packed(&mut iter)?;
///                     expect_exhausted(&mut iter, "Foo")?;
///                     Ok(Foo(string))
///                 }),
///             ),
///             (
///                 "Bar",
///                 Box::new(|mut iter: IntoIter<Packed>| {
///                     let string = pop_packed(&mut iter)?;
///                     let num = pop_packed(&mut iter)?;
///                     expect_exhausted(&mut iter, "Bar")?;
///                     Ok(Bar(string, num))
///                 }),
///             ),
///         ];
///
///         enum_from_packed_helper(p, fns)
///     }
/// }
///
/// let bar = Bar("world".to_string(), 1);
/// match SillyEnum::from_packed(bar.to_packed()).unwrap() {
///     Bar(s, n) => assert_eq!((s.as_str(), n), ("world", 1)),
///     Foo(_) => panic!("wrong variant"),
/// }
/// ```
pub fn enum_to_packed_helper(name: &str, mut fields: Vec<Packed>) -> Packed {
    fields.insert(0, Packed::from(name));
    Array(fields)
}

/// Manually specify how the variants of an enum should be read from [`Packed`]. Usually,
/// you should just add `#[derive(PackedRep)]` to your enum definition instead of doing it
/// manually. See [`enum_to_packed_helper`] for an example of usage.
///
/// The first element of the array picks the constructor; the rest are handed to it.
pub fn enum_from_packed_helper<T>(
    p: Packed,
    fns: Vec<(&str, Box<dyn FnMut(IntoIter<Packed>) -> Result<T, Error>>)>,
) -> Result<T, Error> {
    let mut fields = p.into_vec()?.into_iter();

    let constructor: String = pop_packed(&mut fields)?;
    for (name, mut f) in fns {
        if constructor == name {
            return f(fields);
        }
    }
    bail!("`{}` is not a variant of this enum", constructor)
}

/// Gets the next element from an iterator of [`Packed`] values as `T`.
///
/// # Arguments
///
/// * `iter: &mut IntoIter<Packed>` - An iterator of [`Packed`] values to be converted
///   into `T`.
///
/// # Example
///
/// ```
/// use packed_json::rep::*;
///
/// let p_values = vec![1, 2, 3].into_packed().into_vec().unwrap();
///
/// let first: u8 = pop_packed(&mut p_values.into_iter()).unwrap();
/// assert_eq!(first, 1);
/// ```
pub fn pop_packed<T: PackedRep>(iter: &mut IntoIter<Packed>) -> Result<T, Error> {
    match iter.next() {
        Some(p) => T::from_packed(p),
        None => bail!("Expected another element, found none"),
    }
}

/// Fails if `iter` has elements left. `name` labels the error.
pub fn expect_exhausted(iter: &mut IntoIter<Packed>, name: &str) -> Result<(), Error> {
    match iter.len() {
        0 => Ok(()),
        n => bail!("Too many fields found for `{}`: {} left over", name, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packed_json_macro::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    // Test `PackedRep` autoderive for unit-like struct
    fn unit_struct() {
        #[derive(PackedRep)]
        struct UnitStruct;

        assert_eq!(UnitStruct.to_packed(), Packed::from("UnitStruct"));

        match UnitStruct::from_packed(UnitStruct.into_packed()) {
            Ok(UnitStruct) => (),
            Err(e) => panic!("Couldn't retrieve unit struct: {}", e),
        }

        assert!(UnitStruct::from_packed(Packed::from("Other")).is_err());
    }

    #[test]
    // Test `PackedRep` autoderive for C-style struct
    fn c_struct() {
        #[derive(PackedRep)]
        struct CStruct {
            foo: u8,
        }

        let c_struct = CStruct { foo: 1 };

        match CStruct::from_packed(c_struct.to_packed()) {
            Ok(CStruct { foo }) => assert_eq!(foo, 1),
            Err(e) => panic!("Couldn't retrieve c-type struct: {}", e),
        }

        match CStruct::from_packed(c_struct.into_packed()) {
            Ok(CStruct { foo }) => assert_eq!(foo, 1),
            Err(e) => panic!("Couldn't retrieve c-type struct: {}", e),
        }
    }

    #[test]
    // Test `PackedRep` autoderive for enum of named-tuple structs
    fn named_tuple_enum() {
        #[derive(PackedRep, Debug)]
        enum Named {
            Foo(u8, String),
            Bar(u8),
        }

        use Named::*;

        let foo = Foo(1, "hello".to_string());

        match Named::from_packed(foo.to_packed()) {
            Ok(Foo(num, string)) => {
                assert_eq!(num, 1);
                assert_eq!(string, "hello".to_string());
            }
            _ => panic!("Couldn't retrieve tuple variant"),
        }

        match Named::from_packed(foo.into_packed()) {
            Ok(Foo(num, string)) => {
                assert_eq!(num, 1);
                assert_eq!(&string, "hello");
            }
            _ => panic!("Couldn't retrieve tuple variant"),
        }

        // arity is checked
        let short = Packed::Array(vec![Packed::from("Foo"), Packed::from(1u8)]);
        assert!(Named::from_packed(short).is_err());
    }

    #[test]
    // Test `PackedRep` autoderive for enum of unit-like structs
    fn unit_enum() {
        #[derive(PackedRep, Debug)]
        enum UnitEnum {
            Foo,
            Bar(u8),
        }

        use UnitEnum::*;

        assert_eq!(Foo.to_packed(), Packed::Array(vec![Packed::from("Foo")]));

        match UnitEnum::from_packed(Foo.into_packed()) {
            Ok(Foo) => (),
            _ => panic!("Failed to retrieve unit-like variant"),
        }

        match UnitEnum::from_packed(Bar(3).to_packed()) {
            Ok(Bar(3)) => (),
            _ => panic!("Failed to retrieve tuple variant"),
        }
    }

    #[test]
    /// Test `PackedRep` autoderive for named-tuple struct
    fn named_tuple() {
        #[derive(PackedRep, Debug)]
        struct Foo(u8, String);

        match Foo::from_packed(Foo(1, "hello".to_string()).to_packed()) {
            Ok(Foo(num, s)) => {
                assert_eq!(num, 1);
                assert_eq!(s, "hello".to_string());
            }
            _ => panic!("No Foo"),
        }
    }

    #[test]
    fn struct_fields_must_match() {
        let p = struct_to_packed_helper(vec![("a", Null), ("b", Null)]);

        assert!(struct_from_packed_helper(p.clone(), &["a", "b"]).is_ok());
        assert!(struct_from_packed_helper(p.clone(), &["a"]).is_err());
        assert!(struct_from_packed_helper(p, &["a", "b", "c"]).is_err());
    }

    #[test]
    fn integer_range_checks() {
        assert_eq!(u8::from_packed(VarUInt(255)).unwrap(), 255);
        assert!(u8::from_packed(VarUInt(256)).is_err());
        assert!(u32::from_packed(VarInt(-1)).is_err());
        assert_eq!(i8::from_packed(Byte(127)).unwrap(), 127);
        assert!(i8::from_packed(Byte(128)).is_err());
        assert_eq!(i64::from_packed(VarUInt(7)).unwrap(), 7);
        assert!(i64::from_packed(Str("7".into())).is_err());
    }

    #[test]
    fn small_types() {
        assert_eq!(7u8.to_packed(), Byte(7));
        assert_eq!(7u16.to_packed(), VarUInt(7));
        assert_eq!((-7i32).to_packed(), VarInt(-7));
        assert_eq!('a'.to_packed(), Char(97));
        assert_eq!(char::from_packed(Char(97)).unwrap(), 'a');
        assert!(char::from_packed(Char(0xd800)).is_err());

        let half = f16::from_f32(1.5);
        assert_eq!(half.to_packed(), Fixed32(1.5));
        assert_eq!(f16::from_packed(Fixed32(1.5)).unwrap(), half);
    }

    #[test]
    fn options() {
        assert_eq!(None::<u64>.to_packed(), Null);
        assert_eq!(Some(1u64).to_packed(), VarUInt(1));
        assert_eq!(Option::<u64>::from_packed(Null).unwrap(), None);
        assert_eq!(Option::<u64>::from_packed(VarUInt(1)).unwrap(), Some(1));
    }

    #[test]
    fn tuples() {
        let t = (1u64, "two".to_string(), true);
        let p = t.to_packed();
        assert_eq!(p.to_vec().unwrap().len(), 3);
        assert_eq!(<(u64, String, bool)>::from_packed(p).unwrap(), t);

        // wrong arity
        assert!(<(u64, u64)>::from_packed(vec![1u64].into_packed()).is_err());

        assert_eq!(().to_packed(), Null);
    }

    #[test]
    fn maps() {
        let mut hm = HashMap::new();
        hm.insert("b".to_string(), 2u64);
        hm.insert("a".to_string(), 1u64);

        let bt: BTreeMap<String, u64> = hm.clone().into_iter().collect();
        assert_eq!(hm.to_packed(), bt.to_packed());

        let back: HashMap<String, u64> = HashMap::from_packed(bt.into_packed()).unwrap();
        assert_eq!(back, hm);

        let vm = VecMap::from(hm.clone());
        assert_eq!(VecMap::<String, u64>::from_packed(vm.to_packed()).unwrap(), vm);
    }

    #[test]
    fn system_time() {
        let now = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        assert_eq!(SystemTime::from_packed(now.to_packed()).unwrap(), now);
    }

    #[test]
    fn conversion_errors_are_typed() {
        let e = conversion_error("bad shape");
        assert!(e.downcast_ref::<ConversionError>().is_some());

        let e = String::from_packed(Packed::VarUInt(1)).unwrap_err();
        match e.downcast_ref::<ConversionError>() {
            Some(ConversionError(msg)) => assert_eq!(msg, "Value is `unsigned integer`, not `string`"),
            None => panic!("untyped error: {}", e),
        }
        assert!(<()>::from_packed(Packed::Bool(true))
            .unwrap_err()
            .downcast_ref::<ConversionError>()
            .is_some());
        assert!(Bytes::from_packed(Packed::Null)
            .unwrap_err()
            .downcast_ref::<ConversionError>()
            .is_some());
    }
}

/*!
    named typed values exposed by objects

    an [Attribute] holds one [Value] at a time. Typed accessors (`make_*` / `to_*`) are meant for the owning driver, while the byte level [Attribute::read] and [Attribute::write] are the path taken by external interfaces (field bus, monitor, simulator) and trigger the attribute's [Hooks].

    byte level access is little-endian, the width of each kind is given by [Kind::bit_size]
*/

use core::fmt;
use packbytes::{FromBytes, ToBytes, ByteArray};
use bilge::prelude::*;
use crate::{
    config,
    error::Error,
    pack_enum,
    };


/// text storage of string attributes
pub type Text = heapless::String<{config::MAX_STRING}>;


/// kind of value held by an attribute, this code is also its wire tag
#[bitsize(8)]
#[derive(Copy, Clone, Default, FromBits, Debug, PartialEq)]
pub enum Kind {
    #[default]
    Invalid = 0,
    #[fallback]
    Unknown = 255,

    String = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    Uint8 = 6,
    Uint16 = 7,
    Uint32 = 8,
    Uint64 = 9,
    Float = 10,
    Double = 11,
    Nil = 12,
    /// reserved, no value can hold it
    List = 13,
    /// reserved, no value can hold it
    Data = 14,
    /// reserved, no value can hold it
    Dict = 15,
}
pack_enum!(Kind);

impl Kind {
    /// serialization width of this kind, 8 bits for anything not scalar
    pub const fn bit_size(self) -> usize {
        match self {
            Kind::Int8 | Kind::Uint8 => 8,
            Kind::Int16 | Kind::Uint16 => 16,
            Kind::Int32 | Kind::Uint32 | Kind::Float => 32,
            Kind::Int64 | Kind::Uint64 | Kind::Double => 64,
            _ => 8,
        }
    }
    /// name printed in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Unknown => "unknown",
            Kind::String => "string",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Nil => "nil",
            Kind::List => "list",
            Kind::Data => "data",
            Kind::Dict => "dict",
        }
    }
}
impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


/// value of an attribute, exactly one kind is active
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Invalid,
    String(Text),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
    Nil,
}
impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Invalid => Kind::Invalid,
            Value::String(_) => Kind::String,
            Value::Int8(_) => Kind::Int8,
            Value::Int16(_) => Kind::Int16,
            Value::Int32(_) => Kind::Int32,
            Value::Int64(_) => Kind::Int64,
            Value::Uint8(_) => Kind::Uint8,
            Value::Uint16(_) => Kind::Uint16,
            Value::Uint32(_) => Kind::Uint32,
            Value::Uint64(_) => Kind::Uint64,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::Nil => Kind::Nil,
        }
    }
    /// string value, failing if `text` does not fit [config::MAX_STRING]
    pub fn string(text: &str) -> Result<Self, Error> {
        Ok(Value::String(make_text(text)?))
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Invalid => f.write_str("invalid"),
            Value::String(text) => f.write_str(text),
            Value::Int8(value) => write!(f, "{}", value),
            Value::Int16(value) => write!(f, "{}", value),
            Value::Int32(value) => write!(f, "{}", value),
            Value::Int64(value) => write!(f, "{}", value),
            Value::Uint8(value) => write!(f, "{}", value),
            Value::Uint16(value) => write!(f, "{}", value),
            Value::Uint32(value) => write!(f, "{}", value),
            Value::Uint64(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{}", value),
            Value::Nil => f.write_str("nil"),
        }
    }
}

macro_rules! value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl From<$t> for Value {
            fn from(value: $t) -> Self {Value::$variant(value)}
        }
    )*};
}
value_from! {
    i8 => Int8, i16 => Int16, i32 => Int32, i64 => Int64,
    u8 => Uint8, u16 => Uint16, u32 => Uint32, u64 => Uint64,
    f32 => Float, f64 => Double,
}


/**
    extension points called around byte level accesses

    both default to nothing. They are meant for notifying an external interface, an attribute is never changed by them.
*/
pub trait Hooks {
    /// called before [Attribute::read] copies the value out
    fn pre_read(&self, _attribute: &Attribute) {}
    /// called after [Attribute::write] changed the value
    fn post_write(&self, _attribute: &Attribute) {}
}


/// named typed value, with an optional free-form description (by convention `Min`, `Max`, `Scale`, `enum` keys)
#[derive(Clone)]
pub struct Attribute {
    name: &'static str,
    description: Option<&'static str>,
    value: Value,
    hooks: Option<&'static dyn Hooks>,
}

impl Attribute {
    /// new attribute holding [Value::Invalid]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            description: None,
            value: Value::Invalid,
            hooks: None,
        }
    }
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
    pub fn with_hooks(mut self, hooks: &'static dyn Hooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn name(&self) -> &'static str {self.name}
    pub fn description(&self) -> Option<&'static str> {self.description}
    pub fn kind(&self) -> Kind {self.value.kind()}
    pub fn value(&self) -> &Value {&self.value}
    /// replace the value and its kind
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    /// serialization width of the active kind
    pub fn bit_size(&self) -> usize {
        self.kind().bit_size()
    }
    /// number of bytes [Self::read] produces
    pub fn wire_size(&self) -> usize {
        match &self.value {
            Value::String(text) => text.len(),
            _ => self.bit_size() / 8,
        }
    }

    pub fn make_string(&mut self, value: &str) -> Result<(), Error> {
        self.value = Value::string(value)?;
        Ok(())
    }
    pub fn to_str(&self) -> Result<&str, Error> {
        match &self.value {
            Value::String(text) => Ok(text.as_str()),
            _ => Err(self.mismatch(Kind::String)),
        }
    }
    pub fn make_nil(&mut self) {
        self.value = Value::Nil;
    }
    pub fn to_nil(&self) -> Result<(), Error> {
        match self.value {
            Value::Nil => Ok(()),
            _ => Err(self.mismatch(Kind::Nil)),
        }
    }

    /**
        overwrite the value with little-endian bytes

        - for scalar kinds, the first `data.len()` bytes of the value are replaced and the others kept
        - for strings, the text is replaced, it must fit [config::MAX_STRING]
        - kinds without storage only accept empty data

        then calls the `post_write` hook
    */
    pub fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        match &mut self.value {
            Value::Int8(value) => *value = patch(*value, data)?,
            Value::Int16(value) => *value = patch(*value, data)?,
            Value::Int32(value) => *value = patch(*value, data)?,
            Value::Int64(value) => *value = patch(*value, data)?,
            Value::Uint8(value) => *value = patch(*value, data)?,
            Value::Uint16(value) => *value = patch(*value, data)?,
            Value::Uint32(value) => *value = patch(*value, data)?,
            Value::Uint64(value) => *value = patch(*value, data)?,
            Value::Float(value) => *value = patch(*value, data)?,
            Value::Double(value) => *value = patch(*value, data)?,
            Value::String(text) => {
                let data = core::str::from_utf8(data)
                    .map_err(|_| Error::InvalidArgument("string data is not utf8"))?;
                *text = make_text(data)
                    .map_err(|_| Error::InvalidArgument("data is wider than the attribute"))?;
            },
            Value::Invalid | Value::Nil => {
                if !data.is_empty()
                    {return Err(Error::InvalidArgument("attribute kind has no storage"))}
            },
        }
        if let Some(hooks) = self.hooks {
            hooks.post_write(self);
        }
        Ok(())
    }
    /**
        copy the value as little-endian bytes to the head of `dst`, returning the number of bytes written ([Self::wire_size])

        calls the `pre_read` hook first
    */
    pub fn read(&self, dst: &mut [u8]) -> Result<usize, Error> {
        if let Some(hooks) = self.hooks {
            hooks.pre_read(self);
        }
        let size = self.wire_size();
        let Some(dst) = dst.get_mut(.. size)
            else {return Err(Error::InvalidArgument("buffer is smaller than the attribute"))};
        match &self.value {
            Value::Int8(value) => encode(*value, dst),
            Value::Int16(value) => encode(*value, dst),
            Value::Int32(value) => encode(*value, dst),
            Value::Int64(value) => encode(*value, dst),
            Value::Uint8(value) => encode(*value, dst),
            Value::Uint16(value) => encode(*value, dst),
            Value::Uint32(value) => encode(*value, dst),
            Value::Uint64(value) => encode(*value, dst),
            Value::Float(value) => encode(*value, dst),
            Value::Double(value) => encode(*value, dst),
            Value::String(text) => dst.copy_from_slice(text.as_bytes()),
            Value::Invalid | Value::Nil => dst.fill(0),
        }
        Ok(size)
    }

    fn mismatch(&self, expected: Kind) -> Error {
        Error::TypeMismatch {expected, found: self.kind()}
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("value", &self.value)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

/// typed setter and getter pairs for scalar kinds
macro_rules! scalar_accessors {
    ($($make:ident, $to:ident => $variant:ident($t:ty);)*) => {
        impl Attribute {$(
            #[doc = concat!("hold a `", stringify!($t), "`, whatever kind was active before")]
            pub fn $make(&mut self, value: $t) {
                self.value = Value::$variant(value);
            }
            #[doc = concat!("current `", stringify!($t), "` value, if that is the active kind")]
            pub fn $to(&self) -> Result<$t, Error> {
                match self.value {
                    Value::$variant(value) => Ok(value),
                    _ => Err(self.mismatch(Kind::$variant)),
                }
            }
        )*}
    };
}
scalar_accessors! {
    make_i8, to_i8 => Int8(i8);
    make_i16, to_i16 => Int16(i16);
    make_i32, to_i32 => Int32(i32);
    make_i64, to_i64 => Int64(i64);
    make_u8, to_u8 => Uint8(u8);
    make_u16, to_u16 => Uint16(u16);
    make_u32, to_u32 => Uint32(u32);
    make_u64, to_u64 => Uint64(u64);
    make_f32, to_f32 => Float(f32);
    make_f64, to_f64 => Double(f64);
}


fn make_text(text: &str) -> Result<Text, Error> {
    let mut dst = Text::new();
    dst.push_str(text).map_err(|_| Error::CapacityExceeded)?;
    Ok(dst)
}
/// replace the first bytes of `value` by `data`
fn patch<C: ByteArray, T: ToBytes<Bytes=C> + FromBytes<Bytes=C>>(value: T, data: &[u8]) -> Result<T, Error> {
    if data.len() > C::SIZE
        {return Err(Error::InvalidArgument("data is wider than the attribute"))}
    let mut bytes = value.to_le_bytes();
    bytes.as_mut()[.. data.len()].copy_from_slice(data);
    Ok(T::from_le_bytes(bytes))
}
/// serialize `value` into `dst`, which must have its exact size
fn encode<T: ToBytes>(value: T, dst: &mut [u8]) {
    dst.copy_from_slice(value.to_le_bytes().as_mut());
}

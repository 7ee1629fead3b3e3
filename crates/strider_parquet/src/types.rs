use std::array::TryFromSliceError;
use std::fmt::Debug;

/// Physical types representable in parquet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetition {
    Required,
    Optional,
    Repeated,
}

/// Fields shared by primitive and group nodes in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: String,
    pub repetition: Repetition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParquetType {
    Primitive(PrimitiveType),
    Group(GroupType),
}

impl ParquetType {
    pub fn info(&self) -> &TypeInfo {
        match self {
            Self::Primitive(prim) => &prim.info,
            Self::Group(group) => &group.info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn repetition(&self) -> Repetition {
        self.info().repetition
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveType {
    pub info: TypeInfo,
    pub physical_type: PhysicalType,
}

impl PrimitiveType {
    pub fn new(name: impl Into<String>, repetition: Repetition, physical_type: PhysicalType) -> Self {
        PrimitiveType {
            info: TypeInfo {
                name: name.into(),
                repetition,
            },
            physical_type,
        }
    }
}

impl From<PrimitiveType> for ParquetType {
    fn from(value: PrimitiveType) -> Self {
        ParquetType::Primitive(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupType {
    pub info: TypeInfo,
    pub fields: Vec<ParquetType>,
}

impl GroupType {
    pub fn new(
        name: impl Into<String>,
        repetition: Repetition,
        fields: impl IntoIterator<Item = ParquetType>,
    ) -> Self {
        GroupType {
            info: TypeInfo {
                name: name.into(),
                repetition,
            },
            fields: fields.into_iter().collect(),
        }
    }
}

impl From<GroupType> for ParquetType {
    fn from(value: GroupType) -> Self {
        ParquetType::Group(value)
    }
}

/// Legacy 96 bit timestamp, stored as three little endian u32s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int96([u32; 3]);

impl Int96 {
    pub const fn new(data: [u32; 3]) -> Self {
        Int96(data)
    }

    pub const fn data(&self) -> [u32; 3] {
        self.0
    }

    pub fn to_le_bytes(&self) -> [u8; 12] {
        let mut buf = [0; 12];
        for (chunk, v) in buf.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
        buf
    }
}

/// Values stored as a fixed number of little endian bytes.
pub trait FixedWidth: Debug + Sized {
    type Bytes: AsRef<[u8]> + for<'a> TryFrom<&'a [u8], Error = TryFromSliceError>;

    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_fixed_width {
    ($($ty:ty => $n:literal),*) => {
        $(
            impl FixedWidth for $ty {
                type Bytes = [u8; $n];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_fixed_width!(i32 => 4, i64 => 8, f32 => 4, f64 => 8);

impl FixedWidth for Int96 {
    type Bytes = [u8; 12];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        let mut data = [0; 3];
        for (v, chunk) in data.iter_mut().zip(bytes.chunks_exact(4)) {
            *v = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Int96(data)
    }
}

use std::fmt;

use serde::Serialize;

/// A lowered type. `bool` is `u1`, `chr` is `u8`, strings and arrays are
/// pointers to their elements.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MirType {
    Void,
    Int { bits: u16, signed: bool },
    Float { bits: u16 },
    Pointer(Box<MirType>),
    Struct(String),
}

impl MirType {
    pub const BOOL: MirType = MirType::Int {
        bits: 1,
        signed: false,
    };

    pub const U8: MirType = MirType::Int {
        bits: 8,
        signed: false,
    };

    pub const I32: MirType = MirType::Int {
        bits: 32,
        signed: true,
    };

    pub fn pointer(base: MirType) -> Self {
        MirType::Pointer(Box::new(base))
    }

    pub fn is_void(&self) -> bool {
        *self == MirType::Void
    }
}

impl fmt::Display for MirType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirType::Void => f.write_str("void"),
            MirType::Int { bits, signed } => {
                write!(f, "{}{bits}", if *signed { 'i' } else { 'u' })
            }
            MirType::Float { bits } => write!(f, "f{bits}"),
            MirType::Pointer(base) => write!(f, "*{base}"),
            MirType::Struct(name) => write!(f, "%{name}"),
        }
    }
}

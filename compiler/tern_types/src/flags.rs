//! Type property flags.
//!
//! Computed by [`Type::flags`](crate::Type::flags) and used to skip work:
//! substitution only walks types with `HAS_GENERIC`, resolution only walks
//! types with `HAS_AUTO`.

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        // Presence flags, propagated from nested types.

        /// Contains an `auto` variable.
        const HAS_AUTO = 1 << 0;
        /// Contains an unsubstituted generic parameter.
        const HAS_GENERIC = 1 << 1;
        /// Contains the error placeholder type.
        const HAS_UNDEFINED = 1 << 2;

        // Category flags, for the outermost type only.

        const IS_INTEGER = 1 << 8;
        /// Integer or float.
        const IS_NUMERIC = 1 << 9;
        /// `*T`, `&T`, `?T` or `[T]`: does not store `T` inline.
        const IS_INDIRECT = 1 << 10;

        const PROPAGATED = Self::HAS_AUTO.bits()
            | Self::HAS_GENERIC.bits()
            | Self::HAS_UNDEFINED.bits();
    }
}

#[cfg(test)]
mod tests {
    use crate::{IntWidth, Type, TypeVar};

    use super::TypeFlags;

    #[test]
    fn test_presence_flags_propagate() {
        let ty = Type::pointer(Type::array(Type::auto(TypeVar::new(0))));
        let flags = ty.flags();
        assert!(flags.contains(TypeFlags::HAS_AUTO));
        assert!(flags.contains(TypeFlags::IS_INDIRECT));
    }

    #[test]
    fn test_category_flags_do_not_propagate() {
        let ty = Type::tuple(vec![Type::int(IntWidth::U8), Type::bool()]);
        assert_eq!(ty.flags(), TypeFlags::empty());
        assert!(Type::i32().flags().contains(TypeFlags::IS_INTEGER));
    }
}

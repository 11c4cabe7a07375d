//! Byte sizes, as reported by `size<T>()`.
//!
//! Fields are laid out back to back with no padding. Pointers, references,
//! strings, arrays and `unknown` are pointer-sized. Tagged kinds (`?T`,
//! `E!S`, variants) take a one-byte tag plus their largest member.

use smallvec::SmallVec;

use crate::{StructId, SymbolTable, Type, TypeKind};

impl SymbolTable {
    /// Size of `ty` in bytes, or `None` when it has none: generics,
    /// unsolved autos, error types and structs that contain themselves.
    pub fn size_of(&self, ty: &Type, pointer_bytes: u64) -> Option<u64> {
        let mut visiting = SmallVec::<[StructId; 8]>::new();
        self.size_of_inner(ty, pointer_bytes, &mut visiting)
    }

    fn size_of_inner(
        &self,
        ty: &Type,
        pointer_bytes: u64,
        visiting: &mut SmallVec<[StructId; 8]>,
    ) -> Option<u64> {
        let size = match &ty.kind {
            TypeKind::Void => 0,
            TypeKind::Bool | TypeKind::Char => 1,
            TypeKind::Int(width) => u64::from(width.bits() / 8),
            TypeKind::Float(width) => u64::from(width.bits() / 8),
            TypeKind::Str
            | TypeKind::Unknown
            | TypeKind::Pointer
            | TypeKind::Reference
            | TypeKind::Array => pointer_bytes,
            TypeKind::Struct(id) => {
                if visiting.contains(id) {
                    return None;
                }
                visiting.push(*id);
                let mut total = 0;
                for field in &self.get_struct(*id).fields {
                    total += self.size_of_inner(&field.ty, pointer_bytes, visiting)?;
                }
                visiting.pop();
                total
            }
            TypeKind::Enum(id) => {
                self.size_of_inner(&self.get_enum(*id).base, pointer_bytes, visiting)?
            }
            TypeKind::Option => {
                1 + self.size_of_inner(ty.base()?, pointer_bytes, visiting)?
            }
            TypeKind::Tuple => {
                let mut total = 0;
                for item in &ty.payload {
                    total += self.size_of_inner(item, pointer_bytes, visiting)?;
                }
                total
            }
            TypeKind::EnumError => 1 + self.largest(&ty.payload, pointer_bytes, visiting)?,
            TypeKind::Variant(id) => {
                1 + self.largest(&self.variant(*id).members, pointer_bytes, visiting)?
            }
            TypeKind::Generic(_) | TypeKind::Auto(_) | TypeKind::Undefined => return None,
        };
        Some(size)
    }

    fn largest(
        &self,
        members: &[Type],
        pointer_bytes: u64,
        visiting: &mut SmallVec<[StructId; 8]>,
    ) -> Option<u64> {
        let mut max = 0;
        for member in members {
            max = max.max(self.size_of_inner(member, pointer_bytes, visiting)?);
        }
        Some(max)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;
    use tern_ir::ast::{Ident, Modifier, Pragmas, StructDecl};
    use tern_ir::{Pos, SourceId, Span};

    use crate::{Field, IntWidth, SymbolTable, Type};

    fn pos() -> Pos {
        Pos::new(SourceId(0), Span::DUMMY)
    }

    fn declare(table: &mut SymbolTable, name: &str, fields: Vec<(&str, Type)>) -> Type {
        let id = table
            .declare_struct(StructDecl {
                name: Ident {
                    name: name.to_owned(),
                    pos: pos(),
                },
                generics: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                modifier: Modifier::Private,
                pragmas: Pragmas::default(),
                pos: pos(),
            })
            .unwrap();
        table.get_struct_mut(id).fields = fields
            .into_iter()
            .map(|(name, ty)| Field {
                name: name.to_owned(),
                ty,
                modifier: Modifier::Public,
                pos: pos(),
            })
            .collect();
        Type::strukt(id)
    }

    #[test]
    fn test_primitive_sizes() {
        let table = SymbolTable::new();
        assert_eq!(table.size_of(&Type::int(IntWidth::U16), 8), Some(2));
        assert_eq!(table.size_of(&Type::bool(), 8), Some(1));
        assert_eq!(table.size_of(&Type::str(), 8), Some(8));
        assert_eq!(table.size_of(&Type::option(Type::i32()), 8), Some(5));
        assert_eq!(table.size_of(&Type::generic("T"), 8), None);
    }

    #[test]
    fn test_struct_size_sums_fields() {
        let mut table = SymbolTable::new();
        let point = declare(
            &mut table,
            "Point",
            vec![("x", Type::i32()), ("y", Type::i32()), ("tag", Type::char())],
        );
        assert_eq!(table.size_of(&point, 8), Some(9));
        let empty = declare(&mut table, "Empty", Vec::new());
        assert_eq!(table.size_of(&empty, 8), Some(0));
    }

    #[test]
    fn test_self_containing_struct_has_no_size() {
        let mut table = SymbolTable::new();
        let node = declare(&mut table, "Node", Vec::new());
        let id = node.struct_id().unwrap();
        table.get_struct_mut(id).fields.push(Field {
            name: "next".to_owned(),
            ty: node.clone(),
            modifier: Modifier::Public,
            pos: pos(),
        });
        assert_eq!(table.size_of(&node, 8), None);
    }
}

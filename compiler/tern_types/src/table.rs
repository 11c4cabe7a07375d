//! The `auto` substitution table.
//!
//! Every `auto` gets a [`TypeVar`] from [`TypeTable::fresh_auto`]. A
//! variable is solved at most once; afterwards [`TypeTable::resolve`]
//! replaces it with its solution and later checks compare against that.

use crate::{Type, TypeFlags, TypeKind, TypeVar};

/// Two types that failed to unify, both already resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: Type,
    pub actual: Type,
}

#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    solutions: Vec<Option<Type>>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "a compilation unit never creates u32::MAX autos"
    )]
    pub fn fresh_auto(&mut self) -> Type {
        let var = TypeVar::new(self.solutions.len() as u32);
        self.solutions.push(None);
        Type::auto(var)
    }

    pub fn solution(&self, var: TypeVar) -> Option<&Type> {
        self.solutions.get(var.index()).and_then(Option::as_ref)
    }

    /// Record `var := ty`. Returns `false` if `var` was already solved,
    /// or if `ty` mentions `var` itself.
    pub fn solve(&mut self, var: TypeVar, ty: Type) -> bool {
        let ty = self.resolve(&ty);
        if ty.as_auto() == Some(var) || self.occurs(var, &ty) {
            return false;
        }
        match self.solutions.get_mut(var.index()) {
            Some(slot @ None) => {
                tracing::trace!(var = var.raw(), "solved auto");
                *slot = Some(ty);
                true
            }
            _ => false,
        }
    }

    fn occurs(&self, var: TypeVar, ty: &Type) -> bool {
        if !ty.flags().contains(TypeFlags::HAS_AUTO) {
            return false;
        }
        ty.as_auto() == Some(var)
            || ty
                .base()
                .into_iter()
                .chain(&ty.payload)
                .any(|child| self.occurs(var, child))
    }

    /// Replace every solved `auto` inside `ty` by its solution.
    pub fn resolve(&self, ty: &Type) -> Type {
        if !ty.flags().contains(TypeFlags::HAS_AUTO) {
            return ty.clone();
        }
        if let Some(var) = ty.as_auto() {
            return match self.solution(var) {
                Some(solved) => self.resolve(solved),
                None => ty.clone(),
            };
        }
        Type {
            kind: ty.kind.clone(),
            base: ty.base().map(|base| Box::new(self.resolve(base))),
            payload: ty.payload.iter().map(|item| self.resolve(item)).collect(),
        }
    }

    /// Check `actual` against `expected`, solving an unsolved `auto` on
    /// either side. Returns the unified type.
    ///
    /// Kinds must match. When both sides have an element type the element
    /// types must unify too, and so must every payload member.
    pub fn unify(&mut self, expected: &Type, actual: &Type) -> Result<Type, Mismatch> {
        let expected = self.resolve(expected);
        let actual = self.resolve(actual);
        if self.unify_resolved(&expected, &actual) {
            Ok(self.resolve(if expected.is_undefined() {
                &actual
            } else {
                &expected
            }))
        } else {
            Err(Mismatch { expected, actual })
        }
    }

    fn unify_resolved(&mut self, expected: &Type, actual: &Type) -> bool {
        if let Some(var) = expected.as_auto() {
            return self.solve(var, actual.clone()) || self.resolve(expected) == *actual;
        }
        if let Some(var) = actual.as_auto() {
            return self.solve(var, expected.clone());
        }
        if expected.is_undefined() || actual.is_undefined() {
            return true;
        }
        if expected.kind != actual.kind {
            return false;
        }
        if let (Some(e), Some(a)) = (expected.base(), actual.base()) {
            let (e, a) = (self.resolve(e), self.resolve(a));
            if !self.unify_resolved(&e, &a) {
                return false;
            }
        }
        expected.payload.len() == actual.payload.len()
            && expected.payload.iter().zip(&actual.payload).all(|(e, a)| {
                let (e, a) = (self.resolve(e), self.resolve(a));
                self.unify_resolved(&e, &a)
            })
    }

    /// Whether `ty` is, after resolution, an `auto` that nobody solved.
    pub fn is_unsolved(&self, ty: &Type) -> bool {
        matches!(self.resolve(ty).kind, TypeKind::Auto(_))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::IntWidth;

    #[test]
    fn test_auto_is_solved_once() {
        let mut table = TypeTable::new();
        let auto = table.fresh_auto();
        assert_eq!(table.unify(&auto, &Type::i32()), Ok(Type::i32()));
        assert_eq!(table.resolve(&auto), Type::i32());

        // The solution is fixed now; a later check compares against it.
        let err = table.unify(&auto, &Type::bool());
        assert_eq!(
            err,
            Err(Mismatch {
                expected: Type::i32(),
                actual: Type::bool(),
            })
        );
        assert_eq!(table.resolve(&auto), Type::i32());
    }

    #[test]
    fn test_nested_auto_resolves() {
        let mut table = TypeTable::new();
        let auto = table.fresh_auto();
        let pointer = Type::pointer(auto.clone());
        assert!(table
            .unify(&pointer, &Type::pointer(Type::int(IntWidth::U8)))
            .is_ok());
        assert_eq!(table.resolve(&pointer), Type::pointer(Type::int(IntWidth::U8)));
    }

    #[test]
    fn test_kinds_and_bases_must_match() {
        let mut table = TypeTable::new();
        assert!(table.unify(&Type::i32(), &Type::int(IntWidth::I64)).is_err());
        assert!(table
            .unify(&Type::array(Type::bool()), &Type::array(Type::char()))
            .is_err());
        assert!(table
            .unify(
                &Type::tuple(vec![Type::bool()]),
                &Type::tuple(vec![Type::bool(), Type::bool()])
            )
            .is_err());
    }

    #[test]
    fn test_undefined_unifies_with_anything() {
        let mut table = TypeTable::new();
        assert_eq!(table.unify(&Type::undefined(), &Type::str()), Ok(Type::str()));
        assert_eq!(table.unify(&Type::bool(), &Type::undefined()), Ok(Type::bool()));
    }

    #[test]
    fn test_occurs_check() {
        let mut table = TypeTable::new();
        let auto = table.fresh_auto();
        let Some(var) = auto.as_auto() else {
            panic!("fresh_auto returned {auto:?}");
        };
        assert!(!table.solve(var, Type::pointer(auto.clone())));
        assert!(table.is_unsolved(&auto));
    }
}

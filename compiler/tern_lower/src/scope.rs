//! Name to local-slot bindings.
//!
//! Child scopes are created with [`Scope::child`], which clones the
//! bindings of the parent. A name may shadow one from an outer block but
//! not one declared in the same block.

use rustc_hash::FxHashMap;
use tern_types::Type;

/// A local slot with its Tern type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Local {
    pub(crate) slot: u32,
    pub(crate) ty: Type,
    pub(crate) is_const: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Scope {
    locals: FxHashMap<String, (Local, u32)>,
    depth: u32,
    /// Slot receiving the trailing value of the innermost value block.
    /// Created on first use.
    pub(crate) hidden: Option<Local>,
    /// Set on the root scope of a function body, whose trailing value is
    /// the return value.
    pub(crate) in_function_block: bool,
}

impl Scope {
    pub(crate) fn new() -> Self {
        Scope::default()
    }

    /// A scope for a nested block. The hidden slot moves into the child
    /// so branches of one value construct share it.
    pub(crate) fn child(&mut self) -> Scope {
        Scope {
            locals: self.locals.clone(),
            depth: self.depth + 1,
            hidden: self.hidden.take(),
            in_function_block: false,
        }
    }

    /// Bind `name`. Returns `false` if this block already declared it.
    pub(crate) fn declare(&mut self, name: &str, local: Local) -> bool {
        let clash = name != "_"
            && self
                .locals
                .get(name)
                .is_some_and(|(_, depth)| *depth == self.depth);
        self.locals.insert(name.to_owned(), (local, self.depth));
        !clash
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Local> {
        self.locals.get(name).map(|(local, _)| local)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn local(slot: u32) -> Local {
        Local {
            slot,
            ty: Type::i32(),
            is_const: false,
        }
    }

    #[test]
    fn test_shadowing_and_redeclaration() {
        let mut root = Scope::new();
        assert!(root.declare("x", local(0)));
        assert!(!root.declare("x", local(1)));

        let mut child = root.child();
        assert!(child.declare("x", local(2)));
        assert_eq!(child.get("x").map(|l| l.slot), Some(2));
        assert_eq!(root.get("x").map(|l| l.slot), Some(1));
    }

    #[test]
    fn test_discard_name_never_clashes() {
        let mut scope = Scope::new();
        assert!(scope.declare("_", local(0)));
        assert!(scope.declare("_", local(1)));
    }

    #[test]
    fn test_child_takes_hidden_slot() {
        let mut root = Scope::new();
        root.in_function_block = true;
        root.hidden = Some(local(3));
        let child = root.child();
        assert!(root.hidden.is_none());
        assert_eq!(child.hidden.map(|l| l.slot), Some(3));
        assert!(!child.in_function_block);
    }
}

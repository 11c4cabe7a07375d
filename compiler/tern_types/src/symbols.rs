//! The symbol table.
//!
//! Maps a top-level name to an overload set, a struct (or struct
//! template), an enum, a variant or a global. Declarations keep their
//! source order in [`SymbolTable::items`], which is the order the lowerer
//! walks them in; lookups go through an `FxHashMap` index.
//!
//! Generic functions and structs are stored once as templates.
//! Instantiations are cached by [`InstanceKey`], so each one is built once.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tern_ir::ast::{EnumDecl, FunctionDecl, GlobalDecl, Modifier, StructDecl, VariantDecl};
use tern_ir::Pos;
use tracing::trace;

use crate::{Constant, EnumId, FunctionId, GlobalId, StructId, Type, VariantId};

/// What a top-level name refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// Every function declared with this name, in declaration order.
    Functions(SmallVec<[FunctionId; 2]>),
    Struct(StructId),
    Enum(EnumId),
    Variant(VariantId),
    Global(GlobalId),
}

/// One declaration, in source order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Function(FunctionId),
    Struct(StructId),
    Enum(EnumId),
    Variant(VariantId),
    Global(GlobalId),
}

/// The name is already taken by a different kind of symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Redeclared;

/// Parameter and return types after resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Type>,
    pub ret: Type,
}

#[derive(Clone, Debug)]
pub struct FunctionEntry {
    pub decl: FunctionDecl,
    /// The struct this is a method of.
    pub owner: Option<StructId>,
    /// Lowered name: `f`, `f.1` for a later overload, or `Type.method`.
    pub name: String,
    /// Filled in by the lowerer the first time the signature is needed.
    pub signature: Option<Signature>,
}

impl FunctionEntry {
    pub fn is_template(&self) -> bool {
        !self.decl.generics.is_empty()
    }
}

/// Progress of a declaration whose types are resolved on demand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Resolution {
    #[default]
    Declared,
    /// Being resolved right now; seeing this again means a cycle.
    InProgress,
    Resolved,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub modifier: Modifier,
    pub pos: Pos,
}

#[derive(Clone, Debug)]
pub struct StructEntry {
    /// Display and lowered name; `Box<i32>` for an instantiation.
    pub name: String,
    pub decl: StructDecl,
    /// Concrete arguments, in generic-parameter order. Empty unless this
    /// entry is an instantiation.
    pub args: Vec<Type>,
    pub fields: Vec<Field>,
    pub methods: Vec<FunctionId>,
    pub resolution: Resolution,
}

impl StructEntry {
    pub fn is_template(&self) -> bool {
        !self.decl.generics.is_empty() && self.args.is_empty()
    }

    /// Field index and descriptor.
    pub fn field(&self, name: &str) -> Option<(usize, &Field)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// Generic parameter names zipped with the instantiation arguments.
    pub fn generic_env(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.decl
            .generics
            .iter()
            .map(|g| g.name.as_str())
            .zip(&self.args)
    }
}

#[derive(Clone, Debug)]
pub struct EnumEntry {
    pub decl: EnumDecl,
    pub base: Type,
    pub members: Vec<(String, Constant)>,
    pub resolution: Resolution,
}

impl EnumEntry {
    pub fn member(&self, name: &str) -> Option<&Constant> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| value)
    }
}

#[derive(Clone, Debug)]
pub struct VariantEntry {
    pub decl: VariantDecl,
    pub members: Vec<Type>,
    pub resolution: Resolution,
}

#[derive(Clone, Debug)]
pub struct GlobalEntry {
    pub decl: GlobalDecl,
    pub ty: Type,
    /// Folded initializer of a global constant.
    pub value: Option<Constant>,
    pub resolution: Resolution,
}

/// Cache key of an instantiation: the template and the display names of
/// its concrete arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceKey<Id> {
    pub template: Id,
    pub args: SmallVec<[String; 2]>,
}

/// A generated instantiation of a generic function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    /// Lowered name, e.g. `max<i32>`.
    pub name: String,
    pub signature: Signature,
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    items: Vec<Item>,
    index: FxHashMap<String, Symbol>,
    functions: Vec<FunctionEntry>,
    structs: Vec<StructEntry>,
    enums: Vec<EnumEntry>,
    variants: Vec<VariantEntry>,
    globals: Vec<GlobalEntry>,
    function_instances: FxHashMap<InstanceKey<FunctionId>, Instance>,
    /// Keys of `function_instances` in insertion order.
    function_log: Vec<InstanceKey<FunctionId>>,
    struct_instances: FxHashMap<InstanceKey<StructId>, StructId>,
}

/// Table state to return to with [`SymbolTable::rollback_instances`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InstanceMark {
    functions: usize,
    structs: usize,
    function_instances: usize,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "symbol counts never approach u32::MAX"
)]
fn next_id(len: usize) -> u32 {
    len as u32
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    fn claim(&mut self, name: &str, symbol: Symbol) -> Result<(), Redeclared> {
        if self.index.contains_key(name) {
            return Err(Redeclared);
        }
        self.index.insert(name.to_owned(), symbol);
        Ok(())
    }

    /// Add a function to its name's overload set.
    pub fn declare_function(&mut self, decl: FunctionDecl) -> Result<FunctionId, Redeclared> {
        let id = FunctionId::new(next_id(self.functions.len()));
        // Later overloads get a numbered lowered name: `f`, `f.1`, `f.2`.
        let name = match self.index.get_mut(&decl.name.name) {
            Some(Symbol::Functions(set)) => {
                set.push(id);
                format!("{}.{}", decl.name.name, set.len() - 1)
            }
            Some(_) => return Err(Redeclared),
            None => {
                self.index.insert(
                    decl.name.name.clone(),
                    Symbol::Functions(SmallVec::from_elem(id, 1)),
                );
                decl.name.name.clone()
            }
        };
        trace!(%name, "declared function");
        self.functions.push(FunctionEntry {
            name,
            decl,
            owner: None,
            signature: None,
        });
        self.items.push(Item::Function(id));
        Ok(id)
    }

    /// Declare a struct and its methods. Methods get no top-level name;
    /// they are reached through [`SymbolTable::methods`].
    pub fn declare_struct(&mut self, decl: StructDecl) -> Result<StructId, Redeclared> {
        let id = StructId::new(next_id(self.structs.len()));
        self.claim(&decl.name.name, Symbol::Struct(id))?;
        let name = decl.name.name.clone();
        self.push_struct(name, decl, Vec::new());
        self.items.push(Item::Struct(id));
        Ok(id)
    }

    fn push_struct(&mut self, name: String, decl: StructDecl, args: Vec<Type>) -> StructId {
        let id = StructId::new(next_id(self.structs.len()));
        let mut methods = Vec::with_capacity(decl.methods.len());
        for method in &decl.methods {
            methods.push(FunctionId::new(next_id(self.functions.len())));
            self.functions.push(FunctionEntry {
                name: format!("{name}.{}", method.name.name),
                decl: method.clone(),
                owner: Some(id),
                signature: None,
            });
        }
        self.structs.push(StructEntry {
            name,
            decl,
            args,
            fields: Vec::new(),
            methods,
            resolution: Resolution::Declared,
        });
        id
    }

    pub fn declare_enum(&mut self, decl: EnumDecl) -> Result<EnumId, Redeclared> {
        let id = EnumId::new(next_id(self.enums.len()));
        self.claim(&decl.name.name, Symbol::Enum(id))?;
        self.enums.push(EnumEntry {
            decl,
            base: Type::undefined(),
            members: Vec::new(),
            resolution: Resolution::Declared,
        });
        self.items.push(Item::Enum(id));
        Ok(id)
    }

    pub fn declare_variant(&mut self, decl: VariantDecl) -> Result<VariantId, Redeclared> {
        let id = VariantId::new(next_id(self.variants.len()));
        self.claim(&decl.name.name, Symbol::Variant(id))?;
        self.variants.push(VariantEntry {
            decl,
            members: Vec::new(),
            resolution: Resolution::Declared,
        });
        self.items.push(Item::Variant(id));
        Ok(id)
    }

    pub fn declare_global(&mut self, decl: GlobalDecl) -> Result<GlobalId, Redeclared> {
        let id = GlobalId::new(next_id(self.globals.len()));
        self.claim(&decl.decl.name.name, Symbol::Global(id))?;
        self.globals.push(GlobalEntry {
            decl,
            ty: Type::undefined(),
            value: None,
            resolution: Resolution::Declared,
        });
        self.items.push(Item::Global(id));
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name)
    }

    /// Overload set of `name`, empty if it names no function.
    pub fn overloads(&self, name: &str) -> &[FunctionId] {
        match self.index.get(name) {
            Some(Symbol::Functions(set)) => set,
            _ => &[],
        }
    }

    /// Top-level declarations in source order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Methods of `owner` called `name`, in declaration order.
    pub fn methods<'a>(
        &'a self,
        owner: StructId,
        name: &'a str,
    ) -> impl Iterator<Item = FunctionId> + 'a {
        self.structs[owner.index()]
            .methods
            .iter()
            .copied()
            .filter(move |&id| self.functions[id.index()].decl.name.name == name)
    }

    pub fn function(&self, id: FunctionId) -> &FunctionEntry {
        &self.functions[id.index()]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut FunctionEntry {
        &mut self.functions[id.index()]
    }

    pub fn get_struct(&self, id: StructId) -> &StructEntry {
        &self.structs[id.index()]
    }

    pub fn get_struct_mut(&mut self, id: StructId) -> &mut StructEntry {
        &mut self.structs[id.index()]
    }

    pub fn get_enum(&self, id: EnumId) -> &EnumEntry {
        &self.enums[id.index()]
    }

    pub fn get_enum_mut(&mut self, id: EnumId) -> &mut EnumEntry {
        &mut self.enums[id.index()]
    }

    pub fn variant(&self, id: VariantId) -> &VariantEntry {
        &self.variants[id.index()]
    }

    pub fn variant_mut(&mut self, id: VariantId) -> &mut VariantEntry {
        &mut self.variants[id.index()]
    }

    pub fn global(&self, id: GlobalId) -> &GlobalEntry {
        &self.globals[id.index()]
    }

    pub fn global_mut(&mut self, id: GlobalId) -> &mut GlobalEntry {
        &mut self.globals[id.index()]
    }

    /// Every struct entry, templates and instantiations included.
    pub fn structs(&self) -> impl Iterator<Item = (StructId, &StructEntry)> {
        self.structs
            .iter()
            .enumerate()
            .map(|(i, entry)| (StructId::new(next_id(i)), entry))
    }

    pub fn instance_key<Id>(&self, template: Id, args: &[Type]) -> InstanceKey<Id> {
        InstanceKey {
            template,
            args: args.iter().map(|arg| self.display(arg).to_string()).collect(),
        }
    }

    /// The instantiation of `template` with `args`, created on first use.
    /// A fresh entry is left [`Resolution::Declared`] for the lowerer to
    /// resolve and lower.
    pub fn instantiate_struct(&mut self, template: StructId, args: Vec<Type>) -> StructId {
        let key = self.instance_key(template, &args);
        if let Some(&id) = self.struct_instances.get(&key) {
            return id;
        }
        let entry = &self.structs[template.index()];
        let name = format!("{}<{}>", entry.name, key.args.join(", "));
        let decl = entry.decl.clone();
        trace!(%name, "instantiating struct");
        let id = self.push_struct(name, decl, args);
        self.struct_instances.insert(key, id);
        id
    }

    pub fn function_instance(&self, key: &InstanceKey<FunctionId>) -> Option<&Instance> {
        self.function_instances.get(key)
    }

    pub fn insert_function_instance(&mut self, key: InstanceKey<FunctionId>, instance: Instance) {
        self.function_log.push(key.clone());
        self.function_instances.insert(key, instance);
    }

    pub fn function_instance_count(&self) -> usize {
        self.function_instances.len()
    }

    pub fn instance_mark(&self) -> InstanceMark {
        InstanceMark {
            functions: self.functions.len(),
            structs: self.structs.len(),
            function_instances: self.function_log.len(),
        }
    }

    /// Forget every instantiation made since `mark`, along with the
    /// method entries of dropped struct instances.
    ///
    /// Declarations must not be added between the mark and the rollback.
    pub fn rollback_instances(&mut self, mark: InstanceMark) {
        for key in self.function_log.drain(mark.function_instances..) {
            self.function_instances.remove(&key);
        }
        self.struct_instances.retain(|_, id| id.index() < mark.structs);
        self.structs.truncate(mark.structs);
        self.functions.truncate(mark.functions);
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;
    use tern_ir::ast::{Ident, Pragmas};
    use tern_ir::{SourceId, Span};

    use super::*;
    use crate::IntWidth;

    fn pos() -> Pos {
        Pos::new(SourceId(0), Span::DUMMY)
    }

    fn ident(name: &str) -> Ident {
        Ident {
            name: name.to_owned(),
            pos: pos(),
        }
    }

    fn function(name: &str) -> FunctionDecl {
        FunctionDecl {
            name: ident(name),
            generics: Vec::new(),
            params: Vec::new(),
            ret: None,
            body: None,
            modifier: Modifier::Private,
            pragmas: Pragmas::default(),
            pos: pos(),
        }
    }

    fn structure(name: &str, generics: &[&str], methods: Vec<FunctionDecl>) -> StructDecl {
        StructDecl {
            name: ident(name),
            generics: generics.iter().map(|g| ident(g)).collect(),
            fields: Vec::new(),
            methods,
            modifier: Modifier::Private,
            pragmas: Pragmas::default(),
            pos: pos(),
        }
    }

    #[test]
    fn test_overloads_keep_declaration_order() {
        let mut table = SymbolTable::new();
        let first = table.declare_function(function("f")).unwrap();
        table.declare_struct(structure("S", &[], Vec::new())).unwrap();
        let second = table.declare_function(function("f")).unwrap();
        assert_eq!(table.overloads("f"), &[first, second]);
        assert_eq!(table.function(first).name, "f");
        assert_eq!(table.function(second).name, "f.1");
        assert_eq!(table.items().len(), 3);
        assert_eq!(table.items()[1], Item::Struct(StructId::new(0)));
    }

    #[test]
    fn test_redeclaration_across_kinds() {
        let mut table = SymbolTable::new();
        table.declare_struct(structure("S", &[], Vec::new())).unwrap();
        assert_eq!(table.declare_function(function("S")), Err(Redeclared));
        assert_eq!(
            table.declare_struct(structure("S", &[], Vec::new())).err(),
            Some(Redeclared)
        );
        assert!(table.overloads("S").is_empty());
    }

    #[test]
    fn test_methods_are_not_top_level() {
        let mut table = SymbolTable::new();
        let id = table
            .declare_struct(structure("S", &[], vec![function("get"), function("set")]))
            .unwrap();
        assert!(table.lookup("get").is_none());
        let found: Vec<_> = table.methods(id, "set").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(table.function(found[0]).name, "S.set");
        assert_eq!(table.function(found[0]).owner, Some(id));
    }

    #[test]
    fn test_struct_instances_are_cached() {
        let mut table = SymbolTable::new();
        let template = table
            .declare_struct(structure("Box", &["T"], vec![function("get")]))
            .unwrap();
        assert!(table.get_struct(template).is_template());

        let a = table.instantiate_struct(template, vec![Type::i32()]);
        let b = table.instantiate_struct(template, vec![Type::i32()]);
        let c = table.instantiate_struct(template, vec![Type::int(IntWidth::U8)]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let instance = table.get_struct(a);
        assert_eq!(instance.name, "Box<i32>");
        assert!(!instance.is_template());
        assert_eq!(table.function(instance.methods[0]).name, "Box<i32>.get");
        let env: Vec<_> = instance.generic_env().collect();
        assert_eq!(env, vec![("T", &Type::i32())]);
    }

    #[test]
    fn test_function_instance_cache() {
        let mut table = SymbolTable::new();
        let mut decl = function("max");
        decl.generics.push(ident("T"));
        let id = table.declare_function(decl).unwrap();
        assert!(table.function(id).is_template());

        let key = table.instance_key(id, &[Type::i32()]);
        assert!(table.function_instance(&key).is_none());
        table.insert_function_instance(
            key.clone(),
            Instance {
                name: "max<i32>".to_owned(),
                signature: Signature {
                    params: vec![Type::i32(), Type::i32()],
                    ret: Type::i32(),
                },
            },
        );
        assert_eq!(
            table.function_instance(&table.instance_key(id, &[Type::i32()])),
            table.function_instance(&key)
        );
        assert_eq!(table.function_instance_count(), 1);
    }

    #[test]
    fn test_rollback_forgets_instances() {
        let mut table = SymbolTable::new();
        let template = table
            .declare_struct(structure("Box", &["T"], vec![function("get")]))
            .unwrap();
        let mut decl = function("max");
        decl.generics.push(ident("T"));
        let max = table.declare_function(decl).unwrap();
        let kept = table.instantiate_struct(template, vec![Type::i32()]);

        let mark = table.instance_mark();
        let dropped = table.instantiate_struct(template, vec![Type::int(IntWidth::U8)]);
        let key = table.instance_key(max, &[Type::i32()]);
        table.insert_function_instance(
            key.clone(),
            Instance {
                name: "max<i32>".to_owned(),
                signature: Signature {
                    params: vec![Type::i32()],
                    ret: Type::i32(),
                },
            },
        );
        table.rollback_instances(mark);

        assert_eq!(table.instance_mark(), mark);
        assert!(table.function_instance(&key).is_none());
        assert_eq!(table.instantiate_struct(template, vec![Type::i32()]), kept);
        assert_eq!(
            table.instantiate_struct(template, vec![Type::int(IntWidth::U8)]),
            dropped
        );
    }
}

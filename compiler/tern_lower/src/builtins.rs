//! Builtin functions: `size<T>()`, the integer conversions `u8(x)` ..
//! `i64(x)`, and `exit(code)`.
//!
//! A builtin is only considered when no user function has the name.

use tern_diagnostic::ErrorCode;
use tern_ir::ast::Call;
use tern_ir::Pos;
use tern_mir::{InstructionKind, MirPrototype, MirType, Operand};
use tern_types::{Constant, IntWidth, Type};

use crate::lowerer::Lowerer;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Builtin {
    /// Byte size of a type, as a constant.
    Size,
    /// Integer conversion to the given width.
    Convert(IntWidth),
    /// End the process with an `i32` status.
    Exit,
}

impl Builtin {
    pub(crate) fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "size" => Some(Builtin::Size),
            "exit" => Some(Builtin::Exit),
            _ => IntWidth::from_name(name).map(Builtin::Convert),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Builtin::Size => "size",
            Builtin::Exit => "exit",
            Builtin::Convert(width) => width.as_str(),
        }
    }

    fn arity(self) -> usize {
        match self {
            Builtin::Size => 0,
            Builtin::Convert(_) | Builtin::Exit => 1,
        }
    }

    fn generics(self) -> usize {
        match self {
            Builtin::Size => 1,
            Builtin::Convert(_) | Builtin::Exit => 0,
        }
    }
}

impl Lowerer<'_> {
    pub(crate) fn lower_builtin(&mut self, builtin: Builtin, call: &Call, pos: Pos) -> Type {
        let name = builtin.name();
        if call.generics.len() != builtin.generics() {
            let message = format!(
                "built-in function '{name}' expects {} generic argument(s), got {}",
                builtin.generics(),
                call.generics.len()
            );
            self.bag.error(ErrorCode::E2027, pos, message);
            return Type::undefined();
        }
        if call.args.len() != builtin.arity() {
            let message = format!(
                "'{name}' expects {} argument(s), got {}",
                builtin.arity(),
                call.args.len()
            );
            self.bag.error(ErrorCode::E2030, pos, message);
            return Type::undefined();
        }
        match builtin {
            Builtin::Size => self.lower_size(call, pos),
            Builtin::Convert(width) => self.lower_convert(width, call, pos),
            Builtin::Exit => self.lower_exit(call),
        }
    }

    fn lower_size(&mut self, call: &Call, pos: Pos) -> Type {
        let Some(node) = call.generics.first() else {
            return Type::undefined();
        };
        let ty = self.resolve_type(node);
        let ty = self.types.resolve(&ty);
        if ty.is_undefined() {
            return ty;
        }
        let bytes = self.symbols.size_of(&ty, self.config.pointer_width.bytes());
        let Some(bytes) = bytes else {
            let message = format!(
                "unable to calculate size of a static type '{}'",
                self.show(&ty)
            );
            self.bag.error(ErrorCode::E2031, node.pos, message);
            return Type::undefined();
        };
        self.emit_constant(&Constant::Int(i128::from(bytes)), pos)
    }

    fn lower_convert(&mut self, width: IntWidth, call: &Call, pos: Pos) -> Type {
        let target = Type::int(width);
        let Some(arg) = call.args.first() else {
            return target;
        };
        let source = self.lower_value(arg, Type::undefined());
        if source.is_undefined() {
            return target;
        }
        if !self.casts_to_int(&source) {
            let message = format!(
                "invalid cast from '{}' to '{}'",
                self.show(&source),
                width.as_str()
            );
            self.bag.error(ErrorCode::E2028, pos, message);
            return target;
        }
        let mir = self.mir_type(&target);
        self.emit(InstructionKind::CastIntToInt, mir, Operand::None);
        target
    }

    fn lower_exit(&mut self, call: &Call) -> Type {
        let Some(arg) = call.args.first() else {
            return Type::void();
        };
        let ty = self.lower_value(arg, Type::i32());
        match ty.int_width() {
            Some(IntWidth::I32) => {}
            Some(_) => self.emit(InstructionKind::CastIntToInt, MirType::I32, Operand::None),
            None => {
                self.check(&Type::i32(), &ty, arg.pos);
            }
        }
        self.module.declare_prototype(MirPrototype {
            name: "exit".to_owned(),
            params: vec![MirType::I32],
            ret: MirType::Void,
        });
        self.emit(
            InstructionKind::Call,
            MirType::Void,
            Operand::Function("exit".to_owned()),
        );
        Type::void()
    }
}

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn sample() -> MirModule {
    let point = MirType::Struct("Point".to_owned());
    let mut module = MirModule::new();
    module.define_struct(MirStruct {
        name: "Point".to_owned(),
        fields: vec![MirType::I32, MirType::I32],
    });
    module.declare_prototype(MirPrototype {
        name: "exit".to_owned(),
        params: vec![MirType::I32],
        ret: MirType::Void,
    });

    let mut main = FunctionBuilder::new("main", Vec::new(), MirType::Void);
    let slot = main.declare_local(point.clone(), true);
    main.emit(InstructionKind::LoadZeroinitialized, point.clone(), Operand::None);
    main.emit(InstructionKind::StoreLocal, point, Operand::Local(slot));
    main.emit(InstructionKind::LoadConstant, MirType::I32, Operand::Int(0));
    main.emit(
        InstructionKind::Call,
        MirType::Void,
        Operand::Function("exit".to_owned()),
    );
    main.emit(InstructionKind::Return, MirType::Void, Operand::None);
    module.functions.push(main.finish());
    module
}

#[test]
fn test_text_dump() {
    let expected = "\
.strct Point:
  .fields
    i32
    i32

.fn exit(i32) void

.fn main() void:
  .locals:
    .[0] {mutable} %Point

 [0] % entry:
  LoadZeroinitialized %Point (_)
  StoreLocal %Point (0)
  LoadConstant i32 (0)
  Call void (exit)
  Return void (_)
";
    assert_eq!(sample().to_string(), expected);
}

#[test]
fn test_json_dump_shape() {
    let value = dump_json(&sample());
    assert_eq!(value["structs"][0]["name"], json!("Point"));
    assert_eq!(
        value["prototypes"][0]["params"][0],
        json!({"Int": {"bits": 32, "signed": true}})
    );
    let first = &value["functions"][0]["blocks"][0]["instructions"][0];
    assert_eq!(
        *first,
        json!({
            "kind": "LoadZeroinitialized",
            "ty": {"Struct": "Point"},
            "operand": "None",
        })
    );
    assert_eq!(
        value["functions"][0]["blocks"][0]["instructions"][2]["operand"],
        json!({"Int": 0})
    );
}

#[test]
fn test_duplicate_declarations_are_merged() {
    let mut module = sample();
    module.declare_prototype(MirPrototype {
        name: "exit".to_owned(),
        params: vec![MirType::I32],
        ret: MirType::Void,
    });
    module.define_struct(MirStruct {
        name: "Point".to_owned(),
        fields: Vec::new(),
    });
    assert_eq!(module.prototypes.len(), 1);
    assert_eq!(module.structs.len(), 1);
    assert!(module.function("main").is_some());
}

#[test]
fn test_operand_and_type_notation() {
    let float = Instruction::new(
        InstructionKind::LoadConstant,
        MirType::Float { bits: 64 },
        Operand::Float(1.5f64.to_bits()),
    );
    assert_eq!(float.to_string(), "LoadConstant f64 (1.5)");
    let branch = Instruction::new(
        InstructionKind::JumpConditional,
        MirType::Void,
        Operand::Branch {
            then: 1,
            otherwise: 2,
        },
    );
    assert_eq!(branch.to_string(), "JumpConditional void (1, 2)");
    assert_eq!(MirType::pointer(MirType::U8).to_string(), "*u8");
    assert_eq!(MirType::BOOL.to_string(), "u1");
    assert_eq!(
        dump_json(&MirModule::new()),
        json!({"functions": [], "prototypes": [], "structs": []})
    );
}

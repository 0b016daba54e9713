//! Concrete wire-byte scenarios pinned against literal expected output.
//! Values are built directly against the type model rather than through the
//! schema compiler, so each test is a minimal, self-contained fixture.

use std::rc::Rc;

use extprot::types::FieldDef;
use extprot::types::MessageDef;
use extprot::types::TupleType;
use extprot::types::Type;
use extprot::types::UnboundSlot;
use extprot::types::UnionDef;
use extprot::value::OptionValue;
use extprot::value::MessageRecord;
use extprot::value::TypedList;
use extprot::value::Value;
use extprot::{decode, encode};

fn a_bool_def() -> Rc<MessageDef> {
    Rc::new(MessageDef { name: "a_bool".to_string(), fields: vec![FieldDef::new("v".to_string(), Type::Bool, false)] })
}

#[test]
fn s1_bool_message_true() {
    let def = a_bool_def();
    let mut record = MessageRecord::new(def.clone());
    record.set("v", Value::Bool(true)).unwrap();
    let value = Value::Message(Box::new(record));
    let ty = Type::Message(def);

    let bytes = encode(&value, &ty).unwrap();
    assert_eq!(bytes, vec![1, 3, 1, 2, 1]);
    assert_eq!(decode(&bytes, &ty).unwrap(), value);
}

#[test]
fn s2_bool_message_false() {
    let def = a_bool_def();
    let mut record = MessageRecord::new(def.clone());
    record.set("v", Value::Bool(false)).unwrap();
    let value = Value::Message(Box::new(record));
    let ty = Type::Message(def);

    let bytes = encode(&value, &ty).unwrap();
    assert_eq!(bytes, vec![1, 3, 1, 2, 0]);
}

#[test]
fn s3_tuple_of_two_bools() {
    let tuple_ty = Type::Tuple(Rc::new(TupleType { elements: vec![Type::Bool, Type::Bool] }));
    let def = Rc::new(MessageDef { name: "a_tuple".to_string(), fields: vec![FieldDef::new("v".to_string(), tuple_ty, false)] });
    let mut record = MessageRecord::new(def.clone());
    record.set("v", Value::Tuple(vec![Value::Bool(true), Value::Bool(false)])).unwrap();
    let value = Value::Message(Box::new(record));
    let ty = Type::Message(def);

    let bytes = encode(&value, &ty).unwrap();
    assert_eq!(bytes, vec![1, 8, 1, 1, 5, 2, 2, 1, 2, 0]);
    assert_eq!(decode(&bytes, &ty).unwrap(), value);
}

#[test]
fn s4_union_fields() {
    // type 'a maybe = Unknown | Known of 'a
    let maybe_skeleton = UnionDef::new(
        "maybe".to_string(),
        vec![
            ("Unknown".to_string(), None),
            ("Known".to_string(), Some(vec![FieldDef::new("value".to_string(), Type::Unbound(UnboundSlot { name: "a".to_string() }), false)])),
        ],
    )
    .unwrap();
    let maybe_ty = Type::Union(Rc::new(maybe_skeleton));
    let maybe_int = maybe_ty.bind(&["a".to_string()], &[Type::Int]);
    let maybe_bool = maybe_ty.bind(&["a".to_string()], &[Type::Bool]);

    let maybe_int_def = match &maybe_int {
        Type::Union(def) => def.clone(),
        _ => unreachable!(),
    };
    let maybe_bool_def = match &maybe_bool {
        Type::Union(def) => def.clone(),
        _ => unreachable!(),
    };

    let foo_def = Rc::new(MessageDef {
        name: "foo".to_string(),
        fields: vec![FieldDef::new("a".to_string(), maybe_int, false), FieldDef::new("b".to_string(), maybe_bool, false)],
    });

    let (unknown_idx, _) = maybe_int_def.variant_by_name("Unknown").unwrap();
    let a_value = Value::Option(OptionValue { def: maybe_int_def, variant_index: unknown_idx, payload: None });

    let (known_idx, _) = maybe_bool_def.variant_by_name("Known").unwrap();
    let b_value = Value::Option(OptionValue { def: maybe_bool_def, variant_index: known_idx, payload: Some(vec![Value::Bool(true)]) });

    let mut record = MessageRecord::new(foo_def.clone());
    record.set("a", a_value).unwrap();
    record.set("b", b_value).unwrap();
    let value = Value::Message(Box::new(record));
    let ty = Type::Message(foo_def);

    let bytes = encode(&value, &ty).unwrap();
    assert_eq!(bytes, vec![1, 7, 2, 10, 1, 3, 1, 2, 1]);
    assert_eq!(decode(&bytes, &ty).unwrap(), value);
}

#[test]
fn s5_list_of_ints() {
    let list_ty = Type::List(Rc::new(Type::Int));
    let def = Rc::new(MessageDef { name: "some_ints".to_string(), fields: vec![FieldDef::new("l".to_string(), list_ty, false)] });
    let mut record = MessageRecord::new(def.clone());
    let elements = [Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(-1)];
    let list = TypedList::from_values(Rc::new(Type::Int), elements.into_iter()).unwrap();
    record.set("l", Value::List(list)).unwrap();
    let value = Value::Message(Box::new(record));
    let ty = Type::Message(def);

    let bytes = encode(&value, &ty).unwrap();
    assert_eq!(bytes, vec![1, 12, 1, 5, 9, 4, 0, 2, 0, 4, 0, 6, 0, 1]);
    assert_eq!(decode(&bytes, &ty).unwrap(), value);

    // Array produces identical bytes on the wire as List (spec §3.2).
    let array_ty = Type::Message(Rc::new(MessageDef {
        name: "some_ints".to_string(),
        fields: vec![FieldDef::new("l".to_string(), Type::Array(Rc::new(Type::Int)), false)],
    }));
    let array_decoded = decode(&bytes, &array_ty).unwrap();
    let re_encoded = encode(&array_decoded, &array_ty).unwrap();
    assert_eq!(re_encoded, bytes);
}

#[test]
fn s6_nested_message_and_int() {
    let inner_def = a_bool_def();
    let mut inner_record = MessageRecord::new(inner_def.clone());
    inner_record.set("v", Value::Bool(true)).unwrap();

    let outer_def = Rc::new(MessageDef {
        name: "a_bool_and_int".to_string(),
        fields: vec![FieldDef::new("b".to_string(), Type::Message(inner_def), false), FieldDef::new("i".to_string(), Type::Int, false)],
    });
    let mut record = MessageRecord::new(outer_def.clone());
    record.set("b", Value::Message(Box::new(inner_record))).unwrap();
    record.set("i", Value::Int(-1)).unwrap();
    let value = Value::Message(Box::new(record));
    let ty = Type::Message(outer_def);

    let bytes = encode(&value, &ty).unwrap();
    assert_eq!(bytes, vec![1, 8, 2, 1, 3, 1, 2, 1, 0, 1]);
    assert_eq!(decode(&bytes, &ty).unwrap(), value);
}

#[test]
fn s7_varuint_smoke() {
    use extprot::io::encode_varuint;

    let cases: [(u64, &[u8]); 4] = [(34, &[34]), (128, &[128, 1]), (2053, &[133, 16]), (314_159_265, &[225, 141, 230, 149, 1])];
    for (value, expected) in cases {
        let mut buf = Vec::new();
        encode_varuint(value, &mut buf);
        assert_eq!(buf, expected, "encoding {value}");
    }
}

use codec::{
    compile, emit_rust_module, pack_message_to_vec, CompileOptions, Decoded, DecodeFailure,
    Handler, Protocol, Value,
};
use packer::{Packer, Unpacker};
use schema::Kind;
use std::sync::Arc;

fn six() -> Arc<Protocol> {
    Protocol::from_registry(&protocols::six::registry(), &CompileOptions::default())
        .unwrap()
        .into_shared()
}

fn seven() -> Arc<Protocol> {
    Protocol::from_registry(&protocols::seven::registry(), &CompileOptions::default())
        .unwrap()
        .into_shared()
}

fn snapshot_item(values: &[i32]) -> Vec<u8> {
    let mut packer = Packer::new();
    for value in values {
        packer.add_uncompressed_int(*value).unwrap();
    }
    packer.finish()
}

#[test]
fn six_identifiers() {
    let protocol = six();
    assert_eq!(protocol.objects().num_types(), 13);
    assert_eq!(protocol.events().num_types(), 9);
    assert_eq!(protocol.messages().num_types(), 32);
    assert_eq!(protocol.messages().id_of("Sv_Chat"), Some(3));
    assert_eq!(protocol.messages().id_of("Cl_Say"), Some(17));
    assert_eq!(protocol.objects().id_of("DDNetCharacter"), Some(0x1_0001));
    assert_eq!(protocol.events().id_of("Birthday"), Some(0x2_0000));
    assert_eq!(protocol.messages().id_of("Cl_ShowOthers"), Some(0x3_0002));
    assert_eq!(protocol.compiled().registrations().len(), 12 + 3 + 17);
}

#[test]
fn six_sizes_and_names() {
    let protocol = six();
    let objects = protocol.objects();
    let character = objects.id_of("Character").unwrap();
    assert_eq!(objects.size(character), 22 * 4);
    assert_eq!(objects.name(character), "Character");
    assert_eq!(objects.name(0), "invalid");
    assert_eq!(objects.name(13), "(out of range)");
    assert_eq!(objects.size(objects.id_of("DDNetCharacter").unwrap()), 0);
    assert_eq!(objects.unpacked_size(0), 16);
}

#[test]
fn character_inherits_core_fields_first() {
    let protocol = six();
    let layout = protocol.objects().layout(9).unwrap();
    let names: Vec<&str> = layout.fields.iter().map(|field| &*field.name).collect();
    assert_eq!(names[0], "m_Tick");
    assert_eq!(names[14], "m_HookDy");
    assert_eq!(names[15], "m_PlayerFlags");
    assert_eq!(names.len(), 22);
}

#[test]
fn character_clamps_out_of_range_health() {
    let mut values = vec![0; 22];
    values[16] = 50;
    values[19] = 9;
    let bytes = snapshot_item(&values);

    let mut handler = Handler::new(six());
    let record = handler
        .decode_object(9, &mut Unpacker::new(&bytes))
        .unwrap()
        .record()
        .unwrap();
    assert_eq!(record.int("m_Health"), Some(10));
    assert_eq!(record.int("m_Weapon"), Some(5));
    assert_eq!(handler.correction_count(), 2);
    assert_eq!(handler.corrected_on(), Some("m_Weapon"));
}

#[test]
fn ddnet_character_is_forward_compatible() {
    let protocol = six();
    let id = protocol.objects().id_of("DDNetCharacter").unwrap();
    let mut handler = Handler::new(protocol);

    let old_server = snapshot_item(&[1, 100, 3, 0]);
    let record = handler
        .decode_object(id, &mut Unpacker::new(&old_server))
        .unwrap()
        .record()
        .unwrap();
    assert_eq!(record.int("m_Jumps"), Some(3));
    assert_eq!(record.int("m_StrongWeakId"), Some(0));
    assert_eq!(record.int("m_JumpedTotal"), Some(-1));
    assert_eq!(record.int("m_NinjaActivationTick"), Some(-1));

    let newer_server = snapshot_item(&[0; 14]);
    assert!(handler
        .decode_object(id, &mut Unpacker::new(&newer_server))
        .is_ok());
}

#[test]
fn switch_state_arrays() {
    let protocol = six();
    let id = protocol.objects().id_of("SwitchState").unwrap();
    let layout = protocol.objects().layout(id).unwrap();
    assert_eq!(layout.slot_count(), 17);
    assert_eq!(layout.slot_index("m_aStatus[7]"), Some(8));
    assert_eq!(layout.slot_index("m_aEndTicks[3]"), Some(16));
}

#[test]
fn chat_roundtrip_and_rejection() {
    let protocol = six();
    let ok = pack_message_to_vec(
        &protocol,
        3,
        &[Value::Int(0), Value::Int(12), Value::from("gg\u{1}")],
    )
    .unwrap();
    let bad = pack_message_to_vec(
        &protocol,
        3,
        &[Value::Int(0), Value::Int(64), Value::from("gg")],
    )
    .unwrap();

    let mut handler = Handler::new(protocol);
    let record = handler.decode_message_frame(&ok).unwrap().record().unwrap();
    assert_eq!(record.name(), "Sv_Chat");
    assert_eq!(record.str("m_pMessage"), Some("gg "));

    let failure = handler.decode_message_frame(&bad).unwrap_err();
    assert_eq!(failure, DecodeFailure::Field { name: "m_ClientId".into() });
    assert_eq!(handler.failed_message_on(), Some("m_ClientId"));
}

#[test]
fn extended_message_frame() {
    let protocol = six();
    let id = protocol.messages().id_of("Cl_ShowOthers").unwrap();
    let bytes = pack_message_to_vec(&protocol, id, &[Value::Int(2)]).unwrap();
    assert_eq!(bytes[0], 0);

    let mut handler = Handler::new(protocol);
    let record = handler.decode_message_frame(&bytes).unwrap().record().unwrap();
    assert_eq!(record.id(), id);
    assert_eq!(record.int("m_Show"), Some(2));
}

#[test]
fn extended_object_sentinel_yields_uuid() {
    let uuid = schema::extension_uuid("character@netobj.ddnet.tw");
    let mut handler = Handler::new(six());
    match handler.decode_object(0, &mut Unpacker::new(&uuid)).unwrap() {
        Decoded::ExtendedUuid(found) => assert_eq!(found, uuid),
        Decoded::Record(record) => panic!("unexpected record {}", record.name()),
    }
}

#[test]
fn historian_predicate() {
    let handler = Handler::new(six());
    assert!(!handler.is_message_recordable(17));
    assert!(!handler.is_message_recordable(24));
    assert!(!handler.is_message_recordable(25));
    assert!(handler.is_message_recordable(3));
    assert!(handler.is_message_recordable(999));
}

#[test]
fn seven_flags_dialects() {
    let protocol = seven();
    let player_info = protocol.objects().id_of("PlayerInfo").unwrap();
    let game_info = protocol.messages().id_of("Sv_GameInfo").unwrap();
    let mut handler = Handler::new(Arc::clone(&protocol));

    let bytes = snapshot_item(&[0x1ff, 10, 20]);
    let record = handler
        .decode_object(player_info, &mut Unpacker::new(&bytes))
        .unwrap()
        .record()
        .unwrap();
    assert_eq!(record.int("m_PlayerFlags"), Some(0xff));

    let mut packer = Packer::new();
    protocol
        .pack(
            Kind::Message,
            game_info,
            &[
                Value::Int(0x10),
                Value::Int(0),
                Value::Int(0),
                Value::Int(0),
                Value::Int(0),
            ],
            &mut packer,
        )
        .unwrap();
    let bytes = packer.finish();
    let failure = handler
        .decode_message(game_info, &mut Unpacker::new(&bytes))
        .unwrap_err();
    assert_eq!(failure.reason(), "m_GameFlags");
}

#[test]
fn emitted_module_names_six_ids() {
    let compiled = compile(&protocols::six::registry(), &CompileOptions::default()).unwrap();
    let source = emit_rust_module(&compiled);
    assert!(source.contains("pub const NETMSGTYPE_SV_CHAT: i32 = 3;"));
    assert!(source.contains("pub const NUM_NETMSGTYPES: i32 = 32;"));
    assert!(source.contains("pub const NETOBJTYPE_DDNETCHARACTER: i32 = 0x10001;"));
    assert!(source.contains("pub static NON_RECORDABLE_NETMSGS: &[i32] = &[17, 24, 25];"));
    assert!(source.contains("\"showothers@netmsg.ddnet.tw\""));
}

#[test]
fn compile_is_deterministic() {
    let a = compile(&protocols::seven::registry(), &CompileOptions::default()).unwrap();
    let b = compile(&protocols::seven::registry(), &CompileOptions::default()).unwrap();
    assert_eq!(a.registry_hash(), b.registry_hash());
    assert_eq!(emit_rust_module(&a), emit_rust_module(&b));
}

#[derive(Clone, Copy)]
enum Boundary {
    Low,
    High,
    Inside,
}

fn midpoint(min: i32, max: i32) -> i32 {
    i32::try_from((i64::from(min) + i64::from(max)) / 2).unwrap()
}

fn boundary_value(spec: &schema::FieldSpec, boundary: Boundary) -> Value {
    if spec.is_string() {
        return Value::from("gg");
    }
    let value = if let Some((min, max)) = spec.range() {
        match boundary {
            Boundary::Low => min,
            Boundary::High => max,
            Boundary::Inside => midpoint(min, max),
        }
    } else if let Some(mask) = spec.mask() {
        match boundary {
            Boundary::Low => 0,
            Boundary::High => mask,
            Boundary::Inside => mask & 0x5555_5555,
        }
    } else {
        match boundary {
            Boundary::Low => i32::MIN,
            Boundary::High => i32::MAX,
            Boundary::Inside => -17,
        }
    };
    Value::Int(value)
}

fn decode_values(handler: &mut Handler, kind: Kind, id: i32, bytes: &[u8]) -> Vec<Value> {
    let mut unpacker = Unpacker::new(bytes);
    let decoded = match kind {
        Kind::Object => handler.decode_object(id, &mut unpacker),
        Kind::Event => handler.decode_event(id, &mut unpacker),
        Kind::Message => handler.decode_message(id, &mut unpacker),
    };
    match decoded {
        Ok(decoded) => decoded.record().unwrap().to_values(),
        Err(failure) => panic!("{kind} {id} failed: {failure}"),
    }
}

#[test]
fn every_declared_type_roundtrips_at_boundaries() {
    for protocol in [six(), seven()] {
        let mut handler = Handler::new(Arc::clone(&protocol));
        for kind in Kind::ALL {
            for layout in protocol.table(kind).layouts() {
                for boundary in [Boundary::Low, Boundary::High, Boundary::Inside] {
                    let values: Vec<Value> = (0..layout.slot_count())
                        .map(|slot| boundary_value(layout.slot_spec(slot).unwrap(), boundary))
                        .collect();
                    let mut packer = Packer::new();
                    protocol
                        .pack(kind, layout.id, &values, &mut packer)
                        .unwrap();
                    let bytes = packer.finish();

                    let decoded = decode_values(&mut handler, kind, layout.id, &bytes);
                    assert_eq!(decoded, values, "{kind} {}", layout.name);
                }
            }
        }
        assert_eq!(handler.correction_count(), 0);
    }
}

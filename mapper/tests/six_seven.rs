use codec::{compile, pack_message_to_vec, CompileOptions, Handler, Protocol, Value};
use mapper::{CrossVersionMap, VersionMaps, UNMAPPED};
use schema::Kind;

fn maps() -> VersionMaps {
    let six = compile(&protocols::six::registry(), &CompileOptions::default()).unwrap();
    let seven = compile(&protocols::seven::registry(), &CompileOptions::default()).unwrap();
    VersionMaps::build(&six, &seven)
}

#[test]
fn message_ids_translate_by_name() {
    let maps = maps();
    let messages = maps.get(Kind::Message);
    assert_eq!(messages.len_a(), 32);
    assert_eq!(messages.len_b(), 40);
    assert_eq!(messages.map_a_to_b(0), 0);
    assert_eq!(messages.map_a_to_b(3), 3);
    assert_eq!(messages.map_a_to_b(4), 5);
    assert_eq!(messages.map_a_to_b(17), 24);
    assert_eq!(messages.map_b_to_a(24), 17);
    assert_eq!(messages.map_a_to_b(5), UNMAPPED);
    assert_eq!(messages.map_b_to_a(4), UNMAPPED);
    assert_eq!(messages.map_a_to_b(32), UNMAPPED);
    assert_eq!(messages.map_b_to_a(-7), UNMAPPED);
}

#[test]
fn object_and_event_tables() {
    let maps = maps();
    assert_eq!(maps.objects.map_a_to_b(9), 10);
    assert_eq!(maps.objects.a_to_b(6), None);
    assert!(maps.objects.unmapped_b().any(|name| name == "GameDataTeam"));
    assert_eq!(maps.events.map_a_to_b(8), UNMAPPED);
    assert_eq!(maps.events.unmapped_b().collect::<Vec<_>>(), vec!["Damage"]);
}

#[test]
fn registries_and_compiled_protocols_agree() {
    let six = protocols::six::registry();
    let seven = protocols::seven::registry();
    let from_registries = CrossVersionMap::from_registries(Kind::Message, &six, &seven);
    assert_eq!(&from_registries, maps().get(Kind::Message));
}

#[test]
fn relay_translates_chat_between_generations() {
    let maps = maps();
    let six = Protocol::from_registry(&protocols::six::registry(), &CompileOptions::default())
        .unwrap()
        .into_shared();

    let six_id = six.messages().id_of("Sv_KillMsg").unwrap();
    let bytes = pack_message_to_vec(
        &six,
        six_id,
        &[Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(0)],
    )
    .unwrap();

    let mut handler = Handler::new(six);
    let record = handler.decode_message_frame(&bytes).unwrap().record().unwrap();
    let seven_id = maps.messages.map_a_to_b(record.id());
    assert_eq!(seven_id, 5);
    assert_eq!(maps.messages.name_b(seven_id), Some("Sv_KillMsg"));
}

#[test]
fn shifted_chat_decodes_through_mapped_id() {
    use packer::{Packer, Unpacker};
    use schema::{FieldSpec, Registry, TypeDef};

    let chat = || {
        TypeDef::message("Chat")
            .field("team", FieldSpec::int_range(-2, 3))
            .field("text", FieldSpec::string_half_strict())
    };
    let a = Registry::builder()
        .add(TypeDef::message("Motd").field("text", FieldSpec::string()))
        .add(TypeDef::message("Broadcast").field("text", FieldSpec::string()))
        .add(chat())
        .build()
        .unwrap();
    let b = Registry::builder()
        .add(TypeDef::message("Motd").field("text", FieldSpec::string()))
        .add(TypeDef::message("Broadcast").field("text", FieldSpec::string()))
        .add(TypeDef::message("Team").field("team", FieldSpec::int_range(-1, 1)))
        .add(chat())
        .build()
        .unwrap();

    let protocol_a = Protocol::from_registry(&a, &CompileOptions::default()).unwrap();
    let protocol_b = Protocol::from_registry(&b, &CompileOptions::default())
        .unwrap()
        .into_shared();
    let map = CrossVersionMap::from_registries(Kind::Message, &a, &b);

    let mut packer = Packer::new();
    protocol_a
        .pack(Kind::Message, 3, &[Value::Int(1), Value::from("hi")], &mut packer)
        .unwrap();
    let body = packer.finish();

    let id_b = map.map_a_to_b(3);
    assert_eq!(id_b, 4);
    let mut handler = Handler::new(protocol_b);
    let record = handler
        .decode_message(id_b, &mut Unpacker::new(&body))
        .unwrap()
        .record()
        .unwrap();
    assert_eq!(record.name(), "Chat");
    assert_eq!(record.int("team"), Some(1));
    assert_eq!(record.str("text"), Some("hi"));
}

#![no_main]

use std::sync::{Arc, OnceLock};

use codec::{CompileOptions, Handler, Protocol};
use libfuzzer_sys::fuzz_target;
use packer::Unpacker;

fn protocol(seven: bool) -> Arc<Protocol> {
    static SIX: OnceLock<Arc<Protocol>> = OnceLock::new();
    static SEVEN: OnceLock<Arc<Protocol>> = OnceLock::new();
    let activate = |registry| {
        Protocol::from_registry(&registry, &CompileOptions::default())
            .unwrap()
            .into_shared()
    };
    let shared = if seven {
        SEVEN.get_or_init(|| activate(protocols::seven::registry()))
    } else {
        SIX.get_or_init(|| activate(protocols::six::registry()))
    };
    Arc::clone(shared)
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let mut handler = Handler::new(protocol(selector & 1 == 1));

    let _ = handler.decode_message_frame(rest);
    if rest.len() >= 2 {
        let id = i32::from(rest[0]) % 32;
        let _ = handler.decode_object(id, &mut Unpacker::new(&rest[1..]));
        let _ = handler.decode_event(id % 12, &mut Unpacker::new(&rest[1..]));
    }
});

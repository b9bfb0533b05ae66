#![no_main]

use libfuzzer_sys::fuzz_target;
use packer::{Sanitize, Unpacker};

fuzz_target!(|data: &[u8]| {
    let mut unpacker = Unpacker::new(data);
    let mut scratch = String::new();
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 7;
        idx += 1;

        match op {
            0 => {
                let _ = unpacker.get_int();
            }
            1 => {
                let _ = unpacker.get_int_or_default(-1);
            }
            2 => {
                let _ = unpacker.get_uncompressed_int();
            }
            3 => {
                let _ = unpacker.get_string(Sanitize::ControlChars);
            }
            4 => {
                scratch.clear();
                let _ = unpacker.get_string_into(Sanitize::ControlCharsTrimStart, &mut scratch);
            }
            5 => {
                let len = usize::from(data[idx - 1] % 32);
                let _ = unpacker.get_raw(len);
            }
            _ => {
                let _ = unpacker.get_uncompressed_int_or_default(0);
            }
        }
    }
});

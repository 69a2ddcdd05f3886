#![no_main]
use libfuzzer_sys::fuzz_target;
use rowframe::{encode_stream, project_frames, project_text, Config, FieldPolicy};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let Some((&flags, text)) = data.split_first() else {
        return;
    };
    let policy = if flags & 1 == 0 {
        FieldPolicy::Strict
    } else {
        FieldPolicy::Lenient
    };
    let config = Config::<8>::default().with_field_policy(policy);

    let mut fast = Vec::new();
    let direct = project_text(Cursor::new(text), &mut fast, &config);

    let mut frames = Vec::new();
    let encoded = encode_stream(Cursor::new(text), &mut frames, &config);
    assert_eq!(direct.is_ok(), encoded.is_ok());

    let mut binary = Vec::new();
    project_frames(Cursor::new(&frames), &mut binary, &config).unwrap();
    // Both paths stop at the same line, so their outputs match even on failure.
    assert_eq!(fast, binary);
});

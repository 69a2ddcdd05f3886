#![no_main]
use libfuzzer_sys::fuzz_target;
use rowframe::{project_frames, Config};
use std::io::{self, Cursor};

fuzz_target!(|data: &[u8]| {
    // Small limit keeps hostile length prefixes cheap.
    let config = Config::<8>::default().with_max_frame_len(64 * 1024);
    let _ = project_frames(Cursor::new(data), &mut io::sink(), &config);
});

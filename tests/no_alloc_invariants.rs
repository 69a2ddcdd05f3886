#![cfg_attr(miri, ignore)]
// Minimal counting allocator using std::alloc hooks (test-only heuristic).
// Counting is per thread so that concurrently running tests do not interfere.
use rowframe::*;
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::io::Cursor;

struct CountingAlloc;

thread_local! {
    static COUNTING: Cell<bool> = const { Cell::new(false) };
    static ALLOC_COUNT: Cell<usize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = COUNTING.try_with(|on| {
            if on.get() {
                let _ = ALLOC_COUNT.try_with(|n| n.set(n.get() + 1));
            }
        });
        System.alloc(layout)
    }
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GA: CountingAlloc = CountingAlloc;

fn count_allocs<T>(f: impl FnOnce() -> T) -> (T, usize) {
    ALLOC_COUNT.with(|n| n.set(0));
    COUNTING.with(|on| on.set(true));
    let value = f();
    COUNTING.with(|on| on.set(false));
    (value, ALLOC_COUNT.with(Cell::get))
}

const LINES: &[&[u8]] = &[
    b"a,b,c,d,e,f,g,h",
    b",,,,,,,",
    b"alpha,beta,gamma,delta,epsilon,zeta,eta,theta",
];

#[test]
fn zero_alloc_split_and_decode() {
    // Purpose: splitting a line and decoding a payload hand out borrowed fields
    // and must never touch the heap.
    let payloads: Vec<Vec<u8>> = LINES
        .iter()
        .map(|line| {
            let mut ranges = FieldRanges::<8>::new();
            split_fields(line, b',', FieldPolicy::Strict, &mut ranges).unwrap();
            codec::encode(&Record::from_ranges(line, &ranges))
        })
        .collect();
    let mut ranges = FieldRanges::<8>::new();

    let (total, allocs) = count_allocs(|| {
        let mut total = 0;
        for line in LINES {
            split_fields(line, b',', FieldPolicy::Strict, &mut ranges).unwrap();
            total += Record::from_ranges(line, &ranges)[2].len();
        }
        for payload in &payloads {
            let record: Record<'_, 8> = codec::decode(payload).unwrap();
            total += record[6].len();
        }
        total
    });
    assert_eq!(allocs, 0, "split and decode should not allocate");
    assert_eq!(total, 1 + 5 + 1 + 3);
}

#[test]
fn zero_alloc_encode_into_warm_buffer() {
    let line: &[u8] = LINES[2];
    let mut ranges = FieldRanges::<8>::new();
    split_fields(line, b',', FieldPolicy::Strict, &mut ranges).unwrap();
    let record = Record::from_ranges(line, &ranges);
    let mut payload = Vec::with_capacity(codec::encoded_len(&record));

    let (_, allocs) = count_allocs(|| {
        for _ in 0..100 {
            payload.clear();
            codec::encode_into(&record, &mut payload);
        }
    });
    assert_eq!(allocs, 0, "encode_into should reuse the payload buffer");
}

#[test]
fn zero_alloc_steady_state_frame_reading() {
    // After the first frame sizes the buffer, reading further frames of the same
    // or smaller size must reuse it.
    let config = Config::<8>::default();
    let text = "alpha,beta,gamma,delta,epsilon,zeta,eta,theta\n".repeat(50);
    let mut frames = Vec::new();
    encode_stream(Cursor::new(text), &mut frames, &config).unwrap();

    let mut reader = StreamReader::new(Cursor::new(&frames), DefaultDeframer::default());
    reader.read_message().unwrap().unwrap();

    let (count, allocs) = count_allocs(|| {
        let mut count = 0;
        reader
            .process_records(|record: Record<'_, 8>| {
                count += record[0].len();
                Ok(())
            })
            .unwrap();
        count
    });
    assert_eq!(allocs, 0, "process_records should not allocate");
    assert_eq!(count, 49 * 5);
}

#[test]
fn zero_alloc_text_projection_into_reserved_output() {
    let config = Config::<8>::default();
    let text = "a,b,c,d,e,f,g,h\n".repeat(100);
    let mut lines = LineReader::new(Cursor::new(text.as_bytes()));
    let mut ranges = FieldRanges::<8>::new();
    let mut out = Vec::with_capacity(100 * 4);
    // Warm the line buffer.
    let first = lines.next_line().unwrap().unwrap().len();
    assert_eq!(first, 15);

    let (_, allocs) = count_allocs(|| {
        while let Some(line) = lines.next_line().unwrap() {
            split_fields(line, config.delimiter(), config.field_policy(), &mut ranges).unwrap();
            let projected = config
                .projection()
                .ordinals()
                .iter()
                .map(|&i| ranges.field(line, i));
            write_projection(&mut out, config.delimiter(), projected).unwrap();
        }
    });
    assert_eq!(allocs, 0, "text projection should not allocate per line");
    assert_eq!(out.len(), 99 * 4);
}

//! Property-based invariant tests for the input decoder (public API only).
//!
//! 1. Chunk boundaries never change the decoded events
//! 2. The input loop yields exactly what a one-shot decode yields
//! 3. Arbitrary bytes never panic, and one plain byte always resyncs
//! 4. Well-formed text decodes to its characters
//! 5. Cursor placement and mouse reports agree on coordinates
//! 6. Decode errors emit nothing and keep the stream in sync

use canvas_term::decoder::{Decoder, DecoderConfig};
use canvas_term::error::InputError;
use canvas_term::event::{Event, KeyCode};
use canvas_term::geometry::Size;
use canvas_term::input::{InputConfig, InputLoop};
use canvas_term::source::ReaderSource;
use canvas_term::terminal::Terminal;
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn arb_size() -> impl Strategy<Value = Size> {
    (1u16..=400, 1u16..=200).prop_map(|(cols, rows)| Size::new(cols, rows))
}

/// Bytes biased toward the interesting parts of the protocol.
fn arb_input() -> impl Strategy<Value = Vec<u8>> {
    let fragment = prop_oneof![
        any::<u8>().prop_map(|b| vec![b]),
        Just(b"\x1b".to_vec()),
        Just(b"\x1b[".to_vec()),
        Just(b"\x1b[<".to_vec()),
        Just(b"\x1bO".to_vec()),
        Just(b"\x1b[A".to_vec()),
        Just(b"\x1b[21~".to_vec()),
        Just(b"\x1b[<2;5;3M".to_vec()),
        Just(b";".to_vec()),
        (0u32..100_000).prop_map(|n| n.to_string().into_bytes()),
        any::<char>().prop_map(|c| c.to_string().into_bytes()),
        Just(vec![0xC3]),
        Just(vec![0xE6, 0x9E]),
    ];
    prop::collection::vec(fragment, 0..64).prop_map(|parts| parts.concat())
}

fn decoder(size: Size) -> Decoder {
    Decoder::new(DecoderConfig::default(), size)
}

/// Split `bytes` at the given (unsorted, possibly out of range) cut points.
fn split_at_cuts<'a>(bytes: &'a [u8], cuts: &[usize]) -> Vec<&'a [u8]> {
    let mut cuts: Vec<usize> = cuts
        .iter()
        .map(|c| c % (bytes.len() + 1))
        .collect();
    cuts.sort_unstable();
    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(&bytes[start..cut]);
        start = cut;
    }
    chunks.push(&bytes[start..]);
    chunks
}

fn drain(input: &mut InputLoop<ReaderSource<&[u8]>>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match input.await_event() {
            Ok(event) => events.push(event),
            Err(InputError::Closed) => return events,
            Err(e) => panic!("unexpected input error: {e}"),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Chunk boundaries never change the decoded events
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn chunking_is_invisible(
        bytes in arb_input(),
        cuts in prop::collection::vec(any::<usize>(), 0..8),
        size in arb_size(),
    ) {
        let whole = decoder(size).decode(&bytes);

        let mut chunked = decoder(size);
        let mut events = Vec::new();
        for chunk in split_at_cuts(&bytes, &cuts) {
            events.extend(chunked.decode(chunk));
        }

        prop_assert_eq!(whole, events);
    }

    #[test]
    fn byte_at_a_time_is_invisible(bytes in arb_input()) {
        let whole = decoder(Size::FALLBACK).decode(&bytes);

        let mut single = decoder(Size::FALLBACK);
        let events: Vec<Event> = bytes.iter().flat_map(|b| single.decode(&[*b])).collect();

        prop_assert_eq!(whole, events);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. The input loop yields exactly what a one-shot decode yields
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn input_loop_matches_decode(bytes in arb_input(), size in arb_size()) {
        let expected = decoder(size).decode(&bytes);
        let mut input = InputLoop::new(ReaderSource(&bytes[..]), size, InputConfig::default());
        prop_assert_eq!(drain(&mut input), expected);
        prop_assert_eq!(input.buffered(), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Arbitrary bytes never panic, and one plain byte always resyncs
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn garbage_then_resync(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut d = decoder(Size::FALLBACK);
        let _ = d.decode(&bytes);

        // 'z' ends any sequence: it is invalid in every escape state and a
        // non-continuation byte for a pending UTF-8 character.
        let _ = d.decode(b"z");
        prop_assert!(d.is_idle(), "decoder not idle after resync: {:?}", d.state());

        prop_assert_eq!(d.decode(b"\x1b[A"), vec![Event::Key(KeyCode::Up)]);
    }

    #[test]
    fn never_more_events_than_bytes_plus_replays(bytes in arb_input()) {
        // Each byte is consumed once and may additionally close one broken
        // UTF-8 sequence, so at most two events per byte.
        let events = decoder(Size::FALLBACK).decode(&bytes);
        prop_assert!(events.len() <= bytes.len() * 2);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Well-formed text decodes to its characters
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn text_decodes_to_chars(s in any::<String>()) {
        // ESC starts a sequence and C1 controls decode as U+FFFD.
        let text: String = s
            .chars()
            .filter(|c| *c != '\x1b' && !('\u{80}'..='\u{9f}').contains(c))
            .collect();
        let expected: Vec<Event> = text.chars().map(|c| Event::Char(u32::from(c))).collect();

        let mut d = decoder(Size::FALLBACK);
        prop_assert_eq!(d.decode(text.as_bytes()), expected);
        prop_assert!(d.is_idle());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Cursor placement and mouse reports agree on coordinates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cursor_and_mouse_round_trip(
        (size, col, row) in arb_size().prop_flat_map(|s| (Just(s), 0..s.cols, 0..s.rows)),
        press in any::<bool>(),
    ) {
        let mut term = Terminal::with_writer(Vec::new(), size);
        term.place_cursor(col, row).unwrap();
        let written = String::from_utf8(term.writer().clone()).unwrap();

        // CSI y ; x H  →  CSI < 2 ; x ; y M|m
        let params = written
            .strip_prefix("\x1b[")
            .and_then(|s| s.strip_suffix('H'))
            .unwrap();
        let (y, x) = params.split_once(';').unwrap();
        let report = format!("\x1b[<2;{x};{y}{}", if press { 'M' } else { 'm' });

        let expected = if press {
            Event::MouseDown { col, row }
        } else {
            Event::MouseUp { col, row }
        };
        prop_assert_eq!(decoder(size).decode(report.as_bytes()), vec![expected]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Decode errors emit nothing and keep the stream in sync
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unknown_tilde_numbers_are_dropped(n in 0u32..1000, tail in "[a-y]") {
        prop_assume!(![15, 17, 18, 19, 20, 21, 23, 24].contains(&n));
        let input = format!("\x1b[{n}~{tail}");
        let c = tail.chars().next().unwrap();
        prop_assert_eq!(
            decoder(Size::FALLBACK).decode(input.as_bytes()),
            vec![Event::Char(u32::from(c))]
        );
    }

    #[test]
    fn too_many_arguments_are_dropped(extra in 1usize..8) {
        let args = vec!["1"; 32 + extra].join(";");
        let input = format!("\x1b[{args}~\x1b[B");

        // The ';' opening argument 33 is rejected; what follows it is text.
        let rest = format!("{}~", vec!["1"; extra].join(";"));
        let expected: Vec<Event> = rest
            .chars()
            .map(|c| Event::Char(u32::from(c)))
            .chain(std::iter::once(Event::Key(KeyCode::Down)))
            .collect();

        prop_assert_eq!(decoder(Size::FALLBACK).decode(input.as_bytes()), expected);
    }

    #[test]
    fn foreign_mouse_buttons_are_dropped(button in 0u32..64, x in 1u32..80, y in 1u32..24) {
        prop_assume!(button != 2);
        let input = format!("\x1b[<{button};{x};{y}M\x1b[C");
        prop_assert_eq!(
            decoder(Size::FALLBACK).decode(input.as_bytes()),
            vec![Event::Key(KeyCode::Right)]
        );
    }
}

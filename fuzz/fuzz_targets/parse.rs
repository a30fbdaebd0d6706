#![no_main]

use libfuzzer_sys::fuzz_target;

use h1_wire::{Config, Error, MessageParser, Outcome, VecSink};

// Parse the input as a response message in one shot and again split at a
// fuzzer-chosen point, and require both runs to agree on the outcome, the
// consumed byte count and the body. The split into two windows exercises
// the retain-the-tail contract across every parser phase.

fn run(
    input: &[u8],
    split: usize,
    config: Config,
) -> (Result<Outcome, Error>, usize, Vec<u8>, bool) {
    let mut parser = MessageParser::response(config, VecSink::with_limit(1 << 20));

    let (a, first) = match parser.consume(&input[..split], false) {
        Ok(v) => v,
        Err(e) => return (Err(e), 0, Vec::new(), false),
    };
    if first == Outcome::MessageComplete {
        let body = parser.body().body().to_vec();
        return (Ok(first), a, body, parser.is_complete());
    }

    // Unconsumed tail plus the rest, as a socket loop would re-present it.
    let mut tail = input[a..split].to_vec();
    tail.extend_from_slice(&input[split..]);

    match parser.consume(&tail, true) {
        Ok((b, outcome)) => {
            let body = parser.body().body().to_vec();
            (Ok(outcome), a + b, body, parser.is_complete())
        }
        Err(e) => (Err(e), 0, Vec::new(), false),
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte selects knobs, second the split point.
    let config = Config::new()
        .allow_bare_lf(data[0] & 1 != 0)
        .allow_obs_fold(data[0] & 2 != 0)
        .max_header_len(4096);
    let input = &data[2..];
    let split = (data[1] as usize) % (input.len() + 1);

    let whole = run(input, input.len(), config);
    let fragmented = run(input, split, config);

    // Obs-fold lookahead is the one place a mid-stream end_of_stream flag
    // can legitimately change the parse, so compare without it.
    if data[0] & 2 == 0 {
        assert_eq!(whole.0, fragmented.0, "outcome diverged at split {split}");
        if whole.0.is_ok() {
            assert_eq!(whole.1, fragmented.1, "consumed diverged at split {split}");
            assert_eq!(whole.2, fragmented.2, "body diverged at split {split}");
            assert_eq!(whole.3, fragmented.3);
        }
    }
});

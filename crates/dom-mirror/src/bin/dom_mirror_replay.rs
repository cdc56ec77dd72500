//! `dom-mirror-replay`: rebuild a replica from a recorded message stream.
//!
//! Usage:
//!   dom-mirror-replay [--keep-going] < messages.ndjson
//!
//! Messages are read from stdin, one JSON message per line, and applied to a
//! fresh replica. The final markup is written to stdout. Without
//! `--keep-going` the first decode or replication failure exits with status 1.
//! Logging is controlled by `RUST_LOG`.

use std::io::{self, Write};

use dom_mirror::{read_ndjson_numbered, Replicator};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut keep_going = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--keep-going" => keep_going = true,
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("usage: dom-mirror-replay [--keep-going] < messages.ndjson");
                std::process::exit(2);
            }
        }
    }

    let mut replica = Replicator::new();
    let mut failures = 0usize;
    let stdin = io::stdin();
    for (line, message) in read_ndjson_numbered(stdin.lock()) {
        let result = message
            .map_err(|e| e.to_string())
            .and_then(|message| replica.apply(&message).map_err(|e| e.to_string()));
        if let Err(e) = result {
            eprintln!("line {line}: {e}");
            failures += 1;
            if !keep_going {
                std::process::exit(1);
            }
        }
    }

    let mut stdout = io::stdout();
    let written = stdout
        .write_all(replica.teardown().as_bytes())
        .and_then(|()| stdout.write_all(b"\n"));
    if let Err(e) = written {
        eprintln!("{e}");
        std::process::exit(1);
    }
    if failures > 0 {
        tracing::warn!(failures, "replay finished with failures");
        std::process::exit(1);
    }
}

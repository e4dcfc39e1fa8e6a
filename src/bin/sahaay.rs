//! Sahaay terminal chat binary.
//! Run with: `cargo run --bin sahaay`

use std::process::ExitCode;

use sahaay_agent::start_sahaay;

fn main() -> ExitCode {
    start_sahaay::run()
}

//! Binary entrypoint that launches the quote server.

use std::process::ExitCode;

use quote_chat::start_quote_chat;

/// Load quotes, pick a generation provider and serve the API.
fn main() -> ExitCode {
    start_quote_chat::run()
}

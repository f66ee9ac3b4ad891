use std::{
    env,
    io::Write,
    process::ExitCode,
};

// usage: exit_code [CODE] [MESSAGE...]
// writes MESSAGE to stderr, then exits with CODE (default 1).
fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let code = args.next()
        .as_deref()
        .unwrap_or("1")
        .parse::<u8>()
        .unwrap_or(255);
    let message = args.collect::<Vec<_>>().join(" ");
    if !message.is_empty() {
        let _ = writeln!(std::io::stderr(), "{message}");
    }
    ExitCode::from(code)
}

use std::{
    env,
    io::{
        self,
        Write,
    },
};

// usage: chatter [LINES]
// alternates "out N" on stdout and "err N" on stderr, then ends stdout
// with an unterminated "tail".
fn main() -> io::Result<()> {
    let lines = env::args()
        .nth(1)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(4);
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    for n in 0..lines {
        if n % 2 == 0 {
            writeln!(stdout, "out {n}")?;
            stdout.flush()?;
        } else {
            writeln!(stderr, "err {n}")?;
            stderr.flush()?;
        }
    }
    write!(stdout, "tail")?;
    stdout.flush()
}

//! Fixture child program for procpipe integration tests
//!
//! Each mode exercises one side of the piped exchange: echoing, flooding
//! stdout before reading stdin, reading all of stdin before writing, odd
//! exit codes and undecodable output.

use clap::{Arg, ArgMatches, Command, value_parser};
use std::io::{self, Read, Write};

const CHUNK: usize = 8 * 1024;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("procpipe-stub")
        .about("Fixture child program for procpipe tests")
        .subcommand_required(true)
        .subcommand(Command::new("echo").about("Copy stdin to stdout"))
        .subcommand(
            Command::new("args").about("Print each argument on its own line").arg(
                Arg::new("values")
                    .num_args(0..)
                    .allow_hyphen_values(true)
                    .trailing_var_arg(true),
            ),
        )
        .subcommand(
            Command::new("exit")
                .about("Print optional text, then exit with CODE")
                .arg(Arg::new("code").required(true).value_parser(value_parser!(i32)))
                .arg(Arg::new("print").long("print").value_name("TEXT")),
        )
        .subcommand(Command::new("invalid-utf8").about("Write bytes that are not UTF-8"))
        .subcommand(
            Command::new("stderr")
                .about("Write TEXT to stderr and 'out' to stdout")
                .arg(Arg::new("text").required(true)),
        )
        .subcommand(
            Command::new("slurp-then-emit")
                .about("Read all of stdin, then write BYTES bytes and the stdin length")
                .arg(bytes_arg()),
        )
        .subcommand(
            Command::new("flood-then-read")
                .about("Write BYTES bytes before reading stdin, then report its length")
                .arg(bytes_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("echo", _)) => echo()?,
        Some(("args", sub)) => print_args(sub)?,
        Some(("exit", sub)) => {
            let code = *sub.get_one::<i32>("code").unwrap_or(&0);
            if let Some(text) = sub.get_one::<String>("print") {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()?;
            }
            std::process::exit(code);
        }
        Some(("invalid-utf8", _)) => {
            let mut out = io::stdout().lock();
            out.write_all(b"ok\xff\xfe")?;
            out.flush()?;
        }
        Some(("stderr", sub)) => {
            let text = sub.get_one::<String>("text").map_or("", String::as_str);
            eprint!("{text}");
            print!("out");
        }
        Some(("slurp-then-emit", sub)) => {
            let read = drain_stdin()?;
            emit(bytes_of(sub), b'x')?;
            report_read(read)?;
        }
        Some(("flood-then-read", sub)) => {
            emit(bytes_of(sub), b'y')?;
            let read = drain_stdin()?;
            report_read(read)?;
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}

fn bytes_arg() -> Arg {
    Arg::new("bytes")
        .required(true)
        .value_parser(value_parser!(usize))
}

fn bytes_of(matches: &ArgMatches) -> usize {
    *matches.get_one::<usize>("bytes").unwrap_or(&0)
}

fn echo() -> io::Result<()> {
    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    io::copy(&mut input, &mut out)?;
    out.flush()
}

fn print_args(matches: &ArgMatches) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for value in matches.get_many::<String>("values").into_iter().flatten() {
        writeln!(out, "{value}")?;
    }
    out.flush()
}

fn drain_stdin() -> io::Result<usize> {
    let mut input = io::stdin().lock();
    let mut buf = [0u8; CHUNK];
    let mut total = 0;
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

fn emit(bytes: usize, fill: u8) -> io::Result<()> {
    let chunk = [fill; CHUNK];
    let mut out = io::stdout().lock();
    let mut remaining = bytes;
    while remaining > 0 {
        let n = remaining.min(CHUNK);
        out.write_all(&chunk[..n])?;
        remaining -= n;
    }
    out.flush()
}

fn report_read(read: usize) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "\nread={read}\n")?;
    out.flush()
}

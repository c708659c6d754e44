//! procpipe CLI binary
//!
//! All logic is in the library; main.rs only invokes cli::run().

fn main() {
    // cli::run() handles ALL output including errors
    let code = match procpipe::cli::run() {
        Ok(code) | Err(code) => code,
    };
    std::process::exit(code.as_i32());
}

//! gdbridge CLI binary
//!
//! All logic is in the library; main.rs only invokes cli::run().

fn main() {
    // cli::run() prints its own errors; main only maps to the exit status
    if let Err(code) = gdbridge::cli::run() {
        std::process::exit(code.as_i32());
    }
}

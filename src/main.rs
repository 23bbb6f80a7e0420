//! # Voxel World Demo Entry Point
//!
//! Calls into the library's `run()` function, which simulates a short headless
//! session and logs what the engine did.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    if let Err(e) = voxel_world::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

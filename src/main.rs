//! # Voxel Streamer Entry Point
//!
//! Runs the headless fly-through. Pass a JSON configuration path as the first argument
//! to override the defaults.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

fn main() {
    voxel_streamer::run();
}

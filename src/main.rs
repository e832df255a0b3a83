//! `trk` - project tracker CLI.
//!
//! Issues, boards, links and notifications kept in one JSON snapshot.

use tracker::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

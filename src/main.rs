//! Space Invaders emulator entry point.

use invaders::errors::EmuResult;
use invaders::start_shell;

fn main() -> EmuResult {
    start_shell()
}

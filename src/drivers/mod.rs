//! Host drivers.
//!
//! Interfaces for the host-side collaborators the emulator core does not
//! own: the text console, the framebuffer and the window event loop.

pub mod pixels_driver;
pub mod winit_driver;

use std::io::{self, Write};

use crate::emulator::Emulator;
use crate::errors::EmuResult;
use crate::types::Byte;

/// Native frame width after the cabinet's -90° tube rotation (pixels).
pub const DISPLAY_WIDTH: u32 = 224;
/// Native frame height after rotation.
pub const DISPLAY_HEIGHT: u32 = 256;
/// Window width.
pub const WINDOW_WIDTH: u32 = 448;
/// Window height.
pub const WINDOW_HEIGHT: u32 = 512;
/// Window title.
pub const WINDOW_TITLE: &str = "Space Invaders";

/// Console interface.
pub trait ConsoleInterface {
    /// Emit one character.
    fn put_char(&mut self, byte: Byte);
}

/// Display interface: receives the 1bpp VRAM window each frame.
pub trait DisplayInterface {
    /// Redraw from VRAM.
    fn refresh(&mut self, vram: &[Byte]) -> EmuResult;
}

/// Window interface.
pub trait WindowInterface {
    /// Run the emulator until it stops or the window closes.
    fn run_emulator(&mut self, emulator: Emulator) -> EmuResult;
}

/// Console printing to stdout, unbuffered.
#[derive(Default)]
pub struct StdoutConsole;

impl ConsoleInterface for StdoutConsole {
    fn put_char(&mut self, byte: Byte) {
        let mut stdout = io::stdout();
        if let Err(error) = stdout.write_all(&[byte]).and_then(|_| stdout.flush()) {
            error!("console write failed: {}", error);
        }
    }
}

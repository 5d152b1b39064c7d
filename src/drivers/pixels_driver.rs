//! Pixel-buffer display driver.

use crate::errors::EmuResult;
use crate::memory::{VRAM_HEIGHT, VRAM_WIDTH};
use crate::types::Byte;

use super::{DisplayInterface, DISPLAY_WIDTH};

const PIXEL_ON: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const PIXEL_OFF: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

/// Display driver expanding VRAM into an RGBA frame buffer.
///
/// The frame must hold `DISPLAY_WIDTH * DISPLAY_HEIGHT` RGBA pixels (one
/// `pixels` frame).
pub struct PixelsDisplayDriver<'a> {
    frame: &'a mut [u8],
}

impl<'a> PixelsDisplayDriver<'a> {
    /// Creates new driver over a frame buffer.
    pub fn new(frame: &'a mut [u8]) -> Self {
        PixelsDisplayDriver { frame }
    }
}

impl DisplayInterface for PixelsDisplayDriver<'_> {
    /// Expand the 1bpp VRAM rows into frame columns.
    ///
    /// The cabinet mounts the tube on its side, so VRAM row `r` becomes
    /// screen column `r`, bottom-up.
    fn refresh(&mut self, vram: &[Byte]) -> EmuResult {
        for row in 0..VRAM_HEIGHT {
            for col in 0..VRAM_WIDTH {
                let bit_index = row * VRAM_WIDTH + col;
                let lit = (vram[bit_index / 8] >> (bit_index % 8)) & 1 != 0;

                let x = row;
                let y = VRAM_WIDTH - 1 - col;
                let offset = (y * DISPLAY_WIDTH as usize + x) * 4;

                self.frame[offset..offset + 4]
                    .copy_from_slice(if lit { &PIXEL_ON } else { &PIXEL_OFF });
            }
        }

        Ok(())
    }
}

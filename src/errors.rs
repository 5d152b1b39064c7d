//! Shared error handling.
//!
//! Emulation and host failures all surface as boxed errors; the concrete
//! error types live next to the code that produces them (cartridge,
//! peripherals).

use std::error::Error;

/// Crate-wide result carrying whichever emulation or host error occurred.
pub type EmuResult<T = ()> = Result<T, Box<dyn Error>>;

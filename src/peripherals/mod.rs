//! Space Invaders cabinet peripherals.

pub mod input;
pub mod shifter;

use std::error::Error;
use std::fmt;

use crate::bus::{PortDirection, PortInterface};
use crate::errors::EmuResult;
use crate::types::Byte;

use self::input::{InputPorts, Key, KeyEvent};
use self::shifter::ShiftRegister;

/// Unknown port error.
#[derive(Debug)]
pub struct UnknownPortError {
    port: Byte,
    direction: PortDirection,
}

impl Error for UnknownPortError {}

impl fmt::Display for UnknownPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            PortDirection::In => "input",
            PortDirection::Out => "output",
        };
        write!(f, "unknown {} port {:02X}", direction, self.port)
    }
}

/// Port-mapped cabinet hardware: the sprite shift register and the input
/// port latches.
///
/// The sound latches (write ports 3 and 5) and the watchdog (port 6) are
/// accepted and discarded.
pub struct InvadersIo {
    shifter: ShiftRegister,
    inputs: InputPorts,
}

impl InvadersIo {
    /// Create the cabinet hardware with factory DIP settings.
    pub fn new() -> Self {
        InvadersIo {
            shifter: ShiftRegister::new(),
            inputs: InputPorts::new(),
        }
    }

    /// Input port state.
    pub fn inputs(&self) -> &InputPorts {
        &self.inputs
    }

    /// Mutable input port state (DIP switch configuration).
    pub fn inputs_mut(&mut self) -> &mut InputPorts {
        &mut self.inputs
    }
}

impl Default for InvadersIo {
    fn default() -> Self {
        Self::new()
    }
}

impl PortInterface for InvadersIo {
    fn port_io(&mut self, port: Byte, value: Byte, direction: PortDirection) -> EmuResult<Byte> {
        match direction {
            PortDirection::In => match port {
                // Mapped in hardware but never read by the game code.
                0 => Ok(0),
                1 => Ok(self.inputs.port1()),
                2 => Ok(self.inputs.port2()),
                3 => Ok(self.shifter.read()),
                _ => Err(Box::new(UnknownPortError { port, direction })),
            },
            PortDirection::Out => {
                match port {
                    2 => self.shifter.set_offset(value),
                    4 => self.shifter.load(value),
                    3 | 5 => debug!("sound latch {:02X} <- {:02X}", port, value),
                    6 => {} // watchdog
                    _ => return Err(Box::new(UnknownPortError { port, direction })),
                }
                Ok(0)
            }
        }
    }

    fn key_event(&mut self, key: Key, event: KeyEvent) -> bool {
        self.inputs.key_event(key, event)
    }
}

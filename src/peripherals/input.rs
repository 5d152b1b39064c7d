//! Cabinet input ports.

use crate::types::Byte;

/// Host keys the cabinet listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Fire (player 1).
    Space,
    /// Fire (player 1), alternate binding.
    Control,
    /// Move left (player 1).
    Left,
    /// Move right (player 1).
    Right,
    /// Insert a coin.
    Five,
    /// Start a one-player game.
    One,
    /// Start a two-player game.
    Two,
    /// Stop the emulator.
    Escape,
}

/// Key transition delivered by the host keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    /// Key released; the mapped input bit goes to 0.
    Released,
    /// Key pressed; the mapped input bit goes to 1.
    Pressed,
}

impl KeyEvent {
    /// Input-bit value carried by this transition.
    pub fn bit(self) -> bool {
        matches!(self, KeyEvent::Pressed)
    }
}

/// Input ports 1 and 2: player controls, coin slot and DIP switches.
///
/// Port 1 bit 3 is hard-wired high. The DIP defaults match the factory
/// settings of the original board.
#[derive(Clone, Copy, Debug)]
pub struct InputPorts {
    /// Coin slot.
    pub credit: bool,
    /// Player 2 start button.
    pub p2_start: bool,
    /// Player 1 start button.
    pub p1_start: bool,
    /// Player 1 fire.
    pub p1_shot: bool,
    /// Player 1 left.
    pub p1_left: bool,
    /// Player 1 right.
    pub p1_right: bool,
    /// Tilt switch.
    pub tilt: bool,
    /// Player 2 fire.
    pub p2_shot: bool,
    /// Player 2 left.
    pub p2_left: bool,
    /// Player 2 right.
    pub p2_right: bool,
    /// Ship count switch (low bit).
    pub dip3: bool,
    /// Ship count switch (high bit).
    pub dip5: bool,
    /// Bonus ship at 1000 instead of 1500.
    pub dip6: bool,
    /// Coin info in the demo screen.
    pub dip7: bool,
}

impl Default for InputPorts {
    fn default() -> Self {
        InputPorts {
            credit: false,
            p2_start: false,
            p1_start: false,
            p1_shot: false,
            p1_left: false,
            p1_right: false,
            tilt: false,
            p2_shot: false,
            p2_left: false,
            p2_right: false,
            dip3: true,
            dip5: true,
            dip6: true,
            dip7: false,
        }
    }
}

impl InputPorts {
    /// Create input ports with the factory DIP settings.
    pub fn new() -> Self {
        Default::default()
    }

    /// Pack port 1. Bit 3 is hard-wired to 1.
    pub fn port1(&self) -> Byte {
        Byte::from(self.credit)
            | (Byte::from(self.p2_start) << 1)
            | (Byte::from(self.p1_start) << 2)
            | (1 << 3)
            | (Byte::from(self.p1_shot) << 4)
            | (Byte::from(self.p1_left) << 5)
            | (Byte::from(self.p1_right) << 6)
    }

    /// Pack port 2: DIP switches and player-2 controls.
    pub fn port2(&self) -> Byte {
        Byte::from(self.dip3)
            | (Byte::from(self.dip5) << 1)
            | (Byte::from(self.tilt) << 2)
            | (Byte::from(self.dip6) << 3)
            | (Byte::from(self.p2_shot) << 4)
            | (Byte::from(self.p2_left) << 5)
            | (Byte::from(self.p2_right) << 6)
            | (Byte::from(self.dip7) << 7)
    }

    /// Apply one key transition to the mapped input bit.
    ///
    /// # Returns
    ///
    /// * `true` when the key requests an emulator stop (ESCAPE).
    ///
    pub fn key_event(&mut self, key: Key, event: KeyEvent) -> bool {
        let value = event.bit();

        match key {
            Key::Space | Key::Control => self.p1_shot = value,
            Key::Left => self.p1_left = value,
            Key::Right => self.p1_right = value,
            Key::Five => self.credit = value,
            Key::One => self.p1_start = value,
            Key::Two => self.p2_start = value,
            Key::Escape => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port1_idle_state() {
        let ports = InputPorts::new();
        // Only the hard-wired bit reads 1.
        assert_eq!(ports.port1(), 0b0000_1000);
    }

    #[test]
    fn test_port2_factory_dips() {
        let ports = InputPorts::new();
        // DIP3, DIP5 and DIP6 set; everything else idle.
        assert_eq!(ports.port2(), 0b0000_1011);
    }

    #[test]
    fn test_key_events_drive_bits() {
        let mut ports = InputPorts::new();

        assert!(!ports.key_event(Key::Five, KeyEvent::Pressed));
        assert!(ports.credit);
        assert_eq!(ports.port1() & 0x01, 0x01);

        ports.key_event(Key::Five, KeyEvent::Released);
        assert!(!ports.credit);

        ports.key_event(Key::Space, KeyEvent::Pressed);
        assert!(ports.p1_shot);
        ports.key_event(Key::Control, KeyEvent::Released);
        assert!(!ports.p1_shot);

        ports.key_event(Key::Left, KeyEvent::Pressed);
        ports.key_event(Key::Right, KeyEvent::Pressed);
        assert_eq!(ports.port1() & 0b0110_0000, 0b0110_0000);

        ports.key_event(Key::One, KeyEvent::Pressed);
        ports.key_event(Key::Two, KeyEvent::Pressed);
        assert_eq!(ports.port1() & 0b0000_0110, 0b0000_0110);
    }

    #[test]
    fn test_escape_requests_stop() {
        let mut ports = InputPorts::new();
        assert!(ports.key_event(Key::Escape, KeyEvent::Pressed));
        // No input bit changes.
        assert_eq!(ports.port1(), 0b0000_1000);
    }
}

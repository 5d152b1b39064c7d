//! 8080 machine emulator.
//!
//! The drive loop owns the CPU. One iteration is one CPU step followed by
//! the consumption of at most one pending interrupt request, so interrupt
//! injection only ever happens between instruction boundaries.

use crate::bdos::Bdos;
use crate::cartridge::{Cartridge, RomKind};
use crate::cpu::{Cpu, Step, StopReason};
use crate::drivers::{ConsoleInterface, StdoutConsole};
use crate::peripherals::input::{Key, KeyEvent};
use crate::peripherals::InvadersIo;
use crate::types::Byte;

/// Interrupt vector requested mid-screen.
pub const MID_SCREEN_IRQ: Byte = 1;
/// Interrupt vector requested at the end of the screen.
pub const END_OF_SCREEN_IRQ: Byte = 2;

/// Drive-loop state after one iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmulationState {
    /// Keep stepping.
    Running,
    /// An end-of-screen interrupt was just consumed; hosts redraw now.
    EndOfFrame,
    /// The CPU stopped.
    Stopped(StopReason),
}

/// 8080 machine emulator: the CPU plus its drive loop.
pub struct Emulator {
    /// CPU handle.
    pub cpu: Cpu,
}

impl Emulator {
    /// Create a new emulator with a reset CPU.
    pub fn new() -> Self {
        Emulator { cpu: Cpu::new() }
    }

    /// Load a cartridge and wire the collaborators its flavor needs.
    ///
    /// Diagnostic console output goes to stdout.
    pub fn load_cartridge(&mut self, cartridge: &Cartridge) {
        self.load_cartridge_with_console(cartridge, Box::new(StdoutConsole));
    }

    /// Load a cartridge, sending diagnostic console output to `console`.
    ///
    /// Resets the CPU, copies the image to its load address, sets the
    /// entry point and installs the flavor's collaborator: the BDOS trap
    /// for the diagnostic, the cabinet port device for the arcade ROM.
    pub fn load_cartridge_with_console(
        &mut self,
        cartridge: &Cartridge,
        console: Box<dyn ConsoleInterface>,
    ) {
        self.cpu.reset();

        let load_address = cartridge.get_kind().load_address();
        self.cpu.memory.load(load_address, cartridge.get_data());
        self.cpu.registers.pc = load_address;

        match cartridge.get_kind() {
            RomKind::CpuDiag => self.cpu.set_trap(Box::new(Bdos::new(console))),
            RomKind::Invaders => self.cpu.set_port_device(Box::new(InvadersIo::new())),
        }
    }

    /// One drive-loop iteration: a CPU step, then at most one interrupt.
    ///
    /// Pending interrupt requests alternate by request count parity:
    /// vector 2 (end of screen) on even counts, vector 1 (mid screen)
    /// otherwise.
    pub fn step(&mut self) -> EmulationState {
        match self.cpu.step() {
            Step::Stopped(reason) => return EmulationState::Stopped(reason),
            Step::Continue => {}
        }

        if let Some(count) = self.cpu.pending_irq_count() {
            let vector = if count & 1 == 0 {
                END_OF_SCREEN_IRQ
            } else {
                MID_SCREEN_IRQ
            };

            self.cpu.raise_irq(vector);
            self.cpu.clear_irq();

            if vector == END_OF_SCREEN_IRQ {
                return EmulationState::EndOfFrame;
            }
        }

        EmulationState::Running
    }

    /// Feed one host key event to the port device.
    pub fn key_event(&mut self, key: Key, event: KeyEvent) {
        let stop = self
            .cpu
            .port_device_mut()
            .map_or(false, |device| device.key_event(key, event));

        if stop {
            self.cpu.request_halt();
        }
    }

    /// Run headless until the CPU stops (diagnostic flavor).
    pub fn run_to_halt(&mut self) -> StopReason {
        loop {
            if let EmulationState::Stopped(reason) = self.step() {
                return reason;
            }
        }
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irq_consumption_alternates_by_parity() {
        let mut emulator = Emulator::new();
        // NOPs everywhere; enable interrupts first.
        emulator.cpu.memory.write_byte(0x0000, 0xFB);
        let irq_line = emulator.cpu.irq_line();

        assert_eq!(emulator.step(), EmulationState::Running);
        assert!(emulator.cpu.interrupts_enabled());

        // First request: odd count, mid-screen vector.
        irq_line.raise();
        assert_eq!(emulator.step(), EmulationState::Running);
        assert_eq!(emulator.cpu.registers.pc, 0x0008);
        assert!(!emulator.cpu.interrupts_enabled());

        // Second request: even count, end-of-screen vector.
        emulator.cpu.memory.write_byte(0x0008, 0xFB);
        assert_eq!(emulator.step(), EmulationState::Running);
        irq_line.raise();
        assert_eq!(emulator.step(), EmulationState::EndOfFrame);
        assert_eq!(emulator.cpu.registers.pc, 0x0010);
    }

    #[test]
    fn test_end_of_frame_reported_with_interrupts_disabled() {
        let mut emulator = Emulator::new();
        let irq_line = emulator.cpu.irq_line();

        // Two requests; IE stays clear so neither vectors, but the
        // end-of-frame tick still reaches the host.
        irq_line.raise();
        assert_eq!(emulator.step(), EmulationState::Running);
        irq_line.raise();
        assert_eq!(emulator.step(), EmulationState::EndOfFrame);
        assert_eq!(emulator.cpu.registers.pc, 0x0002);
    }

    #[test]
    fn test_key_event_without_device_is_ignored() {
        let mut emulator = Emulator::new();
        emulator.key_event(Key::Escape, KeyEvent::Pressed);

        assert_eq!(emulator.step(), EmulationState::Running);
    }

    #[test]
    fn test_escape_requests_halt_through_device() {
        let mut emulator = Emulator::new();
        let cartridge =
            Cartridge::load_from_bytes("TEST", &[0x00, 0x00, 0x00, 0xC3, 0x00, 0x00]).unwrap();
        emulator.load_cartridge(&cartridge);

        emulator.key_event(Key::Escape, KeyEvent::Pressed);
        assert_eq!(
            emulator.step(),
            EmulationState::Stopped(StopReason::Halted)
        );
    }

    #[test]
    fn test_diagnostic_cartridge_installs_trap() {
        // A "diagnostic" image that is just JMP 0x0000: the warm-boot trap
        // stops the run on the second step.
        let mut emulator = Emulator::new();
        let cartridge =
            Cartridge::load_from_bytes("DIAG", &[0xC3, 0xAB, 0x01, 0x4D]).unwrap();
        emulator.load_cartridge(&cartridge);

        assert_eq!(emulator.cpu.registers.pc, 0x0100);
        assert_eq!(emulator.cpu.memory.read_byte(0x0100), 0xC3);

        // JMP 0x01AB, then NOPs until something happens; patch the target
        // with JMP 0x0000 to reach the warm-boot address.
        emulator.cpu.memory.load(0x01AB, &[0xC3, 0x00, 0x00]);
        assert_eq!(emulator.run_to_halt(), StopReason::Halted);
        assert_eq!(emulator.cpu.registers.pc, 0x0000);
    }
}

//! End-to-end scenarios: small 8080 programs driven through the emulator.

use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::rc::Rc;

use invaders::bdos::Bdos;
use invaders::cartridge::{Cartridge, RomKind};
use invaders::cpu::StopReason;
use invaders::drivers::ConsoleInterface;
use invaders::emulator::{EmulationState, Emulator};
use invaders::peripherals::InvadersIo;

struct BufferConsole(Rc<RefCell<Vec<u8>>>);

impl ConsoleInterface for BufferConsole {
    fn put_char(&mut self, byte: u8) {
        self.0.borrow_mut().push(byte);
    }
}

/// Build an emulator running `program` at 0x0100 under the BDOS trap, the
/// way the diagnostic ROM runs.
fn diagnostic_emulator(program: &[u8]) -> (Emulator, Rc<RefCell<Vec<u8>>>) {
    let buffer = Rc::new(RefCell::new(Vec::new()));
    let mut emulator = Emulator::new();

    emulator.cpu.memory.load(0x0100, program);
    emulator.cpu.registers.pc = 0x0100;
    emulator
        .cpu
        .set_trap(Box::new(Bdos::new(Box::new(BufferConsole(Rc::clone(
            &buffer,
        ))))));

    (emulator, buffer)
}

#[test]
fn test_diagnostic_hello() {
    // A single RET with SP=0: PC becomes mem[0] | mem[1] << 8 = 0, where
    // the warm-boot trap stops the run.
    let (mut emulator, buffer) = diagnostic_emulator(&[0xC9, 0x00, 0x00]);

    assert_eq!(emulator.run_to_halt(), StopReason::Halted);
    assert_eq!(emulator.cpu.registers.pc, 0x0000);
    assert!(buffer.borrow().is_empty());
}

#[test]
fn test_c_write_prints_one_char() {
    let (mut emulator, buffer) = diagnostic_emulator(&[
        0x0E, 0x02, // MVI C,02 (C_WRITE)
        0x1E, 0x41, // MVI E,'A'
        0xCD, 0x05, 0x00, // CALL 0005
        0xC3, 0x00, 0x00, // JMP 0000
    ]);

    assert_eq!(emulator.run_to_halt(), StopReason::Halted);
    assert_eq!(&*buffer.borrow(), b"A");
}

#[test]
fn test_c_writestr_prints_until_dollar() {
    let (mut emulator, buffer) = diagnostic_emulator(&[
        0x0E, 0x09, // MVI C,09 (C_WRITESTR)
        0x11, 0x00, 0x02, // LXI D,0200
        0xCD, 0x05, 0x00, // CALL 0005
        0xC3, 0x00, 0x00, // JMP 0000
    ]);
    emulator.cpu.memory.load(0x0200, b"Hi$");

    assert_eq!(emulator.run_to_halt(), StopReason::Halted);
    assert_eq!(&*buffer.borrow(), b"Hi");
}

#[test]
fn test_shift_register_program() {
    // OUT 4,0xAB ; OUT 4,0xCD ; OUT 2,4 ; IN 3 -> (0xCDAB >> 4) & 0xFF.
    let mut emulator = Emulator::new();
    emulator.cpu.memory.load(
        0x0000,
        &[
            0x3E, 0xAB, // MVI A,AB
            0xD3, 0x04, // OUT 04
            0x3E, 0xCD, // MVI A,CD
            0xD3, 0x04, // OUT 04
            0x3E, 0x04, // MVI A,04
            0xD3, 0x02, // OUT 02
            0xDB, 0x03, // IN 03
            0x76, // HLT
        ],
    );
    emulator.cpu.set_port_device(Box::new(InvadersIo::new()));

    assert_eq!(emulator.run_to_halt(), StopReason::Halted);
    assert_eq!(emulator.cpu.registers.a, 0xDA);
}

#[test]
fn test_invaders_irq_injection() {
    // EI, then spin on NOPs while the host clock posts requests.
    let mut emulator = Emulator::new();
    emulator.cpu.memory.load(0x0000, &[0xFB, 0x00, 0x00, 0x00]);
    emulator.cpu.registers.sp = 0x2400;
    let irq_line = emulator.cpu.irq_line();

    assert_eq!(emulator.step(), EmulationState::Running); // EI

    // First request: odd count, mid-screen vector 1.
    irq_line.raise();
    assert_eq!(emulator.step(), EmulationState::Running);
    assert_eq!(emulator.cpu.registers.pc, 0x0008);
    assert_eq!(emulator.cpu.registers.sp, 0x23FE);

    // The pushed address points back at the interrupted instruction.
    assert_eq!(emulator.cpu.memory.read_word(0x23FE), 0x0002);

    // Second request: even count, end-of-screen tick. The injection
    // cleared IE, so it does not vector, but the host still gets the
    // redraw signal.
    irq_line.raise();
    assert_eq!(emulator.step(), EmulationState::EndOfFrame);
    assert_eq!(emulator.cpu.registers.sp, 0x23FE);
}

#[test]
fn test_cartridge_round_trip_through_files() {
    use tempdir::TempDir;

    let tmpdir = TempDir::new("test-roms").unwrap();

    let invaders_path = tmpdir.path().join("invaders.rom");
    File::create(&invaders_path)
        .unwrap()
        .write_all(&[0x00, 0x00, 0x00, 0xC3, 0xD4, 0x18])
        .unwrap();

    let diag_path = tmpdir.path().join("cpudiag.com");
    File::create(&diag_path)
        .unwrap()
        .write_all(&[0xC3, 0xAB, 0x01, 0x4D])
        .unwrap();

    let invaders_rom = Cartridge::load_from_path(&invaders_path).unwrap();
    assert_eq!(invaders_rom.get_kind(), RomKind::Invaders);
    assert_eq!(invaders_rom.get_title(), "INVADERS");

    let diag_rom = Cartridge::load_from_path(&diag_path).unwrap();
    assert_eq!(diag_rom.get_kind(), RomKind::CpuDiag);
    assert_eq!(diag_rom.get_kind().load_address(), 0x0100);
}

#[test]
fn test_oversized_image_truncates() {
    let mut data = vec![0x00, 0x00, 0x00, 0xC3];
    data.resize(80 * 1024, 0xEE);
    let cartridge = Cartridge::load_from_bytes("BIG", &data).unwrap();

    let mut emulator = Emulator::new();
    emulator.load_cartridge(&cartridge);

    assert_eq!(emulator.cpu.memory.read_byte(0xFFFF), 0xEE);
    assert_eq!(emulator.cpu.registers.pc, 0x0000);
}

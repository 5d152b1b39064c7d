//! 8080 opcode table.
//!
//! Mnemonics and instruction lengths, used for trace logging and the
//! `disassemble` shell command. Unknown encodings render as `DB` data
//! bytes.

use crate::types::{Addr, Byte};

const REGISTER_NAMES: [&str; 8] = ["B", "C", "D", "E", "H", "L", "M", "A"];
const PAIR_NAMES: [&str; 4] = ["B", "D", "H", "SP"];
const STACK_PAIR_NAMES: [&str; 4] = ["B", "D", "H", "PSW"];
const ALU_NAMES: [&str; 8] = ["ADD", "ADC", "SUB", "SBB", "ANA", "XRA", "ORA", "CMP"];
const ALU_IMMEDIATE_NAMES: [&str; 8] = ["ADI", "ACI", "SUI", "SBI", "ANI", "XRI", "ORI", "CPI"];
const CONDITION_NAMES: [&str; 8] = ["NZ", "Z", "NC", "C", "PO", "PE", "P", "M"];

fn register_name(code: Byte) -> &'static str {
    REGISTER_NAMES[usize::from(code & 0x07)]
}

fn pair_name(opcode: Byte) -> &'static str {
    PAIR_NAMES[usize::from((opcode >> 4) & 0x03)]
}

fn condition_name(opcode: Byte) -> &'static str {
    CONDITION_NAMES[usize::from((opcode >> 3) & 0x07)]
}

/// Instruction length in bytes for an opcode.
pub fn instruction_length(opcode: Byte) -> usize {
    match opcode {
        // LXI rp,d16 / SHLD / LHLD / STA / LDA.
        0x01 | 0x11 | 0x21 | 0x31 | 0x22 | 0x2A | 0x32 | 0x3A => 3,
        // JMP / Jcc / CALL / Ccc.
        0xC3 | 0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => 3,
        0xCD | 0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => 3,
        // MVI r,d8.
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => 2,
        // ALU immediates.
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => 2,
        // IN / OUT.
        0xDB | 0xD3 => 2,
        _ => 1,
    }
}

/// Disassemble one instruction.
///
/// `lo` and `hi` are the bytes following the opcode; they are ignored for
/// one-byte encodings.
pub fn disassemble(opcode: Byte, lo: Byte, hi: Byte) -> String {
    let d16 = Addr::from(lo) | (Addr::from(hi) << 8);

    match opcode {
        0x00 => "NOP".to_string(),
        0x76 => "HLT".to_string(),

        0x01 | 0x11 | 0x21 | 0x31 => format!("LXI {},{:04X}", pair_name(opcode), d16),
        0x02 | 0x12 => format!("STAX {}", pair_name(opcode)),
        0x0A | 0x1A => format!("LDAX {}", pair_name(opcode)),
        0x03 | 0x13 | 0x23 | 0x33 => format!("INX {}", pair_name(opcode)),
        0x0B | 0x1B | 0x2B | 0x3B => format!("DCX {}", pair_name(opcode)),
        0x09 | 0x19 | 0x29 | 0x39 => format!("DAD {}", pair_name(opcode)),

        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            format!("INR {}", register_name(opcode >> 3))
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            format!("DCR {}", register_name(opcode >> 3))
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            format!("MVI {},{:02X}", register_name(opcode >> 3), lo)
        }

        0x07 => "RLC".to_string(),
        0x0F => "RRC".to_string(),
        0x17 => "RAL".to_string(),
        0x1F => "RAR".to_string(),

        0x22 => format!("SHLD {:04X}", d16),
        0x2A => format!("LHLD {:04X}", d16),
        0x32 => format!("STA {:04X}", d16),
        0x3A => format!("LDA {:04X}", d16),

        0x27 => "DAA".to_string(),
        0x2F => "CMA".to_string(),
        0x37 => "STC".to_string(),
        0x3F => "CMC".to_string(),

        0x40..=0x75 | 0x77..=0x7F => format!(
            "MOV {},{}",
            register_name(opcode >> 3),
            register_name(opcode)
        ),
        0x80..=0xBF => format!(
            "{} {}",
            ALU_NAMES[usize::from((opcode >> 3) & 0x07)],
            register_name(opcode)
        ),
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => format!(
            "{} {:02X}",
            ALU_IMMEDIATE_NAMES[usize::from((opcode >> 3) & 0x07)],
            lo
        ),

        0xC3 => format!("JMP {:04X}", d16),
        0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
            format!("J{} {:04X}", condition_name(opcode), d16)
        }
        0xCD => format!("CALL {:04X}", d16),
        0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
            format!("C{} {:04X}", condition_name(opcode), d16)
        }
        0xC9 => "RET".to_string(),
        0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
            format!("R{}", condition_name(opcode))
        }
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            format!("RST {}", (opcode >> 3) & 0x07)
        }

        0xC1 | 0xD1 | 0xE1 | 0xF1 => {
            format!("POP {}", STACK_PAIR_NAMES[usize::from((opcode >> 4) & 0x03)])
        }
        0xC5 | 0xD5 | 0xE5 | 0xF5 => {
            format!("PUSH {}", STACK_PAIR_NAMES[usize::from((opcode >> 4) & 0x03)])
        }

        0xDB => format!("IN {:02X}", lo),
        0xD3 => format!("OUT {:02X}", lo),
        0xE3 => "XTHL".to_string(),
        0xE9 => "PCHL".to_string(),
        0xEB => "XCHG".to_string(),
        0xF9 => "SPHL".to_string(),
        0xF3 => "DI".to_string(),
        0xFB => "EI".to_string(),

        _ => format!("DB {:02X}", opcode),
    }
}

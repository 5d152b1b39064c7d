//! Emulator shell.

use std::path::{Path, PathBuf};
use std::process;

use argh::FromArgs;

use crate::cartridge::{Cartridge, RomKind};
use crate::drivers::winit_driver::WinitWindowDriver;
use crate::drivers::WindowInterface;
use crate::emulator::Emulator;
use crate::errors::EmuResult;

/// 8080 Space Invaders emulator
#[derive(FromArgs)]
pub struct Args {
    /// verbose mode
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    /// subcommand
    #[argh(subcommand)]
    pub nested: SubCommands,
}

/// Subcommands
#[derive(FromArgs)]
#[argh(subcommand)]
pub enum SubCommands {
    /// Run command
    Run(RunCommand),
    /// Disassemble command
    Disassemble(DisassembleCommand),
    /// List command
    List(ListCommand),
    /// Version command
    Version(VersionCommand),
}

/// run a ROM image (flavor auto-detected)
#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
pub struct RunCommand {
    /// ROM path, or ROM name in the roms directory
    #[argh(positional)]
    pub rom: String,
}

/// disassemble a ROM image
#[derive(FromArgs)]
#[argh(subcommand, name = "disassemble")]
pub struct DisassembleCommand {
    /// ROM path, or ROM name in the roms directory
    #[argh(positional)]
    pub rom: String,

    /// output file (omit argument for stdout)
    #[argh(option, short = 'o')]
    pub output: Option<PathBuf>,
}

/// list ROMs from the roms directory
#[derive(FromArgs)]
#[argh(subcommand, name = "list")]
pub struct ListCommand {}

/// show version
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
pub struct VersionCommand {}

/// Start shell.
pub fn start_shell() -> EmuResult {
    let args: Args = argh::from_env();
    parse_args(args)
}

/// Parse arguments.
fn parse_args(args: Args) -> EmuResult {
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match args.nested {
        SubCommands::Version(_) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        SubCommands::List(_) => {
            for name in Cartridge::list_from_roms_directory() {
                println!("{}", name);
            }
        }
        SubCommands::Disassemble(cmd) => {
            let cartridge = load_cartridge_or_exit(&cmd.rom);
            cartridge.write_disassembly_to_file(cmd.output)?;
        }
        SubCommands::Run(cmd) => {
            let cartridge = load_cartridge_or_exit(&cmd.rom);
            info!(
                "loading {} ({:?})...",
                cartridge.get_title(),
                cartridge.get_kind()
            );

            let mut emulator = Emulator::new();
            emulator.load_cartridge(&cartridge);

            match cartridge.get_kind() {
                RomKind::CpuDiag => {
                    let reason = emulator.run_to_halt();
                    debug!("stop reason: {:?}", reason);
                    println!("\n*** 8080 CPU HALTED ***");
                }
                RomKind::Invaders => {
                    let mut driver = WinitWindowDriver::new();
                    if let Err(error) = driver.run_emulator(emulator) {
                        eprintln!("execution error: {}", error);
                        process::exit(1);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Load a cartridge from a path, falling back to a roms-directory lookup.
fn load_cartridge_or_exit(rom: &str) -> Cartridge {
    let handle = if Path::new(rom).exists() {
        Cartridge::load_from_path(rom)
    } else {
        Cartridge::load_from_roms_directory(rom)
    };

    match handle {
        Ok(cartridge) => cartridge,
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    }
}

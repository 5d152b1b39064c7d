//! ROM cartridge handling.

use std::env;
use std::error::Error;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::prelude::*;
use std::io;
use std::path::{Path, PathBuf};

use crate::cpu::opcodes;
use crate::errors::EmuResult;
use crate::types::{Addr, Byte};

/// Magic number of the CP/M CPU diagnostic image (first four bytes,
/// native byte order).
pub const CPUDIAG_MAGIC: u32 = 0x4D01_ABC3;
/// Magic number of the Space Invaders image.
pub const INVADERS_MAGIC: u32 = 0xC300_0000;

const EMPTY_ROM_NAME: &str = "<EMPTY>";

/// Available extensions
///
/// - No extension ("")
/// - ROM extension (.rom/.bin)
/// - CP/M executable (.com)
///
const AVAILABLE_EXTENSIONS: [&str; 4] = ["", "rom", "bin", "com"];

/// ROM flavor, detected from the image head.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RomKind {
    /// CP/M CPU self-test diagnostic.
    CpuDiag,
    /// Space Invaders arcade ROM.
    Invaders,
}

impl RomKind {
    /// Detect the flavor from the first image bytes.
    pub fn detect(data: &[Byte]) -> EmuResult<RomKind> {
        if data.len() < 4 {
            return Err(Box::new(UnknownRomError(None)));
        }

        let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        match magic {
            CPUDIAG_MAGIC => Ok(RomKind::CpuDiag),
            INVADERS_MAGIC => Ok(RomKind::Invaders),
            _ => Err(Box::new(UnknownRomError(Some(magic)))),
        }
    }

    /// Load address, which is also the entry point, of this flavor.
    pub fn load_address(self) -> Addr {
        match self {
            RomKind::CpuDiag => 0x0100,
            RomKind::Invaders => 0x0000,
        }
    }
}

/// Missing ROM error.
#[derive(Debug)]
pub struct MissingRomError(String);

impl Error for MissingRomError {}

impl fmt::Display for MissingRomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ROM image is not found: {}", self.0)
    }
}

/// Unrecognized ROM error.
#[derive(Debug)]
pub struct UnknownRomError(Option<u32>);

impl Error for UnknownRomError {}

impl fmt::Display for UnknownRomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(magic) => write!(f, "unknown ROM magic {:08X}", magic),
            None => write!(f, "ROM image is too short to identify"),
        }
    }
}

/// ROM image with its detected flavor.
pub struct Cartridge {
    title: String,
    path: String,
    kind: RomKind,
    data: Vec<Byte>,
}

impl Cartridge {
    /// Load a cartridge from bytes.
    ///
    /// # Arguments
    ///
    /// * `title` - ROM title.
    /// * `bytes` - Bytes contents.
    ///
    pub fn load_from_bytes(title: &str, bytes: &[Byte]) -> EmuResult<Cartridge> {
        let kind = RomKind::detect(bytes)?;

        Ok(Cartridge {
            title: title.to_string(),
            path: String::new(),
            kind,
            data: bytes.to_vec(),
        })
    }

    /// Load a cartridge from path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to file.
    ///
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> EmuResult<Cartridge> {
        let mut file = File::open(path.as_ref())?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;

        let title = Self::get_rom_name(path.as_ref());
        let mut cartridge = Cartridge::load_from_bytes(&title, &contents)?;
        cartridge.path = path.as_ref().to_string_lossy().into_owned();
        Ok(cartridge)
    }

    /// Load a cartridge by name from the roms directory.
    ///
    /// # Arguments
    ///
    /// * `name` - ROM name.
    ///
    pub fn load_from_roms_directory(name: &str) -> EmuResult<Cartridge> {
        let rom_path = Cartridge::get_rom_path(name)?;
        Cartridge::load_from_path(rom_path)
    }

    /// Get ROM path for a name.
    ///
    /// Automatically tries the known extensions if the name has none.
    ///
    fn get_rom_path(name: &str) -> EmuResult<String> {
        let mut rom_path = Cartridge::get_roms_directory();
        rom_path.push(name);

        for ext in &AVAILABLE_EXTENSIONS {
            rom_path.set_extension(ext);
            debug!("searching for ROM {:?}...", rom_path);

            if rom_path.exists() {
                return Ok(rom_path.to_string_lossy().into_owned());
            }
        }

        Err(Box::new(MissingRomError(name.to_string())))
    }

    /// Get ROM name from path.
    pub fn get_rom_name(path: &Path) -> String {
        match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_uppercase().replace("_", " "),
            None => String::from(EMPTY_ROM_NAME),
        }
    }

    /// Check ROM extension.
    fn check_rom_extension(path: &Path) -> bool {
        if path.to_string_lossy().is_empty() {
            return false;
        }

        match path.extension() {
            Some(ext) => matches!(ext.to_string_lossy().as_ref(), "rom" | "bin" | "com"),
            None => true,
        }
    }

    /// List ROM files from the roms directory.
    pub fn list_from_roms_directory() -> Vec<String> {
        let mut res = vec![];
        let rom_dir = Self::get_roms_directory();

        for entry in walkdir::WalkDir::new(&rom_dir)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let fname = match entry.path().strip_prefix(&rom_dir) {
                Ok(name) => name,
                Err(_) => continue,
            };

            if Self::check_rom_extension(fname) {
                res.push(fname.to_string_lossy().into_owned());
            }
        }

        res
    }

    /// Get roms directory.
    fn get_roms_directory() -> PathBuf {
        let base = match env::var("CARGO_MANIFEST_DIR") {
            Ok(path) => path,
            Err(_) => ".".to_string(),
        };

        Path::new(&base).join("roms")
    }

    /// Get cartridge title.
    pub fn get_title(&self) -> &str {
        &self.title
    }

    /// Get cartridge path.
    pub fn get_path(&self) -> &str {
        &self.path
    }

    /// Get detected ROM flavor.
    pub fn get_kind(&self) -> RomKind {
        self.kind
    }

    /// Get internal data.
    pub fn get_data(&self) -> &[Byte] {
        &self.data
    }

    /// Write a linear disassembly to a stream.
    ///
    /// # Arguments
    ///
    /// * `output_stream` - Output stream.
    ///
    pub fn write_disassembly_to_stream<W: Write>(&self, output_stream: &mut W) -> EmuResult {
        let base = usize::from(self.kind.load_address());
        let mut ptr = 0;

        while ptr < self.data.len() {
            let opcode = self.data[ptr];
            let lo = self.data.get(ptr + 1).copied().unwrap_or(0);
            let hi = self.data.get(ptr + 2).copied().unwrap_or(0);

            writeln!(
                output_stream,
                "{:04X}| ({:02X})  {}",
                base + ptr,
                opcode,
                opcodes::disassemble(opcode, lo, hi)
            )?;

            ptr += opcodes::instruction_length(opcode);
        }

        Ok(())
    }

    /// Write a linear disassembly to a file, or to the console when no
    /// file is given.
    ///
    /// # Arguments
    ///
    /// * `output_file` - Output file.
    ///
    pub fn write_disassembly_to_file(&self, output_file: Option<PathBuf>) -> EmuResult {
        match output_file {
            None => {
                println!("> Disassembly:");
                self.write_disassembly_to_stream(&mut io::stdout())
            }
            Some(path) => {
                println!("> Disassembly dumped to file {}.", path.display());
                let mut file_handle = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(path)?;

                self.write_disassembly_to_stream(&mut file_handle)
            }
        }
    }
}

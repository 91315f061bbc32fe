use std::fmt;
use std::fs;
use std::ops::{Index, IndexMut};
use std::path::Path;

use thiserror::Error;

/// Number of addressable bytes in a Z80 memory or port space.
pub const ADDRESS_SPACE_SIZE: usize = 0x10000;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image file is empty")]
    Empty,
    #[error("image of {len} bytes does not fit in the 64KB address space")]
    TooLarge { len: usize },
}

/// Flat 64KB byte-addressable space.
///
/// The Z80 has two of these: main memory and the I/O port space. Addresses are
/// `u16`, so every access is in range and wraparound happens at the type level.
#[derive(Clone, PartialEq, Eq)]
pub struct AddressSpace {
    bytes: Box<[u8]>,
}

impl AddressSpace {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; ADDRESS_SPACE_SIZE].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, data: u8) {
        self.bytes[addr as usize] = data;
    }

    /// Little-endian 16-bit read; the high byte comes from `addr + 1` (wrapping).
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    pub fn write_word(&mut self, addr: u16, data: u16) {
        let [lo, hi] = data.to_le_bytes();
        self.write(addr, lo);
        self.write(addr.wrapping_add(1), hi);
    }

    /// Copy `data` starting at `addr`. Bytes past 0xFFFF wrap to 0x0000.
    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        if start + data.len() <= ADDRESS_SPACE_SIZE {
            self.bytes[start..start + data.len()].copy_from_slice(data);
        } else {
            for (i, &b) in data.iter().enumerate() {
                self.write(addr.wrapping_add(i as u16), b);
            }
        }
    }

    /// Read a raw binary image from disk and place it at `addr`.
    /// Returns the number of bytes loaded.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P, addr: u16) -> Result<usize, ImageError> {
        let data = fs::read(path)?;
        if data.is_empty() {
            return Err(ImageError::Empty);
        }
        if data.len() > ADDRESS_SPACE_SIZE {
            return Err(ImageError::TooLarge { len: data.len() });
        }
        self.load(addr, &data);
        Ok(data.len())
    }

    pub fn fill(&mut self, value: u8) {
        self.bytes.fill(value);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u16> for AddressSpace {
    type Output = u8;

    fn index(&self, addr: u16) -> &u8 {
        &self.bytes[addr as usize]
    }
}

impl IndexMut<u16> for AddressSpace {
    fn index_mut(&mut self, addr: u16) -> &mut u8 {
        &mut self.bytes[addr as usize]
    }
}

impl fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("AddressSpace")
            .field("size", &self.bytes.len())
            .field("nonzero", &used)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wraps_past_top_of_memory() {
        let mut mem = AddressSpace::new();
        mem.load(0xFFFE, &[1, 2, 3, 4]);
        assert_eq!(mem[0xFFFE], 1);
        assert_eq!(mem[0xFFFF], 2);
        assert_eq!(mem[0x0000], 3);
        assert_eq!(mem[0x0001], 4);
    }

    #[test]
    fn word_access_is_little_endian() {
        let mut mem = AddressSpace::new();
        mem.write_word(0x1234, 0xBEEF);
        assert_eq!(mem[0x1234], 0xEF);
        assert_eq!(mem[0x1235], 0xBE);
        assert_eq!(mem.read_word(0x1234), 0xBEEF);
    }

    #[test]
    fn word_access_wraps() {
        let mut mem = AddressSpace::new();
        mem.write_word(0xFFFF, 0x1122);
        assert_eq!(mem[0xFFFF], 0x22);
        assert_eq!(mem[0x0000], 0x11);
    }

    #[test]
    fn load_file_rejects_empty_image() {
        let path = std::env::temp_dir().join("z80emu_empty_image.bin");
        std::fs::write(&path, b"").unwrap();
        let mut mem = AddressSpace::new();
        let err = mem.load_file(&path, 0).unwrap_err();
        assert!(matches!(err, ImageError::Empty));
        let _ = std::fs::remove_file(&path);
    }
}

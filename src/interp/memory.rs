/// Byte-addressed guest memory as seen by the interpreter.
pub trait Memory {
    fn read_u8(&self, address: u32) -> Option<u8>;

    /// Returns false if `address` is not writable.
    fn write_u8(&mut self, address: u32, value: u8) -> bool;

    /// Little-endian read of `len` bytes (at most 16).
    fn read_le(&self, address: u32, len: u32) -> Option<u128> {
        let mut value = 0u128;
        for i in 0..len {
            let byte = self.read_u8(address.wrapping_add(i))?;
            value |= (byte as u128) << (8 * i);
        }
        Some(value)
    }

    /// Little-endian write of the low `len` bytes of `value`. Returns the
    /// first address that could not be written.
    fn write_le(&mut self, address: u32, len: u32, value: u128) -> Result<(), u32> {
        for i in 0..len {
            let addr = address.wrapping_add(i);
            if !self.write_u8(addr, (value >> (8 * i)) as u8) {
                return Err(addr);
            }
        }
        Ok(())
    }
}

/// A contiguous RAM window starting at `base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatMemory {
    base: u32,
    bytes: Vec<u8>,
}

impl FlatMemory {
    pub fn new(base: u32, size: usize) -> Self {
        Self { base, bytes: vec![0; size] }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn offset(&self, address: u32) -> Option<usize> {
        let offset = address.checked_sub(self.base)? as usize;
        (offset < self.bytes.len()).then_some(offset)
    }

    /// Copy `data` to `address`. Returns false, leaving memory untouched, if
    /// any byte falls outside the window.
    pub fn load(&mut self, address: u32, data: &[u8]) -> bool {
        let Some(start) = self.offset(address) else {
            return false;
        };
        let Some(dst) = self.bytes.get_mut(start..start + data.len()) else {
            return false;
        };
        dst.copy_from_slice(data);
        true
    }

    pub fn read_bytes(&self, address: u32, len: usize) -> Option<Vec<u8>> {
        let start = self.offset(address)?;
        self.bytes.get(start..start + len).map(<[u8]>::to_vec)
    }

    /// Code fetch callback for the translator.
    pub fn code_reader(&self) -> impl Fn(u32) -> Option<u8> + '_ {
        move |address| self.read_u8(address)
    }
}

impl Memory for FlatMemory {
    fn read_u8(&self, address: u32) -> Option<u8> {
        self.offset(address).map(|i| self.bytes[i])
    }

    fn write_u8(&mut self, address: u32, value: u8) -> bool {
        match self.offset(address) {
            Some(i) => {
                self.bytes[i] = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_memory_window() {
        let mut mem = FlatMemory::new(0x1000, 0x10);
        assert!(mem.load(0x1004, &[1, 2, 3, 4]));
        assert_eq!(mem.read_le(0x1004, 4), Some(0x0403_0201));
        assert_eq!(mem.read_u8(0x0FFF), None);
        assert_eq!(mem.read_u8(0x1010), None);
        assert!(!mem.load(0x100E, &[0; 4]));
        assert_eq!(mem.read_bytes(0x100E, 2), Some(vec![0, 0]));
    }

    #[test]
    fn test_write_le_reports_fault_address() {
        let mut mem = FlatMemory::new(0, 4);
        assert_eq!(mem.write_le(2, 4, 0xDDCC_BBAA), Err(4));
        assert_eq!(mem.read_bytes(2, 2), Some(vec![0xAA, 0xBB]));
        assert_eq!(mem.write_le(0, 2, 0x1234), Ok(()));
        assert_eq!(mem.read_le(0, 2), Some(0x1234));
    }
}

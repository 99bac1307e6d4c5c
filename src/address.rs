pub const PAGE_SIZE: u32 = 0x100;
pub const SECTOR_SIZE: u32 = 0x1000;
pub const SECTORS_PER_BLOCK: u32 = 16;
pub const BLOCK_SIZE: u32 = SECTOR_SIZE * SECTORS_PER_BLOCK;

/// Capacity from which the chip needs 4 address bytes (256 Mbit)
pub const FOUR_BYTE_THRESHOLD: u32 = 0x0200_0000;

/// A 256 byte page, indexed from the start of the chip
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Page(pub u32);

/// A 4kB sector, containing 16 pages
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sector(pub u32);

/// A 64kB block, containing 16 sectors
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Block(pub u32);

/// A byte address on the memory chip
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub u32);

// Down conversions divide by the ratio and cannot overflow. Up conversions wrap, indices are
// checked against the geometry before any of them reaches the chip.
impl Page {
    pub const fn to_sector(self) -> Sector {
        Sector(self.0 / (SECTOR_SIZE / PAGE_SIZE))
    }

    pub const fn to_block(self) -> Block {
        Block(self.0 / (BLOCK_SIZE / PAGE_SIZE))
    }

    /// Address of the first byte of the page
    pub const fn start(self) -> Address {
        Address(self.0.wrapping_mul(PAGE_SIZE))
    }
}

impl Sector {
    pub const fn to_block(self) -> Block {
        Block(self.0 / SECTORS_PER_BLOCK)
    }

    /// First page of the sector
    pub const fn to_page(self) -> Page {
        Page(self.0.wrapping_mul(SECTOR_SIZE / PAGE_SIZE))
    }

    pub const fn start(self) -> Address {
        Address(self.0.wrapping_mul(SECTOR_SIZE))
    }
}

impl Block {
    /// First page of the block
    pub const fn to_page(self) -> Page {
        Page(self.0.wrapping_mul(BLOCK_SIZE / PAGE_SIZE))
    }

    /// First sector of the block
    pub const fn to_sector(self) -> Sector {
        Sector(self.0.wrapping_mul(SECTORS_PER_BLOCK))
    }

    pub const fn start(self) -> Address {
        Address(self.0.wrapping_mul(BLOCK_SIZE))
    }
}

impl Address {
    pub const fn page(self) -> Page {
        Page(self.0 / PAGE_SIZE)
    }

    pub const fn sector(self) -> Sector {
        Sector(self.0 / SECTOR_SIZE)
    }

    pub const fn block(self) -> Block {
        Block(self.0 / BLOCK_SIZE)
    }

    /// Offset of the address inside its page
    pub const fn page_offset(self) -> u32 {
        self.0 % PAGE_SIZE
    }
}

impl From<u32> for Page {
    fn from(page_id: u32) -> Page {
        Page(page_id)
    }
}

impl From<u32> for Sector {
    fn from(sector_id: u32) -> Sector {
        Sector(sector_id)
    }
}

impl From<u32> for Block {
    fn from(block_id: u32) -> Block {
        Block(block_id)
    }
}

impl From<u32> for Address {
    fn from(addr: u32) -> Address {
        Address(addr)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> u32 {
        addr.0
    }
}

/// Number of address bytes following an opcode
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddressWidth {
    /// 24 bit address, chips below 256 Mbit
    ThreeByte,
    /// 32 bit address, chips of 256 Mbit and above
    FourByte,
}

impl AddressWidth {
    pub const fn for_capacity(capacity: u32) -> Self {
        if capacity >= FOUR_BYTE_THRESHOLD {
            AddressWidth::FourByte
        } else {
            AddressWidth::ThreeByte
        }
    }

    pub const fn bytes(self) -> usize {
        match self {
            AddressWidth::ThreeByte => 3,
            AddressWidth::FourByte => 4,
        }
    }

    /// Write the address MSB first into `buf`, returning the number of bytes used
    pub fn encode(self, addr: Address, buf: &mut [u8]) -> usize {
        let bytes = addr.0.to_be_bytes();
        match self {
            AddressWidth::ThreeByte => buf[..3].copy_from_slice(&bytes[1..]),
            AddressWidth::FourByte => buf[..4].copy_from_slice(&bytes),
        }
        self.bytes()
    }
}

/// One page-sized piece of a range that may span several pages
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageChunk {
    pub page: Page,
    /// Offset inside `page`
    pub offset: u32,
    pub len: usize,
    /// Position of the chunk in the caller's buffer
    pub buf_start: usize,
}

impl PageChunk {
    pub const fn address(&self) -> Address {
        Address(self.page.0 * PAGE_SIZE + self.offset)
    }

    pub const fn buf_range(&self) -> core::ops::Range<usize> {
        self.buf_start..self.buf_start + self.len
    }
}

/// Splits `len` bytes starting `offset` bytes after the start of `first` into page sized chunks.
///
/// The first chunk starts at `offset % PAGE_SIZE` and runs to the end of its page, every
/// following chunk starts at offset 0. Only the last chunk can be shorter than what is left
/// in its page.
#[derive(Debug, Clone)]
pub struct PageChunks {
    page: u32,
    offset: u32,
    remaining: usize,
    cursor: usize,
}

impl PageChunks {
    pub const fn new(first: Page, offset: u32, len: usize) -> Self {
        Self {
            page: first.0 + offset / PAGE_SIZE,
            offset: offset % PAGE_SIZE,
            remaining: len,
            cursor: 0,
        }
    }

    /// Chunks of the range starting at an absolute address
    pub const fn from_address(addr: Address, len: usize) -> Self {
        Self::new(Page(0), addr.0, len)
    }
}

impl Iterator for PageChunks {
    type Item = PageChunk;

    fn next(&mut self) -> Option<PageChunk> {
        if self.remaining == 0 {
            return None;
        }
        let room = (PAGE_SIZE - self.offset) as usize;
        let len = self.remaining.min(room);
        let chunk = PageChunk {
            page: Page(self.page),
            offset: self.offset,
            len,
            buf_start: self.cursor,
        };
        self.page += 1;
        self.offset = 0;
        self.remaining -= len;
        self.cursor += len;
        Some(chunk)
    }
}

//! Identification of the W25Qxx variants and the geometry derived from them.

use crate::{
    address::{
        Address, AddressWidth, Block, Page, Sector, BLOCK_SIZE, PAGE_SIZE, SECTORS_PER_BLOCK,
        SECTOR_SIZE,
    },
    register::{JedecId, UniqueId},
};

/// The supported members of the family
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Variant {
    W25Q10,
    W25Q20,
    W25Q40,
    W25Q80,
    W25Q16,
    W25Q32,
    W25Q64,
    W25Q128,
    W25Q256,
    W25Q512,
}

/// Device ID (low 16 bits of the JEDEC ID), variant and number of 64kB blocks
const VARIANTS: [(u16, Variant, u32); 10] = [
    (0x4011, Variant::W25Q10, 2),
    (0x4012, Variant::W25Q20, 4),
    (0x4013, Variant::W25Q40, 8),
    (0x4014, Variant::W25Q80, 16),
    (0x4015, Variant::W25Q16, 32),
    (0x4016, Variant::W25Q32, 64),
    (0x4017, Variant::W25Q64, 128),
    (0x4018, Variant::W25Q128, 256),
    (0x4019, Variant::W25Q256, 512),
    (0x401A, Variant::W25Q512, 1024),
];

impl Variant {
    pub const ALL: [Variant; 10] = [
        Variant::W25Q10,
        Variant::W25Q20,
        Variant::W25Q40,
        Variant::W25Q80,
        Variant::W25Q16,
        Variant::W25Q32,
        Variant::W25Q64,
        Variant::W25Q128,
        Variant::W25Q256,
        Variant::W25Q512,
    ];

    /// Look a variant up by the device part of its JEDEC ID, the manufacturer byte is ignored
    pub fn from_jedec(id: JedecId) -> Option<Variant> {
        Self::from_device_id(id.device_id())
    }

    pub fn from_device_id(device_id: u16) -> Option<Variant> {
        VARIANTS
            .iter()
            .find(|(id, _, _)| *id == device_id)
            .map(|(_, variant, _)| *variant)
    }

    pub fn device_id(self) -> u16 {
        self.entry().0
    }

    pub fn block_count(self) -> u32 {
        self.entry().2
    }

    pub fn capacity_mbit(self) -> u32 {
        self.block_count() * BLOCK_SIZE * 8 / (1024 * 1024)
    }

    fn entry(self) -> (u16, Variant, u32) {
        // Every variant has exactly one entry
        VARIANTS[self as usize]
    }
}

/// Layout of the flash array, fixed once the chip has been identified
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub variant: Variant,
    pub page_size: u32,
    pub sector_size: u32,
    pub block_size: u32,
    pub block_count: u32,
    pub sector_count: u32,
    pub page_count: u32,
    pub capacity_kb: u32,
}

impl Geometry {
    pub fn new(variant: Variant) -> Self {
        let block_count = variant.block_count();
        let sector_count = block_count * SECTORS_PER_BLOCK;
        Self {
            variant,
            page_size: PAGE_SIZE,
            sector_size: SECTOR_SIZE,
            block_size: SECTOR_SIZE * SECTORS_PER_BLOCK,
            block_count,
            sector_count,
            page_count: sector_count * SECTOR_SIZE / PAGE_SIZE,
            capacity_kb: sector_count * SECTOR_SIZE / 1024,
        }
    }

    /// Capacity in bytes
    pub const fn capacity(&self) -> u32 {
        self.sector_count * self.sector_size
    }

    pub const fn address_width(&self) -> AddressWidth {
        AddressWidth::for_capacity(self.capacity())
    }

    pub const fn contains(&self, addr: Address) -> bool {
        addr.0 < self.capacity()
    }

    pub const fn contains_page(&self, page: Page) -> bool {
        page.0 < self.page_count
    }

    pub const fn contains_sector(&self, sector: Sector) -> bool {
        sector.0 < self.sector_count
    }

    pub const fn contains_block(&self, block: Block) -> bool {
        block.0 < self.block_count
    }
}

/// Everything learned about the chip during initialisation
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceState {
    pub jedec_id: JedecId,
    pub geometry: Geometry,
    pub unique_id: UniqueId,
    /// Last values read from or written to status registers 1, 2 and 3
    pub status: [u8; 3],
}

use bit::BitIndex;

/// Manufacturer, memory type and capacity bytes returned by the JEDEC ID instruction
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JedecId {
    pub manufacturer: u8,
    pub memory_type: u8,
    pub capacity: u8,
}

impl JedecId {
    pub const WINBOND: u8 = 0xEF;

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            manufacturer: bytes[0],
            memory_type: bytes[1],
            capacity: bytes[2],
        }
    }

    /// The 24 bit ID, manufacturer in the top byte
    pub const fn raw(&self) -> u32 {
        (self.manufacturer as u32) << 16 | (self.memory_type as u32) << 8 | self.capacity as u32
    }

    /// Memory type and capacity, the part used to tell the variants apart
    pub const fn device_id(&self) -> u16 {
        (self.memory_type as u16) << 8 | self.capacity as u16
    }
}

/// Factory programmed 64 bit unique ID
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UniqueId(pub [u8; 8]);

impl UniqueId {
    pub const fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

/// Selects one of the three status registers
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRegisterId {
    Status1,
    Status2,
    Status3,
}

impl StatusRegisterId {
    pub(crate) const fn index(self) -> usize {
        match self {
            StatusRegisterId::Status1 => 0,
            StatusRegisterId::Status2 => 1,
            StatusRegisterId::Status3 => 2,
        }
    }
}

impl TryFrom<u8> for StatusRegisterId {
    type Error = ();

    fn try_from(val: u8) -> Result<Self, ()> {
        match val {
            1 => Ok(StatusRegisterId::Status1),
            2 => Ok(StatusRegisterId::Status2),
            3 => Ok(StatusRegisterId::Status3),
            _ => Err(()),
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister1 {
    pub status_register_protect: bool,
    pub sector_protect: bool,
    pub top_bottom_protect: bool,
    pub block_protect: u8,
    pub write_enable_latch: bool,
    pub busy: bool,
}

impl From<u8> for StatusRegister1 {
    fn from(val: u8) -> StatusRegister1 {
        StatusRegister1 {
            status_register_protect: val.bit(7),
            sector_protect: val.bit(6),
            top_bottom_protect: val.bit(5),
            block_protect: val.bit_range(2..5),
            write_enable_latch: val.bit(1),
            busy: val.bit(0),
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister2 {
    pub suspend: bool,
    pub complement_protect: bool,
    pub security_register_lock: u8,
    pub quad_enable: bool,
    pub status_register_lock: bool,
}

impl From<u8> for StatusRegister2 {
    fn from(val: u8) -> StatusRegister2 {
        StatusRegister2 {
            suspend: val.bit(7),
            complement_protect: val.bit(6),
            security_register_lock: val.bit_range(3..6),
            quad_enable: val.bit(1),
            status_register_lock: val.bit(0),
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister3 {
    pub output_driver_strength: u8,
    pub write_protect_selection: bool,
    /// Power-up address mode, only on 256 Mbit and larger parts
    pub power_up_four_byte: bool,
    /// Current address mode, only on 256 Mbit and larger parts
    pub four_byte_mode: bool,
}

impl From<u8> for StatusRegister3 {
    fn from(val: u8) -> StatusRegister3 {
        StatusRegister3 {
            output_driver_strength: val.bit_range(5..7),
            write_protect_selection: val.bit(2),
            power_up_four_byte: val.bit(1),
            four_byte_mode: val.bit(0),
        }
    }
}

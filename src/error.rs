use crate::register::JedecId;

/// All possible errors emitted by the driver
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<SpiError> {
    /// Internal Spi error. Chip select has been released
    Spi(SpiError),

    /// The JEDEC ID read at init is not a known W25Qxx
    UnrecognizedDevice(JedecId),

    /// No successful [`crate::blocking::W25qxx::init`] yet
    NotInitialized,

    /// Invalid value passed
    Value,

    /// Address out of bound
    OutOfBounds,

    /// Address not aligned
    NotAligned,

    /// Offset at or past the end of the page/sector/block,
    /// see [`crate::config::RangePolicy::Strict`]
    OffsetOutOfRange,

    /// Length does not fit in the page/sector/block, see [`crate::config::RangePolicy::Strict`]
    RangeClamped { requested: usize, available: usize },

    /// The chip stayed busy past the poll timeout
    Timeout,
}

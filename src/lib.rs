#![cfg_attr(not(test), no_std)]
//! This is a platform agnostic library for the Winbond W25Qxx SPI NOR flash series using
//! [embedded-hal](https://github.com/rust-embedded/embedded-hal).
//!
//! The chip is identified at runtime from its JEDEC ID, supported chips are:
//! * W25Q10, W25Q20, W25Q40, W25Q80
//! * W25Q16, W25Q32, W25Q64, W25Q128
//! * W25Q256, W25Q512 (framed with 4 address bytes)
//!
//! The driver offers byte, page, sector and block granular reads, writes, erases and
//! emptiness checks on top of any [`embedded_hal::spi::SpiDevice`], and implements the
//! [`embedded_storage::nor_flash`] traits.

pub mod address;
pub mod blocking;
pub mod chip;
mod command;
pub mod config;
pub mod error;
pub mod register;

pub use address::{Address, Block, Page, Sector, BLOCK_SIZE, PAGE_SIZE, SECTOR_SIZE};
pub use blocking::W25qxx;
pub use chip::{Geometry, Variant};
pub use config::{Config, RangePolicy};
pub use error::Error;

/// A monotonic millisecond clock counting from power up
pub trait Monotonic {
    fn now_ms(&mut self) -> u64;
}

impl<F> Monotonic for F
where
    F: FnMut() -> u64,
{
    fn now_ms(&mut self) -> u64 {
        self()
    }
}

/// Number of bytes of a `len` bytes access at `offset` that fit in a container of `size` bytes
pub(crate) fn fit_in_container<E>(
    size: u32,
    offset: u32,
    len: usize,
    policy: RangePolicy,
) -> Result<usize, Error<E>> {
    if offset >= size {
        return match policy {
            RangePolicy::Clamp => Ok(0),
            RangePolicy::Strict => Err(Error::OffsetOutOfRange),
        };
    }
    let available = (size - offset) as usize;
    if len <= available {
        return Ok(len);
    }
    match policy {
        RangePolicy::Clamp => Ok(available),
        RangePolicy::Strict => Err(Error::RangeClamped {
            requested: len,
            available,
        }),
    }
}

pub(crate) fn check_range<E>(capacity: u32, addr: Address, length: usize) -> Result<(), Error<E>> {
    let length = u32::try_from(length).map_err(|_| Error::OutOfBounds)?;
    if length > capacity || addr.0 > capacity - length {
        return Err(Error::OutOfBounds);
    }
    Ok(())
}

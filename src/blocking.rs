use crate::{
    address::{
        Address, AddressWidth, Block, Page, PageChunks, Sector, BLOCK_SIZE, PAGE_SIZE, SECTOR_SIZE,
    },
    check_range,
    chip::{DeviceState, Geometry, Variant},
    command::Command,
    config::{Config, RangePolicy},
    error::Error,
    fit_in_container,
    register::*,
    Monotonic,
};
use embedded_hal::{
    delay::DelayNs,
    spi::{Operation, SpiDevice},
};

/// Size of the fast reads used when checking that a range is erased
const SCAN_CHUNK: usize = 32;
const ERASED: u8 = 0xFF;

/// The low level W25Qxx driver, raw command sequences without range checks
struct W25qxxLowLevel<SPI, D, C> {
    spi: SPI,
    delay: D,
    clock: C,
    config: Config,
    state: Option<DeviceState>,
}

impl<SPI, D, C, E> W25qxxLowLevel<SPI, D, C>
where
    SPI: SpiDevice<Error = E>,
    D: DelayNs,
    C: Monotonic,
{
    fn geometry(&self) -> Result<Geometry, Error<E>> {
        self.state
            .as_ref()
            .map(|state| state.geometry)
            .ok_or(Error::NotInitialized)
    }

    fn address_width(&self) -> AddressWidth {
        match &self.state {
            Some(state) => state.geometry.address_width(),
            None => AddressWidth::ThreeByte,
        }
    }

    /// Opcode followed by the address, returns the frame length
    fn frame(&self, cmd: Command, addr: Address, frame: &mut [u8; 6]) -> usize {
        frame[0] = cmd as u8;
        1 + self.address_width().encode(addr, &mut frame[1..])
    }

    fn command_write(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        self.spi.write(bytes).map_err(Error::Spi)
    }

    fn command_transfer(&mut self, bytes: &mut [u8]) -> Result<(), Error<E>> {
        self.spi.transfer_in_place(bytes).map_err(Error::Spi)
    }

    fn addr_command(&mut self, cmd: Command, addr: Address) -> Result<(), Error<E>> {
        let mut frame = [0; 6];
        let len = self.frame(cmd, addr, &mut frame);
        self.command_write(&frame[..len])
    }

    fn read_fast(&mut self, addr: Address, buff: &mut [u8]) -> Result<(), Error<E>> {
        let mut frame = [0; 6];
        let mut len = self.frame(Command::FastRead, addr, &mut frame);
        frame[len] = Command::Dummy as u8;
        len += 1;
        self.spi
            .transaction(&mut [
                Operation::Write(&frame[..len]),
                Operation::Read(buff),
            ])
            .map_err(Error::Spi)
    }

    fn page_program(&mut self, addr: Address, buff: &[u8]) -> Result<(), Error<E>> {
        let mut frame = [0; 6];
        let len = self.frame(Command::PageProgram, addr, &mut frame);
        self.spi
            .transaction(&mut [
                Operation::Write(&frame[..len]),
                Operation::Write(buff),
            ])
            .map_err(Error::Spi)
    }

    fn write_enable(&mut self) -> Result<(), Error<E>> {
        self.command_write(&[Command::WriteEnable as u8])
    }

    fn write_disable(&mut self) -> Result<(), Error<E>> {
        self.command_write(&[Command::WriteDisable as u8])
    }

    fn read_jedec_id(&mut self) -> Result<JedecId, Error<E>> {
        let mut command = [Command::JedecId as u8, 0, 0, 0];
        self.command_transfer(&mut command)?;
        Ok(JedecId::from_bytes([command[1], command[2], command[3]]))
    }

    fn read_unique_id(&mut self) -> Result<UniqueId, Error<E>> {
        // Opcode, 4 dummy bytes, 8 id bytes
        let mut command = [0u8; 13];
        command[0] = Command::UniqueId as u8;
        self.command_transfer(&mut command)?;
        let mut id = [0u8; 8];
        id.copy_from_slice(&command[5..]);
        let id = UniqueId(id);
        if let Some(state) = self.state.as_mut() {
            state.unique_id = id;
        }
        Ok(id)
    }

    fn read_status_uncached(&mut self, id: StatusRegisterId) -> Result<u8, Error<E>> {
        let cmd = match id {
            StatusRegisterId::Status1 => Command::ReadStatus1,
            StatusRegisterId::Status2 => Command::ReadStatus2,
            StatusRegisterId::Status3 => Command::ReadStatus3,
        };
        let mut command = [cmd as u8, 0];
        self.command_transfer(&mut command)?;
        Ok(command[1])
    }

    fn read_status(&mut self, id: StatusRegisterId) -> Result<u8, Error<E>> {
        let value = self.read_status_uncached(id)?;
        if let Some(state) = self.state.as_mut() {
            state.status[id.index()] = value;
        }
        Ok(value)
    }

    fn write_status(&mut self, id: StatusRegisterId, value: u8) -> Result<(), Error<E>> {
        let cmd = match id {
            StatusRegisterId::Status1 => Command::WriteStatus1,
            StatusRegisterId::Status2 => Command::WriteStatus2,
            StatusRegisterId::Status3 => Command::WriteStatus3,
        };
        self.wait_for_write_end()?;
        self.write_enable()?;
        self.command_write(&[cmd as u8, value])?;
        if let Some(state) = self.state.as_mut() {
            state.status[id.index()] = value;
        }
        self.wait_for_write_end()
    }

    /// Poll the busy bit until the chip is done with the current program/erase
    fn wait_for_write_end(&mut self) -> Result<(), Error<E>> {
        let start = self.clock.now_ms();
        loop {
            let status: StatusRegister1 = self.read_status(StatusRegisterId::Status1)?.into();
            if !status.busy {
                return Ok(());
            }
            if let Some(timeout) = self.config.poll_timeout_ms {
                if self.clock.now_ms().saturating_sub(start) >= u64::from(timeout) {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("w25qxx still busy after {=u32} ms", timeout);
                    return Err(Error::Timeout);
                }
            }
            self.delay.delay_ms(self.config.poll_interval_ms);
        }
    }

    fn init(&mut self) -> Result<Geometry, Error<E>> {
        while self.clock.now_ms() < u64::from(self.config.startup_delay_ms) {
            self.delay.delay_ms(1);
        }
        self.delay.delay_ms(self.config.power_up_delay_ms);
        self.state = None;

        #[cfg(feature = "defmt")]
        defmt::info!("w25qxx init begin");
        let jedec_id = self.read_jedec_id()?;
        #[cfg(feature = "defmt")]
        defmt::info!("w25qxx ID: {=u32:#x}", jedec_id.raw());

        let Some(variant) = Variant::from_jedec(jedec_id) else {
            #[cfg(feature = "defmt")]
            defmt::error!("w25qxx unknown ID {=u32:#x}", jedec_id.raw());
            return Err(Error::UnrecognizedDevice(jedec_id));
        };
        let geometry = Geometry::new(variant);

        let unique_id = self.read_unique_id()?;
        let status = [
            self.read_status_uncached(StatusRegisterId::Status1)?,
            self.read_status_uncached(StatusRegisterId::Status2)?,
            self.read_status_uncached(StatusRegisterId::Status3)?,
        ];
        self.state = Some(DeviceState {
            jedec_id,
            geometry,
            unique_id,
            status,
        });

        #[cfg(feature = "defmt")]
        defmt::info!("w25qxx init done: {}", geometry);
        Ok(geometry)
    }

    /// Program up to a page. `buff` must not cross a page boundary
    fn program(&mut self, addr: Address, buff: &[u8]) -> Result<(), Error<E>> {
        self.wait_for_write_end()?;
        self.write_enable()?;
        self.page_program(addr, buff)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("Write to {=u32} len {=usize}", addr.0, buff.len());
        self.wait_for_write_end()
    }

    /// Write into a container of `size` bytes starting at `first`, one page at a time
    fn write_container(
        &mut self,
        first: Page,
        size: u32,
        offset: u32,
        buff: &[u8],
    ) -> Result<usize, Error<E>> {
        let len = fit_in_container(size, offset, buff.len(), self.config.range_policy)?;
        for chunk in PageChunks::new(first, offset, len) {
            self.program(chunk.address(), &buff[chunk.buf_range()])?;
        }
        Ok(len)
    }

    fn write_bytes(&mut self, addr: Address, buff: &[u8]) -> Result<(), Error<E>> {
        check_range(self.geometry()?.capacity(), addr, buff.len())?;
        for chunk in PageChunks::from_address(addr, buff.len()) {
            self.program(chunk.address(), &buff[chunk.buf_range()])?;
        }
        Ok(())
    }

    fn erase(&mut self, cmd: Command, addr: Address) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        let start = self.clock.now_ms();
        self.wait_for_write_end()?;
        self.write_enable()?;
        self.addr_command(cmd, addr)?;
        self.wait_for_write_end()?;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Erase at {=u32} done after {=u64} ms",
            addr.0,
            self.clock.now_ms().saturating_sub(start)
        );
        Ok(())
    }

    fn erase_chip(&mut self) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        let start = self.clock.now_ms();
        #[cfg(feature = "defmt")]
        defmt::info!("w25qxx chip erase begin");
        self.wait_for_write_end()?;
        self.write_enable()?;
        self.command_write(&[Command::ChipErase as u8])?;
        self.wait_for_write_end()?;
        #[cfg(feature = "defmt")]
        defmt::info!(
            "w25qxx chip erase done after {=u64} ms",
            self.clock.now_ms().saturating_sub(start)
        );
        Ok(())
    }

    /// Erase `[from, to)`, with 64kB block erases wherever the range allows it
    fn erase_range(&mut self, from: u32, to: u32) -> Result<(), Error<E>> {
        let mut cursor = from;
        while cursor < to {
            if cursor % BLOCK_SIZE == 0 && to - cursor >= BLOCK_SIZE {
                self.erase(Command::BlockErase, Address(cursor))?;
                cursor += BLOCK_SIZE;
            } else {
                self.erase(Command::SectorErase, Address(cursor))?;
                cursor += SECTOR_SIZE;
            }
        }
        Ok(())
    }

    fn read_container(
        &mut self,
        first: Page,
        size: u32,
        offset: u32,
        buff: &mut [u8],
    ) -> Result<usize, Error<E>> {
        let len = fit_in_container(size, offset, buff.len(), self.config.range_policy)?;
        for chunk in PageChunks::new(first, offset, len) {
            self.read_fast(chunk.address(), &mut buff[chunk.buf_range()])?;
        }
        Ok(len)
    }

    /// Check that `len` bytes at `offset` in a container of `size` bytes read as erased.
    /// A `len` of 0, or one running past the container, checks up to the container end.
    fn scan_container(
        &mut self,
        first: Page,
        size: u32,
        offset: u32,
        len: u32,
    ) -> Result<bool, Error<E>> {
        if offset >= size {
            return match self.config.range_policy {
                RangePolicy::Clamp => Ok(true),
                RangePolicy::Strict => Err(Error::OffsetOutOfRange),
            };
        }
        let available = size - offset;
        let len = if len == 0 || len > available {
            available
        } else {
            len
        };

        let mut addr = first.start().0 + offset;
        let end = addr + len;
        let mut chunk = [0u8; SCAN_CHUNK];
        while end - addr >= SCAN_CHUNK as u32 {
            self.read_fast(Address(addr), &mut chunk)?;
            if chunk.iter().any(|&b| b != ERASED) {
                #[cfg(feature = "defmt")]
                defmt::debug!("Not empty around {=u32}", addr);
                return Ok(false);
            }
            addr += SCAN_CHUNK as u32;
        }
        let mut byte = [0u8];
        while addr < end {
            self.read_fast(Address(addr), &mut byte)?;
            if byte[0] != ERASED {
                #[cfg(feature = "defmt")]
                defmt::debug!("Not empty at {=u32}", addr);
                return Ok(false);
            }
            addr += 1;
        }
        Ok(true)
    }
}

/// The W25Qxx driver.
///
/// Operations take `&mut self`, so the borrow checker serializes every access to the chip: an
/// operation owns the bus from the wait on a previous program/erase to its own completion poll.
/// Callers sharing the driver across execution contexts wrap it in their own mutex.
pub struct W25qxx<SPI, D, C> {
    w25qxx_ll: W25qxxLowLevel<SPI, D, C>,
}

impl<SPI, D, C, E> W25qxx<SPI, D, C>
where
    SPI: SpiDevice<Error = E>,
    D: DelayNs,
    C: Monotonic,
{
    /// Create a new instance with the default [`Config`].
    /// The chip must be identified with [`Self::init`] before use.
    pub fn new(spi: SPI, delay: D, clock: C) -> Self {
        Self::with_config(spi, delay, clock, Config::default())
    }

    pub fn with_config(spi: SPI, delay: D, clock: C, config: Config) -> Self {
        Self {
            w25qxx_ll: W25qxxLowLevel {
                spi,
                delay,
                clock,
                config,
                state: None,
            },
        }
    }

    /// Give back the bus, delay and clock
    pub fn release(self) -> (SPI, D, C) {
        let ll = self.w25qxx_ll;
        (ll.spi, ll.delay, ll.clock)
    }

    pub fn config(&self) -> &Config {
        &self.w25qxx_ll.config
    }

    /// Identify the chip and read its unique ID and status registers.
    ///
    /// Waits until the clock reads at least [`Config::startup_delay_ms`] first. On an unknown ID
    /// the driver stays uninitialized and every array operation returns
    /// [`Error::NotInitialized`].
    pub fn init(&mut self) -> Result<Geometry, Error<E>> {
        self.w25qxx_ll.init()
    }

    /// The geometry found by [`Self::init`]
    pub fn geometry(&self) -> Option<Geometry> {
        self.state().map(|state| state.geometry)
    }

    pub fn state(&self) -> Option<&DeviceState> {
        self.w25qxx_ll.state.as_ref()
    }

    pub fn variant(&self) -> Option<Variant> {
        self.geometry().map(|geometry| geometry.variant)
    }

    pub fn unique_id(&self) -> Option<UniqueId> {
        self.state().map(|state| state.unique_id)
    }

    /// Status register 1 as last seen by the driver
    pub fn status1(&self) -> Option<StatusRegister1> {
        self.state().map(|state| state.status[0].into())
    }

    /// Status register 2 as last seen by the driver
    pub fn status2(&self) -> Option<StatusRegister2> {
        self.state().map(|state| state.status[1].into())
    }

    /// Status register 3 as last seen by the driver
    pub fn status3(&self) -> Option<StatusRegister3> {
        self.state().map(|state| state.status[2].into())
    }

    /// Read the identification of the device
    pub fn read_jedec_id(&mut self) -> Result<JedecId, Error<E>> {
        self.w25qxx_ll.read_jedec_id()
    }

    /// Read the factory unique ID, refreshing the copy kept since [`Self::init`]
    pub fn read_unique_id(&mut self) -> Result<UniqueId, Error<E>> {
        self.w25qxx_ll.read_unique_id()
    }

    /// Read a status register, `register` is 1, 2 or 3
    pub fn read_status_register(&mut self, register: u8) -> Result<u8, Error<E>> {
        let id = StatusRegisterId::try_from(register).map_err(|_| Error::Value)?;
        self.w25qxx_ll.read_status(id)
    }

    /// Write a status register, `register` is 1, 2 or 3. Write enable is handled internally
    pub fn write_status_register(&mut self, register: u8, value: u8) -> Result<(), Error<E>> {
        let id = StatusRegisterId::try_from(register).map_err(|_| Error::Value)?;
        self.w25qxx_ll.write_status(id, value)
    }

    /// Enable write operation, though you shouldn't need this function since it's already
    /// handled in the write/erase operations.
    pub fn write_enable(&mut self) -> Result<(), Error<E>> {
        self.w25qxx_ll.write_enable()
    }

    /// Disable write
    pub fn write_disable(&mut self) -> Result<(), Error<E>> {
        self.w25qxx_ll.write_disable()
    }

    /// Block until the chip has finished its current program/erase
    pub fn wait_for_write_end(&mut self) -> Result<(), Error<E>> {
        self.w25qxx_ll.wait_for_write_end()
    }

    /// Program a single byte
    pub fn write_byte(&mut self, value: u8, addr: Address) -> Result<(), Error<E>> {
        let ll = &mut self.w25qxx_ll;
        check_range(ll.geometry()?.capacity(), addr, 1)?;
        ll.program(addr, &[value])
    }

    /// Program `buff` at `offset` in `page`.
    ///
    /// Returns the number of bytes written, which is less than `buff.len()` when the data runs
    /// past the end of the page and the range policy is [`RangePolicy::Clamp`].
    pub fn write_page(&mut self, buff: &[u8], page: Page, offset: u32) -> Result<usize, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_page(page) {
            return Err(Error::OutOfBounds);
        }
        ll.write_container(page, PAGE_SIZE, offset, buff)
    }

    /// Program `buff` at `offset` in `sector`, page by page. Returns the number of bytes written
    pub fn write_sector(
        &mut self,
        buff: &[u8],
        sector: Sector,
        offset: u32,
    ) -> Result<usize, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_sector(sector) {
            return Err(Error::OutOfBounds);
        }
        ll.write_container(sector.to_page(), SECTOR_SIZE, offset, buff)
    }

    /// Program `buff` at `offset` in `block`, page by page. Returns the number of bytes written
    pub fn write_block(
        &mut self,
        buff: &[u8],
        block: Block,
        offset: u32,
    ) -> Result<usize, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_block(block) {
            return Err(Error::OutOfBounds);
        }
        ll.write_container(block.to_page(), BLOCK_SIZE, offset, buff)
    }

    /// Program `buff` at any address, split on page boundaries
    pub fn write_bytes(&mut self, addr: Address, buff: &[u8]) -> Result<(), Error<E>> {
        self.w25qxx_ll.write_bytes(addr, buff)
    }

    /// Erase a 4kB sector
    pub fn erase_sector(&mut self, sector: Sector) -> Result<(), Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_sector(sector) {
            return Err(Error::OutOfBounds);
        }
        ll.erase(Command::SectorErase, sector.start())
    }

    /// Erase a 64kB block
    pub fn erase_block(&mut self, block: Block) -> Result<(), Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_block(block) {
            return Err(Error::OutOfBounds);
        }
        ll.erase(Command::BlockErase, block.start())
    }

    /// Erase the whole chip, this can take tens of seconds
    pub fn erase_chip(&mut self) -> Result<(), Error<E>> {
        self.w25qxx_ll.geometry()?;
        self.w25qxx_ll.erase_chip()
    }

    /// Erase the sector aligned range `[from, to)`
    pub fn erase_range(&mut self, from: Address, to: Address) -> Result<(), Error<E>> {
        let capacity = self.w25qxx_ll.geometry()?.capacity();
        if from > to || to.0 > capacity {
            return Err(Error::OutOfBounds);
        }
        if from.0 % SECTOR_SIZE != 0 || to.0 % SECTOR_SIZE != 0 {
            return Err(Error::NotAligned);
        }
        self.w25qxx_ll.erase_range(from.0, to.0)
    }

    pub fn read_byte(&mut self, addr: Address) -> Result<u8, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        check_range(ll.geometry()?.capacity(), addr, 1)?;
        let mut buff = [0u8];
        ll.read_fast(addr, &mut buff)?;
        Ok(buff[0])
    }

    /// Read n bytes quickly from an address
    pub fn read_bytes(&mut self, addr: Address, buff: &mut [u8]) -> Result<(), Error<E>> {
        let ll = &mut self.w25qxx_ll;
        check_range(ll.geometry()?.capacity(), addr, buff.len())?;
        if buff.is_empty() {
            return Ok(());
        }
        ll.read_fast(addr, buff)
    }

    /// Read into `buff` from `offset` in `page`. Returns the number of bytes read
    pub fn read_page(
        &mut self,
        buff: &mut [u8],
        page: Page,
        offset: u32,
    ) -> Result<usize, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_page(page) {
            return Err(Error::OutOfBounds);
        }
        ll.read_container(page, PAGE_SIZE, offset, buff)
    }

    /// Read into `buff` from `offset` in `sector`, page by page. Returns the number of bytes read
    pub fn read_sector(
        &mut self,
        buff: &mut [u8],
        sector: Sector,
        offset: u32,
    ) -> Result<usize, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_sector(sector) {
            return Err(Error::OutOfBounds);
        }
        ll.read_container(sector.to_page(), SECTOR_SIZE, offset, buff)
    }

    /// Read into `buff` from `offset` in `block`, page by page. Returns the number of bytes read
    pub fn read_block(
        &mut self,
        buff: &mut [u8],
        block: Block,
        offset: u32,
    ) -> Result<usize, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_block(block) {
            return Err(Error::OutOfBounds);
        }
        ll.read_container(block.to_page(), BLOCK_SIZE, offset, buff)
    }

    /// Whether `len` bytes from `offset` in `page` are erased.
    /// A `len` of 0 checks up to the end of the page
    pub fn is_empty_page(&mut self, page: Page, offset: u32, len: u32) -> Result<bool, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_page(page) {
            return Err(Error::OutOfBounds);
        }
        ll.scan_container(page, PAGE_SIZE, offset, len)
    }

    /// Whether `len` bytes from `offset` in `sector` are erased.
    /// A `len` of 0 checks up to the end of the sector
    pub fn is_empty_sector(
        &mut self,
        sector: Sector,
        offset: u32,
        len: u32,
    ) -> Result<bool, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_sector(sector) {
            return Err(Error::OutOfBounds);
        }
        ll.scan_container(sector.to_page(), SECTOR_SIZE, offset, len)
    }

    /// Whether `len` bytes from `offset` in `block` are erased.
    /// A `len` of 0 checks up to the end of the block
    pub fn is_empty_block(
        &mut self,
        block: Block,
        offset: u32,
        len: u32,
    ) -> Result<bool, Error<E>> {
        let ll = &mut self.w25qxx_ll;
        if !ll.geometry()?.contains_block(block) {
            return Err(Error::OutOfBounds);
        }
        ll.scan_container(block.to_page(), BLOCK_SIZE, offset, len)
    }
}

/// Implementation of the `NorFlash` traits of the `embedded_storage` crate.
/// The chip must have been initialized, an uninitialized driver reports a capacity of 0.
mod es {
    use super::*;
    use core::fmt::Debug;
    use embedded_storage::nor_flash::{
        check_erase, check_read, check_write, ErrorType, MultiwriteNorFlash, NorFlash,
        NorFlashError, NorFlashErrorKind, ReadNorFlash,
    };

    impl<E> From<NorFlashErrorKind> for Error<E> {
        fn from(e: NorFlashErrorKind) -> Self {
            match e {
                NorFlashErrorKind::NotAligned => Error::NotAligned,
                NorFlashErrorKind::OutOfBounds => Error::OutOfBounds,
                _ => Error::Value,
            }
        }
    }

    impl<SpiError> NorFlashError for Error<SpiError>
    where
        SpiError: Debug,
    {
        fn kind(&self) -> NorFlashErrorKind {
            match self {
                Error::OutOfBounds | Error::OffsetOutOfRange | Error::RangeClamped { .. } => {
                    NorFlashErrorKind::OutOfBounds
                }
                Error::NotAligned => NorFlashErrorKind::NotAligned,
                _ => NorFlashErrorKind::Other,
            }
        }
    }

    impl<SPI, D, C, E> ErrorType for W25qxx<SPI, D, C>
    where
        SPI: SpiDevice<Error = E>,
        E: Debug,
    {
        type Error = Error<E>;
    }

    impl<SPI, D, C, E> ReadNorFlash for W25qxx<SPI, D, C>
    where
        SPI: SpiDevice<Error = E>,
        E: Debug,
        D: DelayNs,
        C: Monotonic,
    {
        const READ_SIZE: usize = 1;

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            check_read(self, offset, bytes.len())?;
            self.read_bytes(Address(offset), bytes)
        }

        fn capacity(&self) -> usize {
            self.geometry()
                .map_or(0, |geometry| geometry.capacity() as usize)
        }
    }

    impl<SPI, D, C, E> NorFlash for W25qxx<SPI, D, C>
    where
        SPI: SpiDevice<Error = E>,
        E: Debug,
        D: DelayNs,
        C: Monotonic,
    {
        const WRITE_SIZE: usize = 1;
        const ERASE_SIZE: usize = SECTOR_SIZE as usize;

        fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
            check_erase(self, from, to)?;
            self.erase_range(Address(from), Address(to))
        }

        fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            check_write(self, offset, bytes.len())?;
            self.write_bytes(Address(offset), bytes)
        }
    }

    impl<SPI, D, C, E> MultiwriteNorFlash for W25qxx<SPI, D, C>
    where
        SPI: SpiDevice<Error = E>,
        E: Debug,
        D: DelayNs,
        C: Monotonic,
    {
    }
}

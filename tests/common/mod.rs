//! In-memory W25Qxx used by the integration tests.
//!
//! The chip decodes the bytes of each transaction as they are clocked in and commits
//! program/erase/status writes when chip select is released, like the real part.
#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use embedded_hal::{
    delay::DelayNs,
    spi::{self, ErrorKind, ErrorType, Operation, SpiDevice},
};
use w25qxx::{Config, Monotonic, W25qxx};

pub const W25Q128: u16 = 0x4018;
pub const W25Q256: u16 = 0x4019;
pub const UNIQUE_ID: [u8; 8] = [0xD2, 0x63, 0x38, 0x47, 0x1B, 0x5A, 0x2C, 0x1F];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeSpiError;

impl spi::Error for FakeSpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// State of the simulated chip, shared between the test and the driver
#[derive(Debug)]
pub struct Chip {
    pub manufacturer: u8,
    pub device_id: u16,
    pub capacity: u32,
    pub unique_id: [u8; 8],
    /// Programmed bytes, anything missing reads as erased
    pub memory: BTreeMap<u32, u8>,
    pub status: [u8; 3],
    pub write_enable_latch: bool,
    /// Remaining status polls reporting busy
    pub busy_polls: u32,
    pub program_polls: u32,
    pub erase_polls: u32,
    pub stuck_busy: bool,
    /// Fail the next transaction starting with this opcode
    pub fail_on: Option<u8>,
    pub selected: bool,
    /// MOSI bytes of every completed transaction
    pub frames: Vec<Vec<u8>>,
    /// Program/erase commands dropped because the latch was not set
    pub rejected: usize,
}

impl Chip {
    fn new(device_id: u16) -> Self {
        let blocks = match device_id {
            0x4011..=0x401A => 2u32 << (device_id - 0x4011),
            _ => 2,
        };
        Self {
            manufacturer: 0xEF,
            device_id,
            capacity: blocks * 0x1_0000,
            unique_id: UNIQUE_ID,
            memory: BTreeMap::new(),
            status: [0; 3],
            write_enable_latch: false,
            busy_polls: 0,
            program_polls: 2,
            erase_polls: 3,
            stuck_busy: false,
            fail_on: None,
            selected: false,
            frames: Vec::new(),
            rejected: 0,
        }
    }

    pub fn byte(&self, addr: u32) -> u8 {
        self.memory.get(&addr).copied().unwrap_or(0xFF)
    }

    pub fn fill(&mut self, addr: u32, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.memory.insert(addr + i as u32, b);
        }
    }

    fn address_bytes(&self) -> usize {
        if self.capacity >= 0x0200_0000 {
            4
        } else {
            3
        }
    }

    fn address(&self, frame: &[u8]) -> Option<u32> {
        let width = self.address_bytes();
        let bytes = frame.get(1..1 + width)?;
        let addr = bytes.iter().fold(0u32, |acc, &b| acc << 8 | u32::from(b));
        Some(addr % self.capacity)
    }

    fn status1(&self) -> u8 {
        let busy = self.stuck_busy || self.busy_polls > 0;
        (self.status[0] & !0b11) | (u8::from(self.write_enable_latch) << 1) | u8::from(busy)
    }

    /// Byte shifted out while the `pos`th byte of `frame` is clocked in
    fn shift_out(&self, frame: &[u8], pos: usize) -> u8 {
        let width = self.address_bytes();
        match frame[0] {
            0x9F => match pos {
                1 => self.manufacturer,
                2 => (self.device_id >> 8) as u8,
                3 => self.device_id as u8,
                _ => 0xFF,
            },
            0x4B if (5..13).contains(&pos) => self.unique_id[pos - 5],
            0x05 if pos > 0 => self.status1(),
            0x35 if pos > 0 => self.status[1],
            0x15 if pos > 0 => self.status[2],
            0x0B if pos > width + 1 => match self.address(frame) {
                Some(addr) => {
                    let offset = (pos - width - 2) as u32;
                    self.byte((addr + offset) % self.capacity)
                }
                None => 0xFF,
            },
            _ => 0xFF,
        }
    }

    fn exchange(&mut self, frame: &mut Vec<u8>, mosi: u8) -> u8 {
        frame.push(mosi);
        self.shift_out(frame, frame.len() - 1)
    }

    fn erase(&mut self, start: u32, len: u32) {
        let mut tail = self.memory.split_off(&start);
        let mut after = tail.split_off(&(start + len));
        self.memory.append(&mut after);
    }

    /// Chip select released, act on the complete frame
    fn commit(&mut self, frame: &[u8]) {
        let Some(&opcode) = frame.first() else {
            return;
        };
        let width = self.address_bytes();
        match opcode {
            0x05 => self.busy_polls = self.busy_polls.saturating_sub(1),
            0x06 => self.write_enable_latch = true,
            0x04 => self.write_enable_latch = false,
            0x01 | 0x31 | 0x11 | 0x02 | 0x20 | 0xD8 | 0xC7 if !self.write_enable_latch => {
                self.rejected += 1;
            }
            0x01 | 0x31 | 0x11 => {
                if let Some(&value) = frame.get(1) {
                    let index = match opcode {
                        0x01 => 0,
                        0x31 => 1,
                        _ => 2,
                    };
                    self.status[index] = value;
                }
                self.write_enable_latch = false;
                self.busy_polls = self.program_polls;
            }
            0x02 => {
                if let Some(addr) = self.address(frame) {
                    let base = addr & !0xFF;
                    for (i, &b) in frame[1 + width..].iter().enumerate() {
                        // Programming wraps around inside the page
                        let target = base + ((addr & 0xFF) + i as u32) % 0x100;
                        let old = self.byte(target);
                        self.memory.insert(target, old & b);
                    }
                }
                self.write_enable_latch = false;
                self.busy_polls = self.program_polls;
            }
            0x20 | 0xD8 => {
                if let Some(addr) = self.address(frame) {
                    let size = if opcode == 0x20 { 0x1000 } else { 0x1_0000 };
                    self.erase(addr & !(size - 1), size);
                }
                self.write_enable_latch = false;
                self.busy_polls = self.erase_polls;
            }
            0xC7 => {
                self.memory.clear();
                self.write_enable_latch = false;
                self.busy_polls = self.erase_polls;
            }
            _ => {}
        }
    }
}

/// `SpiDevice` end of the simulated chip
pub struct FakeW25q {
    chip: Rc<RefCell<Chip>>,
}

impl FakeW25q {
    pub fn new(device_id: u16) -> (Self, Rc<RefCell<Chip>>) {
        let chip = Rc::new(RefCell::new(Chip::new(device_id)));
        (Self { chip: chip.clone() }, chip)
    }
}

impl ErrorType for FakeW25q {
    type Error = FakeSpiError;
}

impl SpiDevice for FakeW25q {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut chip = self.chip.borrow_mut();
        chip.selected = true;
        let mut frame = Vec::new();
        let mut failed = false;

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    for &b in bytes.iter() {
                        chip.exchange(&mut frame, b);
                    }
                }
                Operation::Read(bytes) => {
                    for b in bytes.iter_mut() {
                        *b = chip.exchange(&mut frame, 0x00);
                    }
                }
                Operation::Transfer(read, write) => {
                    let len = read.len().max(write.len());
                    for i in 0..len {
                        let out = chip.exchange(&mut frame, write.get(i).copied().unwrap_or(0x00));
                        if let Some(b) = read.get_mut(i) {
                            *b = out;
                        }
                    }
                }
                Operation::TransferInPlace(bytes) => {
                    for b in bytes.iter_mut() {
                        *b = chip.exchange(&mut frame, *b);
                    }
                }
                Operation::DelayNs(_) => {}
            }
            if chip.fail_on.is_some() && frame.first().copied() == chip.fail_on {
                chip.fail_on = None;
                failed = true;
                break;
            }
        }

        chip.selected = false;
        if failed {
            return Err(FakeSpiError);
        }
        chip.commit(&frame);
        chip.frames.push(frame);
        Ok(())
    }
}

/// Simulated time, in nanoseconds
#[derive(Clone, Default)]
pub struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    pub fn ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }
}

pub struct SimDelay(SimTime);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let now = &(self.0).0;
        now.set(now.get() + u64::from(ns));
    }
}

pub struct SimClock(SimTime);

impl Monotonic for SimClock {
    fn now_ms(&mut self) -> u64 {
        self.0.ms()
    }
}

pub type Flash = W25qxx<FakeW25q, SimDelay, SimClock>;

pub struct Bench {
    pub flash: Flash,
    pub chip: Rc<RefCell<Chip>>,
    pub time: SimTime,
}

impl Bench {
    /// Frames sent since the last call
    pub fn take_frames(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.chip.borrow_mut().frames)
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.take_frames().iter().map(|frame| frame[0]).collect()
    }
}

pub fn bench_with_config(device_id: u16, config: Config) -> Bench {
    let (spi, chip) = FakeW25q::new(device_id);
    let time = SimTime::default();
    let flash = W25qxx::with_config(
        spi,
        SimDelay(time.clone()),
        SimClock(time.clone()),
        config,
    );
    Bench { flash, chip, time }
}

/// Uninitialized driver on a simulated chip
pub fn bench(device_id: u16) -> Bench {
    bench_with_config(device_id, Config::default())
}

/// Initialized driver with a clean frame log
pub fn ready(device_id: u16) -> Bench {
    ready_with_config(device_id, Config::default())
}

pub fn ready_with_config(device_id: u16, config: Config) -> Bench {
    let mut bench = bench_with_config(device_id, config);
    bench.flash.init().unwrap();
    bench.take_frames();
    bench
}

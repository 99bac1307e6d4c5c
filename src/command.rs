/// Instruction set of the W25Qxx family, as sent on the wire
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    JedecId = 0x9F,
    UniqueId = 0x4B,
    WriteEnable = 0x06,
    WriteDisable = 0x04,
    ReadStatus1 = 0x05,
    ReadStatus2 = 0x35,
    ReadStatus3 = 0x15,
    WriteStatus1 = 0x01,
    WriteStatus2 = 0x31,
    WriteStatus3 = 0x11,
    PageProgram = 0x02,
    SectorErase = 0x20,
    BlockErase = 0xD8,
    ChipErase = 0xC7,
    FastRead = 0x0B,
    Dummy = 0x00,
}

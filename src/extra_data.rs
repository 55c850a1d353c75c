//! ExtraData chain walking.
//!
//! Block bodies are not decoded. The walker only reads each `{size, signature}`
//! header so the chain can be listed and skipped; it stops quietly at the
//! terminal block, at end of input, or at the first header that does not fit.

use crate::cursor::ByteCursor;
use crate::error::Result;
use serde::Serialize;
use std::io::{Read, Seek};

/// Blocks with a size below this value terminate the chain
const TERMINAL_BLOCK_THRESHOLD: u32 = 0x0000_0004;

/// Size of the common block header
const BLOCK_HEADER_SIZE: u32 = 8;

/// Extra data block kinds, by signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtraDataKind {
    EnvironmentVariable,
    Console,
    Tracker,
    ConsoleFe,
    SpecialFolder,
    Darwin,
    IconEnvironment,
    Shim,
    PropertyStore,
    KnownFolder,
    VistaAndAboveIdList,
    Unknown,
}

impl From<u32> for ExtraDataKind {
    fn from(signature: u32) -> Self {
        match signature {
            0xA000_0001 => ExtraDataKind::EnvironmentVariable,
            0xA000_0002 => ExtraDataKind::Console,
            0xA000_0003 => ExtraDataKind::Tracker,
            0xA000_0004 => ExtraDataKind::ConsoleFe,
            0xA000_0005 => ExtraDataKind::SpecialFolder,
            0xA000_0006 => ExtraDataKind::Darwin,
            0xA000_0007 => ExtraDataKind::IconEnvironment,
            0xA000_0008 => ExtraDataKind::Shim,
            0xA000_0009 => ExtraDataKind::PropertyStore,
            0xA000_000B => ExtraDataKind::KnownFolder,
            0xA000_000C => ExtraDataKind::VistaAndAboveIdList,
            _ => ExtraDataKind::Unknown,
        }
    }
}

/// Header of one extra data block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtraDataBlock {
    /// Absolute offset of the block in the file
    pub offset: u64,
    /// Block size, including the header
    pub size: u32,
    pub signature: u32,
    pub kind: ExtraDataKind,
}

/// Walk the block headers from the cursor position to the end of the chain
pub fn scan_extra_data<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Vec<ExtraDataBlock>> {
    let mut blocks = Vec::new();

    while cursor.remaining() >= 4 {
        let offset = cursor.position();
        let size = cursor.read_u32()?;
        if size < TERMINAL_BLOCK_THRESHOLD {
            break;
        }
        if size < BLOCK_HEADER_SIZE || u64::from(size) - 4 > cursor.remaining() {
            log::debug!(
                "ExtraData block at 0x{:X} declares {} bytes, {} remain; stopping",
                offset,
                size,
                cursor.remaining() + 4
            );
            break;
        }

        let signature = cursor.read_u32()?;
        cursor.skip(u64::from(size - BLOCK_HEADER_SIZE))?;

        let kind = ExtraDataKind::from(signature);
        log::trace!("ExtraData block {:?} (0x{:08X}) at 0x{:X}, {} bytes", kind, signature, offset, size);
        blocks.push(ExtraDataBlock {
            offset,
            size,
            signature,
            kind,
        });
    }

    Ok(blocks)
}

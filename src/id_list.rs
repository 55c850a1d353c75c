//! LinkTargetIDList parsing
//!
//! The IDList is kept as a chain of opaque ItemID payloads. Only the framing is
//! validated: item sizes must add up to the declared list size and the list must
//! end in a zero TerminalID.

use crate::cursor::ByteCursor;
use crate::error::{DecodeContext, Error, ErrorKind, Result};
use serde::{Serialize, Serializer};
use std::io::{Read, Seek};

/// IDList (Item ID List) of the link target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetIdList {
    /// Declared size of the list, including the terminal ID
    pub size: u16,
    /// Items in stored order
    pub items: Vec<ItemId>,
    /// Terminal marker (always 0 once validated)
    pub terminal_id: u16,
}

/// Individual ItemID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemId {
    /// Item size, including this 2-byte field
    pub size: u16,
    /// Shell-defined payload
    #[serde(serialize_with = "serialize_hex")]
    pub data: Vec<u8>,
}

fn serialize_hex<S: Serializer>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let hex: String = data.iter().map(|b| format!("{:02x}", b)).collect();
    serializer.serialize_str(&hex)
}

impl TargetIdList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn id_list_error(field: &'static str, message: impl Into<String>) -> Error {
    Error::decode(ErrorKind::TargetIdList, field, message)
}

/// Decode the IDList at the cursor position
pub fn decode_id_list<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<TargetIdList> {
    let size = cursor.read_u16().context(ErrorKind::TargetIdList, "IDListSize")?;
    if size < 2 {
        return Err(id_list_error(
            "IDListSize",
            format!("declared size {} cannot hold the terminal ID", size),
        ));
    }

    let items_size = u32::from(size) - 2;
    let mut consumed = 0u32;
    let mut items = Vec::new();

    while consumed < items_size {
        let item_size = cursor.read_u16().context(ErrorKind::TargetIdList, "ItemIDSize")?;
        if item_size < 2 {
            return Err(id_list_error(
                "ItemIDSize",
                format!("item {} has size {}, smaller than its own size field", items.len(), item_size),
            ));
        }
        if consumed + u32::from(item_size) > items_size {
            return Err(id_list_error(
                "ItemIDSize",
                format!(
                    "item {} of size {} overruns the declared list size {}",
                    items.len(),
                    item_size,
                    size
                ),
            ));
        }

        let data = cursor
            .read_bytes(usize::from(item_size) - 2)
            .context(ErrorKind::TargetIdList, "ItemIDData")?;
        items.push(ItemId { size: item_size, data });
        consumed += u32::from(item_size);
    }

    let terminal_id = cursor.read_u16().context(ErrorKind::TargetIdList, "TerminalID")?;
    if terminal_id != 0 {
        return Err(id_list_error(
            "TerminalID",
            format!("terminal ID must be 0, got 0x{:04X}", terminal_id),
        ));
    }

    log::trace!("IDList: {} items in {} bytes", items.len(), size);

    Ok(TargetIdList {
        size,
        items,
        terminal_id,
    })
}

//! Shell link parser: runs the section decoders in file order over one stream.
//!
//! ```text
//! Fresh -> HeaderDone -> (IdListDone) -> (LinkInfoDone) -> Complete
//!   any step --error--> Failed
//! ```
//!
//! The parenthesised steps run only when the header flags ask for them. The
//! first structural violation stops the parse. Sections decoded before the
//! failure stay readable through [`Parser::link`], so a caller can still look at
//! a good header when LinkInfo turned out to be broken; such a link must not be
//! treated as complete.

use crate::cursor::ByteCursor;
use crate::error::{ErrorKind, Result};
use crate::extra_data::{scan_extra_data, ExtraDataBlock};
use crate::header::{decode_header, LinkHeader};
use crate::id_list::{decode_id_list, TargetIdList};
use crate::link_info::{decode_link_info, LinkInfo};
use crate::string_data::{decode_string_data, StringData};
use crate::text::CodePage;
use serde::Serialize;
use std::io::{Cursor, Read, Seek};

/// Decoded shell link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedLink {
    /// Shell Link Header; `None` only if the header itself failed
    pub header: Option<LinkHeader>,
    /// Link Target IDList, when HasLinkTargetIDList is set
    pub target_id_list: Option<TargetIdList>,
    /// Link Info, when HasLinkInfo is set
    pub link_info: Option<LinkInfo>,
    pub string_data: StringData,
    /// Headers of the trailing extra data blocks
    pub extra_data: Vec<ExtraDataBlock>,
}

/// Progress of a [`Parser`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Fresh,
    HeaderDone,
    IdListDone,
    LinkInfoDone,
    Complete,
    Failed {
        kind: Option<ErrorKind>,
        field: Option<&'static str>,
    },
}

/// LNK file parser over a seekable byte source
pub struct Parser<R> {
    cursor: ByteCursor<R>,
    codepage: CodePage,
    state: ParseState,
    link: ParsedLink,
}

impl<R: Read + Seek> Parser<R> {
    /// Create a parser; the source is measured and rewound
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            cursor: ByteCursor::new(reader)?,
            codepage: CodePage::default(),
            state: ParseState::Fresh,
            link: ParsedLink::default(),
        })
    }

    /// Code page for strings stored without Unicode
    pub fn with_codepage(mut self, codepage: CodePage) -> Self {
        self.codepage = codepage;
        self
    }

    /// Decode the whole link from the start of the source.
    ///
    /// Any previous result is cleared first, so calling this again re-parses
    /// from scratch.
    pub fn parse(&mut self) -> Result<&ParsedLink> {
        self.reset()?;

        match self.run() {
            Ok(()) => {
                self.state = ParseState::Complete;
                Ok(&self.link)
            }
            Err(err) => {
                log::debug!("Parse failed after {:?}: {}", self.state, err);
                self.state = ParseState::Failed {
                    kind: err.kind(),
                    field: err.field(),
                };
                Err(err)
            }
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.cursor.rewind()?;
        self.link = ParsedLink::default();
        self.state = ParseState::Fresh;
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let header = decode_header(&mut self.cursor)?;
        let flags = header.link_flags;
        self.link.header = Some(header);
        self.state = ParseState::HeaderDone;

        if flags.has_link_target_id_list() {
            self.link.target_id_list = Some(decode_id_list(&mut self.cursor)?);
            self.state = ParseState::IdListDone;
        }

        if flags.has_link_info() {
            self.link.link_info = Some(decode_link_info(&mut self.cursor, self.codepage)?);
            self.state = ParseState::LinkInfoDone;
        }

        self.link.string_data = decode_string_data(&mut self.cursor, flags, self.codepage)?;

        self.link.extra_data = scan_extra_data(&mut self.cursor)?;
        if self.cursor.remaining() > 0 {
            log::trace!("{} bytes left after the extra data chain", self.cursor.remaining());
        }

        Ok(())
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Everything decoded so far, complete or not
    pub fn link(&self) -> &ParsedLink {
        &self.link
    }

    pub fn into_link(self) -> ParsedLink {
        self.link
    }

    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }
}

/// Parse an in-memory link file with the default code page
pub fn parse_bytes(data: &[u8]) -> Result<ParsedLink> {
    parse_bytes_with(data, CodePage::default())
}

/// Parse an in-memory link file
pub fn parse_bytes_with(data: &[u8], codepage: CodePage) -> Result<ParsedLink> {
    let mut parser = Parser::new(Cursor::new(data))?.with_codepage(codepage);
    parser.parse()?;
    Ok(parser.into_link())
}

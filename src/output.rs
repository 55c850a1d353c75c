//! Output formatting for link reports.

use crate::datetime::{format_timestamp_human, Filetime};
use crate::error::{Error, Result};
use crate::network::NetworkTarget;
use crate::parser::ParsedLink;
use serde::Serialize;
use std::io::{BufWriter, Write};

/// Supported output formats
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary per link
    Human,
    /// One pretty-printed JSON array
    Json,
    /// One JSON object per line
    Jsonl,
}

/// Outcome of reading one input file
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ParsedLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportError>,
}

/// Serializable form of a parse failure
#[derive(Debug, Clone, Serialize)]
pub struct ReportError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub message: String,
}

impl LinkReport {
    pub fn parsed(path: impl Into<String>, link: ParsedLink) -> Self {
        Self {
            path: path.into(),
            network: NetworkTarget::from_link(&link),
            link: Some(link),
            error: None,
        }
    }

    pub fn failed(path: impl Into<String>, err: &Error) -> Self {
        Self {
            path: path.into(),
            network: None,
            link: None,
            error: Some(ReportError {
                kind: err.kind().map(|kind| kind.to_string()),
                field: err.field(),
                message: err.to_string(),
            }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Handles output formatting and writing
pub struct OutputWriter;

impl OutputWriter {
    /// Write reports in the specified format
    pub fn write_reports(reports: &[LinkReport], format: OutputFormat, writer: Box<dyn Write>) -> Result<()> {
        match format {
            OutputFormat::Human => Self::write_human(reports, writer),
            OutputFormat::Json => Self::write_json(reports, writer),
            OutputFormat::Jsonl => Self::write_jsonl(reports, writer),
        }
    }

    fn write_human(reports: &[LinkReport], mut writer: Box<dyn Write>) -> Result<()> {
        for report in reports {
            writeln!(writer, "{}", report.path)?;

            if let Some(error) = &report.error {
                writeln!(writer, "  {:<17} could not be resolved", "Status:")?;
                writeln!(writer, "  {:<17} {}", "Reason:", error.message)?;
                writeln!(writer)?;
                continue;
            }

            match &report.network {
                Some(target) => {
                    writeln!(writer, "  {:<17} {}", "Net name:", target.net_name)?;
                    if let Some(share) = target.share_name() {
                        writeln!(writer, "  {:<17} {}", "Share:", share)?;
                    }
                    if let Some(device) = &target.device_name {
                        writeln!(writer, "  {:<17} {}", "Device:", device)?;
                    }
                    if let Some(provider) = &target.provider {
                        writeln!(writer, "  {:<17} {}", "Provider:", provider)?;
                    }
                    writeln!(writer, "  {:<17} {}", "Target:", target.full_path())?;
                }
                None => writeln!(writer, "  {:<17} (no network target)", "Net name:")?,
            }

            if let Some(link) = &report.link {
                Self::write_link_details(&mut writer, link)?;
            }

            writeln!(writer)?;
        }

        Ok(())
    }

    fn write_link_details(writer: &mut Box<dyn Write>, link: &ParsedLink) -> Result<()> {
        if let Some(local) = link.link_info.as_ref().and_then(|info| info.local_path()) {
            writeln!(writer, "  {:<17} {}", "Local path:", local)?;
        }

        let strings = &link.string_data;
        for (label, value) in [
            ("Description:", &strings.name_string),
            ("Relative path:", &strings.relative_path),
            ("Working dir:", &strings.working_dir),
            ("Arguments:", &strings.command_line_arguments),
            ("Icon:", &strings.icon_location),
        ] {
            if let Some(value) = value {
                writeln!(writer, "  {:<17} {}", label, value)?;
            }
        }

        if let Some(header) = &link.header {
            Self::write_timestamp(writer, "Created:", header.creation_time)?;
            Self::write_timestamp(writer, "Accessed:", header.access_time)?;
            Self::write_timestamp(writer, "Modified:", header.write_time)?;
            writeln!(writer, "  {:<17} {} bytes", "Size:", header.file_size)?;
        }

        Ok(())
    }

    fn write_timestamp(writer: &mut Box<dyn Write>, label: &str, filetime: Filetime) -> Result<()> {
        if let Some(time) = filetime.to_datetime() {
            writeln!(writer, "  {:<17} {}", label, format_timestamp_human(&time))?;
        }
        Ok(())
    }

    fn write_json(reports: &[LinkReport], mut writer: Box<dyn Write>) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, reports)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_jsonl(reports: &[LinkReport], mut writer: Box<dyn Write>) -> Result<()> {
        for report in reports {
            serde_json::to_writer(&mut writer, report)?;
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Create appropriate writer based on output option
pub fn create_writer(output_file: Option<&str>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match output_file {
        Some(path) if path != "-" => Box::new(BufWriter::new(std::fs::File::create(path)?)),
        _ => Box::new(std::io::stdout()),
    };

    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::flags::LinkFlags;
    use crate::parser::parse_bytes;
    use crate::test_support::{HeaderBuilder, LinkInfoBuilder, NetworkLinkBuilder};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Writer that keeps its bytes reachable after being boxed
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn render(reports: &[LinkReport], format: OutputFormat) -> String {
        let buffer = SharedBuffer::default();
        OutputWriter::write_reports(reports, format, Box::new(buffer.clone())).unwrap();
        buffer.text()
    }

    fn sample_reports() -> Vec<LinkReport> {
        let mut bytes = HeaderBuilder::new()
            .flags(LinkFlags::HAS_LINK_INFO)
            .creation_time(0x01BF_53EB_256D_4000)
            .build();
        bytes.extend(
            LinkInfoBuilder::new()
                .network(NetworkLinkBuilder::new("\\\\server\\share").build())
                .build(),
        );
        let ok = LinkReport::parsed("a.lnk", parse_bytes(&bytes).unwrap());
        let err = Error::decode(ErrorKind::LinkInfo, "NetNameOffset", "offset past end");
        vec![ok, LinkReport::failed("b.lnk", &err)]
    }

    #[test]
    fn test_human_output() {
        let text = render(&sample_reports(), OutputFormat::Human);
        assert!(text.contains("a.lnk"));
        assert!(text.contains("\\\\server\\share"));
        assert!(text.contains("Share:"));
        assert!(text.contains("Created:"));
        assert!(text.contains("b.lnk"));
        assert!(text.contains("could not be resolved"));
    }

    #[test]
    fn test_json_output() {
        let text = render(&sample_reports(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["network"]["net_name"], "\\\\server\\share");
        assert!(array[0].get("error").is_none());
        assert_eq!(array[1]["error"]["field"], "NetNameOffset");
        assert_eq!(array[1]["error"]["kind"], "LinkInfo");
    }

    #[test]
    fn test_jsonl_output() {
        let text = render(&sample_reports(), OutputFormat::Jsonl);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(serde_json::from_str::<serde_json::Value>(line).is_ok());
        }
    }

    #[test]
    fn test_report_status() {
        let reports = sample_reports();
        assert!(reports[0].is_ok());
        assert!(!reports[1].is_ok());
        assert!(reports[1].network.is_none());
    }
}

//! Main application logic and orchestration.

use crate::{
    cli::Config,
    error::Result,
    output::{create_writer, LinkReport, OutputWriter},
    parser::Parser,
    text::CodePage,
};
use anyhow::Context;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;

/// Main application runner
pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the application with the configured parameters
    pub fn run(self) -> Result<()> {
        let reports = self.decode_inputs();

        let failed = reports.iter().filter(|report| !report.is_ok()).count();
        log::info!(
            "Decoded {} of {} link files",
            reports.len() - failed,
            reports.len()
        );

        let reports = self.apply_filters(reports);
        self.write_output(&reports)
    }

    /// Decode every input on its own parser; one bad file never stops the rest
    fn decode_inputs(&self) -> Vec<LinkReport> {
        let codepage = self.config.codepage;

        self.config
            .inputs
            .par_iter()
            .map(|path| match decode_file(path, codepage) {
                Ok(report) => report,
                Err(err) => {
                    if err.is_decode() {
                        log::warn!("{}: could not be resolved: {}", path, err);
                    } else {
                        log::warn!("{}: could not be read: {}", path, err);
                    }
                    LinkReport::failed(path.as_str(), &err)
                }
            })
            .collect()
    }

    /// Drop local-only links when only network targets were asked for
    fn apply_filters(&self, reports: Vec<LinkReport>) -> Vec<LinkReport> {
        if !self.config.network_only {
            return reports;
        }

        reports
            .into_iter()
            .filter(|report| !report.is_ok() || report.network.is_some())
            .collect()
    }

    /// Write output to file or stdout
    fn write_output(&self, reports: &[LinkReport]) -> Result<()> {
        let writer = create_writer(self.config.output.as_deref())?;
        OutputWriter::write_reports(reports, self.config.format, writer)
    }
}

/// Decode one link file from disk
pub fn decode_file(path: &str, codepage: CodePage) -> Result<LinkReport> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
    let mut parser = Parser::new(BufReader::new(file))?.with_codepage(codepage);
    parser.parse()?;
    log::debug!("{}: decoded", path);

    Ok(LinkReport::parsed(path, parser.into_link()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::LinkFlags;
    use crate::output::OutputFormat;
    use crate::test_support::{volume_id, HeaderBuilder, LinkInfoBuilder, NetworkLinkBuilder};
    use log::LevelFilter;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn network_link() -> Vec<u8> {
        let mut bytes = HeaderBuilder::new().flags(LinkFlags::HAS_LINK_INFO).build();
        bytes.extend(
            LinkInfoBuilder::new()
                .network(NetworkLinkBuilder::new("\\\\server\\share").build())
                .build(),
        );
        bytes
    }

    fn local_link() -> Vec<u8> {
        let mut bytes = HeaderBuilder::new().flags(LinkFlags::HAS_LINK_INFO).build();
        bytes.extend(
            LinkInfoBuilder::new()
                .local(volume_id(3, 9, "OS"), "C:\\notes.txt", "")
                .build(),
        );
        bytes
    }

    fn config(inputs: Vec<String>, network_only: bool, output: Option<String>) -> Config {
        Config {
            inputs,
            format: OutputFormat::Jsonl,
            output,
            codepage: CodePage::default(),
            network_only,
            log_level: LevelFilter::Warn,
        }
    }

    #[test]
    fn test_bad_file_does_not_stop_siblings() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.lnk", &network_link());
        let bad = write_file(&dir, "bad.lnk", &network_link()[..0x50]);
        let missing = dir.path().join("missing.lnk").to_string_lossy().into_owned();

        let app = App::new(config(vec![good, bad, missing], false, None));
        let reports = app.decode_inputs();
        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_ok());
        assert_eq!(reports[0].network.as_ref().unwrap().net_name, "\\\\server\\share");
        assert!(!reports[1].is_ok());
        assert_eq!(reports[1].error.as_ref().unwrap().kind.as_deref(), Some("LinkInfo"));
        assert!(!reports[2].is_ok());
        assert!(reports[2].error.as_ref().unwrap().message.contains("missing.lnk"));
    }

    #[test]
    fn test_network_only_filter() {
        let dir = TempDir::new().unwrap();
        let remote = write_file(&dir, "remote.lnk", &network_link());
        let local = write_file(&dir, "local.lnk", &local_link());

        let app = App::new(config(vec![remote, local], true, None));
        let reports = app.apply_filters(app.decode_inputs());
        assert_eq!(reports.len(), 1);
        assert!(reports[0].path.ends_with("remote.lnk"));
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = TempDir::new().unwrap();
        let remote = write_file(&dir, "remote.lnk", &network_link());
        let out = dir.path().join("out.jsonl").to_string_lossy().into_owned();

        App::new(config(vec![remote], false, Some(out.clone()))).run().unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("\\\\\\\\server\\\\share"));
    }
}

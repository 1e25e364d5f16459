//! `dsvg convert` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use dsvg_config::{CliSettings, Config};
use dsvg_core::{BasicRenderer, ConvertOptions, Converter, RenderOptions};

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Path that selects standard input.
const STDIN_PATH: &str = "-";

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Diagram file to convert (`-` or omitted reads standard input).
    input: Option<PathBuf>,

    /// Write the SVG to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minify the SVG.
    #[arg(short, long)]
    minify: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, I/O or conversion fails.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let config = global.load_config(CliSettings::default())?;
        self.run(&config)
    }

    fn run(self, config: &Config) -> Result<(), CliError> {
        let input = read_input(self.input.as_deref(), std::io::stdin().lock())?;
        tracing::debug!(bytes = input.len(), minify = self.minify, "Read diagram");

        let converter = Converter::new(BasicRenderer::new())
            .with_render_options(RenderOptions {
                alternate_content: config.render.alternate_content,
            })
            .with_verbose(config.logging.verbose);
        let svg = converter.convert(
            &input,
            ConvertOptions {
                minify: self.minify,
            },
        )?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &svg).map_err(|source| CliError::Write {
                    path: path.clone(),
                    source,
                })?;
                if !config.logging.quiet {
                    Output::new().success(&format!("Wrote {}", path.display()));
                }
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(svg.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

/// Read the diagram from `path`, or from `stdin` for `-` or no path.
fn read_input(path: Option<&Path>, mut stdin: impl Read) -> Result<Vec<u8>, CliError> {
    match path {
        Some(path) if path != Path::new(STDIN_PATH) => {
            std::fs::read(path).map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut buf = Vec::new();
            stdin.read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;

    const DIAGRAM: &str = concat!(
        "<mxfile><diagram><mxGraphModel><root>",
        r#"<mxCell id="0"/><mxCell id="1" parent="0"/>"#,
        r#"<mxCell id="2" value="Box" vertex="1" parent="1">"#,
        r#"<mxGeometry x="0" y="0" width="80" height="30" as="geometry"/></mxCell>"#,
        "</root></mxGraphModel></diagram></mxfile>"
    );

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.logging.quiet = true;
        config
    }

    #[test]
    fn test_convert_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("diagram.drawio");
        let output = dir.path().join("diagram.svg");
        fs::write(&input, DIAGRAM).unwrap();

        let args = ConvertArgs {
            input: Some(input),
            output: Some(output.clone()),
            minify: true,
        };
        args.run(&quiet_config()).unwrap();

        let svg = fs::read_to_string(output).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<style>"));
        assert!(!svg.contains("data-cell-id"));
    }

    #[test]
    fn test_read_input_from_stdin() {
        let from_none = read_input(None, DIAGRAM.as_bytes()).unwrap();
        assert_eq!(from_none, DIAGRAM.as_bytes());

        let from_dash = read_input(Some(Path::new("-")), Cursor::new(DIAGRAM)).unwrap();
        assert_eq!(from_dash, DIAGRAM.as_bytes());
    }

    #[test]
    fn test_read_input_prefers_file_over_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("diagram.drawio");
        fs::write(&input, DIAGRAM).unwrap();

        let bytes = read_input(Some(input.as_path()), &b"ignored"[..]).unwrap();
        assert_eq!(bytes, DIAGRAM.as_bytes());
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConvertArgs {
            input: Some(dir.path().join("missing.drawio")),
            output: None,
            minify: false,
        };

        let err = args.run(&quiet_config()).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
        assert!(err.to_string().contains("missing.drawio"));
    }

    #[test]
    fn test_invalid_diagram() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plain.xml");
        fs::write(&input, "<mxfile/>").unwrap();

        let args = ConvertArgs {
            input: Some(input),
            output: Some(dir.path().join("out.svg")),
            minify: false,
        };

        let err = args.run(&quiet_config()).unwrap_err();
        assert!(matches!(err, CliError::Convert(_)));
        assert!(!dir.path().join("out.svg").exists());
    }
}

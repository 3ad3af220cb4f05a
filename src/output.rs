//! Output sinks for rendered character grids.

use clap::ValueEnum;
use serde::Deserialize;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::algorithm::CharGrid;

/// Default HTML output file.
pub const DEFAULT_HTML_PATH: &str = "out.html";
/// Default HTML font family.
pub const DEFAULT_FONT: &str = "Courier New";

/// Errors raised while writing a grid.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write HTML output to '{}': {source}", .path.display())]
    Html {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Something that presents a rendered grid.
pub trait AsciiOutput {
    fn out(&mut self, grid: &CharGrid) -> Result<(), OutputError>;
}

/// Which output sink to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Console,
    Html,
}

impl OutputKind {
    pub fn name(&self) -> &'static str {
        match self {
            OutputKind::Console => "console",
            OutputKind::Html => "html",
        }
    }
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(OutputKind::Console),
            "html" => Ok(OutputKind::Html),
            other => Err(format!("unknown output '{}'", other)),
        }
    }
}

/// Writes each row on its own line, characters separated by a space.
pub struct ConsoleOutput<W> {
    writer: W,
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AsciiOutput for ConsoleOutput<W> {
    fn out(&mut self, grid: &CharGrid) -> Result<(), OutputError> {
        for row in grid.rows() {
            let mut line = String::with_capacity(row.len() * 2);
            for (i, c) in row.iter().enumerate() {
                if i > 0 {
                    line.push(' ');
                }
                line.push(*c);
            }
            writeln!(self.writer, "{}", line)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a standalone HTML page, one `<div>` per row.
#[derive(Debug, Clone)]
pub struct HtmlOutput {
    path: PathBuf,
    font: String,
}

impl HtmlOutput {
    pub fn new(path: impl Into<PathBuf>, font: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            font: font.into(),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Render the page as a string.
    pub fn render_html(&self, grid: &CharGrid) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>ASCII Art</title>\n</head>\n");
        let _ = writeln!(
            html,
            "<body style=\"background-color:white;color:black;font-family:'{}',monospace;\
             font-size:6px;line-height:1;letter-spacing:0.25em;white-space:pre;\">",
            escape_html(&self.font)
        );
        for row in grid.rows() {
            html.push_str("<div>");
            for &c in row {
                html.push_str(&escape_char(c));
            }
            html.push_str("</div>\n");
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

impl AsciiOutput for HtmlOutput {
    fn out(&mut self, grid: &CharGrid) -> Result<(), OutputError> {
        let html = self.render_html(grid);
        std::fs::write(&self.path, html).map_err(|source| OutputError::Html {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Wrote HTML output to {}", self.path.display());
        Ok(())
    }
}

fn escape_char(c: char) -> String {
    match c {
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        '&' => "&amp;".to_string(),
        '"' => "&quot;".to_string(),
        ' ' => "&nbsp;".to_string(),
        other => other.to_string(),
    }
}

fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| if c == ' ' { " ".to_string() } else { escape_char(c) })
        .collect()
}

//! Interactive command loop.
//!
//! Reads one command per line, edits the session state (image, character
//! set, resolution, output) and renders on request. Parsing is separate from
//! execution so both can be driven from tests.

use std::io::{self, BufRead, Write};

use crate::algorithm::{AsciiArtEngine, ResolutionBounds};
use crate::error::AsciiArtError;
use crate::matching::{BitmapFont, CharacterSet, CharsetEdit, GlyphRasterizer};
use crate::output::{AsciiOutput, ConsoleOutput, HtmlOutput, OutputKind};
use crate::raster::Image;

/// Prompt printed before each command.
pub const PROMPT: &str = ">>> ";

/// Factor applied by `res up` / `res down`.
const RESOLUTION_FACTOR: u32 = 2;

const MSG_RESOLUTION_SET: &str = "Resolution set to";
const MSG_RESOLUTION_BOUNDS: &str = "Did not change resolution due to exceeding boundaries.";
const MSG_RESOLUTION_FORMAT: &str = "Did not change resolution due to incorrect format.";
const MSG_EMPTY_CHARSET: &str = "Did not execute. Charset is empty.";
const MSG_BAD_IMAGE: &str = "Did not execute due to problem with the image file.";
const MSG_BAD_ADD: &str = "Did not add due to incorrect format.";
const MSG_BAD_REMOVE: &str = "Did not remove due to incorrect format.";
const MSG_BAD_OUTPUT: &str = "Did not change output method due to incorrect format.";
const MSG_BAD_COMMAND: &str = "Did not execute due to incorrect command.";

/// Direction of a resolution change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionChange {
    Up,
    Down,
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Leave the loop.
    Exit,
    /// Print the active characters.
    Chars,
    /// Add the characters named by a token.
    Add(String),
    /// Remove the characters named by a token.
    Remove(String),
    /// Double or halve the resolution; `None` for a malformed argument.
    Resolution(Option<ResolutionChange>),
    /// Load a new image from a path.
    Image(String),
    /// Switch the output method; `None` for an unknown method.
    Output(Option<OutputKind>),
    /// Render with the current settings.
    Render,
    /// Anything else.
    Unknown(String),
}

impl ShellCommand {
    /// Parse a line of input.
    ///
    /// Returns `None` for empty or whitespace-only input. Missing arguments
    /// parse to an empty argument and are rejected when executed.
    pub fn parse(input: &str) -> Option<ShellCommand> {
        let mut parts = input.split_whitespace();
        let name = parts.next()?;
        let arg = parts.next().unwrap_or("").to_string();

        let command = match name {
            "exit" => ShellCommand::Exit,
            "chars" => ShellCommand::Chars,
            "add" => ShellCommand::Add(arg),
            "remove" => ShellCommand::Remove(arg),
            "res" => ShellCommand::Resolution(match arg.as_str() {
                "up" => Some(ResolutionChange::Up),
                "down" => Some(ResolutionChange::Down),
                _ => None,
            }),
            "image" => ShellCommand::Image(arg),
            "output" => ShellCommand::Output(arg.parse().ok()),
            "asciiArt" => ShellCommand::Render,
            other => ShellCommand::Unknown(other.to_string()),
        };
        Some(command)
    }
}

/// Whether the loop should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlow {
    Continue,
    Exit,
}

/// Session state plus the engine that renders it.
pub struct Shell<W, R = BitmapFont> {
    engine: AsciiArtEngine<R>,
    image: Image,
    charset: CharacterSet,
    resolution: u32,
    output: OutputKind,
    html: HtmlOutput,
    out: W,
}

impl<W: Write, R: GlyphRasterizer> Shell<W, R> {
    /// Create a session.
    ///
    /// The starting resolution is clamped into the image's bounds.
    pub fn new(
        engine: AsciiArtEngine<R>,
        image: Image,
        charset: CharacterSet,
        resolution: u32,
        out: W,
    ) -> Self {
        let resolution = clamp_resolution(&image, resolution);
        Self {
            engine,
            image,
            charset,
            resolution,
            output: OutputKind::Console,
            html: HtmlOutput::new(crate::output::DEFAULT_HTML_PATH, crate::output::DEFAULT_FONT),
            out,
        }
    }

    /// Select the output method and the HTML sink used when it is `Html`.
    pub fn with_output(mut self, kind: OutputKind, html: HtmlOutput) -> Self {
        self.output = kind;
        self.html = html;
        self
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn charset(&self) -> &CharacterSet {
        &self.charset
    }

    pub fn output_kind(&self) -> OutputKind {
        self.output
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn engine(&self) -> &AsciiArtEngine<R> {
        &self.engine
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Read and execute commands until `exit` or end of input.
    pub fn run(&mut self, input: impl BufRead) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let Some(command) = ShellCommand::parse(&line?) else {
                continue;
            };
            if self.execute(command)? == ShellFlow::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command. User errors are reported on the writer; only
    /// I/O failures of the writer itself are returned.
    pub fn execute(&mut self, command: ShellCommand) -> io::Result<ShellFlow> {
        match command {
            ShellCommand::Exit => return Ok(ShellFlow::Exit),
            ShellCommand::Chars => writeln!(self.out, "{}", self.charset)?,
            ShellCommand::Add(token) => self.edit_charset(CharsetEdit::Add, &token)?,
            ShellCommand::Remove(token) => self.edit_charset(CharsetEdit::Remove, &token)?,
            ShellCommand::Resolution(change) => self.change_resolution(change)?,
            ShellCommand::Image(path) => self.change_image(&path)?,
            ShellCommand::Output(kind) => match kind {
                Some(kind) => self.output = kind,
                None => writeln!(self.out, "{}", MSG_BAD_OUTPUT)?,
            },
            ShellCommand::Render => self.render()?,
            ShellCommand::Unknown(name) => {
                log::debug!("Unknown shell command: {}", name);
                writeln!(self.out, "{}", MSG_BAD_COMMAND)?
            }
        }
        Ok(ShellFlow::Continue)
    }

    fn edit_charset(&mut self, edit: CharsetEdit, token: &str) -> io::Result<()> {
        if self.charset.apply(edit, token).is_err() {
            let message = match edit {
                CharsetEdit::Add => MSG_BAD_ADD,
                CharsetEdit::Remove => MSG_BAD_REMOVE,
            };
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }

    fn change_resolution(&mut self, change: Option<ResolutionChange>) -> io::Result<()> {
        let Some(change) = change else {
            return writeln!(self.out, "{}", MSG_RESOLUTION_FORMAT);
        };
        let requested = match change {
            ResolutionChange::Up => self.resolution.saturating_mul(RESOLUTION_FACTOR),
            ResolutionChange::Down => self.resolution / RESOLUTION_FACTOR,
        };
        match ResolutionBounds::for_image(&self.image).validate(requested) {
            Ok(resolution) => {
                self.resolution = resolution;
                log::info!("Resolution changed to {}", resolution);
                writeln!(self.out, "{} {}.", MSG_RESOLUTION_SET, resolution)
            }
            Err(_) => writeln!(self.out, "{}", MSG_RESOLUTION_BOUNDS),
        }
    }

    fn change_image(&mut self, path: &str) -> io::Result<()> {
        if path.is_empty() {
            return writeln!(self.out, "{}", MSG_BAD_IMAGE);
        }
        match Image::open(path) {
            Ok(image) => {
                self.resolution = clamp_resolution(&image, self.resolution);
                self.image = image;
                Ok(())
            }
            Err(e) => {
                log::warn!("{}", e);
                writeln!(self.out, "{}", MSG_BAD_IMAGE)
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let grid = match self.engine.render(&self.image, self.resolution, &self.charset) {
            Ok(grid) => grid,
            Err(AsciiArtError::EmptyCharacterSet) => {
                return writeln!(self.out, "{}", MSG_EMPTY_CHARSET);
            }
            Err(AsciiArtError::ExceedsResolutionBounds { .. }) => {
                return writeln!(self.out, "{}", MSG_RESOLUTION_BOUNDS);
            }
            Err(e) => return writeln!(self.out, "{}", e),
        };

        let result = match self.output {
            OutputKind::Console => ConsoleOutput::new(&mut self.out).out(&grid),
            OutputKind::Html => self.html.out(&grid),
        };
        if let Err(e) = result {
            writeln!(self.out, "{}", e)?;
        }
        Ok(())
    }
}

/// Clamp a resolution into an image's bounds, logging when it moves.
fn clamp_resolution(image: &Image, resolution: u32) -> u32 {
    let clamped = ResolutionBounds::for_image(image).clamp(resolution);
    if clamped != resolution {
        log::warn!(
            "Resolution {} is outside the bounds for a {}x{} image, using {}",
            resolution,
            image.width(),
            image.height(),
            clamped
        );
    }
    clamped
}

//! Interactive command prompt.
//!
//! Used to cut reference icons out of the screen (`tl`, `br`, `save`) and to
//! start a scan mode (`autohs`, `autoptt`). Each line is one command.

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use crate::automation::Pointer;
use crate::capture::ScreenSource;
use crate::config::{ScanConfig, ScreenRect, load_icon_groups};
use crate::scanner::{ScanMode, Scanner};
use crate::targets::load_targets;

const HELP: &str = "Commands:
  tl            - set top-left corner from the current pointer position
  br            - set bottom-right corner from the current pointer position
  icon          - show the selected rectangle
  pos           - print the pointer position
  save [name]   - capture the selected rectangle into the icons directory
  test          - capture the scan region into roi.png
  help          - show this help
  exit          - quit
  autohs        - scan for 'hs' icons, click the first one found
  autoptt       - scan for 'ptt' icons, click every one found";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Pos,
    TopLeft,
    BottomRight,
    ShowRect,
    Save(Option<String>),
    Test,
    Scan { group: &'static str, mode: ScanMode },
    Exit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let cmd = fields.next()?.to_lowercase();
        Some(match cmd.as_str() {
            "help" | "h" | "?" => Command::Help,
            "pos" => Command::Pos,
            "tl" => Command::TopLeft,
            "br" => Command::BottomRight,
            "icon" | "roi" => Command::ShowRect,
            "save" => Command::Save(fields.next().map(str::to_string)),
            "test" => Command::Test,
            "autohs" => Command::Scan {
                group: "hs",
                mode: ScanMode::SingleHit,
            },
            "autoptt" => Command::Scan {
                group: "ptt",
                mode: ScanMode::PerTarget,
            },
            "exit" | "quit" | "q" => Command::Exit,
            _ => Command::Unknown(cmd),
        })
    }
}

enum Flow {
    Continue,
    Exit,
}

pub struct Shell<S, P, W> {
    settings: ScanConfig,
    icons_file: PathBuf,
    icons_dir: PathBuf,
    roi_file: PathBuf,
    top_left: Option<(i32, i32)>,
    bottom_right: Option<(i32, i32)>,
    screen: S,
    pointer: P,
    out: W,
}

impl<S: ScreenSource, P: Pointer, W: Write> Shell<S, P, W> {
    pub fn new(
        settings: ScanConfig,
        icons_file: PathBuf,
        icons_dir: PathBuf,
        screen: S,
        pointer: P,
        out: W,
    ) -> Self {
        Self {
            settings,
            icons_file,
            icons_dir,
            roi_file: PathBuf::from("roi.png"),
            top_left: None,
            bottom_right: None,
            screen,
            pointer,
            out,
        }
    }

    /// Reads commands until `exit` or end of input.
    ///
    /// Returns an error when a scan cannot start because of its
    /// configuration, or when a running scan loses the screen.
    pub fn run(&mut self, input: impl BufRead) -> Result<()> {
        writeln!(self.out, "== Icon clicker ==")?;
        writeln!(self.out, "{HELP}")?;
        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            let line = line.context("failed to read command")?;
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            if let Flow::Exit = self.execute(command)? {
                return Ok(());
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Pos => match self.pointer.location() {
                Ok((x, y)) => writeln!(self.out, "Pointer at ({x},{y})")?,
                Err(e) => writeln!(self.out, "Cannot read pointer position: {e}")?,
            },
            Command::TopLeft => {
                if let Some((x, y)) = self.corner_from_pointer()? {
                    self.top_left = Some((x, y));
                    writeln!(self.out, "Set TL = ({x},{y})")?;
                }
            }
            Command::BottomRight => {
                if let Some((x, y)) = self.corner_from_pointer()? {
                    self.bottom_right = Some((x, y));
                    writeln!(self.out, "Set BR = ({x},{y})")?;
                }
            }
            Command::ShowRect => {
                if let Some(rect) = self.selection()? {
                    writeln!(
                        self.out,
                        "ICON TL=({},{}) BR=({},{}) size=({}x{})",
                        rect.x,
                        rect.y,
                        i64::from(rect.x) + i64::from(rect.width),
                        i64::from(rect.y) + i64::from(rect.height),
                        rect.width,
                        rect.height
                    )?;
                }
            }
            Command::Save(name) => self.save_selection(name)?,
            Command::Test => self.save_scan_region()?,
            Command::Scan { group, mode } => self.scan(group, mode)?,
            Command::Exit => {
                writeln!(self.out, "Bye!")?;
                return Ok(Flow::Exit);
            }
            Command::Unknown(cmd) => {
                writeln!(self.out, "Unknown command: {cmd} (type 'help' for the list)")?
            }
        }
        Ok(Flow::Continue)
    }

    fn corner_from_pointer(&mut self) -> Result<Option<(i32, i32)>> {
        match self.pointer.location() {
            Ok(pos) => Ok(Some(pos)),
            Err(e) => {
                writeln!(self.out, "Cannot read pointer position: {e}")?;
                Ok(None)
            }
        }
    }

    fn selection(&mut self) -> Result<Option<ScreenRect>> {
        match (self.top_left, self.bottom_right) {
            (Some(tl), Some(br)) => Ok(Some(ScreenRect::from_corners(tl, br))),
            _ => {
                writeln!(self.out, "Both corners are needed first: use tl, then br")?;
                Ok(None)
            }
        }
    }

    fn save_selection(&mut self, name: Option<String>) -> Result<()> {
        let Some(rect) = self.selection()? else {
            return Ok(());
        };
        if rect.is_empty() {
            writeln!(self.out, "Selection is empty (w/h = 0). Set tl and br again.")?;
            return Ok(());
        }
        let filename = png_file_name(name);
        if let Err(e) = fs::create_dir_all(&self.icons_dir) {
            writeln!(self.out, "Cannot create {}: {e}", self.icons_dir.display())?;
            return Ok(());
        }
        let path = self.icons_dir.join(filename);
        match self.screen.capture(rect) {
            Ok(image) => match image.save(&path) {
                Ok(()) => writeln!(
                    self.out,
                    "Saved {} (x={},y={},w={},h={})",
                    path.display(),
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height
                )?,
                Err(e) => writeln!(self.out, "Cannot write {}: {e}", path.display())?,
            },
            Err(e) => writeln!(self.out, "Capture failed: {e}")?,
        }
        Ok(())
    }

    fn save_scan_region(&mut self) -> Result<()> {
        match self.screen.capture(self.settings.region) {
            Ok(image) => match image.save(&self.roi_file) {
                Ok(()) => writeln!(self.out, "Saved scan region to {}", self.roi_file.display())?,
                Err(e) => writeln!(self.out, "Cannot write {}: {e}", self.roi_file.display())?,
            },
            Err(e) => writeln!(self.out, "Capture failed: {e}")?,
        }
        Ok(())
    }

    fn scan(&mut self, group: &str, mode: ScanMode) -> Result<()> {
        writeln!(self.out, "Starting '{group}' scan ({mode:?})")?;
        let groups = load_icon_groups(&self.icons_file)?;
        let targets = load_targets(&groups, group);
        if targets.is_empty() {
            writeln!(self.out, "No usable icons for '{group}'.")?;
            return Ok(());
        }
        Scanner::new(&self.settings, &targets, mode, &mut self.screen, &mut self.pointer)
            .run()
            .with_context(|| format!("'{group}' scan stopped"))
    }
}

/// `name.png`, or a local timestamp when no name is given.
fn png_file_name(name: Option<String>) -> String {
    let name = name.unwrap_or_else(|| Local::now().format("%Y%m%d-%H%M%S%.3f").to_string());
    if name.to_lowercase().ends_with(".png") {
        name
    } else {
        format!("{name}.png")
    }
}

//! Line-oriented command shell
//!
//! Each input line is parsed as one command with clap in multicall mode, so
//! the first word selects the subcommand.

use crate::error::Result;
use clap::{CommandFactory, Parser, Subcommand};
use encore_playback::{Player, TrackLoader};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(multicall = true, disable_help_subcommand = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "snake_case")]
enum Command {
    /// Load a track file and add it to the playlist
    AddTrack {
        file: PathBuf,
        /// Insert position (default: end)
        pos: Option<usize>,
    },
    /// Move a track to another position
    MoveTrack { from: usize, to: usize },
    /// Remove the track at a position
    RemoveTrack { pos: usize },
    /// Show one track
    InfoTrack { pos: usize },
    /// List the playlist
    InfoTracks,
    /// Remove tracks that appear more than once
    RemoveDuplicate,
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Stop playback and rewind
    Stop,
    /// Go to the next track
    Next,
    /// Go to the previous track
    Previous,
    /// Select the track at a position
    Select { pos: usize },
    /// Turn repeat mode on or off
    SetRepeat {
        #[arg(value_parser = parse_switch, action = clap::ArgAction::Set)]
        value: bool,
    },
    /// Turn random mode on or off
    SetRandom {
        #[arg(value_parser = parse_switch, action = clap::ArgAction::Set)]
        value: bool,
    },
    /// Show the player state
    Status,
    /// List the commands
    Help,
    /// Leave the shell
    Exit,
}

fn parse_switch(value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(format!("expected 1/0, true/false or on/off, got '{}'", value)),
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Interactive front end translating text commands into player operations
pub struct Shell<'a> {
    player: &'a Player,
    loader: &'a dyn TrackLoader,
}

impl<'a> Shell<'a> {
    pub fn new(player: &'a Player, loader: &'a dyn TrackLoader) -> Self {
        Self { player, loader }
    }

    /// Read commands until `exit` or end of input
    pub fn run<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> Result<()> {
        writeln!(output, "Encore player")?;
        self.show_help(output)?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            if let Flow::Exit = self.execute(&line, output)? {
                break;
            }
            output.flush()?;
        }

        writeln!(output, "Bye.")?;
        output.flush()?;
        Ok(())
    }

    fn execute<W: Write>(&self, line: &str, output: &mut W) -> Result<Flow> {
        let command = match Line::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(output, "{}", e)?;
                return Ok(Flow::Continue);
            }
        };
        debug!("Shell command: {:?}", command);

        match command {
            Command::AddTrack { file, pos } => {
                if let Err(e) = self.player.add_from(self.loader, &file, pos) {
                    writeln!(output, "{}", e)?;
                }
            }
            Command::MoveTrack { from, to } => {
                if !self.player.move_track(from, to) {
                    writeln!(output, "Invalid position")?;
                }
            }
            Command::RemoveTrack { pos } => {
                if self.player.remove(pos).is_none() {
                    writeln!(output, "Invalid position")?;
                }
            }
            Command::InfoTrack { pos } => match self.player.track(pos) {
                Some(track) => writeln!(output, "{}", track)?,
                None => writeln!(output, "Invalid position")?,
            },
            Command::InfoTracks => writeln!(output, "{}", self.player.describe_tracks())?,
            Command::RemoveDuplicate => self.player.remove_duplicates(),
            Command::Play => self.player.play(),
            Command::Pause => self.player.pause(),
            Command::Stop => self.player.stop(),
            Command::Next => self.player.next(),
            Command::Previous => self.player.previous(),
            Command::Select { pos } => {
                if !self.player.select(pos) {
                    writeln!(output, "Cannot select track {}", pos)?;
                }
            }
            Command::SetRepeat { value } => self.player.set_repeat_mode(value),
            Command::SetRandom { value } => self.player.set_random_mode(value),
            Command::Status => self.show_status(output)?,
            Command::Help => self.show_help(output)?,
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn show_help<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output, "Commands are:")?;
        let line = Line::command();
        for command in line.get_subcommands() {
            let args: String = command
                .get_positionals()
                .map(|arg| {
                    let name = arg.get_id().as_str();
                    if arg.is_required_set() {
                        format!(" ${}", name)
                    } else {
                        format!(" (${})", name)
                    }
                })
                .collect();
            writeln!(output, "- {}{}", command.get_name(), args)?;
        }
        Ok(())
    }

    fn show_status<W: Write>(&self, output: &mut W) -> Result<()> {
        let status = self.player.status();
        let switch = |value: bool| if value { "on" } else { "off" };

        writeln!(
            output,
            "State: {}",
            if status.playing { "playing" } else { "stopped" }
        )?;
        match (status.selection, status.track) {
            (Some(index), Some(track)) => {
                writeln!(output, "Track: {} - {}", index, track.title)?;
            }
            _ => writeln!(output, "Track: none")?,
        }
        writeln!(output, "Elapsed: {}s", status.elapsed.as_secs())?;
        writeln!(output, "Repeat: {}", switch(status.repeat))?;
        writeln!(output, "Random: {}", switch(status.random))?;
        writeln!(output, "Tracks: {}", status.len)?;
        Ok(())
    }
}

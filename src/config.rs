//! Configuration and CLI argument handling

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, ValueEnum};

use crate::{
    audio::{default_player_command, BellCuePlayer, CuePlayer, SilentCuePlayer, SystemCuePlayer},
    state::TimerConfig,
};

/// Language of the phase labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    En,
    Ko,
}

/// Output format of the terminal display
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DisplayFormat {
    /// One self-overwriting line
    Line,
    /// One JSON object per update
    Json,
}

/// Strings shown next to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSet {
    pub idle: &'static str,
    pub work: &'static str,
    pub rest: &'static str,
    pub unit: &'static str,
}

impl LabelSet {
    pub fn english() -> Self {
        Self {
            idle: "Stopped",
            work: "Work!",
            rest: "Get ready...",
            unit: "s",
        }
    }

    pub fn korean() -> Self {
        Self {
            idle: "정지",
            work: "작업!",
            rest: "준비...",
            unit: "초",
        }
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => Self::english(),
            Language::Ko => Self::korean(),
        }
    }
}

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "interval-timer")]
#[command(about = "A work/rest interval timer with audio cues and an HTTP control API")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Number of work repetitions
    #[arg(short, long, default_value = "4", allow_negative_numbers = true)]
    pub loops: i64,

    /// Work phase length in seconds
    #[arg(short, long, default_value = "10", allow_negative_numbers = true)]
    pub work: f64,

    /// Rest length between loops in seconds
    #[arg(short, long, default_value = "3", allow_negative_numbers = true)]
    pub rest: f64,

    /// Directory holding start-work.mp3, stop-work.mp3, pause.mp3 and finish.mp3
    #[arg(long)]
    pub sounds: Option<PathBuf>,

    /// Audio player command; cue data is written to its stdin
    #[arg(long)]
    pub player: Option<String>,

    /// Disable all audio cues
    #[arg(long)]
    pub mute: bool,

    /// Render the countdown in the terminal
    #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "line")]
    pub display: Option<DisplayFormat>,

    /// Label language
    #[arg(long, value_enum, default_value = "en")]
    pub lang: Language,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial timer configuration from the command line
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::new(self.loops, self.work, self.rest)
    }

    pub fn labels(&self) -> LabelSet {
        LabelSet::for_language(self.lang)
    }

    pub fn player_command(&self) -> String {
        self.player
            .clone()
            .unwrap_or_else(|| default_player_command().to_string())
    }

    /// Build the cue player selected by the audio flags
    pub fn cue_player(&self) -> Arc<dyn CuePlayer> {
        if self.mute {
            return Arc::new(SilentCuePlayer);
        }
        match &self.sounds {
            Some(dir) => Arc::new(SystemCuePlayer::new(self.player_command(), dir.clone())),
            None => Arc::new(BellCuePlayer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_configuration() {
        let config = Config::try_parse_from(["interval-timer"]).expect("parse");
        assert_eq!(config.timer_config(), TimerConfig::new(4, 10.0, 3.0));
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.labels(), LabelSet::english());
    }

    #[test]
    fn parses_timer_and_audio_flags() {
        let config = Config::try_parse_from([
            "interval-timer",
            "-l", "2",
            "-w", "1.5",
            "-r", "0",
            "--sounds", "/tmp/cues",
            "--player", "mpv",
            "--lang", "ko",
            "-v",
        ])
        .expect("parse");

        assert_eq!(config.timer_config(), TimerConfig::new(2, 1.5, 0.0));
        assert_eq!(config.sounds, Some(PathBuf::from("/tmp/cues")));
        assert_eq!(config.player_command(), "mpv");
        assert_eq!(config.labels(), LabelSet::korean());
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn display_flag_defaults_to_line_format() {
        let config = Config::try_parse_from(["interval-timer"]).expect("parse");
        assert_eq!(config.display, None);

        let config = Config::try_parse_from(["interval-timer", "--display"]).expect("parse");
        assert_eq!(config.display, Some(DisplayFormat::Line));

        let config = Config::try_parse_from(["interval-timer", "--display", "json"]).expect("parse");
        assert_eq!(config.display, Some(DisplayFormat::Json));
    }

    #[test]
    fn accepts_non_positive_values_for_start_guard() {
        let config = Config::try_parse_from(["interval-timer", "--loops", "0", "--work", "-1"])
            .expect("parse");
        assert!(!config.timer_config().is_startable());
    }
}

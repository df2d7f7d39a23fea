//! # Renderer configuration

mod folder;

pub use folder::{Folder, Location, PathValidity};

use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use displaydoc::Display;
use serde::{de, Deserialize, Deserializer};
use std::fmt::Display as FmtDisplay;
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;
use thiserror::Error;
use tokio::fs::read_to_string;
use tracing::instrument;

/// The commandline flags for the renderer
#[derive(Debug, StructOpt)]
pub struct Flags {
    /// Which config file to use
    #[structopt(long = "cfg", short = "c")]
    pub cfg: Option<PathBuf>,
    /// What to do
    #[structopt(subcommand)]
    pub cmd: Cmd,
}

/// The subcommands of the renderer
#[derive(Debug, StructOpt)]
pub enum Cmd {
    /// Render a single document from a file or stdin
    Render {
        /// The document to render (stdin if missing)
        #[structopt(parse(from_os_str))]
        file: Option<PathBuf>,
        /// Print `{"html": ...}` instead of the bare markup
        #[structopt(long = "json")]
        json: bool,
        /// Skip escaping and URL checks
        #[structopt(long = "legacy")]
        legacy: bool,
    },
    /// Render the document at a path like `/tours/alpine` in the folder tree
    Resolve {
        /// The document path
        path: String,
        /// Print `{"html": ...}` instead of the bare markup
        #[structopt(long = "json")]
        json: bool,
        /// Skip escaping and URL checks
        #[structopt(long = "legacy")]
        legacy: bool,
    },
    /// Render every document in the folder tree
    Batch,
}

/// How much the renderer trusts its input
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Escape text and attributes, check URLs and colors
    Sanitize,
    /// Interpolate everything as-is
    Legacy,
}

impl Default for OutputMode {
    fn default() -> Self {
        Self::Sanitize
    }
}

/// Error when parsing an output mode
#[derive(Debug, Error, Display)]
pub enum ParseModeError {
    /// Unknown output mode `{0}`, expected `sanitize` or `legacy`
    Unknown(String),
}

impl FromStr for OutputMode {
    type Err = ParseModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sanitize" => Ok(Self::Sanitize),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ParseModeError::Unknown(s.to_owned())),
        }
    }
}

/// The options for rendering
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Whether to escape and validate interpolated values
    #[serde(deserialize_with = "deserialize_from_str")]
    pub mode: OutputMode,
    /// The URL schemes allowed in `href` and `src`
    pub allowed_schemes: Vec<String>,
    /// Rendered for missing or empty input
    pub empty_placeholder: String,
    /// Rendered for a document without an entry point
    pub invalid_placeholder: String,
    /// The link target if a link mark doesn't set one
    pub link_target: String,
    /// The link rel if a link mark doesn't set one
    pub link_rel: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::Sanitize,
            allowed_schemes: ["http", "https", "mailto", "tel"]
                .iter()
                .map(|s| String::from(*s))
                .collect(),
            empty_placeholder: String::from("No content available"),
            invalid_placeholder: String::from("Invalid document structure"),
            link_target: String::from("_blank"),
            link_rel: String::from("noopener noreferrer nofollow"),
        }
    }
}

/// The batch options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// The directory to read documents from
    pub source: PathBuf,
    /// The directory to write HTML to
    pub output: PathBuf,
    /// How many documents to render at once
    pub concurrency: usize,
    /// The folder tree below `source`
    pub folder: Folder,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from("content"),
            output: PathBuf::from("public"),
            concurrency: 4,
            folder: Folder::default(),
        }
    }
}

impl BatchOptions {
    /// The location of the root folder
    pub fn root(&self) -> Location {
        Location::new(self.source.clone(), self.output.clone())
    }
}

/// A configuration for the system
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// The render options
    #[serde(default)]
    pub render: RenderOptions,
    /// The batch options
    #[serde(default)]
    pub batch: BatchOptions,
}

impl Flags {
    #[instrument]
    /// Load the configuration from a file
    pub async fn load_cfg(&self) -> Result<Config, Report> {
        let mut config = if let Some(cfg) = &self.cfg {
            let cfg_string: String = read_to_string(cfg)
                .await
                .wrap_err("Could not read config file")?;
            toml::from_str(&cfg_string).wrap_err("Could not parse config file")?
        } else {
            Config::default()
        };
        if let Cmd::Render { legacy: true, .. } | Cmd::Resolve { legacy: true, .. } = self.cmd {
            config.render.mode = OutputMode::Legacy;
        }
        Ok(config)
    }
}

// You can use this deserializer for any type that implements FromStr
// and the FromStr::Err implements Display
fn deserialize_from_str<'de, S, D>(deserializer: D) -> Result<S, D::Error>
where
    S: FromStr,         // Required for S::from_str...
    S::Err: FmtDisplay, // Required for .map_err(de::Error::custom)
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    S::from_str(&s).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::{Cmd, Config, Flags, OutputMode, RenderOptions};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render, RenderOptions::default());
        assert_eq!(config.batch.concurrency, 4);
        assert_eq!(config.batch.source, PathBuf::from("content"));
    }

    #[test]
    fn test_parse() {
        let config: Config = toml::from_str(
            r#"
            [render]
            mode = "legacy"
            empty_placeholder = "Nothing here yet"

            [batch]
            source = "docs"
            output = "site"
            concurrency = 8

            [batch.folder.sub.tours]
            save_dir = "site/trips"
            "#,
        )
        .unwrap();
        assert_eq!(config.render.mode, OutputMode::Legacy);
        assert_eq!(config.render.empty_placeholder, "Nothing here yet");
        assert_eq!(
            config.render.invalid_placeholder,
            "Invalid document structure"
        );
        assert_eq!(config.batch.concurrency, 8);
        assert_eq!(config.batch.output, PathBuf::from("site"));
    }

    #[test]
    fn test_bad_mode() {
        let err = toml::from_str::<Config>("[render]\nmode = \"loose\"").unwrap_err();
        assert!(err.to_string().contains("Unknown output mode `loose`"));
    }

    #[tokio::test]
    async fn test_load_cfg() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nlink_target = \"_self\"").unwrap();

        let flags = Flags {
            cfg: Some(file.path().to_owned()),
            cmd: Cmd::Render {
                file: None,
                json: false,
                legacy: true,
            },
        };
        let config = flags.load_cfg().await.unwrap();
        assert_eq!(config.render.link_target, "_self");
        assert_eq!(config.render.mode, OutputMode::Legacy);
    }

    #[tokio::test]
    async fn test_legacy_flag() {
        let resolve = |legacy| Flags {
            cfg: None,
            cmd: Cmd::Resolve {
                path: String::from("/tours/alpine"),
                json: false,
                legacy,
            },
        };
        let config = resolve(true).load_cfg().await.unwrap();
        assert_eq!(config.render.mode, OutputMode::Legacy);
        let config = resolve(false).load_cfg().await.unwrap();
        assert_eq!(config.render.mode, OutputMode::Sanitize);
    }

    #[tokio::test]
    async fn test_missing_cfg() {
        let flags = Flags {
            cfg: Some(PathBuf::from("/nonexistent/richtext-render.toml")),
            cmd: Cmd::Batch,
        };
        let report = flags.load_cfg().await.unwrap_err();
        assert_eq!(report.to_string(), "Could not read config file");
    }
}

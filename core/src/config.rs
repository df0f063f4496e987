use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

pub const DEFAULT_BATCH_SIZE: u32 = 40;
pub const DEFAULT_EXTRACT_CHARS: u32 = 1000;
pub const DEFAULT_THUMB_SIZE: u32 = 400;
pub const DEFAULT_INTRO_SENTENCES: u32 = 5;
pub const DEFAULT_PREFETCH_SCREENS: u16 = 2;

#[derive(Debug, Clone)]
pub struct Config {
    /// Wikipedia language edition, e.g. `en`
    pub language: String,
    /// Host used for canonical and article URLs, e.g. `en.wikipedia.org`
    pub wiki_host: String,
    /// Query API endpoint
    pub api_url: String,
    /// Random pages requested per batch
    pub batch_size: u32,
    /// Character cap for the short extract shown in the feed
    pub extract_chars: u32,
    /// Max thumbnail dimension in pixels
    pub thumb_size: u32,
    /// Sentence cap for the per-card intro
    pub intro_sentences: u32,
    /// How many screens below the viewport the sentinel is observed
    pub prefetch_screens: u16,
    pub user_agent: String,
    /// External command used as the share capability; sharing falls back
    /// to the clipboard when unset
    pub share_command: Option<String>,
    /// Browser command for opening articles; platform opener when unset
    pub browser: Option<String>,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let language = lookup("WIKITOK_LANGUAGE")
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "en".to_string());

        if !language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(AppError::Config(format!(
                "WIKITOK_LANGUAGE must be a language code, got {:?}",
                language
            )));
        }

        let wiki_host = format!("{}.wikipedia.org", language);
        let api_url = lookup("WIKITOK_API_URL")
            .unwrap_or_else(|| format!("https://{}/w/api.php", wiki_host));

        Ok(Self {
            api_url,
            batch_size: parse_or(&lookup, "WIKITOK_BATCH_SIZE", DEFAULT_BATCH_SIZE),
            extract_chars: parse_or(&lookup, "WIKITOK_EXTRACT_CHARS", DEFAULT_EXTRACT_CHARS),
            thumb_size: parse_or(&lookup, "WIKITOK_THUMB_SIZE", DEFAULT_THUMB_SIZE),
            intro_sentences: parse_or(
                &lookup,
                "WIKITOK_INTRO_SENTENCES",
                DEFAULT_INTRO_SENTENCES,
            ),
            prefetch_screens: parse_or(
                &lookup,
                "WIKITOK_PREFETCH_SCREENS",
                DEFAULT_PREFETCH_SCREENS,
            ),
            user_agent: lookup("WIKITOK_USER_AGENT")
                .unwrap_or_else(|| format!("wikitok/{}", env!("CARGO_PKG_VERSION"))),
            share_command: lookup("WIKITOK_SHARE_COMMAND").filter(|c| !c.trim().is_empty()),
            browser: lookup("WIKITOK_BROWSER").filter(|c| !c.trim().is_empty()),
            log_file: lookup("WIKITOK_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("wikitok.log")),
            language,
            wiki_host,
        })
    }
}

/// Parse a positive number, falling back to the default with a warning
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) if value > T::default() => value,
            _ => {
                tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
                default
            }
        },
    }
}

//! Localized player messages.
//!
//! Messages are registered per locale under a [`MessageKey`]. Lookups fall back to the
//! default locale, then to the key name itself, so a missing translation never hides a
//! denial from the player.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::ports::{Messenger, PortError};

pub const DEFAULT_LOCALE: &str = "en";

/// Keys of every message this plugin sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    CannotBuildInCave,
    CannotBuildUnderRockFormation,
}

impl MessageKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CannotBuildInCave => "CannotBuildInCave",
            Self::CannotBuildUnderRockFormation => "CannotBuildUnderRockFormation",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message templates keyed by locale, then by message key.
#[derive(Debug, Clone)]
pub struct Lang {
    messages: HashMap<String, HashMap<MessageKey, String>>,
}

impl Lang {
    /// An empty catalog with no locales registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            messages: HashMap::new(),
        }
    }

    /// Registers (or overrides) templates for `locale`.
    pub fn register_messages<I, S>(&mut self, locale: &str, messages: I)
    where
        I: IntoIterator<Item = (MessageKey, S)>,
        S: Into<String>,
    {
        let table = self.messages.entry(locale.to_lowercase()).or_default();
        for (key, template) in messages {
            table.insert(key, template.into());
        }
    }

    /// Renders `key` for `locale`, substituting `{0}`, `{1}`, ... with `args`.
    #[must_use]
    pub fn get_message(&self, key: MessageKey, locale: Option<&str>, args: &[&str]) -> String {
        let template = locale
            .and_then(|l| self.lookup(&l.to_lowercase(), key))
            .or_else(|| self.lookup(DEFAULT_LOCALE, key))
            .unwrap_or_else(|| key.as_str());
        fill_placeholders(template, args)
    }

    fn lookup(&self, locale: &str, key: MessageKey) -> Option<&str> {
        self.messages
            .get(locale)
            .and_then(|table| table.get(&key))
            .map(String::as_str)
    }
}

impl Default for Lang {
    fn default() -> Self {
        let mut lang = Self::empty();
        lang.register_messages(
            DEFAULT_LOCALE,
            [
                (MessageKey::CannotBuildInCave, "You cannot build inside caves."),
                (
                    MessageKey::CannotBuildUnderRockFormation,
                    "You cannot build under rock formations.",
                ),
            ],
        );
        lang
    }
}

fn fill_placeholders(template: &str, args: &[&str]) -> String {
    if args.is_empty() {
        return template.to_owned();
    }
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((close, *args.get(index)?))
        });
        match arg {
            Some((close, arg)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Host chat delivery used by [`LangMessenger`].
pub trait ChatSink: Send + Sync {
    /// The player's client locale, if known.
    fn locale(&self, player: Uuid) -> Option<String>;

    fn send_message(&self, player: Uuid, text: &str) -> Result<(), PortError>;
}

/// [`Messenger`] that renders through a [`Lang`] catalog and delivers over chat.
pub struct LangMessenger {
    lang: Lang,
    chat: Arc<dyn ChatSink>,
}

impl LangMessenger {
    #[must_use]
    pub fn new(lang: Lang, chat: Arc<dyn ChatSink>) -> Self {
        Self { lang, chat }
    }
}

impl Messenger for LangMessenger {
    fn notify(&self, player: Uuid, key: MessageKey) -> Result<(), PortError> {
        let locale = self.chat.locale(player);
        let text = self.lang.get_message(key, locale.as_deref(), &[]);
        self.chat.send_message(player, &text)
    }
}

//! Notification message value type and presentation hints.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Interruption level hint (honoured by Bark)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    /// Lights up the screen immediately
    Active,
    /// Breaks through focus modes
    #[value(name = "timeSensitive", alias = "time-sensitive")]
    TimeSensitive,
    /// Added to the notification list silently
    Passive,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Active => "active",
            Level::TimeSensitive => "timeSensitive",
            Level::Passive => "passive",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! sounds {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Notification sound hint (honoured by Bark)
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
        pub enum Sound {
            $(
                #[serde(rename = $name)]
                #[value(name = $name)]
                $variant,
            )+
        }

        impl Sound {
            /// Every sound in the catalogue
            pub const ALL: &'static [Sound] = &[$(Sound::$variant),+];

            /// Wire name of the sound
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Sound::$variant => $name,)+
                }
            }
        }
    };
}

sounds! {
    Alarm => "alarm",
    Anticipate => "anticipate",
    Bell => "bell",
    Birdsong => "birdsong",
    Bloom => "bloom",
    Calypso => "calypso",
    Chime => "chime",
    Choo => "choo",
    Descent => "descent",
    Electronic => "electronic",
    Fanfare => "fanfare",
    Glass => "glass",
    GoToSleep => "gotosleep",
    HealthNotification => "healthnotification",
    Horn => "horn",
    Ladder => "ladder",
    MailSent => "mailsent",
    Minuet => "minuet",
    MultiwayInvitation => "multiwayinvitation",
    NewMail => "newmail",
    NewsFlash => "newsflash",
    Noir => "noir",
    PaymentSuccess => "paymentsuccess",
    Shake => "shake",
    SherwoodForest => "sherwoodforest",
    Silence => "silence",
    Spell => "spell",
    Suspense => "suspense",
    Telegraph => "telegraph",
    Tiptoes => "tiptoes",
    Typewriters => "typewriters",
    Update => "update",
}

impl std::fmt::Display for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message handed to every enabled provider
///
/// Only `title` and `content` are universal; the remaining fields are hints
/// that providers without a matching concept ignore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub title: String,
    pub content: String,
    pub level: Option<Level>,
    pub sound: Option<Sound>,
    pub group: Option<String>,
    pub url: Option<String>,
}

impl NotificationMessage {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            level: None,
            sound: None,
            group: None,
            url: None,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_sound(mut self, sound: Sound) -> Self {
        self.sound = Some(sound);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

//! Light/dark appearance shared by every view.
//!
//! # Responsibility
//! - Hold the active `ColorScheme` in one injectable handle.
//! - Notify subscribed views when the scheme changes.
//!
//! # Invariants
//! - `set_color_scheme` is the only mutation path.
//! - Re-setting the current scheme does not wake subscribers.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &LIGHT_PALETTE,
            Self::Dark => &DARK_PALETTE,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for ColorScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized color scheme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColorScheme(pub String);

impl Display for UnknownColorScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown color scheme `{}`; expected light|dark", self.0)
    }
}

impl Error for UnknownColorScheme {}

impl FromStr for ColorScheme {
    type Err = UnknownColorScheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(UnknownColorScheme(other.to_string())),
        }
    }
}

/// Named colors for one scheme, as hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: &'static str,
    pub background: &'static str,
    pub border: &'static str,
    pub button: &'static str,
    /// Completed item text.
    pub muted: &'static str,
}

pub const LIGHT_PALETTE: Palette = Palette {
    text: "#11181C",
    background: "#FFFFFF",
    border: "#11181C",
    button: "#11181C",
    muted: "#808080",
};

pub const DARK_PALETTE: Palette = Palette {
    text: "#ECEDEE",
    background: "#000000",
    border: "#ECEDEE",
    button: "#ECEDEE",
    muted: "#808080",
};

/// Shared appearance configuration, cloned into each view at startup.
#[derive(Debug, Clone)]
pub struct ThemeHandle {
    sender: Arc<watch::Sender<ColorScheme>>,
}

impl ThemeHandle {
    pub fn new(initial: ColorScheme) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn color_scheme(&self) -> ColorScheme {
        *self.sender.borrow()
    }

    pub fn palette(&self) -> &'static Palette {
        self.color_scheme().palette()
    }

    /// Switches the active scheme.
    ///
    /// Returns `true` when the scheme changed and subscribers were notified.
    pub fn set_color_scheme(&self, scheme: ColorScheme) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == scheme {
                return false;
            }
            *current = scheme;
            true
        });
        if changed {
            log::info!("event=theme_change module=theme status=ok scheme={scheme}");
        }
        changed
    }

    /// Returns a receiver woken on every scheme change.
    pub fn subscribe(&self) -> watch::Receiver<ColorScheme> {
        self.sender.subscribe()
    }
}

impl Default for ThemeHandle {
    fn default() -> Self {
        Self::new(ColorScheme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorScheme, ThemeHandle, DARK_PALETTE};

    #[test]
    fn parses_scheme_names_case_insensitively() {
        assert_eq!(" Dark ".parse::<ColorScheme>().unwrap(), ColorScheme::Dark);
        assert!("sepia".parse::<ColorScheme>().is_err());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let theme = ThemeHandle::default();
        let mut view = theme.subscribe();

        assert!(theme.set_color_scheme(ColorScheme::Dark));
        view.changed().await.unwrap();
        assert_eq!(*view.borrow_and_update(), ColorScheme::Dark);
        assert_eq!(theme.palette(), &DARK_PALETTE);
    }

    #[test]
    fn setting_same_scheme_does_not_notify() {
        let theme = ThemeHandle::new(ColorScheme::Light);
        let view = theme.subscribe();

        assert!(!theme.set_color_scheme(ColorScheme::Light));
        assert!(!view.has_changed().unwrap());
    }

    #[test]
    fn clones_share_one_setting() {
        let theme = ThemeHandle::default();
        let other_view = theme.clone();
        theme.set_color_scheme(theme.color_scheme().toggled());
        assert_eq!(other_view.color_scheme(), ColorScheme::Dark);
    }
}

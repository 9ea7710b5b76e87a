//! Glyphs with Unicode and ASCII fallback.

/// Glyph mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconMode {
    /// Unicode symbols.
    #[default]
    Unicode,
    /// ASCII-only fallback, also used with `NO_COLOR`.
    Ascii,
}

impl IconMode {
    /// Pick the mode from the environment, respecting `NO_COLOR`.
    pub fn from_env() -> Self {
        Self::detect(std::env::var_os("NO_COLOR").is_some())
    }

    fn detect(no_color: bool) -> Self {
        if no_color {
            Self::Ascii
        } else {
            Self::Unicode
        }
    }
}

/// Glyph set for the configured mode.
#[derive(Debug, Clone)]
pub struct IconSet {
    mode: IconMode,
}

impl Default for IconSet {
    fn default() -> Self {
        Self::new(IconMode::default())
    }
}

impl IconSet {
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    pub fn new_chat(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "✚",
            IconMode::Ascii => "+",
        }
    }

    pub fn user(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "▍",
            IconMode::Ascii => "|",
        }
    }

    pub fn assistant(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "◆",
            IconMode::Ascii => "*",
        }
    }

    /// Dot of the typing indicator, lit or unlit.
    pub fn dot(&self, lit: bool) -> &'static str {
        match (self.mode, lit) {
            (IconMode::Unicode, true) => "●",
            (IconMode::Unicode, false) => "○",
            (IconMode::Ascii, true) => "o",
            (IconMode::Ascii, false) => ".",
        }
    }

    pub fn separator(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => " │ ",
            IconMode::Ascii => " | ",
        }
    }

    pub fn ellipsis(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "…",
            IconMode::Ascii => "...",
        }
    }

    /// Sidebar toggle in the header.
    pub fn menu(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "[≡]",
            IconMode::Ascii => "[=]",
        }
    }

    /// Marks newer transcript lines below the view.
    pub fn down_arrow(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "↓",
            IconMode::Ascii => "v",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_selects_ascii() {
        assert_eq!(IconMode::detect(true), IconMode::Ascii);
        assert_eq!(IconMode::detect(false), IconMode::Unicode);
    }

    #[test]
    fn test_ascii_glyphs_are_ascii() {
        let icons = IconSet::new(IconMode::Ascii);
        for glyph in [
            icons.new_chat(),
            icons.user(),
            icons.assistant(),
            icons.dot(true),
            icons.dot(false),
            icons.separator(),
            icons.ellipsis(),
            icons.menu(),
            icons.down_arrow(),
        ] {
            assert!(glyph.is_ascii(), "{glyph:?} is not ASCII");
        }
    }

    #[test]
    fn test_dots_differ_when_lit() {
        let icons = IconSet::default();
        assert_ne!(icons.dot(true), icons.dot(false));
    }
}

//! Terminal output: rich markdown via termimad, plain text, or JSON.

use std::fmt::Display;

use anyhow::Result;
use serde::Serialize;
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to the terminal.
    pub fn render(&self, markdown: &str) {
        if self.rich_enabled {
            self.skin.print_text(markdown);
        } else {
            print!("{markdown}");
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Chooses between markdown and JSON for every command result.
pub struct Output {
    renderer: TerminalRenderer,
    json: bool,
}

impl Output {
    pub fn new(renderer: TerminalRenderer, json: bool) -> Self {
        Self { renderer, json }
    }

    /// Prints `text` as markdown, or `data` as pretty JSON in `--json` mode.
    pub fn emit<T, D>(&self, text: &T, data: &D) -> Result<()>
    where
        T: Display + ?Sized,
        D: Serialize + ?Sized,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(data)?);
        } else {
            self.renderer.render(&text.to_string());
        }
        Ok(())
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

use std::sync::OnceLock;

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use supports_color::Stream;

fn stdout_colors() -> bool {
    static COLORS: OnceLock<bool> = OnceLock::new();
    *COLORS.get_or_init(|| supports_color::on(Stream::Stdout).is_some())
}

pub fn highlight(text: &str) -> String {
    if stdout_colors() {
        text.bold().cyan().to_string()
    } else {
        text.to_string()
    }
}

pub fn success(text: &str) -> String {
    if stdout_colors() {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

pub fn failure(text: &str) -> String {
    if stdout_colors() {
        text.red().to_string()
    } else {
        text.to_string()
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

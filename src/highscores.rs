//! Persist the best score to disk (XDG config or ~/.config/matchtui).

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

const FILENAME: &str = "highscore";

/// Returns the path to the best-score file (config dir / matchtui / highscore).
fn config_path() -> PathBuf {
    let home_config = || {
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from("."))
    };
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => home_config(),
    };
    base.join("matchtui").join(FILENAME)
}

/// First line as a score; anything unreadable counts as 0.
fn parse_best(content: &str) -> u32 {
    content
        .lines()
        .next()
        .and_then(|l| l.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Load the best score. Returns 0 on missing file or parse error.
pub fn load_best() -> u32 {
    match fs::read_to_string(config_path()) {
        Ok(content) => parse_best(&content),
        Err(_) => 0,
    }
}

/// Save the best score. Creates config directory if needed.
pub fn save_best(score: u32) -> Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, format!("{score}\n"))?;
    log::info!("saved best score {} to {}", score, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_best() {
        assert_eq!(parse_best("1230\n"), 1230);
        assert_eq!(parse_best("  45  "), 45);
        assert_eq!(parse_best("oops"), 0);
        assert_eq!(parse_best(""), 0);
    }
}

//! QR codes as terminal text
//!
//! Each output line packs two module rows using half blocks, so the code
//! keeps a roughly square shape in a terminal cell grid. Dark modules are
//! drawn as blank space and light modules as blocks, which reads correctly
//! on dark terminal backgrounds.

use anyhow::{Context, Result};
use qrcode::{Color, QrCode};

/// Light modules around the symbol
const QUIET_ZONE: usize = 2;

const FULL: char = '█';
const UPPER: char = '▀';
const LOWER: char = '▄';
const EMPTY: char = ' ';

/// Render `content` as QR lines
pub fn render_lines(content: &str) -> Result<Vec<String>> {
    let code = QrCode::new(content.as_bytes()).context("Content does not fit in a QR code")?;
    let width = code.width();
    let colors = code.to_colors();

    let size = width + 2 * QUIET_ZONE;
    let light = |x: usize, y: usize| -> bool {
        if x < QUIET_ZONE || y < QUIET_ZONE || x >= width + QUIET_ZONE || y >= width + QUIET_ZONE {
            return true;
        }
        colors[(y - QUIET_ZONE) * width + (x - QUIET_ZONE)] == Color::Light
    };

    let lines = (0..size)
        .step_by(2)
        .map(|y| {
            (0..size)
                .map(|x| {
                    let top = light(x, y);
                    // odd sizes end with a lone row; pad with quiet zone
                    let bottom = y + 1 >= size || light(x, y + 1);
                    match (top, bottom) {
                        (true, true) => FULL,
                        (true, false) => UPPER,
                        (false, true) => LOWER,
                        (false, false) => EMPTY,
                    }
                })
                .collect()
        })
        .collect();

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn test_dimensions() {
        let lines = render_lines("https://github.com/login/device").unwrap();
        let width = lines[0].width();
        assert!(lines.iter().all(|l| l.width() == width));
        // half as many lines as columns, rounded up
        assert_eq!(lines.len(), width.div_ceil(2));
    }

    #[test]
    fn test_quiet_zone_is_light() {
        let lines = render_lines("octocat").unwrap();
        assert!(lines[0].chars().all(|c| c == FULL));
        let last = lines.last().unwrap();
        assert!(last.chars().all(|c| c == FULL || c == UPPER));
        assert!(lines.iter().all(|l| l.starts_with(FULL) && l.ends_with(FULL)));
    }

    #[test]
    fn test_finder_pattern_is_dark() {
        // row 2 (line 1, top half) at column 2 is the finder's dark corner
        let lines = render_lines("octocat").unwrap();
        let c = lines[1].chars().nth(QUIET_ZONE).unwrap();
        assert!(c == EMPTY || c == LOWER);
    }

    #[test]
    fn test_too_long_content() {
        let huge = "x".repeat(8000);
        assert!(render_lines(&huge).is_err());
    }
}

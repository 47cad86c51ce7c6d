//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::{Color, Colorize};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print disabled status (dimmed X)
pub fn disabled(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✗".dimmed(), msg);
}

/// Print labelled value (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print a line prefixed by a swatch in a `#rrggbb` colour.
///
/// Unparseable colours fall back to an uncoloured swatch.
pub fn swatch(hex: Option<&str>, msg: &(impl std::fmt::Display + ?Sized)) {
    let block = "■";
    match hex.and_then(parse_hex) {
        Some(colour) => println!("{} {}", block.color(colour), msg),
        None => println!("{} {}", block, msg),
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some(Color::TrueColor {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_brand_colour_when_parsing_then_true_colour() {
        assert_eq!(
            parse_hex("#38bdf8"),
            Some(Color::TrueColor {
                r: 0x38,
                g: 0xbd,
                b: 0xf8
            })
        );
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("38bdf8"), None);
    }
}

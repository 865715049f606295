//! Text formatting helpers for the console views

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, c) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

/// Upper-case initials of a display name, used when no avatar is available
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Cut `text` to at most `width` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Left-align `text` in a column of `width` characters
pub fn pad(text: &str, width: usize) -> String {
    let cell = truncate(text, width);
    let fill = width.saturating_sub(cell.chars().count());
    format!("{}{}", cell, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1200), "1,200");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-48000), "-48,000");
        assert_eq!(format_number("12500.50"), "12,500.50");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ricardo Mathew"), "RM");
        assert_eq!(initials("  emma   davis "), "ED");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("ricardomathew@gmail.com", 10), "ricardoma…");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("short", 0), "");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abc…");
    }
}

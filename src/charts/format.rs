//! Tick and annotation label formatting.

/// `$1,234`: thousands separators, no decimals.
pub fn format_currency(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, digit) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0.0 && rounded != "0" {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// `$12000`: dollar sign, no separators, no decimals.
pub fn format_dollars(value: f64) -> String {
    format!("${value:.0}")
}

/// Compact number: whole values without decimals, otherwise up to two.
pub fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Category name for a tick sitting on an integer position, blank otherwise.
pub fn category_tick_label(categories: &[String], position: f64) -> String {
    let idx = position.round();
    if (position - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

/// Whole-number ticks only, e.g. years on a continuous axis.
pub fn integer_tick_label(position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 {
        return String::new();
    }
    format!("{rounded:.0}")
}

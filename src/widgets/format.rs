//! Display formatting shared by the widgets.

/// `$1,234,567` style amount, rounded to whole units.
pub fn currency(amount: f64) -> String {
    format!("${}", group_thousands(amount))
}

/// Thousands-separated integer rendering of a finite amount.
pub fn group_thousands(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative { format!("-{out}") } else { out }
}

/// Compact notation with at most one fractional digit: `$250K`, `$1.2M`.
pub fn compact_currency(amount: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    let value = if amount.is_finite() { amount } else { 0.0 };
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // The unit follows the unrounded magnitude; rounding within a unit may
    // still carry into the next one (999_960 → 1M, not 1000K).
    let unit = UNITS.iter().position(|&(scale, _)| magnitude >= scale);
    let (scale, suffix) = unit.map_or((1.0, ""), |i| UNITS[i]);
    let scaled = round_one(magnitude / scale);
    if scaled >= 1000.0 {
        let next = match unit {
            Some(0) => None,
            Some(i) => Some(UNITS[i - 1]),
            None => UNITS.last().copied(),
        };
        if let Some((up_scale, up_suffix)) = next {
            return format!("{sign}${}{up_suffix}", trim_one(round_one(magnitude / up_scale)));
        }
    }
    format!("{sign}${}{suffix}", trim_one(scaled))
}

fn round_one(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn trim_one(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

/// Shorten long identifiers to `first5...last4`.
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 10 {
        return id.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

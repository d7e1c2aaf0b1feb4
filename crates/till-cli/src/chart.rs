//! Deterministic terminal charts.
//!
//! Fixed-width horizontal bars, no colour, no interactivity. Output is
//! stable for a given input, which keeps golden tests honest.

use till_core::revenue::GroupTotal;

/// One row per group: left-aligned label, right-aligned amount, then a
/// `█` bar scaled so the largest total fills `width` cells.
pub fn bar_chart(groups: &[GroupTotal], width: usize) -> String {
  if groups.is_empty() {
    return "  (no data)\n".to_string();
  }

  let label_width = groups
    .iter()
    .map(|g| g.label.chars().count())
    .max()
    .unwrap_or(0);
  let values: Vec<String> =
    groups.iter().map(|g| format!("{:.2}", g.total)).collect();
  let value_width = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);
  let max_total = groups.iter().fold(0.0_f64, |acc, g| acc.max(g.total));

  let mut out = String::new();
  for (group, value) in groups.iter().zip(&values) {
    let bar_len = if max_total > 0.0 {
      ((group.total / max_total) * width as f64).round() as usize
    } else {
      0
    };
    let line = format!(
      "  {:<label_width$}  {:>value_width$}  {}",
      group.label,
      value,
      "█".repeat(bar_len),
    );
    out.push_str(line.trim_end());
    out.push('\n');
  }
  out
}

/// `1234567.891` → `1 234 567.89 EUR`.
pub fn format_eur(amount: f64) -> String {
  format!("{} EUR", group_thousands(amount))
}

/// Two decimals, thousands separated by spaces.
fn group_thousands(value: f64) -> String {
  let raw = format!("{value:.2}");
  let (int_part, frac_part) =
    raw.split_once('.').unwrap_or((raw.as_str(), "00"));
  let (sign, digits) = match int_part.strip_prefix('-') {
    Some(rest) => ("-", rest),
    None => ("", int_part),
  };

  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(' ');
    }
    grouped.push(ch);
  }
  format!("{sign}{grouped}.{frac_part}")
}

//! Badge request parameters and their coercion.
//!
//! Every parameter arrives as an optional string. Coercion never fails:
//! numeric fields that do not parse become 0, display-only fields keep their
//! raw text, and a missing tier becomes `gold`.

use serde::Deserialize;
use std::fmt;

use crate::tier::Tier;

/// Default tier when the parameter is absent or blank.
pub const DEFAULT_TIER: &str = "gold";

/// Raw query parameters as received at the HTTP boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BadgeParams {
    pub tier: Option<String>,
    pub reward_points: Option<String>,
    pub discount: Option<String>,
    pub status_points: Option<String>,
    pub nights: Option<String>,
}

/// A display-only number: thousands-separated when integer-like, verbatim otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNumber {
    Integer(i64),
    Raw(String),
}

impl DisplayNumber {
    pub fn parse(input: &str) -> Self {
        match parse_integer(input) {
            Some(n) => DisplayNumber::Integer(n),
            None => DisplayNumber::Raw(input.to_string()),
        }
    }
}

impl Default for DisplayNumber {
    fn default() -> Self {
        DisplayNumber::Integer(0)
    }
}

impl fmt::Display for DisplayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayNumber::Integer(n) => f.write_str(&format_thousands(*n)),
            DisplayNumber::Raw(s) => f.write_str(s),
        }
    }
}

/// A fully coerced badge request.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeRequest {
    /// Trimmed tier text as supplied, used for the headline.
    pub tier_input: String,
    /// Parsed tier, `None` when the input is not one of the five named tiers.
    pub tier: Option<Tier>,
    pub reward_points: DisplayNumber,
    pub discount: String,
    pub status_points: i64,
    pub nights: i64,
}

impl Default for BadgeRequest {
    fn default() -> Self {
        Self {
            tier_input: DEFAULT_TIER.to_string(),
            tier: Some(Tier::Gold),
            reward_points: DisplayNumber::default(),
            discount: "0".to_string(),
            status_points: 0,
            nights: 0,
        }
    }
}

impl BadgeRequest {
    /// Coerce raw parameters. Never fails.
    pub fn from_params(params: &BadgeParams) -> Self {
        let tier_input = params
            .tier
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TIER)
            .to_string();

        let reward_points = params
            .reward_points
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(DisplayNumber::parse)
            .unwrap_or_default();

        let discount = params
            .discount
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("0")
            .to_string();

        Self {
            tier: Tier::parse(&tier_input),
            tier_input,
            reward_points,
            discount,
            status_points: coerce_integer(params.status_points.as_deref()),
            nights: coerce_integer(params.nights.as_deref()),
        }
    }

    /// Headline text: the trimmed tier input, upper-cased.
    ///
    /// The headline always shows the caller's text, never the resolved tier,
    /// so an unrecognized value is echoed as-is in capitals while tint, label
    /// and card fall back to the default row. `"silver"`, `" Silver "` and
    /// `"SILVER"` all display as `SILVER`.
    pub fn tier_display(&self) -> String {
        self.tier_input.to_uppercase()
    }

    pub fn reward_points_text(&self) -> String {
        format!("{} Reward Points", self.reward_points)
    }

    pub fn discount_text(&self) -> String {
        format!("or £{} discount on your next stay", self.discount)
    }
}

/// Parse an integer-like string (optional sign, ASCII digits, surrounding whitespace).
pub fn parse_integer(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

/// Parse an optional integer parameter, falling back to 0.
pub fn coerce_integer(input: Option<&str>) -> i64 {
    input.and_then(parse_integer).unwrap_or(0)
}

/// Fraction of `max` reached by `value`, clamped to [0, 1].
pub fn progress_fraction(value: i64, max: i64) -> f64 {
    if max <= 0 {
        return 0.0;
    }
    (value as f64 / max as f64).clamp(0.0, 1.0)
}

/// Format an integer with comma thousands separators.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

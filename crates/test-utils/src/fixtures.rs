//! Common test fixtures for badge tests.

use badge_common::BadgeParams;

/// Card asset names for every tier, including the unknown-tier fallback.
pub const CARD_ASSETS: [&str; 4] = [
    "card_silver.png",
    "card_gold.png",
    "card_platinum.png",
    "card_diamond.png",
];

/// Icon asset names under the default configuration.
pub const ICON_ASSETS: [&str; 2] = ["icon_points.png", "icon_nights.png"];

/// Background asset name under the default configuration.
pub const BACKGROUND_ASSET: &str = "background.png";

/// Build query parameters from optional string values.
pub fn params(
    tier: Option<&str>,
    reward_points: Option<&str>,
    discount: Option<&str>,
    status_points: Option<&str>,
    nights: Option<&str>,
) -> BadgeParams {
    BadgeParams {
        tier: tier.map(str::to_string),
        reward_points: reward_points.map(str::to_string),
        discount: discount.map(str::to_string),
        status_points: status_points.map(str::to_string),
        nights: nights.map(str::to_string),
    }
}

/// Halfway through both tracks on the gold tier.
pub fn halfway_params() -> BadgeParams {
    params(Some("gold"), Some("12345"), Some("25"), Some("7000"), Some("30"))
}

/// Both tracks complete.
pub fn complete_params() -> BadgeParams {
    params(
        Some("platinum"),
        Some("50000"),
        Some("100"),
        Some("14000"),
        Some("60"),
    )
}

/// No progress on either track.
pub fn empty_params() -> BadgeParams {
    params(Some("classic"), Some("0"), None, Some("0"), Some("0"))
}

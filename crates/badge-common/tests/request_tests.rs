//! Tests for request coercion and display formatting.

use badge_common::request::progress_fraction;
use badge_common::{BadgeParams, BadgeRequest, DisplayNumber, Tier};

fn params(pairs: &[(&str, &str)]) -> BadgeParams {
    let mut p = BadgeParams::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "tier" => p.tier = value,
            "reward_points" => p.reward_points = value,
            "discount" => p.discount = value,
            "status_points" => p.status_points = value,
            "nights" => p.nights = value,
            other => panic!("unknown parameter {}", other),
        }
    }
    p
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_empty_params_use_defaults() {
    let request = BadgeRequest::from_params(&BadgeParams::default());
    assert_eq!(request, BadgeRequest::default());
    assert_eq!(request.tier, Some(Tier::Gold));
    assert_eq!(request.tier_display(), "GOLD");
    assert_eq!(request.reward_points_text(), "0 Reward Points");
    assert_eq!(request.discount_text(), "or £0 discount on your next stay");
}

#[test]
fn test_blank_tier_uses_default() {
    let request = BadgeRequest::from_params(&params(&[("tier", "   ")]));
    assert_eq!(request.tier_input, "gold");
}

// ============================================================================
// Numeric coercion
// ============================================================================

#[test]
fn test_reward_points_are_thousands_separated() {
    let request = BadgeRequest::from_params(&params(&[("reward_points", "12345")]));
    assert_eq!(request.reward_points, DisplayNumber::Integer(12345));
    assert_eq!(request.reward_points_text(), "12,345 Reward Points");
}

#[test]
fn test_unparsable_reward_points_are_verbatim() {
    let request = BadgeRequest::from_params(&params(&[("reward_points", "abc")]));
    assert_eq!(request.reward_points_text(), "abc Reward Points");
}

#[test]
fn test_unparsable_progress_values_become_zero() {
    let request = BadgeRequest::from_params(&params(&[
        ("status_points", "lots"),
        ("nights", "3.5"),
    ]));
    assert_eq!(request.status_points, 0);
    assert_eq!(request.nights, 0);
}

#[test]
fn test_progress_values_parse() {
    let request = BadgeRequest::from_params(&params(&[
        ("status_points", " 7000 "),
        ("nights", "30"),
    ]));
    assert_eq!(request.status_points, 7000);
    assert_eq!(request.nights, 30);
    assert_eq!(progress_fraction(request.status_points, 14_000), 0.5);
    assert_eq!(progress_fraction(request.nights, 60), 0.5);
}

#[test]
fn test_discount_is_not_validated() {
    let request = BadgeRequest::from_params(&params(&[("discount", "12.50ish")]));
    assert_eq!(request.discount_text(), "or £12.50ish discount on your next stay");
}

// ============================================================================
// Tier text
// ============================================================================

#[test]
fn test_unknown_tier_echoes_input() {
    let request = BadgeRequest::from_params(&params(&[("tier", " unknown-value ")]));
    assert_eq!(request.tier, None);
    assert_eq!(request.tier_display(), "UNKNOWN-VALUE");
}

#[test]
fn test_tier_display_is_upper_cased_input() {
    for raw in ["silver", " Silver ", "SILVER"] {
        let request = BadgeRequest::from_params(&params(&[("tier", raw)]));
        assert_eq!(request.tier, Some(Tier::Silver), "{raw:?}");
        assert_eq!(request.tier_display(), "SILVER", "{raw:?}");
    }
    let request = BadgeRequest::from_params(&params(&[("tier", "diamond")]));
    assert_eq!(request.tier_display(), "DIAMOND");
}

#[test]
fn test_tier_is_case_insensitive() {
    let request = BadgeRequest::from_params(&params(&[("tier", "PLATINUM")]));
    assert_eq!(request.tier, Some(Tier::Platinum));
}

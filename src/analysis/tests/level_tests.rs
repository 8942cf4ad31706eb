//! Tests for risk and priority normalization.

use crate::analysis::domain::Level;
use rstest::rstest;

#[rstest]
#[case("Critical", Level::High)]
#[case("BLOCKER", Level::High)]
#[case("  urgent ", Level::High)]
#[case("Highest", Level::High)]
#[case("minor", Level::Low)]
#[case("Lowest", Level::Low)]
#[case("trivial", Level::Low)]
#[case("Moderate", Level::Medium)]
#[case("normal", Level::Medium)]
#[case("very high impact", Level::High)]
#[case("fairly low", Level::Low)]
#[case("unknown", Level::Medium)]
#[case("", Level::Medium)]
#[case("P2", Level::Medium)]
#[case("P1-critical", Level::High)]
#[case("follow-up", Level::Medium)]
#[case("slow", Level::Medium)]
#[case("yellow", Level::Medium)]
fn tokens_map_to_buckets(#[case] token: &str, #[case] expected: Level) {
    assert_eq!(Level::normalize(token), expected);
}

#[rstest]
#[case("Critical")]
#[case("minor")]
#[case("whatever")]
#[case("below normal")]
fn normalization_is_idempotent(#[case] token: &str) {
    let once = Level::normalize(token);
    assert_eq!(Level::normalize(once.as_str()), once);
    assert_eq!(Level::normalize(once.title()), once);
}

#[rstest]
fn word_matches_prefer_high_then_low() {
    assert_eq!(Level::normalize("low"), Level::Low);
    assert_eq!(Level::normalize("below normal"), Level::Medium);
    assert_eq!(Level::normalize("low, maybe high"), Level::High);
    assert_eq!(Level::normalize("not important"), Level::High);
}

#[rstest]
fn deserializes_foreign_vocabulary() {
    let level: Level = serde_json::from_str("\"Severe\"").expect("level decodes");
    assert_eq!(level, Level::High);
    assert_eq!(serde_json::to_string(&level).expect("level encodes"), "\"high\"");
}

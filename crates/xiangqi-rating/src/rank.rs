//! Rank titles shown next to a rating.

/// Rank thresholds, ascending. A rating below a bound earns its title.
const RANKS: [(i32, &str); 8] = [
    (1000, "Beginner"),
    (1100, "Amateur Level 9"),
    (1200, "Amateur Level 8"),
    (1300, "Amateur Level 7"),
    (1400, "Amateur Level 5"),
    (1500, "Amateur Level 3"),
    (1600, "Amateur Level 1"),
    (1800, "Regional Master"),
];

const TOP_RANK: &str = "Grandmaster";

/// Human-readable rank for a rating.
pub fn rank_title(rating: i32) -> &'static str {
    RANKS
        .iter()
        .find(|(bound, _)| rating < *bound)
        .map_or(TOP_RANK, |(_, title)| title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(rank_title(0), "Beginner");
        assert_eq!(rank_title(999), "Beginner");
        assert_eq!(rank_title(1000), "Amateur Level 9");
        assert_eq!(rank_title(1200), "Amateur Level 7");
        assert_eq!(rank_title(1399), "Amateur Level 5");
        assert_eq!(rank_title(1400), "Amateur Level 3");
        assert_eq!(rank_title(1799), "Regional Master");
        assert_eq!(rank_title(1800), "Grandmaster");
    }

    #[test]
    fn thresholds_ascend() {
        assert!(RANKS.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

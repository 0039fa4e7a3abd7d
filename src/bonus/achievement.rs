/// Achievement levels offered to evaluators, in ascending order.
pub const ACHIEVEMENT_LEVELS: [&str; 5] = [
    "poor 1",
    "fair 2",
    "good 3",
    "outstanding 4",
    "exceptional 5",
];

/// Point value of an achievement literal; anything unrecognised scores 0.
pub fn achievement_to_point(achievement: &str) -> f64 {
    match achievement {
        "poor 1" => 1.0,
        "fair 2" => 2.0,
        "good 3" => 3.0,
        "outstanding 4" => 4.0,
        "exceptional 5" => 5.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_map_to_their_rank() {
        for (i, level) in ACHIEVEMENT_LEVELS.iter().enumerate() {
            assert_eq!(achievement_to_point(level), (i + 1) as f64);
        }
        assert_eq!(achievement_to_point("good 3"), 3.0);
    }

    #[test]
    fn anything_else_is_zero() {
        assert_eq!(achievement_to_point("unknown"), 0.0);
        assert_eq!(achievement_to_point("Good 3"), 0.0);
        assert_eq!(achievement_to_point("good 3 "), 0.0);
        assert_eq!(achievement_to_point(""), 0.0);
    }
}

use crate::domain::model::{Item, SessionResult};

/// Stable sort: cheapest first, ties broken by higher rating. `total_cmp`
/// keeps the ordering total even for infinity defaults.
pub fn rank(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(|a, b| {
        a.numeric_price
            .total_cmp(&b.numeric_price)
            .then_with(|| b.numeric_rating.total_cmp(&a.numeric_rating))
    });
    items
}

pub fn best(items: &[Item]) -> Option<Item> {
    rank(items.to_vec()).into_iter().next()
}

/// Pick an overall winner between two platform results. When both price and
/// rating tie exactly, the second platform wins; that asymmetry is the
/// documented tie-break, not an accident of ordering.
pub fn choose_winner(
    result_a: &SessionResult,
    result_b: &SessionResult,
    platform_a: &str,
    platform_b: &str,
) -> (Option<String>, String) {
    match (&result_a.best_item, &result_b.best_item) {
        (Some(a), Some(b)) => {
            if a.numeric_price < b.numeric_price {
                (
                    Some(platform_a.to_string()),
                    format!("{} is cheaper.", platform_a),
                )
            } else if b.numeric_price < a.numeric_price {
                (
                    Some(platform_b.to_string()),
                    format!("{} is cheaper.", platform_b),
                )
            } else if a.numeric_rating > b.numeric_rating {
                (
                    Some(platform_a.to_string()),
                    format!("Prices equal, but {} has better rating.", platform_a),
                )
            } else {
                (
                    Some(platform_b.to_string()),
                    format!("Prices equal, but {} has better rating.", platform_b),
                )
            }
        }
        (Some(_), None) => (
            Some(platform_a.to_string()),
            format!("Only found on {}.", platform_a),
        ),
        (None, Some(_)) => (
            Some(platform_b.to_string()),
            format!("Only found on {}.", platform_b),
        ),
        (None, None) => (None, "No valid items found.".to_string()),
    }
}

/// Something the local filter can match against.
///
/// Implementors expose exactly three fields: name, description and owner.
pub trait Searchable {
    fn search_fields(&self) -> [&str; 3];
}

/// Lower-cases one character at a time, so a letter folds the same way
/// wherever it sits in the string (Σ is always σ, never a final ς).
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// `query_folded` must already have gone through [`fold_case`].
pub fn matches<T: Searchable>(item: &T, query_folded: &str) -> bool {
    item.search_fields()
        .iter()
        .any(|field| fold_case(field).contains(query_folded))
}

/// Case-insensitive substring filter over a snapshot, preserving its order.
/// An empty query keeps every item.
pub fn filter<T: Searchable + Clone>(snapshot: &[T], query: &str) -> Vec<T> {
    if query.is_empty() {
        return snapshot.to_vec();
    }

    let query_folded = fold_case(query);
    snapshot
        .iter()
        .filter(|item| matches(*item, &query_folded))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Playlist;
    use proptest::prop_assert_eq;

    fn sample() -> Vec<Playlist> {
        vec![
            Playlist::new("1", "Road Trip", "Summer songs", "alice"),
            Playlist::new("2", "Chill", "", "bob"),
        ]
    }

    fn ids(items: &[Playlist]) -> Vec<&str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn matches_name_case_insensitively() {
        assert_eq!(ids(&filter(&sample(), "road")), vec!["1"]);
        assert_eq!(ids(&filter(&sample(), "ROAD tr")), vec!["1"]);
    }

    #[test]
    fn matches_owner_field() {
        assert_eq!(ids(&filter(&sample(), "bob")), vec!["2"]);
    }

    #[test]
    fn matches_comment_field() {
        assert_eq!(ids(&filter(&sample(), "summer")), vec!["1"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(filter(&sample(), "xyz").is_empty());
    }

    #[test]
    fn empty_snapshot_yields_nothing() {
        let empty: Vec<Playlist> = Vec::new();
        assert!(filter(&empty, "anything").is_empty());
    }

    #[test]
    fn item_matching_several_fields_appears_once() {
        let items = vec![Playlist::new("1", "alice mix", "for alice", "alice")];
        assert_eq!(ids(&filter(&items, "alice")), vec!["1"]);
    }

    #[test]
    fn sigma_matches_regardless_of_position() {
        let items = vec![Playlist::new("1", "ΟΔΟΣ", "", "")];
        assert_eq!(ids(&filter(&items, "Σ")), vec!["1"]);
        assert_eq!(ids(&filter(&items, "ς")), Vec::<&str>::new());
        assert_eq!(ids(&filter(&items, "οδοσ")), vec!["1"]);
    }

    #[test]
    fn fold_case_maps_each_char_alone() {
        assert_eq!(fold_case("ΟΔΟΣ"), "οδοσ");
        assert_eq!(fold_case("Road Trip"), "road trip");
        assert_eq!(fold_case("İ"), "i\u{307}");
    }

    #[test]
    fn whitespace_query_is_a_real_filter() {
        assert_eq!(ids(&filter(&sample(), " ")), vec!["1"]);
    }

    proptest::proptest! {
        #[test]
        fn empty_query_is_identity(names in proptest::collection::vec("[a-zA-Z ]{0,8}", 0..20)) {
            let items: Vec<Playlist> = names
                .iter()
                .enumerate()
                .map(|(n, name)| Playlist::new(&n.to_string(), name, "", ""))
                .collect();
            let result = filter(&items, "");
            prop_assert_eq!(ids(&result), ids(&items));
        }

        #[test]
        fn filter_is_ordered_subsequence_of_matches(
            rows in proptest::collection::vec(("[a-cA-CσςΣéÉß]{0,5}", "[a-cA-CσςΣéÉß]{0,5}", "[a-cA-CσςΣéÉß]{0,5}"), 0..30),
            query in "[a-cA-CσΣéÉß]{1,2}",
        ) {
            let items: Vec<Playlist> = rows
                .iter()
                .enumerate()
                .map(|(n, (name, comment, owner))| Playlist::new(&n.to_string(), name, comment, owner))
                .collect();
            let fold = |text: &str| -> Vec<char> {
                text.chars().flat_map(char::to_lowercase).collect()
            };
            let contains = |field: &str, needle: &[char]| {
                fold(field).windows(needle.len()).any(|window| window == needle)
            };
            let needle = fold(&query);
            let expected: Vec<&str> = items
                .iter()
                .filter(|p| {
                    contains(&p.name, &needle)
                        || contains(&p.comment, &needle)
                        || contains(&p.owner, &needle)
                })
                .map(|p| p.id.as_str())
                .collect();

            let result = filter(&items, &query);
            prop_assert_eq!(ids(&result), expected);
        }
    }
}

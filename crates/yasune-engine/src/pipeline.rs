//! The filter pipeline: favorites gate, visibility partition, category
//! narrowing, keyword/rating search, cheapest-per-name deduplication, and
//! the final unit-price ranking.
//!
//! Every step is a pure, order-preserving narrowing over [`ViewRecord`]s
//! except the final stable sort, so the pipeline can be re-run wholesale on
//! every snapshot push without ordering assumptions across subscriptions.

use std::collections::HashMap;
use std::collections::HashSet;

use uuid::Uuid;

use yasune_core::kana::{to_hiragana, to_katakana};
use yasune_core::records::Rating;
use yasune_core::ViewRecord;

use crate::overlay::OverlaySnapshot;

/// Which listing the user is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Main,
    /// Only records the user has hidden.
    Hidden,
    /// Only records whose product name carries a set rating.
    Favorites,
}

/// When to collapse a product name down to its single cheapest record.
///
/// The source history is contradictory about the trigger, so it is a policy
/// rather than a constant. [`DedupPolicy::Automatic`] is the adopted rule:
/// dedup on an explicit text keyword search, and always in the favorites
/// view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    #[default]
    Automatic,
    Always,
    Never,
}

/// Selected category levels. An unset level imposes no constraint.
///
/// The UI selects parent before child; the pipeline does not rely on that
/// and treats each level as an independent equality filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    pub large: Option<String>,
    pub medium: Option<String>,
    pub small: Option<String>,
}

/// One query against the current snapshots.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub keyword: String,
    pub category: CategorySelection,
    pub view: ViewMode,
    pub dedup: DedupPolicy,
}

/// Interpretation of the search box contents.
///
/// A keyword that parses exactly as an integer in `0..=3` is a rating
/// query and never falls through to text matching; everything else is a
/// (possibly empty) text query. The two are mutually exclusive per query
/// string by design.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Keyword {
    Everything,
    RatingExactly(Rating),
    Text(String),
}

impl Keyword {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Keyword::Everything;
        }
        if let Some(rating) = trimmed
            .parse::<u8>()
            .ok()
            .and_then(|n| Rating::try_from(n).ok())
        {
            return Keyword::RatingExactly(rating);
        }
        Keyword::Text(trimmed.to_lowercase())
    }
}

/// Case-insensitive substring match of `keyword_lower` against `field` in
/// its original form and with kana folded each way — three comparisons per
/// field, six across product name and manufacturer.
pub(crate) fn field_matches(field: &str, keyword_lower: &str) -> bool {
    let lower = field.to_lowercase();
    lower.contains(keyword_lower)
        || to_hiragana(&lower).contains(keyword_lower)
        || to_katakana(&lower).contains(keyword_lower)
}

/// Runs the full pipeline over projected records, in fixed step order.
///
/// Returns the ranked list: ascending unit price, stable, with the
/// `f64::INFINITY` sentinel (volume `<= 0`) sorting last.
#[must_use]
pub fn run_filter(
    records: &[ViewRecord],
    overlays: &OverlaySnapshot,
    query: &Query,
) -> Vec<ViewRecord> {
    let keyword = Keyword::parse(&query.keyword);

    let mut survivors: Vec<ViewRecord> = records
        .iter()
        .filter(|r| query.view != ViewMode::Favorites || overlays.rating_for(&r.product_name).is_favorite())
        .filter(|r| {
            if query.view == ViewMode::Hidden {
                overlays.is_hidden(r.record_id)
            } else {
                !overlays.is_hidden(r.record_id)
            }
        })
        .filter(|r| category_matches(r, &query.category))
        .filter(|r| match &keyword {
            Keyword::Everything => true,
            Keyword::RatingExactly(rating) => overlays.rating_for(&r.product_name) == *rating,
            Keyword::Text(lower) => {
                field_matches(&r.product_name, lower) || field_matches(&r.manufacturer, lower)
            }
        })
        .cloned()
        .collect();

    if dedup_applies(query.dedup, query.view, &keyword) {
        survivors = cheapest_per_product_name(survivors);
    }

    survivors.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price));
    survivors
}

fn category_matches(record: &ViewRecord, selection: &CategorySelection) -> bool {
    selection
        .large
        .as_ref()
        .is_none_or(|large| record.large_category == *large)
        && selection
            .medium
            .as_ref()
            .is_none_or(|medium| record.medium_category == *medium)
        && selection
            .small
            .as_ref()
            .is_none_or(|small| record.small_category == *small)
}

fn dedup_applies(policy: DedupPolicy, view: ViewMode, keyword: &Keyword) -> bool {
    match policy {
        DedupPolicy::Always => true,
        DedupPolicy::Never => false,
        DedupPolicy::Automatic => {
            view == ViewMode::Favorites || matches!(keyword, Keyword::Text(_))
        }
    }
}

/// Keeps the single cheapest record per product name.
///
/// Ties keep the first-encountered record (strict `<` replacement), so the
/// reduction is stable with respect to input order. Output order follows
/// first appearance of each name; the caller sorts afterwards.
fn cheapest_per_product_name(records: Vec<ViewRecord>) -> Vec<ViewRecord> {
    let mut cheapest_index: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<ViewRecord> = Vec::new();

    for record in records {
        match cheapest_index.get(&record.product_name) {
            Some(&idx) => {
                if record.unit_price < kept[idx].unit_price {
                    kept[idx] = record;
                }
            }
            None => {
                cheapest_index.insert(record.product_name.clone(), kept.len());
                kept.push(record);
            }
        }
    }

    kept
}

/// Cheapest same-name offers at other stores: non-hidden records sharing
/// `product_name`, ranked by unit price, capped at `limit` (the 最安値
/// dialog shows the top three).
#[must_use]
pub fn cheapest_alternatives(
    records: &[ViewRecord],
    product_name: &str,
    hidden_ids: &HashSet<Uuid>,
    limit: usize,
) -> Vec<ViewRecord> {
    let mut same_name: Vec<ViewRecord> = records
        .iter()
        .filter(|r| r.product_name == product_name && !hidden_ids.contains(&r.record_id))
        .cloned()
        .collect();
    same_name.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price));
    same_name.truncate(limit);
    same_name
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use yasune_core::records::{PriceType, Unit};

    use super::*;

    fn make_view(name: &str, manufacturer: &str, price: f64, volume: f64) -> ViewRecord {
        ViewRecord {
            record_id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            product_name: name.to_string(),
            manufacturer: manufacturer.to_string(),
            volume,
            unit: Unit::Gram,
            large_category: String::new(),
            medium_category: String::new(),
            small_category: String::new(),
            price_excluding_tax: price,
            store_name: "イオン東雲店".to_string(),
            price_type: PriceType::Normal,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
            unit_price: yasune_core::unit_price::unit_price(price, volume),
        }
    }

    fn overlays_with(
        ratings: &[(&str, Rating)],
        hidden: &[Uuid],
    ) -> OverlaySnapshot {
        OverlaySnapshot {
            ratings_by_product_name: ratings
                .iter()
                .map(|(name, r)| ((*name).to_string(), *r))
                .collect(),
            hidden_ids: hidden.iter().copied().collect(),
        }
    }

    fn text_query(keyword: &str) -> Query {
        Query {
            keyword: keyword.to_string(),
            ..Query::default()
        }
    }

    // -----------------------------------------------------------------------
    // keyword interpretation
    // -----------------------------------------------------------------------

    #[test]
    fn keyword_empty_matches_everything() {
        assert_eq!(Keyword::parse(""), Keyword::Everything);
        assert_eq!(Keyword::parse("   "), Keyword::Everything);
    }

    #[test]
    fn keyword_digit_in_range_is_rating_query() {
        assert_eq!(Keyword::parse("0"), Keyword::RatingExactly(Rating::Unset));
        assert_eq!(Keyword::parse(" 2 "), Keyword::RatingExactly(Rating::Two));
    }

    #[test]
    fn keyword_digit_out_of_range_is_text() {
        assert_eq!(Keyword::parse("4"), Keyword::Text("4".to_string()));
        assert_eq!(Keyword::parse("-1"), Keyword::Text("-1".to_string()));
    }

    #[test]
    fn keyword_text_is_lowercased() {
        assert_eq!(Keyword::parse("Sauce"), Keyword::Text("sauce".to_string()));
    }

    // -----------------------------------------------------------------------
    // visibility partition
    // -----------------------------------------------------------------------

    #[test]
    fn visibility_partition_is_complete_and_disjoint() {
        let records = vec![
            make_view("A", "m", 100.0, 100.0),
            make_view("B", "m", 100.0, 100.0),
            make_view("C", "m", 100.0, 100.0),
        ];
        let hidden = vec![records[1].record_id];
        let overlays = overlays_with(&[], &hidden);

        let main = run_filter(&records, &overlays, &Query::default());
        let hidden_view = run_filter(
            &records,
            &overlays,
            &Query {
                view: ViewMode::Hidden,
                ..Query::default()
            },
        );

        assert_eq!(main.len() + hidden_view.len(), records.len());
        let main_ids: HashSet<Uuid> = main.iter().map(|r| r.record_id).collect();
        for r in &hidden_view {
            assert!(!main_ids.contains(&r.record_id));
        }
        assert_eq!(hidden_view[0].record_id, records[1].record_id);
    }

    // -----------------------------------------------------------------------
    // favorites gate
    // -----------------------------------------------------------------------

    #[test]
    fn favorites_view_requires_set_rating() {
        let records = vec![
            make_view("黄金の味 中辛", "エバラ食品", 398.0, 210.0),
            make_view("ほんだし", "味の素", 258.0, 120.0),
        ];
        let overlays = overlays_with(&[("黄金の味 中辛", Rating::Three)], &[]);

        let favorites = run_filter(
            &records,
            &overlays,
            &Query {
                view: ViewMode::Favorites,
                ..Query::default()
            },
        );
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].product_name, "黄金の味 中辛");
    }

    #[test]
    fn favorites_view_dedups_to_cheapest_per_name() {
        let records = vec![
            make_view("黄金の味 中辛", "エバラ食品", 398.0, 210.0),
            make_view("黄金の味 中辛", "エバラ食品", 298.0, 210.0),
        ];
        let overlays = overlays_with(&[("黄金の味 中辛", Rating::One)], &[]);

        let favorites = run_filter(
            &records,
            &overlays,
            &Query {
                view: ViewMode::Favorites,
                ..Query::default()
            },
        );
        assert_eq!(favorites.len(), 1);
        assert!((favorites[0].price_excluding_tax - 298.0).abs() < f64::EPSILON);
    }

    // -----------------------------------------------------------------------
    // category narrowing
    // -----------------------------------------------------------------------

    #[test]
    fn category_levels_narrow_independently() {
        let mut a = make_view("A", "m", 100.0, 100.0);
        a.large_category = "調味料".to_string();
        a.medium_category = "たれ".to_string();
        let mut b = make_view("B", "m", 100.0, 100.0);
        b.large_category = "調味料".to_string();
        b.medium_category = "だし".to_string();
        let mut c = make_view("C", "m", 100.0, 100.0);
        c.large_category = "飲料".to_string();
        let records = vec![a, b, c];
        let overlays = overlays_with(&[], &[]);

        let large_only = run_filter(
            &records,
            &overlays,
            &Query {
                category: CategorySelection {
                    large: Some("調味料".to_string()),
                    ..CategorySelection::default()
                },
                ..Query::default()
            },
        );
        assert_eq!(large_only.len(), 2);

        let narrowed = run_filter(
            &records,
            &overlays,
            &Query {
                category: CategorySelection {
                    large: Some("調味料".to_string()),
                    medium: Some("たれ".to_string()),
                    small: None,
                },
                ..Query::default()
            },
        );
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].product_name, "A");
    }

    #[test]
    fn child_without_parent_still_filters() {
        // Unsupported UI state, but must not panic or misbehave.
        let mut a = make_view("A", "m", 100.0, 100.0);
        a.medium_category = "たれ".to_string();
        let records = vec![a, make_view("B", "m", 100.0, 100.0)];
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(
            &records,
            &overlays,
            &Query {
                category: CategorySelection {
                    large: None,
                    medium: Some("たれ".to_string()),
                    small: None,
                },
                ..Query::default()
            },
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product_name, "A");
    }

    // -----------------------------------------------------------------------
    // keyword / rating search
    // -----------------------------------------------------------------------

    #[test]
    fn text_search_matches_across_kana_scripts() {
        let records = vec![
            make_view("ソース", "ブルドック", 300.0, 300.0),
            make_view("醤油", "キッコーマン", 350.0, 500.0),
        ];
        let overlays = overlays_with(&[], &[]);

        // Hiragana keyword finds the Katakana product name.
        let out = run_filter(&records, &overlays, &text_query("そーす"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product_name, "ソース");

        // Katakana keyword finds it too.
        let out = run_filter(&records, &overlays, &text_query("ソース"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn text_search_matches_manufacturer() {
        let records = vec![
            make_view("醤油", "キッコーマン", 350.0, 500.0),
            make_view("ソース", "ブルドック", 300.0, 300.0),
        ];
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(&records, &overlays, &text_query("きっこーまん"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product_name, "醤油");
    }

    #[test]
    fn text_search_is_case_insensitive() {
        let records = vec![make_view("Hi-C Orange", "Coca-Cola", 128.0, 500.0)];
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(&records, &overlays, &text_query("hi-c"));
        assert_eq!(out.len(), 1);
        let out = run_filter(&records, &overlays, &text_query("COCA"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn rating_query_is_exclusive_of_text_match() {
        // "チーズ2個" contains the literal digit 2 but is rated Three;
        // searching "2" must not return it.
        let records = vec![
            make_view("チーズ2個", "雪印", 200.0, 2.0),
            make_view("バター", "雪印", 400.0, 200.0),
        ];
        let overlays = overlays_with(
            &[("チーズ2個", Rating::Three), ("バター", Rating::Two)],
            &[],
        );

        let out = run_filter(&records, &overlays, &text_query("2"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product_name, "バター");
    }

    #[test]
    fn rating_query_one_excludes_unrated() {
        let records = vec![
            make_view("A", "m", 100.0, 100.0),
            make_view("B", "m", 100.0, 100.0),
        ];
        let overlays = overlays_with(&[("A", Rating::One)], &[]);

        let out = run_filter(&records, &overlays, &text_query("1"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product_name, "A");
    }

    #[test]
    fn rating_query_zero_matches_unrated_and_cleared() {
        let records = vec![
            make_view("A", "m", 100.0, 100.0),
            make_view("B", "m", 100.0, 100.0),
        ];
        // A cleared back to Unset; B never rated. Both read as zero.
        let overlays = overlays_with(&[("A", Rating::Unset)], &[]);

        let out = run_filter(&records, &overlays, &text_query("0"));
        assert_eq!(out.len(), 2);
    }

    // -----------------------------------------------------------------------
    // dedup + ranking
    // -----------------------------------------------------------------------

    #[test]
    fn keyword_search_keeps_only_cheapest_per_name() {
        let records = vec![
            make_view("X", "m", 500.0, 100.0), // 5.0
            make_view("X", "m", 300.0, 100.0), // 3.0
            make_view("X", "m", 800.0, 100.0), // 8.0
        ];
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(&records, &overlays, &text_query("X"));
        assert_eq!(out.len(), 1);
        assert!((out[0].unit_price - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dedup_tie_keeps_first_encountered() {
        let records = vec![
            make_view("X", "m", 300.0, 100.0),
            make_view("X", "m", 300.0, 100.0),
        ];
        let first_id = records[0].record_id;
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(&records, &overlays, &text_query("X"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].record_id, first_id);
    }

    #[test]
    fn empty_keyword_does_not_dedup_under_automatic_policy() {
        let records = vec![
            make_view("X", "m", 500.0, 100.0),
            make_view("X", "m", 300.0, 100.0),
        ];
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(&records, &overlays, &Query::default());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn rating_query_does_not_trigger_dedup_under_automatic_policy() {
        let records = vec![
            make_view("X", "m", 500.0, 100.0),
            make_view("X", "m", 300.0, 100.0),
        ];
        let overlays = overlays_with(&[("X", Rating::Two)], &[]);

        let out = run_filter(&records, &overlays, &text_query("2"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn always_policy_dedups_without_keyword() {
        let records = vec![
            make_view("X", "m", 500.0, 100.0),
            make_view("X", "m", 300.0, 100.0),
        ];
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(
            &records,
            &overlays,
            &Query {
                dedup: DedupPolicy::Always,
                ..Query::default()
            },
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn never_policy_skips_dedup_even_on_search() {
        let records = vec![
            make_view("X", "m", 500.0, 100.0),
            make_view("X", "m", 300.0, 100.0),
        ];
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(
            &records,
            &overlays,
            &Query {
                keyword: "X".to_string(),
                dedup: DedupPolicy::Never,
                ..Query::default()
            },
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn results_sort_ascending_by_unit_price() {
        let records = vec![
            make_view("B", "m", 800.0, 100.0), // 8.0
            make_view("A", "m", 300.0, 100.0), // 3.0
            make_view("C", "m", 500.0, 100.0), // 5.0
        ];
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(&records, &overlays, &Query::default());
        let names: Vec<&str> = out.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn zero_volume_sentinel_sorts_last() {
        let records = vec![
            make_view("無量", "m", 100.0, 0.0), // infinity
            make_view("B", "m", 800.0, 100.0),
            make_view("A", "m", 300.0, 100.0),
        ];
        let overlays = overlays_with(&[], &[]);

        let out = run_filter(&records, &overlays, &Query::default());
        assert_eq!(out.len(), 3);
        assert_eq!(out.last().unwrap().product_name, "無量");
        assert_eq!(out.last().unwrap().unit_price, f64::INFINITY);
    }

    // -----------------------------------------------------------------------
    // cheapest alternatives
    // -----------------------------------------------------------------------

    #[test]
    fn cheapest_alternatives_top_three_same_name() {
        let records = vec![
            make_view("X", "m", 500.0, 100.0),
            make_view("X", "m", 300.0, 100.0),
            make_view("X", "m", 800.0, 100.0),
            make_view("X", "m", 400.0, 100.0),
            make_view("Y", "m", 100.0, 100.0),
        ];

        let out = cheapest_alternatives(&records, "X", &HashSet::new(), 3);
        assert_eq!(out.len(), 3);
        let prices: Vec<f64> = out.iter().map(|r| r.unit_price).collect();
        assert_eq!(prices, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn cheapest_alternatives_skips_hidden() {
        let records = vec![
            make_view("X", "m", 300.0, 100.0),
            make_view("X", "m", 500.0, 100.0),
        ];
        let hidden: HashSet<Uuid> = [records[0].record_id].into_iter().collect();

        let out = cheapest_alternatives(&records, "X", &hidden, 3);
        assert_eq!(out.len(), 1);
        assert!((out[0].unit_price - 5.0).abs() < f64::EPSILON);
    }
}

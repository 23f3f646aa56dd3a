//! Property tests for classification and slot placement:
//! - positions stay inside the slot range and are monotonic
//! - exact matches land on their own slot
//! - the numeric partition is exhaustive and disjoint

use std::collections::BTreeSet;

use distplot::classify::{is_discrete, partition_numeric};
use distplot::position::position;
use distplot::table::{Column, Table};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;

// =============================================================================
// Strategy Helpers
// =============================================================================

/// Ascending, distinct, finite values as a count plot axis would hold them.
fn unique_axis() -> impl Strategy<Value = Vec<f64>> {
    btree_set(-1000i32..1000, 1..40)
        .prop_map(|set: BTreeSet<i32>| set.into_iter().map(|v| v as f64 * 0.5).collect())
}

/// Numeric columns of equal length, some integer-valued, some fractional.
fn numeric_table() -> impl Strategy<Value = Table> {
    (1usize..60, 1usize..6).prop_flat_map(|(rows, cols)| {
        vec(
            (any::<bool>(), vec(proptest::option::of(0i32..8), rows)),
            cols,
        )
        .prop_map(move |specs| {
            let mut table = Table::new();
            for (i, (fractional, values)) in specs.into_iter().enumerate() {
                let values = values
                    .into_iter()
                    .map(|v| v.map(|v| if fractional { v as f64 + 0.25 } else { v as f64 }))
                    .collect();
                table
                    .add_column(Column::numeric(format!("c{i}"), values))
                    .expect("equal lengths");
            }
            table
        })
    })
}

// =============================================================================
// Position Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_position_in_range(axis in unique_axis(), value in -2000.0f64..2000.0) {
        let p = position(value, &axis).unwrap();
        prop_assert!(p >= 0.0 && p <= (axis.len() - 1) as f64, "{} out of range", p);
    }

    #[test]
    fn prop_position_monotonic(
        axis in unique_axis(),
        a in -2000.0f64..2000.0,
        b in -2000.0f64..2000.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let p_lo = position(lo, &axis).unwrap();
        let p_hi = position(hi, &axis).unwrap();
        prop_assert!(p_lo <= p_hi, "position({}) = {} > position({}) = {}", lo, p_lo, hi, p_hi);
    }

    #[test]
    fn prop_exact_match_is_own_slot(axis in unique_axis(), pick in any::<prop::sample::Index>()) {
        let i = pick.index(axis.len());
        prop_assert_eq!(position(axis[i], &axis), Some(i as f64));
    }

    // -------------------------------------------------------------------------
    // Classification Properties
    // -------------------------------------------------------------------------

    #[test]
    fn prop_partition_exhaustive_and_disjoint(table in numeric_table()) {
        let partition = partition_numeric(&table, 0.05).unwrap();
        prop_assert_eq!(partition.len(), table.column_count());
        for name in &partition.discrete {
            prop_assert!(!partition.continuous.contains(name));
        }
        for column in table.columns() {
            prop_assert!(partition.contains(&column.name));
        }
    }

    #[test]
    fn prop_fractional_columns_never_discrete(
        values in vec(proptest::option::of(0i32..5), 1..200)
    ) {
        let values: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| v.map(|v| v as f64 + 0.5))
            .collect();
        let any_valid = values.iter().any(Option::is_some);
        let discrete = is_discrete("x", &values, 0.05).unwrap();
        // Only a column with no valid entries passes the whole-number check.
        prop_assert_eq!(discrete, !any_valid);
    }

    #[test]
    fn prop_whole_numbers_follow_ratio(distinct in 1usize..10, repeats in 1usize..60) {
        let values: Vec<Option<f64>> = (0..distinct * repeats)
            .map(|i| Some((i % distinct) as f64))
            .collect();
        let ratio = distinct as f64 / values.len() as f64;
        prop_assert_eq!(is_discrete("x", &values, 0.05).unwrap(), ratio < 0.05);
    }
}

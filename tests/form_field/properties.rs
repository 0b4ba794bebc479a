//! Property Tests
//!
//! Randomized checks of the field's round-trip and rejection behavior.

use crate::*;
use jsonform::chrono::{Duration, Timelike};
use jsonform::Error;
use proptest::prelude::*;

fn any_naive_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (1i32..=9999, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(y, mo, d, h, mi, s)| naive_datetime(y, mo, d, h, mi, s))
}

fn any_offset() -> impl Strategy<Value = FixedOffset> {
    (-(23 * 60 + 59)..=(23 * 60 + 59)).prop_map(|minutes: i32| offset(minutes * 60))
}

/// Leaves that survive prepare/clean unchanged under default options
fn any_stable_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z ]{0,12}".prop_map(Value::from),
        any_naive_datetime().prop_map(Value::from),
        any_naive_datetime().prop_map(|dt| Value::Date(dt.date())),
    ]
}

fn any_stable_tree() -> impl Strategy<Value = Value> {
    any_stable_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|entries| entries.into_iter().collect::<Value>()),
        ]
    })
}

proptest! {
    #[test]
    fn prop_whole_second_timestamps_round_trip(dt in any_naive_datetime(), off in any_offset()) {
        let field = strict_field();
        for value in [Value::from(dt), Value::DateTime(Timestamp::aware(dt, off))] {
            let text = field.prepare_value(&value).unwrap();
            prop_assert_eq!(clean_ok(&field, &text), value);
        }
    }

    #[test]
    fn prop_sub_millisecond_precision_is_lost(dt in any_naive_datetime(), micros in 1i64..1000) {
        let field = strict_field();
        let precise = dt + Duration::microseconds(micros);
        let text = field.prepare_value(&Value::from(precise)).unwrap();
        let cleaned = clean_ok(&field, &text);
        let ts = cleaned.as_datetime().unwrap();
        prop_assert_eq!(ts.naive_local(), dt);
        prop_assert_eq!(ts.time().nanosecond(), 0);
    }

    #[test]
    fn prop_aware_times_always_rejected(h in 0u32..24, m in 0u32..60, off in any_offset()) {
        let time = TimeOfDay::aware(NaiveTime::from_hms_opt(h, m, 0).unwrap(), off);
        let err = strict_field().prepare_value(&Value::Time(time)).unwrap_err();
        prop_assert!(matches!(err, Error::Encode(ref e) if e.is_domain_error()));
    }

    #[test]
    fn prop_utc_renders_as_z(dt in any_naive_datetime()) {
        let text = strict_field()
            .prepare_value(&Value::DateTime(Timestamp::aware(dt, offset(0))))
            .unwrap();
        prop_assert!(text.ends_with("Z\""), "{}", text);
    }

    #[test]
    fn prop_stable_trees_round_trip(tree in any_stable_tree()) {
        let field = strict_field();
        let text = field.prepare_value(&tree).unwrap();
        prop_assert_eq!(clean_ok(&field, &text), tree);
    }

    #[test]
    fn prop_literal_and_strict_agree_on_json(tree in any_stable_tree()) {
        let text = strict_field().prepare_value(&tree).unwrap();
        prop_assert_eq!(clean_ok(&literal_field(), &text), clean_ok(&strict_field(), &text));
    }

    #[test]
    fn prop_truncated_arrays_report_position(items in prop::collection::vec(any::<i64>(), 1..6), cut in 1usize..64) {
        let field = strict_field();
        let text = field.prepare_value(&Value::Array(items.into_iter().map(Value::Int).collect())).unwrap();
        let cut = cut.min(text.len() - 1);
        match field.clean(Some(&text[..cut])) {
            Err(Error::Decode(e)) => prop_assert!(e.offset <= cut),
            other => prop_assert!(false, "{:?} accepted: {:?}", &text[..cut], other),
        }
    }
}

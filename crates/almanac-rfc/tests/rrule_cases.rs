mod rrule_cases_data;

use std::collections::HashSet;

use rrule_cases_data::{assert_case, assert_matches_rrule_crate, expand_case, rrule_cases};

#[test_log::test]
fn rrule_cases_expand() {
    for case in rrule_cases() {
        assert_case(&case);
    }
}

#[test]
fn rrule_cases_never_repeat_an_instant() {
    for case in rrule_cases() {
        let timestamps = expand_case(&case);
        let unique: HashSet<i64> = timestamps.iter().copied().collect();
        assert_eq!(
            unique.len(),
            timestamps.len(),
            "Case {} repeated an occurrence",
            case.name
        );
    }
}

#[test]
fn rrule_cases_agree_with_rrule_crate() {
    for case in rrule_cases().iter().filter(|case| case.cross_check) {
        assert_matches_rrule_crate(case);
    }
}

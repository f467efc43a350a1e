//! Aggregate-rating properties from the public API.

use space_service::services::ratings::average_score;

#[test]
fn known_score_sets() {
    assert_eq!(average_score(&[5, 3, 4]), 4.0);
    assert_eq!(average_score(&[]), 0.0);
    assert_eq!(average_score(&[1, 2]), 1.5);
}

#[test]
fn replacing_a_contribution_changes_the_mean() {
    // a user re-rating from 5 to 2 replaces, never adds
    assert_eq!(average_score(&[3, 5]), 4.0);
    assert_eq!(average_score(&[3, 2]), 2.5);
}

#[test]
fn deleting_a_rating_shifts_the_mean() {
    assert_eq!(average_score(&[3, 5]), 4.0);
    assert_eq!(average_score(&[3]), 3.0);
}

#[test]
fn result_stays_within_score_bounds() {
    assert_eq!(average_score(&[1; 40]), 1.0);
    assert_eq!(average_score(&[5; 40]), 5.0);
}

#[test]
fn rounded_to_a_single_decimal() {
    let avg = average_score(&[2, 2, 5]); // exactly 3.0
    assert_eq!(avg, 3.0);

    let avg = average_score(&[4, 5]); // 4.5 stays 4.5
    assert_eq!(avg, 4.5);

    let avg = average_score(&[1, 1, 2]); // 4/3 -> 1.3
    assert_eq!(avg, 1.3);
}

//! Need filter evaluation
//!
//! `need_accepts` decides whether one fetched candidate satisfies one
//! need specification. It is a hard filter, not a ranking function:
//! every check is ANDed and the first failing check rejects. The
//! function is pure and synchronous so it can be tested in total
//! isolation from storage and network.

use spotter_common::models::{Candidate, NeedSpec, PreferredFoot};

/// Evaluate a candidate against a need. `exclude_loans` is supplied by
/// the caller independently of the need.
///
/// Unknown age and height compare as 0: they fail any configured floor
/// and pass any configured cap. Callers rely on unknown-age players
/// being excluded by default once an age floor is set.
pub fn need_accepts(need: &NeedSpec, candidate: &Candidate, exclude_loans: bool) -> bool {
    if exclude_loans && candidate.on_loan {
        return false;
    }

    let age = candidate.age.unwrap_or(0);
    if let Some(min) = need.min_age {
        if age < min {
            return false;
        }
    }
    if let Some(max) = need.max_age {
        if age > max {
            return false;
        }
    }

    let height = candidate.height_cm.unwrap_or(0);
    if let Some(min) = need.height_min {
        if height < min {
            return false;
        }
    }
    if let Some(max) = need.height_max {
        if height > max {
            return false;
        }
    }

    // Position is a case-insensitive substring match; a candidate with
    // no recorded position fails once a filter is set
    if let Some(filter) = &need.position {
        match &candidate.position {
            Some(position) => {
                if !position.to_lowercase().contains(&filter.to_lowercase()) {
                    return false;
                }
            }
            None => return false,
        }
    }

    // A candidate with no declared foot is never compared
    if need.preferred_foot != PreferredFoot::Any {
        if let Some(declared) = &candidate.preferred_foot {
            if !need.preferred_foot.matches(declared) {
                return false;
            }
        }
    }

    if !need.required_traits.is_empty() {
        if candidate.traits.is_empty() {
            return false;
        }
        let declared: Vec<String> = candidate
            .traits
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        for required in &need.required_traits {
            let required = required.trim().to_lowercase();
            if !declared.contains(&required) {
                return false;
            }
        }
    }

    // A missing candidate score compares as 0 against a configured floor
    for (attribute, floor) in need.min_stats.floors() {
        if let Some(floor) = floor {
            if candidate.scores.get(attribute).unwrap_or(0) < floor {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotter_common::models::{AttributeMinimums, AttributeScores};

    fn base_candidate() -> Candidate {
        Candidate {
            external_id: 77,
            name: "Nico Brandt".to_string(),
            age: Some(23),
            height_cm: Some(184),
            position: Some("Central Midfield".to_string()),
            preferred_foot: Some("Right".to_string()),
            league_name: "Bundesliga".to_string(),
            club_name: "FC Example".to_string(),
            on_loan: false,
            loan_from: None,
            scores: AttributeScores {
                technik: Some(72),
                schnelligkeit: Some(68),
                passspiel: Some(75),
                ..AttributeScores::default()
            },
            traits: vec!["Leadership".to_string(), "Vision".to_string()],
        }
    }

    #[test]
    fn all_open_need_accepts_anything() {
        let need = NeedSpec::default();
        assert!(need_accepts(&need, &base_candidate(), false));

        // Even a candidate with nothing but an id and a name
        let empty = Candidate {
            age: None,
            height_cm: None,
            position: None,
            preferred_foot: None,
            scores: AttributeScores::default(),
            traits: Vec::new(),
            ..base_candidate()
        };
        assert!(need_accepts(&need, &empty, false));
    }

    #[test]
    fn age_floor_is_inclusive() {
        let need = NeedSpec {
            min_age: Some(18),
            ..NeedSpec::default()
        };

        let too_young = Candidate {
            age: Some(17),
            ..base_candidate()
        };
        assert!(!need_accepts(&need, &too_young, false));

        let on_boundary = Candidate {
            age: Some(18),
            ..base_candidate()
        };
        assert!(need_accepts(&need, &on_boundary, false));
    }

    #[test]
    fn age_cap_is_inclusive() {
        let need = NeedSpec {
            max_age: Some(28),
            ..NeedSpec::default()
        };

        assert!(need_accepts(
            &need,
            &Candidate {
                age: Some(28),
                ..base_candidate()
            },
            false
        ));
        assert!(!need_accepts(
            &need,
            &Candidate {
                age: Some(29),
                ..base_candidate()
            },
            false
        ));
    }

    #[test]
    fn unknown_age_fails_any_positive_floor() {
        let need = NeedSpec {
            min_age: Some(1),
            ..NeedSpec::default()
        };
        let unknown = Candidate {
            age: None,
            ..base_candidate()
        };
        assert!(!need_accepts(&need, &unknown, false));
    }

    #[test]
    fn unknown_age_passes_any_cap() {
        let need = NeedSpec {
            max_age: Some(21),
            ..NeedSpec::default()
        };
        let unknown = Candidate {
            age: None,
            ..base_candidate()
        };
        assert!(need_accepts(&need, &unknown, false));
    }

    #[test]
    fn unknown_height_follows_the_same_policy_as_age() {
        let unknown = Candidate {
            height_cm: None,
            ..base_candidate()
        };

        let with_floor = NeedSpec {
            height_min: Some(170),
            ..NeedSpec::default()
        };
        assert!(!need_accepts(&with_floor, &unknown, false));

        let with_cap = NeedSpec {
            height_max: Some(170),
            ..NeedSpec::default()
        };
        assert!(need_accepts(&with_cap, &unknown, false));
    }

    #[test]
    fn height_window_is_inclusive() {
        let need = NeedSpec {
            height_min: Some(180),
            height_max: Some(190),
            ..NeedSpec::default()
        };

        for (height, expected) in [(179, false), (180, true), (190, true), (191, false)] {
            let candidate = Candidate {
                height_cm: Some(height),
                ..base_candidate()
            };
            assert_eq!(need_accepts(&need, &candidate, false), expected);
        }
    }

    #[test]
    fn position_matches_substring_case_insensitively() {
        let need = NeedSpec {
            position: Some("midfield".to_string()),
            ..NeedSpec::default()
        };
        assert!(need_accepts(&need, &base_candidate(), false));

        let defender = Candidate {
            position: Some("Centre-Back".to_string()),
            ..base_candidate()
        };
        assert!(!need_accepts(&need, &defender, false));
    }

    #[test]
    fn missing_position_fails_once_a_filter_is_set() {
        let need = NeedSpec {
            position: Some("midfield".to_string()),
            ..NeedSpec::default()
        };
        let unknown = Candidate {
            position: None,
            ..base_candidate()
        };
        assert!(!need_accepts(&need, &unknown, false));
    }

    #[test]
    fn preferred_foot_mismatch_rejects() {
        let need = NeedSpec {
            preferred_foot: PreferredFoot::Left,
            ..NeedSpec::default()
        };
        assert!(!need_accepts(&need, &base_candidate(), false));
    }

    #[test]
    fn preferred_foot_matches_case_insensitively() {
        let need = NeedSpec {
            preferred_foot: PreferredFoot::Right,
            ..NeedSpec::default()
        };
        let candidate = Candidate {
            preferred_foot: Some("RIGHT".to_string()),
            ..base_candidate()
        };
        assert!(need_accepts(&need, &candidate, false));
    }

    #[test]
    fn undeclared_foot_always_passes() {
        let need = NeedSpec {
            preferred_foot: PreferredFoot::Left,
            ..NeedSpec::default()
        };
        let undeclared = Candidate {
            preferred_foot: None,
            ..base_candidate()
        };
        assert!(need_accepts(&need, &undeclared, false));
    }

    #[test]
    fn required_traits_reject_empty_trait_list() {
        let need = NeedSpec {
            required_traits: vec!["leadership".to_string()],
            ..NeedSpec::default()
        };
        let no_traits = Candidate {
            traits: Vec::new(),
            ..base_candidate()
        };
        assert!(!need_accepts(&need, &no_traits, false));
    }

    #[test]
    fn required_traits_match_case_insensitively() {
        let need = NeedSpec {
            required_traits: vec!["leadership".to_string()],
            ..NeedSpec::default()
        };
        // Candidate declares "Leadership"
        assert!(need_accepts(&need, &base_candidate(), false));
    }

    #[test]
    fn every_required_trait_must_be_declared() {
        let need = NeedSpec {
            required_traits: vec!["leadership".to_string(), "set pieces".to_string()],
            ..NeedSpec::default()
        };
        assert!(!need_accepts(&need, &base_candidate(), false));
    }

    #[test]
    fn missing_score_compares_as_zero() {
        let need = NeedSpec {
            min_stats: AttributeMinimums {
                technik: Some(60),
                ..AttributeMinimums::default()
            },
            ..NeedSpec::default()
        };
        let no_scores = Candidate {
            scores: AttributeScores::default(),
            ..base_candidate()
        };
        assert!(!need_accepts(&need, &no_scores, false));
    }

    #[test]
    fn score_floor_is_inclusive() {
        let need = NeedSpec {
            min_stats: AttributeMinimums {
                technik: Some(72),
                ..AttributeMinimums::default()
            },
            ..NeedSpec::default()
        };
        assert!(need_accepts(&need, &base_candidate(), false));

        let stricter = NeedSpec {
            min_stats: AttributeMinimums {
                technik: Some(73),
                ..AttributeMinimums::default()
            },
            ..NeedSpec::default()
        };
        assert!(!need_accepts(&stricter, &base_candidate(), false));
    }

    #[test]
    fn every_configured_floor_is_enforced() {
        let need = NeedSpec {
            min_stats: AttributeMinimums {
                technik: Some(60),
                kopfball: Some(50), // candidate has no kopfball score
                ..AttributeMinimums::default()
            },
            ..NeedSpec::default()
        };
        assert!(!need_accepts(&need, &base_candidate(), false));
    }

    #[test]
    fn loan_exclusion_is_independent_of_the_need() {
        let loaned = Candidate {
            on_loan: true,
            loan_from: Some("Other FC".to_string()),
            ..base_candidate()
        };

        let need = NeedSpec::default();
        assert!(need_accepts(&need, &loaned, false));
        assert!(!need_accepts(&need, &loaned, true));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let need = NeedSpec {
            min_age: Some(20),
            position: Some("midfield".to_string()),
            required_traits: vec!["vision".to_string()],
            ..NeedSpec::default()
        };
        let candidate = base_candidate();

        let first = need_accepts(&need, &candidate, false);
        let second = need_accepts(&need, &candidate, false);
        assert_eq!(first, second);
        assert!(first);
    }

    #[test]
    fn fully_constrained_need_accepts_a_matching_candidate() {
        let need = NeedSpec {
            position: Some("Midfield".to_string()),
            min_age: Some(18),
            max_age: Some(26),
            height_min: Some(175),
            height_max: Some(190),
            preferred_foot: PreferredFoot::Right,
            required_traits: vec!["leadership".to_string(), "vision".to_string()],
            min_stats: AttributeMinimums {
                technik: Some(70),
                passspiel: Some(70),
                ..AttributeMinimums::default()
            },
            ..NeedSpec::default()
        };
        assert!(need_accepts(&need, &base_candidate(), false));
    }
}

//! Tests for the risk score and the overlay decision table

use stunting_screen::{
    ClassifierLabel, FinalStatus, MAX_RISK_SCORE, RiskIndicators, adverse_factors, finalize,
    risk_score,
};

fn no_risk() -> RiskIndicators {
    RiskIndicators {
        insured: true,
        clean_water: true,
        sanitary_latrine: true,
        household_smoking: false,
        comorbidity: false,
        maternal_malnutrition: false,
    }
}

#[test]
fn risk_score_counts_adverse_indicators() {
    assert_eq!(risk_score(&no_risk()), 0);

    let two = RiskIndicators {
        insured: false,
        household_smoking: true,
        ..no_risk()
    };
    assert_eq!(risk_score(&two), 2);

    let all = RiskIndicators {
        insured: false,
        clean_water: false,
        sanitary_latrine: false,
        household_smoking: true,
        comorbidity: true,
        maternal_malnutrition: true,
    };
    assert_eq!(risk_score(&all), MAX_RISK_SCORE);
}

#[test]
fn adverse_factors_name_what_scored() {
    let two = RiskIndicators {
        insured: false,
        household_smoking: true,
        ..no_risk()
    };
    let names = adverse_factors(&two);
    assert_eq!(names, vec!["uninsured", "household smoking"]);
    assert!(adverse_factors(&no_risk()).is_empty());
}

#[test]
fn decision_table_totality() {
    // Every (label, risk) pair maps to exactly one of the four statuses
    for label in [ClassifierLabel::Normal, ClassifierLabel::Stunting] {
        for risk in 0..=MAX_RISK_SCORE {
            let status = finalize(label, risk);
            let expected = match (label, risk) {
                (ClassifierLabel::Stunting, r) if r >= 3 => FinalStatus::StuntingRisikoTinggi,
                (ClassifierLabel::Normal, r) if r >= 2 => FinalStatus::BerisikoStunting,
                (ClassifierLabel::Normal, _) => FinalStatus::Normal,
                (ClassifierLabel::Stunting, _) => FinalStatus::Stunting,
            };
            assert_eq!(status, expected, "label {label:?} risk {risk}");
        }
    }
}

#[test]
fn stunting_rule_wins_over_at_risk_rule() {
    // When both conditions hold, the stunting rule is checked first:
    // a stunted child with high risk is never merely "at risk"
    for risk in 3..=MAX_RISK_SCORE {
        let status = finalize(ClassifierLabel::Stunting, risk);
        assert_eq!(status, FinalStatus::StuntingRisikoTinggi);
        assert_ne!(status, FinalStatus::BerisikoStunting);
    }
}

#[test]
fn finalize_is_idempotent() {
    for label in [ClassifierLabel::Normal, ClassifierLabel::Stunting] {
        for risk in 0..=MAX_RISK_SCORE {
            assert_eq!(finalize(label, risk), finalize(label, risk));
        }
    }
}

#[test]
fn worked_examples() {
    // Stunting with four risk factors is high-risk stunting
    assert_eq!(
        finalize(ClassifierLabel::Stunting, 4),
        FinalStatus::StuntingRisikoTinggi
    );
    // Normal with no risk factors stays normal
    assert_eq!(finalize(ClassifierLabel::Normal, 0), FinalStatus::Normal);
    // Normal with two risk factors is flagged
    assert_eq!(
        finalize(ClassifierLabel::Normal, 2),
        FinalStatus::BerisikoStunting
    );
    // Stunting with two risk factors stays plain stunting
    assert_eq!(finalize(ClassifierLabel::Stunting, 2), FinalStatus::Stunting);
}

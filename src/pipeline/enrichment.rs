//! Advisory enrichment appended to analysis output.
//!
//! A static rule table: case-insensitive substring triggers over the
//! extracted report text select canned lifestyle-advisory blocks. Purely
//! deterministic; the reasoning service is not involved.

struct AdvisoryRule {
    triggers: &'static [&'static str],
    heading: &'static str,
    body: &'static str,
}

static NUTRITION_RULES: &[AdvisoryRule] = &[
    AdvisoryRule {
        triggers: &["hemoglobin", "haemoglobin", "ferritin"],
        heading: "Iron & hemoglobin",
        body: "Include iron-rich foods such as spinach, lentils, and lean meats, \
               and pair them with vitamin C sources for better absorption.",
    },
    AdvisoryRule {
        triggers: &["vitamin"],
        heading: "Vitamins",
        body: "Ensure adequate vitamin D through sunlight or fortified foods, and \
               cover the B-complex range with whole grains and leafy greens.",
    },
    AdvisoryRule {
        triggers: &["cholesterol", "ldl", "hdl", "triglyceride"],
        heading: "Heart health",
        body: "Limit saturated and trans fats, include omega-3 rich foods such as \
               fish and walnuts, and increase soluble fiber through oats and beans.",
    },
    AdvisoryRule {
        triggers: &["glucose", "hba1c", "blood sugar"],
        heading: "Blood sugar",
        body: "Choose complex carbohydrates over simple sugars, include protein \
               with each meal, and consider smaller, more frequent meals.",
    },
];

static EXERCISE_RULES: &[AdvisoryRule] = &[
    AdvisoryRule {
        triggers: &["hemoglobin", "haemoglobin", "anemia", "anaemia"],
        heading: "Activity with low iron markers",
        body: "Start with low-intensity activities such as walking or gentle yoga, \
               increase gradually as levels improve, and watch fatigue closely.",
    },
    AdvisoryRule {
        triggers: &["cholesterol", "ldl", "triglyceride"],
        heading: "Cardiovascular activity",
        body: "Prioritize aerobic exercise (brisk walking, cycling, swimming) — \
               around 150 minutes of moderate cardio per week — alongside two or \
               three resistance sessions.",
    },
    AdvisoryRule {
        triggers: &["glucose", "hba1c", "diabetes"],
        heading: "Activity and blood sugar",
        body: "Exercising 30-60 minutes after meals helps glucose control; combine \
               cardio with resistance training.",
    },
];

const ADVISORY_DISCLAIMER: &str =
    "Discuss any dietary or exercise changes with your healthcare provider before acting on them.";

/// Build the advisory sections matching the report's markers.
///
/// Returns an empty string when no rule triggers, so unrelated analyses are
/// not padded with generic advice.
pub fn advisory_sections(report_text: &str) -> String {
    let haystack = report_text.to_lowercase();

    let mut sections = String::new();
    for rule in NUTRITION_RULES.iter().chain(EXERCISE_RULES) {
        if rule.triggers.iter().any(|t| haystack.contains(t)) {
            sections.push_str("\n\n## ");
            sections.push_str(rule.heading);
            sections.push('\n');
            sections.push_str(rule.body);
        }
    }

    if !sections.is_empty() {
        sections.push_str("\n\n");
        sections.push_str(ADVISORY_DISCLAIMER);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cholesterol_report_gets_heart_and_cardio_sections() {
        let sections = advisory_sections("Total Cholesterol 240 mg/dL (ref < 200)");
        assert!(sections.contains("Heart health"));
        assert!(sections.contains("Cardiovascular activity"));
        assert!(sections.contains(ADVISORY_DISCLAIMER));
    }

    #[test]
    fn triggers_are_case_insensitive() {
        let sections = advisory_sections("GLUCOSE: 110 MG/DL");
        assert!(sections.contains("Blood sugar"));
        assert!(sections.contains("Activity and blood sugar"));
    }

    #[test]
    fn unrelated_report_yields_no_sections() {
        assert_eq!(advisory_sections("Thyroid TSH 2.1 mIU/L"), "");
    }

    #[test]
    fn selection_is_deterministic() {
        let report = "Hemoglobin 11.9 g/dL, Vitamin D 18 ng/mL";
        assert_eq!(advisory_sections(report), advisory_sections(report));
    }

    #[test]
    fn each_matched_rule_appears_once() {
        let sections = advisory_sections("ferritin 8 ng/mL and hemoglobin 10 g/dL");
        assert_eq!(sections.matches("Iron & hemoglobin").count(), 1);
    }
}

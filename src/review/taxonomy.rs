//! The standard label sets reviewers pick from.
//!
//! These mirror the taxonomy the classifier was trained on. They seed the
//! console prompts; free-text labels remain valid, since validation only
//! requires that both labels are non-empty.

pub const STANDARD_ISSUES: [&str; 8] = [
    "PAYMENT_PROBLEM",
    "DATA_LOSS",
    "ACCOUNT_ACCESS",
    "SOFTWARE_BUG",
    "CONNECTIVITY_ISSUE",
    "HARDWARE_FAILURE",
    "DELIVERY_PROBLEM",
    "GENERAL_SUPPORT",
];

pub const STANDARD_INTENTS: [&str; 3] = ["WANTS_INFO", "WANTS_ACTION", "WANTS_SUPPORT"];

#[cfg(test)]
mod tests {
    use super::{STANDARD_INTENTS, STANDARD_ISSUES};

    #[test]
    fn taxonomies_have_no_duplicates() {
        let mut issues = STANDARD_ISSUES.to_vec();
        issues.sort_unstable();
        issues.dedup();
        assert_eq!(issues.len(), STANDARD_ISSUES.len());

        let mut intents = STANDARD_INTENTS.to_vec();
        intents.sort_unstable();
        intents.dedup();
        assert_eq!(intents.len(), STANDARD_INTENTS.len());
    }
}

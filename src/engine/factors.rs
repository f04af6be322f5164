//! Contributing-factor list parsing and canonicalization.

/// Legacy factor labels and the label that replaces them.
static SUBSTITUTIONS: &[(&str, &str)] = &[
    ("UNSAFE SPEED", "FAILED TO CONTROL SPEED"),
    ("SPEEDING - (OVERLIMIT)", "FAILED TO CONTROL SPEED"),
    ("HAD BEEN DRINKING", "UNDER INFLUENCE - ALCOHOL"),
];

fn substitute(factor: &str) -> Option<&'static str> {
    SUBSTITUTIONS
        .iter()
        .find(|(legacy, _)| *legacy == factor)
        .map(|(_, target)| *target)
}

/// Splits a raw `;`-delimited factor string into trimmed labels.
///
/// Empty tokens (e.g. from `"A;;B"` or a trailing `;`) are dropped.
pub fn parse_factor_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonicalizes one record's factors.
///
/// Each legacy label is replaced by its target, unless the target was
/// already present among the original factors, in which case the legacy
/// label is dropped. The result is deduplicated keeping first-seen order.
pub fn normalize_factors<S: AsRef<str>>(factors: &[S]) -> Vec<String> {
    let originals: Vec<&str> = factors.iter().map(|f| f.as_ref().trim()).collect();

    let mut normalized: Vec<String> = Vec::with_capacity(originals.len());

    for &factor in &originals {
        let label = match substitute(factor) {
            Some(target) if originals.contains(&target) => continue,
            Some(target) => target,
            None => factor,
        };

        if !normalized.iter().any(|existing| existing == label) {
            normalized.push(label.to_string());
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_empty() {
        assert_eq!(
            parse_factor_list(" DRIVER INATTENTION ;UNSAFE SPEED;;  "),
            vec!["DRIVER INATTENTION", "UNSAFE SPEED"]
        );
        assert!(parse_factor_list("").is_empty());
    }

    #[test]
    fn test_legacy_label_replaced() {
        assert_eq!(
            normalize_factors(&["UNSAFE SPEED", "DRIVER INATTENTION"]),
            vec!["FAILED TO CONTROL SPEED", "DRIVER INATTENTION"]
        );
        assert_eq!(
            normalize_factors(&["HAD BEEN DRINKING"]),
            vec!["UNDER INFLUENCE - ALCOHOL"]
        );
    }

    #[test]
    fn test_legacy_label_dropped_when_target_present() {
        assert_eq!(
            normalize_factors(&["UNSAFE SPEED", "FAILED TO CONTROL SPEED"]),
            vec!["FAILED TO CONTROL SPEED"]
        );
        assert_eq!(
            normalize_factors(&["UNDER INFLUENCE - ALCOHOL", "HAD BEEN DRINKING"]),
            vec!["UNDER INFLUENCE - ALCOHOL"]
        );
    }

    #[test]
    fn test_two_legacy_labels_collapse_to_one() {
        assert_eq!(
            normalize_factors(&["UNSAFE SPEED", "SPEEDING - (OVERLIMIT)"]),
            vec!["FAILED TO CONTROL SPEED"]
        );
    }

    #[test]
    fn test_duplicates_removed_in_first_seen_order() {
        assert_eq!(
            normalize_factors(&["NONE", "DRIVER INATTENTION", "NONE"]),
            vec!["NONE", "DRIVER INATTENTION"]
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs: [&[&str]; 4] = [
            &["UNSAFE SPEED", "HAD BEEN DRINKING", "NONE"],
            &["SPEEDING - (OVERLIMIT)", "FAILED TO CONTROL SPEED", "UNSAFE SPEED"],
            &["DRIVER INATTENTION", "DRIVER INATTENTION"],
            &[],
        ];

        for input in inputs {
            let once = normalize_factors(input);
            let twice = normalize_factors(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_no_legacy_label_survives_alongside_target() {
        let out = normalize_factors(&["HAD BEEN DRINKING", "UNSAFE SPEED", "UNDER INFLUENCE - ALCOHOL"]);
        for (legacy, _) in SUBSTITUTIONS {
            assert!(!out.iter().any(|f| f == legacy));
        }
    }
}

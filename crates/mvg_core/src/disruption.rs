use crate::Disruption;

/// Whether any disruption lists `line`.
pub fn is_affected(line: &str, disruptions: &[Disruption]) -> bool {
    disruptions
        .iter()
        .any(|disruption| disruption.lines.iter().any(|l| l == line))
}

/// `"<duration> - <title>"` of the first disruption listing `line`, or an
/// empty string.
pub fn detail_text(line: &str, disruptions: &[Disruption]) -> String {
    disruptions
        .iter()
        .find(|disruption| disruption.lines.iter().any(|l| l == line))
        .map(|disruption| format!("{} - {}", disruption.duration, disruption.title))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disruptions() -> Vec<Disruption> {
        vec![
            Disruption {
                lines: vec!["U1".into(), "U2".into()],
                title: "Signal failure at Hauptbahnhof".into(),
                duration: "until 14:00".into(),
            },
            Disruption {
                lines: vec!["U2".into()],
                title: "Construction works".into(),
                duration: "all weekend".into(),
            },
        ]
    }

    #[test]
    fn test_is_affected() {
        let disruptions = disruptions();
        assert!(is_affected("U1", &disruptions));
        assert!(is_affected("U2", &disruptions));
        assert!(!is_affected("U3", &disruptions));
        assert!(!is_affected("U1", &[]));
    }

    #[test]
    fn test_detail_text() {
        let disruptions = disruptions();
        assert_eq!(
            detail_text("U1", &disruptions),
            "until 14:00 - Signal failure at Hauptbahnhof"
        );
        // first match wins
        assert_eq!(
            detail_text("U2", &disruptions),
            "until 14:00 - Signal failure at Hauptbahnhof"
        );
        assert_eq!(detail_text("U3", &disruptions), "");
    }
}

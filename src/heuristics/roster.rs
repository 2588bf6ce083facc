use crate::models::{AnalystIdentity, Roster};

/// Detect analysts named in a transcript header.
///
/// A line containing `trigger` (case-insensitive) with at least two words
/// contributes a name made of every word but the last; the last word is
/// assumed to be a label such as "Analyst" and is dropped. Firm is left empty.
pub fn detect_roster(header_lines: &[&str], trigger: &str) -> Roster {
    let trigger = trigger.to_lowercase();
    let mut roster = Roster::new();

    for line in header_lines {
        if !line.to_lowercase().contains(&trigger) {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        let name = parts[..parts.len() - 1].join(" ");
        roster.insert(AnalystIdentity::new(name));
    }

    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_name_before_label() {
        let header = ["Jane Doe Analyst", "John Q. Roe - Research Analyst"];
        let roster = detect_roster(&header, "analyst");

        let keys: Vec<&str> = roster.keys().collect();
        assert_eq!(keys, vec!["jane doe", "john q. roe - research"]);
        assert_eq!(roster.get("jane doe").unwrap().name, "Jane Doe");
        assert!(roster.get("jane doe").unwrap().firm.is_empty());
    }

    #[test]
    fn test_single_word_line_ignored() {
        let roster = detect_roster(&["Analysts", "ANALYST"], "analyst");
        assert!(roster.is_empty());
    }

    #[test]
    fn test_lines_without_trigger_ignored() {
        let roster = detect_roster(&["Matt Baer CEO", "Operator"], "analyst");
        assert!(roster.is_empty());
    }

    #[test]
    fn test_repeated_name_last_wins() {
        let header = ["jane doe analyst", "Jane Doe Analyst"];
        let roster = detect_roster(&header, "analyst");
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get("jane doe").unwrap().name, "Jane Doe");
    }
}

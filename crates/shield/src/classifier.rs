//! Dialog text classification.
//!
//! Keyword lists are data, not control flow: the interceptor only asks
//! "does this text look like a known social-engineering pattern", so the
//! lists can be tuned and tested independently of the interception
//! mechanics.

/// Decides whether dialog text matches a suppression pattern.
pub trait DialogClassifier: Send + Sync {
    fn matches(&self, text: &str) -> bool;
}

/// Case-insensitive substring matcher over a keyword list.
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Patterns seen in fake confirm dialogs: browser-update scams, virus
    /// warnings, navigation-away traps.
    pub fn confirm_scams() -> Self {
        Self::new(&["leave", "chrome", "update", "install", "virus", "warning"])
    }

    /// Patterns seen in advertising and VPN-nag alerts.
    pub fn alert_nags() -> Self {
        Self::new(&["ad", "block", "vpn", "disable"])
    }
}

impl DialogClassifier for KeywordClassifier {
    fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_scams() {
        let classifier = KeywordClassifier::confirm_scams();
        assert!(classifier.matches("Your Chrome is out of date!"));
        assert!(classifier.matches("WARNING: virus detected"));
        assert!(classifier.matches("Are you sure you want to LEAVE this page?"));
        assert!(!classifier.matches("Resume playback from 12:34?"));
    }

    #[test]
    fn test_alert_nags() {
        let classifier = KeywordClassifier::alert_nags();
        assert!(classifier.matches("Please disable your AD BLOCKER"));
        assert!(classifier.matches("Get our VPN for uninterrupted streaming"));
        assert!(!classifier.matches("Now playing: episode 4"));
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = KeywordClassifier::new(&["Virus"]);
        assert!(classifier.matches("vIrUs found"));
    }
}

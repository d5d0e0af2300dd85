use once_cell::sync::Lazy;
use regex::Regex;

use super::TabInfo;

/// URLs served by the tracked chat service
pub const DEFAULT_CHAT_HOST_PATTERN: &str = r"(?:chat\.openai\.com|chatgpt\.com)";

static RE_CHAT_HOST: Lazy<Regex> = Lazy::new(|| Regex::new(DEFAULT_CHAT_HOST_PATTERN).unwrap());

/// URL filter deciding which tabs are tracked and listed
#[derive(Debug, Clone)]
pub struct ChatHostPattern {
    re: Regex,
}

impl ChatHostPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            re: Regex::new(pattern)?,
        })
    }

    pub fn is_match(&self, url: &str) -> bool {
        !url.is_empty() && self.re.is_match(url)
    }

    /// Tabs without a URL never match
    pub fn matches_tab(&self, tab: &TabInfo) -> bool {
        tab.url.as_deref().is_some_and(|url| self.is_match(url))
    }

    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }
}

impl Default for ChatHostPattern {
    fn default() -> Self {
        Self {
            re: RE_CHAT_HOST.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::WindowId;
    use crate::tracker::TabId;

    #[test]
    fn test_default_matches_chat_hosts() {
        let pattern = ChatHostPattern::default();
        assert!(pattern.is_match("https://chatgpt.com/c/abc123"));
        assert!(pattern.is_match("https://chat.openai.com/"));
    }

    #[test]
    fn test_default_rejects_other_hosts() {
        let pattern = ChatHostPattern::default();
        assert!(!pattern.is_match("https://example.com/"));
        assert!(!pattern.is_match("https://chatXopenai.com/"));
        assert!(!pattern.is_match(""));
    }

    #[test]
    fn test_tab_without_url_never_matches() {
        let pattern = ChatHostPattern::default();
        let mut tab = TabInfo::new(TabId(1), WindowId(1), "https://chatgpt.com/");
        assert!(pattern.matches_tab(&tab));

        tab.url = None;
        assert!(!pattern.matches_tab(&tab));
    }

    #[test]
    fn test_custom_pattern() {
        let pattern = ChatHostPattern::new(r"claude\.ai").unwrap();
        assert!(pattern.is_match("https://claude.ai/chat/1"));
        assert!(!pattern.is_match("https://chatgpt.com/"));
        assert!(ChatHostPattern::new("(unclosed").is_err());
    }
}

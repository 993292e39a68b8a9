//! Keyword presence checks used by the heuristic stages

/// Keywords this short only match as whole words ("ai" must not hit "email")
const WHOLE_WORD_MAX_LEN: usize = 3;

/// Case-insensitive keyword check
///
/// Keywords of up to three characters must appear as a whole word; longer
/// keywords may appear anywhere in the text.
pub fn matches_keyword(text: &str, keyword: &str) -> bool {
    let text = text.to_lowercase();
    let keyword = keyword.to_lowercase();

    if keyword.chars().count() <= WHOLE_WORD_MAX_LEN {
        contains_word(&text, &keyword)
    } else {
        text.contains(&keyword)
    }
}

/// Case-insensitive whole-word check, regardless of length
pub fn contains_word(text: &str, word: &str) -> bool {
    let word = word.to_lowercase();
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|candidate| candidate == word)
}

/// True if any of `keywords` matches `text`
pub fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| matches_keyword(text, k))
}

/// First keyword (in list order) that matches `text`
pub fn first_match<'a>(text: &str, keywords: &[&'a str]) -> Option<&'a str> {
    keywords.iter().copied().find(|k| matches_keyword(text, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_word() {
        assert!(contains_word("Run a quick TEST today", "test"));
        assert!(!contains_word("latest contest results", "test"));
        assert!(contains_word("order 123 now", "123"));
    }

    #[test]
    fn test_short_keywords_need_whole_words() {
        assert!(matches_keyword("AI-powered tutoring", "ai"));
        assert!(!matches_keyword("email marketing tool", "ai"));
        assert!(!matches_keyword("online marketplace", "ar"));
        assert!(matches_keyword("AR glasses for surgeons", "ar"));
        assert!(matches_keyword("a mobile app for dog owners", "app"));
        assert!(!matches_keyword("job application tracker", "app"));
    }

    #[test]
    fn test_long_keywords_match_substrings() {
        assert!(matches_keyword("Machine Learning for farms", "machine learning"));
        assert!(matches_keyword("real-time bidding", "real-time"));
        assert!(matches_keyword("marketplaces for tutors", "marketplace"));
    }

    #[test]
    fn test_matches_any_and_first_match() {
        let keywords = ["website", "blog", "static"];
        assert!(matches_any("a simple blog engine", &keywords));
        assert!(!matches_any("a drone fleet", &keywords));
        assert_eq!(first_match("static blog generator", &keywords), Some("blog"));
        assert_eq!(first_match("nothing here", &keywords), None);
    }
}

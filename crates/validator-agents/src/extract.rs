//! Rule-based extraction of figures and names from search snippets
//!
//! Everything here is a shallow regex scan: money amounts, market sizes,
//! growth percentages, funding and user-base mentions, and candidate
//! competitor names.

use regex::Regex;
use std::sync::LazyLock;

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const TRILLION: f64 = 1_000_000_000_000.0;

static MONEY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:USD\s*)?\$?\d+(?:,\d{3})*(?:\.\d+)?\s*(?:trillion|billion|million|bn|mn|[TBMK])\b",
    )
    .expect("valid money regex")
});

static TRILLION_FIGURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:USD\s*)?\$?(\d+(?:,\d{3})*(?:\.\d+)?)\s*(?:trillion|T)\b")
        .expect("valid trillion regex")
});

static BILLION_FIGURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:USD\s*)?\$?(\d+(?:,\d{3})*(?:\.\d+)?)\s*(?:billion|bn|B)\b")
        .expect("valid billion regex")
});

static MILLION_FIGURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:USD\s*)?\$?(\d+(?:,\d{3})*(?:\.\d+)?)\s*(?:million|mn|M)\b")
        .expect("valid million regex")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:,\d{3})*(?:\.\d+)?").expect("valid number regex"));

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("valid percent regex"));

static VERSUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\w+)\s+vs\.?\s+(\w+)").expect("valid versus regex"));

static ALTERNATIVE_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\balternatives?\s+to\s+(\w+)").expect("valid alternatives regex")
});

static COMPETITORS_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\w+)\s+competitors?\b").expect("valid competitors regex")
});

static FUNDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)raised\s+\$\d+(?:\.\d+)?\s*(?:million|billion|[MBK])\b|\$\d+(?:\.\d+)?\s*(?:million|billion|[MBK])\b",
    )
    .expect("valid funding regex")
});

static USER_BASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:,\d{3})*(?:\.\d+)?\s*[MK]?\+?\s*(?:users|customers|clients)\b")
        .expect("valid user base regex")
});

/// Words the name patterns capture that are never company names
const NAME_STOPWORDS: &[&str] = &[
    "the", "and", "top", "best", "main", "key", "its", "their", "your", "other", "similar",
    "biggest", "major", "direct", "closest", "leading", "new", "more", "all", "with", "for",
];

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

fn first_capture(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_number(m.as_str()))
}

/// Every money-like token in `text`, in order of appearance
pub fn extract_money_mentions(text: &str) -> Vec<String> {
    MONEY_TOKEN
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Market size stated in `text`, in dollars
///
/// Trillion figures win over billion figures, which win over million
/// figures; within a scale the first mention is used.
pub fn parse_market_size(text: &str) -> Option<f64> {
    first_capture(&TRILLION_FIGURE, text)
        .map(|v| v * TRILLION)
        .or_else(|| first_capture(&BILLION_FIGURE, text).map(|v| v * BILLION))
        .or_else(|| first_capture(&MILLION_FIGURE, text).map(|v| v * MILLION))
}

/// Dollar value of a single token produced by [`extract_money_mentions`]
///
/// Tokens without a million/billion/trillion scale yield `None`.
pub fn parse_money_token(token: &str) -> Option<f64> {
    let number = NUMBER.find(token)?;
    let value = parse_number(number.as_str())?;
    let unit = token[number.end()..].trim().to_lowercase();

    let multiplier = match unit.as_str() {
        "t" | "trillion" => TRILLION,
        "b" | "bn" | "billion" => BILLION,
        "m" | "mn" | "million" => MILLION,
        _ => return None,
    };
    Some(value * multiplier)
}

/// First plain number in `text`, ignoring thousands separators
pub fn first_number(text: &str) -> Option<f64> {
    NUMBER.find(text).and_then(|m| parse_number(m.as_str()))
}

/// Percentages strictly between 0 and 100 found in `text`
pub fn extract_percentages(text: &str) -> Vec<f64> {
    PERCENT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()))
        .filter(|pct| *pct > 0.0 && *pct < 100.0)
        .collect()
}

/// Candidate competitor names from "X vs Y", "alternatives to X" and
/// "X competitors" phrasing, in pattern order
pub fn extract_competitor_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();

    for caps in VERSUS.captures_iter(text) {
        names.extend(
            [caps.get(1), caps.get(2)]
                .into_iter()
                .flatten()
                .map(|m| m.as_str().to_string()),
        );
    }
    names.extend(
        ALTERNATIVE_TO
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
    );
    names.extend(
        COMPETITORS_OF
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
    );

    names
        .into_iter()
        .filter(|name| is_plausible_name(name))
        .collect()
}

fn is_plausible_name(name: &str) -> bool {
    name.chars().any(char::is_alphabetic)
        && !NAME_STOPWORDS.contains(&name.to_lowercase().as_str())
}

/// First label of the link's host, ignoring a leading `www.`
pub fn domain_name(link: &str) -> Option<String> {
    let parsed = url::Url::parse(link).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

/// First funding mention such as `$25M` or `raised $40 million`
pub fn extract_funding(text: &str) -> Option<String> {
    FUNDING.find(text).map(|m| m.as_str().to_string())
}

/// First user-base mention such as `2M users`
pub fn extract_user_base(text: &str) -> Option<String> {
    USER_BASE.find(text).map(|m| m.as_str().to_string())
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Truncate to at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// `$15.8B` for values of a billion or more, `$750.0M` otherwise
pub fn format_market_value(value: f64) -> String {
    if value >= BILLION {
        format!("${:.1}B", value / BILLION)
    } else {
        format!("${:.1}M", value / MILLION)
    }
}

/// Whole dollars with thousands separators, e.g. `$85,000`
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${out}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_mentions() {
        let text = "The market was valued at USD 15.79 billion in 2023 and may reach $45.2B by 2030, \
                    up from $900M; 2024 market data";
        let tokens = extract_money_mentions(text);
        assert_eq!(tokens, vec!["USD 15.79 billion", "$45.2B", "$900M"]);
    }

    #[test]
    fn test_money_mentions_ignore_years() {
        assert!(extract_money_mentions("In 2024 more founders entered").is_empty());
    }

    #[test]
    fn test_parse_market_size_prefers_billions() {
        let text = "Startups raised $300 million while the market hit $12.5 billion";
        assert_eq!(parse_market_size(text), Some(12.5 * BILLION));
    }

    #[test]
    fn test_parse_market_size_millions_and_commas() {
        assert_eq!(parse_market_size("a $1,250 million niche"), Some(1_250.0 * MILLION));
        assert_eq!(parse_market_size("worth 4.3 trillion dollars"), Some(4.3 * TRILLION));
        assert_eq!(parse_market_size("no figures at all"), None);
    }

    #[test]
    fn test_parse_money_token() {
        assert_eq!(parse_money_token("$4.5B"), Some(4.5 * BILLION));
        assert_eq!(parse_money_token("USD 15 billion"), Some(15.0 * BILLION));
        assert_eq!(parse_money_token("250 mn"), Some(250.0 * MILLION));
        assert_eq!(parse_money_token("$40K"), None);
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("$15.8B"), Some(15.8));
        assert_eq!(first_number("about 1,200 users"), Some(1200.0));
        assert_eq!(first_number("none"), None);
    }

    #[test]
    fn test_percentages_filtered_to_growth_range() {
        let text = "CAGR of 14.2% through 2030; 100% of users; 0% fees; 23 % annually";
        assert_eq!(extract_percentages(text), vec![14.2, 23.0]);
    }

    #[test]
    fn test_competitor_names() {
        let text = "Notion vs Coda: the best alternatives to Evernote. Top competitors include Obsidian";
        assert_eq!(
            extract_competitor_names(text),
            vec!["Notion", "Coda", "Evernote"]
        );

        let text = "Mint competitors ranked";
        assert_eq!(extract_competitor_names(text), vec!["Mint"]);
    }

    #[test]
    fn test_domain_name() {
        assert_eq!(domain_name("https://www.notion.so/pricing"), Some("notion".to_string()));
        assert_eq!(domain_name("http://g2.com/compare"), Some("g2".to_string()));
        assert_eq!(domain_name("not a url"), None);
    }

    #[test]
    fn test_funding_and_user_base() {
        let snippet = "The company raised $40 million in Series B and serves 2M users worldwide";
        assert_eq!(extract_funding(snippet).as_deref(), Some("raised $40 million"));
        assert_eq!(extract_user_base(snippet).as_deref(), Some("2M users"));

        assert_eq!(extract_funding("valued at $1.2B").as_deref(), Some("$1.2B"));
        assert_eq!(extract_funding("no money talk"), None);
    }

    #[test]
    fn test_capitalize_and_truncate() {
        assert_eq!(capitalize("nOTION"), "Notion");
        assert_eq!(capitalize(""), "");
        assert_eq!(truncate_chars("héllo world", 5), "héllo");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_market_value(15_800_000_000.0), "$15.8B");
        assert_eq!(format_market_value(750_000_000.0), "$750.0M");
        assert_eq!(format_usd(85_000), "$85,000");
        assert_eq!(format_usd(1_234_567), "$1,234,567");
        assert_eq!(format_usd(999), "$999");
        assert_eq!(format_usd(0), "$0");
    }
}

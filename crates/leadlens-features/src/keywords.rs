//! Keyword tables and matching for title and industry classification.
//!
//! Matching is token-based rather than raw substring containment so that
//! short keywords cannot fire inside longer words ("vp" must not match
//! "development"). Tokens are lowercased with non-alphanumeric characters
//! stripped, which also folds "V.P." into "vp".

/// A keyword with its matching rule.
pub(crate) enum Keyword {
    /// Exact token match.
    Word(&'static str),
    /// Token prefix match: `Stem("lend")` fires on "lending" and "lender".
    Stem(&'static str),
    /// Consecutive tokens, each matched by prefix, so
    /// `Phrase(&["digital", "bank"])` fires on "digital banking".
    Phrase(&'static [&'static str]),
}

impl Keyword {
    fn matches(&self, tokens: &[String]) -> bool {
        match self {
            Keyword::Word(w) => tokens.iter().any(|t| t == w),
            Keyword::Stem(s) => tokens.iter().any(|t| t.starts_with(s)),
            Keyword::Phrase(words) => tokens
                .windows(words.len())
                .any(|win| win.iter().zip(words.iter()).all(|(t, w)| t.starts_with(w))),
        }
    }
}

/// Lowercase and strip each whitespace-delimited word down to its
/// alphanumeric characters, dropping anything left empty.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.to_lowercase()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// 1 if any keyword in the set matches, else 0. Flags are numeric 0/1 for
/// direct modeling compatibility.
pub(crate) fn flag(tokens: &[String], keywords: &[Keyword]) -> i64 {
    i64::from(keywords.iter().any(|k| k.matches(tokens)))
}

// Seniority keyword sets. A title may set several flags at once (a "Chief
// Operating Officer" is both c-level and officer); the downstream score is a
// weighted sum, not a single category pick.
pub(crate) const CEO: &[Keyword] = &[
    Keyword::Word("ceo"),
    Keyword::Phrase(&["chief", "executive"]),
    Keyword::Word("president"),
];
pub(crate) const C_LEVEL: &[Keyword] = &[
    Keyword::Word("chief"),
    Keyword::Word("cto"),
    Keyword::Word("cfo"),
    Keyword::Word("cio"),
    Keyword::Word("cro"),
    Keyword::Word("cmo"),
];
pub(crate) const EVP_SVP: &[Keyword] = &[
    Keyword::Word("evp"),
    Keyword::Word("svp"),
    Keyword::Phrase(&["executive", "vice", "president"]),
    Keyword::Phrase(&["senior", "vice", "president"]),
];
pub(crate) const VP: &[Keyword] = &[
    Keyword::Phrase(&["vice", "president"]),
    Keyword::Word("vp"),
];
pub(crate) const DIRECTOR: &[Keyword] = &[
    Keyword::Stem("director"),
    Keyword::Phrase(&["head", "of"]),
];
pub(crate) const MANAGER: &[Keyword] = &[
    Keyword::Stem("manager"),
    Keyword::Word("lead"),
    Keyword::Stem("supervisor"),
];
pub(crate) const OFFICER: &[Keyword] = &[
    Keyword::Stem("officer"),
    Keyword::Word("avp"),
    Keyword::Phrase(&["assistant", "vice", "president"]),
];

// Department keyword sets.
pub(crate) const LENDING: &[Keyword] = &[
    Keyword::Stem("lend"),
    Keyword::Stem("mortgage"),
    Keyword::Stem("loan"),
    Keyword::Stem("credit"),
    Keyword::Stem("originat"),
    Keyword::Word("abl"),
];
pub(crate) const TECH: &[Keyword] = &[
    Keyword::Stem("tech"),
    Keyword::Word("it"),
    Keyword::Stem("digital"),
    Keyword::Word("data"),
    Keyword::Stem("analytic"),
    Keyword::Word("ai"),
    Keyword::Stem("software"),
];
pub(crate) const OPERATIONS: &[Keyword] = &[
    Keyword::Stem("operat"),
    Keyword::Stem("process"),
    Keyword::Stem("delivery"),
    Keyword::Stem("service"),
    Keyword::Stem("support"),
];
pub(crate) const RISK: &[Keyword] = &[
    Keyword::Stem("risk"),
    Keyword::Stem("complian"),
    Keyword::Stem("secur"),
    Keyword::Stem("audit"),
];
pub(crate) const FINANCE: &[Keyword] = &[
    Keyword::Stem("financ"),
    Keyword::Word("fpa"),
    Keyword::Stem("treasury"),
    Keyword::Word("cfo"),
];
pub(crate) const STRATEGY: &[Keyword] = &[
    Keyword::Stem("strateg"),
    Keyword::Stem("transformation"),
    Keyword::Stem("innovat"),
    Keyword::Stem("growth"),
];

// Industry keyword sets, applied to the manual industry string.
pub(crate) const IND_CONSUMER: &[Keyword] = &[Keyword::Stem("consumer")];
pub(crate) const IND_LENDING: &[Keyword] = &[Keyword::Stem("lend")];
pub(crate) const IND_COMMERCIAL: &[Keyword] = &[
    Keyword::Stem("commercial"),
    Keyword::Phrase(&["corporate", "banking"]),
];
pub(crate) const IND_RETAIL: &[Keyword] = &[
    Keyword::Stem("retail"),
    Keyword::Phrase(&["personal", "banking"]),
];
pub(crate) const IND_FINTECH: &[Keyword] = &[
    Keyword::Stem("fintech"),
    Keyword::Phrase(&["digital", "bank"]),
];
pub(crate) const IND_CREDIT_UNION: &[Keyword] = &[
    Keyword::Phrase(&["credit", "union"]),
    Keyword::Stem("cooperativ"),
];

// Per-level weights of the seniority and department scores. These are part
// of the frozen model's feature contract, pinned to the served artifact —
// not free parameters.
pub(crate) const WEIGHT_CEO: i64 = 6;
pub(crate) const WEIGHT_C_LEVEL: i64 = 5;
pub(crate) const WEIGHT_EVP_SVP: i64 = 4;
pub(crate) const WEIGHT_VP: i64 = 3;
pub(crate) const WEIGHT_DIRECTOR: i64 = 2;
pub(crate) const WEIGHT_MANAGER: i64 = 1;
pub(crate) const WEIGHT_OFFICER: i64 = 2;

pub(crate) const WEIGHT_LENDING: i64 = 3;
pub(crate) const WEIGHT_FINANCE: i64 = 2;
pub(crate) const WEIGHT_RISK: i64 = 1;
pub(crate) const WEIGHT_STRATEGY: i64 = 1;
pub(crate) const WEIGHT_TECH: i64 = 1;
pub(crate) const WEIGHT_OPERATIONS: i64 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(tokenize("V.P., Lending!"), vec!["vp", "lending"]);
    }

    #[test]
    fn tokenize_empty_string_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  --  ").is_empty());
    }

    #[test]
    fn word_keyword_requires_whole_token() {
        let tokens = tokenize("VP of Development");
        assert_eq!(flag(&tokens, VP), 1);

        let tokens = tokenize("Senior Software Developer");
        assert_eq!(flag(&tokens, VP), 0, "vp must not fire inside developer");
    }

    #[test]
    fn dotted_abbreviation_matches_word() {
        let tokens = tokenize("V.P. of Operations");
        assert_eq!(flag(&tokens, VP), 1);
    }

    #[test]
    fn stem_keyword_matches_longer_forms() {
        let tokens = tokenize("Director of Lending Operations");
        assert_eq!(flag(&tokens, DIRECTOR), 1);
        assert_eq!(flag(&tokens, LENDING), 1);
        assert_eq!(flag(&tokens, OPERATIONS), 1);
    }

    #[test]
    fn phrase_keyword_requires_consecutive_tokens() {
        let tokens = tokenize("Senior Vice President, Retail");
        assert_eq!(flag(&tokens, EVP_SVP), 1);
        assert_eq!(flag(&tokens, VP), 1);

        // "vice ... president" split by an intervening token is no phrase.
        let tokens = tokenize("vice chairman and president");
        assert_eq!(flag(&tokens, EVP_SVP), 0);
    }

    #[test]
    fn phrase_prefix_matches_inflected_last_word() {
        let tokens = tokenize("Digital Banking");
        assert_eq!(flag(&tokens, IND_FINTECH), 1);
    }

    #[test]
    fn chief_executive_sets_ceo_and_c_level() {
        let tokens = tokenize("Chief Executive Officer");
        assert_eq!(flag(&tokens, CEO), 1);
        assert_eq!(flag(&tokens, C_LEVEL), 1);
        assert_eq!(flag(&tokens, OFFICER), 1);
    }

    #[test]
    fn chief_financial_officer_is_not_ceo() {
        let tokens = tokenize("Chief Financial Officer");
        assert_eq!(flag(&tokens, CEO), 0);
        assert_eq!(flag(&tokens, C_LEVEL), 1);
        assert_eq!(flag(&tokens, FINANCE), 1);
    }

    #[test]
    fn lead_matches_word_but_not_leadership() {
        assert_eq!(flag(&tokenize("Team Lead"), MANAGER), 1);
        assert_eq!(flag(&tokenize("Leadership Coach"), MANAGER), 0);
    }
}

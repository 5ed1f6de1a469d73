//! Post-processing of Markdown output.
//!
//! Markdown documents are produced through the same helpers as HTML, so
//! descriptions arrive wrapped in `<p>` and `<code>` tags. The rules below
//! strip that markup and normalise line endings. They run in order and each
//! one sees the output of the previous one, so reordering them changes the
//! result.

/// Literal find-and-replace applied to every occurrence of `pattern`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionRule {
    /// Text to find
    pub pattern: &'static str,
    /// Text to put in its place
    pub replacement: &'static str,
}

impl SubstitutionRule {
    /// Rule replacing `pattern` with `replacement`.
    #[must_use]
    pub const fn replace(pattern: &'static str, replacement: &'static str) -> Self {
        Self {
            pattern,
            replacement,
        }
    }

    /// Rule deleting every occurrence of `pattern`.
    #[must_use]
    pub const fn remove(pattern: &'static str) -> Self {
        Self::replace(pattern, "")
    }

    /// Applies this rule to `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_render::SubstitutionRule;
    ///
    /// let rule = SubstitutionRule::remove("<p>");
    /// assert_eq!(rule.apply("<p>a<p>b"), "ab");
    /// ```
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        text.replace(self.pattern, self.replacement)
    }
}

/// Rules turning rendered Markdown into its final form.
///
/// The blank-line collapse is a single pass: four consecutive newlines
/// become two, longer runs are only partially reduced.
pub const MARKDOWN_CLEANUP_RULES: &[SubstitutionRule] = &[
    SubstitutionRule::replace("\r\n", "\n"),
    SubstitutionRule::replace("\n\n\n\n", "\n\n"),
    SubstitutionRule::remove("</p>\n"),
    SubstitutionRule::remove("</p>"),
    SubstitutionRule::remove("<p>"),
    SubstitutionRule::remove("<code>"),
    SubstitutionRule::remove("</code>"),
];

/// Applies `rules` to `text` in sequence.
#[must_use]
pub fn apply_rules(text: &str, rules: &[SubstitutionRule]) -> String {
    rules
        .iter()
        .fold(text.to_string(), |current, rule| rule.apply(&current))
}

/// Applies [`MARKDOWN_CLEANUP_RULES`] to a rendered Markdown document.
///
/// # Examples
///
/// ```
/// use graphdoc_render::clean_markdown;
///
/// let cleaned = clean_markdown("## User\r\n\r\n<p>Use <code>id</code></p>\n");
/// assert_eq!(cleaned, "## User\n\nUse id");
/// ```
#[must_use]
pub fn clean_markdown(text: &str) -> String {
    apply_rules(text, MARKDOWN_CLEANUP_RULES)
}

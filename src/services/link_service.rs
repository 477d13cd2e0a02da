use std::borrow::Cow;

use regex::Regex;

const LINK_PATTERN: &str = r"\[([a-zA-Z0-9]+)\]";

/// Turns `[PageName]` tokens into links to `/view/PageName`
pub struct LinkRewriter {
    pattern: Regex,
}

impl LinkRewriter {
    pub fn new() -> Self {
        Self { pattern: Regex::new(LINK_PATTERN).expect("valid link regex") }
    }

    /// Rewrite every token in a single left-to-right pass.
    ///
    /// Tokens never overlap and are rewritten whether or not the target page
    /// exists. Text with no tokens is returned borrowed and untouched.
    pub fn rewrite<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, "<a href='/view/${1}'>${1}</a>")
    }

    /// Page names referenced by `text`, in order of appearance
    pub fn targets<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }
}

impl Default for LinkRewriter {
    fn default() -> Self {
        Self::new()
    }
}

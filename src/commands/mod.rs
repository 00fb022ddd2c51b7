pub mod cat;
pub mod dump_index;
pub mod extract;
pub mod info;
pub mod list;

use glob::{MatchOptions, Pattern};

/// Entry names use '/' as a separator, so wildcards don't cross it
pub fn matches_any(patterns: &[Pattern], name: &str) -> bool {
    patterns.iter().any(|pattern| {
        pattern.matches_with(
            name,
            MatchOptions {
                require_literal_separator: true,
                ..Default::default()
            },
        )
    })
}

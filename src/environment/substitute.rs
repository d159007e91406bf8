//! `{{variable}}` placeholder substitution.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::Environment;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^{}]*)\}\}").expect("placeholder regex is valid") // Static pattern, safe to panic
});

/// Replaces `{{key}}` placeholders with values from `environment`.
///
/// Placeholders naming an undefined key are left untouched, and without an
/// environment the template comes back unchanged. Substitution is a single
/// pass: a value that itself contains `{{...}}` is inserted literally and
/// not expanded again.
///
/// # Example
///
/// ```
/// use relay_core::environment::{Environment, substitute};
///
/// let env = Environment::new("1", "Local").with_variable("x", "host");
/// assert_eq!(substitute("{{x}}/path", Some(&env)), "host/path");
/// assert_eq!(substitute("{{missing}}", Some(&env)), "{{missing}}");
/// assert_eq!(substitute("{{x}}", None), "{{x}}");
/// ```
#[must_use]
pub fn substitute(template: &str, environment: Option<&Environment>) -> String {
    let Some(environment) = environment else {
        return template.to_string();
    };

    let replaced: Cow<'_, str> = PLACEHOLDER.replace_all(template, |captures: &Captures<'_>| {
        environment
            .get(&captures[1])
            .map_or_else(|| captures[0].to_string(), str::to_string)
    });
    replaced.into_owned()
}

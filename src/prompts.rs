//! Fixed prompt templates and the renderer that fills their slots.

use crate::{Error, Result};

/// A named prompt body with `{{slot}}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub slots: &'static [&'static str],
    pub body: &'static str,
}

pub const REFLECTIVE_LETTER: PromptTemplate = PromptTemplate {
    name: "reflective_letter",
    slots: &["dreams"],
    body: include_str!("../data/prompts/reflective_letter.txt"),
};

pub const RANDOM_DREAM: PromptTemplate = PromptTemplate {
    name: "random_dream",
    slots: &[],
    body: include_str!("../data/prompts/random_dream.txt"),
};

pub const DREAM_VALIDITY: PromptTemplate = PromptTemplate {
    name: "dream_validity",
    slots: &["dream"],
    body: include_str!("../data/prompts/dream_validity.txt"),
};

/// Replace `{{key}}` placeholders in a template.
///
/// `vars` must name every declared slot exactly once and nothing else.
/// Substituted values are copied literally and never re-scanned, so a value
/// that itself contains `{{dreams}}` is left as is.
pub fn render(template: &PromptTemplate, vars: &[(&str, &str)]) -> Result<String> {
    for slot in template.slots {
        if !vars.iter().any(|(key, _)| key == slot) {
            return Err(Error::Template(format!(
                "missing value for slot '{}' in template '{}'",
                slot, template.name
            )));
        }
    }
    for (i, (key, _)) in vars.iter().enumerate() {
        if vars[..i].iter().any(|(earlier, _)| earlier == key) {
            return Err(Error::Template(format!(
                "duplicate value for '{}' in template '{}'",
                key, template.name
            )));
        }
        if !template.slots.iter().any(|slot| slot == key) {
            return Err(Error::Template(format!(
                "unexpected value for '{}': template '{}' has no such slot",
                key, template.name
            )));
        }
    }

    let mut result = String::with_capacity(template.body.len());
    let mut rest = template.body;
    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            result.push_str(&rest[start..]);
            return Ok(result);
        };

        let key = &after_open[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }
    result.push_str(rest);

    Ok(result)
}

//! File name templates such as `{models}/{runs}/{fields}_{offsets}.png`.
//!
//! A placeholder names a collection and captures a non-empty run of
//! characters that never crosses a `/`. Two placeholders must be separated
//! by literal text.

use anyhow::{Context, Result};
use resource_index::CollectionId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(CollectionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    template: String,
    segments: Vec<Segment>,
}

impl FilePattern {
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = template;
        while !rest.is_empty() {
            match rest.find('{') {
                Some(0) => {
                    let end = rest
                        .find('}')
                        .with_context(|| format!("Unclosed placeholder in {}", template))?;
                    let name = &rest[1..end];
                    anyhow::ensure!(
                        !name.is_empty() && !name.contains('{'),
                        "Invalid placeholder in {}",
                        template
                    );
                    anyhow::ensure!(
                        !matches!(segments.last(), Some(Segment::Placeholder(_))),
                        "Placeholders in {} must be separated by literal text",
                        template
                    );
                    segments.push(Segment::Placeholder(CollectionId::new(name)));
                    rest = &rest[end + 1..];
                }
                Some(start) => {
                    segments.push(Segment::Literal(rest[..start].to_string()));
                    rest = &rest[start..];
                }
                None => {
                    segments.push(Segment::Literal(rest.to_string()));
                    rest = "";
                }
            }
        }
        anyhow::ensure!(
            segments.iter().any(|s| matches!(s, Segment::Placeholder(_))),
            "Pattern {} has no placeholders",
            template
        );
        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// Collections named by the template, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &CollectionId> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(c) => Some(c),
            Segment::Literal(_) => None,
        })
    }

    /// Split `name` into one value per placeholder.
    ///
    /// Earlier placeholders take the longest value that still lets the rest
    /// of the template match, so `wind_gusts_006.png` against
    /// `{fields}_{offsets}.png` yields `wind_gusts` and `006`.
    pub fn captures<'a>(&self, name: &'a str) -> Option<Vec<(&CollectionId, &'a str)>> {
        let mut captures = Vec::new();
        self.match_from(0, name, &mut captures)
            .then_some(captures)
    }

    fn match_from<'p, 'a>(
        &'p self,
        segment: usize,
        input: &'a str,
        captures: &mut Vec<(&'p CollectionId, &'a str)>,
    ) -> bool {
        let Some(current) = self.segments.get(segment) else {
            return input.is_empty();
        };
        match current {
            Segment::Literal(literal) => input
                .strip_prefix(literal.as_str())
                .is_some_and(|rest| self.match_from(segment + 1, rest, captures)),
            Segment::Placeholder(collection) => match self.segments.get(segment + 1) {
                None => {
                    if input.is_empty() || input.contains('/') {
                        return false;
                    }
                    captures.push((collection, input));
                    true
                }
                Some(Segment::Literal(literal)) => {
                    for (pos, _) in input.rmatch_indices(literal.as_str()) {
                        let value = &input[..pos];
                        if value.is_empty() || value.contains('/') {
                            continue;
                        }
                        captures.push((collection, value));
                        if self.match_from(segment + 1, &input[pos..], captures) {
                            return true;
                        }
                        captures.pop();
                    }
                    false
                }
                Some(Segment::Placeholder(_)) => false,
            },
        }
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)
    }
}

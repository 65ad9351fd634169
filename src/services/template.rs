use serde::Deserialize;
use std::collections::BTreeMap;

/// A document template: a string leaf or an arbitrarily nested sequence of
/// templates. Deserializes straight from the config JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TemplateNode {
    Line(String),
    Seq(Vec<TemplateNode>),
}

/// Token → replacement text, applied in the map's (sorted) iteration
/// order. Contexts are never mutated mid-render; build a new one with
/// `overlay` before each section instead.
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    map: BTreeMap<String, String>,
}

impl Replacements {
    pub fn new(map: BTreeMap<String, String>) -> Self {
        Replacements { map }
    }

    pub fn set(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.map.insert(token.into(), value.into());
    }

    /// A copy of this context extended (or overridden) with `pairs`.
    pub fn overlay<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = self.map.clone();
        for (k, v) in pairs {
            map.insert(k.into(), v.into());
        }
        Replacements { map }
    }

    /// Literal substring substitution of every known token, one pass.
    /// Replacement values containing token texts of already-applied pairs
    /// are emitted verbatim.
    pub fn apply(&self, line: &str) -> String {
        let mut out = line.to_string();
        for (token, value) in &self.map {
            out = out.replace(token, value);
        }
        out
    }
}

/// Expand a template into its final ordered line sequence: leaves are
/// substituted, sequences are flattened in order.
pub fn render(node: &TemplateNode, replacements: &Replacements) -> Vec<String> {
    let mut out = Vec::new();
    render_into(node, replacements, &mut out);
    out
}

fn render_into(node: &TemplateNode, replacements: &Replacements, out: &mut Vec<String>) {
    match node {
        TemplateNode::Line(s) => out.push(replacements.apply(s)),
        TemplateNode::Seq(items) => {
            for item in items {
                render_into(item, replacements, out);
            }
        }
    }
}

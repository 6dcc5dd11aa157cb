//! Template renderer module.
//!
//! Renders parsed template nodes with the given context. Every variable is
//! HTML-escaped on output.

use super::parser::Node;
use super::{Result, TemplateContext};

/// Template renderer.
pub struct Renderer<'a> {
    context: &'a TemplateContext,
}

impl<'a> Renderer<'a> {
    /// Create a new renderer with the given context.
    pub fn new(context: &'a TemplateContext) -> Self {
        Self { context }
    }

    /// Render a list of nodes to a string.
    pub fn render(&self, nodes: &[Node]) -> Result<String> {
        let mut output = String::new();
        self.render_into(nodes, &mut output);
        Ok(output)
    }

    fn render_into(&self, nodes: &[Node], output: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Variable(name) => {
                    // Missing variables render as nothing
                    if let Some(value) = self.context.get(name) {
                        push_escaped(output, &value.to_display_string());
                    }
                }
                Node::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    if self.is_truthy(condition) {
                        self.render_into(then_branch, output);
                    } else {
                        self.render_into(else_branch, output);
                    }
                }
                Node::Unless { condition, body } => {
                    if !self.is_truthy(condition) {
                        self.render_into(body, output);
                    }
                }
            }
        }
    }

    fn is_truthy(&self, name: &str) -> bool {
        self.context.get(name).is_some_and(|v| v.is_truthy())
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}

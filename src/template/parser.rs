//! Template parser module.
//!
//! Parses template strings into a tree of nodes.

use super::{Result, TemplateError};

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Raw text content.
    Text(String),

    /// Variable reference: `{{name}}`
    Variable(String),

    /// Conditional block: `{{#if condition}}...{{else}}...{{/if}}`
    If {
        condition: String,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },

    /// Inverse conditional: `{{#unless condition}}...{{/unless}}`
    Unless { condition: String, body: Vec<Node> },
}

/// Template parser.
pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the template into a list of nodes.
    pub fn parse(mut self) -> Result<Vec<Node>> {
        let nodes = self.parse_nodes(None)?;
        if self.pos < self.input.len() {
            // Only a stray closing tag stops the top level early
            return Err(self.error("unexpected closing tag"));
        }
        Ok(nodes)
    }

    fn parse_nodes(&mut self, block: Option<&str>) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();

        while self.pos < self.input.len() {
            if self.peek_str("{{/") {
                break;
            }
            if block == Some("if") && self.at_else() {
                break;
            }

            if self.peek_str("\\{{") {
                self.pos += 3;
                nodes.push(Node::Text("{{".to_string()));
            } else if self.peek_str("{{") {
                nodes.push(self.parse_tag()?);
            } else {
                let text = self.collect_text();
                if !text.is_empty() {
                    nodes.push(Node::Text(text));
                }
            }
        }

        Ok(nodes)
    }

    fn parse_tag(&mut self) -> Result<Node> {
        self.expect("{{")?;
        self.skip_whitespace();

        if self.peek_char() == Some('#') {
            self.advance();
            return self.parse_block_tag();
        }

        let name = self.parse_identifier()?;
        if name == "else" {
            return Err(self.error("{{else}} outside of an if block"));
        }
        self.close_tag()?;

        Ok(Node::Variable(name))
    }

    fn parse_block_tag(&mut self) -> Result<Node> {
        let tag_name = self.parse_identifier()?;
        self.skip_whitespace();
        let condition = self.parse_identifier()?;
        self.close_tag()?;

        match tag_name.as_str() {
            "if" => {
                let then_branch = self.parse_nodes(Some("if"))?;
                let else_branch = if self.at_else() {
                    self.expect("{{")?;
                    self.skip_whitespace();
                    self.expect("else")?;
                    self.close_tag()?;
                    self.parse_nodes(Some("if"))?
                } else {
                    Vec::new()
                };
                self.end_block("if")?;

                Ok(Node::If {
                    condition,
                    then_branch,
                    else_branch,
                })
            }
            "unless" => {
                let body = self.parse_nodes(Some("unless"))?;
                self.end_block("unless")?;

                Ok(Node::Unless { condition, body })
            }
            _ => Err(TemplateError::Parse(format!(
                "unknown block tag '{tag_name}'"
            ))),
        }
    }

    fn end_block(&mut self, tag: &str) -> Result<()> {
        if self.pos >= self.input.len() {
            return Err(self.error(&format!("unclosed {{{{#{tag}}}}} block")));
        }
        self.expect("{{/")?;
        self.skip_whitespace();
        self.expect(tag)?;
        self.close_tag()
    }

    fn at_else(&self) -> bool {
        let rest = &self.input[self.pos..];
        match rest.strip_prefix("{{") {
            Some(inner) => inner.trim_start().starts_with("else")
                && inner.trim_start()["else".len()..].trim_start().starts_with("}}"),
            None => false,
        }
    }

    fn close_tag(&mut self) -> Result<()> {
        self.skip_whitespace();
        self.expect("}}")
    }

    fn parse_identifier(&mut self) -> Result<String> {
        let start = self.pos;

        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(self.error("expected identifier"));
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn collect_text(&mut self) -> String {
        let start = self.pos;

        while self.pos < self.input.len() {
            if self.peek_str("{{") || self.peek_str("\\{{") {
                break;
            }
            self.advance();
        }

        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, s: &str) -> Result<()> {
        if self.peek_str(s) {
            self.pos += s.len();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{s}'")))
        }
    }

    fn error(&self, message: &str) -> TemplateError {
        let line = self.input[..self.pos].matches('\n').count() + 1;
        let found: String = self.input[self.pos..].chars().take(10).collect();
        TemplateError::Parse(format!("{message} at line {line} (found '{found}')"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<Node>> {
        Parser::new(input).parse()
    }

    #[test]
    fn test_parse_text_only() {
        let nodes = parse("<p>Hello</p>").unwrap();
        assert_eq!(nodes, vec![Node::Text("<p>Hello</p>".to_string())]);
    }

    #[test]
    fn test_parse_variable() {
        let nodes = parse("Hello, {{ fullname }}!").unwrap();

        assert_eq!(
            nodes,
            vec![
                Node::Text("Hello, ".to_string()),
                Node::Variable("fullname".to_string()),
                Node::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_if_else() {
        let nodes = parse("{{#if error}}<p>{{error}}</p>{{else}}ok{{/if}}").unwrap();

        assert_eq!(
            nodes,
            vec![Node::If {
                condition: "error".to_string(),
                then_branch: vec![
                    Node::Text("<p>".to_string()),
                    Node::Variable("error".to_string()),
                    Node::Text("</p>".to_string()),
                ],
                else_branch: vec![Node::Text("ok".to_string())],
            }]
        );
    }

    #[test]
    fn test_parse_unless() {
        let nodes = parse("{{#unless error}}welcome{{/unless}}").unwrap();

        assert_eq!(
            nodes,
            vec![Node::Unless {
                condition: "error".to_string(),
                body: vec![Node::Text("welcome".to_string())],
            }]
        );
    }

    #[test]
    fn test_parse_nested_blocks() {
        let nodes = parse("{{#if a}}{{#unless b}}x{{/unless}}{{/if}}").unwrap();

        assert_eq!(
            nodes,
            vec![Node::If {
                condition: "a".to_string(),
                then_branch: vec![Node::Unless {
                    condition: "b".to_string(),
                    body: vec![Node::Text("x".to_string())],
                }],
                else_branch: vec![],
            }]
        );
    }

    #[test]
    fn test_parse_escaped_braces() {
        let nodes = parse("\\{{literal}}").unwrap();

        assert_eq!(
            nodes,
            vec![
                Node::Text("{{".to_string()),
                Node::Text("literal}}".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse("{{#if x}}open"), Err(TemplateError::Parse(_))));
        assert!(matches!(parse("{{#each xs}}{{/each}}"), Err(TemplateError::Parse(_))));
        assert!(matches!(parse("{{/if}}"), Err(TemplateError::Parse(_))));
        assert!(matches!(parse("{{else}}"), Err(TemplateError::Parse(_))));
        assert!(matches!(parse("{{name"), Err(TemplateError::Parse(_))));
        assert!(matches!(parse("{{#if a}}x{{/unless}}"), Err(TemplateError::Parse(_))));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse("<html>\n<body>\n{{#if x}}").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }
}

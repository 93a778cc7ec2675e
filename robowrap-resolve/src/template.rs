use std::fmt::Display;

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::char,
    combinator::{all_consuming, map},
    multi::many0,
    sequence::delimited,
    IResult,
};

use crate::{ResolveError, StackFrame};

/// Expands every `$name$` in `template` from the given stack of variables
///
/// Fails on the first name without a value rather than leaving the token in place, so a
/// half-expanded path is never handed to Robocopy.
pub fn expand(template: &str, stack: &StackFrame) -> Result<String, ResolveError> {
    Template::parse(template)?.expand(stack)
}

/// A string split into literal text and `$name$` variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'t>(&'t str, Vec<Token<'t>>);

impl<'t> Template<'t> {
    /// Tokenises the template
    ///
    /// A `$` which does not start a well formed `$name$` is kept as text, so paths like
    /// `\\host\C$\Backup` need no escaping.
    pub fn parse(text: &'t str) -> Result<Self, ResolveError> {
        match all_consuming(many0(token))(text) {
            Ok((_, tokens)) => Ok(Template(text, tokens)),
            Err(_) => Err(ResolveError::InvalidTemplate(text.to_owned())),
        }
    }

    /// The unparsed template
    pub fn as_str(&self) -> &'t str {
        self.0
    }

    /// The parsed tokens
    pub fn tokens(&self) -> &[Token<'t>] {
        &self.1[..]
    }

    /// The variables used by the template, in order of use
    pub fn variables(&self) -> impl Iterator<Item = &Identifier<'t>> {
        self.1.iter().filter_map(|token| match token {
            Token::Variable(var) => Some(var),
            Token::Text(_) => None,
        })
    }

    /// Substitutes each variable, without expanding any tokens within the substituted values
    pub fn expand(&self, stack: &StackFrame) -> Result<String, ResolveError> {
        let mut value = String::with_capacity(self.0.len());
        for token in self.tokens() {
            match token {
                Token::Text(text) => value.push_str(text),
                Token::Variable(var) => {
                    let sub = stack.lookup(var.value()).ok_or_else(|| {
                        tracing::debug!("Undefined variable {} in {:?}\n{}", var, self.0, stack);
                        ResolveError::UnresolvedVariable(var.value().to_owned())
                    })?;
                    value.push_str(&sub);
                }
            }
        }
        Ok(value)
    }
}

impl Display for Template<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Part of a [`Template`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'t> {
    /// Literal text
    Text(&'t str),
    /// A `$name$` to substitute
    Variable(Identifier<'t>),
}

/// The name of a variable, without its `$` delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier<'t>(&'t str);

impl<'t> Identifier<'t> {
    pub fn new(s: &'t str) -> Self {
        Identifier(s)
    }

    pub fn value(&self) -> &'t str {
        self.0
    }
}

impl Display for Identifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn token(s: &str) -> IResult<&str, Token> {
    alt((variable, text, stray_dollar))(s)
}

fn text(s: &str) -> IResult<&str, Token> {
    map(is_not("$"), Token::Text)(s)
}

/// A variable such as `$src_drive$` or `$PROGRAMFILES(X86)$`
fn variable(s: &str) -> IResult<&str, Token> {
    map(delimited(char('$'), identifier, char('$')), Token::Variable)(s)
}

/// Anything up to the closing `$`, short of a separator or whitespace, so that misspelt names
/// still fail to resolve
fn identifier(s: &str) -> IResult<&str, Identifier> {
    map(is_not("$\\/ \t\r\n"), Identifier::new)(s)
}

fn stray_dollar(s: &str) -> IResult<&str, Token> {
    map(tag("$"), Token::Text)(s)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::VariableSource;

    fn stack() -> StackFrame<'static> {
        StackFrame::stack(VariableSource::Map(HashMap::from([
            ("path".to_owned(), "C:\\MyStuff".to_owned()),
            ("drive".to_owned(), "C:".to_owned()),
            ("PROGRAMFILES(X86)".to_owned(), "C:\\Program Files (x86)".to_owned()),
            ("nested".to_owned(), "$path$".to_owned()),
        ])))
    }

    #[test]
    fn tokens() {
        let template = Template::parse("$drive$\\Logs\\$name$.log").unwrap();
        assert_eq!(
            template.tokens(),
            [
                Token::Variable(Identifier::new("drive")),
                Token::Text("\\Logs\\"),
                Token::Variable(Identifier::new("name")),
                Token::Text(".log"),
            ]
        );
        let names: Vec<&str> = template.variables().map(Identifier::value).collect();
        assert_eq!(names, ["drive", "name"]);
    }

    #[test]
    fn stray_dollars_are_text() {
        for text in ["\\\\host\\C$\\Backup", "costs $5", "$", "$$", "a$ b$"] {
            let template = Template::parse(text).unwrap();
            assert_eq!(template.variables().count(), 0, "{text}");
            assert_eq!(template.expand(&stack()).unwrap(), text);
        }
    }

    #[test]
    fn dollar_before_a_variable() {
        let template = Template::parse("$$path$").unwrap();
        assert_eq!(template.tokens()[0], Token::Text("$"));
        assert_eq!(template.expand(&stack()).unwrap(), "$C:\\MyStuff");
    }

    #[test]
    fn expands_every_occurrence() {
        assert_eq!(
            expand("$path$\\Robocopy.flag", &stack()).unwrap(),
            "C:\\MyStuff\\Robocopy.flag"
        );
        assert_eq!(expand("$drive$$drive$|$drive$", &stack()).unwrap(), "C:C:|C:");
        assert_eq!(
            expand("$PROGRAMFILES(X86)$\\Tool", &stack()).unwrap(),
            "C:\\Program Files (x86)\\Tool"
        );
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(
            expand("$PATH$", &stack()),
            Err(ResolveError::UnresolvedVariable("PATH".into()))
        );
    }

    #[test]
    fn misspelt_names_are_variables() {
        assert_eq!(
            expand("$dst-drive$\\x", &stack()),
            Err(ResolveError::UnresolvedVariable("dst-drive".into()))
        );
        assert_eq!(
            expand("$dst-drive$\\Logs\\run.log", &StackFrame::stack(VariableSource::Empty)),
            Err(ResolveError::UnresolvedVariable("dst-drive".into()))
        );
        assert_eq!(
            expand("$drive.letter$", &stack()),
            Err(ResolveError::UnresolvedVariable("drive.letter".into()))
        );
        // A separator or space after the `$` still makes it literal
        assert_eq!(expand("\\\\host\\C$\\$drive$", &stack()).unwrap(), "\\\\host\\C$\\C:");
    }

    #[test]
    fn unresolved_fails_without_partial_result() {
        assert_eq!(
            expand("$drive$\\$unknown$\\$path$", &stack()),
            Err(ResolveError::UnresolvedVariable("unknown".into()))
        );
    }

    #[test]
    fn values_are_not_expanded_again() {
        assert_eq!(expand("$nested$", &stack()).unwrap(), "$path$");
    }

    #[test]
    fn expanded_text_is_stable() {
        let once = expand("$path$\\$drive$", &stack()).unwrap();
        assert_eq!(expand(&once, &stack()).unwrap(), once);
        assert_eq!(expand("", &stack()).unwrap(), "");
    }
}

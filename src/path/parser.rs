//! Location path parser
//!
//! Recursive descent over the tokens of [`Lexer`]. Supported grammar:
//!
//! ```text
//! path      := ('/' | '//')? step (('/' | '//') step)*
//! step      := '.' | '..' | '@' test | 'text()' | test predicate*
//! test      := name | '*'
//! predicate := '[' or ']'
//! or        := and ('or' and)*
//! and       := primary ('and' primary)*
//! primary   := number | 'last()' | '(' or ')' | operand (('=' | '!=') literal)?
//! operand   := '@' test | 'text()' | '.' | test
//! ```
use super::lexer::{Lexer, Token};
use crate::node::NodeName;

/// A parsed path: a list of steps applied left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    pub(crate) absolute: bool,
    pub(crate) steps: Vec<Step>,
}

/// Location step in a path
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}
impl Step {
    fn new(axis: Axis, test: NodeTest) -> Self {
        Self {
            axis,
            test,
            predicates: vec![],
        }
    }

    /// `//` is shorthand for `/descendant-or-self::node()/`
    fn descendant_or_self() -> Self {
        Self::new(Axis::DescendantOrSelf, NodeTest::Node)
    }

    /// Steps selecting attributes or text cannot be followed by other steps.
    fn is_terminal(&self) -> bool {
        self.axis == Axis::Attribute || self.test == NodeTest::Text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Child,
    DescendantOrSelf,
    SelfNode,
    Parent,
    Attribute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeTest {
    /// `*`
    Any,

    /// A qualified name
    Name(String),

    /// Any node, including the document itself
    Node,

    /// `text()`
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    NotEq,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Predicate {
    /// `[2]`, 1-based
    Position(usize),

    /// `[last()]`
    Last,

    /// `[name]`, `[@name]`, `[text()]`
    Exists(Operand),

    /// `[name='value']`
    Compare(Operand, CompareOp, String),

    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Child(NodeTest),
    Attribute(NodeTest),
    Text,
    Context,
}

/// Location path parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Parser { lexer, current }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn expect(&mut self, token: &Token) -> Result<(), String> {
        if &self.current != token {
            return Err(format!("Expected {token:?}, found {:?}", self.current));
        }
        self.advance();
        Ok(())
    }

    /// Parse a complete location path
    pub fn parse(&mut self) -> Result<LocationPath, String> {
        let mut steps = vec![];
        let absolute = match self.current {
            Token::Slash => {
                self.advance();
                true
            }
            Token::DoubleSlash => {
                self.advance();
                steps.push(Step::descendant_or_self());
                true
            }
            _ => false,
        };

        loop {
            if steps.last().is_some_and(Step::is_terminal) {
                return Err("Attribute and text() steps must come last".to_string());
            }
            steps.push(self.parse_step()?);

            match self.current {
                Token::Slash => self.advance(),
                Token::DoubleSlash => {
                    self.advance();
                    steps.push(Step::descendant_or_self());
                }
                Token::Eof => break,
                ref other => return Err(format!("Unexpected {other:?} after step")),
            }
        }

        Ok(LocationPath { absolute, steps })
    }

    fn parse_step(&mut self) -> Result<Step, String> {
        let step = match self.current {
            Token::Dot => Step::new(Axis::SelfNode, NodeTest::Node),
            Token::DoubleDot => Step::new(Axis::Parent, NodeTest::Node),
            Token::At => {
                self.advance();
                let test = self.parse_name_test()?;
                return Ok(Step::new(Axis::Attribute, test));
            }
            Token::Function(ref name) if name == "text" => Step::new(Axis::Child, NodeTest::Text),
            Token::Name(_) | Token::Star => {
                let test = self.parse_name_test()?;
                let mut step = Step::new(Axis::Child, test);
                step.predicates = self.parse_predicates()?;
                return Ok(step);
            }
            Token::Eof => return Err("Expected a step, found end of path".to_string()),
            ref other => return Err(format!("Unexpected {other:?}")),
        };

        self.advance();
        Ok(step)
    }

    fn parse_name_test(&mut self) -> Result<NodeTest, String> {
        let test = match &self.current {
            Token::Star => NodeTest::Any,
            Token::Name(name) => {
                NodeName::parse(name).map_err(|e| e.kind.to_string())?;
                NodeTest::Name(name.clone())
            }
            other => return Err(format!("Expected a name or `*`, found {other:?}")),
        };

        self.advance();
        Ok(test)
    }

    fn parse_predicates(&mut self) -> Result<Vec<Predicate>, String> {
        let mut predicates = vec![];
        while self.current == Token::LeftBracket {
            self.advance();
            predicates.push(self.parse_or()?);
            self.expect(&Token::RightBracket)?;
        }
        Ok(predicates)
    }

    fn parse_or(&mut self) -> Result<Predicate, String> {
        let mut left = self.parse_and()?;
        while self.current == Token::Or {
            self.advance();
            let right = self.parse_and()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Predicate, String> {
        let mut left = self.parse_primary()?;
        while self.current == Token::And {
            self.advance();
            let right = self.parse_primary()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Predicate, String> {
        match self.current {
            Token::Number(0) => Err("Positions start at 1".to_string()),
            Token::Number(n) => {
                self.advance();
                Ok(Predicate::Position(n))
            }
            Token::Function(ref name) if name == "last" => {
                self.advance();
                Ok(Predicate::Last)
            }
            Token::LeftParen => {
                self.advance();
                let inner = self.parse_or()?;
                self.expect(&Token::RightParen)?;
                Ok(inner)
            }
            _ => {
                let operand = self.parse_operand()?;
                let op = match self.current {
                    Token::Eq => CompareOp::Eq,
                    Token::NotEq => CompareOp::NotEq,
                    _ => return Ok(Predicate::Exists(operand)),
                };

                self.advance();
                let literal = match &self.current {
                    Token::String(s) => s.clone(),
                    Token::Number(n) => n.to_string(),
                    other => return Err(format!("Expected a literal, found {other:?}")),
                };
                self.advance();
                Ok(Predicate::Compare(operand, op, literal))
            }
        }
    }

    fn parse_operand(&mut self) -> Result<Operand, String> {
        match self.current {
            Token::At => {
                self.advance();
                Ok(Operand::Attribute(self.parse_name_test()?))
            }
            Token::Function(ref name) if name == "text" => {
                self.advance();
                Ok(Operand::Text)
            }
            Token::Dot => {
                self.advance();
                Ok(Operand::Context)
            }
            Token::Name(_) | Token::Star => Ok(Operand::Child(self.parse_name_test()?)),
            Token::Function(ref name) => Err(format!("Unsupported function `{name}()`")),
            ref other => Err(format!("Unexpected {other:?} in predicate")),
        }
    }
}

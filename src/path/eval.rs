//! Location path evaluation over a [`NavigableTree`]
use super::parser::{Axis, CompareOp, LocationPath, NodeTest, Operand, Predicate, Step};
use crate::{
    node::ElementId,
    query::{NavigableTree, QueryMatch},
};
use std::collections::HashSet;

/// A node a step can start from. The document node sits above the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Context {
    Document,
    Element(ElementId),
}

/// Evaluate a path from the document node. Matches are in document order.
pub(crate) fn evaluate(path: &LocationPath, tree: &dyn NavigableTree) -> Vec<QueryMatch> {
    let mut contexts = vec![Context::Document];

    for step in &path.steps {
        match (step.axis, &step.test) {
            (Axis::Attribute, test) => {
                return elements(&contexts)
                    .flat_map(|id| tree.attributes(id))
                    .filter(|&attr| {
                        tree.attribute_name(attr)
                            .is_some_and(|name| name_matches(test, &name.to_string()))
                    })
                    .map(QueryMatch::Attribute)
                    .collect();
            }

            (_, NodeTest::Text) => {
                return elements(&contexts)
                    .filter(|&id| tree.has_text(id))
                    .map(QueryMatch::Text)
                    .collect();
            }

            _ => contexts = apply_step(tree, &contexts, step),
        }
    }

    elements(&contexts).map(QueryMatch::Element).collect()
}

fn elements(contexts: &[Context]) -> impl Iterator<Item = ElementId> + '_ {
    contexts.iter().filter_map(|c| match c {
        Context::Element(id) => Some(*id),
        Context::Document => None,
    })
}

/// Apply an element step to every context node. Positional predicates count
/// within each context node's candidates.
fn apply_step(tree: &dyn NavigableTree, contexts: &[Context], step: &Step) -> Vec<Context> {
    let mut seen = HashSet::new();
    let mut out = vec![];

    for &context in contexts {
        let candidates: Vec<Context> = match step.axis {
            Axis::Child => children(tree, context)
                .into_iter()
                .filter(|&c| test_matches(tree, &step.test, c))
                .collect(),
            Axis::DescendantOrSelf => descendants_or_self(tree, context),
            Axis::SelfNode => vec![context],
            Axis::Parent => match context {
                Context::Element(id) => vec![tree.parent(id).map_or(Context::Document, Context::Element)],
                Context::Document => vec![],
            },
            Axis::Attribute => vec![],
        };

        let len = candidates.len();
        for (i, candidate) in candidates.into_iter().enumerate() {
            let holds = step
                .predicates
                .iter()
                .all(|p| predicate_holds(tree, p, candidate, i + 1, len));
            if holds && seen.insert(candidate) {
                out.push(candidate);
            }
        }
    }

    out
}

fn children(tree: &dyn NavigableTree, context: Context) -> Vec<Context> {
    match context {
        Context::Document => vec![Context::Element(tree.root())],
        Context::Element(id) => tree.children(id).into_iter().map(Context::Element).collect(),
    }
}

/// Pre-order: the context, then its descendants in document order.
fn descendants_or_self(tree: &dyn NavigableTree, context: Context) -> Vec<Context> {
    let mut out = vec![];
    let mut stack = vec![context];
    while let Some(next) = stack.pop() {
        out.push(next);
        stack.extend(children(tree, next).into_iter().rev());
    }
    out
}

fn test_matches(tree: &dyn NavigableTree, test: &NodeTest, context: Context) -> bool {
    let Context::Element(id) = context else {
        return *test == NodeTest::Node;
    };

    match test {
        NodeTest::Any | NodeTest::Node => true,
        NodeTest::Name(expected) => tree.element_name(id).is_some_and(|name| name == expected.as_str()),
        NodeTest::Text => false,
    }
}

fn name_matches(test: &NodeTest, name: &str) -> bool {
    match test {
        NodeTest::Any | NodeTest::Node => true,
        NodeTest::Name(expected) => expected == name,
        NodeTest::Text => false,
    }
}

fn predicate_holds(tree: &dyn NavigableTree, predicate: &Predicate, context: Context, position: usize, len: usize) -> bool {
    match predicate {
        Predicate::Position(n) => position == *n,
        Predicate::Last => position == len,
        Predicate::And(a, b) => {
            predicate_holds(tree, a, context, position, len) && predicate_holds(tree, b, context, position, len)
        }
        Predicate::Or(a, b) => {
            predicate_holds(tree, a, context, position, len) || predicate_holds(tree, b, context, position, len)
        }

        Predicate::Exists(operand) => {
            let Context::Element(id) = context else {
                return false;
            };
            match operand {
                Operand::Context => true,
                Operand::Text => tree.has_text(id),
                _ => !operand_values(tree, operand, id).is_empty(),
            }
        }

        Predicate::Compare(operand, op, literal) => {
            let Context::Element(id) = context else {
                return false;
            };
            let values = operand_values(tree, operand, id);
            match op {
                CompareOp::Eq => values.iter().any(|v| v == literal),
                CompareOp::NotEq => values.iter().any(|v| v != literal),
            }
        }
    }
}

/// String values an operand selects from an element.
fn operand_values(tree: &dyn NavigableTree, operand: &Operand, id: ElementId) -> Vec<String> {
    match operand {
        Operand::Child(test) => tree
            .children(id)
            .into_iter()
            .filter(|&c| test_matches(tree, test, Context::Element(c)))
            .map(|c| tree.element_text(c))
            .collect(),
        Operand::Attribute(test) => tree
            .attributes(id)
            .into_iter()
            .filter(|&a| {
                tree.attribute_name(a)
                    .is_some_and(|name| name_matches(test, &name.to_string()))
            })
            .filter_map(|a| tree.attribute_value(a).map(str::to_string))
            .collect(),
        Operand::Text | Operand::Context => vec![tree.element_text(id)],
    }
}

//! Boolean lambda bodies to filter trees.

use crate::ast::{Key, Node};
use crate::codec::Native;
use crate::error::CompileError;

use super::{BinaryOp, Expr, PathCompiler};

/// Translates predicates such as `x => x.FirstName == "Jack" && x.Age > 10`
/// into filter nodes (`{fn: "Jack", age: {$gt: 10}}` once rendered).
pub struct PredicateTranslator;

impl PredicateTranslator {
    pub fn translate(expr: &Expr) -> Result<Node, CompileError> {
        Self::node(expr, expr)
    }

    fn node(root: &Expr, expr: &Expr) -> Result<Node, CompileError> {
        match expr {
            Expr::Binary {
                op: BinaryOp::And,
                ..
            } => {
                let mut terms = Vec::new();
                Self::flatten(expr, BinaryOp::And, &mut terms);
                let nodes = terms
                    .into_iter()
                    .map(|term| Self::node(root, term))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Node::and(nodes))
            }
            Expr::Binary {
                op: BinaryOp::Or, ..
            } => {
                let mut terms = Vec::new();
                Self::flatten(expr, BinaryOp::Or, &mut terms);
                let nodes = terms
                    .into_iter()
                    .map(|term| Self::node(root, term))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Node::Document(vec![(
                    Key::text("$or"),
                    Node::Array(nodes),
                )]))
            }
            Expr::Binary { left, op, right } => Self::comparison(root, left, *op, right),
            Expr::Not(inner) => Self::negation(root, inner),
            Expr::Call {
                object,
                method,
                arguments,
            } if method == "Contains" && arguments.len() == 1 => {
                let path = PathCompiler::compile(object)?;
                let value = Self::constant(root, &arguments[0])?;
                Ok(Node::entry(Key::element(path), Node::value(value.clone())))
            }
            Expr::Member { .. } | Expr::Cast { .. } => {
                let path = PathCompiler::compile(expr)?;
                Ok(Node::entry(Key::field(path), Node::value(true)))
            }
            other => Err(CompileError::unsupported(
                format!("predicate '{}'", other),
                root.to_string(),
            )),
        }
    }

    fn flatten<'e>(expr: &'e Expr, op: BinaryOp, terms: &mut Vec<&'e Expr>) {
        match expr {
            Expr::Binary {
                left,
                op: inner,
                right,
            } if *inner == op => {
                Self::flatten(left, op, terms);
                Self::flatten(right, op, terms);
            }
            other => terms.push(other),
        }
    }

    fn comparison(
        root: &Expr,
        left: &Expr,
        op: BinaryOp,
        right: &Expr,
    ) -> Result<Node, CompileError> {
        let (field, value, op) = match (left.constant_value(), right.constant_value()) {
            (None, Some(value)) => (left, value, op),
            (Some(value), None) => (right, value, Self::flip(op)),
            _ => {
                return Err(CompileError::unsupported(
                    format!("comparison '{}'", Expr::Binary {
                        left: Box::new(left.clone()),
                        op,
                        right: Box::new(right.clone()),
                    }),
                    root.to_string(),
                ))
            }
        };
        let path = PathCompiler::compile(field)?;
        let value = Node::value(value.clone());
        let operator = match op {
            BinaryOp::Eq => return Ok(Node::entry(Key::field(path), value)),
            BinaryOp::Ne => "$ne",
            BinaryOp::Lt => "$lt",
            BinaryOp::Le => "$lte",
            BinaryOp::Gt => "$gt",
            BinaryOp::Ge => "$gte",
            other => {
                return Err(CompileError::unsupported(
                    format!("'{}' operator", other.symbol()),
                    root.to_string(),
                ))
            }
        };
        Ok(Node::entry(Key::field(path), Node::unary(operator, value)))
    }

    /// `a < b` is `b > a`.
    fn flip(op: BinaryOp) -> BinaryOp {
        match op {
            BinaryOp::Lt => BinaryOp::Gt,
            BinaryOp::Le => BinaryOp::Ge,
            BinaryOp::Gt => BinaryOp::Lt,
            BinaryOp::Ge => BinaryOp::Le,
            other => other,
        }
    }

    fn negation(root: &Expr, inner: &Expr) -> Result<Node, CompileError> {
        match inner {
            Expr::Binary {
                left,
                op: BinaryOp::Eq,
                right,
            } => Self::comparison(root, left, BinaryOp::Ne, right),
            Expr::Binary {
                left,
                op: BinaryOp::Ne,
                right,
            } => Self::comparison(root, left, BinaryOp::Eq, right),
            Expr::Member { .. } | Expr::Cast { .. } => {
                let path = PathCompiler::compile(inner)?;
                Ok(Node::entry(
                    Key::field(path),
                    Node::unary("$ne", Node::value(true)),
                ))
            }
            other => Ok(Node::not(Self::node(root, other)?)),
        }
    }

    fn constant<'e>(root: &Expr, expr: &'e Expr) -> Result<&'e Native, CompileError> {
        expr.constant_value().ok_or_else(|| {
            CompileError::unsupported(format!("non-constant argument '{}'", expr), root.to_string())
        })
    }
}

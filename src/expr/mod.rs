//! Lambda expressions over a root type.
//!
//! An [`Expr`] is the body of a lambda such as `x => x.Pets[3].Type` or
//! `x => x.Age > 10 && x.Name.First == "Jack"`, with `Parameter` standing for
//! `x`. Path-shaped bodies compile to a [`FieldPath`](crate::path::FieldPath)
//! through [`PathCompiler`]; boolean bodies translate to filters through
//! [`PredicateTranslator`].

mod compiler;
mod predicate;

use std::fmt;

use crate::codec::Native;

pub use compiler::PathCompiler;
pub use predicate::PredicateTranslator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The lambda parameter.
    Parameter,
    /// Member access: `object.name`
    Member { object: Box<Expr>, name: String },
    /// Indexer: `object[index]`
    Index { object: Box<Expr>, index: Box<Expr> },
    /// Element accessor: `collection.ElementAt(index)`
    ElementAt {
        collection: Box<Expr>,
        index: Box<Expr>,
    },
    /// Type-narrowing cast: `(object as Class)`
    Cast { object: Box<Expr>, class: String },
    Constant(Native),
    /// A local variable captured by the lambda, with its current value.
    Captured { name: String, value: Native },
    /// Method call: `object.method(arguments)`
    Call {
        object: Box<Expr>,
        method: String,
        arguments: Vec<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
}

impl Expr {
    pub fn param() -> Self {
        Expr::Parameter
    }

    pub fn constant(value: impl Into<Native>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn captured(name: impl Into<String>, value: impl Into<Native>) -> Self {
        Expr::Captured {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn member(self, name: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(self),
            name: name.into(),
        }
    }

    /// Index with an integer literal. Negative means "the matched element".
    pub fn index(self, index: i64) -> Self {
        self.index_by(Expr::constant(index))
    }

    pub fn index_by(self, index: Expr) -> Self {
        Expr::Index {
            object: Box::new(self),
            index: Box::new(index),
        }
    }

    pub fn element_at(self, index: impl Into<Expr>) -> Self {
        Expr::ElementAt {
            collection: Box::new(self),
            index: Box::new(index.into()),
        }
    }

    pub fn cast(self, class: impl Into<String>) -> Self {
        Expr::Cast {
            object: Box::new(self),
            class: class.into(),
        }
    }

    pub fn call(self, method: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::Call {
            object: Box::new(self),
            method: method.into(),
            arguments,
        }
    }

    pub fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Self {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    pub fn equals(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    pub fn not_equals(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Ne, right)
    }

    pub fn less_than(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Lt, right)
    }

    pub fn less_or_equal(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Le, right)
    }

    pub fn greater_than(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    pub fn greater_or_equal(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Ge, right)
    }

    pub fn and(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::And, right)
    }

    pub fn or(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Constant integer value, for literals and captured variables.
    pub(crate) fn constant_int(&self) -> Option<i64> {
        match self {
            Expr::Constant(Native::Int(i)) => Some(*i),
            Expr::Captured {
                value: Native::Int(i),
                ..
            } => Some(*i),
            _ => None,
        }
    }

    /// The value of a constant or captured variable.
    pub(crate) fn constant_value(&self) -> Option<&Native> {
        match self {
            Expr::Constant(value) | Expr::Captured { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl From<Native> for Expr {
    fn from(value: Native) -> Self {
        Expr::Constant(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::constant(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::constant(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::constant(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::constant(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Parameter => write!(f, "x"),
            Expr::Member { object, name } => write!(f, "{}.{}", object, name),
            Expr::Index { object, index } => write!(f, "{}[{}]", object, index),
            Expr::ElementAt { collection, index } => {
                write!(f, "{}.ElementAt({})", collection, index)
            }
            Expr::Cast { object, class } => write!(f, "({} as {})", object, class),
            Expr::Constant(value) => write!(f, "{}", value.infer()),
            Expr::Captured { name, .. } => write!(f, "{}", name),
            Expr::Call {
                object,
                method,
                arguments,
            } => {
                write!(f, "{}.{}(", object, method)?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Binary { left, op, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::Not(inner) => write!(f, "!{}", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let expr = Expr::param()
            .member("Age")
            .greater_than(10)
            .and(Expr::param().member("Name").call("ToUpper", vec![]));
        assert_eq!(expr.to_string(), "((x.Age > 10) && x.Name.ToUpper())");
    }

    #[test]
    fn test_constant_int() {
        assert_eq!(Expr::captured("i", 2).constant_int(), Some(2));
        assert_eq!(Expr::constant("2").constant_int(), None);
    }
}

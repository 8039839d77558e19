//! Expression to field path compilation.

use crate::error::CompileError;
use crate::path::{FieldPath, Segment};

use super::Expr;

/// Compiles path-shaped lambda bodies into [`FieldPath`]s.
///
/// Accepted shapes: member chains, indexers and `ElementAt` with an integer
/// constant or captured integer, and casts. A negative index compiles to the
/// positional segment (`$`), so `x.Pets[-1].Type` is `pets.$.type`.
pub struct PathCompiler;

impl PathCompiler {
    pub fn compile(expr: &Expr) -> Result<FieldPath, CompileError> {
        let mut path = FieldPath::new();
        Self::walk(expr, expr, &mut path)?;
        Ok(path)
    }

    fn walk(root: &Expr, expr: &Expr, path: &mut FieldPath) -> Result<(), CompileError> {
        match expr {
            Expr::Parameter => Ok(()),
            Expr::Member { object, name } => {
                Self::walk(root, object, path)?;
                path.push(Segment::Member(name.clone()));
                Ok(())
            }
            Expr::Index { object, index } => {
                Self::walk(root, object, path)?;
                path.push(Self::index_segment(root, index)?);
                Ok(())
            }
            Expr::ElementAt { collection, index } => {
                Self::walk(root, collection, path)?;
                path.push(Self::index_segment(root, index)?);
                Ok(())
            }
            Expr::Call {
                object,
                method,
                arguments,
            } if method == "ElementAt" && arguments.len() == 1 => {
                Self::walk(root, object, path)?;
                path.push(Self::index_segment(root, &arguments[0])?);
                Ok(())
            }
            Expr::Cast { object, class } => {
                Self::walk(root, object, path)?;
                path.push(Segment::TypeAs(class.clone()));
                Ok(())
            }
            Expr::Call { method, .. } => Err(CompileError::unsupported(
                format!("method call '{}'", method),
                root.to_string(),
            )),
            Expr::Constant(_) | Expr::Captured { .. } => Err(CompileError::unsupported(
                "constant where a field was expected",
                root.to_string(),
            )),
            Expr::Binary { op, .. } => Err(CompileError::unsupported(
                format!("'{}' expression", op.symbol()),
                root.to_string(),
            )),
            Expr::Not(_) => Err(CompileError::unsupported("negation", root.to_string())),
        }
    }

    fn index_segment(root: &Expr, index: &Expr) -> Result<Segment, CompileError> {
        match index.constant_int() {
            Some(i) if i < 0 => Ok(Segment::Positional),
            Some(i) => Ok(Segment::Index(i as usize)),
            None => Err(CompileError::unsupported(
                format!("non-constant index '{}'", index),
                root.to_string(),
            )),
        }
    }
}

//! Standing expressions evaluated by the host.
//!
//! An [`Expression`] binds one or more target plugs to arithmetic over other
//! plugs. The host re-evaluates it whenever one of its inputs changes, so the
//! tool never has to invalidate anything by hand.

use std::fmt::Write as _;
use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

use crate::attr::{NodeId, Plug};
use crate::error::Result;

/// Handle to an expression installed in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExpressionId(pub u64);

/// Arithmetic over plugs and constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A literal.
    Const(f64),
    /// The current value of a plug.
    Attr(Plug),
    /// Product of two subexpressions.
    Mul(Box<Expr>, Box<Expr>),
    /// Quotient of two subexpressions.
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Reads a plug.
    pub fn attr(plug: Plug) -> Self {
        Expr::Attr(plug)
    }

    /// A literal value.
    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    /// Evaluates the expression, reading plugs through `read`.
    ///
    /// Division follows IEEE semantics; a zero denominator yields an infinity
    /// or NaN exactly as a host expression engine would.
    pub fn eval(&self, read: &mut dyn FnMut(Plug) -> Result<f64>) -> Result<f64> {
        Ok(match self {
            Expr::Const(value) => *value,
            Expr::Attr(plug) => read(*plug)?,
            Expr::Mul(lhs, rhs) => lhs.eval(read)? * rhs.eval(read)?,
            Expr::Div(lhs, rhs) => lhs.eval(read)? / rhs.eval(read)?,
        })
    }

    /// Every plug read by the expression, in first-use order, without repeats.
    pub fn inputs(&self) -> Vec<Plug> {
        let mut out = Vec::new();
        self.collect_inputs(&mut out);
        out
    }

    fn collect_inputs(&self, out: &mut Vec<Plug>) {
        match self {
            Expr::Const(_) => {}
            Expr::Attr(plug) => {
                if !out.contains(plug) {
                    out.push(*plug);
                }
            }
            Expr::Mul(lhs, rhs) | Expr::Div(lhs, rhs) => {
                lhs.collect_inputs(out);
                rhs.collect_inputs(out);
            }
        }
    }

    /// Renders the expression in host syntax, naming nodes through `name_of`.
    pub fn render(&self, name_of: &dyn Fn(NodeId) -> String) -> String {
        let mut out = String::new();
        self.render_into(&mut out, name_of, false);
        out
    }

    fn render_into(&self, out: &mut String, name_of: &dyn Fn(NodeId) -> String, nested: bool) {
        match self {
            Expr::Const(value) => {
                let _ = write!(out, "{value}");
            }
            Expr::Attr(plug) => {
                let _ = write!(out, "{}.{}", name_of(plug.node), plug.attr);
            }
            Expr::Mul(lhs, rhs) | Expr::Div(lhs, rhs) => {
                let is_mul = matches!(self, Expr::Mul(..));
                let op = if is_mul { '*' } else { '/' };
                if nested {
                    out.push('(');
                }
                // A quotient on the left of a product gets its own parentheses.
                lhs.render_into(out, name_of, is_mul && matches!(**lhs, Expr::Div(..)));
                let _ = write!(out, " {op} ");
                rhs.render_into(out, name_of, true);
                if nested {
                    out.push(')');
                }
            }
        }
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

/// One `target = expr` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// Plug written by the statement.
    pub target: Plug,
    /// Right-hand side.
    pub expr: Expr,
}

/// A named group of bindings installed as one host expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// Host node name, e.g. `camera1FocusPlane_Expr`.
    pub name: String,
    /// Statements, evaluated in order.
    pub bindings: Vec<Binding>,
}

impl Expression {
    /// Creates an empty expression.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: Vec::new(),
        }
    }

    /// Appends a `target = expr` statement.
    #[must_use]
    pub fn with_binding(mut self, target: Plug, expr: Expr) -> Self {
        self.bindings.push(Binding { target, expr });
        self
    }

    /// Plugs read by any statement.
    pub fn inputs(&self) -> Vec<Plug> {
        let mut out: Vec<Plug> = Vec::new();
        for binding in &self.bindings {
            for plug in binding.expr.inputs() {
                if !out.contains(&plug) {
                    out.push(plug);
                }
            }
        }
        out
    }

    /// Whether a change to `plug` requires re-evaluation.
    pub fn depends_on(&self, plug: Plug) -> bool {
        self.bindings
            .iter()
            .any(|b| b.expr.inputs().contains(&plug))
    }

    /// Renders the full statement list, `a.x = ...;b.y = ...;`.
    pub fn render(&self, name_of: &dyn Fn(NodeId) -> String) -> String {
        let mut out = String::new();
        for binding in &self.bindings {
            let _ = write!(
                out,
                "{}.{} = {};",
                name_of(binding.target.node),
                binding.target.attr,
                binding.expr.render(name_of)
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Attr;
    use crate::error::FocusPlaneError;

    fn plug(node: u64, attr: Attr) -> Plug {
        Plug::new(NodeId(node), attr)
    }

    fn names(id: NodeId) -> String {
        match id.0 {
            1 => "plane".to_string(),
            _ => "cam".to_string(),
        }
    }

    #[test]
    fn test_eval_reads_plugs() {
        let expr = Expr::attr(plug(2, Attr::FocusDistance)) * Expr::constant(2.0)
            / Expr::attr(plug(2, Attr::FocalLength));
        let mut read = |p: Plug| -> Result<f64> {
            Ok(match p.attr {
                Attr::FocusDistance => 10.0,
                Attr::FocalLength => 4.0,
                _ => 0.0,
            })
        };
        assert_eq!(expr.eval(&mut read).unwrap(), 5.0);
    }

    #[test]
    fn test_eval_propagates_read_errors() {
        let expr = Expr::attr(plug(9, Attr::FocusDistance));
        let mut read = |p: Plug| -> Result<f64> { Err(FocusPlaneError::NodeNotFound(p.node)) };
        assert!(matches!(
            expr.eval(&mut read),
            Err(FocusPlaneError::NodeNotFound(NodeId(9)))
        ));
    }

    #[test]
    fn test_inputs_are_unique() {
        let far = plug(2, Attr::FarClipPlane);
        let expr = Expr::attr(plug(2, Attr::FocusDistance)) / Expr::attr(far) * Expr::attr(far);
        assert_eq!(expr.inputs(), vec![plug(2, Attr::FocusDistance), far]);
    }

    #[test]
    fn test_render_host_syntax() {
        let fd = Expr::attr(plug(2, Attr::FocusDistance));
        let far = || Expr::attr(plug(2, Attr::FarClipPlane));
        let expr = Expr::attr(plug(1, Attr::ScaleZ)) * (fd / far() * far());
        assert_eq!(
            expr.render(&names),
            "plane.scaleZ * ((cam.focusDistance / cam.farClipPlane) * cam.farClipPlane)"
        );
    }

    #[test]
    fn test_expression_statements() {
        let expression = Expression::new("plane_Expr")
            .with_binding(plug(1, Attr::ScaleX), Expr::attr(plug(2, Attr::FocalLength)))
            .with_binding(plug(1, Attr::ScaleY), Expr::constant(1.5));
        assert_eq!(
            expression.render(&names),
            "plane.scaleX = cam.focalLength;plane.scaleY = 1.5;"
        );
        assert!(expression.depends_on(plug(2, Attr::FocalLength)));
        assert!(!expression.depends_on(plug(2, Attr::FocusDistance)));
        assert_eq!(expression.inputs().len(), 1);
    }
}

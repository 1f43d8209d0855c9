//! Abstract syntax tree for formulas
//!
//! The tree is created by the parser per request, walked read-only by the
//! symbol analyzer and the evaluator, and discarded when the request
//! completes. Binary operators keep one node variant per grammar level so
//! the tree mirrors the precedence table exactly.

pub mod analysis;

/// Unary operator applied by the `unary` grammar production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+x` is `x`.
    Plus,
    /// `-x` is the IEEE negation.
    Minus,
}

/// Binary operator, one variant per precedence level entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `^` (left-associative by default, documented choice)
    Pow,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%` (remainder, sign of the dividend)
    Rem,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==` (within machine epsilon)
    Eq,
    /// `!=` (negation of `==`)
    Ne,
}

impl BinaryOp {
    /// Whether this operator belongs to the comparison precedence level
    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Eq | BinaryOp::Ne
        )
    }
}

/// A trailing modifier on a variable reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Suffix {
    /// `.ident` — request the value converted to this unit alias.
    Unit(String),
    /// `[expr]` — select one element of a vector value.
    Index(Expr),
}

/// A parsed formula expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// `$name` reference with its ordered suffixes.
    Variable {
        /// Name as written (without the `$`).
        name: String,
        /// Unit tags and index expressions, in source order.
        suffixes: Vec<Suffix>,
    },
    /// `#name` reference.
    Constant {
        /// Name as written (without the `#`).
        name: String,
    },
    /// `name(args...)` call into the function registry.
    Call {
        /// Function name as written.
        name: String,
        /// Argument expressions in source order.
        args: Vec<Expr>,
    },
    /// Unary plus or minus.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// Binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Build a binary node
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Build a unary node
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Count the total number of nodes in the tree (suffix index
    /// expressions included)
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Constant { .. } => 1,
            Expr::Variable { suffixes, .. } => {
                1 + suffixes
                    .iter()
                    .map(|s| match s {
                        Suffix::Unit(_) => 0,
                        Suffix::Index(e) => e.node_count(),
                    })
                    .sum::<usize>()
            }
            Expr::Call { args, .. } => 1 + args.iter().map(Expr::node_count).sum::<usize>(),
            Expr::Unary { operand, .. } => 1 + operand.node_count(),
            Expr::Binary { lhs, rhs, .. } => 1 + lhs.node_count() + rhs.node_count(),
        }
    }

    /// The maximum nesting depth of the tree
    #[must_use]
    pub fn max_depth(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Constant { .. } => 1,
            Expr::Variable { suffixes, .. } => {
                1 + suffixes
                    .iter()
                    .map(|s| match s {
                        Suffix::Unit(_) => 0,
                        Suffix::Index(e) => e.max_depth(),
                    })
                    .max()
                    .unwrap_or(0)
            }
            Expr::Call { args, .. } => 1 + args.iter().map(Expr::max_depth).max().unwrap_or(0),
            Expr::Unary { operand, .. } => 1 + operand.max_depth(),
            Expr::Binary { lhs, rhs, .. } => 1 + lhs.max_depth().max(rhs.max_depth()),
        }
    }
}

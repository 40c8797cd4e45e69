//! AST types for coordinate expressions

/// Symbolic value substituted at evaluation time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// `center`: offset that centers the object in the extent
    Center,
    /// `c`: half the extent
    Half,
    /// `e`: the full extent
    Extent,
    /// `f`: the global skin factor
    Factor,
}

/// Postfix unit suffix that multiplies its operand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// `w`: font character width
    CharWidth,
    /// `h`: font line height
    LineHeight,
    /// `%`: hundredths of the extent
    Percent,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(Symbol),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Scaled(Box<Expr>, Unit),
}

impl Expr {
    /// Whether any node of the tree uses the given unit suffix
    pub fn uses_unit(&self, unit: Unit) -> bool {
        match self {
            Expr::Number(_) | Expr::Symbol(_) => false,
            Expr::Neg(inner) => inner.uses_unit(unit),
            Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) | Expr::Div(l, r) => {
                l.uses_unit(unit) || r.uses_unit(unit)
            }
            Expr::Scaled(inner, u) => *u == unit || inner.uses_unit(unit),
        }
    }
}

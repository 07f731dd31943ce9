use std::convert::Infallible;
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Abstract syntax tree of a regex.
///
/// Children are owned exclusively. A macro reference never survives parsing:
/// it is replaced by a clone of the macro's tree.
///
/// Trees are left-deep and as tall as the pattern is long, so cloning,
/// comparison, dropping and the analyses below run on an explicit stack
/// instead of recursing. `Display` and `Debug` still recurse.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Ast {
    Char(char),
    Union(Box<Ast>, Box<Ast>),
    Concat(Box<Ast>, Box<Ast>),
    Kleene(Box<Ast>),
    /// Sentinel left by a failed parse. Terminal: must not reach NFA construction.
    Error,
}

/// One level of an [`Ast`], with each child replaced by the value already
/// computed for it. See [`Ast::try_fold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<T> {
    Char(char),
    Union(T, T),
    Concat(T, T),
    Kleene(T),
    Error,
}

impl Ast {
    #[must_use]
    pub fn union(left: Self, right: Self) -> Self {
        Self::Union(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn concat(left: Self, right: Self) -> Self {
        Self::Concat(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn kleene(operand: Self) -> Self {
        Self::Kleene(Box::new(operand))
    }

    /// Concatenation of the characters of `text`, or `None` for empty text.
    #[must_use]
    pub fn literal(text: &str) -> Option<Self> {
        text.chars().map(Self::Char).reduce(Self::concat)
    }

    /// Nodes in post-order: left subtree, right subtree, then the node.
    #[must_use]
    pub fn post_order(&self) -> Vec<&Self> {
        let mut order = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            order.push(node);
            match node {
                Self::Union(left, right) | Self::Concat(left, right) => {
                    pending.push(left);
                    pending.push(right);
                }
                Self::Kleene(operand) => pending.push(operand),
                Self::Char(_) | Self::Error => {}
            }
        }
        // Reversed pre-order with right children visited first
        order.reverse();
        order
    }

    /// Evaluate the tree bottom-up: `combine` sees every node once, after its
    /// children, with their results in place of the subtrees. Stops at the
    /// first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `combine`.
    pub fn try_fold<T, E>(&self, mut combine: impl FnMut(Node<T>) -> Result<T, E>) -> Result<T, E> {
        let mut values: Vec<T> = Vec::new();
        for node in self.post_order() {
            let layer = match node {
                Self::Char(c) => Node::Char(*c),
                Self::Error => Node::Error,
                Self::Kleene(_) => Node::Kleene(pop_value(&mut values)),
                Self::Union(..) => {
                    let right = pop_value(&mut values);
                    Node::Union(pop_value(&mut values), right)
                }
                Self::Concat(..) => {
                    let right = pop_value(&mut values);
                    Node::Concat(pop_value(&mut values), right)
                }
            };
            values.push(combine(layer)?);
        }
        Ok(pop_value(&mut values))
    }

    /// Infallible [`Ast::try_fold`].
    pub fn fold<T>(&self, mut combine: impl FnMut(Node<T>) -> T) -> T {
        match self.try_fold(|node| Ok::<T, Infallible>(combine(node))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Whether this tree, or any subtree, is the error sentinel.
    #[must_use]
    pub fn contains_error(&self) -> bool {
        self.post_order().into_iter().any(|node| matches!(node, Self::Error))
    }

    /// Number of operators and operands, the bound used for NFA sizing.
    #[must_use]
    pub fn size(&self) -> usize {
        self.post_order().len()
    }

    /// Whether the language of this tree contains the empty string.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.fold(|node| match node {
            Node::Char(_) | Node::Error => false,
            Node::Kleene(_) => true,
            Node::Union(left, right) => left || right,
            Node::Concat(left, right) => left && right,
        })
    }

    /// Move the children out, leaving error sentinels in their place.
    fn take_children(&mut self, into: &mut Vec<Self>) {
        let mut take = |child: &mut Box<Self>| {
            if matches!(**child, Self::Union(..) | Self::Concat(..) | Self::Kleene(_)) {
                into.push(std::mem::replace(&mut **child, Self::Error));
            }
        };
        match self {
            Self::Union(left, right) | Self::Concat(left, right) => {
                take(left);
                take(right);
            }
            Self::Kleene(operand) => take(operand),
            Self::Char(_) | Self::Error => {}
        }
    }

    const fn precedence(&self) -> u8 {
        match self {
            Self::Union(..) => 0,
            Self::Concat(..) => 1,
            Self::Kleene(_) => 2,
            Self::Char(_) | Self::Error => 3,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

fn pop_value<T>(values: &mut Vec<T>) -> T {
    match values.pop() {
        Some(value) => value,
        None => unreachable!("post-order visits children before their parent"),
    }
}

impl Clone for Ast {
    fn clone(&self) -> Self {
        self.fold(|node| match node {
            Node::Char(c) => Self::Char(c),
            Node::Union(left, right) => Self::union(left, right),
            Node::Concat(left, right) => Self::concat(left, right),
            Node::Kleene(operand) => Self::kleene(operand),
            Node::Error => Self::Error,
        })
    }
}

impl PartialEq for Ast {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Self::Char(a), Self::Char(b)) if a == b => {}
                (Self::Error, Self::Error) => {}
                (Self::Kleene(a), Self::Kleene(b)) => pending.push((&**a, &**b)),
                (Self::Union(a_left, a_right), Self::Union(b_left, b_right))
                | (Self::Concat(a_left, a_right), Self::Concat(b_left, b_right)) => {
                    pending.push((&**a_left, &**b_left));
                    pending.push((&**a_right, &**b_right));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Ast {}

impl Drop for Ast {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.take_children(&mut detached);
        while let Some(mut node) = detached.pop() {
            node.take_children(&mut detached);
        }
    }
}

/// Renders the tree back into regex source that tokenizes to an equal tree.
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => match c {
                '(' | ')' | '|' | '*' | '{' | '}' | '[' | ']' | '-' | '\\' => write!(f, "\\{c}"),
                _ => write!(f, "{c}"),
            },
            Self::Union(left, right) => {
                left.fmt_operand(f, 0)?;
                f.write_str("|")?;
                right.fmt_operand(f, 1)
            }
            Self::Concat(left, right) => {
                left.fmt_operand(f, 1)?;
                right.fmt_operand(f, 2)
            }
            Self::Kleene(operand) => {
                operand.fmt_operand(f, 3)?;
                f.write_str("*")
            }
            Self::Error => f.write_str("<error>"),
        }
    }
}

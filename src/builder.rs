use std::sync::Arc;

use crate::command::{Command, Leaf, Program};
use crate::error::{Error, Result};

/// Accumulates commands into a [`Program`].
///
/// Every append mutates the builder in place and returns it, so calls
/// chain:
///
/// ```
/// use tapeseq::Builder;
///
/// let mut body = Builder::new();
/// body.dec();
///
/// let mut builder = Builder::new();
/// builder.inc().inc().append_loop(body.to_program()).print();
/// assert_eq!(builder.to_program().to_string(), "++[-].");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    commands: Vec<Command>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_leaf(&mut self, kind: Leaf) -> &mut Self {
        self.commands.push(kind.into());
        self
    }

    /// Append the leaf a call-shape front-end encodes as `arity` unit
    /// arguments. Nothing is appended on error.
    pub fn append_arity(&mut self, arity: usize) -> Result<&mut Self> {
        let kind = Leaf::from_arity(arity)?;
        Ok(self.append_leaf(kind))
    }

    pub fn append_loop(&mut self, body: Program) -> &mut Self {
        self.commands.push(Command::Loop(Arc::new(body)));
        self
    }

    /// Append a loop from a group of bodies, which must hold exactly one
    /// program. Nothing is appended on error.
    pub fn append_loop_group<I>(&mut self, bodies: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Program>,
    {
        let mut bodies = bodies.into_iter();

        match (bodies.next(), bodies.next()) {
            (Some(body), None) => Ok(self.append_loop(body)),
            (None, _) => Err(Error::InvalidLoopArgumentCount { count: 0 }),
            (Some(_), Some(_)) => Err(Error::InvalidLoopArgumentCount {
                count: 2 + bodies.count(),
            }),
        }
    }

    pub fn inc(&mut self) -> &mut Self {
        self.append_leaf(Leaf::Inc)
    }

    pub fn dec(&mut self) -> &mut Self {
        self.append_leaf(Leaf::Dec)
    }

    pub fn right(&mut self) -> &mut Self {
        self.append_leaf(Leaf::MoveRight)
    }

    pub fn left(&mut self) -> &mut Self {
        self.append_leaf(Leaf::MoveLeft)
    }

    pub fn print(&mut self) -> &mut Self {
        self.append_leaf(Leaf::Print)
    }

    pub fn read(&mut self) -> &mut Self {
        self.append_leaf(Leaf::Read)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Snapshot of the commands appended so far. Later appends to this
    /// builder are not visible through the returned program. Loop bodies
    /// are shared with the snapshot, not copied.
    pub fn to_program(&self) -> Program {
        Program::from_commands(self.commands.clone())
    }

    pub fn into_program(self) -> Program {
        Program::from_commands(self.commands)
    }
}

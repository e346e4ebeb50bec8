//! Single-byte I/O ports used by `Read` and `Print`.

use std::io::{ErrorKind, Read, Write};

use crate::error::Result;

/// A blocking source of bytes. `Ok(None)` signals exhaustion.
pub trait Input {
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// A sink of bytes.
pub trait Output {
    fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Push buffered bytes downstream. Called before blocking reads and at
    /// the end of a run.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: Input + ?Sized> Input for &mut T {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
}

impl<T: Output + ?Sized> Output for &mut T {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl Input for &[u8] {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }
}

impl Output for Vec<u8> {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.push(byte);
        Ok(())
    }
}

/// Adapts any [`std::io::Read`] into an [`Input`] port.
pub struct Reader<R> {
    inner: R,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Input for Reader<R> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Adapts any [`std::io::Write`] into an [`Output`] port.
pub struct Writer<W> {
    inner: W,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Output for Writer<W> {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.inner.write_all(&[byte])?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

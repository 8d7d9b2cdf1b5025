//! Append-only history of every number created during a run, plus the
//! current selection.

use tracing::debug;

use crate::complex::Complex;
use crate::error::SessionError;

#[derive(Debug, Clone, Default)]
pub struct Session {
    numbers: Vec<Complex<f64>>,
    current: Option<usize>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Appends `z` and makes it the current number. Returns its index.
    pub fn push(&mut self, z: Complex<f64>) -> usize {
        let index = self.numbers.len();
        self.numbers.push(z);
        self.current = Some(index);
        debug!(index, value = %z, "pushed number");
        index
    }

    /// Appends every root in order. The first one (the principal root)
    /// becomes current. Returns `None` when `roots` is empty.
    pub fn push_roots(&mut self, roots: &[Complex<f64>]) -> Option<usize> {
        let first = self.numbers.len();
        if roots.is_empty() {
            return None;
        }
        self.numbers.extend_from_slice(roots);
        self.current = Some(first);
        debug!(first, count = roots.len(), "pushed roots");
        Some(first)
    }

    pub fn select(&mut self, index: usize) -> Result<Complex<f64>, SessionError> {
        let z = self.get(index)?;
        self.current = Some(index);
        debug!(index, value = %z, "selected number");
        Ok(z)
    }

    pub fn get(&self, index: usize) -> Result<Complex<f64>, SessionError> {
        self.numbers
            .get(index)
            .copied()
            .ok_or(SessionError::IndexOutOfRange {
                index,
                len: self.numbers.len(),
            })
    }

    pub fn current(&self) -> Option<(usize, Complex<f64>)> {
        self.current.map(|index| (index, self.numbers[index]))
    }

    pub fn require_current(&self) -> Result<Complex<f64>, SessionError> {
        self.current()
            .map(|(_, z)| z)
            .ok_or(SessionError::NoSelection)
    }

    /// Fails unless the list holds at least `needed` numbers.
    pub fn require_len(&self, needed: usize) -> Result<(), SessionError> {
        if self.numbers.len() < needed {
            return Err(SessionError::NotEnoughNumbers { needed });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Complex<f64>> {
        self.numbers.iter()
    }
}

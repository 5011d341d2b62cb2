//! Bit-level word access.
//!
//! Both helpers take their offsets and masks from a [`FieldDescriptor`], so
//! reads and writes of a field always agree on where it lives.

use alloy_primitives::U256;

use crate::model::Word;
use crate::schema::FieldDescriptor;

/// Accumulates fields into a word that starts at zero.
#[derive(Debug, Clone, Default)]
pub struct WordWriter {
    word: Word,
}

impl WordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// ORs `raw` into the field's bits, dropping anything above its width.
    pub fn put(&mut self, field: &FieldDescriptor, raw: U256) {
        self.word |= (raw & field.mask()) << field.offset() as usize;
    }

    pub fn finish(self) -> Word {
        self.word
    }
}

/// Extracts fields from a packed word.
#[derive(Debug, Clone, Copy)]
pub struct WordReader {
    word: Word,
}

impl WordReader {
    pub fn new(word: Word) -> Self {
        Self { word }
    }

    /// Returns the field's bits, shifted down to bit 0.
    pub fn get(&self, field: &FieldDescriptor) -> U256 {
        (self.word >> field.offset() as usize) & field.mask()
    }

    pub fn word(&self) -> Word {
        self.word
    }
}

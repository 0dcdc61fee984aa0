//! The ordered record sequence.

use super::index::resolve;
use crate::error::{Result, StorageError};
use crate::types::{Record, Value};
use std::collections::VecDeque;

/// Ordered sequence of records addressed purely by position.
///
/// Positions are contiguous and zero-based. Every operation validates its
/// arguments before touching the sequence, so a failed call leaves it
/// unchanged. Locking and event delivery live in the store.
#[derive(Clone, Debug, Default)]
pub struct RecordList {
    records: VecDeque<Record>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve `index` and require an element at the resulting position.
    pub fn position_of(&self, index: i64) -> Result<usize> {
        let len = self.records.len();
        let position = resolve(index, len)?;
        if position >= len {
            return Err(StorageError::OutOfRange { index, len });
        }
        Ok(position)
    }

    pub fn get(&self, index: i64) -> Result<&Record> {
        let position = self.position_of(index)?;
        Ok(&self.records[position])
    }

    pub fn push_back(&mut self, record: Record) -> Result<()> {
        check_value(&record.value)?;
        self.records.push_back(record);
        Ok(())
    }

    pub fn push_front(&mut self, record: Record) -> Result<()> {
        check_value(&record.value)?;
        self.records.push_front(record);
        Ok(())
    }

    pub fn pop_back(&mut self) -> Result<Record> {
        self.records.pop_back().ok_or(StorageError::EmptyCollection)
    }

    pub fn pop_front(&mut self) -> Result<Record> {
        self.records.pop_front().ok_or(StorageError::EmptyCollection)
    }

    /// Replace the record at `index` wholesale.
    pub fn set(&mut self, index: i64, record: Record) -> Result<()> {
        check_value(&record.value)?;
        let position = self.position_of(index)?;
        self.records[position] = record;
        Ok(())
    }

    /// Insert before the element currently at `index`.
    ///
    /// The position must already hold an element; appending goes through
    /// `push_back`.
    pub fn insert(&mut self, index: i64, record: Record) -> Result<()> {
        check_value(&record.value)?;
        let position = self.position_of(index)?;
        self.records.insert(position, record);
        Ok(())
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: i64) -> Result<Record> {
        let position = self.position_of(index)?;
        self.records
            .remove(position)
            .ok_or(StorageError::OutOfRange {
                index,
                len: self.records.len(),
            })
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Iterate `(position, record)` pairs starting at `position`.
    pub fn iter_from(&self, position: usize) -> impl Iterator<Item = (usize, &Record)> {
        self.records.iter().enumerate().skip(position)
    }
}

fn check_value(value: &Value) -> Result<()> {
    if value.is_null() {
        return Err(StorageError::InvalidValue);
    }
    Ok(())
}

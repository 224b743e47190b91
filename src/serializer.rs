// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Sequential typed read/write over pre-registered fixed-capacity storage.
//!
//! A [`Serializer`] is a cursor over one or more externally owned byte
//! regions, registered up front. It never allocates and never grows a region:
//! the intended use is snapshotting live sketch state into fixed-size slots
//! owned by a host aggregation engine (e.g. per-group intermediate storage),
//! where each slot has a hard maximum width.
//!
//! A primitive never straddles a region boundary. When the current region's
//! remainder cannot hold the requested span, the cursor advances to the start
//! of the next registered region, leaving the remainder unused. The writer and
//! a later reader make identical advancement decisions, so the layout is
//! reproducible from the region lengths alone.
//!
//! Running out of regions fails the call with
//! [`ErrorKind::StorageExhausted`](crate::error::ErrorKind::StorageExhausted);
//! the error context carries the bytes consumed before the failing request,
//! the total registered capacity, and the requested span. A failed call leaves
//! the cursor and the regions untouched.

use byteorder::ByteOrder;
use byteorder::NativeEndian;

use crate::error::Error;

/// Cursor over a sequence of caller-owned fixed-capacity byte regions.
///
/// The wire format produced through the typed helpers is fixed-width and
/// host-byte-order. Partial aggregates serialized by one worker must be
/// reconstructed bit-exactly by another, so the helpers are part of the
/// sketch ABI.
///
/// # Examples
///
/// ```
/// # use cardsketch::serializer::Serializer;
/// let mut region = [0u8; 16];
/// let mut ser = Serializer::new();
/// ser.register_region(&mut region);
/// ser.write_u32(7).unwrap();
/// ser.write_u64(42).unwrap();
/// ser.reset();
/// assert_eq!(ser.read_u32().unwrap(), 7);
/// assert_eq!(ser.read_u64().unwrap(), 42);
/// ```
pub struct Serializer<'a> {
    segments: Vec<&'a mut [u8]>,
    index: usize,
    pos: usize,
}

impl<'a> Serializer<'a> {
    /// Creates a serializer with no registered regions.
    pub fn new() -> Self {
        Serializer {
            segments: vec![],
            index: 0,
            pos: 0,
        }
    }

    /// Appends a fixed region to the segment list.
    ///
    /// Regions are consumed in registration order. Must be called before any
    /// read or write.
    pub fn register_region(&mut self, region: &'a mut [u8]) {
        self.segments.push(region);
    }

    /// Cumulative bytes consumed since construction or the last [`reset`].
    ///
    /// Region remainders skipped during advancement count as consumed.
    ///
    /// [`reset`]: Self::reset
    pub fn size(&self) -> usize {
        self.segments[..self.index]
            .iter()
            .map(|s| s.len())
            .sum::<usize>()
            + self.pos
    }

    /// Cumulative bytes across all registered regions.
    pub fn capacity(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    /// Rewinds the cursor to the start of the first region.
    ///
    /// Enables writing a snapshot and reading it back through one instance.
    pub fn reset(&mut self) {
        self.index = 0;
        self.pos = 0;
    }

    /// Number of consecutive `len`-byte spans that fit between the cursor and
    /// the end of the registered regions, without moving the cursor.
    ///
    /// Follows the same advancement rule as the reads and writes, so a caller
    /// that needs n fixed-width values to land as a unit can verify
    /// `remaining_spans(width) >= n` up front instead of discovering
    /// exhaustion midway.
    pub fn remaining_spans(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let mut spans = 0;
        let mut pos = self.pos;
        for segment in &self.segments[self.index.min(self.segments.len())..] {
            spans += (segment.len() - pos) / len;
            pos = 0;
        }
        spans
    }

    /// Finds the segment and offset where a span of `len` bytes fits, without
    /// moving the cursor.
    fn locate(&self, len: usize) -> Result<(usize, usize), Error> {
        let mut index = self.index;
        let mut pos = self.pos;
        loop {
            match self.segments.get(index) {
                Some(segment) if pos + len <= segment.len() => return Ok((index, pos)),
                Some(_) if index + 1 < self.segments.len() => {
                    index += 1;
                    pos = 0;
                }
                _ => return Err(Error::storage_exhausted(self.size(), self.capacity(), len)),
            }
        }
    }

    /// Writes `data` at the cursor, advancing across regions as needed.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        let (index, pos) = self.locate(data.len())?;
        self.segments[index][pos..pos + data.len()].copy_from_slice(data);
        self.index = index;
        self.pos = pos + data.len();
        Ok(())
    }

    /// Reads `buf.len()` bytes at the cursor into `buf`, advancing across
    /// regions as needed.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let (index, pos) = self.locate(buf.len())?;
        buf.copy_from_slice(&self.segments[index][pos..pos + buf.len()]);
        self.index = index;
        self.pos = pos + buf.len();
        Ok(())
    }

    /// Writes a fixed-width 32-bit integer in host byte order.
    pub fn write_u32(&mut self, n: u32) -> Result<(), Error> {
        let mut buf = [0u8; 4];
        NativeEndian::write_u32(&mut buf, n);
        self.write_bytes(&buf)
    }

    /// Reads a fixed-width 32-bit integer in host byte order.
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf)?;
        Ok(NativeEndian::read_u32(&buf))
    }

    /// Writes a fixed-width 64-bit integer in host byte order.
    pub fn write_u64(&mut self, n: u64) -> Result<(), Error> {
        let mut buf = [0u8; 8];
        NativeEndian::write_u64(&mut buf, n);
        self.write_bytes(&buf)
    }

    /// Reads a fixed-width 64-bit integer in host byte order.
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        let mut buf = [0u8; 8];
        self.read_bytes(&mut buf)?;
        Ok(NativeEndian::read_u64(&buf))
    }
}

impl Default for Serializer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

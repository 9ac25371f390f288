use std::io::Read;

const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Incremental fill buffer over a reader.
///
/// Keeps a running count of the bytes consumed so far, which is the absolute
/// offset of the current read position in the input stream.
#[derive(Debug)]
pub(crate) struct ReadBuffer<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    len: usize,
    consumed: u64,
}

impl<R: Read> ReadBuffer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buffer: vec![0_u8; capacity.max(1)],
            pos: 0,
            len: 0,
            consumed: 0,
        }
    }

    /// Absolute offset of the current read position in the input stream.
    pub fn position(&self) -> u64 {
        self.consumed
    }

    /// Unconsumed bytes currently buffered.
    pub fn data(&self) -> &[u8] {
        &self.buffer[self.pos..self.len]
    }

    /// Tries to make at least `wanted` bytes available without consuming
    /// them. Returns the number of available bytes, which is smaller than
    /// `wanted` only if the input ended first.
    pub fn fill_at_least(&mut self, wanted: usize) -> Result<usize, std::io::Error> {
        if self.len - self.pos >= wanted {
            return Ok(self.len - self.pos);
        }

        // Move the unconsumed tail to the front to make room.
        self.buffer.copy_within(self.pos..self.len, 0);
        self.len -= self.pos;
        self.pos = 0;

        if self.buffer.len() < wanted {
            self.buffer.resize(wanted, 0);
        }

        while self.len < wanted {
            let nb_read = self.reader.read(&mut self.buffer[self.len..])?;
            if nb_read == 0 {
                break;
            }
            self.len += nb_read;
        }

        Ok(self.len)
    }

    /// Consumes `n` buffered bytes and returns them.
    ///
    /// The bytes must have been made available by a previous
    /// [`fill_at_least`](Self::fill_at_least) call.
    pub fn consume(&mut self, n: usize) -> &[u8] {
        assert!(self.pos + n <= self.len);

        let start = self.pos;
        self.pos += n;
        self.consumed += n as u64;

        &self.buffer[start..start + n]
    }

    /// Returns false once the buffer and the underlying reader are exhausted.
    pub fn has_data_left(&mut self) -> Result<bool, std::io::Error> {
        Ok(self.fill_at_least(1)? > 0)
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_and_consume_track_position() {
        let data = (0_u8..100).collect::<Vec<u8>>();
        let mut buf = ReadBuffer::with_capacity(&data[..], 16);

        assert_eq!(buf.fill_at_least(10).unwrap(), 16);
        assert_eq!(buf.consume(10), &data[..10]);
        assert_eq!(buf.position(), 10);

        // Larger than the initial capacity, forces a grow.
        assert_eq!(buf.fill_at_least(50).unwrap(), 50);
        assert_eq!(buf.consume(50), &data[10..60]);
        assert_eq!(buf.position(), 60);
    }

    #[test]
    fn short_input_reports_available_bytes() {
        let data = [1_u8, 2, 3];
        let mut buf = ReadBuffer::new(&data[..]);

        assert_eq!(buf.fill_at_least(10).unwrap(), 3);
        assert!(buf.has_data_left().unwrap());
        buf.consume(3);
        assert!(!buf.has_data_left().unwrap());
    }
}

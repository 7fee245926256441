//! Binary matrix records
//!
//! A record is `[rows: u32][cols: u32][rows * cols f64, row-major]`, all
//! little-endian. A list of matrices is the records concatenated with no
//! count prefix; readers either consume a buffer exactly or stop after a
//! known number of records.

use super::{Matrix, TensorError};

const HEADER_LEN: usize = 8;
const VALUE_LEN: usize = 8;

impl Matrix {
    /// Size of this matrix's record in bytes
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.rows() * self.cols() * VALUE_LEN
    }

    /// Append this matrix's record to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.reserve(self.encoded_len());
        out.extend_from_slice(&(self.rows() as u32).to_le_bytes());
        out.extend_from_slice(&(self.cols() as u32).to_le_bytes());
        for value in self.values() {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    /// Decode the record at the start of `bytes`.
    ///
    /// Returns the matrix and the number of bytes consumed. Fails if the
    /// declared dimensions do not fit in the buffer.
    pub fn decode(bytes: &[u8]) -> Result<(Matrix, usize), TensorError> {
        if bytes.len() < HEADER_LEN {
            return Err(TensorError::Truncated {
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        }

        let rows = read_u32(&bytes[0..4]) as usize;
        let cols = read_u32(&bytes[4..8]) as usize;
        let needed = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(VALUE_LEN))
            .and_then(|n| n.checked_add(HEADER_LEN))
            .unwrap_or(usize::MAX);

        if needed > bytes.len() {
            return Err(TensorError::Truncated {
                needed,
                available: bytes.len(),
            });
        }

        let values = bytes[HEADER_LEN..needed]
            .chunks_exact(VALUE_LEN)
            .map(|chunk| {
                let mut raw = [0u8; VALUE_LEN];
                raw.copy_from_slice(chunk);
                f64::from_le_bytes(raw)
            })
            .collect();

        Ok((Matrix::new(rows, cols, values)?, needed))
    }
}

/// Concatenate the records of every matrix
pub fn encode_list(matrices: &[Matrix]) -> Vec<u8> {
    let mut out = Vec::with_capacity(matrices.iter().map(Matrix::encoded_len).sum());
    for matrix in matrices {
        matrix.encode_into(&mut out);
    }
    out
}

/// Decode records until `bytes` is consumed exactly
pub fn decode_list(bytes: &[u8]) -> Result<Vec<Matrix>, TensorError> {
    let mut matrices = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (matrix, used) = Matrix::decode(&bytes[offset..])?;
        matrices.push(matrix);
        offset += used;
    }
    Ok(matrices)
}

/// Decode exactly `count` records from the start of `bytes`.
///
/// Returns the matrices and the number of bytes consumed.
pub fn decode_count(bytes: &[u8], count: usize) -> Result<(Vec<Matrix>, usize), TensorError> {
    let mut matrices = Vec::with_capacity(count);
    let mut offset = 0;
    for found in 0..count {
        if offset >= bytes.len() {
            return Err(TensorError::MissingRecords {
                expected: count,
                found,
            });
        }
        let (matrix, used) = Matrix::decode(&bytes[offset..])?;
        matrices.push(matrix);
        offset += used;
    }
    Ok((matrices, offset))
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(bytes);
    u32::from_le_bytes(raw)
}

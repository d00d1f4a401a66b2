//! Fourier BSDF Reader

use super::fourier_table::*;
use crate::math::*;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// The first 8 bytes of a table file are `SCATFUN` followed by version 1.
const EXPECTED_HEADER: [u8; 8] = [b'S', b'C', b'A', b'T', b'F', b'U', b'N', b'\x01'];

/// Arrays are read in chunks of this many values so storage only grows as
/// fast as the input actually supplies data.
const READ_CHUNK: usize = 1 << 16;

impl FourierTable {
    /// Loads a table from a file.
    ///
    /// * `path` - The path to the table file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FourierTableError> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read(&mut reader)
    }

    /// Decodes a little-endian table. Only uniform materials with one basis
    /// and 1 or 3 channels are supported.
    ///
    /// * `reader` - Source of the encoded table.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, FourierTableError> {
        let mut header = [0_u8; 8];
        reader.read_exact(&mut header)?;
        if header != EXPECTED_HEADER {
            return Err(FourierTableError::BadHeader(header));
        }

        let flags = reader.read_i32::<LittleEndian>()?;
        let n_mu = read_count(reader, "nMu")?;
        let n_coeffs = read_count(reader, "nCoeffs")?;
        let m_max = read_count(reader, "mMax")?;
        let channels = read_count(reader, "nChannels")?;
        let bases = read_count(reader, "nBases")?;
        read_i32_vec(reader, 3)?;
        let eta = reader.read_f32::<LittleEndian>()?;
        read_i32_vec(reader, 4)?;

        if flags != 1 || (channels != 1 && channels != 3) || bases != 1 {
            warn!(
                "Unsupported Fourier table layout: flags {}, {} channels, {} bases",
                flags, channels, bases
            );
            return Err(FourierTableError::UnsupportedLayout {
                flags,
                channels,
                bases,
            });
        }

        debug!(
            "Fourier table: {} elevations, {} coefficients, order {}, {} channels, eta {}",
            n_mu, n_coeffs, m_max, channels, eta
        );

        let cells = n_mu
            .checked_mul(n_mu)
            .filter(|cells| cells.checked_mul(2).is_some())
            .ok_or_else(|| FourierTableError::InconsistentDimensions(format!("{} elevations", n_mu)))?;
        if m_max > n_coeffs {
            return Err(FourierTableError::InconsistentDimensions(format!(
                "mMax {} exceeds {} coefficients",
                m_max, n_coeffs
            )));
        }

        let mu = read_f32_vec(reader, n_mu)?;
        let cdf = read_f32_vec(reader, cells)?;
        let offset_and_length = read_i32_vec(reader, 2 * cells)?;
        let a = read_f32_vec(reader, n_coeffs)?;

        let mut m = Vec::with_capacity(cells);
        let mut a_offset = Vec::with_capacity(cells);
        for pair in offset_and_length.chunks(2) {
            let (offset, length) = (pair[0], pair[1]);
            if offset < 0 || length < 0 {
                return Err(FourierTableError::InconsistentDimensions(format!(
                    "negative cell offset {} or length {}",
                    offset, length
                )));
            }
            a_offset.push(offset as usize);
            m.push(length as usize);
        }

        Self::from_parts(eta, channels, m_max, mu, Some(cdf), m, a_offset, a)
    }
}

/// Reads one non-negative 32-bit count.
///
/// * `reader` - The source.
/// * `name`   - Name of the field, for errors.
fn read_count<R: Read>(reader: &mut R, name: &str) -> Result<usize, FourierTableError> {
    let value = reader.read_i32::<LittleEndian>()?;
    if value < 0 {
        Err(FourierTableError::InconsistentDimensions(format!("{} is {}", name, value)))
    } else {
        Ok(value as usize)
    }
}

/// Reads `count` 32-bit integers.
fn read_i32_vec<R: Read>(reader: &mut R, count: usize) -> Result<Vec<i32>, FourierTableError> {
    let mut buffer = Vec::with_capacity(count.min(READ_CHUNK));
    while buffer.len() < count {
        let start = buffer.len();
        buffer.resize(start + (count - start).min(READ_CHUNK), 0);
        reader.read_i32_into::<LittleEndian>(&mut buffer[start..])?;
    }
    Ok(buffer)
}

/// Reads `count` 32-bit floating point values.
fn read_f32_vec<R: Read>(reader: &mut R, count: usize) -> Result<Vec<Float>, FourierTableError> {
    let mut buffer = Vec::with_capacity(count.min(READ_CHUNK));
    while buffer.len() < count {
        let start = buffer.len();
        buffer.resize(start + (count - start).min(READ_CHUNK), 0.0);
        reader.read_f32_into::<LittleEndian>(&mut buffer[start..])?;
    }
    Ok(buffer)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

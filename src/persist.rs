//! Binary and text persistence.
//!
//! The binary layout is a 24-byte header followed by the raw element buffer:
//!
//! | bytes  | content                                  |
//! |--------|------------------------------------------|
//! | 0..4   | [`DUMP_MAGIC`](crate::DUMP_MAGIC)        |
//! | 4..8   | element byte width, `u32` little-endian  |
//! | 8..16  | rows, `u64` little-endian                |
//! | 16..24 | cols, `u64` little-endian                |
//! | 24..   | `rows * cols` elements, native byte order |
//!
//! Elements are cast to bytes through their [`Persist`] representation, so
//! fixed-width kinds round-trip bit for bit on the same platform.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ndcore_traits::Persist;

use crate::array::NdArray;
use crate::shape::Shape;
use crate::{NdError, Result, DEFAULT_BINARY_EXTENSION, DEFAULT_TEXT_EXTENSION, DUMP_MAGIC};

const HEADER_LEN: usize = 24;

fn with_default_extension(path: &Path, ext: &str) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(ext)
    }
}

fn truncated(err: std::io::Error) -> NdError {
    if err.kind() == ErrorKind::UnexpectedEof {
        NdError::Format("unexpected end of data".into())
    } else {
        NdError::Io(err)
    }
}

impl<'a, T: Persist> NdArray<'a, T> {
    /// Write the header and element buffer to `w`.
    pub fn write_binary<W: Write>(&self, w: &mut W) -> Result<()> {
        let width = std::mem::size_of::<T::Pod>();
        let width = u32::try_from(width)
            .map_err(|_| NdError::Format(format!("element width {width} does not fit in u32")))?;

        let mut header = [0u8; HEADER_LEN];
        header[0..4].copy_from_slice(&DUMP_MAGIC);
        header[4..8].copy_from_slice(&width.to_le_bytes());
        header[8..16].copy_from_slice(&(self.num_rows() as u64).to_le_bytes());
        header[16..24].copy_from_slice(&(self.num_cols() as u64).to_le_bytes());
        w.write_all(&header)?;

        let pods: Vec<T::Pod> = self.iter().map(|&x| x.to_pod()).collect();
        w.write_all(bytemuck::cast_slice(pods.as_slice()))?;
        Ok(())
    }

    /// Write the array in binary form to `path`.
    ///
    /// A path without an extension gets
    /// [`DEFAULT_BINARY_EXTENSION`](crate::DEFAULT_BINARY_EXTENSION).
    /// Returns the path actually written.
    pub fn dump(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = with_default_extension(path.as_ref(), DEFAULT_BINARY_EXTENSION);
        let mut w = BufWriter::new(File::create(&path)?);
        self.write_binary(&mut w)?;
        w.flush()?;
        log::debug!(
            "dumped {} array of shape {} ({} bytes) to {}",
            T::NAME,
            self.shape(),
            HEADER_LEN + self.nbytes(),
            path.display()
        );
        Ok(path)
    }

    /// Write the array to `path`.
    ///
    /// An empty `sep` writes the binary form (see [`dump`](Self::dump));
    /// otherwise elements are written as text in row-major order, separated
    /// by `sep`, and a path without an extension gets
    /// [`DEFAULT_TEXT_EXTENSION`](crate::DEFAULT_TEXT_EXTENSION). The text
    /// form does not record the shape.
    pub fn tofile(&self, path: impl AsRef<Path>, sep: &str) -> Result<PathBuf> {
        if sep.is_empty() {
            return self.dump(path);
        }
        let path = with_default_extension(path.as_ref(), DEFAULT_TEXT_EXTENSION);
        let mut w = BufWriter::new(File::create(&path)?);
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                w.write_all(sep.as_bytes())?;
            }
            write!(w, "{value}")?;
        }
        writeln!(w)?;
        w.flush()?;
        log::debug!(
            "wrote {} {} values as text to {}",
            self.size(),
            T::NAME,
            path.display()
        );
        Ok(path)
    }
}

/// Shape and byte count announced by a binary header.
struct Header {
    shape: Shape,
    size: usize,
    width: usize,
    nbytes: usize,
}

fn read_header<T: Persist, R: Read>(r: &mut R) -> Result<Header> {
    let mut header = [0u8; HEADER_LEN];
    r.read_exact(&mut header).map_err(truncated)?;
    if header[0..4] != DUMP_MAGIC {
        return Err(NdError::Format(format!(
            "bad magic {:?}, expected {:?}",
            &header[0..4],
            DUMP_MAGIC
        )));
    }

    let le_u64 = |bytes: &[u8]| {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        u64::from_le_bytes(buf)
    };
    let mut width_bytes = [0u8; 4];
    width_bytes.copy_from_slice(&header[4..8]);
    let width = u32::from_le_bytes(width_bytes) as usize;
    let expected = std::mem::size_of::<T::Pod>();
    if width != expected {
        return Err(NdError::Format(format!(
            "stored element width is {width} bytes, {} needs {expected}",
            T::NAME
        )));
    }

    let dim = |v: u64| {
        usize::try_from(v)
            .map_err(|_| NdError::InvalidShape(format!("stored extent {v} exceeds usize")))
    };
    let shape = Shape::new(dim(le_u64(&header[8..16]))?, dim(le_u64(&header[16..24]))?);
    let size = shape.size()?;
    let nbytes = size
        .checked_mul(width)
        .ok_or_else(|| NdError::InvalidShape(format!("{shape} overflows the addressable size")))?;
    Ok(Header {
        shape,
        size,
        width,
        nbytes,
    })
}

/// Read the element buffer announced by `header`.
///
/// The buffer grows with the data actually read, so a header claiming more
/// elements than follow costs no more memory than the data present.
fn read_body<T: Persist, R: Read>(r: &mut R, header: &Header) -> Result<NdArray<'static, T>> {
    let mut bytes = Vec::new();
    r.take(header.nbytes as u64).read_to_end(&mut bytes)?;
    if bytes.len() < header.nbytes {
        return Err(NdError::Format(format!(
            "unexpected end of data: shape {} needs {} bytes, found {}",
            header.shape,
            header.nbytes,
            bytes.len()
        )));
    }

    let mut values = Vec::new();
    values
        .try_reserve_exact(header.size)
        .map_err(|_| NdError::AllocationError {
            elements: header.size,
        })?;
    values.extend(
        bytes
            .chunks_exact(header.width)
            .map(|chunk| T::from_pod(bytemuck::pod_read_unaligned(chunk))),
    );
    NdArray::from_shape_vec(header.shape, values)
}

/// Read one array in binary form from `r`.
///
/// Exactly the header and `rows * cols` elements are consumed.
///
/// # Errors
/// `Format` for a bad magic, an element width that does not match `T`, or
/// data that ends early; `InvalidShape` if the stored shape overflows.
pub fn read_binary<T: Persist, R: Read>(r: &mut R) -> Result<NdArray<'static, T>> {
    let header = read_header::<T, _>(r)?;
    read_body(r, &header)
}

/// Read an array written by [`NdArray::dump`].
///
/// The file length is checked against the header before any element data
/// is read.
///
/// # Errors
/// As [`read_binary`], plus `Format` if the file is shorter or longer than
/// the header announces.
pub fn load<T: Persist>(path: impl AsRef<Path>) -> Result<NdArray<'static, T>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut r = BufReader::new(file);
    let header = read_header::<T, _>(&mut r)?;

    let expected = (HEADER_LEN as u64).checked_add(header.nbytes as u64);
    match expected {
        Some(expected) if expected == file_len => {}
        Some(expected) if expected < file_len => {
            return Err(NdError::Format(format!(
                "{} has trailing data after the array",
                path.display()
            )));
        }
        _ => {
            return Err(NdError::Format(format!(
                "{} holds {file_len} bytes, shape {} needs {}",
                path.display(),
                header.shape,
                header.nbytes.saturating_add(HEADER_LEN)
            )));
        }
    }

    let array = read_body(&mut r, &header)?;
    log::debug!(
        "loaded {} array of shape {} from {}",
        T::NAME,
        array.shape(),
        path.display()
    );
    Ok(array)
}

/// Read an array written by [`NdArray::tofile`].
///
/// An empty `sep` reads the binary form. Otherwise the file is split on
/// `sep`, surrounding whitespace is trimmed from each token, empty tokens
/// are skipped, and the values come back as a `(1, n)` row vector.
///
/// # Errors
/// `Format` naming the first token that does not parse as `T`.
pub fn fromfile<T>(path: impl AsRef<Path>, sep: &str) -> Result<NdArray<'static, T>>
where
    T: Persist + FromStr,
{
    if sep.is_empty() {
        return load(path);
    }
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let values = text
        .split(sep)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                NdError::Format(format!("cannot parse {token:?} as {}", T::NAME))
            })
        })
        .collect::<Result<Vec<T>>>()?;
    log::debug!(
        "read {} {} values as text from {}",
        values.len(),
        T::NAME,
        path.display()
    );
    Ok(NdArray::from_vec(values))
}

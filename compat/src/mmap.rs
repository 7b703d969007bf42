//! Memory-mapped files, without memory mapping.
//!
//! There is no virtual memory to map a file into, so the whole file is read up front. Writes
//! to the returned bytes are never reflected back into the file.

use std::{io, ops::Deref};

/// The contents of a "mapped" source, together with the source itself.
#[derive(Debug)]
pub struct Mapping<R> {
    source: R,
    data: Vec<u8>,
}

impl<R> Mapping<R> {
    /// Returns the source the data was read from.
    pub fn source(&self) -> &R {
        &self.source
    }

    /// Releases the data, giving back the source.
    pub fn into_source(self) -> R {
        self.source
    }
}

impl<R> Deref for Mapping<R> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl<R> AsRef<[u8]> for Mapping<R> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Maps `source` by reading it to the end.
pub fn map<R: io::Read>(mut source: R) -> io::Result<Mapping<R>> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    Ok(Mapping { source, data })
}

/// Unmaps a mapping. Nothing to do beyond dropping it.
pub fn unmap<R>(mapping: Mapping<R>) -> io::Result<()> {
    drop(mapping);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Failing;

    impl io::Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn reads_everything() {
        let m = map(io::Cursor::new(vec![1u8, 2, 3])).unwrap();

        assert_eq!(&*m, &[1, 2, 3]);
        assert_eq!(m.source().position(), 3);
        assert!(unmap(m).is_ok());
    }

    #[test]
    fn empty_source() {
        let m = map(io::empty()).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn read_errors_propagate() {
        let err = map(Failing).unwrap_err();
        assert_eq!(err.to_string(), "device gone");
    }
}

use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind},
    path::Path,
};

use hifitime::Duration;
use log::debug;

use crate::error::Error;

/// Any position source should implement the [LineSource] trait.
/// The transport (serial, socket, file..) is irrelevant: we only need to
/// read text lines with a bounded wait.
pub trait LineSource {
    /// Reads a single line, waiting at most `timeout`.
    /// Returns Ok(None) when nothing came in: timeout or end of data.
    fn read_line(&mut self, timeout: Duration) -> std::io::Result<Option<String>>;

    /// Releases the underlying transport.
    fn close(&mut self) {}
}

/// [ReaderSource] adapts any [BufRead]er to a [LineSource].
/// The read timeout is the one configured on the transport itself
/// (for example, a serial device set up for non canonical reads):
/// timed out and interrupted reads are reported as "nothing came in".
pub struct ReaderSource<R: BufRead> {
    reader: Option<R>,
    buf: String,
}

impl ReaderSource<BufReader<File>> {
    /// Opens a file or device node as a [LineSource].
    /// This is fatal if the path cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let fd = File::open(path.as_ref()).map_err(Error::SourceUnavailable)?;
        debug!("opened position source {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(fd)))
    }
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            buf: String::with_capacity(128),
        }
    }

    /// True once [LineSource::close] has been called
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    // BufRead has no deadline: the timeout is left to the underlying reader,
    // whose timed out reads are reported as Ok(None).
    fn read_line(&mut self, _timeout: Duration) -> std::io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(ErrorKind::NotConnected.into());
        };

        self.buf.clear();

        match reader.read_line(&mut self.buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(self.buf.trim_end().to_string())),
            Err(e) => match e.kind() {
                ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted => Ok(None),
                _ => Err(e),
            },
        }
    }

    fn close(&mut self) {
        self.reader = None;
    }
}

//! Destinations for the factorization and fixture diagnostics.
//!
//! Every object that prints holds a private print target and exposes
//! it through [`ConfigurablePrintTarget`].  Output goes to stdout unless
//! redirected.

use std::fs::File;
use std::io::{sink, stdout, Error, ErrorKind, Result, Sink, Stdout, Write};

pub(crate) enum PrintTarget {
    Stdout(Stdout),
    File(File),
    Buffer(Vec<u8>),
    Stream(Box<dyn Write + Send + Sync>),
    Sink(Sink),
}

impl PrintTarget {
    fn name(&self) -> &'static str {
        match self {
            PrintTarget::Stdout(_) => "Stdout",
            PrintTarget::File(_) => "File",
            PrintTarget::Buffer(_) => "Buffer",
            PrintTarget::Stream(_) => "Stream",
            PrintTarget::Sink(_) => "Sink",
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            PrintTarget::Stdout(w) => w,
            PrintTarget::File(w) => w,
            PrintTarget::Buffer(w) => w,
            PrintTarget::Stream(w) => w,
            PrintTarget::Sink(w) => w,
        }
    }
}

impl std::fmt::Debug for PrintTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrintTarget::{}", self.name())
    }
}

impl Default for PrintTarget {
    fn default() -> Self {
        PrintTarget::Stdout(stdout())
    }
}

impl Write for PrintTarget {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer().flush()
    }
}

/// Redirection of diagnostic output.
pub trait ConfigurablePrintTarget {
    fn print_to_stdout(&mut self);
    fn print_to_file(&mut self, file: File);
    /// Any `Write` implementor, e.g. a socket or a pipe.
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>);
    /// Collect output in memory for [`get_print_buffer`](Self::get_print_buffer).
    fn print_to_buffer(&mut self);
    /// Discard output.
    fn print_to_sink(&mut self);
    /// Everything written since the last `print_to_buffer` call.  Fails
    /// when output is not being buffered.
    fn get_print_buffer(&mut self) -> Result<String>;
}

impl ConfigurablePrintTarget for PrintTarget {
    fn print_to_stdout(&mut self) {
        *self = PrintTarget::Stdout(stdout());
    }

    fn print_to_file(&mut self, file: File) {
        *self = PrintTarget::File(file);
    }

    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        *self = PrintTarget::Stream(stream);
    }

    fn print_to_buffer(&mut self) {
        *self = PrintTarget::Buffer(Vec::new());
    }

    fn print_to_sink(&mut self) {
        *self = PrintTarget::Sink(sink());
    }

    fn get_print_buffer(&mut self) -> Result<String> {
        if let PrintTarget::Buffer(buffer) = self {
            Ok(String::from_utf8_lossy(buffer).into_owned())
        } else {
            Err(Error::new(
                ErrorKind::Other,
                format!("output goes to {}, not a buffer", self.name()),
            ))
        }
    }
}

// Implements `ConfigurablePrintTarget` for a type by forwarding to
// a `PrintTarget` reached through `self.<tokens>`
macro_rules! forward_print_target {
    ($($target:tt)+) => {
        fn print_to_stdout(&mut self) {
            self.$($target)+.print_to_stdout()
        }
        fn print_to_file(&mut self, file: std::fs::File) {
            self.$($target)+.print_to_file(file)
        }
        fn print_to_stream(&mut self, stream: Box<dyn std::io::Write + Send + Sync>) {
            self.$($target)+.print_to_stream(stream)
        }
        fn print_to_buffer(&mut self) {
            self.$($target)+.print_to_buffer()
        }
        fn print_to_sink(&mut self) {
            self.$($target)+.print_to_sink()
        }
        fn get_print_buffer(&mut self) -> std::io::Result<String> {
            self.$($target)+.get_print_buffer()
        }
    };
}
pub(crate) use forward_print_target;

//! `tracing` output for the browser build.
//!
//! `tracing_subscriber`'s formatter writes each event into a fresh writer
//! from [`MakeWriter`]; [`LineWriter`] buffers that event and hands it to a
//! sink as one line when the formatter drops it. In the page the sink is
//! `console.log`.

use std::io;

use tracing_subscriber::fmt::MakeWriter;

/// Buffers one formatted event and passes it to `sink` on drop.
pub struct LineWriter<F: Fn(&str)> {
    buf: Vec<u8>,
    sink: F,
}

impl<F: Fn(&str)> io::Write for LineWriter<F> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<F: Fn(&str)> Drop for LineWriter<F> {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            (self.sink)(line);
        }
    }
}

#[derive(Clone)]
pub struct MakeLineWriter<F>(pub F);

impl<'a, F: Fn(&str) + Clone + 'a> MakeWriter<'a> for MakeLineWriter<F> {
    type Writer = LineWriter<F>;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            buf: Vec::new(),
            sink: self.0.clone(),
        }
    }
}

/// Install a global subscriber that prints `DEBUG` and above to the
/// console. A second call is a no-op.
#[cfg(target_arch = "wasm32")]
pub fn install_console_subscriber() {
    let console = MakeLineWriter(|line: &str| web_sys::console::log_1(&line.into()));
    // wasm32 has no system clock for the formatter's timestamps.
    let installed = tracing_subscriber::fmt()
        .with_writer(console)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
    if installed.is_err() {
        web_sys::console::warn_1(&"covermap: tracing subscriber already set".into());
    }
}

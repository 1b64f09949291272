use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};

/// Character I/O seen by a running program and by the debugger.
///
/// Reads block until input is available. `None` means the input is closed.
pub trait Device {
    fn write_text(&mut self, text: &str);

    fn write_char(&mut self, c: char) {
        let mut buf = [0; 4];
        self.write_text(c.encode_utf8(&mut buf));
    }

    /// Next line without its terminator. If a previous `read_char` left part
    /// of a line unread, that remainder is returned.
    fn read_line(&mut self) -> Option<String>;

    /// Next character, `'\n'` at end of each line.
    fn read_char(&mut self) -> Option<char>;
}

/// Remainder of a line partly consumed by `read_char`, newline included.
#[derive(Debug, Default)]
struct Pending(Option<String>);

impl Pending {
    fn read_line(&mut self, fetch: impl FnOnce() -> Option<String>) -> Option<String> {
        match self.0.take() {
            Some(rest) => Some(rest.trim_end_matches(['\r', '\n']).to_string()),
            None => fetch(),
        }
    }

    fn read_char(&mut self, fetch: impl FnOnce() -> Option<String>) -> Option<char> {
        let line = match self.0.take() {
            Some(rest) => rest,
            None => fetch()? + "\n",
        };
        let mut chars = line.chars();
        let c = chars.next();
        let rest = chars.as_str();
        if !rest.is_empty() {
            self.0 = Some(rest.to_string());
        }
        c
    }
}

fn strip_newline(mut line: String) -> String {
    while line.ends_with(['\r', '\n']) {
        line.pop();
    }
    line
}

/// Process stdin and stdout.
#[derive(Debug, Default)]
pub struct StdDevice {
    pending: Pending,
}

impl StdDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn fetch() -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(strip_newline(line)),
            Err(e) => {
                log::warn!("stdin: {}", e);
                None
            }
        }
    }
}

impl Device for StdDevice {
    fn write_text(&mut self, text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            log::warn!("stdout: {}", e);
        }
    }

    fn read_line(&mut self) -> Option<String> {
        self.pending.read_line(Self::fetch)
    }

    fn read_char(&mut self) -> Option<char> {
        self.pending.read_char(Self::fetch)
    }
}

/// Device backed by a pair of channels, so a machine can run on its own
/// thread while another party feeds it lines and collects its output.
#[derive(Debug)]
pub struct ChannelDevice {
    input: Receiver<String>,
    output: Sender<String>,
    pending: Pending,
}

/// The other end of a [`ChannelDevice`].
#[derive(Debug)]
pub struct Host {
    input: Sender<String>,
    output: Receiver<String>,
}

impl ChannelDevice {
    pub fn pair() -> (ChannelDevice, Host) {
        let (input_tx, input_rx) = mpsc::channel();
        let (output_tx, output_rx) = mpsc::channel();
        let device = ChannelDevice {
            input: input_rx,
            output: output_tx,
            pending: Pending::default(),
        };
        let host = Host {
            input: input_tx,
            output: output_rx,
        };
        (device, host)
    }
}

impl Device for ChannelDevice {
    fn write_text(&mut self, text: &str) {
        // Host may have gone away; output is then discarded.
        let _ = self.output.send(text.to_string());
    }

    fn read_line(&mut self) -> Option<String> {
        let input = &self.input;
        self.pending.read_line(|| input.recv().ok().map(strip_newline))
    }

    fn read_char(&mut self) -> Option<char> {
        let input = &self.input;
        self.pending.read_char(|| input.recv().ok().map(strip_newline))
    }
}

impl Host {
    /// Queue a line of input. Returns false once the device is gone.
    pub fn send_line(&self, line: impl Into<String>) -> bool {
        self.input.send(line.into()).is_ok()
    }

    /// Everything written so far, without blocking.
    pub fn drain(&self) -> String {
        self.output.try_iter().collect()
    }

    /// Block until the output contains `needle`, then return all output
    /// read so far. `None` if the device closed first.
    pub fn wait_for(&self, needle: &str) -> Option<String> {
        let mut seen = String::new();
        while !seen.contains(needle) {
            seen.push_str(&self.output.recv().ok()?);
        }
        Some(seen)
    }

    /// Stop sending input. Blocked reads on the device return `None`.
    pub fn close(self) -> Receiver<String> {
        self.output
    }
}

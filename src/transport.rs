// Boxer Box — Message Transport
//
// The controller talks to the app through `Transport`.  Inbound delivery is
// at-most-one: a `Mailbox` holds the latest message and each arrival
// overwrites the previous one.  Outbound sends are fire-and-forget and are
// dropped when no peer is connected.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::config::*;

pub trait Transport {
    /// Best-effort send.  Silently dropped without a peer.
    fn send_message(&mut self, text: &str);
    /// Latest inbound payload, if any.  Does not consume it.
    fn read_message(&mut self) -> Option<String>;
    /// Discard the pending inbound payload.
    fn clear_message(&mut self);
    /// Read and clear in one step, so nothing posted in between is lost.
    fn take_message(&mut self) -> Option<String>;
    fn is_connected(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Mailbox: single-slot inbound buffer shared with the receiving side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    slot: Arc<Mutex<Option<String>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` (trimmed), replacing anything not yet handled.
    pub fn post(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            log::debug!("Mailbox: unhandled message overwritten");
        }
        *slot = Some(text.to_owned());
    }

    pub fn peek(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// ---------------------------------------------------------------------------
// Console transport (newline-delimited messages on the serial console)
// ---------------------------------------------------------------------------
//
// Protocol lines share the console with the logger.  Every outbound message
// is either a JSON object or starts with `Punch Count:`; log lines start with
// a level letter and a timestamp, e.g. `I (1234) boxer_box::controller: ...`.

pub struct ConsoleTransport {
    mailbox: Mailbox,
    connected: Arc<AtomicBool>,
    out: Box<dyn Write + Send>,

    // Repeated-send tracking (debug aid).
    last_sent: String,
    duplicate_count: u32,
}

impl ConsoleTransport {
    /// Start the console reader thread and return the transport handle.
    pub fn spawn() -> anyhow::Result<Self> {
        let mailbox = Mailbox::new();
        let connected = Arc::new(AtomicBool::new(false));

        let rx_mailbox = mailbox.clone();
        let rx_connected = Arc::clone(&connected);
        thread::Builder::new()
            .name("console".into())
            .stack_size(STACK_CONSOLE)
            .spawn(move || console_reader(rx_mailbox, rx_connected))?;

        Ok(Self::from_parts(mailbox, connected, Box::new(io::stdout())))
    }

    fn from_parts(mailbox: Mailbox, connected: Arc<AtomicBool>, out: Box<dyn Write + Send>) -> Self {
        Self {
            mailbox,
            connected,
            out,
            last_sent: String::new(),
            duplicate_count: 0,
        }
    }
}

impl Transport for ConsoleTransport {
    fn send_message(&mut self, text: &str) {
        if !self.is_connected() {
            log::debug!("No peer, dropped: {}", text);
            return;
        }

        if text == self.last_sent {
            self.duplicate_count += 1;
            log::debug!("Repeated message x{}: {}", self.duplicate_count, text);
        } else {
            self.duplicate_count = 0;
            self.last_sent = text.to_owned();
        }

        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            log::warn!("Console write failed: {}", e);
        }
    }

    fn read_message(&mut self) -> Option<String> {
        self.mailbox.peek()
    }

    fn clear_message(&mut self) {
        self.mailbox.clear();
    }

    fn take_message(&mut self) -> Option<String> {
        self.mailbox.take()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

/// What one console read produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadStep {
    /// A complete line was consumed (posted unless blank).
    Line,
    /// Part of a line arrived; it stays buffered until the newline.
    Partial,
    /// Nothing to read right now.
    Idle,
}

/// One read from the console.  Complete, non-blank lines mark the peer as
/// connected and go to the mailbox; partial lines stay in `line`.
fn read_step<R: BufRead>(
    input: &mut R,
    line: &mut String,
    mailbox: &Mailbox,
    connected: &AtomicBool,
) -> ReadStep {
    match input.read_line(line) {
        Ok(0) => ReadStep::Idle,
        Ok(_) if line.ends_with('\n') => {
            if !line.trim().is_empty() {
                connected.store(true, Ordering::Relaxed);
                log::debug!("Received message: {}", line.trim());
                mailbox.post(line);
            }
            line.clear();
            ReadStep::Line
        }
        Ok(_) => ReadStep::Partial,
        // Bytes read before the error are kept in `line`.
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => ReadStep::Idle,
        Err(e) => {
            log::warn!("Console read error: {}", e);
            line.clear();
            ReadStep::Idle
        }
    }
}

/// Reader thread body.  The console may be non-blocking on the board, so an
/// idle read just waits and tries again.
fn console_reader(mailbox: Mailbox, connected: Arc<AtomicBool>) {
    log::info!("Console reader started");

    let idle = Duration::from_millis(10);
    let mut input = io::stdin().lock();
    let mut line = String::new();

    loop {
        if read_step(&mut input, &mut line, &mailbox, &connected) == ReadStep::Idle {
            thread::sleep(idle);
        }
    }
}


// ---------------------------------------------------------------------------
// Loopback transport (in-memory peer for tests)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    mailbox: Mailbox,
    connected: bool,
    sent: Vec<String>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self {
            mailbox: Mailbox::new(),
            connected: true,
            sent: Vec::new(),
        }
    }

    /// Simulate the app writing a message.
    pub fn deliver(&self, text: &str) {
        self.mailbox.post(text);
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Drain everything sent so far.
    pub fn take_sent(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sent)
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for LoopbackTransport {
    fn send_message(&mut self, text: &str) {
        if self.connected {
            self.sent.push(text.to_owned());
        }
    }

    fn read_message(&mut self) -> Option<String> {
        self.mailbox.peek()
    }

    fn clear_message(&mut self) {
        self.mailbox.clear();
    }

    fn take_message(&mut self) -> Option<String> {
        self.mailbox.take()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

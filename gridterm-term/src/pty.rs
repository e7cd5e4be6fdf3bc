//! PTY lifecycle: spawn, non-blocking read bridge, resize, write (§4.2).

use std::io::{Read, Write};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use crate::error::TermError;

const READ_CHUNK: usize = 8192;
const CHANNEL_CAPACITY: usize = 256;

/// Owns the PTY master, the child process handle, and the background reader
/// thread that bridges blocking reads into a bounded channel so
/// [`Pty::drain`] can stay non-blocking.
pub struct Pty {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
    rx: Receiver<Vec<u8>>,
    reader_thread: Option<std::thread::JoinHandle<()>>,
}

impl Pty {
    /// Split `shell_spec` (shell-words quoting rules, §9 Open Questions) and
    /// spawn it attached to a freshly opened pty of size `(cols, rows)`.
    pub fn start(shell_spec: &str, cols: u16, rows: u16) -> Result<Self, TermError> {
        let parts = shell_words::split(shell_spec)
            .map_err(|e| TermError::InvalidCommandLine(e.to_string()))?;
        let (program, args) = parts
            .split_first()
            .ok_or_else(|| TermError::InvalidCommandLine(shell_spec.to_string()))?;

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| TermError::PtyOpen(anyhow::anyhow!(e.to_string())))?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);
        cmd.env("TERM", "xterm-256color");
        cmd.env("COLORTERM", "truecolor");

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| TermError::SpawnShell {
                shell: shell_spec.to_string(),
                source: anyhow::anyhow!(e.to_string()),
            })?;
        drop(pair.slave);

        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| TermError::PtyOpen(anyhow::anyhow!(e.to_string())))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| TermError::PtyOpen(anyhow::anyhow!(e.to_string())))?;

        let (tx, rx): (SyncSender<Vec<u8>>, Receiver<Vec<u8>>) = sync_channel(CHANNEL_CAPACITY);
        let reader_thread = std::thread::spawn(move || {
            let mut buf = [0u8; READ_CHUNK];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if let Err(TrySendError::Disconnected(_)) = tx.try_send(buf[..n].to_vec()) {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            master: pair.master,
            writer,
            child,
            rx,
            reader_thread: Some(reader_thread),
        })
    }

    /// Non-blocking: returns everything the reader thread has buffered so far.
    pub fn drain(&self) -> Vec<u8> {
        let mut out = Vec::new();
        while let Ok(chunk) = self.rx.try_recv() {
            out.extend_from_slice(&chunk);
        }
        out
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), TermError> {
        self.writer
            .write_all(bytes)
            .map_err(|_| TermError::WriterClosed)
    }

    pub fn resize(&self, cols: u16, rows: u16) -> Result<(), TermError> {
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| TermError::Resize(anyhow::anyhow!(e.to_string())))
    }

    pub fn has_exited(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)))
    }
}

impl Drop for Pty {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(handle) = self.reader_thread.take() {
            let _ = handle.join();
        }
    }
}

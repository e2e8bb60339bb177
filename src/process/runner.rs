use std::{
    io::{self, Read},
    process::{Command, Stdio},
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use tracing::debug;

use super::{OutputSink, ProcessError, ProcessOutput, ProcessRunner};
use crate::input::history::types::SIGNALED_EXIT_CODE;

const READ_CHUNK: usize = 8 * 1024;

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Runs commands through the platform shell in the current directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        ShellRunner
    }

    fn shell_command(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

impl ProcessRunner for ShellRunner {
    fn run(&self, command: &str, sink: &mut dyn OutputSink) -> Result<ProcessOutput, ProcessError> {
        let mut child = Self::shell_command(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let lost = |source: io::Error| ProcessError::Output {
            command: command.to_string(),
            source,
        };

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(lost(io::Error::other("pipe not captured")));
        };

        let (tx, rx) = mpsc::channel();
        let readers = [
            pump(stdout, Stream::Stdout, tx.clone()),
            pump(stderr, Stream::Stderr, tx),
        ];

        let mut stdout_bytes = Vec::new();
        let mut stderr_bytes = Vec::new();

        // Ends once both reader threads have dropped their senders.
        for (stream, chunk) in rx {
            match stream {
                Stream::Stdout => {
                    sink.stdout_chunk(&chunk);
                    stdout_bytes.extend_from_slice(&chunk);
                }
                Stream::Stderr => {
                    sink.stderr_chunk(&chunk);
                    stderr_bytes.extend_from_slice(&chunk);
                }
            }
        }

        // The child is always waited on, even when a reader failed.
        let drained = join_readers(readers);
        let status = child.wait().map_err(lost)?;
        drained.map_err(lost)?;

        let exit_code = status.code().unwrap_or(SIGNALED_EXIT_CODE);
        debug!(command, exit_code, "process finished");

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
            stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
            exit_code,
        })
    }
}

/// Joins every reader and reports the first failure.
fn join_readers<I>(readers: I) -> io::Result<()>
where
    I: IntoIterator<Item = JoinHandle<io::Result<()>>>,
{
    let mut first_error = None;
    for reader in readers {
        let result = reader
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("output reader panicked")));
        if let Err(e) = result {
            debug!(error = %e, "output reader failed");
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn pump<R>(mut reader: R, stream: Stream, tx: Sender<(Stream, Vec<u8>)>) -> JoinHandle<io::Result<()>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if tx.send((stream, buf[..n].to_vec())).is_err() {
                return Ok(());
            }
        }
    })
}

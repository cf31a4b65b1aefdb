//! Dedicated session thread.
//!
//! The editor never blocks on a device directly. Each read or write is sent
//! to the worker thread over a channel and the caller waits for the reply,
//! so at most one operation is ever outstanding and the device observes
//! writes in the order they were issued.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use outbreak_core::{
    Address, BlockDevice, BlockReader, BlockValue, BlockWriter, CancellationToken,
};

use crate::error::Error;

enum Request {
    Read {
        id: u64,
        address: Address,
    },
    Write {
        id: u64,
        value: BlockValue,
        address: Address,
        cancel: CancellationToken,
        expected: BlockValue,
    },
}

enum Reply {
    Read {
        id: u64,
        result: Result<Option<BlockValue>, outbreak_core::Error>,
    },
    Write {
        id: u64,
        result: Result<bool, outbreak_core::Error>,
    },
}

impl Reply {
    fn id(&self) -> u64 {
        match self {
            Reply::Read { id, .. } | Reply::Write { id, .. } => *id,
        }
    }
}

/// Handle to a device running on its own thread.
///
/// The handle is itself a block device. When a write timeout is set and a
/// write outlives it, the handle cancels the write's token and reports
/// `Cancelled`. Dropping the handle stops the thread once its current
/// operation returns.
pub struct SessionWorker {
    requests: Sender<Request>,
    replies: Receiver<Reply>,
    next_id: u64,
    write_timeout: Option<Duration>,
}

impl SessionWorker {
    /// Move `device` onto a new thread.
    pub fn spawn(
        device: Box<dyn BlockDevice>,
        write_timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let (request_tx, request_rx) = bounded::<Request>(1);
        let (reply_tx, reply_rx) = bounded::<Reply>(1);

        thread::Builder::new()
            .name("outbreak-session".to_string())
            .spawn(move || run(device, request_rx, reply_tx))
            .map_err(outbreak_core::Error::from)?;

        Ok(Self {
            requests: request_tx,
            replies: reply_rx,
            next_id: 0,
            write_timeout,
        })
    }

    fn send(&mut self, build: impl FnOnce(u64) -> Request) -> Result<u64, Error> {
        self.next_id += 1;
        let id = self.next_id;
        self.requests
            .send(build(id))
            .map_err(|_| Error::WorkerStopped)?;
        Ok(id)
    }

    fn wait(&self, id: u64, timeout: Option<Duration>) -> Result<Option<Reply>, Error> {
        loop {
            let reply = match timeout {
                Some(timeout) => match self.replies.recv_timeout(timeout) {
                    Ok(reply) => reply,
                    Err(RecvTimeoutError::Timeout) => return Ok(None),
                    Err(RecvTimeoutError::Disconnected) => return Err(Error::WorkerStopped),
                },
                None => self.replies.recv().map_err(|_| Error::WorkerStopped)?,
            };
            // Replies to abandoned requests can still arrive late.
            if reply.id() == id {
                return Ok(Some(reply));
            }
            tracing::debug!(stale = reply.id(), "discarding stale worker reply");
        }
    }
}

fn run(mut device: Box<dyn BlockDevice>, requests: Receiver<Request>, replies: Sender<Reply>) {
    tracing::debug!("session worker started");
    for request in requests {
        let reply = match request {
            Request::Read { id, address } => Reply::Read {
                id,
                result: device.read_block(address),
            },
            Request::Write {
                id,
                value,
                address,
                cancel,
                expected,
            } => Reply::Write {
                id,
                result: device.write_block(&value, address, &cancel, &expected),
            },
        };
        if replies.send(reply).is_err() {
            break;
        }
    }
    tracing::debug!("session worker stopped");
}

impl BlockReader for SessionWorker {
    fn read_block(&mut self, address: Address) -> Result<Option<BlockValue>, outbreak_core::Error> {
        let id = self.send(|id| Request::Read { id, address })?;
        match self.wait(id, None)? {
            Some(Reply::Read { result, .. }) => result,
            _ => Err(Error::WorkerStopped.into()),
        }
    }
}

impl BlockWriter for SessionWorker {
    fn write_block(
        &mut self,
        value: &BlockValue,
        address: Address,
        cancel: &CancellationToken,
        expected: &BlockValue,
    ) -> Result<bool, outbreak_core::Error> {
        let id = self.send(|id| Request::Write {
            id,
            value: *value,
            address,
            cancel: cancel.clone(),
            expected: *expected,
        })?;

        match self.wait(id, self.write_timeout)? {
            Some(Reply::Write { result, .. }) => result,
            Some(Reply::Read { .. }) => Err(Error::WorkerStopped.into()),
            None => {
                tracing::warn!(%address, "write timed out, cancelling");
                cancel.cancel();
                Err(outbreak_core::Error::Cancelled { address })
            }
        }
    }
}

//! A hand-written [`MpcSigner`] test double.

use std::sync::Mutex;

use async_trait::async_trait;
use router_types::{MpcError, SignedTx};

enum Outcome {
    Ok(SignedTx),
    Err(String),
}

/// Signs by returning a caller-queued, pre-baked [`SignedTx`]/[`MpcError`] rather than doing any
/// real cryptography. Responses are consumed in FIFO order; the last-queued response repeats once
/// the queue is drained, so a test that queues one response can call `sign` any number of times.
pub struct MockMpcSigner {
    queue: Mutex<Vec<Outcome>>,
}

impl MockMpcSigner {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
        }
    }

    pub fn push_ok(&self, tx_hash: impl Into<String>, signed: impl Into<Vec<u8>>) {
        self.queue.lock().unwrap().push(Outcome::Ok(SignedTx {
            signed: signed.into(),
            tx_hash: tx_hash.into(),
        }));
    }

    pub fn push_err(&self, message: impl Into<String>) {
        self.queue.lock().unwrap().push(Outcome::Err(message.into()));
    }
}

impl Default for MockMpcSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl router_types::MpcSigner for MockMpcSigner {
    async fn sign(&self, _raw_tx: &[u8]) -> Result<SignedTx, MpcError> {
        let mut queue = self.queue.lock().unwrap();
        let outcome = if queue.len() > 1 {
            queue.remove(0)
        } else {
            match queue.first() {
                Some(Outcome::Ok(tx)) => Outcome::Ok(tx.clone()),
                Some(Outcome::Err(msg)) => Outcome::Err(msg.clone()),
                None => Outcome::Err("no signed response configured".into()),
            }
        };
        match outcome {
            Outcome::Ok(tx) => Ok(tx),
            Outcome::Err(msg) => Err(MpcError(msg)),
        }
    }
}

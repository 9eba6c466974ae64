//! Bounded-time prediction
//!
//! One long-lived worker thread owns the inner predictor. Each call sends a
//! request and waits at most `timeout` for the reply. While a late request is
//! still running, further calls fail fast instead of queueing behind it, so a
//! hung model costs one thread for the lifetime of the predictor.

use std::sync::{Mutex, mpsc};
use std::thread;
use std::time::Duration;

use super::{Label, PredictError, Predictor};
use crate::features::FeatureVector;

type Reply = Result<Label, PredictError>;

struct Request {
    model_id: String,
    features: FeatureVector,
    reply: mpsc::Sender<Reply>,
}

pub struct DeadlinePredictor {
    requests: mpsc::Sender<Request>,
    /// Reply channel of a request that missed its deadline
    late: Mutex<Option<mpsc::Receiver<Reply>>>,
    timeout: Duration,
}

impl DeadlinePredictor {
    /// Start the worker thread that serves `inner`.
    pub fn new<P>(inner: P, timeout: Duration) -> std::io::Result<Self>
    where
        P: Predictor + Send + 'static,
    {
        let (requests, incoming) = mpsc::channel::<Request>();
        thread::Builder::new()
            .name("snake-predict".to_string())
            .spawn(move || {
                // Ends once the predictor is dropped.
                for request in incoming {
                    let result = inner.predict(&request.model_id, &request.features);
                    // The caller may have given up on this reply.
                    let _ = request.reply.send(result);
                }
            })?;

        Ok(Self {
            requests,
            late: Mutex::new(None),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Predictor for DeadlinePredictor {
    fn predict(&self, model_id: &str, features: &FeatureVector) -> Result<Label, PredictError> {
        let mut late = self.late.lock().map_err(|_| PredictError::Disconnected)?;

        if let Some(rx) = late.as_ref() {
            match rx.try_recv() {
                Err(mpsc::TryRecvError::Empty) => return Err(PredictError::Timeout(self.timeout)),
                // A late answer belongs to an old tick and is dropped.
                Ok(_) | Err(mpsc::TryRecvError::Disconnected) => *late = None,
            }
        }

        let (reply, rx) = mpsc::channel();
        self.requests
            .send(Request {
                model_id: model_id.to_string(),
                features: features.clone(),
                reply,
            })
            .map_err(|_| PredictError::Disconnected)?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                *late = Some(rx);
                Err(PredictError::Timeout(self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(PredictError::Disconnected),
        }
    }
}

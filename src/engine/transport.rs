//! Background transporter: periodically folds the buffer into the segment
//! stores so the buffer does not grow without bound between explicit
//! `Engine::flush` calls.

use std::{
    sync::{mpsc::RecvTimeoutError, Arc},
    time::Duration,
};

use crate::util;

use super::Engine;

pub fn spawn(engine: Arc<Engine>, interval: Duration) -> util::Thread<(), (), ()> {
    util::Thread::new("transporter", move |rx| {
        move || loop {
            match rx.recv_timeout(interval) {
                Ok(_) => break,                       // shutdown requested.
                Err(RecvTimeoutError::Timeout) => {
                    engine.flush().ok();
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{error::ProtocolError, Error as WsError, Message},
};
use tracing::{debug, info, trace, warn};

use super::protocol::{Frame, EVENT_CLOSE, EVENT_ERROR};
use super::{PushReply, RealtimeError};

/// The single WebSocket a session talks over. Cheap to clone; the background
/// tasks stop when the last clone is dropped or [`RealtimeSocket::close`] runs.
#[derive(Clone)]
pub struct RealtimeSocket {
    shared: Arc<Shared>,
    tasks: Arc<TaskSet>,
}

struct Shared {
    url: String,
    send_tx: mpsc::UnboundedSender<Frame>,
    next_ref: AtomicU64,
    pending: Mutex<HashMap<String, Pending>>,
    errored_topics: Mutex<HashSet<String>>,
    open: watch::Sender<bool>,
}

struct Pending {
    topic: String,
    reply: oneshot::Sender<PushReply>,
}

#[derive(Default)]
struct TaskSet(Mutex<Vec<JoinHandle<()>>>);

impl TaskSet {
    fn abort_all(&self) {
        for handle in self.0.lock().drain(..) {
            handle.abort();
        }
    }
}

impl Drop for TaskSet {
    fn drop(&mut self) {
        self.abort_all();
    }
}

impl RealtimeSocket {
    pub async fn connect(url: &str, heartbeat_interval: Duration) -> Result<Self, RealtimeError> {
        let (ws_stream, _) =
            connect_async(url)
                .await
                .map_err(|err| RealtimeError::Connect {
                    url: url.to_string(),
                    reason: err.to_string(),
                })?;
        info!(target: "votepaxos::realtime", %url, "realtime connected");
        let (mut ws_write, mut ws_read) = ws_stream.split();

        let (send_tx, mut send_rx) = mpsc::unbounded_channel::<Frame>();
        let (open, _) = watch::channel(true);
        let shared = Arc::new(Shared {
            url: url.to_string(),
            send_tx,
            next_ref: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
            errored_topics: Mutex::new(HashSet::new()),
            open,
        });

        let writer = tokio::spawn(async move {
            while let Some(frame) = send_rx.recv().await {
                trace!(target: "votepaxos::realtime", topic = %frame.topic, event = %frame.event, "ws_out");
                if ws_write.send(Message::Text(frame.encode())).await.is_err() {
                    break;
                }
            }
            let _ = ws_write.close().await;
        });

        let reader_shared = Arc::clone(&shared);
        let reader = tokio::spawn(async move {
            while let Some(msg) = ws_read.next().await {
                match msg {
                    Ok(Message::Text(text)) => reader_shared.dispatch(&text),
                    Ok(Message::Binary(data)) => match String::from_utf8(data) {
                        Ok(text) => reader_shared.dispatch(&text),
                        Err(_) => debug!(target: "votepaxos::realtime", "dropping non-utf8 binary frame"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        match &err {
                            WsError::ConnectionClosed
                            | WsError::AlreadyClosed
                            | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
                                debug!(target: "votepaxos::realtime", "realtime websocket closed: {err}");
                            }
                            _ => {
                                warn!(target: "votepaxos::realtime", "realtime websocket error: {err}");
                            }
                        }
                        break;
                    }
                }
            }
            reader_shared.mark_closed();
        });

        let heartbeat_shared = Arc::clone(&shared);
        let heartbeat = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + heartbeat_interval, heartbeat_interval);
            loop {
                ticker.tick().await;
                let reference = heartbeat_shared.make_ref();
                if heartbeat_shared.send_tx.send(Frame::heartbeat(reference)).is_err() {
                    break;
                }
            }
        });

        let tasks = Arc::new(TaskSet::default());
        tasks.0.lock().extend([writer, reader, heartbeat]);

        Ok(Self { shared, tasks })
    }

    pub fn url(&self) -> &str {
        &self.shared.url
    }

    pub fn is_open(&self) -> bool {
        *self.shared.open.borrow()
    }

    /// Resolves once the connection has dropped.
    pub async fn closed(&self) {
        let mut open = self.shared.open.subscribe();
        let _ = open.wait_for(|open| !*open).await;
    }

    pub(crate) fn make_ref(&self) -> String {
        self.shared.make_ref()
    }

    pub(crate) fn topic_errored(&self, topic: &str) -> bool {
        self.shared.errored_topics.lock().contains(topic)
    }

    pub(crate) fn clear_topic_error(&self, topic: &str) {
        self.shared.errored_topics.lock().remove(topic);
    }

    /// Sends a frame without waiting for any reply.
    pub fn send(&self, frame: Frame) -> Result<(), RealtimeError> {
        if !self.is_open() {
            return Err(RealtimeError::Closed);
        }
        self.shared
            .send_tx
            .send(frame)
            .map_err(|_| RealtimeError::Closed)
    }

    /// Sends a frame and waits for the `phx_reply` carrying the same ref.
    /// A frame without a ref is given a fresh one.
    pub async fn push(&self, mut frame: Frame, timeout: Duration) -> PushReply {
        let reference = match &frame.reference {
            Some(reference) => reference.clone(),
            None => {
                let reference = self.make_ref();
                frame.reference = Some(reference.clone());
                reference
            }
        };
        if !self.is_open() {
            return PushReply::Timeout;
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        self.shared.pending.lock().insert(
            reference.clone(),
            Pending {
                topic: frame.topic.clone(),
                reply: reply_tx,
            },
        );
        if self.shared.send_tx.send(frame).is_err() {
            self.shared.pending.lock().remove(&reference);
            return PushReply::Timeout;
        }

        match tokio::time::timeout(timeout, reply_rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => PushReply::Timeout,
            Err(_) => {
                self.shared.pending.lock().remove(&reference);
                debug!(target: "votepaxos::realtime", %reference, "push timed out");
                PushReply::Timeout
            }
        }
    }

    /// Stops the background tasks and fails anything still waiting.
    pub fn close(&self) {
        self.tasks.abort_all();
        self.shared.mark_closed();
    }
}

impl Shared {
    fn make_ref(&self) -> String {
        (self.next_ref.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }

    fn dispatch(&self, text: &str) {
        let frame = match Frame::decode(text) {
            Ok(frame) => frame,
            Err(err) => {
                debug!(target: "votepaxos::realtime", error = %err, "ignoring undecodable frame");
                return;
            }
        };

        if let (Some((status, response)), Some(reference)) = (frame.reply_parts(), &frame.reference) {
            let pending = self.pending.lock().remove(reference);
            match pending {
                Some(pending) => {
                    let reply = if status == "ok" {
                        PushReply::Ok(response.clone())
                    } else {
                        PushReply::Error(response.clone())
                    };
                    let _ = pending.reply.send(reply);
                }
                None => trace!(target: "votepaxos::realtime", %reference, "reply without pending push"),
            }
            return;
        }

        if frame.event == EVENT_ERROR || frame.event == EVENT_CLOSE {
            warn!(
                target: "votepaxos::realtime",
                topic = %frame.topic,
                event = %frame.event,
                "channel closed by server"
            );
            self.errored_topics.lock().insert(frame.topic.clone());
            self.fail_pending(|pending| pending.topic == frame.topic);
            return;
        }

        trace!(target: "votepaxos::realtime", topic = %frame.topic, event = %frame.event, "unhandled broadcast");
    }

    fn fail_pending(&self, matches: impl Fn(&Pending) -> bool) {
        let failed: Vec<Pending> = {
            let mut pending = self.pending.lock();
            let keys: Vec<String> = pending
                .iter()
                .filter(|(_, p)| matches(p))
                .map(|(key, _)| key.clone())
                .collect();
            keys.iter().filter_map(|key| pending.remove(key)).collect()
        };
        for pending in failed {
            let _ = pending.reply.send(PushReply::Timeout);
        }
    }

    fn mark_closed(&self) {
        let was_open = self.open.send_replace(false);
        if was_open {
            info!(target: "votepaxos::realtime", url = %self.url, "realtime disconnected");
        }
        self.fail_pending(|_| true);
    }
}

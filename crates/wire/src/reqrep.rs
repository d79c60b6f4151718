//! One-shot request/acknowledge over ZeroMQ REQ/REP sockets.
//!
//! The split worker is a one-shot process: it produces a single result
//! payload and exits once the caller acknowledges receipt. REQ/REP's
//! strict send/recv alternation matches that lifecycle exactly, so no
//! correlation-id bookkeeping beyond the envelope field is needed.
//!
//! Framing: one frame per message, containing the JSON [`Message`]
//! envelope.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use zeromq::prelude::*;
use zeromq::{RepSocket, ReqSocket, ZmqMessage};

use crate::error::WireError;
use crate::message::Message;
use crate::transport::Transport;

fn envelope_from(zmq_msg: &ZmqMessage) -> Result<Message, WireError> {
    let frame = zmq_msg
        .iter()
        .find(|f| !f.as_ref().is_empty())
        .ok_or_else(|| WireError::Transport("empty message on recv".into()))?;
    Ok(Message::from_bytes(frame.as_ref())?)
}

/// REQ-socket client that delivers one result and waits for the ack.
pub struct ResultClient {
    socket: Mutex<ReqSocket>,
}

impl ResultClient {
    /// Connect a REQ socket to a REP endpoint.
    #[instrument(skip_all, fields(endpoint = %transport))]
    pub async fn connect(transport: &Transport) -> Result<Self, WireError> {
        let mut socket = ReqSocket::new();
        let endpoint = transport.endpoint();
        info!(endpoint = %endpoint, "connecting REQ socket");
        socket.connect(&endpoint).await?;
        Ok(Self {
            socket: Mutex::new(socket),
        })
    }

    /// Send one message and wait for the acknowledge reply.
    ///
    /// Returns [`WireError::AckTimeout`] if no ack arrives within `timeout`.
    pub async fn deliver(&self, msg: Message, timeout: Duration) -> Result<Message, WireError> {
        let bytes = msg.to_bytes()?;
        let mut socket = self.socket.lock().await;
        socket.send(ZmqMessage::from(bytes)).await?;
        debug!(correlation_id = %msg.correlation_id, topic = %msg.topic, "result sent, awaiting ack");

        let reply = tokio::time::timeout(timeout, socket.recv())
            .await
            .map_err(|_| WireError::AckTimeout(timeout))??;
        let ack = envelope_from(&reply)?;
        debug!(correlation_id = %ack.correlation_id, topic = %ack.topic, "ack received");
        Ok(ack)
    }
}

/// REP-socket server that receives one result and acknowledges it.
pub struct ResultServer {
    socket: Mutex<RepSocket>,
}

impl ResultServer {
    /// Bind a REP socket on the given transport endpoint.
    #[instrument(skip_all, fields(endpoint = %transport))]
    pub async fn bind(transport: &Transport) -> Result<Self, WireError> {
        transport
            .ensure_ipc_dir()
            .map_err(|e| WireError::Transport(e.to_string()))?;
        transport
            .remove_stale_socket()
            .map_err(|e| WireError::Transport(e.to_string()))?;
        let mut socket = RepSocket::new();
        let endpoint = transport.endpoint();
        info!(endpoint = %endpoint, "binding REP socket");
        socket.bind(&endpoint).await?;
        Ok(Self {
            socket: Mutex::new(socket),
        })
    }

    /// Receive the next result message and ack it in one step.
    ///
    /// The ack echoes the result's correlation id so the worker can
    /// verify which delivery was confirmed before terminating.
    pub async fn recv_and_ack(&self) -> Result<Message, WireError> {
        let mut socket = self.socket.lock().await;
        let zmq_msg = socket.recv().await?;
        let message = envelope_from(&zmq_msg)?;
        debug!(
            correlation_id = %message.correlation_id,
            topic = %message.topic,
            "received result"
        );

        let ack = Message::with_correlation(crate::SPLIT_ACK, &"ok", message.correlation_id)?;
        socket.send(ZmqMessage::from(ack.to_bytes()?)).await?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deliver_and_ack_roundtrip() {
        let transport = Transport::tcp("127.0.0.1", 17765);
        let server = ResultServer::bind(&transport).await.unwrap();

        let server_task = tokio::spawn(async move { server.recv_and_ack().await.unwrap() });

        let client = ResultClient::connect(&transport).await.unwrap();
        let msg = Message::new(crate::SPLIT_RESULT, &vec!["chunk one", "chunk two"]).unwrap();
        let sent_cid = msg.correlation_id;

        let ack = client
            .deliver(msg, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(ack.topic, crate::SPLIT_ACK);
        assert_eq!(ack.correlation_id, sent_cid);

        let received = server_task.await.unwrap();
        assert_eq!(received.topic, crate::SPLIT_RESULT);
        assert_eq!(
            received.decode::<Vec<String>>().unwrap(),
            vec!["chunk one", "chunk two"]
        );
    }
}

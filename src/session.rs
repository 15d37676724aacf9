//! The session engine: CONNECT handshaking, QoS-1/QoS-2 acknowledgement exchanges,
//! retransmission on timeout, keep-alive pings, duplicate-delivery suppression, and failure
//! propagation.
//!
//! Grounded on the dispatch shape of the teacher's `client::client::MqttClient` and
//! `client::raw_client::RawMqttClient` (its `Event`-driven `poll()`), converted from async to a
//! single bounded, non-blocking `sync` pass per call, with the state-transition tables this
//! crate's specification mandates rather than the teacher's MQTT5 property handling.

use crate::config::ConnectConfig;
use crate::error::MqttError;
use crate::fmt::{debug, error, trace, warn_log};
use crate::header::ControlType;
use crate::lock::{NoopLock, SessionLock};
use crate::packet::{self, publish::PublishRequest, suback, Response};
use crate::pid::PacketIdGenerator;
use crate::qos::QoS;
use crate::queue::{RecordState, SendQueue};
use crate::transport::Transport;

/// Everything the engine needs that is not the receive buffer, split out so that parsing a
/// response (which borrows the receive buffer) and applying it (which mutates this state) are
/// disjoint borrows of `Session`, not one overlapping borrow of `&mut self`.
struct Core<'a, T: Transport> {
    transport: T,
    queue: SendQueue<'a>,
    pid_gen: PacketIdGenerator,
    keep_alive: u16,
    last_send: u32,
    response_timeout_secs: u16,
    error: Option<MqttError>,
    typical_response_time: f32,
    number_of_timeouts: u32,
}

impl<'a, T: Transport> Core<'a, T> {
    fn guard(&self) -> Result<(), MqttError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn sticky(&mut self, e: MqttError) -> MqttError {
        if self.error.is_none() {
            error!("session entering sticky error state: {:?}", e);
            self.error = Some(e);
        }
        e
    }

    fn next_packet_id(&mut self) -> u16 {
        self.pid_gen.next()
    }

    fn enqueue<F>(&mut self, control_type: ControlType, packet_id: u16, packer: F) -> Result<(), MqttError>
    where
        F: FnMut(&mut [u8]) -> Result<usize, MqttError>,
    {
        match self.queue.try_pack(control_type, packet_id, packer) {
            Ok(()) => {
                trace!("enqueued {:?} id={}", control_type, packet_id);
                Ok(())
            }
            Err(e) => Err(self.sticky(e)),
        }
    }

    fn connect(&mut self, cfg: &ConnectConfig) -> Result<(), MqttError> {
        // Every other operation's `guard()` rejects any sticky error outright; `connect()` is
        // the one operation allowed to run while `ClientNotConnected` is set, since it's the
        // only thing that clears it.
        match self.error {
            Some(e) if e != MqttError::ClientNotConnected => return Err(e),
            _ => {}
        }
        self.keep_alive = cfg.keep_alive;
        self.enqueue(ControlType::Connect, 0, |buf| crate::packet::connect::pack(buf, cfg))?;
        self.error = None;
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool) -> Result<u16, MqttError> {
        self.guard()?;
        let packet_id = if qos == QoS::AtMostOnce { 0 } else { self.next_packet_id() };
        let req = PublishRequest {
            topic,
            packet_id,
            payload,
            qos,
            retain,
            dup: false,
        };
        self.enqueue(ControlType::Publish, packet_id, |buf| crate::packet::publish::pack(buf, &req))?;
        Ok(packet_id)
    }

    fn subscribe(&mut self, topics: &[(&str, QoS)]) -> Result<u16, MqttError> {
        self.guard()?;
        let packet_id = self.next_packet_id();
        self.enqueue(ControlType::Subscribe, packet_id, |buf| {
            crate::packet::subscribe::pack(buf, packet_id, topics)
        })?;
        Ok(packet_id)
    }

    fn unsubscribe(&mut self, topics: &[&str]) -> Result<u16, MqttError> {
        self.guard()?;
        let packet_id = self.next_packet_id();
        self.enqueue(ControlType::Unsubscribe, packet_id, |buf| {
            crate::packet::unsubscribe::pack(buf, packet_id, topics)
        })?;
        Ok(packet_id)
    }

    fn ping(&mut self) -> Result<(), MqttError> {
        self.guard()?;
        self.enqueue(ControlType::Pingreq, 0, |buf| {
            crate::packet::simple::pack(buf, ControlType::Pingreq)
        })
    }

    fn disconnect(&mut self) -> Result<(), MqttError> {
        self.guard()?;
        self.enqueue(ControlType::Disconnect, 0, |buf| {
            crate::packet::simple::pack(buf, ControlType::Disconnect)
        })
    }

    fn observe_latency(&mut self, sent_at: u32, now: u32) {
        let latency = now.saturating_sub(sent_at) as f32;
        self.typical_response_time = if self.typical_response_time < 0.0 {
            latency
        } else {
            0.875 * self.typical_response_time + 0.125 * latency
        };
    }

    fn send_half(&mut self, now: u32) -> Result<(), MqttError> {
        let timeout = self.response_timeout_secs as u32;
        for index in 0..self.queue.len() {
            let record = self.queue.record(index).unwrap();
            let retransmit = match record.state {
                RecordState::Unsent => true,
                RecordState::AwaitingAck => now.saturating_sub(record.time_sent) > timeout,
                RecordState::Complete => false,
            };
            if !retransmit {
                continue;
            }
            if record.state == RecordState::AwaitingAck {
                self.number_of_timeouts += 1;
                warn_log!("retransmitting {:?} id={}", record.control_type, record.packet_id);
            }

            let qos = if record.control_type == ControlType::Publish {
                let payload = self.queue.payload_mut(index).unwrap();
                let flags = payload[0] & 0x0F;
                let qos = QoS::from_bits((flags >> 1) & 0x03).unwrap_or(QoS::AtMostOnce);
                if qos == QoS::AtLeastOnce && record.state == RecordState::AwaitingAck {
                    payload[0] |= 0b1000;
                }
                Some(qos)
            } else {
                None
            };

            let payload_len = self.queue.payload(index).unwrap().len();
            let send_result = {
                let payload = self.queue.payload(index).unwrap();
                self.transport.send(payload)
            };
            match send_result {
                Ok(sent) if sent == payload_len => {}
                _ => return Err(self.sticky(MqttError::SocketError)),
            }
            self.last_send = now;
            self.queue.set_time_sent(index, now);

            let new_state = match record.control_type {
                ControlType::Puback | ControlType::Pubcomp | ControlType::Disconnect => {
                    RecordState::Complete
                }
                ControlType::Publish => match qos.unwrap() {
                    QoS::AtMostOnce => RecordState::Complete,
                    QoS::AtLeastOnce | QoS::ExactlyOnce => RecordState::AwaitingAck,
                },
                ControlType::Connect
                | ControlType::Pubrec
                | ControlType::Pubrel
                | ControlType::Subscribe
                | ControlType::Unsubscribe
                | ControlType::Pingreq => RecordState::AwaitingAck,
                _ => return Err(self.sticky(MqttError::MalformedRequest)),
            };
            self.queue.set_state(index, new_state);
            debug!("sent {:?} id={} -> {:?}", record.control_type, record.packet_id, new_state);
        }
        Ok(())
    }

    fn recv_into(&mut self, buf: &mut [u8]) -> Result<usize, MqttError> {
        self.transport.recv(buf).map_err(|_| self.sticky(MqttError::SocketError))
    }

    fn apply_response(
        &mut self,
        response: Response,
        now: u32,
        on_publish: &mut impl FnMut(&str, &[u8]),
    ) -> Result<(), MqttError> {
        match response {
            Response::Connack(connack) => {
                let idx = self.require(ControlType::Connect, None)?;
                let sent_at = self.queue.record(idx).unwrap().time_sent;
                self.queue.set_state(idx, RecordState::Complete);
                self.observe_latency(sent_at, now);
                if connack.return_code != 0 {
                    return Err(self.sticky(MqttError::ConnectionRefused));
                }
            }
            Response::Publish(publish) => {
                self.apply_publish(publish, on_publish)?;
            }
            Response::Puback { packet_id } => {
                self.complete_and_observe(ControlType::Publish, packet_id, now)?;
            }
            Response::Pubrec { packet_id } => {
                if self.queue.find(ControlType::Pubrel, Some(packet_id)).is_some() {
                    debug!("dropping duplicate PUBREC id={}", packet_id);
                } else {
                    let idx = self.require(ControlType::Publish, Some(packet_id))?;
                    let sent_at = self.queue.record(idx).unwrap().time_sent;
                    self.queue.set_state(idx, RecordState::Complete);
                    self.observe_latency(sent_at, now);
                    self.enqueue(ControlType::Pubrel, packet_id, |buf| {
                        crate::packet::pubxxx::pack(buf, ControlType::Pubrel, packet_id)
                    })?;
                }
            }
            Response::Pubrel { packet_id } => {
                self.complete_and_observe(ControlType::Pubrec, packet_id, now)?;
                self.enqueue(ControlType::Pubcomp, packet_id, |buf| {
                    crate::packet::pubxxx::pack(buf, ControlType::Pubcomp, packet_id)
                })?;
            }
            Response::Pubcomp { packet_id } => {
                self.complete_and_observe(ControlType::Pubrel, packet_id, now)?;
            }
            Response::Suback(suback::Suback { packet_id, return_codes }) => {
                self.complete_and_observe(ControlType::Subscribe, packet_id, now)?;
                if return_codes.contains(&suback::FAILURE) {
                    return Err(self.sticky(MqttError::SubscribeFailed));
                }
            }
            Response::Unsuback { packet_id } => {
                self.complete_and_observe(ControlType::Unsubscribe, packet_id, now)?;
            }
            Response::Pingresp => {
                self.complete_and_observe(ControlType::Pingreq, 0, now)?;
            }
        }
        Ok(())
    }

    fn apply_publish(
        &mut self,
        publish: packet::publish::Publish,
        on_publish: &mut impl FnMut(&str, &[u8]),
    ) -> Result<(), MqttError> {
        match publish.qos {
            QoS::AtMostOnce => on_publish(publish.topic, publish.payload),
            QoS::AtLeastOnce => {
                let packet_id = publish.packet_id;
                on_publish(publish.topic, publish.payload);
                self.enqueue(ControlType::Puback, packet_id, |buf| {
                    crate::packet::pubxxx::pack(buf, ControlType::Puback, packet_id)
                })?;
            }
            QoS::ExactlyOnce => {
                let packet_id = publish.packet_id;
                if self.queue.find(ControlType::Pubrec, Some(packet_id)).is_some() {
                    debug!("dropping duplicate QoS2 PUBLISH id={}", packet_id);
                } else {
                    on_publish(publish.topic, publish.payload);
                    self.enqueue(ControlType::Pubrec, packet_id, |buf| {
                        crate::packet::pubxxx::pack(buf, ControlType::Pubrec, packet_id)
                    })?;
                }
            }
        }
        Ok(())
    }

    fn require(&mut self, control_type: ControlType, packet_id: Option<u16>) -> Result<usize, MqttError> {
        self.queue
            .find(control_type, packet_id)
            .ok_or(())
            .map_err(|_| self.sticky(MqttError::AckOfUnknown))
    }

    fn complete_and_observe(
        &mut self,
        control_type: ControlType,
        packet_id: u16,
        now: u32,
    ) -> Result<(), MqttError> {
        let packet_id_opt = if packet_id == 0 { None } else { Some(packet_id) };
        let idx = self.require(control_type, packet_id_opt)?;
        let sent_at = self.queue.record(idx).unwrap().time_sent;
        self.queue.set_state(idx, RecordState::Complete);
        self.observe_latency(sent_at, now);
        Ok(())
    }

    fn keep_alive_half(&mut self, now: u32) -> Result<(), MqttError> {
        if self.keep_alive == 0 {
            return Ok(());
        }
        let threshold = (self.keep_alive as u32) * 3 / 4;
        if now.saturating_sub(self.last_send) > threshold {
            self.ping()?;
        }
        Ok(())
    }
}

/// The MQTT 3.1.1 session engine driving one connection's worth of protocol state.
///
/// `L` is the scoped lock acquired for the duration of every call into the session (see
/// [`crate::lock`]); it defaults to [`NoopLock`] for hosts that already guarantee
/// single-threaded access.
pub struct Session<'a, T: Transport, L: SessionLock = NoopLock> {
    core: Core<'a, T>,
    recv_buf: &'a mut [u8],
    recv_len: usize,
    lock: L,
}

impl<'a, T: Transport> Session<'a, T, NoopLock> {
    /// Binds the caller-supplied buffers and transport. The session starts in the
    /// `ClientNotConnected` state; only [`Session::connect`] clears it.
    pub fn init(transport: T, send_buf: &'a mut [u8], recv_buf: &'a mut [u8]) -> Self {
        Self::init_with_lock(transport, send_buf, recv_buf, NoopLock)
    }
}

impl<'a, T: Transport, L: SessionLock> Session<'a, T, L> {
    /// As [`Session::init`], but with a caller-supplied [`SessionLock`] for hosts that share one
    /// session across threads or interrupt contexts.
    pub fn init_with_lock(transport: T, send_buf: &'a mut [u8], recv_buf: &'a mut [u8], lock: L) -> Self {
        Self {
            core: Core {
                transport,
                queue: SendQueue::new(send_buf),
                pid_gen: PacketIdGenerator::new(),
                keep_alive: 0,
                last_send: 0,
                response_timeout_secs: 30,
                error: Some(MqttError::ClientNotConnected),
                typical_response_time: -1.0,
                number_of_timeouts: 0,
            },
            recv_buf,
            recv_len: 0,
            lock,
        }
    }

    pub fn set_response_timeout_secs(&mut self, secs: u16) {
        self.core.response_timeout_secs = secs;
    }

    pub fn error(&self) -> Option<MqttError> {
        self.core.error
    }

    pub fn number_of_timeouts(&self) -> u32 {
        self.core.number_of_timeouts
    }

    pub fn typical_response_time(&self) -> f32 {
        self.core.typical_response_time
    }

    /// The reconnect collaborator's hook: this crate never clears the sticky error on its own.
    /// Reconnecting does not reset the send queue either — stale `AwaitingAck` records may be
    /// retransmitted on the fresh session, by design (see DESIGN.md, Open Question 4).
    pub fn clear_error(&mut self) {
        let _guard = self.lock.acquire();
        self.core.error = None;
    }

    /// Clears `ClientNotConnected`, stores `keep_alive`, and enqueues a CONNECT. Any other
    /// sticky error is returned unchanged — only the reconnect collaborator clears that.
    pub fn connect(&mut self, cfg: &ConnectConfig) -> Result<(), MqttError> {
        let _guard = self.lock.acquire();
        self.core.connect(cfg)
    }

    pub fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool) -> Result<u16, MqttError> {
        let _guard = self.lock.acquire();
        self.core.publish(topic, payload, qos, retain)
    }

    pub fn subscribe(&mut self, topics: &[(&str, QoS)]) -> Result<u16, MqttError> {
        let _guard = self.lock.acquire();
        self.core.subscribe(topics)
    }

    pub fn unsubscribe(&mut self, topics: &[&str]) -> Result<u16, MqttError> {
        let _guard = self.lock.acquire();
        self.core.unsubscribe(topics)
    }

    pub fn ping(&mut self) -> Result<(), MqttError> {
        let _guard = self.lock.acquire();
        self.core.ping()
    }

    /// Enqueues a DISCONNECT. The engine never closes the socket; the reconnect collaborator
    /// does.
    pub fn disconnect(&mut self) -> Result<(), MqttError> {
        let _guard = self.lock.acquire();
        self.core.disconnect()
    }

    /// One bounded, non-blocking pass: drains the send queue through the transport
    /// (transmitting unsent and timed-out records, retransmitting with DUP where the protocol
    /// requires it), reads and dispatches whatever responses are available, invokes
    /// `on_publish` for incoming application messages, and checks keep-alive.
    pub fn sync(&mut self, now: u32, on_publish: impl FnMut(&str, &[u8])) -> Result<(), MqttError> {
        let _guard = self.lock.acquire();
        self.core.guard()?;
        self.core.send_half(now)?;
        Self::receive_half(&mut self.core, self.recv_buf, &mut self.recv_len, now, on_publish)?;
        self.core.keep_alive_half(now)?;
        Ok(())
    }

    /// Takes disjoint field references rather than `&mut self` so that the lock guard acquired
    /// in [`Session::sync`] (which borrows `self.lock`) does not conflict with this call.
    fn receive_half(
        core: &mut Core<'a, T>,
        recv_buf: &mut [u8],
        recv_len: &mut usize,
        now: u32,
        mut on_publish: impl FnMut(&str, &[u8]),
    ) -> Result<(), MqttError> {
        if *recv_len < recv_buf.len() {
            let n = core.recv_into(&mut recv_buf[*recv_len..])?;
            *recv_len += n;
        }

        loop {
            match packet::parse_response(&recv_buf[..*recv_len]) {
                Ok(None) => {
                    if *recv_len == recv_buf.len() {
                        return Err(core.sticky(MqttError::RecvBufferTooSmall));
                    }
                    return Ok(());
                }
                Ok(Some((consumed, response))) => {
                    core.apply_response(response, now, &mut on_publish)?;
                    recv_buf.copy_within(consumed..*recv_len, 0);
                    *recv_len -= consumed;
                }
                Err(e) => return Err(core.sticky(e)),
            }
        }
    }
}

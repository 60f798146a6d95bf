//! Outbound transport seams for OSC and MIDI.
//!
//! The engine composes and times messages; delivery is delegated to these
//! traits so hosts can plug in real sockets or port bindings. `NullTransport`
//! logs and drops, the channel transports capture for tests.

use serde::{Deserialize, Serialize};

/// One OSC argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OscArg {
    Int(i32),
    Float(f64),
    Str(String),
    Bool(bool),
}

/// A composed OSC message ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscMessage {
    pub path: String,
    pub args: Vec<OscArg>,
}

/// A raw MIDI message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiMessage {
    pub bytes: Vec<u8>,
}

pub trait OscSender: Send + Sync {
    fn send(&self, destination: &str, msg: &OscMessage) -> anyhow::Result<()>;
}

pub trait MidiSender: Send + Sync {
    fn send(&self, destination: &str, msg: &MidiMessage) -> anyhow::Result<()>;
}

/// Drops everything. Default for sessions without wired transports.
#[derive(Debug, Default)]
pub struct NullTransport;

impl OscSender for NullTransport {
    fn send(&self, destination: &str, msg: &OscMessage) -> anyhow::Result<()> {
        log::debug!("osc -> {destination}: {} ({} args)", msg.path, msg.args.len());
        Ok(())
    }
}

impl MidiSender for NullTransport {
    fn send(&self, destination: &str, msg: &MidiMessage) -> anyhow::Result<()> {
        log::debug!("midi -> {destination}: {:02x?}", msg.bytes);
        Ok(())
    }
}

/// Captures sent OSC messages on a channel.
pub struct ChannelOsc {
    tx: crossbeam_channel::Sender<(String, OscMessage)>,
}

impl ChannelOsc {
    pub fn new() -> (Self, crossbeam_channel::Receiver<(String, OscMessage)>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl OscSender for ChannelOsc {
    fn send(&self, destination: &str, msg: &OscMessage) -> anyhow::Result<()> {
        self.tx.send((destination.to_string(), msg.clone()))?;
        Ok(())
    }
}

/// Captures sent MIDI messages on a channel.
pub struct ChannelMidi {
    tx: crossbeam_channel::Sender<(String, MidiMessage)>,
}

impl ChannelMidi {
    pub fn new() -> (Self, crossbeam_channel::Receiver<(String, MidiMessage)>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl MidiSender for ChannelMidi {
    fn send(&self, destination: &str, msg: &MidiMessage) -> anyhow::Result<()> {
        self.tx.send((destination.to_string(), msg.clone()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_osc_captures() {
        let (osc, rx) = ChannelOsc::new();
        let msg = OscMessage {
            path: "/light/1/dim".into(),
            args: vec![OscArg::Float(0.5), OscArg::Bool(true)],
        };
        osc.send("127.0.0.1:9000", &msg).unwrap();
        let (dest, got) = rx.try_recv().unwrap();
        assert_eq!(dest, "127.0.0.1:9000");
        assert_eq!(got, msg);
    }

    #[test]
    fn test_null_transport_accepts_everything() {
        let t = NullTransport;
        OscSender::send(
            &t,
            "nowhere",
            &OscMessage {
                path: "/x".into(),
                args: vec![],
            },
        )
        .unwrap();
        MidiSender::send(
            &t,
            "nowhere",
            &MidiMessage {
                bytes: vec![0x90, 60, 100],
            },
        )
        .unwrap();
    }
}

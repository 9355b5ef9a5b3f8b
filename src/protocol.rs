//! TCP protocol for analyze-client ↔ analyze-server communication.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::swing::SwingMetrics;

// --- Message types ---

/// Client → Server
#[derive(Serialize, Deserialize, Debug)]
pub enum ClientMessage {
    Analyze { filename: String, video_data: Vec<u8> },
    Health,
}

/// Server → Client
#[derive(Serialize, Deserialize, Debug)]
pub enum ServerMessage {
    Analysis {
        analysis_version: String,
        metrics: SwingMetrics,
    },
    AnalysisFailed {
        code: String,
        message: String,
    },
    Health {
        status: String,
        version: String,
    },
}

// --- TCP codec helpers ---

pub type MessageStream = Framed<TcpStream, LengthDelimitedCodec>;

/// Create a framed message stream with length-delimited framing.
pub fn message_stream(stream: TcpStream) -> MessageStream {
    let codec = LengthDelimitedCodec::builder()
        .max_frame_length(256 * 1024 * 1024) // 256MB (video payloads)
        .new_codec();
    Framed::new(stream, codec)
}

/// Send a serializable message (bincode + length prefix).
pub async fn send_message<T: Serialize>(
    stream: &mut MessageStream,
    msg: &T,
) -> anyhow::Result<()> {
    let data = bincode::serialize(msg)?;
    stream.send(Bytes::from(data)).await?;
    Ok(())
}

/// Receive and deserialize a message.
pub async fn recv_message<T: DeserializeOwned>(
    stream: &mut MessageStream,
) -> anyhow::Result<T> {
    match stream.next().await {
        Some(Ok(bytes)) => Ok(bincode::deserialize(&bytes)?),
        Some(Err(e)) => Err(e.into()),
        None => Err(anyhow::anyhow!("connection closed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_roundtrip_through_bincode() {
        let msg = ClientMessage::Analyze {
            filename: "swing.mp4".to_string(),
            video_data: vec![1, 2, 3, 4],
        };
        let bytes = bincode::serialize(&msg).unwrap();
        let back: ClientMessage = bincode::deserialize(&bytes).unwrap();
        match back {
            ClientMessage::Analyze { filename, video_data } => {
                assert_eq!(filename, "swing.mp4");
                assert_eq!(video_data, vec![1, 2, 3, 4]);
            }
            ClientMessage::Health => panic!("wrong variant"),
        }
    }
}

//! Send a video file to the analyze server and print the reply.
//!
//! Usage: analyze_client <video> [server_addr]

use anyhow::{Context, Result};
use tokio::net::TcpStream;

use swing_analyzer::protocol::{self, ClientMessage, ServerMessage};

const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:9720";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(video_path) = args.first() else {
        eprintln!("Usage: analyze_client <video> [server_addr]");
        std::process::exit(2);
    };
    let addr = args.get(1).map(String::as_str).unwrap_or(DEFAULT_SERVER_ADDR);

    let video_data =
        std::fs::read(video_path).with_context(|| format!("Failed to read {}", video_path))?;
    let filename = std::path::Path::new(video_path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "video.mp4".to_string());

    println!("Connecting to {}", addr);
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("Failed to connect to {}", addr))?;
    let mut framed = protocol::message_stream(stream);

    println!("Sending {} ({} bytes)", filename, video_data.len());
    let request = ClientMessage::Analyze {
        filename,
        video_data,
    };
    protocol::send_message(&mut framed, &request).await?;

    let reply: ServerMessage = protocol::recv_message(&mut framed).await?;
    match reply {
        ServerMessage::Analysis {
            analysis_version,
            metrics,
        } => {
            println!("Analysis {} report:", analysis_version);
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
        ServerMessage::AnalysisFailed { code, message } => {
            eprintln!("Rejected [{}]: {}", code, message);
            std::process::exit(1);
        }
        ServerMessage::Health { .. } => {
            anyhow::bail!("unexpected reply type");
        }
    }

    Ok(())
}

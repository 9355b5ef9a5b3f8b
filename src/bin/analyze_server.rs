//! Swing analysis TCP server.
//!
//! Receives whole video files from clients, runs the analysis pipeline on a
//! blocking task, and replies with the metrics report or the rejection
//! reason. Uploads live in a temp directory and are removed after every
//! request, whatever the outcome.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use swing_analyzer::analyzer::SwingAnalyzer;
use swing_analyzer::config::Config;
use swing_analyzer::protocol::{self, ClientMessage, ServerMessage};
use swing_analyzer::swing::ANALYSIS_VERSION;

const CONFIG_PATH: &str = "config.toml";
const LISTEN_ADDR: &str = "0.0.0.0:9720";
const UPLOAD_DIR: &str = "uploads";

// ===========================================================================
// Upload handling
// ===========================================================================

/// Write an uploaded video to a temp file. Timestamp prefix keeps
/// concurrent uploads of the same filename from colliding.
fn save_upload(filename: &str, data: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(UPLOAD_DIR)?;
    let base = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload.mp4".to_string());
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
    let path = PathBuf::from(UPLOAD_DIR).join(format!("{}_{}", ts, base));
    std::fs::write(&path, data)?;
    Ok(path)
}

/// Run the analysis through a temp file. The file is removed whatever
/// the outcome.
async fn run_analysis(
    analyzer: &Arc<Mutex<SwingAnalyzer>>,
    filename: &str,
    video_data: Vec<u8>,
) -> ServerMessage {
    let path = match save_upload(filename, &video_data) {
        Ok(path) => path,
        Err(e) => {
            return ServerMessage::AnalysisFailed {
                code: "upload_failed".to_string(),
                message: format!("{:#}", e),
            };
        }
    };

    let analyzer = analyzer.clone();
    let task_path = path.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut analyzer = analyzer.blocking_lock();
        analyzer.analyze_file(&task_path)
    })
    .await;

    let _ = std::fs::remove_file(&path);

    match result {
        Ok(Ok(metrics)) => ServerMessage::Analysis {
            analysis_version: ANALYSIS_VERSION.to_string(),
            metrics,
        },
        Ok(Err(e)) => ServerMessage::AnalysisFailed {
            code: e.code().to_string(),
            message: e.to_string(),
        },
        Err(e) => ServerMessage::AnalysisFailed {
            code: "internal".to_string(),
            message: format!("analysis task failed: {}", e),
        },
    }
}

// ===========================================================================
// Connection handling
// ===========================================================================

async fn handle_client(stream: TcpStream, analyzer: Arc<Mutex<SwingAnalyzer>>) -> Result<()> {
    let peer = stream.peer_addr()?;
    let mut framed = protocol::message_stream(stream);

    loop {
        let msg: ClientMessage = match protocol::recv_message(&mut framed).await {
            Ok(msg) => msg,
            Err(_) => {
                println!("[{}] disconnected", peer);
                return Ok(());
            }
        };

        match msg {
            ClientMessage::Health => {
                let reply = ServerMessage::Health {
                    status: "ok".to_string(),
                    version: env!("GIT_VERSION").to_string(),
                };
                protocol::send_message(&mut framed, &reply).await?;
            }
            ClientMessage::Analyze { filename, video_data } => {
                println!(
                    "[{}] analyze request: {} ({} bytes)",
                    peer,
                    filename,
                    video_data.len()
                );
                let reply = run_analysis(&analyzer, &filename, video_data).await;
                match &reply {
                    ServerMessage::AnalysisFailed { code, message } => {
                        println!("[{}] rejected [{}]: {}", peer, code, message);
                    }
                    _ => println!("[{}] report sent", peer),
                }
                protocol::send_message(&mut framed, &reply).await?;
            }
        }
    }
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() -> Result<()> {
    println!(
        "swing-analyzer server {} (analysis {})",
        env!("GIT_VERSION"),
        ANALYSIS_VERSION
    );

    let config = Config::load_or_default(CONFIG_PATH);
    println!("Model: {}", config.detector.model_path);
    println!("Dominant side: {:?}", config.analysis.dominant_side);

    let analyzer = SwingAnalyzer::new(config).context("Failed to initialize analyzer")?;
    let analyzer = Arc::new(Mutex::new(analyzer));

    let listener = TcpListener::bind(LISTEN_ADDR)
        .await
        .with_context(|| format!("Failed to bind {}", LISTEN_ADDR))?;
    println!("Listening on {}", LISTEN_ADDR);

    loop {
        let (stream, addr) = listener.accept().await?;
        println!("Connected: {}", addr);
        let analyzer = analyzer.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, analyzer).await {
                eprintln!("[{}] connection error: {:#}", addr, e);
            }
        });
    }
}

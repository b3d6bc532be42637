//! Mongrid Sender - kirim satu command datagram ke listener
//!
//! Fire-and-forget: tidak ada response dari listener, jadi tool ini
//! langsung exit setelah `send_to`.
//!
//! # Usage
//!
//! ```text
//! mongrid_send --target 127.0.0.1:7001 play "Cam A" rtsp://10.0.0.1/media H264 --title "Backup Feed"
//! mongrid_send stop
//! ```

use std::net::UdpSocket;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mongrid::protocol::{Encoder, PlayFields, Verb};

#[derive(Parser, Debug)]
#[command(name = "mongrid_send", version, about = "Send one command to a mongrid listener")]
struct Cli {
    /// Listener address
    #[arg(short, long, default_value = "127.0.0.1:7001")]
    target: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a stream in the listener's target cell
    Play {
        description: String,
        uri: String,
        stream_type: String,
        /// Secondary title, appended to the description
        #[arg(long)]
        title: Option<String>,
    },
    Stop,
    Monitor,
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut encoder = Encoder::new();

    let datagram = match &cli.command {
        Command::Play {
            description,
            uri,
            stream_type,
            title,
        } => encoder
            .encode_play(&PlayFields {
                description,
                uri,
                stream_type,
                title: title.as_deref(),
            })
            .context("encoding play command")?,
        Command::Stop => encoder.encode_verb(Verb::Stop),
        Command::Monitor => encoder.encode_verb(Verb::Monitor),
        Command::Config => encoder.encode_verb(Verb::Config),
    };

    let socket = UdpSocket::bind("0.0.0.0:0").context("binding local socket")?;
    let sent = socket
        .send_to(datagram, &cli.target)
        .with_context(|| format!("sending to {}", cli.target))?;
    println!("sent {sent} bytes to {}", cli.target);
    Ok(())
}

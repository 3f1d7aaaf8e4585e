mod input;
mod render;

use clap::{Parser, ValueEnum};
use engine::Session;
use log::{error, info};
use macroquad::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RoleArg {
    /// Single process, authoritative for both teams
    Local,
    /// Authoritative; waits for a guest and broadcasts snapshots
    Host,
    /// Mirrors a host's state and sends input intent
    Guest,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Session role
    #[arg(short, long, value_enum, default_value = "local")]
    role: RoleArg,

    /// Address to bind when hosting
    #[arg(short, long, default_value = "0.0.0.0:7777")]
    bind: String,

    /// Host address to join as guest
    #[arg(short, long, default_value = "127.0.0.1:7777")]
    connect: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "laneduel".to_owned(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let session = match args.role {
        RoleArg::Local => Ok(Session::local()),
        RoleArg::Host => Session::host(&args.bind),
        RoleArg::Guest => Session::join(&args.connect),
    };
    let mut session = match session {
        Ok(session) => session,
        Err(e) => {
            // fatal to this attempt only; a fresh launch retries
            error!("session setup failed: {}", e);
            return;
        }
    };

    info!(
        "running as {:?}; WASD/arrows move, Space/Q/E cast, Tab lock-on, R reset, T wave",
        args.role
    );

    let mut capture = input::InputCapture::new();
    let mut renderer = render::Renderer::new();

    loop {
        let frame = capture.update(&renderer.camera);
        if is_key_pressed(KeyCode::R) {
            session.reset();
        }
        if is_key_pressed(KeyCode::T) {
            session.force_spawn_wave();
        }

        session.frame(&frame);
        renderer.draw(&session, capture.lock_on());

        next_frame().await;
    }
}

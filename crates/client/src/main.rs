//! Chatgames client - terminal host
//!
//! Logs in as the given identity, prints the message feed and lobby changes,
//! and turns stdin lines into intents.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use chatgames_client::stores::MessageKind;
use chatgames_client::{
    logging, ChatClient, ClientConfig, FileStore, HeadlessNavigator, HttpLobbyApi, KeyValueStore,
    LobbyPolicy, MemoryStore, Session, Update, WebSocketConnector,
};
use chatgames_shared::GameKind;

#[derive(Parser)]
#[command(name = "chatgames-client")]
#[command(about = "Terminal client for the chatgames server")]
struct Args {
    /// Display name to log in with
    identity: String,

    /// WebSocket endpoint (overrides CHATGAMES_WS_URL)
    #[arg(long)]
    ws_url: Option<String>,

    /// Lobby REST base URL (overrides CHATGAMES_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Apply every lobby fetch result, even ones overtaken by newer data
    #[arg(long)]
    last_write_wins: bool,

    /// Keep breadcrumbs in memory only
    #[arg(long)]
    no_persist: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = ClientConfig::from_env().context("reading configuration")?;
    if let Some(url) = &args.ws_url {
        config = config.with_ws_url(url)?;
    }
    if let Some(url) = &args.api_url {
        config = config.with_api_url(url)?;
    }
    if args.last_write_wins {
        config = config.with_lobby_policy(LobbyPolicy::LastWriteWins);
    }

    let store: Arc<dyn KeyValueStore> = match (&config.storage_dir, args.no_persist) {
        (_, true) => Arc::new(MemoryStore::new()),
        (Some(dir), false) => Arc::new(FileStore::new(dir)),
        (None, false) => match FileStore::in_config_dir() {
            Some(store) => Arc::new(store),
            None => Arc::new(MemoryStore::new()),
        },
    };

    let session = Session::guest(&args.identity)?;
    let api = Arc::new(HttpLobbyApi::new(config.api_url.clone()));
    let mut client = ChatClient::new(
        config,
        Arc::new(WebSocketConnector),
        api,
        store,
        Box::new(HeadlessNavigator::new()),
    );
    client.set_session(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printed = 0;

    loop {
        tokio::select! {
            update = client.next_event() => {
                let Some(update) = update else { break };
                match update {
                    Update::Status(status) => println!("* {status:?}"),
                    Update::Notice(notice) => println!("! {notice:?}"),
                    Update::LobbyRefreshed(kind) => print_lobby(&client, kind),
                    Update::Navigated(route) => println!("* now at {route}"),
                    Update::Dispatched | Update::Ignored => {}
                }
                printed = print_feed(&client, printed);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else { break };
                if !run_command(&mut client, line.trim()) {
                    break;
                }
            }
        }
    }

    client.set_session(&Session::LoggedOut);
    Ok(())
}

/// Returns `false` when the user asked to quit.
fn run_command(client: &mut ChatClient, line: &str) -> bool {
    if line.is_empty() {
        return true;
    }
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "/quit" => return false,
        "/join" => {
            client.join_room(rest);
        }
        "/create" => {
            client.create_room(rest);
        }
        "/leave" => {
            client.leave_room(rest.trim());
        }
        "/room" => match rest.split_once(' ') {
            Some((room, text)) => {
                client.send_room_message(room, text);
            }
            None => println!("usage: /room <room> <text>"),
        },
        "/pm" => match rest.split_once(' ') {
            Some((to, text)) => {
                client.view_private(to);
                client.send_private(to, text);
            }
            None => println!("usage: /pm <user> <text>"),
        },
        "/lobby" => {
            client.refresh_lobby(GameKind::Card);
            client.refresh_lobby(GameKind::Word);
        }
        "/who" => println!("online: {}", client.state().roster.users().join(", ")),
        _ => {
            if !client.send_broadcast(line) {
                println!("! not connected, message dropped");
            }
        }
    }
    true
}

fn print_feed(client: &ChatClient, from: usize) -> usize {
    let messages = client.state().messages.all();
    for message in &messages[from.min(messages.len())..] {
        match (message.kind, &message.target) {
            (MessageKind::Room, Some(room)) => {
                println!("[#{room}] {}: {}", message.sender, message.text)
            }
            (MessageKind::Private, Some(to)) => {
                println!("[{} -> {to}] {}", message.sender, message.text)
            }
            _ => println!("{}: {}", message.sender, message.text),
        }
    }
    messages.len()
}

fn print_lobby(client: &ChatClient, kind: GameKind) {
    let games = client.state().lobby(kind).games();
    let ids: Vec<&str> = games.iter().map(|g| g.game_id.as_str()).collect();
    println!("* {kind} lobby: [{}]", ids.join(", "));
}

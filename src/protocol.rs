//! Line-oriented text protocol for driving a game.
//!
//! Each input line is an optional numeric id followed by a command and its
//! arguments. Responses are `=<id> <payload>` on success and `?<id> <error>`
//! on failure, each followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name` / `version` - Engine identification
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `reset` - Restore the starting layout
//! - `showboard` - Render the board
//! - `active` - Name of the player to move
//! - `select <x,y>` - Tap a tile; the payload lists the resulting events
//! - `moves` - Moves offered for the current selection
//! - `genmove` - Let the search play the active player's turn
//! - `score` - Material of both players
//!
//! ## Example
//!
//! ```ignore
//! use checkers_rust::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new();
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::info;

use crate::engine::{GameEngine, GameEvent};
use crate::moves::{Move, chain_to_string};
use crate::player::{PlayerId, Players};
use crate::position::parse_coord;
use crate::scoring::board_score;
use crate::search::SearchConfig;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "active",
    "genmove",
    "known_command",
    "list_commands",
    "moves",
    "name",
    "quit",
    "reset",
    "score",
    "select",
    "showboard",
    "version",
];

/// Protocol front-end around a [`GameEngine`].
pub struct ProtocolEngine {
    game: GameEngine,
    /// Search settings used by `genmove` when the active seat has none of its own.
    config: SearchConfig,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolEngine {
    pub fn new() -> Self {
        Self::with_config(Players::standard(), SearchConfig::default())
    }

    pub fn with_config(players: Players, config: SearchConfig) -> Self {
        Self {
            game: GameEngine::new(players),
            config,
        }
    }

    pub fn game(&self) -> &GameEngine {
        &self.game
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    fn player_name(&self, id: PlayerId) -> &str {
        &self.game.players().get(id).name
    }

    fn symbols(&self) -> [char; 2] {
        let players = self.game.players();
        [
            players.get(PlayerId::FIRST).symbol,
            players.get(PlayerId::SECOND).symbol,
        ]
    }

    fn describe(&self, event: &GameEvent) -> String {
        match event {
            GameEvent::SelectionIgnored(reason) => format!("ignored: {reason}"),
            GameEvent::TurnStarted { at, valid_moves } => {
                format!("selected {at} [{}]", chain_to_string(valid_moves))
            }
            GameEvent::TileUnselected { at, .. } => format!("unselected {at}"),
            GameEvent::MoveExecuted { mv, .. } => format!("moved {mv}"),
            GameEvent::PlayerTurnStarted(id) => format!("turn {}", self.player_name(*id)),
            GameEvent::GameFinished { winner } => format!("winner {}", self.player_name(*winner)),
        }
    }

    fn describe_events(&mut self) -> String {
        let events = self.game.drain_events();
        events
            .iter()
            .map(|e| self.describe(e))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "checkers-rust".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "reset" => {
                self.game.reset();
                self.game.drain_events();
                info!("board reset");
                (true, String::new())
            }

            "showboard" => (true, format!("\n{}", self.game.board().render(self.symbols()))),

            "active" => (true, self.player_name(self.game.active_player()).to_string()),

            "select" => {
                if self.game.is_finished() {
                    return (false, "game over".to_string());
                }
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let at = match parse_coord(arg) {
                    Ok(at) => at,
                    Err(e) => return (false, e.to_string()),
                };
                let accepted = self.game.select_tile(at);
                (accepted, self.describe_events())
            }

            "moves" => {
                let moves: Vec<Move> = self.game.valid_moves().to_vec();
                (true, chain_to_string(&moves))
            }

            "genmove" => {
                if self.game.is_finished() {
                    return (false, "game over".to_string());
                }
                let active = self.game.active_player();
                let config = self
                    .game
                    .players()
                    .get(active)
                    .search_config()
                    .cloned()
                    .unwrap_or_else(|| self.config.clone());
                match self.game.play_ai_turn(&config) {
                    Ok(chain) => {
                        self.game.drain_events();
                        let mut response = chain_to_string(&chain);
                        if let Some(winner) = self.game.winner() {
                            response.push_str(&format!("\nwinner {}", self.player_name(winner)));
                        }
                        (true, response)
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "score" => {
                let board = self.game.board();
                let weights = &self.config.weights;
                let lines: Vec<String> = self
                    .game
                    .players()
                    .iter()
                    .map(|(id, p)| format!("{} {}", p.name, board_score(board, id, weights)))
                    .collect();
                (true, lines.join("\n"))
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

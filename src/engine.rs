/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::{
    fmt_move, play_line, print_perft, tune, Color, EngineCommand, EvalParams, Evaluator, Game,
    LogDebug, LogInfo, Player, Search, SearchConfig, SearchResult, BENCHMARK_LINES,
};

/// The Flipper Othello engine.
#[derive(Debug)]
pub struct Engine {
    /// The current state of the board, as known to the engine.
    ///
    /// This is modified whenever moves are played or new positions are given,
    /// and is reset whenever the engine is told to start a new game.
    game: Game,

    /// Who plays each color, indexed by [`Color::index`].
    players: [Player; Color::COUNT],

    /// Weights used by `go`, `eval`, and newly assigned computer players.
    params: EvalParams,

    /// Search settings used by `go` and newly assigned computer players.
    config: SearchConfig,

    /// Whether `go` prints extra diagnostics.
    debug: bool,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] instance to be executed with [`Engine::run`].
    ///
    /// Both colors start out as [`Player::Human`].
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            game: Game::default(),
            players: Default::default(),
            params: EvalParams::default(),
            config: SearchConfig::default(),
            debug: false,
            sender,
            receiver,
        }
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Sends an [`EngineCommand`] to the engine to be executed.
    pub fn send_command(&self, command: EngineCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("Failed to send command to engine")
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    /// Commands are executed one at a time, so a search always runs to completion before the next command is read.
    pub fn run(&mut self) -> Result<()> {
        println!("{} by {}", self.name(), env!("CARGO_PKG_AUTHORS"));

        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err}");
            }
        });

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            if matches!(cmd, EngineCommand::Exit) {
                break;
            }

            // Keep running, even on error
            if let Err(e) = self.handle_command(cmd) {
                eprintln!("Error: {e:#}");
            }
        }

        Ok(())
    }

    /// Handle the execution of a single [`EngineCommand`].
    fn handle_command(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Bench { depth, pretty } => self.bench(depth, pretty)?,

            EngineCommand::Debug { status } => self.debug = status,

            EngineCommand::Depth { depth } => self.set_depth(depth)?,

            EngineCommand::Display => self.display(),

            EngineCommand::Eval { pretty } => self.eval(pretty),

            EngineCommand::Exit => {}

            EngineCommand::Go { depth } => {
                let mut config = self.config;
                if let Some(depth) = depth {
                    config.depth = depth;
                }
                self.search(config);
            }

            EngineCommand::Moves => {
                let moves = self.game.available_moves();

                // If there are none, print "(none)"
                let moves_string = if moves.is_empty() {
                    String::from("(none)")
                } else {
                    // Otherwise, join them by comma-space
                    moves
                        .into_iter()
                        .map(fmt_move)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("{moves_string}");
            }

            EngineCommand::NewGame => {
                self.game = Game::default();
                self.play_computer_turns()?;
            }

            EngineCommand::Params => println!("{}", self.params),

            EngineCommand::Pass => {
                self.game.make_move(None)?;
                self.play_computer_turns()?;
            }

            EngineCommand::Perft { depth } => {
                print_perft::<false>(&self.game, depth);
            }

            EngineCommand::Place { square, color } => {
                self.game.position_mut().set_square(square, Some(color));
            }

            EngineCommand::Play { square } => {
                self.game.make_move(Some(square))?;
                self.play_computer_turns()?;
            }

            EngineCommand::Player { color, kind } => {
                self.set_player(color, kind);
                self.play_computer_turns()?;
            }

            EngineCommand::Position { layout, side } => {
                let position = layout
                    .parse()
                    .with_context(|| format!("Failed to set position {layout:?}"))?;
                self.game = Game::from_position(position, side);
            }

            EngineCommand::Splitperft { depth } => {
                print_perft::<true>(&self.game, depth);
            }

            EngineCommand::Stable => {
                let mut position = *self.game.position();
                println!("{}", position.stable_squares());
            }

            EngineCommand::Take { square } => {
                self.game.position_mut().set_square(square, None);
            }
        };

        Ok(())
    }

    /// Execute the `bench` command, running a benchmark of a fixed search on a series of positions and displaying the results.
    fn bench(&mut self, depth: Option<usize>, pretty: bool) -> Result<()> {
        // Set up the benchmarking config
        let config = SearchConfig::new(depth.unwrap_or(tune::bench_depth!()));

        let benches = BENCHMARK_LINES;
        let num_tests = benches.len();
        let mut nodes = 0;
        let starttime = Instant::now();

        // Run a fixed search on each position
        for (i, line) in benches.into_iter().enumerate() {
            println!("Benchmark position {}/{}: {line:?}", i + 1, num_tests);

            let mut game = Game::new();
            play_line(&mut game, line)?;

            let res = Search::<LogInfo>::new(game.position(), &self.params, config)
                .start(game.side_to_move());
            nodes += res.nodes;
        }

        // Compute results
        let elapsed = starttime.elapsed();
        let nps = (nodes as f32 / elapsed.as_secs_f32()) as u64;
        let m_nps = nodes as f32 / elapsed.as_secs_f32() / 1_000_000.0;
        let ms = elapsed.as_millis();

        if pretty {
            // Display the results in a nice table
            println!();
            println!("+--- Benchmark Complete ---+");
            println!("| time (ms)  : {ms:<12}|");
            println!("| nodes      : {nodes:<12}|");
            println!("| nps        : {nps:<12}|");
            println!("| Mnps       : {m_nps:<12.2}|");
            println!("+--------------------------+");
        } else {
            println!("{nodes} nodes {nps} nps");
        }

        Ok(())
    }

    /// Executes the `display` command, printing the current position.
    fn display(&self) {
        println!("{}", self.game);
    }

    /// Executes the `eval` command, printing an evaluation of the current position.
    fn eval(&self, pretty: bool) {
        let mut position = *self.game.position();
        let evaluator = Evaluator::new(&mut position, &self.params);
        if pretty {
            print!("{evaluator}\n\nScore: ");
        }

        println!("{}", evaluator.eval_for(self.game.side_to_move()));
    }

    /// Sets the search depth for `go` and for every computer player.
    fn set_depth(&mut self, depth: usize) -> Result<()> {
        if depth == 0 {
            bail!("Search depth must be at least 1");
        }

        self.config.depth = depth;
        for player in &mut self.players {
            if let Player::Computer { config, .. } = player {
                config.depth = depth;
            }
        }

        Ok(())
    }

    /// Assigns a player to `color`, giving computer players the engine's current weights and depth.
    fn set_player(&mut self, color: Color, kind: Player) {
        let player = match kind {
            Player::Computer { .. } => Player::Computer {
                params: self.params.clone(),
                config: self.config,
            },
            other => other,
        };

        println!("{color} is now played by {player}");
        self.players[color.index()] = player;
    }

    /// Searches the current position and prints the result, without playing the move.
    fn search(&self, config: SearchConfig) -> SearchResult {
        let position = self.game.position();
        let color = self.game.side_to_move();

        if self.debug {
            Search::<LogDebug>::new(position, &self.params, config).start(color)
        } else {
            Search::<LogInfo>::new(position, &self.params, config).start(color)
        }
    }

    /// Lets computer players move until a human is to move or the game is over.
    fn play_computer_turns(&mut self) -> Result<()> {
        while !self.game.is_game_over() {
            let color = self.game.side_to_move();
            let player = &self.players[color.index()];

            if !player.is_computer() {
                if self.game.needs_pass() {
                    println!("info string {color} has no legal moves and must pass");
                }
                return Ok(());
            }

            let mv = player.choose_move(self.game.position(), color);
            self.game.make_move(mv)?;
            println!("{color} plays {}", fmt_move(mv));
        }

        println!("{}", self.game);
        match self.game.winner() {
            Some(color) => println!("Game over: {color} wins"),
            None => println!("Game over: {}", self.game.result_string()),
        }

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(2048);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            // Send the Exit command and exit this function
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Engine received input of 0 bytes and is quitting");
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match EngineCommand::try_parse_from(buf.split_ascii_whitespace()) {
            // If successful, send the command to the engine
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to engine")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => eprintln!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_toggle() {
        let mut engine = Engine::new();
        assert!(!engine.debug);

        engine.handle_command("debug on".parse().unwrap()).unwrap();
        assert!(engine.debug);

        engine.handle_command("debug off".parse().unwrap()).unwrap();
        assert!(!engine.debug);
    }

    #[test]
    fn test_depth_updates_computer_players() {
        let mut engine = Engine::new();
        engine.set_player(Color::White, Player::computer());

        assert!(engine.set_depth(0).is_err());
        engine.set_depth(3).unwrap();

        assert_eq!(engine.config.depth, 3);
        let Player::Computer { config, .. } = &engine.players[Color::White.index()] else {
            panic!("White should be a computer player");
        };
        assert_eq!(config.depth, 3);
    }
}

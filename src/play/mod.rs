//! Playing matches against the engine.
//!
//! ```
//! use gomoku_zero::core::{Cell, GameConfig, PlayerMap};
//! use gomoku_zero::mcts::MCTSConfig;
//! use gomoku_zero::nn::UniformPolicyZeroValue;
//! use gomoku_zero::play::{ExternalPlayer, Match, Player, SearchPlayer};
//!
//! let config = GameConfig::new(5, 5).with_win_length(4).with_history_depth(2);
//! let mut game = Match::new(config).unwrap();
//! let mut seats = PlayerMap::new(|player| -> Box<dyn Player> {
//!     if player.id() == 1 {
//!         Box::new(ExternalPlayer::new())
//!     } else {
//!         let search = MCTSConfig::default().with_simulations(32);
//!         Box::new(SearchPlayer::new(search, UniformPolicyZeroValue::new(25)))
//!     }
//! });
//!
//! game.play_ply(&mut seats, Some(Cell::from_coords(2, 2, 5))).unwrap();
//! let reply = game.play_ply(&mut seats, None).unwrap();
//! assert_eq!(reply.placements[reply.mover].len(), 1);
//! ```

pub mod game;
pub mod player;

pub use game::{Match, PlayError, PlyOutcome, Seats};
pub use player::{ExternalPlayer, Player, SearchPlayer};

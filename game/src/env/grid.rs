use pallet_protocol::{Action, GridAction, describe};

use super::{EnvError, Environment, GameState, Observation, answer_instruction};
use crate::executor::Flow;

pub const DEFAULT_WIDTH: usize = 8;
pub const DEFAULT_HEIGHT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Walkable,
    Wall,
}

impl Tile {
    pub fn symbol(&self) -> char {
        match self {
            Tile::Walkable => 'w',
            Tile::Wall => 'o',
        }
    }
}

const PLAYER: char = 'p';

/// Legend lines shown in the prompt, in map order
const LEGEND: [(&str, char); 3] = [
    ("empty space you can walk on", 'w'),
    ("your current position", PLAYER),
    ("walls that block your path", 'o'),
];

/// Wall-bordered rectangle with the player inside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    player: (usize, usize),
}

impl Grid {
    /// Walls on the border, open floor inside, player at (1, 1)
    pub fn new(width: usize, height: usize) -> Result<Self, EnvError> {
        if width < 3 || height < 3 {
            return Err(EnvError::InvalidConfig(format!(
                "grid must be at least 3x3, got {width}x{height}"
            )));
        }

        let tiles = (0..height)
            .map(|row| {
                (0..width)
                    .map(|col| {
                        let border = row == 0 || col == 0 || row == height - 1 || col == width - 1;
                        if border { Tile::Wall } else { Tile::Walkable }
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            tiles,
            player: (1, 1),
        })
    }

    pub fn player(&self) -> (usize, usize) {
        self.player
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<Tile> {
        self.tiles.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Target cell of a move, if it is in bounds and walkable
    fn target(&self, action: GridAction) -> Option<(usize, usize)> {
        let (dr, dc) = action.delta();
        let row = self.player.0.checked_add_signed(dr)?;
        let col = self.player.1.checked_add_signed(dc)?;
        match self.tile(row, col)? {
            Tile::Walkable => Some((row, col)),
            Tile::Wall => None,
        }
    }

    pub fn can_move(&self, action: GridAction) -> bool {
        self.target(action).is_some()
    }

    /// Move the player. Blocked moves leave the grid unchanged.
    pub fn apply(&mut self, action: GridAction) -> bool {
        match self.target(action) {
            Some(cell) => {
                self.player = cell;
                true
            }
            None => false,
        }
    }

    pub fn render(&self) -> String {
        self.tiles
            .iter()
            .enumerate()
            .map(|(row, tiles)| {
                tiles
                    .iter()
                    .enumerate()
                    .map(|(col, tile)| {
                        if (row, col) == self.player {
                            PLAYER
                        } else {
                            tile.symbol()
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Text adventure on a [`Grid`]
pub struct GridEnvironment {
    grid: Grid,
    moves: u64,
}

impl GridEnvironment {
    pub fn new(width: usize, height: usize) -> Result<Self, EnvError> {
        Ok(Self {
            grid: Grid::new(width, height)?,
            moves: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Successful moves so far
    pub fn moves(&self) -> u64 {
        self.moves
    }
}

impl Environment for GridEnvironment {
    type Action = GridAction;

    fn name(&self) -> &'static str {
        "grid"
    }

    fn observe(&mut self) -> Result<GameState<GridAction>, EnvError> {
        let legal_actions = GridAction::ALL
            .iter()
            .copied()
            .filter(|action| self.grid.can_move(*action))
            .collect();

        Ok(GameState {
            legal_actions,
            observation: Observation::Text(self.grid.render()),
            report: None,
        })
    }

    fn prompt(&self, state: &GameState<GridAction>) -> String {
        let map = match &state.observation {
            Observation::Text(map) => map.clone(),
            Observation::Screen(_) => self.grid.render(),
        };
        let legend: String = LEGEND
            .iter()
            .map(|(meaning, symbol)| format!("- {meaning} ('{symbol}')\n"))
            .collect();

        format!(
            "You are in a text adventure. \n\n```\n{map}\n```\n\nThe world contains:\n{legend}You can choose to take any of the following actions: {}\n{}",
            describe(&state.legal_actions),
            answer_instruction(GridAction::Up)
        )
    }

    fn act(&mut self, action: GridAction) -> Result<Flow, EnvError> {
        if self.grid.apply(action) {
            self.moves += 1;
        } else {
            tracing::debug!(action = action.name(), "Blocked move ignored");
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map_renders() {
        let grid = Grid::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();

        assert_eq!(
            grid.render(),
            "oooooooo\nopwwwwwo\nowwwwwwo\nowwwwwwo\nowwwwwwo\noooooooo"
        );
    }

    #[test]
    fn test_legal_actions_exclude_walls() {
        let mut env = GridEnvironment::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();
        let state = env.observe().unwrap();

        assert_eq!(
            state.legal_actions,
            vec![GridAction::Down, GridAction::Right]
        );
    }

    #[test]
    fn test_act_moves_player() {
        let mut env = GridEnvironment::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();

        assert_eq!(env.act(GridAction::Right).unwrap(), Flow::Continue);
        assert_eq!(env.act(GridAction::Down).unwrap(), Flow::Continue);
        assert_eq!(env.grid().player(), (2, 2));
        assert_eq!(env.moves(), 2);
    }

    #[test]
    fn test_blocked_move_is_noop() {
        let mut env = GridEnvironment::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();

        assert_eq!(env.act(GridAction::Up).unwrap(), Flow::Continue);
        assert_eq!(env.grid().player(), (1, 1));
        assert_eq!(env.moves(), 0);
    }

    #[test]
    fn test_prompt_contents() {
        let mut env = GridEnvironment::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();
        let state = env.observe().unwrap();
        let prompt = env.prompt(&state);

        assert!(prompt.starts_with("You are in a text adventure."));
        assert!(prompt.contains("```\noooooooo\nopwwwwwo\n"));
        assert!(prompt.contains("- walls that block your path ('o')\n"));
        assert!(prompt.contains("following actions: [down, right]\n"));
        assert!(prompt.ends_with("```\n<answer>up</answer>\n```"));
    }

    #[test]
    fn test_too_small_grid_rejected() {
        assert!(matches!(
            Grid::new(2, 6),
            Err(EnvError::InvalidConfig(_))
        ));
    }
}

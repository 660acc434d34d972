use pallet_protocol::{Action, PokemonAction, describe};

use super::{EnvError, Environment, GameState, Observation, answer_instruction};
use crate::device::Device;
use crate::executor::{ActionExecutor, Flow};
use crate::memory::{MemoryDecoder, MemoryLayout};

/// Pokemon Red running on a [`Device`]
pub struct PokemonEnvironment<D> {
    device: D,
    layout: MemoryLayout,
    executor: ActionExecutor,
    headless: bool,
}

impl<D: Device> PokemonEnvironment<D> {
    pub fn new(device: D, executor: ActionExecutor, headless: bool) -> Self {
        Self {
            device,
            layout: MemoryLayout::default(),
            executor,
            headless,
        }
    }

    pub fn with_layout(mut self, layout: MemoryLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    pub fn decoder(&self) -> MemoryDecoder<'_, D> {
        MemoryDecoder::with_layout(&self.device, self.layout)
    }
}

impl<D: Device> Environment for PokemonEnvironment<D> {
    type Action = PokemonAction;

    fn name(&self) -> &'static str {
        "pokemon"
    }

    fn observe(&mut self) -> Result<GameState<PokemonAction>, EnvError> {
        let summary = self.decoder().summary()?;
        tracing::debug!(
            context = %summary.context,
            position = %summary.position,
            "Observed game state"
        );

        Ok(GameState {
            legal_actions: PokemonAction::ALL.to_vec(),
            observation: Observation::Screen(self.device.capture()),
            report: Some(summary.to_string()),
        })
    }

    fn prompt(&self, state: &GameState<PokemonAction>) -> String {
        let mut prompt =
            String::from("You are playing Pokemon Red. You are a Pokemon trainer.\n\n");
        if let Some(report) = &state.report {
            prompt.push_str("Current game state:\n");
            prompt.push_str(report);
            prompt.push_str("\n\n");
        }
        prompt.push_str(&format!(
            "You can choose to take any of the following actions: {}\n",
            describe(&state.legal_actions)
        ));
        prompt.push_str(&answer_instruction(PokemonAction::A));
        prompt
    }

    fn act(&mut self, action: PokemonAction) -> Result<Flow, EnvError> {
        Ok(self
            .executor
            .execute(&mut self.device, action, !self.headless)?)
    }
}

/// Prompt for a bare screenshot with a list of allowed buttons
pub fn screen_prompt(valid_actions: &[PokemonAction]) -> String {
    format!(
        "You are playing Pokemon Red. You can see the game screen and must choose the next action.\n\
         Valid actions are: {}\n\
         Based on what you see in the game screen, what single action should be taken next?\n\
         Respond with just one word - the action to take.",
        describe(valid_actions)
    )
}

use crate::geometry::Point;
use crate::imagery::{score, Raster, Rgb, RoundResult};
use crate::loader::LoadError;
use rand::Rng;

/// Where the session currently sits. Exactly one phase is active at a time;
/// every transition below names the phases it accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Loading,
    AwaitingSelection,
    Resolved,
    Ended,
}

/// Why an operation was ignored. Out-of-state calls are refused with a value
/// instead of silently doing nothing, so callers and tests can tell the
/// difference between "applied" and "dropped".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refusal {
    WrongState,
    OutOfBounds,
    NoSelection,
    StaleLoad,
}

/// The reference pixel the player hunts for. Captured once when a round's
/// image finishes loading, never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetPoint {
    pub color: Rgb,
    pub at: Point,
}

/// The player's current best guess. Overwritten freely until submission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub color: Rgb,
    pub at: Point,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionTotals {
    pub total_score: f64,
    pub completed_rounds: u32,
}

/// End-of-game standing, shown as `total/maxPossible`. With zero completed
/// rounds it renders `0.00/0` rather than dividing by anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinalTally {
    pub total_score: f64,
    pub completed_rounds: u32,
}

impl FinalTally {
    pub fn max_possible(&self) -> u32 {
        self.completed_rounds * 10
    }
}

impl std::fmt::Display for FinalTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{:.2}/{}", self.total_score, self.max_possible())
    }
}

/// Handed back by [`Game::start_round`]; the caller forwards it to the image
/// collaborator. Completions echo the generation so late arrivals from an
/// abandoned round can be told apart from the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
}

/// The round controller. Sole owner of all session state; the only way to
/// mutate it is through the transition methods below.
pub struct Game {
    phase: Phase,
    round: u32,
    generation: u64,
    raster: Option<Raster>,
    target: Option<TargetPoint>,
    selection: Option<Selection>,
    last_result: Option<RoundResult>,
    totals: SessionTotals,
    status: String,
}

impl Game {
    pub fn new() -> Self {
        Self {
            phase: Phase::NotStarted,
            round: 0,
            generation: 0,
            raster: None,
            target: None,
            selection: None,
            last_result: None,
            totals: SessionTotals::default(),
            status: "Press n to start a round.".into(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn totals(&self) -> SessionTotals {
        self.totals
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn last_result(&self) -> Option<RoundResult> {
        self.last_result
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// The target is only readable once the round is resolved; before that
    /// it must not reach the presentation layer.
    pub fn revealed_target(&self) -> Option<TargetPoint> {
        match self.phase {
            Phase::Resolved | Phase::Ended => self.target,
            _ => None,
        }
    }

    /// Begin the next round: valid from `NotStarted`, `Resolved`, or `Ended`.
    /// Starting over after an ended game resets the counter and totals.
    /// Returns the ticket to hand to the image collaborator.
    pub fn start_round(&mut self) -> Result<LoadTicket, Refusal> {
        match self.phase {
            Phase::NotStarted | Phase::Resolved => self.round += 1,
            Phase::Ended => {
                self.totals = SessionTotals::default();
                self.round = 1;
            }
            Phase::Loading | Phase::AwaitingSelection => return Err(Refusal::WrongState),
        }

        self.target = None;
        self.selection = None;
        self.last_result = None;
        self.generation += 1;
        self.phase = Phase::Loading;
        self.status = format!("Loading image for round {}...", self.round);

        Ok(LoadTicket {
            generation: self.generation,
        })
    }

    /// Completion callback for the load issued by [`Game::start_round`].
    /// Completions carrying a superseded generation are discarded.
    pub fn finish_load(
        &mut self,
        generation: u64,
        result: Result<Raster, LoadError>,
    ) -> Result<(), Refusal> {
        if generation != self.generation {
            return Err(Refusal::StaleLoad);
        }
        if self.phase != Phase::Loading {
            return Err(Refusal::WrongState);
        }

        match result {
            Ok(raster) => {
                let mut rng = rand::thread_rng();
                let at = Point::new(
                    rng.gen_range(0..raster.width()),
                    rng.gen_range(0..raster.height()),
                );
                self.target = Some(TargetPoint {
                    color: raster.sample(at),
                    at,
                });
                self.raster = Some(raster);
                self.phase = Phase::AwaitingSelection;
                self.status =
                    "Image loaded. Pick the pixel matching the target, then submit.".into();
            }
            Err(err) => {
                // Recoverable only through another "next round"; the round
                // counter stays where it is.
                self.phase = Phase::Resolved;
                self.status = format!("Could not load image: {}. Press n to try again.", err);
            }
        }

        Ok(())
    }

    /// Record the player's guess at `at`. Only valid while awaiting a
    /// selection; out-of-bounds coordinates leave the prior guess untouched.
    pub fn select_pixel(&mut self, at: Point) -> Result<Rgb, Refusal> {
        if self.phase != Phase::AwaitingSelection {
            return Err(Refusal::WrongState);
        }
        let Some(raster) = self.raster.as_ref() else {
            return Err(Refusal::WrongState);
        };
        if !raster.contains(at) {
            return Err(Refusal::OutOfBounds);
        }

        let color = raster.sample(at);
        self.selection = Some(Selection { color, at });
        self.status = "Selection updated. Pick again or submit.".into();
        Ok(color)
    }

    /// Resolve the round by scoring the current selection against the
    /// target. Totals advance exactly once; a second submit is refused.
    pub fn submit_round(&mut self) -> Result<RoundResult, Refusal> {
        if self.phase != Phase::AwaitingSelection {
            return Err(Refusal::WrongState);
        }
        let Some(selection) = self.selection else {
            return Err(Refusal::NoSelection);
        };
        let Some(target) = self.target else {
            return Err(Refusal::WrongState);
        };

        let result = score(selection.color, target.color);
        self.totals.total_score += result.score;
        self.totals.completed_rounds += 1;
        self.last_result = Some(result);
        self.phase = Phase::Resolved;
        self.status = format!(
            "Round complete. Your color similarity score is {:.2}/10.",
            result.score
        );
        Ok(result)
    }

    /// Close the session and report the cumulative standing. Valid from any
    /// phase except `Loading`, once a round has been started; after this
    /// only a fresh `start_round` is accepted.
    pub fn end_game(&mut self) -> Result<FinalTally, Refusal> {
        match self.phase {
            Phase::AwaitingSelection | Phase::Resolved => {}
            Phase::NotStarted | Phase::Loading | Phase::Ended => return Err(Refusal::WrongState),
        }

        let tally = FinalTally {
            total_score: self.totals.total_score,
            completed_rounds: self.totals.completed_rounds,
        };
        self.phase = Phase::Ended;
        self.status = format!("Game over. Final score: {}. Press n for a new game.", tally);
        Ok(tally)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

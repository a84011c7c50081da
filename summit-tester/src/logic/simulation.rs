//! Seeded stand-ins for the judgment provider and the player.
use serde_json::{Value, json};
use summit_game::numbers::round_f64_to_u32;
use summit_game::{
    GameSession, Label, MissionId, RandomSource, RouteKind, RoundOutcome, SeededSource, Weather,
};

const JUDGE_STREAM_TAG: &[u8] = b"summit-tester-judge";
const PLAYER_STREAM_TAG: &[u8] = b"summit-tester-player";

/// Everything one simulated game produced.
#[derive(Debug, Clone)]
pub struct SimulatedGame {
    pub seed: u64,
    pub weather: Option<Weather>,
    pub mission: Option<MissionId>,
    pub routes: Vec<RouteKind>,
    pub rounds: Vec<RoundOutcome>,
    pub session: GameSession<'static>,
}

/// Produces judgment payloads the way a loose provider might.
pub struct SeededJudge {
    rng: SeededSource,
}

impl SeededJudge {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SeededSource::from_user_seed(seed, JUDGE_STREAM_TAG),
        }
    }

    pub fn judgment(&mut self) -> Value {
        let score = self.rng.next_unit();
        let label_count = pick(&mut self.rng, 6);
        let labels: Vec<&str> = (0..label_count)
            .map(|_| Label::ALL[pick(&mut self.rng, Label::ALL.len())].as_str())
            .collect();
        json!({
            "mountScore": score,
            "labels": labels,
            "tip": "数字を入れてみよう",
            "commentary": "審査員がうなずいている"
        })
    }
}

/// Uniform index in `0..len`.
pub fn pick<R: RandomSource + ?Sized>(rng: &mut R, len: usize) -> usize {
    let len_f = f64::from(u32::try_from(len).unwrap_or(u32::MAX));
    let index = round_f64_to_u32((rng.next_unit() * len_f).floor());
    usize::try_from(index)
        .unwrap_or(0)
        .min(len.saturating_sub(1))
}

/// Pick the weather, mission and routes for a game from the player stream.
pub fn seeded_setup(seed: u64) -> (Option<Weather>, Option<MissionId>, Vec<RouteKind>) {
    let mut rng = SeededSource::from_user_seed(seed, PLAYER_STREAM_TAG);
    let weather = Weather::ALL.get(pick(&mut rng, Weather::ALL.len() + 1)).copied();
    let mission = MissionId::ALL
        .get(pick(&mut rng, MissionId::ALL.len() + 1))
        .copied();
    let routes = (0..summit_game::default_config().rounds_per_game)
        .map(|_| RouteKind::ALL[pick(&mut rng, RouteKind::ALL.len())])
        .collect();
    (weather, mission, routes)
}

/// Play a full default-length game for `seed`.
pub fn play_seeded_game(seed: u64) -> anyhow::Result<SimulatedGame> {
    let (weather, mission, routes) = seeded_setup(seed);
    play_game(seed, weather, mission, &routes)
}

/// Play one round per entry of `routes` with seeded judgments and fall rolls.
pub fn play_game(
    seed: u64,
    weather: Option<Weather>,
    mission: Option<MissionId>,
    routes: &[RouteKind],
) -> anyhow::Result<SimulatedGame> {
    let mut session = GameSession::new(weather, mission);
    let mut judge = SeededJudge::new(seed);
    let mut falls = SeededSource::for_falls(seed);
    let mut rounds = Vec::with_capacity(routes.len());
    for (index, &route) in routes.iter().enumerate() {
        let prompt = format!("round {}", index + 1);
        let outcome = session.play_round(
            &prompt,
            "毎日10km走っている",
            &judge.judgment(),
            route,
            &mut falls,
        )?;
        rounds.push(outcome);
    }
    Ok(SimulatedGame {
        seed,
        weather,
        mission,
        routes: routes.to_vec(),
        rounds,
        session,
    })
}

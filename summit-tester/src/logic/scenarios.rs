//! Scenario catalog: each scenario is a seeded check over the game core.
use anyhow::{Result, bail, ensure};
use std::collections::BTreeSet;

use summit_game::{
    AchievementStats, GameSession, MissionId, RandomSource, RouteKind, ScoreInput, SeededSource,
    StatsDelta, VersusResult, Weather, compose, default_config, newly_unlocked, record_stats,
    shape, unlocked_from,
};

use super::simulation::{SeededJudge, pick, play_game, play_seeded_game};

/// Inputs handed to a scenario check for one iteration.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx {
    pub seed: u64,
    pub verbose: bool,
}

pub type ScenarioCheck = fn(&ScenarioCtx) -> Result<()>;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub check: ScenarioCheck,
}

const CATALOG: [TestScenario; 6] = [
    TestScenario {
        key: "smoke",
        name: "Smoke Test",
        check: smoke,
    },
    TestScenario {
        key: "risky-fall-rate",
        name: "Risky Fall Rate",
        check: risky_fall_rate,
    },
    TestScenario {
        key: "insurance-rescue",
        name: "Insurance Rescue",
        check: insurance_rescue,
    },
    TestScenario {
        key: "route-caps",
        name: "Route Caps",
        check: route_caps,
    },
    TestScenario {
        key: "mission-progress",
        name: "Mission Progress",
        check: mission_progress,
    },
    TestScenario {
        key: "achievement-unlocks",
        name: "Achievement Unlocks",
        check: achievement_unlocks,
    },
];

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let key = key.to_lowercase();
    CATALOG.iter().find(|scenario| scenario.key == key).cloned()
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG
        .iter()
        .map(|scenario| (scenario.key, scenario.name))
        .collect()
}

pub fn scenario_keys() -> Vec<&'static str> {
    CATALOG.iter().map(|scenario| scenario.key).collect()
}

const FALL_TRIALS: u32 = 2_000;
const FALL_TOLERANCE: f64 = 0.05;

fn smoke(ctx: &ScenarioCtx) -> Result<()> {
    let game = play_seeded_game(ctx.seed)?;
    let cfg = default_config();
    ensure!(game.session.is_finished(), "game did not finish");
    ensure!(
        game.rounds.len() == cfg.rounds_per_game,
        "expected {} rounds, got {}",
        cfg.rounds_per_game,
        game.rounds.len()
    );

    let mut running = 0u32;
    for (outcome, route) in game.rounds.iter().zip(&game.routes) {
        let judged = &outcome.judgment;
        ensure!(
            judged.altitude <= cfg.ceilings.get(*route),
            "shaped altitude {} above {route} ceiling",
            judged.altitude
        );
        ensure!(
            judged.labels.len() <= cfg.max_labels,
            "{} labels survived validation",
            judged.labels.len()
        );
        if outcome.score.did_fall {
            ensure!(
                outcome.score.final_altitude == cfg.fall_altitude,
                "fall scored {}m",
                outcome.score.final_altitude
            );
        }
        running = running.saturating_add(outcome.score.final_altitude);
        ensure!(
            outcome.cumulative_altitude == running,
            "cumulative {} != {running}",
            outcome.cumulative_altitude
        );
    }
    ensure!(game.session.history().len() == game.rounds.len());
    if ctx.verbose {
        println!(
            "     seed {} weather {:?} mission {:?} routes {:?} -> {}m",
            game.seed,
            game.weather,
            game.mission,
            game.routes,
            game.session.total_altitude()
        );
    }
    Ok(())
}

fn risky_fall_rate(ctx: &ScenarioCtx) -> Result<()> {
    let mut rng = SeededSource::for_falls(ctx.seed);
    let mut falls = 0u32;
    for _ in 0..FALL_TRIALS {
        if compose(&ScoreInput::new(4_000, RouteKind::Risky), &mut rng).did_fall {
            falls += 1;
        }
    }
    let rate = f64::from(falls) / f64::from(FALL_TRIALS);
    let expected = default_config().fall_probability;
    ensure!(
        (rate - expected).abs() <= FALL_TOLERANCE,
        "fall rate {rate:.3} outside {expected} ± {FALL_TOLERANCE}"
    );
    Ok(())
}

fn insurance_rescue(ctx: &ScenarioCtx) -> Result<()> {
    let game = play_game(ctx.seed, None, None, &[RouteKind::Safe, RouteKind::Risky])?;
    ensure!(!game.rounds[1].score.did_fall, "insured RISKY round fell");

    // Forced fall: the SAFE round's unit must absorb it.
    let mut session = GameSession::new(None, None);
    let mut judge = SeededJudge::new(ctx.seed);
    session.play_round("safe", "t", &judge.judgment(), RouteKind::Safe, &mut || 0.9)?;
    let rescued =
        session.play_round("risky", "t", &judge.judgment(), RouteKind::Risky, &mut || 0.0)?;
    ensure!(rescued.score.insurance_used, "insurance not consumed");
    ensure!(!rescued.score.did_fall, "insurance did not absorb the fall");
    ensure!(session.insurance() == 0, "insurance left after rescue");
    Ok(())
}

fn route_caps(ctx: &ScenarioCtx) -> Result<()> {
    let cfg = default_config();
    let mut rng = SeededSource::from_user_seed(ctx.seed, b"summit-tester-caps");
    for _ in 0..200 {
        let route = [RouteKind::Safe, RouteKind::Normal][pick(&mut rng, 2)];
        let base = shape(rng.next_unit(), route);
        let bonus = cfg.diversity_tiers[pick(&mut rng, cfg.diversity_tiers.len())].bonus;
        let weather = Weather::ALL[pick(&mut rng, Weather::ALL.len())];
        let input = ScoreInput::new(base, route)
            .with_weather(weather, &[weather.boosted_label()])
            .with_bonus(bonus);
        let out = compose(&input, &mut || 0.0);
        if out.final_altitude > cfg.compose_cap {
            bail!(
                "{route} round reached {}m (base {base}, bonus {bonus}, {weather})",
                out.final_altitude
            );
        }
    }
    Ok(())
}

fn mission_progress(ctx: &ScenarioCtx) -> Result<()> {
    let routes = vec![RouteKind::Risky; default_config().rounds_per_game];
    for mission in MissionId::ALL {
        let game = play_game(ctx.seed, None, Some(mission), &routes)?;
        let progress = game.session.mission_progress();
        let ratio = progress.display_ratio();
        ensure!((0.0..=1.0).contains(&ratio), "{mission} ratio {ratio}");
        if let Some(raw) = progress.ratio {
            ensure!(raw <= 1.0, "{mission} raw ratio {raw} above 1");
            ensure!(
                progress.cleared == (raw >= 1.0),
                "{mission} cleared={} but ratio {raw}",
                progress.cleared
            );
        } else {
            bail!("{mission} reported no ratio");
        }
        if mission == MissionId::Total15000 {
            ensure!(
                progress.cleared == (f64::from(game.session.total_altitude()) >= mission.target()),
                "total mission disagrees with {}m",
                game.session.total_altitude()
            );
        }
    }
    Ok(())
}

fn achievement_unlocks(ctx: &ScenarioCtx) -> Result<()> {
    let mut stats = AchievementStats::default();
    let mut unlocked = unlocked_from(&stats);
    let mut streak = 0;
    for game_index in 0..5u64 {
        let seed = ctx.seed.wrapping_mul(31).wrapping_add(game_index);
        let solo = play_seeded_game(seed)?;
        let before: BTreeSet<_> = unlocked.clone();
        let report = record_stats(
            &stats,
            &StatsDelta::after_solo_game(&stats, &solo.session.summary()),
            &unlocked,
        );
        stats = report.stats;
        unlocked.extend(report.newly_unlocked.iter().copied());
        ensure!(before.is_subset(&unlocked), "unlock set shrank");
        ensure!(
            unlocked == unlocked_from(&stats),
            "tracked unlocks drifted from recomputed set"
        );

        let rival = play_seeded_game(seed ^ 0xA5A5)?;
        let result = VersusResult::decide(
            solo.session.total_altitude(),
            rival.session.total_altitude(),
            streak,
        );
        streak = result.streak;
        let report = record_stats(
            &stats,
            &StatsDelta::after_versus_game(&stats, &result),
            &unlocked,
        );
        stats = report.stats;
        unlocked.extend(report.newly_unlocked.iter().copied());
        ensure!(newly_unlocked(&unlocked, &stats).is_empty());
    }
    ensure!(stats.solo_plays == 5, "solo plays {}", stats.solo_plays);
    ensure!(stats.versus_plays == 5, "versus plays {}", stats.versus_plays);
    if ctx.verbose {
        let ids: Vec<_> = unlocked.iter().map(ToString::to_string).collect();
        println!("     unlocked: {}", ids.join(", "));
    }
    Ok(())
}

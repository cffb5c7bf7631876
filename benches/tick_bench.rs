use criterion::{black_box, criterion_group, criterion_main, Criterion};
use forge_commander::commander::Commander;
use forge_commander::core::config::{AttackStrategy, CommanderConfig};
use forge_commander::sandbox::{default_services, SandboxWorld};
use forge_commander::world::GameEvent;

/// A mid-game snapshot from a sandbox match
fn mid_game() -> (SandboxWorld, Commander) {
    let config = CommanderConfig::default();
    let mut world = SandboxWorld::new(config.seed);
    let mut commander =
        Commander::new(config, default_services(world.expansion_sites())).expect("default config is valid");
    for _ in 0..8_000 {
        world.advance(&mut commander);
    }
    (world, commander)
}

fn bench_full_cadence_tick(c: &mut Criterion) {
    let (world, _) = mid_game();
    let snapshot = world.snapshot();
    let events: Vec<GameEvent> = snapshot
        .own()
        .map(|e| GameEvent::UnitIdle(e.id))
        .collect();

    // Every stage runs on every tick
    let mut config = CommanderConfig::default();
    config.cadence.economy = 1;
    config.cadence.construction = 1;
    config.cadence.rally = 1;
    config.cadence.scouting = 1;
    config.cadence.attack = 1;
    config.attack.strategy = AttackStrategy::Both;
    let mut commander =
        Commander::new(config, default_services(world.expansion_sites())).expect("bench config is valid");

    c.bench_function("commander/tick(all stages)", |b| {
        b.iter(|| {
            let commands = commander.tick(black_box(&snapshot), black_box(&events));
            black_box(commands.len());
        })
    });
}

fn bench_sandbox_advance(c: &mut Criterion) {
    let (mut world, mut commander) = mid_game();
    c.bench_function("sandbox/advance", |b| {
        b.iter(|| {
            black_box(world.advance(&mut commander).len());
        })
    });
}

criterion_group!(benches, bench_full_cadence_tick, bench_sandbox_advance);
criterion_main!(benches);

use elastic_collision::core::SimulationConfig;
use elastic_collision::{PhysicsWorld, Vector2};
use std::io::{stdout, Write};
use std::thread::sleep;
use std::time::{Duration, Instant};
use crossterm::{
    ExecutableCommand, QueueableCommand,
    terminal::{Clear, ClearType, size},
    cursor::{Hide, Show, MoveTo},
    style::{Color, Print, SetForegroundColor, ResetColor},
};
use tracing_subscriber::EnvFilter;

const FRAME_DURATION: Duration = Duration::from_millis(33); // ~30 FPS
const SIMULATION_DURATION: f64 = 20.0; // seconds
const NUM_BALLS: usize = 12;
const BALL_SIZE: f64 = 24.0;
const BALL_COLORS: [Color; 5] = [
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::Magenta,
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they do not fight with the drawing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = stdout();
    let (columns, rows) = size()?;
    let rows = rows.saturating_sub(1).max(1);

    // Ten arena units per column and twenty per row
    let mut config = SimulationConfig::default();
    config.arena.width = columns as f64 * 10.0;
    config.arena.height = rows as f64 * 20.0;
    config.fragmentation.impact_speed = Some(18.0);
    config.deformation.on_collision = true;
    let mut world = PhysicsWorld::with_config(config)?;

    for i in 0..NUM_BALLS {
        // the lightest balls are indivisible
        let mass = 0.5 + (i % 4) as f64;
        world.spawn_random_body(Vector2::new(BALL_SIZE, BALL_SIZE), mass, 8.0)?;
    }

    stdout.execute(Hide)?;
    stdout.execute(Clear(ClearType::All))?;

    let start_time = Instant::now();
    let mut last_update_time = Instant::now();
    while start_time.elapsed().as_secs_f64() < SIMULATION_DURATION {
        let dt = last_update_time.elapsed().as_secs_f64();
        last_update_time = Instant::now();
        let collisions = world.tick(dt);

        stdout.queue(Clear(ClearType::All))?;
        for (n, (_, body)) in world.bodies().enumerate() {
            let center = body.center();
            let x = (center.x / 10.0).floor() as u16;
            let y = (center.y / 20.0).floor() as u16;
            if x >= columns || y >= rows {
                continue;
            }
            let glyph = if body.size().x < BALL_SIZE { '.' } else if body.deformation().x < 1.0 { 'o' } else { 'O' };
            stdout
                .queue(MoveTo(x, y))?
                .queue(SetForegroundColor(BALL_COLORS[n % BALL_COLORS.len()]))?
                .queue(Print(glyph))?;
        }
        stdout
            .queue(MoveTo(0, rows))?
            .queue(ResetColor)?
            .queue(Print(format!(
                "t={:5.1}s bodies={:3} collisions={:2}",
                world.time(),
                world.body_count(),
                collisions.len()
            )))?;
        stdout.flush()?;

        sleep(FRAME_DURATION);
    }

    stdout.execute(Show)?;
    stdout.execute(ResetColor)?;
    println!();
    Ok(())
}

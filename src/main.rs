use arboard::Clipboard;
use macroquad::prelude::*;
use plaguedoctor::event_log::EventLog;
use plaguedoctor::lobby::Lobby;
use plaguedoctor::save_state::SaveState;
use plaguedoctor::session::FixedStepper;
use plaguedoctor::{Config, Grid, Level, PlayerId, PlayerInput, Result, Session, Vec2 as WorldVec};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

const SANDBOX_LAYOUT: &str = "\
########################
#......#...............#
#......#.......###.....#
#..............#.......#
#......#.......#.......#
####.###.......#.......#
#..........#...........#
#..........#....####...#
#..........#...........#
#...####...............#
#.........#....#.......#
#.........#....#.......#
#..............#.......#
#.........#............#
#.........#............#
########################
";

const SNAPSHOT_PATH: &str = "session_snapshot.json";

/// The sandbox sits below the world x axis so that the default spawn
/// rectangle around (12, -12) lands on its floor.
fn sandbox_level() -> Result<Level> {
    let grid = Grid::from_ascii(SANDBOX_LAYOUT)?;
    let origin = WorldVec::new(0.0, -(grid.rows as f32));
    Ok(Level::new(grid, origin, 1.0))
}

/// Build a session with patients, the local doctor and one infected wanderer
fn setup_session(config: Config) -> Result<(Session, PlayerId, PlayerId)> {
    let patient_count = config.patient.count;
    let mut session = Session::new(config, sandbox_level()?)?;
    session.scatter_patients(patient_count)?;

    let local = session.add_player(true);
    let carrier = session.add_player_at(WorldVec::new(4.5, -8.5));
    session.player_mut(carrier)?.infection.infect();
    Ok((session, local, carrier))
}

/// Screen mapping for the level: world y grows up, screen y grows down
struct View {
    origin: WorldVec,
    height: f32,
    scale: f32,
}

impl View {
    fn fit(level: &Level) -> Self {
        let cols = level.grid.cols.max(1) as f32 * level.cell_size;
        let rows = level.grid.rows.max(1) as f32 * level.cell_size;
        let scale = (screen_width() / cols).min((screen_height() - 120.0) / rows);
        View {
            origin: level.origin,
            height: rows * scale,
            scale,
        }
    }

    fn to_screen(&self, p: WorldVec) -> Vec2 {
        vec2((p.x - self.origin.x) * self.scale, self.height - (p.y - self.origin.y) * self.scale)
    }

    fn to_world(&self, x: f32, y: f32) -> WorldVec {
        WorldVec::new(x / self.scale + self.origin.x, (self.height - y) / self.scale + self.origin.y)
    }
}

fn local_input(view: &View) -> PlayerInput {
    let mut axis = WorldVec::ZERO;
    if is_key_down(KeyCode::A) || is_key_down(KeyCode::Left) {
        axis.x -= 1.0;
    }
    if is_key_down(KeyCode::D) || is_key_down(KeyCode::Right) {
        axis.x += 1.0;
    }
    if is_key_down(KeyCode::S) || is_key_down(KeyCode::Down) {
        axis.y -= 1.0;
    }
    if is_key_down(KeyCode::W) || is_key_down(KeyCode::Up) {
        axis.y += 1.0;
    }
    let (mouse_x, mouse_y) = mouse_position();

    PlayerInput {
        axis,
        aim: Some(view.to_world(mouse_x, mouse_y)),
        treat_pressed: is_key_pressed(KeyCode::E),
    }
}

/// The carrier paces left and right along its row
fn carrier_input(session: &Session, carrier: PlayerId) -> PlayerInput {
    let direction = if (session.time / 4.0) as u32 % 2 == 0 { 1.0 } else { -1.0 };
    let position = session.player(carrier).map(|p| p.position).unwrap_or_default();
    PlayerInput {
        axis: WorldVec::new(direction * 0.15, 0.0),
        aim: Some(position + WorldVec::new(direction, 0.0)),
        treat_pressed: false,
    }
}

fn copy_snapshot_to_clipboard(session: &Session) {
    let json = match SaveState::from_session(session).to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize session: {}", e);
            return;
        }
    };
    match Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(json) {
                tracing::warn!("Failed to copy to clipboard: {}", e);
            } else {
                tracing::info!("Session snapshot copied to clipboard");
                // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
        }
        Err(e) => tracing::warn!("Failed to access clipboard: {}", e),
    }
}

fn draw_session(session: &Session, view: &View, lobby: &Lobby, local: PlayerId) {
    clear_background(Color::from_rgba(30, 30, 30, 255));

    let level = &session.level;
    let cell = level.cell_size * view.scale;
    for y in 0..level.grid.rows {
        for x in 0..level.grid.cols {
            if level.grid.is_blocked(x, y) {
                // cell_origin is the bottom-left corner; screen rects grow down
                let top_left = view.to_screen(level.cell_origin(x, y + 1));
                draw_rectangle(top_left.x, top_left.y, cell, cell, Color::from_rgba(90, 70, 60, 255));
            }
        }
    }

    for player in &session.players {
        let radius_colour = Color::new(0.9, 0.9, 0.6, 0.12);
        for [a, b, c] in player.viewer.radius_mesh.triangles() {
            draw_triangle(view.to_screen(a), view.to_screen(b), view.to_screen(c), radius_colour);
        }
        let cone_colour = Color::new(1.0, 1.0, 0.7, 0.25);
        for [a, b, c] in player.viewer.cone_mesh.triangles() {
            draw_triangle(view.to_screen(a), view.to_screen(b), view.to_screen(c), cone_colour);
        }
    }

    for patient in &session.patients {
        let p = view.to_screen(patient.position);
        let colour = if patient.treated { GRAY } else { Color::from_rgba(200, 170, 120, 255) };
        draw_circle(p.x, p.y, cell * 0.35, colour);
        if let Some(name) = patient.displayed_symptom().and_then(|id| session.disease.catalog.name(id)) {
            draw_text(name, p.x - cell * 0.5, p.y - cell * 0.5, 16.0, WHITE);
        }
    }

    for player in &session.players {
        let p = view.to_screen(player.position);
        let (r, g, b) = player.colour.rgb();
        draw_circle(p.x, p.y, cell * 0.4, Color::new(r, g, b, 1.0));
        if player.is_infected() {
            draw_circle_lines(p.x, p.y, cell * 0.5, 2.0, GREEN);
        }
        let nose = view.to_screen(player.position + player.facing() * 0.6);
        draw_line(p.x, p.y, nose.x, nose.y, 2.0, BLACK);
    }

    let mut hud_y = view.height + 20.0;
    if let Ok(player) = session.player(local) {
        let status = if player.is_infected() {
            "INFECTED".to_string()
        } else {
            format!("healthy (exposure {:.1}s)", player.infection.elapsed)
        };
        let treating = match &player.treatment {
            Some(t) => format!("treating patient {} ({:.1}s)", t.target.0, t.elapsed),
            None => "not treating".to_string(),
        };
        draw_text(&format!("You: {} | {}", status, treating), 10.0, hud_y, 20.0, WHITE);
        hud_y += 20.0;
    }
    draw_text(
        "WASD: move  Mouse: look  E: treat  R: restart  C: copy snapshot  F5: save snapshot  Esc: quit",
        10.0,
        hud_y,
        18.0,
        LIGHTGRAY,
    );
    hud_y += 20.0;
    for notice in lobby.feed.visible() {
        draw_text(notice, 10.0, hud_y, 16.0, YELLOW);
        hud_y += 16.0;
    }
}

/// Run without input for `seconds` of simulated time and print the summary
fn run_headless(config: Config, seconds: f32) -> Result<()> {
    let step = config.session.fixed_timestep;
    let (mut session, _local, carrier) = setup_session(config)?;
    let mut log = EventLog::new();

    while session.time < seconds {
        let mut inputs = HashMap::new();
        inputs.insert(carrier, carrier_input(&session, carrier));
        let events = session.advance_physics(step, &inputs);
        log.record(session.time, &events);
        session.render_tick(step);
    }

    println!("{}", log.summary());
    Ok(())
}

fn save_event_log(config: &Config, log: &EventLog) {
    if !config.logging.enable_event_log {
        return;
    }
    match log.save_to_file(&config.logging.event_log_path) {
        Ok(()) => tracing::info!("Event log saved to {}", config.logging.event_log_path),
        Err(e) => tracing::error!("Failed to save event log: {}", e),
    }
}

#[macroquad::main("PlagueDoctor")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("plaguedoctor=info")))
        .init();

    let config = Config::load();
    if let Err(e) = config.validate() {
        tracing::error!("Refusing to start: {}", e);
        return;
    }

    // Check command line arguments
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--headless" {
        let seconds = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(30.0);
        if let Err(e) = run_headless(config, seconds) {
            tracing::error!("Headless run failed: {}", e);
        }
        return;
    }

    let mut lobby = Lobby::new();
    if let Err(e) = lobby.start_server(&config.session.scene) {
        tracing::error!("Failed to start server: {}", e);
        return;
    }

    let (mut session, local, carrier) = match setup_session(config.clone()) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::error!("Failed to set up session: {}", e);
            return;
        }
    };
    lobby.connected();
    lobby.connected();

    let mut stepper = FixedStepper::new(config.session.fixed_timestep);
    let mut log = EventLog::new();

    loop {
        let view = View::fit(&session.level);
        let frame_dt = get_frame_time();

        let mut local_frame_input = local_input(&view);
        for _ in 0..stepper.steps_for(frame_dt) {
            let mut inputs = HashMap::new();
            inputs.insert(local, local_frame_input);
            inputs.insert(carrier, carrier_input(&session, carrier));
            let events = session.advance_physics(stepper.step, &inputs);
            log.record(session.time, &events);
            // key-down counts once per frame, not once per physics step
            local_frame_input.treat_pressed = false;
        }
        session.render_tick(frame_dt);

        if is_key_pressed(KeyCode::R) {
            if let Err(e) = session.restart() {
                tracing::error!("Restart failed: {}", e);
            }
        }
        if is_key_pressed(KeyCode::C) {
            copy_snapshot_to_clipboard(&session);
        }
        if is_key_pressed(KeyCode::F5) {
            match SaveState::from_session(&session).save_to_file(SNAPSHOT_PATH) {
                Ok(()) => tracing::info!("Session saved to {}", SNAPSHOT_PATH),
                Err(e) => tracing::error!("Failed to save session: {}", e),
            }
        }
        if is_key_pressed(KeyCode::Escape) {
            lobby.disconnected();
            break;
        }

        draw_session(&session, &view, &lobby, local);
        next_frame().await
    }

    println!("{}", log.summary());
    save_event_log(&config, &log);
}

//! REPL – Read-Eval-Print Loop driving one HawkEye engine.
//!
//! All coordinates are robot-relative; poses are relative to the global
//! origin.
//!
//! Supported slash-commands:
//!   /help                                  – show this list
//!   /point x y tag                         – mark one cell
//!   /line x0 y0 x1 y1 tag                  – draw a line
//!   /rect x0 y0 x1 y1 tag [fill]           – draw a rectangle
//!   /circle x y radius degrees tag [fill]  – draw an arc
//!   /move x y degrees                      – commit and move the robot
//!   /save                                  – commit the local map
//!   /smooth factor                         – decay observations in the local map
//!   /show local|global                     – print a map
//!   /status                                – map sizes and pose
//!   /events                                – engine events since last call
//!   /quit | /exit                          – exit the CLI

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::str::SplitWhitespace;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hawkeye_mapping::HawkEye;
use hawkeye_mapping::render::{AsciiRenderer, MapRenderer};
use hawkeye_mapping::report::RecordingReporter;
use hawkeye_mapping::smoothing::ObservationDecay;
use hawkeye_types::{CartCoord, MapError, MapEventPayload, MapObject, Pose};

use crate::config::Config;

/// One engine plus the bits of CLI state the commands need.
pub struct Session {
    engine: HawkEye,
    events: Arc<RecordingReporter>,
    renderer: AsciiRenderer,
}

impl Session {
    pub fn new(cfg: &Config) -> Result<Self, MapError> {
        let events = Arc::new(RecordingReporter::new());
        let engine = HawkEye::with_reporter(
            &cfg.map,
            &MapObject::new(cfg.base_state.clone()),
            Box::new(Arc::clone(&events)),
        )?;
        Ok(Self {
            engine,
            events,
            renderer: AsciiRenderer::new(cfg.empty_glyph),
        })
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run(mut session: Session, shutdown: Arc<AtomicBool>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "hawkeye>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        match execute(&mut session, &line) {
            Ok(Reply::Text(text)) => println!("{text}"),
            Ok(Reply::Quit) => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            Err(e) => println!(
                "{} {}. Type {} for available commands.",
                "Error:".red(),
                e,
                "/help".bold()
            ),
        }
    }
}

/// Parse and run one command line against `session`.
pub fn execute(session: &mut Session, line: &str) -> Result<Reply, String> {
    let mut args = line.split_whitespace();
    let Some(cmd) = args.next() else {
        return Ok(Reply::Text(String::new()));
    };
    let engine = &mut session.engine;

    let reply = match cmd {
        "/help" => help_text(),
        "/point" => {
            let p = coord(&mut args)?;
            let cell = MapObject::new(tag(&mut args)?);
            engine.cast_point(p, &cell);
            format!("point {p} = {cell}")
        }
        "/line" => {
            let (start, end) = (coord(&mut args)?, coord(&mut args)?);
            let cell = MapObject::new(tag(&mut args)?);
            engine.cast_line(start, &cell, end, &cell, &cell);
            format!("line {start} -> {end} = {cell}")
        }
        "/rect" => {
            let (tl, br) = (coord(&mut args)?, coord(&mut args)?);
            let cell = MapObject::new(tag(&mut args)?);
            let fill = fill_flag(&mut args)?;
            engine.cast_rect(tl, br, &cell, fill);
            format!("rect {tl} .. {br} = {cell}{}", if fill { " (filled)" } else { "" })
        }
        "/circle" => {
            let center = coord(&mut args)?;
            let radius = int(args.next(), "radius")?;
            let degrees = int(args.next(), "degrees")?;
            let cell = MapObject::new(tag(&mut args)?);
            let fill = fill_flag(&mut args)?;
            engine.cast_circle(center, radius, degrees, &cell, fill);
            format!("arc {degrees}° r={radius} around {center} = {cell}")
        }
        "/move" => {
            let p = coord(&mut args)?;
            let degrees = float(args.next(), "degrees")?;
            engine
                .update_location(Pose::new(p, degrees.to_radians()))
                .map_err(|e| e.to_string())?;
            format!("moved to {p} heading {degrees}°")
        }
        "/save" => {
            let n = engine.save_to_global().map_err(|e| e.to_string())?;
            format!("{n} cells written to the global map")
        }
        "/smooth" => {
            let factor = float(args.next(), "factor")?;
            if !(0.0..=1.0).contains(&factor) {
                return Err(format!("factor must be within [0, 1], got {factor}"));
            }
            engine
                .smooth(&ObservationDecay::new(factor))
                .map_err(|e| e.to_string())?;
            format!("local map smoothed (decay {factor})")
        }
        "/show" => {
            let frame = match args.next() {
                Some("local") | None => engine.local_map(),
                Some("global") => engine.global_map(),
                Some(other) => return Err(format!("unknown map '{other}', use local or global")),
            };
            session.renderer.render(frame.cells())
        }
        "/status" => status_text(engine),
        "/events" => {
            let events = session.events.drain();
            if events.is_empty() {
                "no events".to_string()
            } else {
                events
                    .iter()
                    .map(|e| format!("{} {}", e.timestamp.format("%H:%M:%S%.3f"), describe(&e.payload)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        "/quit" | "/exit" => return Ok(Reply::Quit),
        other => return Err(format!("Unknown command '{other}'")),
    };
    Ok(Reply::Text(reply))
}

// ─────────────────────────────────────────────────────────────────────────────
// Output helpers
// ─────────────────────────────────────────────────────────────────────────────

fn help_text() -> String {
    [
        "HawkEye Commands",
        "  /point x y tag                         – mark one cell",
        "  /line x0 y0 x1 y1 tag                  – draw a line",
        "  /rect x0 y0 x1 y1 tag [fill]           – draw a rectangle",
        "  /circle x y radius degrees tag [fill]  – draw an arc",
        "  /move x y degrees                      – commit and move the robot",
        "  /save                                  – commit the local map",
        "  /smooth factor                         – decay local observations",
        "  /show local|global                     – print a map",
        "  /status                                – map sizes and pose",
        "  /events                                – engine events since last call",
        "  /quit  /exit                           – exit the CLI",
    ]
    .join("\n")
}

fn status_text(engine: &HawkEye) -> String {
    let pose = engine.pose();
    format!(
        "global map : {}x{}\nlocal map  : {}x{} ({})\npose       : {} heading {}°",
        engine.global_map_width(),
        engine.global_map_height(),
        engine.local_map_width(),
        engine.local_map_height(),
        engine.local_map().id(),
        pose.position,
        pose.orientation.to_degrees().round(),
    )
}

fn describe(payload: &MapEventPayload) -> String {
    match payload {
        MapEventPayload::LocationUpdated { pose, .. } => format!("location updated to {pose}"),
        MapEventPayload::Synchronized { cells_written } => {
            format!("synchronized {cells_written} cells")
        }
        MapEventPayload::Smoothed { .. } => "local map smoothed".to_string(),
        MapEventPayload::Status(message) => message.clone(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument parsing
// ─────────────────────────────────────────────────────────────────────────────

fn int(arg: Option<&str>, name: &str) -> Result<i32, String> {
    let raw = arg.ok_or_else(|| format!("missing {name}"))?;
    raw.parse()
        .map_err(|_| format!("{name} must be an integer, got '{raw}'"))
}

fn float(arg: Option<&str>, name: &str) -> Result<f64, String> {
    let raw = arg.ok_or_else(|| format!("missing {name}"))?;
    raw.parse()
        .map_err(|_| format!("{name} must be a number, got '{raw}'"))
}

fn coord(args: &mut SplitWhitespace<'_>) -> Result<CartCoord, String> {
    Ok(CartCoord::new(int(args.next(), "x")?, int(args.next(), "y")?))
}

fn tag<'a>(args: &mut SplitWhitespace<'a>) -> Result<&'a str, String> {
    args.next().ok_or_else(|| "missing tag".to_string())
}

fn fill_flag(args: &mut SplitWhitespace<'_>) -> Result<bool, String> {
    match args.next() {
        None => Ok(false),
        Some("fill") => Ok(true),
        Some(other) => Err(format!("expected 'fill', got '{other}'")),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hawkeye_mapping::MapConfig;

    fn session() -> Session {
        let cfg = Config {
            base_state: ".".to_string(),
            empty_glyph: '?',
            map: MapConfig {
                global_width: 20,
                global_height: 20,
                global_origin: CartCoord::new(10, 10),
                local_width: 5,
                local_height: 5,
                local_origin: CartCoord::new(2, 2),
                ..MapConfig::default()
            },
        };
        Session::new(&cfg).expect("session")
    }

    fn text(reply: Result<Reply, String>) -> String {
        match reply {
            Ok(Reply::Text(t)) => t,
            other => panic!("expected text reply, got {other:?}"),
        }
    }

    // ── Casting ─────────────────────────────────────────────────────────────

    #[test]
    fn point_then_show_local() {
        let mut s = session();
        text(execute(&mut s, "/point 0 1 X"));
        let map = text(execute(&mut s, "/show local"));
        assert_eq!(map, ".....\n..X..\n.....\n.....\n.....\n");
    }

    #[test]
    fn rect_fill_flag_is_parsed() {
        let mut s = session();
        let reply = text(execute(&mut s, "/rect -2 -2 1 1 # fill"));
        assert!(reply.ends_with("(filled)"));
        assert_eq!(
            s.engine.local_map().get(2, 2).map(MapObject::state),
            Some("#")
        );
        assert!(execute(&mut s, "/rect 0 0 1 1 # solid").is_err());
    }

    #[test]
    fn circle_and_line_commands_draw() {
        let mut s = session();
        text(execute(&mut s, "/circle 0 0 2 360 o"));
        text(execute(&mut s, "/line -2 -2 2 -2 ="));
        let local = s.engine.local_map();
        assert_eq!(local.get(4, 2).map(MapObject::state), Some("o"));
        assert_eq!(local.get(3, 0).map(MapObject::state), Some("="));
    }

    // ── Moving & syncing ────────────────────────────────────────────────────

    #[test]
    fn move_commits_and_reports_pose() {
        let mut s = session();
        text(execute(&mut s, "/point 0 0 A"));
        let reply = text(execute(&mut s, "/move 3 -2 90"));
        assert!(reply.contains("(3,-2)"));
        assert_eq!(
            s.engine.global_map().get(10, 10).map(MapObject::state),
            Some("A")
        );
        let status = text(execute(&mut s, "/status"));
        assert!(status.contains("global map : 20x20"));
        assert!(status.contains("(3,-2) heading 90°"), "{status}");
    }

    #[test]
    fn save_reports_cells_written() {
        let mut s = session();
        assert_eq!(
            text(execute(&mut s, "/save")),
            "25 cells written to the global map"
        );
    }

    #[test]
    fn events_are_drained() {
        let mut s = session();
        text(execute(&mut s, "/save"));
        text(execute(&mut s, "/smooth 0.5"));
        let events = text(execute(&mut s, "/events"));
        assert!(events.contains("synchronized 25 cells"));
        assert!(events.contains("local map smoothed"));
        assert_eq!(text(execute(&mut s, "/events")), "no events");
    }

    #[test]
    fn show_global_uses_empty_glyph_only_for_unset() {
        let mut s = session();
        let map = text(execute(&mut s, "/show global"));
        assert_eq!(map.lines().count(), 20);
        assert!(!map.contains('?'));
    }

    #[test]
    fn extreme_arguments_are_accepted() {
        let mut s = session();
        for cmd in [
            "/point 2147483647 0 X",
            "/line -2147483648 0 2147483647 0 X",
            "/rect -2147483648 -2147483648 2147483647 2147483647 X fill",
            "/circle 0 0 2147483647 -2147483648 X fill",
            "/move 2147483647 -2147483648 0",
        ] {
            text(execute(&mut s, cmd));
        }
        assert!(execute(&mut s, "/point 2147483648 0 X").is_err());
    }

    // ── Errors ──────────────────────────────────────────────────────────────

    #[test]
    fn bad_arguments_are_reported() {
        let mut s = session();
        assert_eq!(execute(&mut s, "/point 1").unwrap_err(), "missing y");
        assert_eq!(
            execute(&mut s, "/point a 1 X").unwrap_err(),
            "x must be an integer, got 'a'"
        );
        assert_eq!(execute(&mut s, "/line 0 0 1 1").unwrap_err(), "missing tag");
        assert!(execute(&mut s, "/smooth 2").is_err());
        assert!(execute(&mut s, "/show sideways").is_err());
    }

    #[test]
    fn unknown_command_is_an_error() {
        let mut s = session();
        assert_eq!(
            execute(&mut s, "/fly").unwrap_err(),
            "Unknown command '/fly'"
        );
    }

    #[test]
    fn quit_and_exit_end_the_loop() {
        let mut s = session();
        assert_eq!(execute(&mut s, "/quit"), Ok(Reply::Quit));
        assert_eq!(execute(&mut s, "  /exit  "), Ok(Reply::Quit));
    }

    #[test]
    fn help_lists_every_command() {
        let mut s = session();
        let help = text(execute(&mut s, "/help"));
        for cmd in ["/point", "/line", "/rect", "/circle", "/move", "/save", "/smooth", "/show", "/status", "/events", "/quit"] {
            assert!(help.contains(cmd), "missing {cmd}");
        }
    }
}

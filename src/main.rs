// Copyright (c) 2026 rezky_nightky

mod animator;
mod cell;
mod cloud;
mod color;
mod config;
mod error;
mod field;
mod frame;
mod host;
mod rain;
mod raster;
mod runtime;
mod sun;
mod surface;
mod terminal;

use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::animator::Animator;
use crate::config::{
    color_enabled_stdout, color_mode_label, default_params_usage_for_help, print_list_variants,
    Args, ColorEnv, Settings,
};
use crate::frame::{Frame, Presentation};
use crate::host::TerminalHost;
use crate::raster::Raster;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn install_signal_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            log::warn!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

#[derive(Default)]
struct PerfStats {
    frames: u64,
    work_sum_s: f64,
    work_max_s: f64,
    late_frames: u64,
}

impl PerfStats {
    fn record(&mut self, work: Duration, period: Duration) {
        let s = work.as_secs_f64();
        self.frames = self.frames.saturating_add(1);
        self.work_sum_s += s;
        self.work_max_s = self.work_max_s.max(s);
        if work > period {
            self.late_frames = self.late_frames.saturating_add(1);
        }
    }

    fn print(&self, elapsed: Duration, target_fps: f64) {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1) as f64;
        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", self.frames as f64 / elapsed_s);
        println!("  frames: {}", self.frames);
        println!("  avg_work_ms: {:.3}", self.work_sum_s / frames * 1000.0);
        println!("  max_work_ms: {:.3}", self.work_max_s * 1000.0);
        println!(
            "  late_frames: {} ({:.1}%)",
            self.late_frames,
            self.late_frames as f64 / frames * 100.0
        );
    }
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    install_signal_handlers();

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    cmd = cmd.help_template(if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    });
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_variants {
        print_list_variants();
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        let sha = env!("SKYFIELD_GIT_SHA");
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        if sha.is_empty() {
            println!("Build: {}", env!("SKYFIELD_BUILD"));
        } else {
            println!("Build: {} ({})", env!("SKYFIELD_BUILD"), sha);
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let color_env = ColorEnv::from_process();
    let settings = match Settings::from_args(&args, &color_env) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if args.check_bitcolor {
        let show = |v: &str| if v.is_empty() { "(unset)".to_string() } else { v.to_string() };
        println!("BITCOLOR CHECK:");
        println!("  COLORTERM: {}", show(&color_env.colorterm));
        println!("  TERM: {}", show(&color_env.term));
        println!("  auto_detected: {}", color_mode_label(color_env.detect()));
        if args.colormode.is_some() {
            println!("  forced: {}", color_mode_label(settings.color_mode));
        }
        println!("  effective: {}", color_mode_label(settings.color_mode));
        return Ok(());
    }

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let look = Presentation {
        mode: settings.color_mode,
        backdrop: settings.backdrop,
    };

    let mut host = TerminalHost::new(Terminal::new()?, settings.scale, settings.fps)?;
    let mut animator: Animator<Raster> = Animator::new(settings.variant, rng);
    let mut frame = Frame::new(0, 0, look.blank());

    if !animator.activate(&mut host) {
        host.blank(&mut frame, &look)?;
    }

    let start_time = Instant::now();
    let end_time = settings
        .duration_s
        .map(|s| start_time + Duration::from_secs_f64(s));
    let idle_poll = Duration::from_millis(250);
    let mut perf = PerfStats::default();
    let mut running = true;
    let mut paused = false;

    while running {
        let now = Instant::now();
        if end_time.is_some_and(|end| now >= end) {
            break;
        }

        let mut timeout = match host.clock().deadline() {
            Some(at) if !paused => at.saturating_duration_since(now),
            _ => idle_poll,
        };
        if let Some(end) = end_time {
            timeout = timeout.min(end.saturating_duration_since(now));
        }

        if Terminal::poll_event(timeout)? {
            match Terminal::read_event()? {
                Event::Resize(cols, rows) => {
                    if let Some(viewport) = host.terminal_resized(cols, rows) {
                        animator.resize(viewport);
                        frame.mark_all_dirty();
                    }
                }
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    if args.screensaver {
                        running = false;
                        continue;
                    }
                    match k.code {
                        KeyCode::Esc | KeyCode::Char('q') => running = false,
                        KeyCode::Char('p') => paused = !paused,
                        KeyCode::Char(' ') => {
                            animator.deactivate(&mut host);
                            if !animator.activate(&mut host) {
                                host.blank(&mut frame, &look)?;
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
            continue;
        }

        if paused || host.take_due(Instant::now()).is_none() {
            continue;
        }

        let work_start = Instant::now();
        if animator.on_frame(&mut host) {
            if let Some(raster) = animator.surface() {
                host.present(raster, &mut frame, &look)?;
            }
        }
        if args.perf_stats {
            perf.record(work_start.elapsed(), host.clock().period());
        }
    }

    log::info!("{} frames rendered", animator.frames());
    animator.deactivate(&mut host);
    drop(host);

    if args.perf_stats {
        perf.print(start_time.elapsed(), settings.fps);
    }

    Ok(())
}

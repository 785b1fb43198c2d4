use std::{
    io,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use flowread_core::{
    engine::Engine,
    focus::Monospace,
    pacing::StopWords,
    playback::{PlaybackEvent, TickResult},
    settings::{DEFAULT_MILESTONE_WORDS, EngineSettings},
    tokenizer::TokenStream,
};
use log::info;

use terminal::WordLine;

#[path = "main/input.rs"]
mod input;
#[path = "main/terminal.rs"]
mod terminal;

const MIN_FPS: u32 = 1;
const MAX_FPS: u32 = 240;

#[derive(Parser, Debug)]
#[command(name = "flowread", about = "Paced single-word reader for the terminal")]
struct Cli {
    /// Text file to read; stdin when omitted
    path: Option<PathBuf>,

    /// Reading speed in words per minute
    #[arg(long)]
    wpm: Option<u32>,

    /// Show every word for the same base delay
    #[arg(long)]
    no_natural_pacing: bool,

    /// Fraction of the line width the focus character sits on
    #[arg(long)]
    pivot: Option<f64>,

    /// Global token index to start from
    #[arg(long, default_value_t = 0)]
    resume: usize,

    /// Frames per second of the render loop
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Stop tokenizing after this many tokens
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Extra word to show faster (repeatable)
    #[arg(long = "stop-word")]
    stop_words: Vec<String>,

    /// Line width in columns
    #[arg(long, default_value_t = 60)]
    width: u16,

    /// Place each word directly instead of sliding it
    #[arg(long)]
    reduced_motion: bool,

    /// Draw every letter with the same weight
    #[arg(long)]
    no_bionic: bool,

    /// Words between progress reports, 0 to disable
    #[arg(long, default_value_t = DEFAULT_MILESTONE_WORDS)]
    milestone: u32,
}

impl Cli {
    fn settings(&self) -> EngineSettings {
        let mut settings = EngineSettings {
            natural_pacing: !self.no_natural_pacing,
            reduced_motion: self.reduced_motion,
            bionic_emphasis: !self.no_bionic,
            milestone_words: self.milestone,
            ..EngineSettings::default()
        };
        if let Some(wpm) = self.wpm {
            settings = settings.with_wpm(wpm);
        }
        if let Some(pivot) = self.pivot {
            settings.pivot_fraction = pivot;
        }
        settings.sanitized()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let text = input::read_text(cli.path.as_deref())?;
    let stream = match cli.max_tokens {
        Some(max_tokens) => TokenStream::from_text_limited(&text, max_tokens),
        None => TokenStream::from_text(&text),
    };
    info!(
        "text loaded: tokens={} words={} paragraphs={}",
        stream.len(),
        stream.word_count(),
        stream.paragraph_count()
    );

    let settings = cli.settings();
    let mut engine = Engine::from_stream(
        stream,
        settings,
        StopWords::with_extra(&cli.stop_words),
        Monospace::new(1.0),
        f64::from(cli.width),
    );
    if cli.resume > 0 {
        engine.resume_from(cli.resume);
    }
    if !engine.play() {
        info!("nothing to read");
        return Ok(());
    }
    info!(
        "reading: wpm={} natural_pacing={} start={}",
        settings.wpm,
        settings.natural_pacing,
        engine.resume_index()
    );

    let mut line = WordLine::new(io::stdout().lock(), usize::from(cli.width));
    let fps = cli.fps.clamp(MIN_FPS, MAX_FPS);
    let frame_interval = Duration::from_secs_f64(1.0 / f64::from(fps));
    let mut last = Instant::now();

    loop {
        thread::sleep(frame_interval);
        let now = Instant::now();
        let dt_ms = now.duration_since(last).as_secs_f64() * 1_000.0;
        last = now;

        let result = engine.tick(dt_ms);
        engine
            .with_frame(|frame| line.render(&frame))
            .context("failed to draw frame")?;

        while let Some(event) = engine.poll_event() {
            match event {
                PlaybackEvent::WordsRead { total } => info!("milestone: words_read={total}"),
                PlaybackEvent::Finished { index } => info!("finished: index={index}"),
            }
        }

        if result == TickResult::Finished {
            break;
        }
    }

    line.finish().context("failed to draw frame")?;
    info!("resume with --resume {}", engine.resume_index());
    Ok(())
}
